use sea_orm_migration::prelude::*;

use super::m20240101_000001_create_themes::Themes;

/// Migration 2: per-theme key/value options.
///
/// `(theme_id, key)` is unique so concurrent saves of the same option cannot
/// produce duplicate rows.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ThemeOptions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ThemeOptions::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ThemeOptions::ThemeId).uuid().not_null())
                    .col(ColumnDef::new(ThemeOptions::Key).string_len(255).not_null())
                    .col(ColumnDef::new(ThemeOptions::Value).text().null())
                    .col(
                        ColumnDef::new(ThemeOptions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(ThemeOptions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_theme_options_theme_id")
                            .from(ThemeOptions::Table, ThemeOptions::ThemeId)
                            .to(Themes::Table, Themes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_theme_options_theme_id_key")
                    .table(ThemeOptions::Table)
                    .col(ThemeOptions::ThemeId)
                    .col(ThemeOptions::Key)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(ThemeOptions::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(DeriveIden)]
pub enum ThemeOptions {
    Table,
    Id,
    ThemeId,
    Key,
    Value,
    CreatedAt,
    UpdatedAt,
}
