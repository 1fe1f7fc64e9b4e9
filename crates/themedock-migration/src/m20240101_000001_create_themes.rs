use sea_orm_migration::prelude::*;

/// Migration 1: registry of themes discovered under the themes root.
#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Themes::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Themes::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Themes::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(Themes::Folder)
                            .string_len(191)
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Themes::Active)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Themes::Version)
                            .string_len(255)
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(Themes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Themes::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_themes_active")
                    .table(Themes::Table)
                    .col(Themes::Active)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Themes::Table).if_exists().to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum Themes {
    Table,
    Id,
    Name,
    Folder,
    Active,
    Version,
    CreatedAt,
    UpdatedAt,
}
