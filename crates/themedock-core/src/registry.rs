//! Theme registry operations: lookup, activation, deletion and resolution
//! of the theme a request should render with.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::Serialize;
use themedock_db::entities::{theme, theme_option};
use uuid::Uuid;

use crate::error::ThemeError;
use crate::options::option_value;
use crate::publisher::AssetPublisher;

/// Look up a theme by its folder.
pub async fn find_by_folder<C: ConnectionTrait>(
    db: &C,
    folder: &str,
) -> Result<Option<theme::Model>, ThemeError> {
    Ok(theme::Entity::find()
        .filter(theme::Column::Folder.eq(folder))
        .one(db)
        .await?)
}

/// Like [`find_by_folder`] but a miss is a `NotFound` error naming the folder.
pub async fn require_by_folder<C: ConnectionTrait>(
    db: &C,
    folder: &str,
) -> Result<theme::Model, ThemeError> {
    find_by_folder(db, folder)
        .await?
        .ok_or_else(|| ThemeError::NotFound(folder.to_string()))
}

/// All registered themes ordered by folder.
pub async fn list_themes<C: ConnectionTrait>(db: &C) -> Result<Vec<theme::Model>, ThemeError> {
    Ok(theme::Entity::find()
        .order_by_asc(theme::Column::Folder)
        .all(db)
        .await?)
}

/// The theme flagged active, if any.
pub async fn active_theme<C: ConnectionTrait>(db: &C) -> Result<Option<theme::Model>, ThemeError> {
    Ok(theme::Entity::find()
        .filter(theme::Column::Active.eq(true))
        .one(db)
        .await?)
}

/// Make the theme in `folder` the only active theme.
///
/// The flag flip is one `UPDATE` over every row (`active = folder = ?`)
/// inside a transaction with the lookup, so no committed state ever has
/// zero or two active themes.
pub async fn activate(db: &DatabaseConnection, folder: &str) -> Result<theme::Model, ThemeError> {
    let txn = db.begin().await?;

    let target = require_by_folder(&txn, folder).await?;

    theme::Entity::update_many()
        .col_expr(
            theme::Column::Active,
            Expr::col(theme::Column::Folder).eq(folder),
        )
        .col_expr(
            theme::Column::UpdatedAt,
            Expr::value(Utc::now().fixed_offset()),
        )
        .exec(&txn)
        .await?;

    txn.commit().await?;

    tracing::info!(folder = %folder, theme_id = %target.id, "theme activated");

    Ok(theme::Model {
        active: true,
        ..target
    })
}

/// Clear the active flag on every theme.
pub async fn deactivate_all<C: ConnectionTrait>(db: &C) -> Result<u64, ThemeError> {
    let result = theme::Entity::update_many()
        .col_expr(theme::Column::Active, Expr::value(false))
        .filter(theme::Column::Active.eq(true))
        .exec(db)
        .await?;
    Ok(result.rows_affected)
}

/// What [`delete_theme`] removed.
#[derive(Debug, Clone, Serialize)]
pub struct DeletedTheme {
    pub id: Uuid,
    pub name: String,
    pub folder: String,
    /// Whether a published asset directory existed and was removed.
    pub removed_assets: bool,
}

/// Delete a theme: its published assets, its options and its row.
///
/// The source folder under the themes root stays on disk, so the next
/// reconciliation will register the theme again.
pub async fn delete_theme(
    db: &DatabaseConnection,
    publisher: &AssetPublisher,
    id: Uuid,
) -> Result<DeletedTheme, ThemeError> {
    let existing = theme::Entity::find_by_id(id)
        .one(db)
        .await?
        .ok_or_else(|| ThemeError::NotFound(id.to_string()))?;

    // a folder name that cannot be a path segment was never published
    let removed_assets = match publisher.unpublish(&existing.folder).await {
        Ok(removed) => removed,
        Err(ThemeError::InvalidFolder(_)) => false,
        Err(e) => return Err(e),
    };

    let txn = db.begin().await?;
    theme_option::Entity::delete_many()
        .filter(theme_option::Column::ThemeId.eq(id))
        .exec(&txn)
        .await?;
    theme::Entity::delete_by_id(id).exec(&txn).await?;
    txn.commit().await?;

    tracing::info!(
        theme_name = %existing.name,
        theme_id = %id,
        removed_assets,
        "theme deleted"
    );

    Ok(DeletedTheme {
        id,
        name: existing.name,
        folder: existing.folder,
        removed_assets,
    })
}

/// Theme a request renders with: the folder named by the `theme` cookie if
/// it is registered, otherwise the active theme.
pub async fn resolve_current_theme<C: ConnectionTrait>(
    db: &C,
    cookie: Option<&str>,
) -> Result<Option<theme::Model>, ThemeError> {
    if let Some(folder) = cookie.map(str::trim).filter(|f| !f.is_empty()) {
        if let Some(found) = find_by_folder(db, folder).await? {
            return Ok(Some(found));
        }
        tracing::debug!(folder = %folder, "theme cookie names an unknown theme, using active");
    }

    active_theme(db).await
}

/// Option value of the current theme, or `default` when there is no
/// current theme or the option is unset.
pub async fn theme_option<C: ConnectionTrait>(
    db: &C,
    cookie: Option<&str>,
    key: &str,
    default: &str,
) -> Result<String, ThemeError> {
    let Some(current) = resolve_current_theme(db, cookie).await? else {
        return Ok(default.to_string());
    };

    Ok(option_value(db, current.id, key)
        .await?
        .unwrap_or_else(|| default.to_string()))
}

/// Public path of a file inside a theme's published directory.
pub fn theme_folder(theme: &theme::Model, file: &str) -> String {
    format!("themes/{}{}", theme.folder, file)
}

/// Absolute URL of a file inside a theme's published directory.
pub fn theme_folder_url(
    base_url: &str,
    theme: &theme::Model,
    file: &str,
) -> Result<String, ThemeError> {
    let mut base = url::Url::parse(base_url)
        .map_err(|e| ThemeError::InvalidUrl(format!("{base_url}: {e}")))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }

    base.join(&theme_folder(theme, file))
        .map(String::from)
        .map_err(|e| ThemeError::InvalidUrl(format!("{base_url}: {e}")))
}
