//! Theme system error types.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ThemeError {
    #[error("theme not found: {0}")]
    NotFound(String),

    #[error("invalid manifest for theme {folder}: {message}")]
    ManifestParse { folder: String, message: String },

    #[error("asset source missing: {}", .0.display())]
    AssetSourceMissing(PathBuf),

    #[error("invalid theme folder name: {0}")]
    InvalidFolder(String),

    #[error("invalid value for field {field}: {message}")]
    InvalidField { field: String, message: String },

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ThemeError {
    /// Whether the error is an expected lookup miss rather than a failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ThemeError::NotFound(_))
    }

    /// Whether the error is a unique-constraint violation from the registry.
    ///
    /// Two reconciliation passes racing on the same folder hit this; the
    /// loser looks the row up again instead of failing.
    pub fn is_unique_violation(&self) -> bool {
        match self {
            ThemeError::Database(e) => is_unique_violation(e),
            _ => false,
        }
    }
}

pub(crate) fn is_unique_violation(err: &sea_orm::DbErr) -> bool {
    matches!(
        err.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
