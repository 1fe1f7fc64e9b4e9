use sea_orm::DatabaseConnection;
use std::sync::Arc;
use themedock_core::{AssetPublisher, BuiltinFieldConverter, FieldConverter, ThemesConfig};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: ThemesConfig,
    /// Converts submitted option fields into stored values.
    pub converter: Arc<dyn FieldConverter>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: ThemesConfig) -> Self {
        Self {
            db,
            config,
            converter: Arc::new(BuiltinFieldConverter),
        }
    }

    pub fn publisher(&self) -> AssetPublisher {
        AssetPublisher::new(&self.config.themes_root, &self.config.public_root)
    }
}
