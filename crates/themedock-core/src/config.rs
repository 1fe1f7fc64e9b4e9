//! Theme system configuration.

use std::env;
use std::path::PathBuf;

/// Where themes live on disk and how they are installed.
#[derive(Debug, Clone)]
pub struct ThemesConfig {
    /// Root directory holding one sub-directory per theme.
    pub themes_root: PathBuf,
    /// Public-serving directory that receives published theme assets.
    pub public_root: PathBuf,
    /// Copy `assets/` and the preview image on every reconciliation.
    pub publish_assets: bool,
    /// Run the registry migrations at startup.
    pub create_tables: bool,
    /// Base URL the public directory is served from.
    pub base_url: String,
}

impl ThemesConfig {
    pub fn new(themes_root: impl Into<PathBuf>, public_root: impl Into<PathBuf>) -> Self {
        Self {
            themes_root: themes_root.into(),
            public_root: public_root.into(),
            publish_assets: true,
            create_tables: true,
            base_url: "http://localhost:8080".to_string(),
        }
    }

    pub fn from_env() -> Self {
        let themes_root =
            env::var("THEMES_FOLDER").unwrap_or_else(|_| "resources/themes".to_string());
        let public_root =
            env::var("THEMES_PUBLIC_PATH").unwrap_or_else(|_| "public/themes".to_string());

        Self {
            themes_root: PathBuf::from(themes_root),
            public_root: PathBuf::from(public_root),
            publish_assets: env_flag("THEMES_PUBLISH_ASSETS", true),
            create_tables: env_flag("THEMES_CREATE_TABLES", true),
            base_url: env::var("THEMES_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
        }
    }

    pub fn with_publish_assets(mut self, publish: bool) -> Self {
        self.publish_assets = publish;
        self
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .map(|v| parse_flag(&v, default))
        .unwrap_or(default)
}

fn parse_flag(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
