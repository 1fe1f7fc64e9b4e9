// Shared fixtures for registry integration tests
#![allow(dead_code)]

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use themedock_core::ThemesConfig;
use themedock_migration::{Migrator, MigratorTrait};

/// A migrated SQLite registry plus themes/public roots, all inside one
/// temporary directory that lives as long as the fixture.
pub struct Fixture {
    pub db: DatabaseConnection,
    pub config: ThemesConfig,
    _dir: tempfile::TempDir,
}

impl Fixture {
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("registry.db").display());

        let mut opt = ConnectOptions::new(url);
        opt.sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let config = ThemesConfig::new(dir.path().join("themes"), dir.path().join("public/themes"));

        Self {
            db,
            config,
            _dir: dir,
        }
    }

    pub fn themes_root(&self) -> &Path {
        &self.config.themes_root
    }

    pub fn public_root(&self) -> &Path {
        &self.config.public_root
    }

    /// Write `<themes>/<folder>/<folder>.json` with the given manifest.
    pub fn write_manifest(&self, folder: &str, manifest: &str) -> PathBuf {
        let dir = self.themes_root().join(folder);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{folder}.json")), manifest).unwrap();
        dir
    }

    /// A complete theme: manifest, `assets/` and a preview image.
    pub fn write_theme(&self, folder: &str, name: &str, version: &str) -> PathBuf {
        let dir = self.write_manifest(
            folder,
            &format!(r#"{{"name":"{name}","version":"{version}"}}"#),
        );
        std::fs::create_dir_all(dir.join("assets/css")).unwrap();
        std::fs::write(dir.join("assets/css/app.css"), "body{}").unwrap();
        std::fs::write(dir.join(format!("{folder}.jpg")), [0xffu8, 0xd8, 0xff]).unwrap();
        dir
    }
}
