//! Reconciler: brings the theme registry in line with the themes root.
//!
//! Every manifest on disk gets exactly one row keyed by folder. New folders
//! are inserted, known ones get their version refreshed, and assets are
//! re-published on every pass when publishing is enabled. Failures for one
//! theme are recorded and the pass moves on to the next.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};
use serde::Serialize;
use themedock_db::entities::theme;
use uuid::Uuid;

use crate::config::ThemesConfig;
use crate::error::ThemeError;
use crate::manifest::ThemeManifest;
use crate::publisher::AssetPublisher;
use crate::registry::{find_by_folder, list_themes};
use crate::scanner::scan_themes;

/// A per-theme problem that did not stop the pass.
#[derive(Debug, Clone, Serialize)]
pub struct ReconcileWarning {
    pub folder: String,
    pub message: String,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub unchanged: Vec<String>,
    pub published: Vec<String>,
    pub warnings: Vec<ReconcileWarning>,
    /// Registered folders that no longer have a manifest on disk. They are
    /// left untouched for an administrator to decide on.
    pub orphaned: Vec<String>,
}

impl ReconcileReport {
    pub fn is_orphaned(&self, folder: &str) -> bool {
        self.orphaned.iter().any(|f| f == folder)
    }

    fn warn(&mut self, folder: &str, err: &ThemeError) {
        self.warnings.push(ReconcileWarning {
            folder: folder.to_string(),
            message: err.to_string(),
        });
    }
}

#[derive(Debug, PartialEq, Eq)]
enum SyncOutcome {
    Created,
    Updated,
    Unchanged,
}

/// Scans the themes root and reconciles it with the registry.
pub struct Reconciler {
    db: DatabaseConnection,
    config: ThemesConfig,
    publisher: AssetPublisher,
}

impl Reconciler {
    pub fn new(db: DatabaseConnection, config: ThemesConfig) -> Self {
        let publisher = AssetPublisher::new(&config.themes_root, &config.public_root);
        Self {
            db,
            config,
            publisher,
        }
    }

    pub fn publisher(&self) -> &AssetPublisher {
        &self.publisher
    }

    /// Run one pass. Safe to call repeatedly: unchanged disk state produces
    /// no registry writes.
    pub async fn reconcile(&self) -> Result<ReconcileReport, ThemeError> {
        let scan = scan_themes(&self.config.themes_root).await?;
        let mut report = ReconcileReport::default();

        for failure in &scan.errors {
            report.warnings.push(ReconcileWarning {
                folder: failure.folder.clone(),
                message: failure.message.clone(),
            });
        }

        for (folder, manifest) in &scan.themes {
            match self.sync_theme(manifest).await {
                Ok(SyncOutcome::Created) => report.created.push(folder.clone()),
                Ok(SyncOutcome::Updated) => report.updated.push(folder.clone()),
                Ok(SyncOutcome::Unchanged) => report.unchanged.push(folder.clone()),
                Err(e) => {
                    tracing::warn!(folder = %folder, "failed to register theme: {e}");
                    report.warn(folder, &e);
                    continue;
                }
            }

            if self.config.publish_assets {
                match self.publisher.publish(folder).await {
                    Ok(_) => report.published.push(folder.clone()),
                    Err(e) => {
                        tracing::warn!(folder = %folder, "failed to publish theme assets: {e}");
                        report.warn(folder, &e);
                    }
                }
            }
        }

        report.orphaned = list_themes(&self.db)
            .await?
            .into_iter()
            .map(|t| t.folder)
            .filter(|folder| !scan.themes.contains_key(folder))
            .collect();

        tracing::info!(
            created = report.created.len(),
            updated = report.updated.len(),
            unchanged = report.unchanged.len(),
            warnings = report.warnings.len(),
            orphaned = report.orphaned.len(),
            "theme reconciliation complete"
        );

        Ok(report)
    }

    async fn sync_theme(&self, manifest: &ThemeManifest) -> Result<SyncOutcome, ThemeError> {
        if let Some(existing) = find_by_folder(&self.db, &manifest.folder).await? {
            return self.refresh_version(existing, manifest).await;
        }

        match self.insert_theme(manifest).await {
            Ok(()) => Ok(SyncOutcome::Created),
            // another pass registered the folder between our lookup and insert
            Err(e) if e.is_unique_violation() => {
                tracing::debug!(folder = %manifest.folder, "theme registered concurrently, retrying lookup");
                let existing = find_by_folder(&self.db, &manifest.folder)
                    .await?
                    .ok_or_else(|| ThemeError::NotFound(manifest.folder.clone()))?;
                self.refresh_version(existing, manifest).await
            }
            Err(e) => Err(e),
        }
    }

    async fn insert_theme(&self, manifest: &ThemeManifest) -> Result<(), ThemeError> {
        let now = Utc::now().fixed_offset();
        let theme_id = Uuid::new_v4();

        let new_theme = theme::ActiveModel {
            id: Set(theme_id),
            name: Set(manifest.name.clone()),
            folder: Set(manifest.folder.clone()),
            active: Set(false),
            version: Set(manifest.version_or_default().to_string()),
            created_at: Set(now),
            updated_at: Set(now),
        };
        new_theme.insert(&self.db).await?;

        tracing::info!(
            theme_name = %manifest.name,
            folder = %manifest.folder,
            theme_id = %theme_id,
            version = %manifest.version_or_default(),
            "theme registered"
        );
        Ok(())
    }

    async fn refresh_version(
        &self,
        existing: theme::Model,
        manifest: &ThemeManifest,
    ) -> Result<SyncOutcome, ThemeError> {
        let version = manifest.version_or_default();
        if existing.version == version {
            tracing::debug!(folder = %existing.folder, "theme unchanged");
            return Ok(SyncOutcome::Unchanged);
        }

        let old_version = existing.version.clone();
        let folder = existing.folder.clone();

        let mut active: theme::ActiveModel = existing.into();
        active.version = Set(version.to_string());
        active.updated_at = Set(Utc::now().fixed_offset());
        active.update(&self.db).await?;

        tracing::info!(
            folder = %folder,
            old_version = %old_version,
            new_version = %version,
            "theme version updated"
        );
        Ok(SyncOutcome::Updated)
    }
}
