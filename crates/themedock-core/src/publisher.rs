//! Asset publisher: copies a theme's static files into the public root.
//!
//! Layout produced for theme `F`:
//! - `<public>/F/...`      contents of `<themes>/F/assets/`
//! - `<public>/F/F.jpg`    the preview image

use std::path::{Component, Path, PathBuf};

use serde::Serialize;

use crate::error::ThemeError;

/// Totals for one publish run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PublishReport {
    pub files: u64,
    pub bytes: u64,
}

/// Publishes theme assets from the themes root to the public root.
#[derive(Debug, Clone)]
pub struct AssetPublisher {
    themes_root: PathBuf,
    public_root: PathBuf,
}

impl AssetPublisher {
    pub fn new(themes_root: impl Into<PathBuf>, public_root: impl Into<PathBuf>) -> Self {
        Self {
            themes_root: themes_root.into(),
            public_root: public_root.into(),
        }
    }

    pub fn public_root(&self) -> &Path {
        &self.public_root
    }

    /// Published directory for `folder`.
    pub fn published_dir(&self, folder: &str) -> Result<PathBuf, ThemeError> {
        validate_folder(folder)?;
        Ok(self.public_root.join(folder))
    }

    /// Copy `assets/` and `<folder>.jpg` into the public root.
    ///
    /// Re-publishing overwrites files in place, so running it on every
    /// reconciliation picks up edits made on disk.
    pub async fn publish(&self, folder: &str) -> Result<PublishReport, ThemeError> {
        validate_folder(folder)?;

        let source = self.themes_root.join(folder);
        let assets_src = source.join("assets");
        let preview_src = source.join(format!("{folder}.jpg"));

        if !tokio::fs::try_exists(&assets_src).await? {
            return Err(ThemeError::AssetSourceMissing(assets_src));
        }
        if !tokio::fs::try_exists(&preview_src).await? {
            return Err(ThemeError::AssetSourceMissing(preview_src));
        }

        let dest = self.public_root.join(folder);
        tokio::fs::create_dir_all(&dest).await?;

        let mut report = copy_dir(&assets_src, &dest).await?;

        let preview_bytes = tokio::fs::copy(&preview_src, dest.join(format!("{folder}.jpg"))).await?;
        report.files += 1;
        report.bytes += preview_bytes;

        tracing::debug!(
            folder = %folder,
            files = report.files,
            bytes = report.bytes,
            "theme assets published"
        );

        Ok(report)
    }

    /// Remove the published directory for `folder`. Returns whether anything
    /// was removed. The source theme folder is never touched.
    pub async fn unpublish(&self, folder: &str) -> Result<bool, ThemeError> {
        let dest = self.published_dir(folder)?;
        if !tokio::fs::try_exists(&dest).await? {
            return Ok(false);
        }

        tokio::fs::remove_dir_all(&dest).await?;
        tracing::info!(folder = %folder, path = %dest.display(), "published theme assets removed");
        Ok(true)
    }
}

/// A folder must be exactly one normal path component.
pub fn validate_folder(folder: &str) -> Result<(), ThemeError> {
    let mut components = Path::new(folder).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !folder.contains(['/', '\\']) => Ok(()),
        _ => Err(ThemeError::InvalidFolder(folder.to_string())),
    }
}

/// Recursively copy `src` into `dest`, skipping symlinks and `.git`.
async fn copy_dir(src: &Path, dest: &Path) -> Result<PublishReport, ThemeError> {
    tokio::fs::create_dir_all(dest).await?;

    let mut report = PublishReport::default();
    let mut stack = vec![(src.to_path_buf(), dest.to_path_buf())];

    while let Some((src_dir, dest_dir)) = stack.pop() {
        let mut entries = tokio::fs::read_dir(&src_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let file_name = entry.file_name();
            if file_name == ".git" {
                continue;
            }

            let file_type = entry.file_type().await?;
            if file_type.is_symlink() {
                tracing::debug!(path = %entry.path().display(), "skipping symlink in theme assets");
                continue;
            }

            let dest_path = dest_dir.join(&file_name);

            if file_type.is_dir() {
                tokio::fs::create_dir_all(&dest_path).await?;
                stack.push((entry.path(), dest_path));
            } else if file_type.is_file() {
                report.bytes += tokio::fs::copy(entry.path(), &dest_path).await?;
                report.files += 1;
            }
        }
    }

    Ok(report)
}
