//! On-disk layout of an installed theme, as consumed by a rendering host.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::ThemeError;
use crate::publisher::validate_folder;

/// Directories and files a theme provides to the host.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ThemeLayout {
    /// Root of the theme's views.
    pub views: PathBuf,
    /// Anonymous component directories, most specific first.
    pub components: Vec<PathBuf>,
    /// File-routed pages directory, when the theme has one.
    pub pages: Option<PathBuf>,
    /// Middleware sources, sorted by file name.
    pub middleware: Vec<PathBuf>,
}

impl ThemeLayout {
    /// Inspect `<themes_root>/<folder>` and collect what exists.
    pub async fn discover(themes_root: &Path, folder: &str) -> Result<Self, ThemeError> {
        validate_folder(folder)?;
        let views = themes_root.join(folder);

        let mut components = Vec::new();
        for dir in [views.join("components").join("elements"), views.join("components")] {
            if is_dir(&dir).await {
                components.push(dir);
            }
        }

        let pages_dir = views.join("pages");
        let pages = if is_dir(&pages_dir).await {
            Some(pages_dir)
        } else {
            None
        };

        let mut middleware = Vec::new();
        let middleware_dir = views.join("middleware");
        if is_dir(&middleware_dir).await {
            let mut entries = tokio::fs::read_dir(&middleware_dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                if entry.file_type().await?.is_file() {
                    middleware.push(entry.path());
                }
            }
            middleware.sort();
        }

        Ok(Self {
            views,
            components,
            pages,
            middleware,
        })
    }
}

async fn is_dir(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
}
