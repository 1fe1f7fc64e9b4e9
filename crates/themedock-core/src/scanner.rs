//! Filesystem scanner: discovers themes under the themes root.
//!
//! A theme is any immediate sub-directory `F` that contains `F/F.json`.
//! Directories without a manifest are skipped silently; a manifest that
//! fails to parse is reported for that folder only and the scan carries on.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Serialize;

use crate::error::ThemeError;
use crate::manifest::ThemeManifest;
use crate::publisher::validate_folder;

/// A theme folder whose manifest could not be read or parsed.
#[derive(Debug, Clone, Serialize)]
pub struct ScanFailure {
    pub folder: String,
    pub message: String,
}

/// Result of one pass over the themes root.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Manifests keyed (and ordered) by folder name.
    pub themes: BTreeMap<String, ThemeManifest>,
    pub errors: Vec<ScanFailure>,
}

/// Path of the manifest for `folder` under `root`.
pub fn manifest_path(root: &Path, folder: &str) -> std::path::PathBuf {
    root.join(folder).join(format!("{folder}.json"))
}

/// Scan `root` for theme manifests, creating `root` if it does not exist.
pub async fn scan_themes(root: &Path) -> Result<ScanReport, ThemeError> {
    if !tokio::fs::try_exists(root).await? {
        tracing::info!(root = %root.display(), "creating themes root");
        tokio::fs::create_dir_all(root).await?;
    }

    let mut report = ScanReport::default();
    let mut entries = tokio::fs::read_dir(root).await?;

    while let Some(entry) = entries.next_entry().await? {
        let file_type = entry.file_type().await?;
        if !file_type.is_dir() {
            continue;
        }

        let Some(folder) = entry.file_name().to_str().map(str::to_owned) else {
            tracing::warn!(path = %entry.path().display(), "skipping non UTF-8 theme folder");
            continue;
        };
        if folder.starts_with('.') {
            continue;
        }

        let manifest_file = manifest_path(root, &folder);
        if !tokio::fs::try_exists(&manifest_file).await? {
            tracing::debug!(folder = %folder, "no manifest, skipping");
            continue;
        }

        // the name becomes a public path segment when assets are published
        if let Err(e) = validate_folder(&folder) {
            tracing::warn!(folder = %folder, "skipping theme folder with unusable name");
            report.errors.push(ScanFailure {
                folder,
                message: e.to_string(),
            });
            continue;
        }

        let parsed = match tokio::fs::read_to_string(&manifest_file).await {
            Ok(content) => ThemeManifest::parse(&folder, &content),
            Err(e) => Err(ThemeError::Io(e)),
        };

        match parsed {
            Ok(manifest) => {
                report.themes.insert(folder, manifest);
            }
            Err(e) => {
                tracing::warn!(folder = %folder, "skipping theme with unreadable manifest: {e}");
                report.errors.push(ScanFailure {
                    folder,
                    message: e.to_string(),
                });
            }
        }
    }

    report.errors.sort_by(|a, b| a.folder.cmp(&b.folder));

    tracing::debug!(
        root = %root.display(),
        found = report.themes.len(),
        failed = report.errors.len(),
        "theme scan complete"
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_theme(root: &Path, folder: &str, manifest: &str) {
        let dir = root.join(folder);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(format!("{folder}.json")), manifest).unwrap();
    }

    #[tokio::test]
    async fn test_scan_creates_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path().join("themes");

        let report = scan_themes(&root).await.unwrap();

        assert!(root.is_dir());
        assert!(report.themes.is_empty());
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_scan_orders_by_folder() {
        let tmp = tempfile::tempdir().unwrap();
        write_theme(tmp.path(), "sunrise", r#"{"name":"Sunrise","version":"1.0"}"#);
        write_theme(tmp.path(), "ocean", r#"{"name":"Ocean"}"#);

        let report = scan_themes(tmp.path()).await.unwrap();

        let folders: Vec<_> = report.themes.keys().cloned().collect();
        assert_eq!(folders, vec!["ocean", "sunrise"]);
        assert_eq!(report.themes["sunrise"].folder, "sunrise");
        assert_eq!(report.themes["sunrise"].version.as_deref(), Some("1.0"));
    }

    #[tokio::test]
    async fn test_scan_skips_folders_without_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("drafts")).unwrap();
        // manifest named after a different folder does not count
        std::fs::create_dir_all(tmp.path().join("misnamed")).unwrap();
        std::fs::write(tmp.path().join("misnamed").join("theme.json"), r#"{"name":"X"}"#).unwrap();
        std::fs::write(tmp.path().join("README.md"), "not a theme").unwrap();
        write_theme(tmp.path(), "ocean", r#"{"name":"Ocean"}"#);

        let report = scan_themes(tmp.path()).await.unwrap();

        assert_eq!(report.themes.len(), 1);
        assert!(report.themes.contains_key("ocean"));
        assert!(report.errors.is_empty());
    }

    #[tokio::test]
    async fn test_scan_skips_hidden_folders() {
        let tmp = tempfile::tempdir().unwrap();
        write_theme(tmp.path(), ".cache", r#"{"name":"Cache"}"#);

        let report = scan_themes(tmp.path()).await.unwrap();
        assert!(report.themes.is_empty());
    }

    #[tokio::test]
    async fn test_scan_isolates_malformed_manifest() {
        let tmp = tempfile::tempdir().unwrap();
        write_theme(tmp.path(), "broken", "{\"name\": ");
        write_theme(tmp.path(), "ocean", r#"{"name":"Ocean"}"#);

        let report = scan_themes(tmp.path()).await.unwrap();

        assert_eq!(report.themes.len(), 1);
        assert!(report.themes.contains_key("ocean"));
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].folder, "broken");
        assert!(report.errors[0].message.contains("invalid manifest"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_scan_rejects_unusable_folder_name() {
        let tmp = tempfile::tempdir().unwrap();
        write_theme(tmp.path(), "a\\b", r#"{"name":"Backslash"}"#);
        write_theme(tmp.path(), "ocean", r#"{"name":"Ocean"}"#);

        let report = scan_themes(tmp.path()).await.unwrap();

        assert_eq!(report.themes.keys().collect::<Vec<_>>(), vec!["ocean"]);
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].folder, "a\\b");
        assert!(report.errors[0].message.contains("invalid theme folder name"));
    }

    #[test]
    fn test_manifest_path() {
        let p = manifest_path(Path::new("/srv/themes"), "ocean");
        assert_eq!(p, Path::new("/srv/themes/ocean/ocean.json"));
    }
}
