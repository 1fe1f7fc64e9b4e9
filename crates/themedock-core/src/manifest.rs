//! Theme manifest (`<folder>/<folder>.json`) parsing.

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ThemeError;

/// Parsed theme manifest, with the owning folder injected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeManifest {
    pub name: String,
    #[serde(default, deserialize_with = "string_or_number")]
    pub version: Option<String>,
    #[serde(default)]
    pub folder: String,
    /// Any other keys the manifest carries (author, description, ...).
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ThemeManifest {
    /// Parse a manifest document belonging to `folder`.
    ///
    /// The folder always wins over any `folder` key in the document.
    pub fn parse(folder: &str, content: &str) -> Result<Self, ThemeError> {
        let mut manifest: ThemeManifest =
            serde_json::from_str(content).map_err(|e| ThemeError::ManifestParse {
                folder: folder.to_string(),
                message: e.to_string(),
            })?;

        if manifest.name.trim().is_empty() {
            return Err(ThemeError::ManifestParse {
                folder: folder.to_string(),
                message: "name must not be empty".to_string(),
            });
        }

        manifest.folder = folder.to_string();
        Ok(manifest)
    }

    /// Version to store in the registry; absent versions become `""`.
    pub fn version_or_default(&self) -> &str {
        self.version.as_deref().unwrap_or("")
    }
}

/// Manifests in the wild carry `"version": 1.2` as often as `"1.2"`.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "version must be a string or number, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let m = ThemeManifest::parse("sunrise", r#"{"name":"Sunrise","version":"1.0"}"#).unwrap();
        assert_eq!(m.name, "Sunrise");
        assert_eq!(m.version.as_deref(), Some("1.0"));
        assert_eq!(m.folder, "sunrise");
        assert!(m.extra.is_empty());
    }

    #[test]
    fn test_parse_without_version() {
        let m = ThemeManifest::parse("ocean", r#"{"name":"Ocean"}"#).unwrap();
        assert_eq!(m.version, None);
        assert_eq!(m.version_or_default(), "");
    }

    #[test]
    fn test_numeric_version() {
        let m = ThemeManifest::parse("ocean", r#"{"name":"Ocean","version":2.5}"#).unwrap();
        assert_eq!(m.version_or_default(), "2.5");
    }

    #[test]
    fn test_null_version() {
        let m = ThemeManifest::parse("ocean", r#"{"name":"Ocean","version":null}"#).unwrap();
        assert_eq!(m.version, None);
    }

    #[test]
    fn test_folder_is_injected_over_document() {
        let m = ThemeManifest::parse("ocean", r#"{"name":"Ocean","folder":"elsewhere"}"#).unwrap();
        assert_eq!(m.folder, "ocean");
    }

    #[test]
    fn test_extra_keys_preserved() {
        let m = ThemeManifest::parse(
            "ocean",
            r#"{"name":"Ocean","author":"Jane","tags":["dark"]}"#,
        )
        .unwrap();
        assert_eq!(m.extra["author"], "Jane");
        assert_eq!(m.extra["tags"][0], "dark");
    }

    #[test]
    fn test_missing_name_rejected() {
        let err = ThemeManifest::parse("ocean", r#"{"version":"1.0"}"#).unwrap_err();
        match err {
            ThemeError::ManifestParse { folder, message } => {
                assert_eq!(folder, "ocean");
                assert!(message.contains("name"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_name_rejected() {
        let err = ThemeManifest::parse("ocean", r#"{"name":"  "}"#).unwrap_err();
        assert!(err.to_string().contains("name must not be empty"));
    }

    #[test]
    fn test_malformed_json_rejected() {
        let err = ThemeManifest::parse("broken", "{\"name\": ").unwrap_err();
        assert!(matches!(err, ThemeError::ManifestParse { .. }));
    }

    #[test]
    fn test_object_version_rejected() {
        let err = ThemeManifest::parse("ocean", r#"{"name":"Ocean","version":{"major":1}}"#)
            .unwrap_err();
        assert!(err.to_string().contains("version must be a string or number"));
    }
}
