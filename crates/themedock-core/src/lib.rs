//! Themedock theme system
//!
//! Discovers themes on disk (one directory per theme with a JSON manifest),
//! keeps the registry in sync with them, publishes their static assets,
//! switches the active theme and stores per-theme options submitted from
//! option forms.

pub mod config;
pub mod error;
pub mod fields;
pub mod layout;
pub mod manifest;
pub mod options;
pub mod publisher;
pub mod reconciler;
pub mod registry;
pub mod scanner;

pub use config::ThemesConfig;
pub use error::ThemeError;
pub use fields::{BuiltinFieldConverter, FieldConverter, FieldSpec, FieldType};
pub use layout::ThemeLayout;
pub use manifest::ThemeManifest;
pub use options::{decode_submission, save_options, save_submission, OptionValue, Submission};
pub use publisher::{AssetPublisher, PublishReport};
pub use reconciler::{ReconcileReport, ReconcileWarning, Reconciler};
pub use registry::{
    activate, deactivate_all, delete_theme, resolve_current_theme, theme_folder,
    theme_folder_url, theme_option, DeletedTheme,
};
pub use scanner::{scan_themes, ScanFailure, ScanReport};
