//! Typed option fields and their conversion into storable values.
//!
//! Option forms post each field together with two hidden companions:
//! `<key>_type__theme_field` naming the field type and
//! `<key>_details__theme_field` carrying JSON details for it.

use serde::{Deserialize, Serialize};

use crate::error::ThemeError;

/// Suffix of the hidden input that carries a field's type.
pub const TYPE_SUFFIX: &str = "_type__theme_field";
/// Suffix of the hidden input that carries a field's details.
pub const DETAILS_SUFFIX: &str = "_details__theme_field";

/// Field types understood by the option forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    Text,
    TextArea,
    RichTextBox,
    CodeEditor,
    MarkdownEditor,
    Checkbox,
    Number,
    SelectDropdown,
    RadioBtn,
    Color,
    Date,
    Hidden,
    Image,
    #[serde(untagged)]
    Other(String),
}

impl FieldType {
    /// Parse the wire name posted in a `_type__theme_field` input.
    ///
    /// Missing or blank types are treated as plain text.
    pub fn from_wire(value: Option<&str>) -> Self {
        match value.map(str::trim).unwrap_or("") {
            "" | "text" => FieldType::Text,
            "text_area" => FieldType::TextArea,
            "rich_text_box" => FieldType::RichTextBox,
            "code_editor" => FieldType::CodeEditor,
            "markdown_editor" => FieldType::MarkdownEditor,
            "checkbox" => FieldType::Checkbox,
            "number" => FieldType::Number,
            "select_dropdown" => FieldType::SelectDropdown,
            "radio_btn" => FieldType::RadioBtn,
            "color" => FieldType::Color,
            "date" => FieldType::Date,
            "hidden" => FieldType::Hidden,
            "image" => FieldType::Image,
            other => FieldType::Other(other.to_string()),
        }
    }

    pub fn as_wire(&self) -> &str {
        match self {
            FieldType::Text => "text",
            FieldType::TextArea => "text_area",
            FieldType::RichTextBox => "rich_text_box",
            FieldType::CodeEditor => "code_editor",
            FieldType::MarkdownEditor => "markdown_editor",
            FieldType::Checkbox => "checkbox",
            FieldType::Number => "number",
            FieldType::SelectDropdown => "select_dropdown",
            FieldType::RadioBtn => "radio_btn",
            FieldType::Color => "color",
            FieldType::Date => "date",
            FieldType::Hidden => "hidden",
            FieldType::Image => "image",
            FieldType::Other(name) => name,
        }
    }
}

/// A single option field as described by a submitted form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub field_type: FieldType,
    pub details: Option<serde_json::Value>,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            name: name.into(),
            field_type,
            details: None,
        }
    }

    /// Build a spec from the raw companion inputs of a form.
    ///
    /// Details that are not valid JSON are kept as a JSON string.
    pub fn from_form(name: &str, field_type: Option<&str>, details: Option<&str>) -> Self {
        let details = details
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(|d| {
                serde_json::from_str(d).unwrap_or_else(|_| serde_json::Value::String(d.to_string()))
            });

        Self {
            name: name.to_string(),
            field_type: FieldType::from_wire(field_type),
            details,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Name of the hidden input carrying this field's type.
    pub fn type_input_name(&self) -> String {
        format!("{}{TYPE_SUFFIX}", self.name)
    }

    /// Name of the hidden input carrying this field's details.
    pub fn details_input_name(&self) -> String {
        format!("{}{DETAILS_SUFFIX}", self.name)
    }

    fn detail_str(&self, key: &str) -> Option<&str> {
        self.details.as_ref()?.get(key)?.as_str()
    }
}

/// Converts a raw submitted value into the value stored for an option.
///
/// Hosts with richer field types plug their own implementation in.
pub trait FieldConverter: Send + Sync {
    fn convert(&self, raw: Option<&str>, field: &FieldSpec) -> Result<Option<String>, ThemeError>;
}

/// Conversion rules for the built-in field types.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFieldConverter;

impl FieldConverter for BuiltinFieldConverter {
    fn convert(&self, raw: Option<&str>, field: &FieldSpec) -> Result<Option<String>, ThemeError> {
        match field.field_type {
            FieldType::Checkbox => Ok(raw.map(|v| {
                if is_checked(v) {
                    "1".to_string()
                } else {
                    "0".to_string()
                }
            })),
            FieldType::Number => match raw.map(str::trim) {
                None | Some("") => Ok(None),
                Some(v) => v
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite())
                    .map(|_| Some(v.to_string()))
                    .ok_or_else(|| ThemeError::InvalidField {
                        field: field.name.clone(),
                        message: format!("'{v}' is not a number"),
                    }),
            },
            FieldType::SelectDropdown | FieldType::RadioBtn => match raw {
                Some(v) if !v.is_empty() => Ok(Some(v.to_string())),
                _ => Ok(field.detail_str("default").map(str::to_owned)),
            },
            _ => Ok(raw.map(str::to_owned)),
        }
    }
}

fn is_checked(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "on" | "1" | "true" | "yes" | "checked"
    )
}
