//! Options codec: turns an option-form submission into per-key upserts.

use std::collections::HashSet;

use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use serde::Serialize;
use themedock_db::entities::theme_option;
use uuid::Uuid;

use crate::error::ThemeError;
use crate::fields::{FieldConverter, FieldSpec, FieldType, DETAILS_SUFFIX, TYPE_SUFFIX};

/// Name of the anti-forgery field, never stored as an option.
pub const TOKEN_FIELD: &str = "_token";

const CHECKBOX_MARKER: &str = "checkbox";

/// A submitted form, in the order the fields were posted.
#[derive(Debug, Clone, Default)]
pub struct Submission {
    fields: Vec<(String, String)>,
}

impl Submission {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    /// First value posted under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<Vec<(String, String)>> for Submission {
    fn from(fields: Vec<(String, String)>) -> Self {
        Self::new(fields)
    }
}

/// A normalized option ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionValue {
    pub key: String,
    pub value: Option<String>,
}

fn is_metadata_key(key: &str) -> bool {
    key.ends_with(TYPE_SUFFIX) || key.ends_with(DETAILS_SUFFIX) || key == TOKEN_FIELD
}

/// Decode a submission into the options it sets.
///
/// Unchecked checkboxes are absent from a form post; their type marker is
/// still present, so a marker whose field is missing yields an explicit
/// `None` for that field.
pub fn decode_submission(
    submission: &Submission,
    converter: &dyn FieldConverter,
) -> Result<Vec<OptionValue>, ThemeError> {
    let mut decoded = Vec::new();
    let mut seen = HashSet::new();

    for (key, content) in submission.iter() {
        let field = match key.strip_suffix(TYPE_SUFFIX) {
            // only the literal marker, and never for a base that is itself metadata
            Some(base)
                if content == CHECKBOX_MARKER
                    && !is_metadata_key(base)
                    && !submission.contains(base) =>
            {
                base
            }
            _ if is_metadata_key(key) => continue,
            _ => key,
        };

        if field.is_empty() || !seen.insert(field.to_string()) {
            continue;
        }

        let spec = FieldSpec::from_form(
            field,
            submission.get(&format!("{field}{TYPE_SUFFIX}")),
            submission.get(&format!("{field}{DETAILS_SUFFIX}")),
        );

        let value = if spec.field_type == FieldType::Checkbox && !submission.contains(field) {
            None
        } else {
            converter.convert(submission.get(field), &spec)?
        };

        decoded.push(OptionValue {
            key: field.to_string(),
            value,
        });
    }

    Ok(decoded)
}

/// Insert or update one option for a theme.
///
/// A single `INSERT .. ON CONFLICT (theme_id, key) DO UPDATE`, so two saves
/// racing on a new key both land on the same row.
pub async fn upsert_option<C: ConnectionTrait>(
    db: &C,
    theme_id: Uuid,
    key: &str,
    value: Option<&str>,
) -> Result<(), ThemeError> {
    let now = Utc::now().fixed_offset();

    let row = theme_option::ActiveModel {
        id: Set(Uuid::new_v4()),
        theme_id: Set(theme_id),
        key: Set(key.to_string()),
        value: Set(value.map(str::to_owned)),
        created_at: Set(now),
        updated_at: Set(now),
    };

    theme_option::Entity::insert(row)
        .on_conflict(
            OnConflict::columns([theme_option::Column::ThemeId, theme_option::Column::Key])
                .update_columns([theme_option::Column::Value, theme_option::Column::UpdatedAt])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    Ok(())
}

/// Store every decoded option for `theme_id` in a single transaction.
pub async fn save_options(
    db: &DatabaseConnection,
    theme_id: Uuid,
    options: &[OptionValue],
) -> Result<usize, ThemeError> {
    let txn = db.begin().await?;

    for option in options {
        upsert_option(&txn, theme_id, &option.key, option.value.as_deref()).await?;
    }

    txn.commit().await?;

    tracing::info!(theme_id = %theme_id, count = options.len(), "theme options saved");
    Ok(options.len())
}

/// Decode and store a submission. Returns the number of options written.
pub async fn save_submission(
    db: &DatabaseConnection,
    theme_id: Uuid,
    submission: &Submission,
    converter: &dyn FieldConverter,
) -> Result<usize, ThemeError> {
    let options = decode_submission(submission, converter)?;
    save_options(db, theme_id, &options).await
}

/// All options stored for a theme, ordered by key.
pub async fn list_options<C: ConnectionTrait>(
    db: &C,
    theme_id: Uuid,
) -> Result<Vec<theme_option::Model>, ThemeError> {
    Ok(theme_option::Entity::find()
        .filter(theme_option::Column::ThemeId.eq(theme_id))
        .order_by_asc(theme_option::Column::Key)
        .all(db)
        .await?)
}

/// Stored value for one option, `None` when unset or stored as null.
pub async fn option_value<C: ConnectionTrait>(
    db: &C,
    theme_id: Uuid,
    key: &str,
) -> Result<Option<String>, ThemeError> {
    Ok(theme_option::Entity::find()
        .filter(theme_option::Column::ThemeId.eq(theme_id))
        .filter(theme_option::Column::Key.eq(key))
        .one(db)
        .await?
        .and_then(|o| o.value))
}
