//! Admin endpoints for listing, activating, configuring and deleting themes.
//!
//! Every mutating route answers with a `303` redirect carrying a flash
//! message; listing and option views answer with JSON.

use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use themedock_core::options::list_options;
use themedock_core::registry::{list_themes, require_by_folder};
use themedock_core::{
    activate, delete_theme, save_submission, ReconcileReport, ReconcileWarning, Reconciler,
    Submission, ThemeError,
};
use themedock_db::entities::theme;
use uuid::Uuid;

use crate::flash::{clear_flash_cookie, redirect_with_flash, take_flash, Flash};
use crate::state::AppState;

pub const INDEX_PATH: &str = "/admin/themes";

type ApiError = (StatusCode, Json<serde_json::Value>);

fn internal_error(e: ThemeError) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": e.to_string() })),
    )
}

/// A registered theme plus whether its folder is still on disk.
#[derive(Debug, Serialize)]
pub struct ThemeEntry {
    #[serde(flatten)]
    pub theme: theme::Model,
    pub orphaned: bool,
}

#[derive(Debug, Serialize)]
pub struct ThemeIndex {
    pub themes: Vec<ThemeEntry>,
    pub flash: Option<Flash>,
    pub warnings: Vec<ReconcileWarning>,
}

/// GET /admin/themes: reconcile with disk, then list themes.
pub async fn index(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let reconciler = Reconciler::new(state.db.clone(), state.config.clone());
    let report = match reconciler.reconcile().await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("theme reconciliation failed: {e}");
            ReconcileReport::default()
        }
    };

    let themes = list_themes(&state.db).await.map_err(|e| {
        tracing::error!("failed to list themes: {e}");
        internal_error(e)
    })?;

    let flash = take_flash(&headers);
    let had_flash = flash.is_some();
    let body = ThemeIndex {
        themes: themes
            .into_iter()
            .map(|theme| ThemeEntry {
                orphaned: report.is_orphaned(&theme.folder),
                theme,
            })
            .collect(),
        flash,
        warnings: report.warnings,
    };

    let mut response = Json(body).into_response();
    if had_flash {
        if let Ok(value) = HeaderValue::from_str(&clear_flash_cookie()) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    Ok(response)
}

/// GET /admin/themes/activate/{folder}
pub async fn activate_theme(
    State(state): State<Arc<AppState>>,
    Path(folder): Path<String>,
) -> Response {
    match activate(&state.db, &folder).await {
        Ok(theme) => redirect_with_flash(
            INDEX_PATH,
            Flash::success(format!("Successfully activated {} theme.", theme.name)),
        ),
        Err(e) if e.is_not_found() => redirect_with_flash(
            INDEX_PATH,
            Flash::error(format!("Could not find theme {folder}.")),
        ),
        Err(e) => {
            tracing::error!(folder = %folder, "failed to activate theme: {e}");
            redirect_with_flash(
                INDEX_PATH,
                Flash::error(format!("Could not activate theme {folder}.")),
            )
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ThemeOptionsView {
    pub theme: theme::Model,
    pub options: BTreeMap<String, Option<String>>,
}

/// GET /admin/themes/options/{folder}
pub async fn options_view(
    State(state): State<Arc<AppState>>,
    Path(folder): Path<String>,
) -> Response {
    let theme = match require_by_folder(&state.db, &folder).await {
        Ok(theme) => theme,
        Err(e) => return lookup_failure(&folder, e),
    };

    match list_options(&state.db, theme.id).await {
        Ok(options) => Json(ThemeOptionsView {
            theme,
            options: options.into_iter().map(|o| (o.key, o.value)).collect(),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(folder = %folder, "failed to load theme options: {e}");
            internal_error(e).into_response()
        }
    }
}

/// GET /admin/themes/options
pub async fn options_index() -> Response {
    (StatusCode::SEE_OTHER, [(header::LOCATION, INDEX_PATH)]).into_response()
}

/// POST /admin/themes/options/{folder}
pub async fn save_theme_options(
    State(state): State<Arc<AppState>>,
    Path(folder): Path<String>,
    headers: HeaderMap,
    Form(fields): Form<Vec<(String, String)>>,
) -> Response {
    let theme = match require_by_folder(&state.db, &folder).await {
        Ok(theme) => theme,
        Err(e) => return lookup_failure(&folder, e),
    };

    let back = back_location(&headers, &format!("{INDEX_PATH}/options/{folder}"));
    let submission = Submission::from(fields);

    match save_submission(&state.db, theme.id, &submission, state.converter.as_ref()).await {
        Ok(_) => redirect_with_flash(&back, Flash::success("Successfully Saved Theme Options")),
        Err(e @ ThemeError::InvalidField { .. }) => {
            redirect_with_flash(&back, Flash::error(e.to_string()))
        }
        Err(e) => {
            tracing::error!(folder = %folder, "failed to save theme options: {e}");
            redirect_with_flash(&back, Flash::error("Could not save theme options"))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DeleteThemeForm {
    pub id: String,
}

/// DELETE /admin/themes/delete
pub async fn delete(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<DeleteThemeForm>,
) -> Response {
    let back = back_location(&headers, INDEX_PATH);
    let not_found = || redirect_with_flash(&back, Flash::error("Could not find theme to delete"));

    let Ok(id) = Uuid::parse_str(form.id.trim()) else {
        return not_found();
    };

    match delete_theme(&state.db, &state.publisher(), id).await {
        Ok(deleted) => redirect_with_flash(
            &back,
            Flash::success(format!("Successfully deleted theme {}", deleted.name)),
        ),
        Err(e) if e.is_not_found() => not_found(),
        Err(e) => {
            tracing::error!(theme_id = %id, "failed to delete theme: {e}");
            redirect_with_flash(&back, Flash::error("Could not delete theme"))
        }
    }
}

fn lookup_failure(folder: &str, e: ThemeError) -> Response {
    if !e.is_not_found() {
        tracing::error!(folder = %folder, "failed to look up theme: {e}");
    }
    redirect_with_flash(
        INDEX_PATH,
        Flash::error(format!("Could not find theme {folder}.")),
    )
}

/// Same-site path of the `Referer`, or `fallback`.
///
/// Only the path and query are kept so a forged header cannot redirect off-site.
pub fn back_location(headers: &HeaderMap, fallback: &str) -> String {
    let Some(referer) = headers.get(header::REFERER).and_then(|v| v.to_str().ok()) else {
        return fallback.to_string();
    };

    if referer.starts_with('/') && !referer.starts_with("//") {
        return referer.to_string();
    }

    match url::Url::parse(referer) {
        Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => match parsed.query() {
            Some(query) => format!("{}?{query}", parsed.path()),
            None => parsed.path().to_string(),
        },
        _ => fallback.to_string(),
    }
}
