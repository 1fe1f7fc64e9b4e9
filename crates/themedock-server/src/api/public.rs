//! Public theme lookups used by the rendering side of a host.

use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use themedock_core::{resolve_current_theme, theme_folder_url, theme_option, ThemeLayout};
use themedock_db::entities::theme;

use crate::flash::cookie_value;
use crate::state::AppState;

/// Cookie naming the folder a visitor previewing a theme wants rendered.
pub const THEME_COOKIE: &str = "theme";

#[derive(Debug, Serialize)]
pub struct CurrentTheme {
    pub theme: theme::Model,
    pub assets_url: String,
    pub layout: ThemeLayout,
}

/// GET /api/themes/current
pub async fn current_theme(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, (StatusCode, Json<serde_json::Value>)> {
    let cookie = cookie_value(&headers, THEME_COOKIE);

    let current = resolve_current_theme(&state.db, cookie.as_deref())
        .await
        .map_err(|e| {
            tracing::error!("failed to resolve current theme: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?;

    let Some(theme) = current else {
        return Ok(StatusCode::NO_CONTENT.into_response());
    };

    let assets_url = theme_folder_url(&state.config.base_url, &theme, "/").map_err(|e| {
        tracing::error!(folder = %theme.folder, "failed to build theme url: {e}");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )
    })?;

    // the registry row may outlive its folder
    let layout = ThemeLayout::discover(&state.config.themes_root, &theme.folder)
        .await
        .unwrap_or_default();

    Ok(Json(CurrentTheme {
        theme,
        assets_url,
        layout,
    })
    .into_response())
}

#[derive(Debug, Deserialize)]
pub struct OptionQuery {
    #[serde(default)]
    pub default: String,
}

/// GET /api/themes/option/{key}?default=
pub async fn option(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Query(query): Query<OptionQuery>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
    let cookie = cookie_value(&headers, THEME_COOKIE);

    let value = theme_option(&state.db, cookie.as_deref(), &key, &query.default)
        .await
        .map_err(|e| {
            tracing::error!(key = %key, "failed to read theme option: {e}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": e.to_string() })),
            )
        })?;

    Ok(Json(json!({ "key": key, "value": value })))
}
