//! HTTP surface of the theme system.

pub mod api;
pub mod flash;
pub mod state;

use axum::{
    http::HeaderValue,
    routing::{delete, get},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{services::ServeDir, set_header::SetResponseHeaderLayer, trace::TraceLayer};

pub use state::AppState;

#[derive(Serialize)]
struct ApiStatus {
    status: &'static str,
    version: &'static str,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    let admin = Router::new()
        .route("/themes", get(api::themes::index))
        .route("/themes/activate/{folder}", get(api::themes::activate_theme))
        .route("/themes/options", get(api::themes::options_index))
        .route(
            "/themes/options/{folder}",
            get(api::themes::options_view).post(api::themes::save_theme_options),
        )
        .route("/themes/delete", delete(api::themes::delete));

    let public_api = Router::new()
        .route("/themes/current", get(api::public::current_theme))
        .route("/themes/option/{key}", get(api::public::option));

    let assets = ServeDir::new(state.publisher().public_root());

    Router::new()
        .route("/healthz", get(healthz))
        .nest("/admin", admin)
        .nest("/api", public_api)
        .nest_service("/themes", assets)
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            axum::http::header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .with_state(state)
}

async fn healthz() -> Json<ApiStatus> {
    Json(ApiStatus {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
