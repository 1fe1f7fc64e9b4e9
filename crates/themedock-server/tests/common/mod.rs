// Shared test utilities for HTTP integration tests
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request, Response};
use axum::Router;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use themedock_core::ThemesConfig;
use themedock_migration::{Migrator, MigratorTrait};
use themedock_server::AppState;
use tower::ServiceExt;

pub struct TestApp {
    pub state: Arc<AppState>,
    _dir: tempfile::TempDir,
}

impl TestApp {
    /// Migrated SQLite registry and empty themes/public roots in a temp dir.
    pub async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("registry.db").display());

        let mut opt = ConnectOptions::new(url);
        opt.sqlx_logging(false);
        let db = Database::connect(opt).await.unwrap();
        Migrator::up(&db, None).await.unwrap();

        let config = ThemesConfig::new(dir.path().join("themes"), dir.path().join("public/themes"));

        Self {
            state: Arc::new(AppState::new(db, config)),
            _dir: dir,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.state.db
    }

    pub fn themes_root(&self) -> &Path {
        &self.state.config.themes_root
    }

    pub fn public_root(&self) -> &Path {
        &self.state.config.public_root
    }

    pub fn router(&self) -> Router {
        themedock_server::router(self.state.clone())
    }

    /// A complete theme folder: manifest, `assets/` and a preview image.
    pub fn write_theme(&self, folder: &str, name: &str, version: &str) -> PathBuf {
        let dir = self.themes_root().join(folder);
        std::fs::create_dir_all(dir.join("assets/css")).unwrap();
        std::fs::write(
            dir.join(format!("{folder}.json")),
            format!(r#"{{"name":"{name}","version":"{version}"}}"#),
        )
        .unwrap();
        std::fs::write(dir.join("assets/css/app.css"), "body{color:red}").unwrap();
        std::fs::write(dir.join(format!("{folder}.jpg")), [0xffu8, 0xd8, 0xff]).unwrap();
        dir
    }

    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router().oneshot(request).await.unwrap()
    }

    pub async fn get(&self, uri: &str) -> Response<Body> {
        self.send(Request::get(uri).body(Body::empty()).unwrap()).await
    }

    /// Run the implicit reconciliation of the index page.
    pub async fn visit_index(&self) -> serde_json::Value {
        let response = self.get("/admin/themes").await;
        assert_eq!(response.status(), 200);
        json_body(response).await
    }
}

pub fn form_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub fn location(response: &Response<Body>) -> &str {
    response.headers()[header::LOCATION].to_str().unwrap()
}

/// Decoded flash message set by a redirect.
pub fn flash(response: &Response<Body>) -> serde_json::Value {
    let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    let raw = cookie
        .split(';')
        .next()
        .and_then(|pair| pair.strip_prefix("flash="))
        .unwrap();
    serde_json::from_str(&urlencoding::decode(raw).unwrap()).unwrap()
}
