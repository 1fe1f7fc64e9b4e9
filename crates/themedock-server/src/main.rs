use sea_orm_migration::MigratorTrait;
use std::net::SocketAddr;
use std::sync::Arc;
use themedock_core::ThemesConfig;
use themedock_server::AppState;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Database connection
    let db_config = themedock_db::DatabaseConfig::from_env();
    tracing::info!("connecting to database...");
    let db = themedock_db::connect(&db_config)
        .await
        .expect("failed to connect to database");

    let config = ThemesConfig::from_env();

    if config.create_tables {
        tracing::info!("running database migrations...");
        themedock_migration::Migrator::up(&db, None)
            .await
            .expect("failed to run migrations");
        tracing::info!("migrations complete");
    } else {
        tracing::info!("THEMES_CREATE_TABLES disabled, skipping migrations");
    }

    tracing::info!(
        themes_root = %config.themes_root.display(),
        public_root = %config.public_root.display(),
        publish_assets = config.publish_assets,
        "theme configuration loaded"
    );

    let state = Arc::new(AppState::new(db, config));
    let app = themedock_server::router(state);

    let addr: SocketAddr = std::env::var("THEMES_BIND_ADDR")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or_else(|| SocketAddr::from(([0, 0, 0, 0], 8080)));
    tracing::info!(%addr, "server started");

    axum::serve(
        tokio::net::TcpListener::bind(addr)
            .await
            .expect("failed to bind listen address"),
        app,
    )
    .await
    .expect("server error");
}
