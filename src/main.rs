use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, RestConfig, router};
use tracker_core::constants::DEFAULT_DATABASE_PATH;
use tracker_core::{CoreConfig, Database, page_size_from_env_value};

/// Main entry point for the patient tracker
///
/// Opens (and migrates) the SQLite database, then serves the site over HTTP until interrupted.
///
/// # Environment Variables
/// - `TRACKER_DATABASE`: SQLite database file (default: "tracker.sqlite3")
/// - `TRACKER_PAGE_SIZE`: Rows per listing page (default: 25)
/// - `TRACKER_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `TRACKER_SESSION_TTL_SECS`: Idle session lifetime (default: two weeks)
/// - `TRACKER_SECURE_COOKIES`: Mark the session cookie `Secure` (default: false)
///
/// # Errors
/// Returns an error if the configuration is invalid, the database cannot be opened or migrated,
/// the address cannot be bound, or the server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("tracker_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("tracker_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_path = std::env::var("TRACKER_DATABASE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATABASE_PATH));
    let page_size = page_size_from_env_value(std::env::var("TRACKER_PAGE_SIZE").ok())?;
    let cfg = Arc::new(CoreConfig::new(database_path, page_size)?);

    let rest_cfg = RestConfig::from_env_values(
        std::env::var("TRACKER_REST_ADDR").ok(),
        std::env::var("TRACKER_SESSION_TTL_SECS").ok(),
        std::env::var("TRACKER_SECURE_COOKIES").ok(),
    )?;

    let db = Database::open(cfg.database_path())?;
    tracing::info!(
        path = %cfg.database_path().display(),
        schema_version = db.schema_version()?,
        "database ready"
    );

    let app = router(AppState::new(cfg, &rest_cfg, db));

    tracing::info!("++ Starting tracker on {}", rest_cfg.addr());
    let listener = tokio::net::TcpListener::bind(rest_cfg.addr()).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("-- Tracker stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {err}");
    }
}
