pub mod api; // REST API under /api
pub mod config;
pub mod core_state; // Transport-agnostic state
pub mod db;
pub mod integrity; // Referential integrity guard
pub mod models;
pub mod web; // HTML pages under /clinica

use std::sync::Arc;

use axum::response::Redirect;
use axum::routing::get;
use axum::Router;
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::core_state::{CoreError, CoreState};

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("Cannot open database: {0}")]
    Database(#[from] CoreError),
    #[error("Cannot start server: {0}")]
    Server(String),
    #[error("Cannot listen for shutdown signal: {0}")]
    Signal(#[from] std::io::Error),
}

/// The full application: REST API, HTML pages, audit logging and CORS.
pub fn build_app(core: Arc<CoreState>, cors_allow_all: bool) -> Router {
    let app = Router::new()
        .route("/", get(|| async { Redirect::to("/clinica/") }))
        .merge(api::api_router(core.clone()))
        .merge(web::web_router(core))
        .fallback(web::handlers::not_found)
        .layer(axum::middleware::from_fn(api::middleware::audit::log_access));

    if cors_allow_all {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

/// Install the tracing subscriber; `RUST_LOG` overrides the configured filter.
pub fn init_tracing(config: &ServerConfig) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .init();
}

/// Open the database, serve until Ctrl-C, then shut down gracefully.
pub async fn run(config: ServerConfig) -> Result<(), StartupError> {
    tracing::info!("{} starting v{}", config::APP_NAME, config::APP_VERSION);

    let db_path = config.db_path();
    let core = Arc::new(CoreState::open(&db_path)?);
    let cors_allow_all = config.cors_allow_all();
    if cors_allow_all {
        tracing::warn!("CORS allows every origin");
    }

    let app = build_app(core, cors_allow_all);
    let mut server = api::start_server_on(app, config.bind)
        .await
        .map_err(StartupError::Server)?;
    tracing::info!(
        addr = %server.session.server_addr,
        db = %db_path.display(),
        debug = config.debug,
        "Listening"
    );

    tokio::signal::ctrl_c().await?;
    server.shutdown();
    server.stopped().await;
    Ok(())
}
