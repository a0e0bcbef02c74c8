/// Server setup and initialization
///
/// Wires together the database, repositories, access tracker and HTTP routes.
/// Provides the main application factory function for creating the Axum app.

use crate::{
    api::{create_api_routes, AppState},
    config::Config,
    store::Database,
};
use anyhow::Result;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

/// Create the main Axum application with all routes and middleware
///
/// Opens (and migrates) the database before any route is built.
pub async fn create_app(config: Config) -> Result<Router> {
    tracing::info!("🗄️ Initializing database");
    let database = Database::connect(&config.database.url)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open database: {}", e))?;

    tracing::info!("📁 CSV exports go to: {}", config.export.dir);
    let state = AppState::new(database.pool().clone(), &config.export.dir);

    let app = build_router(state);
    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Router over an existing state: `/healthz` plus the API under `/api`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        .nest("/api", create_api_routes().with_state(state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Start the HTTP server with the given configuration
///
/// Creates the application and starts the Axum server on the configured address and port.
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting taskboard server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
