use anyhow::Result;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::net::SocketAddr;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::Config;
use crate::db;
use crate::handlers;
use crate::handlers::telemetry::AppState;
use crate::repository::telemetry::TelemetryRepository;

/// Start the telemetry API server
///
/// This function:
/// 1. Connects to the store and runs migrations
/// 2. Builds the Axum application
/// 3. Binds to the configured address
/// 4. Serves requests with graceful shutdown support
pub async fn start_server(config: Config) -> Result<()> {
    let pool = db::create_pool(&config.database.url).await?;
    info!(database = %config.database.url, "Telemetry store ready");

    let state = AppState {
        repository: TelemetryRepository::new(pool),
    };
    let app = create_router(state);

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));
    info!("Starting telemetry API on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped gracefully");
    Ok(())
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/telemetry",
            get(handlers::telemetry::list_telemetry).post(handlers::telemetry::create_telemetry),
        )
        .route(
            "/telemetry/:id",
            get(handlers::telemetry::get_telemetry).delete(handlers::telemetry::delete_telemetry),
        )
        .route("/health", get(handlers::health::health_check))
        .with_state(state)
        // Cap request bodies at 1MB; telemetry payloads are tiny
        .layer(DefaultBodyLimit::max(1024 * 1024))
        // The dashboard frontend is served from a different origin
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Resolves when SIGINT or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install ctrl-c handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections...");
}
