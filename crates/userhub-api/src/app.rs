//! Application builder wiring router, middleware, and state into an Axum app.

use axum::Router;
use tokio::sync::watch;

use userhub_core::config::AppConfig;
use userhub_core::error::AppError;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state).layer(cors)
}

/// Runs the UserHub server until Ctrl+C.
///
/// Sessions and identities live in memory for the lifetime of the process.
pub async fn run_server(config: AppConfig) -> Result<(), AppError> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let cleanup_interval = config.session.cleanup_interval();

    let state = AppState::in_memory(config);

    // ── Session cleanup ──────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let cleanup_handle = state
        .session_cleanup()
        .spawn(cleanup_interval, shutdown_rx);

    // ── HTTP server ──────────────────────────────────────────────
    let app = build_app(state);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("UserHub server listening on {}", addr);

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")));

    let _ = shutdown_tx.send(true);
    if let Err(e) = cleanup_handle.await {
        tracing::warn!(error = %e, "Session cleanup task ended abnormally");
    }

    tracing::info!("UserHub server stopped");
    served
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
