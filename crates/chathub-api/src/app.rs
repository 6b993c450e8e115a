//! Application builder and server runner.

use std::time::Duration;

use axum::Router;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use chathub_core::config::AppConfig;
use chathub_core::AppResult;
use chathub_core::error::AppError;

use crate::middleware::cors::build_cors_layer;
use crate::router::build_router;
use crate::state::AppState;

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let cors = build_cors_layer(&state.config.server.cors);
    build_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Runs the chathub server until a shutdown signal arrives.
///
/// On shutdown the hub is cancelled first so every subscriber gets a
/// going-away close, then open sessions get up to
/// `server.shutdown_grace_seconds` to unregister.
pub async fn run_server(config: AppConfig) -> AppResult<()> {
    let state = AppState::new(config.clone());
    let hub = state.hub.clone();
    let app = build_app(state);

    let addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    info!("chathub listening on {}", addr);

    let signal_hub = hub.clone();
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            info!("Shutdown signal received");
            signal_hub.shutdown();
        })
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let drained = async {
        while hub.subscriber_count().await > 0 {
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
    };
    if tokio::time::timeout(grace, drained).await.is_err() {
        warn!(
            remaining = hub.metrics().snapshot().connections_active,
            "Shutdown grace period elapsed with subscribers still registered"
        );
    }

    info!("chathub stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
