//! Route definitions for the chathub HTTP API.
//!
//! `/subscribe` upgrades to a WebSocket, `/publish` accepts broadcasts and
//! any other path falls through to the static file directory.

use std::time::Duration;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware as axum_middleware,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the Axum router with all routes and request middleware.
pub fn build_router(state: AppState) -> Router {
    let max_publish = state.config.hub.max_publish_bytes;
    let request_timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let static_dir = ServeDir::new(&state.config.server.static_dir);

    // WebSocket sessions are long-lived; only plain requests get the timeout.
    let http_routes = Router::new()
        .merge(publish_routes(max_publish))
        .merge(health_routes())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ));

    Router::new()
        .route("/subscribe", get(handlers::ws::subscribe))
        .merge(http_routes)
        .fallback_service(static_dir)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Publish endpoint, POST only.
fn publish_routes(max_publish: usize) -> Router<AppState> {
    Router::new()
        .route("/publish", post(handlers::publish::publish))
        .layer(DefaultBodyLimit::max(max_publish))
}

/// Health endpoints
fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
}
