//! Request logging.
//!
//! Each request is tagged with the route it hit. Static assets and health
//! probes log at debug, server errors at warn, everything else at info.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info, warn};

/// Route a request path belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RouteClass {
    Subscribe,
    Publish,
    Health,
    Static,
}

impl RouteClass {
    fn of(path: &str) -> Self {
        match path {
            "/subscribe" => Self::Subscribe,
            "/publish" => Self::Publish,
            "/health" => Self::Health,
            p if p.starts_with("/health/") => Self::Health,
            _ => Self::Static,
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::Subscribe => "subscribe",
            Self::Publish => "publish",
            Self::Health => "health",
            Self::Static => "static",
        }
    }
}

/// Logs method, path, route, status and duration.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let route = RouteClass::of(&path);
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis() as u64;

    if status.is_server_error() {
        warn!(%method, %path, route = route.as_str(), status = status.as_u16(), duration_ms, "HTTP request failed");
    } else if matches!(route, RouteClass::Static | RouteClass::Health) {
        debug!(%method, %path, route = route.as_str(), status = status.as_u16(), duration_ms, "HTTP request");
    } else {
        info!(%method, %path, route = route.as_str(), status = status.as_u16(), duration_ms, "HTTP request");
    }

    response
}
