//! CORS policy.
//!
//! Browsers only read health JSON, load static assets and POST raw bodies, so
//! `Content-Type` is the only request header allowed. Configured entries that
//! fail to parse are logged and skipped.

use std::str::FromStr;
use std::time::Duration;

use axum::http::{HeaderValue, Method, header};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use chathub_core::config::CorsConfig;

/// Builds the CORS layer from configuration.
pub fn build_cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(allowed_origins(&config.allowed_origins))
        .allow_methods(parse_entries::<Method>(&config.allowed_methods, "method"))
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(config.max_age_seconds))
}

fn allowed_origins(origins: &[String]) -> AllowOrigin {
    if origins.iter().any(|o| o == "*") {
        return AllowOrigin::any();
    }
    AllowOrigin::list(parse_entries::<HeaderValue>(origins, "origin"))
}

fn parse_entries<T: FromStr>(entries: &[String], what: &str) -> Vec<T> {
    entries
        .iter()
        .filter_map(|entry| match entry.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!(entry = %entry, "Ignoring invalid CORS {what}");
                None
            }
        })
        .collect()
}
