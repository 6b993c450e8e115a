//! # chathub-api
//!
//! HTTP layer for chathub built on Axum.
//!
//! Provides the `/subscribe` WebSocket upgrade, the `/publish` endpoint,
//! health checks, static file serving, middleware (CORS, request logging,
//! timeouts) and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
