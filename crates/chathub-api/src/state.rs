//! Application state shared across all handlers and middleware.

use std::sync::Arc;
use std::time::Instant;

use chathub_core::config::AppConfig;
use chathub_realtime::Hub;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Broadcast hub
    pub hub: Arc<Hub>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Builds state and a fresh hub from configuration.
    pub fn new(config: AppConfig) -> Self {
        let hub = Arc::new(Hub::new(config.hub.clone()));
        Self {
            config: Arc::new(config),
            hub,
            started_at: Instant::now(),
        }
    }
}
