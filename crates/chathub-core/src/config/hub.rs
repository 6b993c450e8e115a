//! Broadcast hub configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Broadcast hub (fan-out, rate limiting, delivery) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HubConfig {
    /// Per-subscriber delivery queue capacity.
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Milliseconds between publish-limiter token refills.
    #[serde(default = "default_publish_interval")]
    pub publish_interval_ms: u64,
    /// Publish-limiter burst capacity.
    #[serde(default = "default_publish_burst")]
    pub publish_burst: u32,
    /// Deadline for a single outbound frame write.
    #[serde(default = "default_write_timeout")]
    pub write_timeout_seconds: u64,
    /// Maximum accepted publish body size in bytes.
    #[serde(default = "default_max_publish_bytes")]
    pub max_publish_bytes: usize,
    /// Whether WELCOME/LEAVE notifications consume publish-limiter tokens.
    #[serde(default = "default_true")]
    pub rate_limit_lifecycle: bool,
}

impl Default for HubConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            publish_interval_ms: default_publish_interval(),
            publish_burst: default_publish_burst(),
            write_timeout_seconds: default_write_timeout(),
            max_publish_bytes: default_max_publish_bytes(),
            rate_limit_lifecycle: default_true(),
        }
    }
}

impl HubConfig {
    /// Token refill interval as a `Duration`.
    pub fn publish_interval(&self) -> Duration {
        Duration::from_millis(self.publish_interval_ms)
    }

    /// Write deadline as a `Duration`.
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_seconds)
    }

    pub(crate) fn validate(&self) -> AppResult<()> {
        if self.queue_capacity == 0 {
            return Err(AppError::configuration("hub.queue_capacity must be > 0"));
        }
        if self.publish_interval_ms == 0 {
            return Err(AppError::configuration("hub.publish_interval_ms must be > 0"));
        }
        if self.publish_burst == 0 {
            return Err(AppError::configuration("hub.publish_burst must be > 0"));
        }
        if self.write_timeout_seconds == 0 {
            return Err(AppError::configuration("hub.write_timeout_seconds must be > 0"));
        }
        if self.max_publish_bytes == 0 {
            return Err(AppError::configuration("hub.max_publish_bytes must be > 0"));
        }
        Ok(())
    }
}

fn default_queue_capacity() -> usize {
    16
}

fn default_publish_interval() -> u64 {
    100
}

fn default_publish_burst() -> u32 {
    8
}

fn default_write_timeout() -> u64 {
    5
}

fn default_max_publish_bytes() -> usize {
    8192
}

fn default_true() -> bool {
    true
}
