//! Realtime engine errors.

use std::time::Duration;

use thiserror::Error;

use chathub_core::error::AppError;

/// Errors raised by the hub, the publish limiter and subscriber sessions.
#[derive(Debug, Error)]
pub enum RealtimeError {
    /// The operation was cancelled (shutdown or caller gave up).
    #[error("operation cancelled")]
    Cancelled,
    /// A frame write did not complete within its deadline.
    #[error("write timed out after {0:?}")]
    WriteTimeout(Duration),
    /// The underlying connection failed.
    #[error("transport error: {0}")]
    Transport(String),
    /// An outbound envelope could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RealtimeError {
    /// Whether this error is a clean cancellation rather than a fault.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<RealtimeError> for AppError {
    fn from(err: RealtimeError) -> Self {
        match err {
            RealtimeError::Cancelled => AppError::cancelled("operation cancelled"),
            RealtimeError::WriteTimeout(d) => {
                AppError::transport(format!("write timed out after {d:?}"))
            }
            RealtimeError::Transport(msg) => AppError::transport(msg),
            RealtimeError::Serialization(e) => AppError::from(e),
        }
    }
}
