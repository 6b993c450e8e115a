//! Convenience result type alias for chathub.

use crate::error::AppError;

/// A specialized `Result` type for chathub operations.
pub type AppResult<T> = Result<T, AppError>;
