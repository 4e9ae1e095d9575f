//! Convenience result type alias for the data room crates.

use crate::error::AppError;

/// A specialized `Result` type for workspace operations.
pub type AppResult<T> = Result<T, AppError>;
