//! Result alias used throughout Larkboard.

use crate::error::AppError;

/// A `Result` whose error type is the unified [`AppError`].
pub type AppResult<T> = Result<T, AppError>;
