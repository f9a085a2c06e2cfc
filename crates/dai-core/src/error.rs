//! # AppError
//!
//! Centralized error handling for the D.A.I site store.
//! Persistence failures never reach callers of the store; these variants
//! cover what does.

use thiserror::Error;

/// The primary error type for all dai-core operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Rejected user input (e.g., empty testimonial name or text)
    #[error("validation error: {0}")]
    Validation(String),

    /// Admin-gated action attempted without the admin flag
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Adapter-level storage failure (e.g., unwritable directory, bad key)
    #[error("storage error: {0}")]
    Storage(String),
}

/// A specialized Result type for store logic.
pub type Result<T> = std::result::Result<T, AppError>;
