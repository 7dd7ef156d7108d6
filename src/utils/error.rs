//! Error Handling
//!
//! Unified error types for the engine crate.
//! Uses thiserror for ergonomic error definitions.

use casedesk_core::CoreError;
use thiserror::Error;

/// Engine-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    /// Errors propagated from the core crate (capabilities, validation)
    #[error(transparent)]
    Core(#[from] CoreError),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Confirmation lifecycle errors
    #[error("Confirmation error: {0}")]
    Confirmation(String),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for engine errors
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    /// Create a confirmation error
    pub fn confirmation(msg: impl Into<String>) -> Self {
        Self::Confirmation(msg.into())
    }

    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

/// Convert AppError to a string suitable for host-facing responses
impl From<AppError> for String {
    fn from(err: AppError) -> String {
        err.to_string()
    }
}
