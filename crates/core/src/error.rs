//! Core Error Types
//!
//! Defines the foundational error types used across the CaseDesk Assistant
//! workspace. These error types are dependency-free (only thiserror + serde_json)
//! to keep the core crate lightweight.
//!
//! The application crate extends these with engine-level variants.

use thiserror::Error;

/// Core error type for the CaseDesk Assistant workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Host capability errors (navigation, scrolling, mutation, messaging)
    #[error("Capability error: {0}")]
    Capability(String),

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

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a capability error
    pub fn capability(msg: impl Into<String>) -> Self {
        Self::Capability(msg.into())
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

/// Convert CoreError to a string
impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}
