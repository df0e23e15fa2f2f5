//! Core error types for autoclaim.

use thiserror::Error;

/// Core error type for autoclaim operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Unknown service name.
    #[error("Unknown service: {0}")]
    UnknownService(String),

    /// A credential field the service needs is absent.
    #[error("Missing credential field: {0}")]
    MissingCredential(String),

    /// A credential field has the wrong shape.
    #[error("Invalid credential field {field}: {reason}")]
    InvalidCredential {
        /// Field name.
        field: String,
        /// What was wrong with it.
        reason: String,
    },

    /// Invalid configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
