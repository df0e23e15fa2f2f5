//! Store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or saving configuration.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The configuration file does not exist.
    #[error("Config file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential payload rejected.
    #[error("Account {account}: {source}")]
    Credentials {
        /// Offending account id.
        account: String,
        /// Underlying error.
        #[source]
        source: autoclaim_core::CoreError,
    },
}

impl StoreError {
    /// Returns true if the error means the user has to fix the file.
    pub fn is_config_problem(&self) -> bool {
        matches!(
            self,
            StoreError::Config(_) | StoreError::Serialization(_) | StoreError::Credentials { .. }
        )
    }
}
