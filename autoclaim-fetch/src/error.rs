//! Fetch error types.

use thiserror::Error;

/// Error type for raw remote calls, before classification.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success HTTP status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Application code from the response body, if any.
        code: Option<i64>,
        /// Remote message, or the raw body.
        message: String,
    },

    /// Success status, but the body envelope reports a failure.
    #[error("Rejected with code {code}: {message}")]
    Rejected {
        /// Application code from the envelope.
        code: i64,
        /// Remote message.
        message: String,
    },

    /// Response body did not have the expected shape.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// JSON parsing error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A header value could not be encoded.
    #[error("Invalid header {name}: {reason}")]
    InvalidHeader {
        /// Header name.
        name: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Account credentials are missing or malformed.
    #[error("Credentials error: {0}")]
    Credentials(#[from] autoclaim_core::CoreError),
}

impl FetchError {
    /// Returns the remote's message for status/envelope failures.
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Status { message, .. } | Self::Rejected { message, .. } => Some(message),
            _ => None,
        }
    }
}
