//! Provider construction errors.

use autoclaim_core::ServiceKind;
use autoclaim_fetch::FetchError;
use thiserror::Error;

/// Errors raised while building a service port.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] FetchError),

    /// A response rule failed to compile.
    #[error("Invalid response rule: {0}")]
    InvalidRule(#[from] regex::Error),

    /// No descriptor is registered for the service.
    #[error("No provider registered for {0}")]
    NotRegistered(ServiceKind),
}
