//! Claim outcomes and the failure taxonomy.
//!
//! Every remote call returns a [`ClaimOutcome`]. Failures carry a
//! [`FailureKind`] that decides what the caller does next:
//!
//! | Kind | Retried | Meaning |
//! |------|---------|---------|
//! | `Transient` | yes | network, timeout, 5xx |
//! | `AlreadyClaimed` | no | window not elapsed / someone else took it |
//! | `GameExpired` | no | remote play no longer exists |
//! | `Fatal` | no | auth or validation failure |
//! | `ProtocolAnomaly` | no | remote broke an expected invariant |
//! | `Cancelled` | no | the enclosing cycle was cancelled |

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// Failure Kind
// ============================================================================

/// Classification of a failed remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Retryable (network, timeout, 5xx).
    Transient,
    /// Remote says the claim window has not elapsed; not an error.
    AlreadyClaimed,
    /// Remote says the play no longer exists; not an error.
    GameExpired,
    /// Authentication or validation failure.
    Fatal,
    /// Remote violated an expected invariant (e.g. a counter never decreasing).
    ProtocolAnomaly,
    /// The enclosing cycle was cancelled before a result was produced.
    Cancelled,
}

impl FailureKind {
    /// Returns true if the failure may be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transient)
    }

    /// Returns true if the failure is a normal terminal outcome, not an error.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::AlreadyClaimed | Self::GameExpired)
    }

    /// Snake-case name, as used in config files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transient => "transient",
            Self::AlreadyClaimed => "already_claimed",
            Self::GameExpired => "game_expired",
            Self::Fatal => "fatal",
            Self::ProtocolAnomaly => "protocol_anomaly",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Claim Failure
// ============================================================================

/// A classified failure of a remote call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ClaimFailure {
    /// Classification.
    pub kind: FailureKind,
    /// Human-readable detail, usually the remote's own message.
    pub message: String,
}

impl ClaimFailure {
    /// Creates a failure with the given classification.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a transient failure.
    pub fn transient(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Transient, message)
    }

    /// Creates an already-claimed failure.
    pub fn already_claimed(message: impl Into<String>) -> Self {
        Self::new(FailureKind::AlreadyClaimed, message)
    }

    /// Creates a game-expired failure.
    pub fn game_expired(message: impl Into<String>) -> Self {
        Self::new(FailureKind::GameExpired, message)
    }

    /// Creates a fatal failure.
    pub fn fatal(message: impl Into<String>) -> Self {
        Self::new(FailureKind::Fatal, message)
    }

    /// Creates a protocol-anomaly failure.
    pub fn protocol_anomaly(message: impl Into<String>) -> Self {
        Self::new(FailureKind::ProtocolAnomaly, message)
    }

    /// Creates a cancellation marker.
    pub fn cancelled() -> Self {
        Self::new(FailureKind::Cancelled, "cycle cancelled")
    }

    /// Returns true if this failure has the given kind.
    pub fn is(&self, kind: FailureKind) -> bool {
        self.kind == kind
    }
}

impl From<crate::CoreError> for ClaimFailure {
    /// Credential and config problems can never succeed on retry.
    fn from(err: crate::CoreError) -> Self {
        Self::fatal(err.to_string())
    }
}

/// Result of a remote call: the payload or a classified failure.
pub type ClaimOutcome<T> = Result<T, ClaimFailure>;

// ============================================================================
// Payloads
// ============================================================================

/// An established remote session.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    /// Creates a session from a bearer/authorization token.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Returns the session token.
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// What a successful stage produced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    /// Numeric balance-like figure, if the remote reported one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// Human-readable summary.
    pub detail: String,
}

impl Receipt {
    /// Creates a receipt with only a summary.
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            amount: None,
            detail: detail.into(),
        }
    }

    /// Creates a receipt with an amount.
    pub fn with_amount(amount: f64, detail: impl Into<String>) -> Self {
        Self {
            amount: Some(amount),
            detail: detail.into(),
        }
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.detail)
    }
}

/// Identifier of one started play in the ticket sub-loop.
///
/// Holds the id exactly as the remote returned it (string or number) so it
/// can be sent back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayId(Value);

impl PlayId {
    /// Creates a string play id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(Value::String(id.into()))
    }

    /// Wraps a raw remote id.
    pub fn from_value(id: Value) -> Self {
        Self(id)
    }

    /// Returns the id as the remote sent it.
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

impl fmt::Display for PlayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(id) => f.write_str(id),
            other => write!(f, "{other}"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_transient_is_retryable() {
        assert!(FailureKind::Transient.is_retryable());
        for kind in [
            FailureKind::AlreadyClaimed,
            FailureKind::GameExpired,
            FailureKind::Fatal,
            FailureKind::ProtocolAnomaly,
            FailureKind::Cancelled,
        ] {
            assert!(!kind.is_retryable(), "{kind} should not retry");
        }
    }

    #[test]
    fn test_failure_display() {
        let failure = ClaimFailure::already_claimed("too early");
        assert_eq!(failure.to_string(), "already_claimed: too early");
    }

    #[test]
    fn test_kind_serde_matches_as_str() {
        let json = serde_json::to_string(&FailureKind::GameExpired).unwrap();
        assert_eq!(json, format!("\"{}\"", FailureKind::GameExpired.as_str()));
    }

    #[test]
    fn test_play_id_keeps_remote_type() {
        let numeric = PlayId::from_value(serde_json::json!(42));
        assert_eq!(numeric.to_string(), "42");
        assert_eq!(serde_json::to_string(&numeric).unwrap(), "42");

        let text = PlayId::new("g-7");
        assert_eq!(text.to_string(), "g-7");
        assert_eq!(serde_json::to_string(&text).unwrap(), "\"g-7\"");
        assert_ne!(numeric, PlayId::new("42"));
    }

    #[test]
    fn test_session_debug_hides_token() {
        let session = Session::new("abc.def");
        assert!(!format!("{session:?}").contains("abc.def"));
        assert_eq!(session.token(), "abc.def");
    }
}
