//! Account types.
//!
//! An [`Account`] is immutable once loaded. The scheduler owns it and hands
//! read-only references to the tasks spawned for it.

use std::fmt;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::service::ServiceKind;
use crate::error::CoreError;

// ============================================================================
// Account Id
// ============================================================================

/// Opaque account identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(String);

impl AccountId {
    /// Creates a new account id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for AccountId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

// ============================================================================
// Credentials
// ============================================================================

/// Opaque credential/session payload for one account.
///
/// Only the service port for the account knows which fields it needs.
/// `Debug` prints field names only, never values.
#[derive(Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Credentials(Map<String, Value>);

impl Credentials {
    /// Wraps a JSON object.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self(fields)
    }

    /// Builds credentials from any JSON value; non-objects are rejected.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            Value::Null => Ok(Self::default()),
            other => Err(CoreError::InvalidConfig(format!(
                "credentials must be an object, got {other}"
            ))),
        }
    }

    /// Returns a raw field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a required string field.
    pub fn require_str(&self, key: &str) -> Result<&str, CoreError> {
        match self.0.get(key) {
            Some(Value::String(s)) => Ok(s),
            Some(_) => Err(CoreError::InvalidCredential {
                field: key.to_string(),
                reason: "expected a string".to_string(),
            }),
            None => Err(CoreError::MissingCredential(key.to_string())),
        }
    }

    /// Returns a required integer field, accepting numeric strings.
    pub fn require_i64(&self, key: &str) -> Result<i64, CoreError> {
        let invalid = |reason: &str| CoreError::InvalidCredential {
            field: key.to_string(),
            reason: reason.to_string(),
        };

        match self.0.get(key) {
            Some(Value::Number(n)) => n.as_i64().ok_or_else(|| invalid("not an integer")),
            Some(Value::String(s)) => s.trim().parse().map_err(|_| invalid("not an integer")),
            Some(_) => Err(invalid("expected an integer")),
            None => Err(CoreError::MissingCredential(key.to_string())),
        }
    }

    /// Deserializes the whole payload into a typed credential struct.
    pub fn parse<T: DeserializeOwned>(&self) -> Result<T, CoreError> {
        Ok(serde_json::from_value(Value::Object(self.0.clone()))?)
    }

    /// Returns the underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }

    /// Returns true if no fields are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.0.keys()).finish()
    }
}

// ============================================================================
// Account
// ============================================================================

/// One configured account.
#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    /// Account identifier, unique within its service.
    pub id: AccountId,
    /// Which remote service this account farms.
    pub service: ServiceKind,
    /// Credential/session payload for the service.
    pub credentials: Credentials,
    /// Interval override; `None` uses the service default.
    pub interval: Option<Duration>,
    /// Whether the ticket sub-loop runs for this account.
    pub tickets_enabled: bool,
}

impl Account {
    /// Creates an account with the service default interval and tickets enabled.
    pub fn new(id: impl Into<AccountId>, service: ServiceKind, credentials: Credentials) -> Self {
        Self {
            id: id.into(),
            service,
            credentials,
            interval: None,
            tickets_enabled: true,
        }
    }

    /// Sets the interval override.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Enables or disables the ticket sub-loop.
    pub fn with_tickets(mut self, enabled: bool) -> Self {
        self.tickets_enabled = enabled;
        self
    }

    /// Effective farming interval.
    pub fn interval(&self) -> Duration {
        self.interval
            .unwrap_or_else(|| self.service.default_interval())
    }

    /// Log label, e.g. `MATCHCHAIN - 12345`.
    pub fn label(&self) -> String {
        format!("{} - {}", self.service.tag(), self.id)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn creds(value: Value) -> Credentials {
        Credentials::from_value(value).unwrap()
    }

    #[test]
    fn test_interval_defaults_to_service() {
        let account = Account::new("a", ServiceKind::Matchain, Credentials::default());
        assert_eq!(account.interval(), Duration::from_secs(8 * 3600));

        let account = account.with_interval(Duration::from_secs(60));
        assert_eq!(account.interval(), Duration::from_secs(60));
    }

    #[test]
    fn test_require_i64_accepts_numeric_strings() {
        let c = creds(json!({"uid": "123", "n": 7, "bad": "x"}));
        assert_eq!(c.require_i64("uid").unwrap(), 123);
        assert_eq!(c.require_i64("n").unwrap(), 7);
        assert!(matches!(
            c.require_i64("bad"),
            Err(CoreError::InvalidCredential { .. })
        ));
        assert!(matches!(
            c.require_i64("missing"),
            Err(CoreError::MissingCredential(_))
        ));
    }

    #[test]
    fn test_debug_hides_values() {
        let c = creds(json!({"authorization": "secret-token"}));
        let printed = format!("{c:?}");
        assert!(printed.contains("authorization"));
        assert!(!printed.contains("secret-token"));
    }

    #[test]
    fn test_non_object_credentials_rejected() {
        assert!(Credentials::from_value(json!([1, 2])).is_err());
        assert!(Credentials::from_value(Value::Null).unwrap().is_empty());
    }

    #[test]
    fn test_label() {
        let account = Account::new("42", ServiceKind::Hot, Credentials::default());
        assert_eq!(account.label(), "HOT - 42");
    }
}
