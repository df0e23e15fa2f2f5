//! Configuration management.
//!
//! One JSON file describes the accounts and the tunables of a run. Every
//! field except `accounts` has a default.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

use autoclaim_core::{Account, Credentials, ServiceKind};
use autoclaim_fetch::{ResponseRule, RetryBudget};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{default_config_path, load_json, save_json};

// ============================================================================
// Sections
// ============================================================================

/// Retry settings for every remote call after login.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrySettings {
    /// Retries after the first attempt.
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Fixed delay between attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    pub delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            delay_ms: default_retry_delay_ms(),
        }
    }
}

/// Ticket sub-loop timings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketSettings {
    /// Wait between starting a play and claiming it, in milliseconds.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
    /// Wait between plays, in milliseconds.
    #[serde(default = "default_play_delay_ms")]
    pub play_delay_ms: u64,
    /// Cap on plays per sub-loop run.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,
}

impl TicketSettings {
    /// Settle delay as a [`Duration`].
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    /// Play delay as a [`Duration`].
    pub fn play_delay(&self) -> Duration {
        Duration::from_millis(self.play_delay_ms)
    }
}

impl Default for TicketSettings {
    fn default() -> Self {
        Self {
            settle_delay_ms: default_settle_delay_ms(),
            play_delay_ms: default_play_delay_ms(),
            max_iterations: default_max_iterations(),
        }
    }
}

/// One configured account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    /// Account id, unique within its service.
    pub id: String,
    /// Service name (`hot`, `matchain`, `vooi`, `supermeow`).
    pub service: ServiceKind,
    /// Interval override in hours; unset uses the service default.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_hours: Option<f64>,
    /// Whether the ticket sub-loop runs for this account.
    #[serde(default = "default_true")]
    pub tickets: bool,
    /// Opaque payload handed to the service port.
    #[serde(default)]
    pub credentials: Credentials,
}

impl AccountConfig {
    /// Effective interval override, if one is configured.
    pub fn interval(&self) -> Result<Option<Duration>, StoreError> {
        let Some(hours) = self.interval_hours else {
            return Ok(None);
        };
        if !(hours.is_finite() && hours > 0.0) {
            return Err(StoreError::Config(format!(
                "account {} ({}): interval_hours must be positive, got {hours}",
                self.id,
                self.service.cli_name()
            )));
        }
        Duration::try_from_secs_f64(hours * 3600.0)
            .map(Some)
            .map_err(|e| {
                StoreError::Config(format!(
                    "account {} ({}): interval_hours {hours}: {e}",
                    self.id,
                    self.service.cli_name()
                ))
            })
    }

    /// Converts to an engine [`Account`].
    pub fn to_account(&self) -> Result<Account, StoreError> {
        let mut account = Account::new(self.id.as_str(), self.service, self.credentials.clone())
            .with_tickets(self.tickets);
        if let Some(interval) = self.interval()? {
            account = account.with_interval(interval);
        }
        Ok(account)
    }
}

// ============================================================================
// Application Config
// ============================================================================

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Append-only log file; `null` disables it.
    #[serde(default = "default_log_file")]
    pub log_file: Option<PathBuf>,
    /// Per-request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Retry settings.
    #[serde(default)]
    pub retry: RetrySettings,
    /// Ticket sub-loop timings.
    #[serde(default)]
    pub tickets: TicketSettings,
    /// Extra classification rules per service, checked before the built-ins.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<ServiceKind, Vec<ResponseRule>>,
    /// Configured accounts.
    pub accounts: Vec<AccountConfig>,
}

fn default_log_file() -> Option<PathBuf> {
    Some(PathBuf::from("farming.log"))
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay_ms() -> u64 {
    5000
}

fn default_settle_delay_ms() -> u64 {
    1000
}

fn default_play_delay_ms() -> u64 {
    5000
}

fn default_max_iterations() -> u32 {
    100
}

fn default_true() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_file: default_log_file(),
            request_timeout_secs: default_request_timeout_secs(),
            retry: RetrySettings::default(),
            tickets: TicketSettings::default(),
            rules: BTreeMap::new(),
            accounts: Vec::new(),
        }
    }
}

impl AppConfig {
    /// Returns the default configuration file path.
    pub fn default_path() -> PathBuf {
        default_config_path()
    }

    /// Loads and validates configuration from `path`.
    pub async fn load_from(path: &Path) -> Result<Self, StoreError> {
        let config: Self = load_json(path).await?;
        config.validate()?;
        info!(
            path = %path.display(),
            accounts = config.accounts.len(),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Saves configuration to `path`.
    pub async fn save_to(&self, path: &Path) -> Result<(), StoreError> {
        save_json(path, self).await?;
        info!(path = %path.display(), "Saved configuration");
        Ok(())
    }

    /// Checks everything serde cannot.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.request_timeout_secs == 0 {
            return Err(StoreError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.tickets.max_iterations == 0 {
            return Err(StoreError::Config(
                "tickets.max_iterations must be at least 1".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for account in &self.accounts {
            if account.id.trim().is_empty() {
                return Err(StoreError::Config(format!(
                    "{} account with an empty id",
                    account.service.cli_name()
                )));
            }
            if !seen.insert((account.service, account.id.as_str())) {
                return Err(StoreError::Config(format!(
                    "duplicate account id {} for service {}",
                    account.id,
                    account.service.cli_name()
                )));
            }
            account.interval()?;
        }

        debug!(accounts = self.accounts.len(), "Configuration valid");
        Ok(())
    }

    /// Every configured account, converted for the engine.
    pub fn accounts(&self) -> Result<Vec<Account>, StoreError> {
        self.accounts.iter().map(AccountConfig::to_account).collect()
    }

    /// Accounts with the given id (one per service at most).
    pub fn accounts_with_id(&self, id: &str) -> Result<Vec<Account>, StoreError> {
        self.accounts
            .iter()
            .filter(|a| a.id == id)
            .map(AccountConfig::to_account)
            .collect()
    }

    /// Per-request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Retry budget; each attempt is bounded by the request timeout.
    pub fn retry_budget(&self) -> RetryBudget {
        RetryBudget::new(
            self.retry.max_retries,
            Duration::from_millis(self.retry.delay_ms),
        )
        .with_attempt_timeout(self.request_timeout())
    }

    /// Extra classification rules for `kind`.
    pub fn rules_for(&self, kind: ServiceKind) -> Vec<ResponseRule> {
        self.rules.get(&kind).cloned().unwrap_or_default()
    }

    /// A starter config with one placeholder account per service.
    pub fn template() -> Self {
        let account = |id: &str, service: ServiceKind, credentials: serde_json::Value| {
            AccountConfig {
                id: id.to_string(),
                service,
                interval_hours: None,
                tickets: true,
                credentials: Credentials::from_value(credentials).unwrap_or_default(),
            }
        };

        Self {
            accounts: vec![
                account(
                    "hot-1",
                    ServiceKind::Hot,
                    serde_json::json!({
                        "authorization": "<authorization header>",
                        "deviceId": "<device id>",
                        "telegramData": "<telegram init data>",
                        "gameState": {}
                    }),
                ),
                account(
                    "123456",
                    ServiceKind::Matchain,
                    serde_json::json!({
                        "uid": 123_456,
                        "first_name": "<first name>",
                        "last_name": "",
                        "username": "<username>",
                        "tg_login_params": "<telegram init data>"
                    }),
                ),
                account(
                    "vooi-1",
                    ServiceKind::Vooi,
                    serde_json::json!({ "initData": "<telegram init data>" }),
                ),
                account(
                    "meow-1",
                    ServiceKind::SuperMeow,
                    serde_json::json!({
                        "telegram": "<telegram id>",
                        "auth_data": "<auth data>",
                        "user": {}
                    }),
                ),
            ],
            ..Self::default()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use autoclaim_core::FailureKind;
    use serde_json::json;

    fn parse(value: serde_json::Value) -> AppConfig {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_defaults_fill_everything_but_accounts() {
        let config = parse(json!({ "accounts": [] }));

        assert_eq!(config.log_file, Some(PathBuf::from("farming.log")));
        assert_eq!(config.request_timeout(), Duration::from_secs(30));
        assert_eq!(config.retry_budget(), RetryBudget::default());
        assert_eq!(config.tickets, TicketSettings::default());
        assert!(config.rules.is_empty());
    }

    #[test]
    fn test_accounts_key_is_required() {
        assert!(serde_json::from_value::<AppConfig>(json!({})).is_err());
    }

    #[test]
    fn test_account_conversion() {
        let config = parse(json!({
            "accounts": [
                { "id": "u1", "service": "matchain", "interval_hours": 8,
                  "credentials": { "uid": "123" } },
                { "id": "m1", "service": "supermeow", "tickets": false },
                { "id": "h1", "service": "hot", "interval_hours": 0.5 }
            ]
        }));
        config.validate().unwrap();

        let accounts = config.accounts().unwrap();
        assert_eq!(accounts.len(), 3);
        assert_eq!(accounts[0].interval(), Duration::from_secs(8 * 3600));
        assert_eq!(accounts[0].credentials.require_str("uid").unwrap(), "123");
        assert!(accounts[0].tickets_enabled);
        assert_eq!(accounts[1].interval(), Duration::from_secs(12_600));
        assert!(!accounts[1].tickets_enabled);
        assert_eq!(accounts[2].interval(), Duration::from_secs(1800));
    }

    #[test]
    fn test_duplicate_ids_rejected_within_a_service() {
        let config = parse(json!({
            "accounts": [
                { "id": "u1", "service": "matchain" },
                { "id": "u1", "service": "matchain" }
            ]
        }));
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate"));
        assert!(err.is_config_problem());
    }

    #[test]
    fn test_same_id_allowed_across_services() {
        let config = parse(json!({
            "accounts": [
                { "id": "u1", "service": "matchain" },
                { "id": "u1", "service": "vooi" }
            ]
        }));
        config.validate().unwrap();
        assert_eq!(config.accounts_with_id("u1").unwrap().len(), 2);
    }

    #[test]
    fn test_bad_intervals_rejected() {
        for hours in [0.0, -1.0] {
            let config = parse(json!({
                "accounts": [ { "id": "u1", "service": "hot", "interval_hours": hours } ]
            }));
            assert!(config.validate().is_err(), "{hours} should be rejected");
        }
    }

    #[test]
    fn test_unknown_service_rejected() {
        let result = serde_json::from_value::<AppConfig>(json!({
            "accounts": [ { "id": "u1", "service": "notaservice" } ]
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_rules_parse_and_apply() {
        let config = parse(json!({
            "rules": {
                "matchain": [ { "code": 400, "pattern": "too soon", "kind": "already_claimed" } ]
            },
            "accounts": []
        }));

        let rules = config.rules_for(ServiceKind::Matchain);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].kind(), FailureKind::AlreadyClaimed);
        assert!(rules[0].matches(&[400], "claim too soon"));
        assert!(config.rules_for(ServiceKind::Hot).is_empty());
    }

    #[test]
    fn test_invalid_rule_pattern_fails_to_parse() {
        let result = serde_json::from_value::<AppConfig>(json!({
            "rules": { "hot": [ { "pattern": "(", "kind": "fatal" } ] },
            "accounts": []
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_null_log_file_disables_logging() {
        let config = parse(json!({ "log_file": null, "accounts": [] }));
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_template_is_valid() {
        let template = AppConfig::template();
        template.validate().unwrap();
        assert_eq!(template.accounts.len(), ServiceKind::all().len());
    }
}
