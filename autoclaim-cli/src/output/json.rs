//! JSON output formatting.

use anyhow::Result;
use autoclaim_core::Account;
use autoclaim_providers::ServiceDescriptor;
use serde::Serialize;

// ============================================================================
// Output Types
// ============================================================================

/// JSON output for one configured account.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountOutput {
    pub id: String,
    pub service: String,
    pub interval_secs: u64,
    pub interval_overridden: bool,
    pub tickets: bool,
}

impl From<&Account> for AccountOutput {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            service: account.service.cli_name().to_string(),
            interval_secs: account.interval().as_secs(),
            interval_overridden: account.interval.is_some(),
            tickets: account.tickets_enabled,
        }
    }
}

/// JSON output for one supported service.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOutput {
    pub id: String,
    pub name: String,
    pub aliases: Vec<String>,
    pub base_url: String,
    pub default_interval_secs: u64,
    pub has_tickets: bool,
}

impl From<&ServiceDescriptor> for ServiceOutput {
    fn from(desc: &ServiceDescriptor) -> Self {
        Self {
            id: desc.cli_name().to_string(),
            name: desc.display_name().to_string(),
            aliases: desc.aliases.iter().map(|a| (*a).to_string()).collect(),
            base_url: desc.base_url.to_string(),
            default_interval_secs: desc.default_interval().as_secs(),
            has_tickets: desc.has_tickets,
        }
    }
}

// ============================================================================
// Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }
}
