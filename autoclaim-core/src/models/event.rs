//! Progress and error events.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::{Account, AccountId};
use super::service::ServiceKind;

// ============================================================================
// Stage
// ============================================================================

/// The stage of a claim cycle an event belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Timer arming, firing and cancellation.
    Schedule,
    /// Session establishment.
    Login,
    /// Reward claim.
    Claim,
    /// Starting the next farming window.
    Farm,
    /// Balance/status read.
    Status,
    /// Ticket acquisition.
    Purchase,
    /// Remaining-ticket read.
    CheckTickets,
    /// Starting one play.
    Play,
    /// Claiming one play.
    ClaimPlay,
    /// The ticket sub-loop as a whole.
    Tickets,
    /// The cycle as a whole.
    Cycle,
}

impl Stage {
    /// Snake-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schedule => "schedule",
            Self::Login => "login",
            Self::Claim => "claim",
            Self::Farm => "farm",
            Self::Status => "status",
            Self::Purchase => "purchase",
            Self::CheckTickets => "check_tickets",
            Self::Play => "play",
            Self::ClaimPlay => "claim_play",
            Self::Tickets => "tickets",
            Self::Cycle => "cycle",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Severity
// ============================================================================

/// Event severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Fine-grained progress.
    Debug,
    /// Normal progress.
    Info,
    /// Recoverable problem or benign terminal outcome.
    Warn,
    /// Failure that ended a stage or cycle.
    Error,
}

// ============================================================================
// Progress Event
// ============================================================================

/// A structured progress/error event `(account, stage, message, severity)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressEvent {
    /// Account the event belongs to.
    pub account: AccountId,
    /// Service of the account.
    pub service: ServiceKind,
    /// Cycle stage.
    pub stage: Stage,
    /// Severity.
    pub severity: Severity,
    /// Message.
    pub message: String,
    /// When the event was created.
    pub at: DateTime<Utc>,
}

// ============================================================================
// Account Scope
// ============================================================================

/// The account half of an event, cheap to clone into every call site.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AccountScope {
    /// Account id.
    pub account: AccountId,
    /// Account service.
    pub service: ServiceKind,
}

impl AccountScope {
    /// Creates a scope.
    pub fn new(account: AccountId, service: ServiceKind) -> Self {
        Self { account, service }
    }

    /// Creates an event for this scope.
    pub fn event(&self, stage: Stage, severity: Severity, message: impl Into<String>) -> ProgressEvent {
        ProgressEvent {
            account: self.account.clone(),
            service: self.service,
            stage,
            severity,
            message: message.into(),
            at: Utc::now(),
        }
    }
}

impl From<&Account> for AccountScope {
    fn from(account: &Account) -> Self {
        Self::new(account.id.clone(), account.service)
    }
}

impl fmt::Display for AccountScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.service.tag(), self.account)
    }
}
