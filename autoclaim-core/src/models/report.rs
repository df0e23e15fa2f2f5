//! Per-cycle reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::event::Stage;
use super::outcome::{ClaimFailure, Receipt};
use super::service::ServiceKind;
use super::ticket::TicketLoopReport;

/// What one claim cycle for one account did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleReport {
    /// Account id.
    pub account: AccountId,
    /// Account service.
    pub service: ServiceKind,
    /// Claim receipt, if the claim succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim: Option<Receipt>,
    /// True if the remote said the claim window had not elapsed.
    pub already_claimed: bool,
    /// Farming receipt, if the farm stage ran and succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub farm: Option<Receipt>,
    /// Status/balance receipt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Receipt>,
    /// Ticket sub-loop summary, if it ran to `Done`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickets: Option<TicketLoopReport>,
    /// The stage and failure that aborted the cycle early.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<(Stage, String)>,
    /// Non-aborting stage failures, in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<(Stage, String)>,
    /// Cycle start.
    pub started_at: DateTime<Utc>,
    /// Cycle end.
    pub finished_at: DateTime<Utc>,
}

impl CycleReport {
    /// Starts an empty report.
    pub fn begin(account: AccountId, service: ServiceKind) -> Self {
        let now = Utc::now();
        Self {
            account,
            service,
            claim: None,
            already_claimed: false,
            farm: None,
            status: None,
            tickets: None,
            aborted: None,
            errors: Vec::new(),
            started_at: now,
            finished_at: now,
        }
    }

    /// Records the failure that aborted the cycle.
    pub fn abort(&mut self, stage: Stage, failure: &ClaimFailure) {
        self.aborted = Some((stage, failure.to_string()));
    }

    /// Records a failure that did not abort the cycle.
    pub fn record_error(&mut self, stage: Stage, failure: &ClaimFailure) {
        self.errors.push((stage, failure.to_string()));
    }

    /// Stamps the end time.
    pub fn finish(mut self) -> Self {
        self.finished_at = Utc::now();
        self
    }

    /// Returns true if the cycle ran to completion.
    pub fn is_complete(&self) -> bool {
        self.aborted.is_none()
    }

    /// Plays claimed in the ticket sub-loop.
    pub fn plays(&self) -> u32 {
        self.tickets.as_ref().map_or(0, |t| t.plays_completed)
    }
}
