//! Ticket sub-loop state.
//!
//! The sub-loop is a state machine:
//!
//! ```text
//! Start -> Purchasing -> Checking --(count == 0)--> Done
//!                           |  ^
//!                  (count>0)|  | (claim ok, inter-play delay)
//!                           v  |
//!                        Playing -> AwaitingSettle -> Claiming
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

use super::outcome::PlayId;

// ============================================================================
// Phase
// ============================================================================

/// A state of the ticket sub-loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketPhase {
    /// Sub-loop entry.
    Start,
    /// Acquiring additional tickets.
    Purchasing,
    /// Reading the remaining count.
    Checking,
    /// Starting one play.
    Playing,
    /// Waiting for the remote to register the play.
    AwaitingSettle(PlayId),
    /// Claiming the play.
    Claiming(PlayId),
    /// Terminal.
    Done(TicketStop),
}

impl TicketPhase {
    /// Returns true for the terminal phase.
    pub fn is_done(&self) -> bool {
        matches!(self, Self::Done(_))
    }
}

// ============================================================================
// Stop Reason
// ============================================================================

/// Why the sub-loop reached `Done` without an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "reason", content = "detail")]
pub enum TicketStop {
    /// Remaining count is zero.
    NoTickets,
    /// The remote returned no play identifier.
    NothingPlayable,
    /// Plays for today are used up.
    PlaysExhausted,
    /// The remote discarded the play before it was claimed.
    GameExpired,
    /// Another claimant took the play first.
    AlreadyClaimed,
    /// The remote rejected the claim for another reason.
    ClaimRejected(String),
    /// The enclosing cycle was cancelled between iterations.
    Cancelled,
}

impl fmt::Display for TicketStop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoTickets => f.write_str("no tickets remaining"),
            Self::NothingPlayable => f.write_str("nothing playable"),
            Self::PlaysExhausted => f.write_str("plays exhausted for today"),
            Self::GameExpired => f.write_str("game has ended"),
            Self::AlreadyClaimed => f.write_str("game already claimed"),
            Self::ClaimRejected(reason) => write!(f, "claim rejected: {reason}"),
            Self::Cancelled => f.write_str("cancelled"),
        }
    }
}

// ============================================================================
// State
// ============================================================================

/// Mutable state scoped to one sub-loop invocation.
///
/// `remaining` is only ever assigned from a remote read, never incremented
/// locally.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TicketState {
    /// Last remaining count read from the remote.
    pub remaining: u32,
    /// Plays started and successfully claimed.
    pub plays_completed: u32,
    /// Play attempts made (successful or not).
    pub iterations: u32,
}

impl TicketState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }
}

// ============================================================================
// Report
// ============================================================================

/// Summary of a finished sub-loop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketLoopReport {
    /// Plays claimed successfully.
    pub plays_completed: u32,
    /// Last remaining count read from the remote.
    pub last_count: u32,
    /// Why the loop stopped.
    pub stop: TicketStop,
}

impl TicketLoopReport {
    /// Builds the report from the final state.
    pub fn from_state(state: &TicketState, stop: TicketStop) -> Self {
        Self {
            plays_completed: state.plays_completed,
            last_count: state.remaining,
            stop,
        }
    }
}
