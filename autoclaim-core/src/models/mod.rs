//! Domain models for autoclaim.
//!
//! ## Submodules
//!
//! - [`account`] - Account types (Account, AccountId, Credentials)
//! - [`service`] - Supported reward services
//! - [`outcome`] - Claim outcomes and the failure taxonomy
//! - [`ticket`] - Ticket sub-loop state
//! - [`event`] - Progress/error events
//! - [`report`] - Per-cycle reports

mod account;
mod event;
mod outcome;
mod report;
mod service;
mod ticket;

pub use account::{Account, AccountId, Credentials};
pub use event::{AccountScope, ProgressEvent, Severity, Stage};
pub use outcome::{ClaimFailure, ClaimOutcome, FailureKind, PlayId, Receipt, Session};
pub use report::CycleReport;
pub use service::{DEFAULT_INTERVAL, ServiceKind};
pub use ticket::{TicketLoopReport, TicketPhase, TicketState, TicketStop};
