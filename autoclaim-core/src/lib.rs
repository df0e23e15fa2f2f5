// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Autoclaim Core
//!
//! Core types, models, and port traits for the autoclaim workspace.
//!
//! This crate provides the foundational abstractions used across all other
//! autoclaim crates, including:
//!
//! - Domain models (accounts, services, claim outcomes, ticket state)
//! - Error types
//! - The ports a remote reward service must implement
//! - The progress/error event sink
//!
//! ## Key Types
//!
//! ### Accounts
//! - [`Account`] - One configured account (id, service, credentials, interval)
//! - [`AccountId`] - Opaque account identifier
//! - [`Credentials`] - Opaque credential/session payload
//! - [`ServiceKind`] - Enum of supported reward services
//!
//! ### Outcomes
//! - [`ClaimOutcome`] - Result of any remote call
//! - [`ClaimFailure`] / [`FailureKind`] - Classified failure taxonomy
//! - [`Session`], [`Receipt`], [`PlayId`] - Remote call payloads
//!
//! ### Ticket loop
//! - [`TicketPhase`], [`TicketStop`], [`TicketState`], [`TicketLoopReport`]
//!
//! ### Events & reports
//! - [`ProgressEvent`], [`Stage`], [`Severity`], [`AccountScope`]
//! - [`CycleReport`]

pub mod error;
pub mod models;
pub mod traits;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Accounts
    Account,
    AccountId,
    Credentials,
    ServiceKind,
    DEFAULT_INTERVAL,
    // Outcomes
    ClaimFailure,
    ClaimOutcome,
    FailureKind,
    PlayId,
    Receipt,
    Session,
    // Ticket loop
    TicketLoopReport,
    TicketPhase,
    TicketState,
    TicketStop,
    // Events & reports
    AccountScope,
    CycleReport,
    ProgressEvent,
    Severity,
    Stage,
};

// Re-export traits
pub use traits::{ClaimPort, EventSink, TicketPort};
