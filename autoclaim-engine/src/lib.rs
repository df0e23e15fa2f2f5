// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::too_many_lines)]

//! # Autoclaim Engine
//!
//! Orchestration for the autoclaim workspace: timers, per-account cycles and
//! the ticket sub-loop.
//!
//! ## Layers
//!
//! - [`Scheduler`] - One cancellable timer per account; immediate first run
//! - [`ServiceRouter`] - Routes an account to its service port
//! - [`AccountTask`] - Login, claim, farm, status, tickets for one account
//! - [`TicketLoopRunner`] - Purchase/check/play/claim state machine
//!
//! Every remote call after login goes through a
//! [`autoclaim_fetch::RetryingInvoker`]. Progress is reported to an
//! [`autoclaim_core::EventSink`]; [`TracingSink`] forwards it to `tracing`.
//!
//! ## Example
//!
//! ```ignore
//! let root = CancellationToken::new();
//! let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
//! let invoker = RetryingInvoker::new(RetryBudget::default(), sink.clone())
//!     .with_cancellation(root.clone());
//! let task = AccountTask::new(
//!     invoker.clone(),
//!     TicketLoopRunner::new(TicketLoopConfig::default(), invoker),
//! );
//! let router = ServiceRouter::from_registry(task, |_| PortContext::default())?;
//!
//! let mut scheduler = Scheduler::new(Arc::new(router), sink).with_cancellation(root);
//! scheduler.start(&accounts);
//! tokio::signal::ctrl_c().await?;
//! scheduler.shutdown().await;
//! ```

pub mod account_task;
pub mod router;
pub mod scheduler;
pub mod sink;
pub mod ticket_loop;

pub use account_task::AccountTask;
pub use router::{CycleRunner, ServiceRouter};
pub use scheduler::{CycleCallback, Scheduler};
pub use sink::{RecordingSink, TracingSink};
pub use ticket_loop::{
    DEFAULT_MAX_ITERATIONS, DEFAULT_PLAY_DELAY, DEFAULT_SETTLE_DELAY, TicketLoopConfig,
    TicketLoopRunner,
};
