// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Autoclaim Fetch
//!
//! HTTP plumbing and the failure boundary for the autoclaim workspace.
//!
//! - [`client::HttpClient`] - JSON HTTP client with a per-request timeout
//! - [`error::FetchError`] - Raw transport/remote errors
//! - [`classify::Classifier`] - Maps raw errors to a [`autoclaim_core::FailureKind`]
//!   through a table of response patterns
//! - [`retry::RetryingInvoker`] - Bounded-attempt, fixed-delay retry
//!
//! ## Example
//!
//! ```ignore
//! use autoclaim_fetch::{Classifier, HttpClient, RetryBudget, RetryingInvoker};
//!
//! let http = HttpClient::new()?;
//! let classifier = Classifier::default();
//! let invoker = RetryingInvoker::new(RetryBudget::default(), sink);
//!
//! let body = invoker
//!     .invoke(&scope, Stage::Claim, || async {
//!         http.get_json(url, headers.clone())
//!             .await
//!             .map_err(|e| classifier.classify(&e))
//!     })
//!     .await?;
//! ```

pub mod classify;
pub mod client;
pub mod error;
pub mod retry;

// Re-export key types at crate root
pub use classify::{Classifier, ResponseRule, RuleSpec};
pub use client::HttpClient;
pub use error::FetchError;
pub use retry::{RetryBudget, RetryingInvoker};
