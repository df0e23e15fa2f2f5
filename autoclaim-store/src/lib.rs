// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Autoclaim Store
//!
//! Configuration for the autoclaim binary.
//!
//! This crate provides:
//!
//! - **AppConfig**: Accounts, retry/ticket timings and extra response rules
//! - **Persistence**: Atomic, owner-only JSON file I/O
//!
//! ## Usage
//!
//! ```ignore
//! use autoclaim_store::AppConfig;
//!
//! let config = AppConfig::load_from(&AppConfig::default_path()).await?;
//! let accounts = config.accounts()?;
//! let budget = config.retry_budget();
//! ```

pub mod config;
pub mod error;
pub mod persistence;

pub use config::{AccountConfig, AppConfig, RetrySettings, TicketSettings};
pub use error::StoreError;
pub use persistence::{default_config_dir, default_config_path, load_json, save_json};
