// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Autoclaim Providers
//!
//! Concrete reward services behind the [`autoclaim_core::ClaimPort`] trait.
//!
//! Each service module includes:
//!
//! - **Api**: HTTP client and response types for the remote endpoints
//! - **Port**: The [`autoclaim_core::ClaimPort`] implementation
//! - **Descriptor**: Static configuration (base URL, built-in response rules)
//!
//! ## Supported Services
//!
//! | Service | Login | Farm | Status | Tickets | Default interval |
//! |---------|-------|------|--------|---------|------------------|
//! | HOT | ❌ | ❌ | ❌ | ❌ | 8h |
//! | Matchain | ✅ | ✅ | ✅ | ✅ | 8h |
//! | Vooi | ✅ | ✅ | ❌ | ❌ | 8h |
//! | SuperMeow | ❌ | ❌ | ✅ | ❌ | 3.5h |
//!
//! ## Usage
//!
//! ```ignore
//! use autoclaim_providers::{PortContext, ServiceRegistry};
//! use autoclaim_core::ServiceKind;
//!
//! let desc = ServiceRegistry::get(ServiceKind::Matchain).unwrap();
//! let port = desc.build_port(&PortContext::default())?;
//! let session = port.login(&account).await?;
//! ```

pub mod descriptor;
pub mod error;
pub mod registry;

// Service modules (alphabetical)
pub mod hot;
pub mod matchain;
pub mod supermeow;
pub mod vooi;

// Re-export key types
pub use descriptor::{PortContext, PortParts, ServiceDescriptor};
pub use error::ProviderError;
pub use registry::ServiceRegistry;

// Re-export service descriptors
pub use hot::hot_descriptor;
pub use matchain::matchain_descriptor;
pub use supermeow::supermeow_descriptor;
pub use vooi::vooi_descriptor;
