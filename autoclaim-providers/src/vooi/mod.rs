//! Vooi service implementation.
//!
//! Vooi farms through "auto trades": a finished trade is claimed and a new
//! one started in the farm stage. A trade still running means the window
//! has not elapsed yet.

mod api;
mod descriptor;
mod port;

pub use api::{VooiApiClient, VooiAutoTrade, VooiClaimResponse, VooiReward};
pub use descriptor::vooi_descriptor;
pub use port::VooiPort;
