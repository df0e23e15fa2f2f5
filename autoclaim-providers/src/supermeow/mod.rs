//! SuperMeow service implementation.
//!
//! SuperMeow authenticates every call with `telegram` and `auth_data` query
//! parameters, so there is no login step. Its claim window is 3.5 hours.

mod api;
mod descriptor;
mod port;

pub use api::{SuperMeowApiClient, SuperMeowCredentials};
pub use descriptor::supermeow_descriptor;
pub use port::SuperMeowPort;
