//! HOT (herewallet) service implementation.
//!
//! HOT has no login step: the account's `authorization` credential is the
//! session. A claim posts the account's saved `game_state`.

mod api;
mod descriptor;
mod port;

pub use api::{HotApiClient, HotClaimResponse, HotCredentials};
pub use descriptor::hot_descriptor;
pub use port::HotPort;
