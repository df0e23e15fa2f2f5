//! Matchain service implementation.
//!
//! Matchain wraps every response in a `{code, err, data}` envelope and
//! reports failures both as non-2xx statuses and as 2xx bodies with a
//! non-200 `code`. It is the only service with a ticket sub-loop.

mod api;
mod descriptor;
mod games;
mod port;

pub use api::{MatchainApiClient, MatchainEnvelope, CLAIM_POINT, GAME_EXPIRED_MESSAGE};
pub use descriptor::{matchain_descriptor, matchain_rules};
pub use games::MatchainGames;
pub use port::MatchainPort;
