//! Matchain service descriptor.

use std::sync::Arc;

use autoclaim_core::{ClaimPort, FailureKind, ServiceKind};
use autoclaim_fetch::ResponseRule;

use super::api::{GAME_EXPIRED_MESSAGE, MATCHAIN_API_BASE};
use super::port::MatchainPort;
use crate::descriptor::{PortParts, ServiceDescriptor};
use crate::error::ProviderError;

/// Creates the Matchain descriptor.
pub fn matchain_descriptor() -> ServiceDescriptor {
    ServiceDescriptor {
        kind: ServiceKind::Matchain,
        aliases: &["matchchain", "match"],
        base_url: MATCHAIN_API_BASE,
        has_tickets: true,
        default_rules: matchain_rules,
        build: build_matchain_port,
    }
}

/// Built-in Matchain response rules.
///
/// The game-ended message must match exactly; any code-400 message that
/// mentions `already` means the window was already used.
pub fn matchain_rules() -> Result<Vec<ResponseRule>, regex::Error> {
    Ok(vec![
        ResponseRule::exact(Some(400), GAME_EXPIRED_MESSAGE, FailureKind::GameExpired)?,
        ResponseRule::new(Some(400), "already", FailureKind::AlreadyClaimed)?,
    ])
}

fn build_matchain_port(parts: PortParts) -> Result<Arc<dyn ClaimPort>, ProviderError> {
    Ok(Arc::new(MatchainPort::new(parts)?))
}
