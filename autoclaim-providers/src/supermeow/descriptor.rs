//! SuperMeow service descriptor.

use std::sync::Arc;

use autoclaim_core::{ClaimPort, ServiceKind};

use super::api::SUPERMEOW_API_BASE;
use super::port::SuperMeowPort;
use crate::descriptor::{no_rules, PortParts, ServiceDescriptor};
use crate::error::ProviderError;

/// Creates the SuperMeow descriptor.
pub fn supermeow_descriptor() -> ServiceDescriptor {
    ServiceDescriptor {
        kind: ServiceKind::SuperMeow,
        aliases: &["meow", "supermoew"],
        base_url: SUPERMEOW_API_BASE,
        has_tickets: false,
        default_rules: no_rules,
        build: build_supermeow_port,
    }
}

fn build_supermeow_port(parts: PortParts) -> Result<Arc<dyn ClaimPort>, ProviderError> {
    Ok(Arc::new(SuperMeowPort::new(parts)?))
}
