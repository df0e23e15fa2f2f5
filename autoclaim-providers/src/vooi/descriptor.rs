//! Vooi service descriptor.

use std::sync::Arc;

use autoclaim_core::{ClaimPort, ServiceKind};

use super::api::VOOI_API_BASE;
use super::port::VooiPort;
use crate::descriptor::{no_rules, PortParts, ServiceDescriptor};
use crate::error::ProviderError;

/// Creates the Vooi descriptor.
pub fn vooi_descriptor() -> ServiceDescriptor {
    ServiceDescriptor {
        kind: ServiceKind::Vooi,
        aliases: &[],
        base_url: VOOI_API_BASE,
        has_tickets: false,
        default_rules: no_rules,
        build: build_vooi_port,
    }
}

fn build_vooi_port(parts: PortParts) -> Result<Arc<dyn ClaimPort>, ProviderError> {
    Ok(Arc::new(VooiPort::new(parts)?))
}
