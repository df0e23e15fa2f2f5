//! HOT service descriptor.

use std::sync::Arc;

use autoclaim_core::{ClaimPort, ServiceKind};

use super::api::HOT_API_BASE;
use super::port::HotPort;
use crate::descriptor::{no_rules, PortParts, ServiceDescriptor};
use crate::error::ProviderError;

/// Creates the HOT descriptor.
pub fn hot_descriptor() -> ServiceDescriptor {
    ServiceDescriptor {
        kind: ServiceKind::Hot,
        aliases: &["herewallet"],
        base_url: HOT_API_BASE,
        has_tickets: false,
        default_rules: no_rules,
        build: build_hot_port,
    }
}

fn build_hot_port(parts: PortParts) -> Result<Arc<dyn ClaimPort>, ProviderError> {
    Ok(Arc::new(HotPort::new(parts)?))
}
