//! Service registry for managing all service descriptors.
//!
//! The registry provides static access to every supported service and is
//! the central point for looking them up.

use std::collections::HashMap;
use std::sync::OnceLock;

use autoclaim_core::ServiceKind;

use crate::descriptor::ServiceDescriptor;
use crate::hot::hot_descriptor;
use crate::matchain::matchain_descriptor;
use crate::supermeow::supermeow_descriptor;
use crate::vooi::vooi_descriptor;

// ============================================================================
// Static Registry
// ============================================================================

/// Static storage for all service descriptors.
static DESCRIPTORS: OnceLock<Vec<ServiceDescriptor>> = OnceLock::new();

/// Static storage for CLI name to service kind mapping.
static CLI_NAME_MAP: OnceLock<HashMap<String, ServiceKind>> = OnceLock::new();

fn init_descriptors() -> Vec<ServiceDescriptor> {
    vec![
        hot_descriptor(),
        matchain_descriptor(),
        vooi_descriptor(),
        supermeow_descriptor(),
    ]
}

fn build_cli_name_map(descriptors: &[ServiceDescriptor]) -> HashMap<String, ServiceKind> {
    let mut map = HashMap::new();

    for desc in descriptors {
        map.insert(desc.cli_name().to_string(), desc.kind);

        for alias in desc.aliases {
            map.insert((*alias).to_string(), desc.kind);
        }
    }

    map
}

// ============================================================================
// Service Registry
// ============================================================================

/// Global registry of all service descriptors.
pub struct ServiceRegistry;

impl ServiceRegistry {
    /// Returns all service descriptors.
    pub fn all() -> &'static [ServiceDescriptor] {
        DESCRIPTORS.get_or_init(init_descriptors)
    }

    /// Gets a service descriptor by kind.
    pub fn get(kind: ServiceKind) -> Option<&'static ServiceDescriptor> {
        Self::all().iter().find(|d| d.kind == kind)
    }

    /// Returns the CLI name to service kind mapping.
    pub fn cli_name_map() -> &'static HashMap<String, ServiceKind> {
        CLI_NAME_MAP.get_or_init(|| build_cli_name_map(Self::all()))
    }

    /// Looks up a service by CLI name or alias.
    pub fn get_by_cli_name(name: &str) -> Option<&'static ServiceDescriptor> {
        let kind = Self::cli_name_map().get(name.trim().to_ascii_lowercase().as_str())?;
        Self::get(*kind)
    }

    /// Returns all service kinds.
    pub fn kinds() -> Vec<ServiceKind> {
        Self::all().iter().map(|d| d.kind).collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
