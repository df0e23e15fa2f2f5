//! Service descriptor system.
//!
//! A descriptor contains all the static configuration for a service:
//! - Identity (kind, CLI aliases)
//! - Remote base URL
//! - Built-in response classification rules
//! - A constructor for the service's [`ClaimPort`]

use std::sync::Arc;
use std::time::Duration;

use autoclaim_core::{ClaimPort, ServiceKind};
use autoclaim_fetch::client::DEFAULT_TIMEOUT_SECS;
use autoclaim_fetch::{Classifier, ResponseRule};

use crate::error::ProviderError;

// ============================================================================
// Port Context
// ============================================================================

/// Runtime settings a port is built with.
#[derive(Debug, Clone)]
pub struct PortContext {
    /// Per-request timeout.
    pub timeout: Duration,
    /// Overrides the descriptor's base URL (used against local test servers).
    pub base_url: Option<String>,
    /// Rules tried before the service's built-in rules.
    pub rule_overrides: Vec<ResponseRule>,
}

impl PortContext {
    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Points the port at a different host.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Adds classification rules ahead of the built-ins.
    #[must_use]
    pub fn with_rules(mut self, rules: Vec<ResponseRule>) -> Self {
        self.rule_overrides = rules;
        self
    }
}

impl Default for PortContext {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            base_url: None,
            rule_overrides: Vec::new(),
        }
    }
}

// ============================================================================
// Service Descriptor
// ============================================================================

/// Complete descriptor for a service.
pub struct ServiceDescriptor {
    /// Service identifier.
    pub kind: ServiceKind,
    /// Alternative CLI names.
    pub aliases: &'static [&'static str],
    /// Remote API base URL.
    pub base_url: &'static str,
    /// Whether the service has a ticket sub-loop.
    pub has_tickets: bool,
    /// Built-in response rules, in match order.
    pub default_rules: fn() -> Result<Vec<ResponseRule>, regex::Error>,
    /// Builds the port from a resolved base URL and classifier.
    pub build: fn(PortParts) -> Result<Arc<dyn ClaimPort>, ProviderError>,
}

/// Resolved inputs handed to a service's port constructor.
#[derive(Debug, Clone)]
pub struct PortParts {
    /// Base URL, already resolved against the context override.
    pub base_url: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Classifier with overrides ahead of the built-ins.
    pub classifier: Classifier,
}

impl ServiceDescriptor {
    /// Returns the display name.
    pub fn display_name(&self) -> &'static str {
        self.kind.display_name()
    }

    /// Returns the CLI name.
    pub fn cli_name(&self) -> &'static str {
        self.kind.cli_name()
    }

    /// Returns the service's default farming interval.
    pub fn default_interval(&self) -> Duration {
        self.kind.default_interval()
    }

    /// Builds the classifier for this service.
    pub fn classifier(&self, ctx: &PortContext) -> Result<Classifier, ProviderError> {
        let defaults = (self.default_rules)()?;
        Ok(Classifier::new(defaults).with_overrides(ctx.rule_overrides.iter().cloned()))
    }

    /// Builds the claim port for this service.
    pub fn build_port(&self, ctx: &PortContext) -> Result<Arc<dyn ClaimPort>, ProviderError> {
        let parts = PortParts {
            base_url: ctx
                .base_url
                .clone()
                .unwrap_or_else(|| self.base_url.to_string()),
            timeout: ctx.timeout,
            classifier: self.classifier(ctx)?,
        };
        (self.build)(parts)
    }
}

impl std::fmt::Debug for ServiceDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceDescriptor")
            .field("kind", &self.kind)
            .field("base_url", &self.base_url)
            .field("has_tickets", &self.has_tickets)
            .finish_non_exhaustive()
    }
}

/// Rule table for services that classify purely by HTTP status.
pub fn no_rules() -> Result<Vec<ResponseRule>, regex::Error> {
    Ok(Vec::new())
}
