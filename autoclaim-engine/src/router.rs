//! Account to service dispatch.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use autoclaim_core::{
    Account, AccountScope, ClaimFailure, ClaimPort, CycleReport, ServiceKind, Severity, Stage,
};
use autoclaim_providers::{PortContext, ProviderError, ServiceRegistry};
use futures::future::join_all;
use tracing::{debug, info};

use crate::account_task::AccountTask;

/// Anything that can run one cycle for an account.
#[async_trait]
pub trait CycleRunner: Send + Sync {
    /// Runs one cycle. Never fails; failures are in the report.
    async fn run_cycle(&self, account: &Account) -> CycleReport;
}

/// Routes each account to the port of its service.
pub struct ServiceRouter {
    ports: HashMap<ServiceKind, Arc<dyn ClaimPort>>,
    task: AccountTask,
}

impl ServiceRouter {
    /// Creates a router with no ports.
    pub fn new(task: AccountTask) -> Self {
        Self {
            ports: HashMap::new(),
            task,
        }
    }

    /// Creates a router with a port for every registered service.
    pub fn from_registry<F>(task: AccountTask, context_for: F) -> Result<Self, ProviderError>
    where
        F: Fn(ServiceKind) -> PortContext,
    {
        let mut router = Self::new(task);
        for desc in ServiceRegistry::all() {
            let port = desc.build_port(&context_for(desc.kind))?;
            debug!(service = %desc.kind, "Registered port");
            router.ports.insert(desc.kind, port);
        }
        Ok(router)
    }

    /// Adds or replaces the port for its service.
    #[must_use]
    pub fn with_port(mut self, port: Arc<dyn ClaimPort>) -> Self {
        self.ports.insert(port.service(), port);
        self
    }

    /// The port serving `kind`.
    pub fn port(&self, kind: ServiceKind) -> Option<&Arc<dyn ClaimPort>> {
        self.ports.get(&kind)
    }

    /// Runs one cycle for every account concurrently.
    pub async fn run_once(&self, accounts: &[Account]) -> Vec<CycleReport> {
        info!(accounts = accounts.len(), "Running one cycle");
        join_all(accounts.iter().map(|account| self.run_cycle(account))).await
    }
}

#[async_trait]
impl CycleRunner for ServiceRouter {
    async fn run_cycle(&self, account: &Account) -> CycleReport {
        let Some(port) = self.ports.get(&account.service) else {
            let failure = ClaimFailure::fatal(format!("no port for service {}", account.service));
            self.task.invoker().sink().emit(AccountScope::from(account).event(
                Stage::Cycle,
                Severity::Error,
                failure.message.clone(),
            ));
            let mut report = CycleReport::begin(account.id.clone(), account.service);
            report.abort(Stage::Cycle, &failure);
            return report.finish();
        };
        self.task.run(port.as_ref(), account).await
    }
}

impl std::fmt::Debug for ServiceRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceRouter")
            .field("services", &self.ports.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}
