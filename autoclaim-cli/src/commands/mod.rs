//! CLI command implementations.

pub mod accounts;
pub mod config;
pub mod once;
pub mod run;
pub mod services;

use std::sync::Arc;

use anyhow::{Context, Result};
use autoclaim_core::EventSink;
use autoclaim_engine::{AccountTask, ServiceRouter, TicketLoopConfig, TicketLoopRunner};
use autoclaim_fetch::RetryingInvoker;
use autoclaim_providers::PortContext;
use autoclaim_store::AppConfig;
use tokio_util::sync::CancellationToken;

/// Wires a router for every registered service from the loaded config.
///
/// `root` cancels retries and ticket loops as well as timers.
pub fn build_router(
    config: &AppConfig,
    sink: Arc<dyn EventSink>,
    root: &CancellationToken,
) -> Result<ServiceRouter> {
    let invoker = RetryingInvoker::new(config.retry_budget(), sink).with_cancellation(root.clone());
    let tickets = TicketLoopConfig {
        settle_delay: config.tickets.settle_delay(),
        play_delay: config.tickets.play_delay(),
        max_iterations: config.tickets.max_iterations,
    };
    let task = AccountTask::new(invoker.clone(), TicketLoopRunner::new(tickets, invoker));

    ServiceRouter::from_registry(task, |kind| {
        PortContext::default()
            .with_timeout(config.request_timeout())
            .with_rules(config.rules_for(kind))
    })
    .context("building service ports")
}
