//! Run command - claim on every account's interval until interrupted.

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use autoclaim_core::EventSink;
use autoclaim_engine::{Scheduler, TracingSink};
use autoclaim_store::AppConfig;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::build_router;
use crate::Cli;

/// Runs the scheduler until Ctrl+C.
pub async fn run(cli: &Cli, config: AppConfig) -> Result<()> {
    let accounts = config.accounts()?;
    if accounts.is_empty() {
        bail!(
            "no accounts configured in {}",
            cli.config_path().display()
        );
    }

    let root = CancellationToken::new();
    let sink: Arc<dyn EventSink> = Arc::new(TracingSink);
    let router = build_router(&config, Arc::clone(&sink), &root)?;

    let mut scheduler = Scheduler::new(Arc::new(router), sink).with_cancellation(root);
    scheduler.start(&accounts);
    info!(timers = scheduler.live_timers(), "Auto-claim running, press Ctrl+C to stop");

    tokio::signal::ctrl_c()
        .await
        .context("waiting for Ctrl+C")?;

    info!("Interrupt received");
    scheduler.shutdown().await;
    info!("Stopped");

    Ok(())
}
