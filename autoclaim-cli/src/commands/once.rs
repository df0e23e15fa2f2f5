//! Once command - one cycle for every (or one) account.

use std::sync::Arc;

use anyhow::{Result, bail};
use autoclaim_core::EventSink;
use autoclaim_engine::{RecordingSink, TracingSink};
use autoclaim_providers::ServiceRegistry;
use autoclaim_store::AppConfig;
use clap::Args;
use tokio_util::sync::CancellationToken;
use tracing::info;

use super::build_router;
use crate::output::{JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Arguments for the once command.
#[derive(Args, Default)]
pub struct OnceArgs {
    /// Only run accounts with this id.
    #[arg(long, short)]
    pub account: Option<String>,

    /// Only run accounts of this service.
    #[arg(long, short)]
    pub service: Option<String>,
}

/// Runs the once command.
pub async fn run(args: &OnceArgs, cli: &Cli, config: AppConfig) -> Result<()> {
    let mut accounts = match &args.account {
        Some(id) => config.accounts_with_id(id)?,
        None => config.accounts()?,
    };
    if let Some(name) = &args.service {
        let Some(desc) = ServiceRegistry::get_by_cli_name(name) else {
            bail!("Unknown service: {name}");
        };
        accounts.retain(|a| a.service == desc.kind);
    }
    if accounts.is_empty() {
        bail!("no matching accounts configured");
    }

    let recorder = Arc::new(RecordingSink::forwarding(Arc::new(TracingSink)));
    let sink: Arc<dyn EventSink> = recorder.clone();
    let router = build_router(&config, sink, &CancellationToken::new())?;

    let reports = router.run_once(&accounts).await;
    info!(
        accounts = reports.len(),
        events = recorder.events().len(),
        "One-shot run finished"
    );

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);
            for report in &reports {
                println!("{}", formatter.format_report(report));
            }
            println!();
            println!("{}", formatter.format_totals(&reports));
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&reports)?);
        }
    }

    Ok(())
}
