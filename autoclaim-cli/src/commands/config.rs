//! Config command - manage configuration.

use anyhow::{Context, Result, bail};
use autoclaim_store::{AppConfig, default_config_dir};
use clap::{Args, Subcommand};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show configuration paths.
    Path,

    /// Load and validate the config file.
    Validate,

    /// Write a starter config.
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli) -> Result<()> {
    match &args.action {
        ConfigAction::Path => show_paths(cli),
        ConfigAction::Validate => validate(cli).await,
        ConfigAction::Init { force } => init(cli, *force).await,
    }
}

fn show_paths(cli: &Cli) -> Result<()> {
    let config_dir = default_config_dir();
    let config_path = cli.config_path();

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:  {}", config_dir.display());
            println!("Config file: {}", config_path.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "config_file": config_path.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn validate(cli: &Cli) -> Result<()> {
    let path = cli.config_path();
    let config = AppConfig::load_from(&path)
        .await
        .with_context(|| format!("validating {}", path.display()))?;
    config.accounts()?;

    match cli.format {
        OutputFormat::Text => {
            println!("{} is valid ({} accounts)", path.display(), config.accounts.len());
        }
        OutputFormat::Json => {
            let result = serde_json::json!({
                "config_file": path.display().to_string(),
                "valid": true,
                "accounts": config.accounts.len(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&result)?);
        }
    }

    Ok(())
}

async fn init(cli: &Cli, force: bool) -> Result<()> {
    let path = cli.config_path();
    if path.exists() && !force {
        bail!(
            "{} already exists (use --force to overwrite)",
            path.display()
        );
    }

    AppConfig::template().save_to(&path).await?;

    info!(path = %path.display(), "Config template written");
    println!("Wrote starter config to {}", path.display());
    println!("Fill in the credentials for each account, then run `autoclaim`.");

    Ok(())
}
