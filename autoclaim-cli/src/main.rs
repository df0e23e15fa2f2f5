// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! autoclaim - periodic reward claims for many accounts.
//!
//! # Examples
//!
//! ```bash
//! # Start claiming for every configured account (Ctrl+C to stop)
//! autoclaim
//!
//! # One cycle for every account, JSON summary
//! autoclaim once --format json --pretty
//!
//! # One cycle for a single account
//! autoclaim once --account 123456
//!
//! # Write a starter config
//! autoclaim config init
//! ```

mod commands;
mod output;

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use autoclaim_store::AppConfig;
use commands::{accounts, config, once, run, services};

// ============================================================================
// CLI Definition
// ============================================================================

/// autoclaim - multi-account reward claimer.
#[derive(Parser)]
#[command(name = "autoclaim")]
#[command(about = "Multi-account periodic reward claimer")]
#[command(long_about = r#"
autoclaim logs into each configured account on a fixed interval, claims its
accumulated reward and, where the service has one, spends its game tickets.

Supported services:
  • HOT (hot)
  • Matchain (matchain)
  • Vooi (vooi)
  • SuperMeow (supermeow)

Examples:
  autoclaim                      # Run the scheduler until Ctrl+C
  autoclaim once                 # One cycle for every account
  autoclaim accounts             # List configured accounts
  autoclaim config init          # Write a starter config
"#)]
#[command(version)]
#[command(author = "Autoclaim Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, runs 'run' by default.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config file (defaults to the platform config dir).
    #[arg(long, short, global = true)]
    pub config: Option<PathBuf>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (warnings and errors only).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

impl Cli {
    /// The config file path in effect.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(AppConfig::default_path)
    }
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Claim for every account on its interval until Ctrl+C (default).
    #[command(visible_alias = "r")]
    Run,

    /// Run exactly one cycle and print a summary.
    #[command(visible_alias = "o")]
    Once(once::OnceArgs),

    /// List configured accounts.
    #[command(visible_alias = "a")]
    Accounts,

    /// List supported services.
    #[command(visible_alias = "s")]
    Services,

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// General error.
    Error = 1,
    /// Configuration missing or invalid.
    Config = 2,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn setup_logging(verbose: bool, quiet: bool, log_file: Option<&Path>) -> Result<()> {
    let directives = if quiet {
        "warn"
    } else if verbose {
        "autoclaim=debug,info"
    } else {
        "info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives));

    let file_layer = match log_file {
        Some(path) => {
            let file: File = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("opening log file {}", path.display()))?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .with(file_layer)
        .with(filter)
        .init();

    Ok(())
}

async fn load_config(cli: &Cli) -> Result<AppConfig> {
    let path = cli.config_path();
    AppConfig::load_from(&path)
        .await
        .with_context(|| format!("loading config from {}", path.display()))
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match &cli.command {
        None | Some(Commands::Run) => match load_config(&cli).await {
            Ok(config) => {
                setup_logging(cli.verbose, cli.quiet, config.log_file.as_deref())?;
                run::run(&cli, config).await
            }
            Err(e) => exit_with(&cli, &e, ExitCode::Config),
        },
        Some(Commands::Once(args)) => match load_config(&cli).await {
            Ok(config) => {
                setup_logging(cli.verbose, cli.quiet, config.log_file.as_deref())?;
                once::run(args, &cli, config).await
            }
            Err(e) => exit_with(&cli, &e, ExitCode::Config),
        },
        Some(Commands::Accounts) => match load_config(&cli).await {
            Ok(config) => {
                setup_logging(cli.verbose, cli.quiet, None)?;
                accounts::run(&cli, &config)
            }
            Err(e) => exit_with(&cli, &e, ExitCode::Config),
        },
        Some(Commands::Services) => {
            setup_logging(cli.verbose, cli.quiet, None)?;
            services::run(&cli)
        }
        Some(Commands::Config(args)) => {
            setup_logging(cli.verbose, cli.quiet, None)?;
            config::run(args, &cli).await
        }
    };

    if let Err(e) = result {
        exit_with(&cli, &e, ExitCode::Error)
    } else {
        Ok(())
    }
}

fn exit_with(cli: &Cli, error: &anyhow::Error, code: ExitCode) -> ! {
    if !cli.quiet {
        eprintln!("Error: {error:#}");
    }
    std::process::exit(code as i32);
}
