//! Accounts command - list configured accounts.

use anyhow::Result;
use autoclaim_store::AppConfig;

use crate::output::{AccountOutput, JsonFormatter, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the accounts command.
pub fn run(cli: &Cli, config: &AppConfig) -> Result<()> {
    let accounts = config.accounts()?;

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_accounts_header());
            println!("{}", "─".repeat(60));
            for account in &accounts {
                println!("{}", formatter.format_account_line(account));
            }
            println!();
            println!("Total: {} accounts", accounts.len());
        }
        OutputFormat::Json => {
            let output: Vec<AccountOutput> = accounts.iter().map(AccountOutput::from).collect();
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(())
}
