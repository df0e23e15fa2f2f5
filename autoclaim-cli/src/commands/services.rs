//! Services command - list supported services.

use anyhow::Result;
use autoclaim_providers::ServiceRegistry;

use crate::output::{JsonFormatter, ServiceOutput, TextFormatter};
use crate::{Cli, OutputFormat};

/// Runs the services command.
pub fn run(cli: &Cli) -> Result<()> {
    let services = ServiceRegistry::all();

    match cli.format {
        OutputFormat::Text => {
            let formatter = TextFormatter::new(!cli.no_color);

            println!("{}", formatter.format_services_header());
            println!("{}", "─".repeat(60));
            for desc in services {
                println!("{}", formatter.format_service_line(desc));
            }
            println!();
            println!("Total: {} services", services.len());
        }
        OutputFormat::Json => {
            let output: Vec<ServiceOutput> = services.iter().map(ServiceOutput::from).collect();
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&output)?);
        }
    }

    Ok(())
}
