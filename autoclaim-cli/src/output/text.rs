//! Text output formatting with colors.

use std::time::Duration;

use chrono::{DateTime, Local, Utc};

use autoclaim_core::{Account, CycleReport};
use autoclaim_providers::ServiceDescriptor;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self { use_colors }
    }

    /// Formats one cycle report.
    pub fn format_report(&self, report: &CycleReport) -> String {
        let mut lines = Vec::new();

        let status = match &report.aborted {
            Some((stage, _)) => self.red(&format!("✗ aborted at {stage}")),
            None if report.errors.is_empty() => self.green("✓ ok"),
            None => self.yellow("! partial"),
        };
        lines.push(format!(
            "{} {}",
            self.bold(&format!("{} - {}", report.service.tag(), report.account)),
            status
        ));
        lines.push(format!(
            "  Ran:     {}",
            self.dim(&format_run_time(report.started_at, report.finished_at))
        ));

        if let Some(claim) = &report.claim {
            lines.push(format!("  Claim:   {claim}"));
        } else if report.already_claimed {
            lines.push(format!("  Claim:   {}", self.dim("already claimed")));
        }
        if let Some(farm) = &report.farm {
            lines.push(format!("  Farm:    {farm}"));
        }
        if let Some(status) = &report.status {
            lines.push(format!("  Status:  {status}"));
        }
        if let Some(tickets) = &report.tickets {
            lines.push(format!(
                "  Tickets: {} plays, stopped: {}",
                tickets.plays_completed, tickets.stop
            ));
        }
        if let Some((_, reason)) = &report.aborted {
            lines.push(format!("  Error:   {}", self.red(reason)));
        }
        for (stage, reason) in &report.errors {
            lines.push(format!("  {}", self.yellow(&format!("{stage}: {reason}"))));
        }

        lines.join("\n")
    }

    /// Formats a one-line total over all reports.
    pub fn format_totals(&self, reports: &[CycleReport]) -> String {
        let aborted = reports.iter().filter(|r| !r.is_complete()).count();
        let plays: u32 = reports.iter().map(CycleReport::plays).sum();
        let summary = format!(
            "{} accounts, {} claimed, {} aborted, {} plays",
            reports.len(),
            reports.iter().filter(|r| r.claim.is_some()).count(),
            aborted,
            plays
        );
        if aborted > 0 {
            self.red(&summary)
        } else {
            self.bold(&summary)
        }
    }

    /// Formats the account list header.
    pub fn format_accounts_header(&self) -> String {
        format!(
            "{:<20} {:<12} {:<10} {}",
            self.bold("Account"),
            self.bold("Service"),
            self.bold("Interval"),
            self.bold("Tickets")
        )
    }

    /// Formats a single account line.
    pub fn format_account_line(&self, account: &Account) -> String {
        let interval = format_hours(account.interval());
        let interval = if account.interval.is_some() {
            interval
        } else {
            self.dim(&interval)
        };
        let tickets = if account.tickets_enabled {
            self.green("✓")
        } else {
            self.dim("−")
        };

        format!(
            "{:<20} {:<12} {:<10} {}",
            account.id.as_str(),
            account.service.cli_name(),
            interval,
            tickets
        )
    }

    /// Formats the service list header.
    pub fn format_services_header(&self) -> String {
        format!(
            "{:<12} {:<12} {:<10} {:<8} {}",
            self.bold("Service"),
            self.bold("CLI"),
            self.bold("Interval"),
            self.bold("Tickets"),
            self.bold("Aliases")
        )
    }

    /// Formats a single service line.
    pub fn format_service_line(&self, desc: &ServiceDescriptor) -> String {
        let tickets = if desc.has_tickets {
            self.green("✓")
        } else {
            self.dim("−")
        };
        let aliases = if desc.aliases.is_empty() {
            "−".to_string()
        } else {
            desc.aliases.join(", ")
        };

        format!(
            "{:<12} {:<12} {:<10} {:<8} {}",
            desc.display_name(),
            desc.cli_name(),
            format_hours(desc.default_interval()),
            tickets,
            aliases
        )
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }
}

/// Formats a cycle's local start time and how long it took.
#[allow(clippy::cast_precision_loss)]
pub(crate) fn format_run_time(started: DateTime<Utc>, finished: DateTime<Utc>) -> String {
    let took_ms = finished.signed_duration_since(started).num_milliseconds().max(0);
    format!(
        "{} ({:.1}s)",
        started.with_timezone(&Local).format("%H:%M:%S"),
        took_ms as f64 / 1000.0
    )
}

/// `8h`, `3.5h`, `45m`.
pub(crate) fn format_hours(interval: Duration) -> String {
    let secs = interval.as_secs();
    if secs >= 3600 {
        let hours = interval.as_secs_f64() / 3600.0;
        if secs % 3600 == 0 {
            format!("{}h", secs / 3600)
        } else {
            format!("{hours:.1}h")
        }
    } else {
        format!("{}m", secs / 60)
    }
}
