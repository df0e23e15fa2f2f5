//! One farming cycle for one account.

use autoclaim_core::{
    Account, AccountScope, ClaimFailure, ClaimPort, CycleReport, FailureKind, Severity, Stage,
};
use autoclaim_fetch::RetryingInvoker;
use tracing::instrument;

use crate::ticket_loop::TicketLoopRunner;

/// Runs login, claim, farm, status and the ticket sub-loop for an account.
///
/// Every failure is classified, reported to the event sink and recorded in
/// the returned [`CycleReport`]; `run` itself never fails.
#[derive(Debug, Clone)]
pub struct AccountTask {
    invoker: RetryingInvoker,
    tickets: TicketLoopRunner,
}

impl AccountTask {
    /// Creates a task.
    pub fn new(invoker: RetryingInvoker, tickets: TicketLoopRunner) -> Self {
        Self { invoker, tickets }
    }

    /// The invoker wrapping every remote call after login.
    pub fn invoker(&self) -> &RetryingInvoker {
        &self.invoker
    }

    fn report_failure(&self, scope: &AccountScope, stage: Stage, failure: &ClaimFailure) {
        let severity = match failure.kind {
            FailureKind::Cancelled => Severity::Info,
            _ if failure.kind.is_benign() => Severity::Info,
            _ => Severity::Error,
        };
        self.invoker
            .sink()
            .emit(scope.event(stage, severity, format!("{stage} failed: {failure}")));
    }

    /// Runs one cycle.
    #[instrument(skip_all, fields(account = %account.id, service = %account.service))]
    pub async fn run(&self, port: &dyn ClaimPort, account: &Account) -> CycleReport {
        let scope = AccountScope::from(account);
        let sink = self.invoker.sink();
        let mut report = CycleReport::begin(account.id.clone(), account.service);

        if self.invoker.cancellation().is_cancelled() {
            report.abort(Stage::Cycle, &ClaimFailure::cancelled());
            return report.finish();
        }

        // Login is never retried.
        let session = match port.login(account).await {
            Ok(session) => session,
            Err(failure) => {
                let failure = ClaimFailure::new(
                    if failure.is(FailureKind::Cancelled) {
                        FailureKind::Cancelled
                    } else {
                        FailureKind::Fatal
                    },
                    failure.message,
                );
                self.report_failure(&scope, Stage::Login, &failure);
                report.abort(Stage::Login, &failure);
                return report.finish();
            }
        };
        sink.emit(scope.event(Stage::Login, Severity::Debug, "Session established"));

        let claim = self
            .invoker
            .invoke(&scope, Stage::Claim, || port.perform_claim(account, &session))
            .await;
        let claimed = match claim {
            Ok(receipt) => {
                sink.emit(scope.event(Stage::Claim, Severity::Info, format!("Claimed: {receipt}")));
                report.claim = Some(receipt);
                true
            }
            Err(failure) if failure.kind.is_benign() => {
                sink.emit(scope.event(
                    Stage::Claim,
                    Severity::Info,
                    format!("Nothing to claim yet: {}", failure.message),
                ));
                report.already_claimed = true;
                false
            }
            Err(failure) => {
                self.report_failure(&scope, Stage::Claim, &failure);
                report.abort(Stage::Claim, &failure);
                return report.finish();
            }
        };

        if claimed {
            let farm = self
                .invoker
                .invoke(&scope, Stage::Farm, || port.start_farming(account, &session))
                .await;
            match farm {
                Ok(Some(receipt)) => {
                    sink.emit(scope.event(Stage::Farm, Severity::Info, format!("Farming: {receipt}")));
                    report.farm = Some(receipt);
                }
                Ok(None) => {}
                Err(failure) => {
                    self.report_failure(&scope, Stage::Farm, &failure);
                    report.record_error(Stage::Farm, &failure);
                }
            }
        }

        let status = self
            .invoker
            .invoke(&scope, Stage::Status, || port.read_status(account, &session))
            .await;
        match status {
            Ok(Some(receipt)) => {
                sink.emit(scope.event(Stage::Status, Severity::Info, format!("Status: {receipt}")));
                report.status = Some(receipt);
            }
            Ok(None) => {}
            Err(failure) => {
                self.report_failure(&scope, Stage::Status, &failure);
                report.record_error(Stage::Status, &failure);
            }
        }

        if account.tickets_enabled {
            if let Some(tickets) = port.tickets() {
                match self.tickets.run(tickets, account, &session).await {
                    Ok(outcome) => report.tickets = Some(outcome),
                    Err(failure) => {
                        self.report_failure(&scope, Stage::Tickets, &failure);
                        report.record_error(Stage::Tickets, &failure);
                    }
                }
            }
        }

        let report = report.finish();
        sink.emit(scope.event(
            Stage::Cycle,
            Severity::Info,
            format!("Cycle finished ({} plays)", report.plays()),
        ));
        report
    }
}
