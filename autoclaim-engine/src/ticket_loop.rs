//! Ticket sub-loop.
//!
//! Consumes an account's remaining plays one at a time:
//!
//! ```text
//! Start -> Purchasing -> Checking --(0)--> Done
//!                           |  ^
//!                        (n>0) |
//!                           v  |
//!                        Playing -> AwaitingSettle -> Claiming
//! ```
//!
//! The remaining count is always re-read from the remote, never decremented
//! locally. An iteration cap stops the loop against a remote whose count
//! never goes down.

use std::time::Duration;

use autoclaim_core::{
    Account, AccountScope, ClaimFailure, FailureKind, Session, Severity, Stage, TicketLoopReport,
    TicketPhase, TicketPort, TicketState, TicketStop,
};
use autoclaim_fetch::RetryingInvoker;
use tracing::{debug, instrument};

/// Default wait between starting a play and claiming it.
pub const DEFAULT_SETTLE_DELAY: Duration = Duration::from_millis(1000);

/// Default wait between a successful claim and the next count check.
pub const DEFAULT_PLAY_DELAY: Duration = Duration::from_millis(5000);

/// Default cap on plays per sub-loop run.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Ticket sub-loop timings and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TicketLoopConfig {
    /// Settle window before claiming a started play.
    pub settle_delay: Duration,
    /// Delay between plays.
    pub play_delay: Duration,
    /// Maximum plays before the loop is treated as a protocol anomaly.
    pub max_iterations: u32,
}

impl Default for TicketLoopConfig {
    fn default() -> Self {
        Self {
            settle_delay: DEFAULT_SETTLE_DELAY,
            play_delay: DEFAULT_PLAY_DELAY,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

/// Drives the ticket sub-loop for one account.
#[derive(Debug, Clone)]
pub struct TicketLoopRunner {
    config: TicketLoopConfig,
    invoker: RetryingInvoker,
}

impl TicketLoopRunner {
    /// Creates a runner.
    pub fn new(config: TicketLoopConfig, invoker: RetryingInvoker) -> Self {
        Self { config, invoker }
    }

    /// The loop configuration.
    pub fn config(&self) -> TicketLoopConfig {
        self.config
    }

    /// Runs the loop until a stop condition.
    ///
    /// Returns `Err` only when the loop had to be abandoned: the count could
    /// not be read, a play could not be started, or the iteration cap was hit.
    #[instrument(skip_all, fields(account = %account.id))]
    pub async fn run(
        &self,
        port: &dyn TicketPort,
        account: &Account,
        session: &Session,
    ) -> Result<TicketLoopReport, ClaimFailure> {
        let scope = AccountScope::from(account);
        let sink = self.invoker.sink();
        let cancel = self.invoker.cancellation();

        let mut state = TicketState::new();
        let mut phase = TicketPhase::Start;

        loop {
            debug!(phase = ?phase, remaining = state.remaining, "Ticket loop step");

            phase = match phase {
                TicketPhase::Start => TicketPhase::Purchasing,

                TicketPhase::Purchasing => {
                    let result = self
                        .invoker
                        .invoke(&scope, Stage::Purchase, || {
                            port.purchase_tickets(account, session)
                        })
                        .await;
                    // A failed purchase is not fatal; whatever tickets exist can still be played.
                    match result {
                        Ok(()) => sink.emit(scope.event(
                            Stage::Purchase,
                            Severity::Info,
                            "Successfully purchased additional tickets",
                        )),
                        Err(f) if f.is(FailureKind::AlreadyClaimed) => sink.emit(scope.event(
                            Stage::Purchase,
                            Severity::Info,
                            "Daily ticket purchase already claimed",
                        )),
                        Err(f) if f.is(FailureKind::Cancelled) => {}
                        Err(f) => sink.emit(scope.event(
                            Stage::Purchase,
                            Severity::Warn,
                            format!("Failed to purchase tickets: {f}"),
                        )),
                    }
                    TicketPhase::Checking
                }

                TicketPhase::Checking => {
                    if cancel.is_cancelled() {
                        TicketPhase::Done(TicketStop::Cancelled)
                    } else {
                        let result = self
                            .invoker
                            .invoke(&scope, Stage::CheckTickets, || {
                                port.check_count(account, session)
                            })
                            .await;
                        match result {
                            Ok(count) => {
                                state.remaining = count;
                                sink.emit(scope.event(
                                    Stage::CheckTickets,
                                    Severity::Info,
                                    format!("Account has {count} game tickets"),
                                ));
                                if count == 0 {
                                    TicketPhase::Done(TicketStop::NoTickets)
                                } else {
                                    TicketPhase::Playing
                                }
                            }
                            Err(f) if f.is(FailureKind::Cancelled) => {
                                TicketPhase::Done(TicketStop::Cancelled)
                            }
                            Err(f) => return Err(f),
                        }
                    }
                }

                TicketPhase::Playing => {
                    if state.iterations >= self.config.max_iterations {
                        return Err(ClaimFailure::protocol_anomaly(format!(
                            "ticket count still {} after {} plays",
                            state.remaining, state.iterations
                        )));
                    }
                    state.iterations += 1;

                    let result = self
                        .invoker
                        .invoke(&scope, Stage::Play, || port.play_once(account, session))
                        .await;
                    match result {
                        Ok(Some(play)) => TicketPhase::AwaitingSettle(play),
                        Ok(None) => {
                            sink.emit(scope.event(
                                Stage::Play,
                                Severity::Info,
                                "Unable to start game",
                            ));
                            TicketPhase::Done(TicketStop::NothingPlayable)
                        }
                        Err(f) if f.is(FailureKind::AlreadyClaimed) => {
                            sink.emit(scope.event(
                                Stage::Play,
                                Severity::Info,
                                "Games already claimed, will try again next cycle",
                            ));
                            TicketPhase::Done(TicketStop::PlaysExhausted)
                        }
                        Err(f) if f.is(FailureKind::Cancelled) => {
                            TicketPhase::Done(TicketStop::Cancelled)
                        }
                        Err(f) => {
                            return Err(ClaimFailure::fatal(format!(
                                "play start failed: {}",
                                f.message
                            )));
                        }
                    }
                }

                TicketPhase::AwaitingSettle(play) => {
                    tokio::time::sleep(self.config.settle_delay).await;
                    TicketPhase::Claiming(play)
                }

                TicketPhase::Claiming(play) => {
                    let result = self
                        .invoker
                        .invoke(&scope, Stage::ClaimPlay, || {
                            port.claim_play(account, session, &play)
                        })
                        .await;
                    match result {
                        Ok(_) => {
                            state.plays_completed += 1;
                            sink.emit(scope.event(
                                Stage::ClaimPlay,
                                Severity::Info,
                                "Successfully completed game",
                            ));
                            tokio::select! {
                                () = cancel.cancelled() => TicketPhase::Done(TicketStop::Cancelled),
                                () = tokio::time::sleep(self.config.play_delay) => TicketPhase::Checking,
                            }
                        }
                        Err(f) => {
                            let stop = match f.kind {
                                FailureKind::GameExpired => TicketStop::GameExpired,
                                FailureKind::AlreadyClaimed => TicketStop::AlreadyClaimed,
                                FailureKind::Cancelled => TicketStop::Cancelled,
                                _ => TicketStop::ClaimRejected(f.message.clone()),
                            };
                            let severity = match f.kind {
                                FailureKind::Cancelled => Severity::Info,
                                _ if f.kind.is_benign() => Severity::Info,
                                _ => Severity::Warn,
                            };
                            sink.emit(scope.event(
                                Stage::ClaimPlay,
                                severity,
                                format!("Failed to claim game: {f}"),
                            ));
                            TicketPhase::Done(stop)
                        }
                    }
                }

                TicketPhase::Done(stop) => {
                    sink.emit(scope.event(
                        Stage::Tickets,
                        Severity::Info,
                        format!(
                            "Ticket loop finished: {stop} ({} plays)",
                            state.plays_completed
                        ),
                    ));
                    return Ok(TicketLoopReport::from_state(&state, stop));
                }
            };
        }
    }
}
