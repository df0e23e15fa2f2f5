//! Bounded retry with a fixed delay.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use autoclaim_core::{AccountScope, ClaimFailure, ClaimOutcome, EventSink, Severity, Stage};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default retries after the first attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Default delay between attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(5000);

/// Default per-attempt deadline.
pub const DEFAULT_ATTEMPT_TIMEOUT: Duration = Duration::from_secs(30);

/// Retry limits for one remote call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryBudget {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Fixed delay between attempts.
    pub delay: Duration,
    /// Deadline for a single attempt.
    pub attempt_timeout: Duration,
}

impl RetryBudget {
    /// Creates a budget with the default attempt timeout.
    pub fn new(max_retries: u32, delay: Duration) -> Self {
        Self {
            max_retries,
            delay,
            attempt_timeout: DEFAULT_ATTEMPT_TIMEOUT,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self::new(0, Duration::ZERO)
    }

    /// Sets the per-attempt deadline.
    #[must_use]
    pub fn with_attempt_timeout(mut self, timeout: Duration) -> Self {
        self.attempt_timeout = timeout;
        self
    }

    /// Total attempts, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY)
    }
}

/// Runs remote operations under a [`RetryBudget`].
///
/// Only [`autoclaim_core::FailureKind::Transient`] failures are retried.
/// Every retry and the final exhaustion are reported to the event sink.
#[derive(Clone)]
pub struct RetryingInvoker {
    budget: RetryBudget,
    sink: Arc<dyn EventSink>,
    cancel: CancellationToken,
}

impl RetryingInvoker {
    /// Creates an invoker that is never cancelled.
    pub fn new(budget: RetryBudget, sink: Arc<dyn EventSink>) -> Self {
        Self {
            budget,
            sink,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns an invoker that stops retrying once `cancel` fires.
    #[must_use]
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// The retry budget.
    pub fn budget(&self) -> RetryBudget {
        self.budget
    }

    /// The cancellation token.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.cancel
    }

    /// The event sink retries are reported to.
    pub fn sink(&self) -> &Arc<dyn EventSink> {
        &self.sink
    }

    /// Invokes `operation` until it succeeds, fails non-transiently, or the
    /// budget is exhausted.
    pub async fn invoke<T, F, Fut>(
        &self,
        scope: &AccountScope,
        stage: Stage,
        mut operation: F,
    ) -> ClaimOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ClaimOutcome<T>>,
    {
        let max_attempts = self.budget.max_attempts();
        let mut attempt = 1;

        loop {
            if self.cancel.is_cancelled() {
                return Err(ClaimFailure::cancelled());
            }

            debug!(account = %scope, stage = %stage, attempt, "Invoking");

            let result = match tokio::time::timeout(self.budget.attempt_timeout, operation()).await
            {
                Ok(result) => result,
                Err(_) => Err(ClaimFailure::transient(format!(
                    "timed out after {}ms",
                    self.budget.attempt_timeout.as_millis()
                ))),
            };

            let failure = match result {
                Ok(value) => return Ok(value),
                Err(failure) => failure,
            };

            if !failure.kind.is_retryable() {
                return Err(failure);
            }

            if attempt >= max_attempts {
                self.sink.emit(scope.event(
                    stage,
                    Severity::Error,
                    format!("{failure} (gave up after {max_attempts} attempts)"),
                ));
                return Err(failure);
            }

            self.sink.emit(scope.event(
                stage,
                Severity::Warn,
                format!(
                    "attempt {attempt} failed: {failure}; retrying in {}ms ({} retries left)",
                    self.budget.delay.as_millis(),
                    max_attempts - attempt
                ),
            ));

            tokio::select! {
                () = self.cancel.cancelled() => return Err(ClaimFailure::cancelled()),
                () = tokio::time::sleep(self.budget.delay) => {}
            }

            attempt += 1;
        }
    }
}

impl std::fmt::Debug for RetryingInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingInvoker")
            .field("budget", &self.budget)
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicU32, Ordering};

    use autoclaim_core::{AccountId, FailureKind, ProgressEvent, ServiceKind};
    use tokio::time::Instant;

    use super::*;

    #[derive(Default)]
    struct Collect(Mutex<Vec<ProgressEvent>>);

    impl EventSink for Collect {
        fn emit(&self, event: ProgressEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    impl Collect {
        fn severities(&self) -> Vec<Severity> {
            self.0.lock().unwrap().iter().map(|e| e.severity).collect()
        }
    }

    fn scope() -> AccountScope {
        AccountScope::new(AccountId::new("u1"), ServiceKind::Hot)
    }

    fn invoker(sink: &Arc<Collect>) -> RetryingInvoker {
        RetryingInvoker::new(RetryBudget::default(), sink.clone())
    }

    #[test]
    fn test_budget_defaults() {
        let budget = RetryBudget::default();
        assert_eq!(budget.max_attempts(), 4);
        assert_eq!(budget.delay, Duration::from_millis(5000));
        assert_eq!(RetryBudget::no_retry().max_attempts(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_transient_exhausts_budget() {
        let sink = Arc::new(Collect::default());
        let calls = AtomicU32::new(0);
        let start = Instant::now();

        let result: ClaimOutcome<()> = invoker(&sink)
            .invoke(&scope(), Stage::Claim, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ClaimFailure::transient("connection reset")) }
            })
            .await;

        assert_eq!(result.unwrap_err().kind, FailureKind::Transient);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert!(start.elapsed() >= Duration::from_millis(15_000));
        assert_eq!(
            sink.severities(),
            vec![Severity::Warn, Severity::Warn, Severity::Warn, Severity::Error]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_retryable_returns_immediately() {
        for failure in [
            ClaimFailure::fatal("unauthorized"),
            ClaimFailure::already_claimed("already"),
            ClaimFailure::game_expired("gone"),
        ] {
            let sink = Arc::new(Collect::default());
            let calls = AtomicU32::new(0);
            let expected = failure.kind;

            let result: ClaimOutcome<()> = invoker(&sink)
                .invoke(&scope(), Stage::Claim, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    let failure = failure.clone();
                    async move { Err(failure) }
                })
                .await;

            assert_eq!(result.unwrap_err().kind, expected);
            assert_eq!(calls.load(Ordering::SeqCst), 1);
            assert!(sink.severities().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_transient_then_success() {
        let sink = Arc::new(Collect::default());
        let calls = AtomicU32::new(0);

        let result = invoker(&sink)
            .invoke(&scope(), Stage::Claim, || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n == 0 {
                        Err(ClaimFailure::transient("503"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(sink.severities(), vec![Severity::Warn]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempt_timeout_is_transient() {
        let sink = Arc::new(Collect::default());
        let budget = RetryBudget::no_retry().with_attempt_timeout(Duration::from_secs(1));
        let invoker = RetryingInvoker::new(budget, sink.clone());

        let result: ClaimOutcome<()> = invoker
            .invoke(&scope(), Stage::Claim, || async {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok(())
            })
            .await;

        assert_eq!(result.unwrap_err().kind, FailureKind::Transient);
        assert_eq!(sink.severities(), vec![Severity::Error]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_before_first_attempt() {
        let sink = Arc::new(Collect::default());
        let token = CancellationToken::new();
        token.cancel();
        let calls = AtomicU32::new(0);

        let result: ClaimOutcome<()> = invoker(&sink)
            .with_cancellation(token)
            .invoke(&scope(), Stage::Claim, || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert_eq!(result.unwrap_err().kind, FailureKind::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_during_delay() {
        let sink = Arc::new(Collect::default());
        let token = CancellationToken::new();
        let invoker = invoker(&sink).with_cancellation(token.clone());
        let calls = Arc::new(AtomicU32::new(0));

        let task_calls = calls.clone();
        let handle = tokio::spawn(async move {
            invoker
                .invoke(&scope(), Stage::Claim, || {
                    task_calls.fetch_add(1, Ordering::SeqCst);
                    async { Err::<(), _>(ClaimFailure::transient("down")) }
                })
                .await
        });

        tokio::time::sleep(Duration::from_millis(1000)).await;
        token.cancel();

        let result = handle.await.unwrap();
        assert_eq!(result.unwrap_err().kind, FailureKind::Cancelled);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
