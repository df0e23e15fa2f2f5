//! Per-account periodic timers.
//!
//! Each armed account gets its own task: an immediate run, then one run per
//! interval. Runs for the same account never overlap; a tick that comes due
//! while a cycle is still running is skipped.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use autoclaim_core::{Account, AccountScope, EventSink, Severity, Stage};
use futures::FutureExt;
use futures::future::BoxFuture;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::router::CycleRunner;

/// Work run on every tick of an account's timer.
pub type CycleCallback = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// Smallest interval a timer accepts.
const MIN_INTERVAL: Duration = Duration::from_millis(1);

struct ScheduleEntry {
    interval: Duration,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Owns one cancellable timer per account.
pub struct Scheduler {
    runner: Arc<dyn CycleRunner>,
    sink: Arc<dyn EventSink>,
    root: CancellationToken,
    entries: HashMap<AccountScope, ScheduleEntry>,
    /// Outlives re-arms so a new timer's first run waits for the old cycle.
    cycle_locks: HashMap<AccountScope, Arc<Mutex<()>>>,
}

impl Scheduler {
    /// Creates a scheduler with its own root cancellation token.
    pub fn new(runner: Arc<dyn CycleRunner>, sink: Arc<dyn EventSink>) -> Self {
        Self {
            runner,
            sink,
            root: CancellationToken::new(),
            entries: HashMap::new(),
            cycle_locks: HashMap::new(),
        }
    }

    /// Uses `root` as the parent of every timer's token.
    ///
    /// Pass the same token to the [`autoclaim_fetch::RetryingInvoker`] so that
    /// shutdown also stops in-flight retries and ticket loops.
    #[must_use]
    pub fn with_cancellation(mut self, root: CancellationToken) -> Self {
        self.root = root;
        self
    }

    /// The root cancellation token.
    pub fn cancellation(&self) -> &CancellationToken {
        &self.root
    }

    /// Arms a timer for every account, running each one immediately.
    pub fn start(&mut self, accounts: &[Account]) {
        if accounts.is_empty() {
            info!("No accounts configured; nothing to schedule");
            return;
        }

        info!(accounts = accounts.len(), "Starting auto-claim for all accounts");

        for account in accounts {
            let scope = AccountScope::from(account);
            let interval = account.interval();
            self.sink.emit(scope.event(
                Stage::Schedule,
                Severity::Info,
                format!("Starting auto-claim every {}", format_interval(interval)),
            ));

            let runner = Arc::clone(&self.runner);
            let account = Arc::new(account.clone());
            let callback: CycleCallback = Arc::new(move || {
                let runner = Arc::clone(&runner);
                let account = Arc::clone(&account);
                async move {
                    let report = runner.run_cycle(&account).await;
                    match &report.aborted {
                        Some((stage, reason)) => {
                            warn!(account = %account.label(), stage = %stage, reason = %reason, "Cycle aborted");
                        }
                        None => debug!(
                            account = %account.label(),
                            plays = report.plays(),
                            errors = report.errors.len(),
                            "Cycle complete"
                        ),
                    }
                }
                .boxed()
            });

            self.arm(scope, interval, callback);
        }
    }

    /// Arms (or re-arms) the timer for `key`.
    ///
    /// An existing timer for the same key is cancelled first. A cycle it has
    /// in flight is allowed to finish; the new timer's first run waits for it.
    pub fn arm(&mut self, key: AccountScope, interval: Duration, callback: CycleCallback) {
        if self.cancel(&key) {
            debug!(account = %key, "Re-arming timer");
        }

        let interval = interval.max(MIN_INTERVAL);
        let token = self.root.child_token();
        let lock = Arc::clone(
            self.cycle_locks
                .entry(key.clone())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        );

        let handle = tokio::spawn(timer_loop(
            key.clone(),
            interval,
            token.clone(),
            lock,
            callback,
        ));

        self.entries.insert(
            key,
            ScheduleEntry {
                interval,
                token,
                handle,
            },
        );
    }

    /// Cancels the timer for `key`. Returns false if none was armed.
    pub fn cancel(&mut self, key: &AccountScope) -> bool {
        match self.entries.remove(key) {
            Some(entry) => {
                entry.token.cancel();
                true
            }
            None => false,
        }
    }

    /// Returns true if `key` has a live timer.
    pub fn is_armed(&self, key: &AccountScope) -> bool {
        self.entries.contains_key(key)
    }

    /// Interval of the timer for `key`.
    pub fn interval(&self, key: &AccountScope) -> Option<Duration> {
        self.entries.get(key).map(|e| e.interval)
    }

    /// Number of live timers.
    pub fn live_timers(&self) -> usize {
        self.entries.len()
    }

    /// Cancels every timer and waits for running cycles to reach a
    /// cancellation point.
    pub async fn shutdown(&mut self) {
        info!(timers = self.entries.len(), "Shutting down scheduler");
        self.root.cancel();

        for (key, entry) in self.entries.drain() {
            if let Err(e) = entry.handle.await {
                warn!(account = %key, error = %e, "Timer task ended abnormally");
            }
        }
    }
}

impl std::fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scheduler")
            .field("live_timers", &self.entries.len())
            .field("cancelled", &self.root.is_cancelled())
            .finish_non_exhaustive()
    }
}

fn timer_loop(
    key: AccountScope,
    interval: Duration,
    token: CancellationToken,
    lock: Arc<Mutex<()>>,
    callback: CycleCallback,
) -> impl Future<Output = ()> + Send + 'static {
    async move {
        // The first tick completes immediately.
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                () = token.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let _guard = tokio::select! {
                biased;
                () = token.cancelled() => break,
                guard = lock.lock() => guard,
            };

            debug!(account = %key, "Timer fired");
            callback().await;
        }

        debug!(account = %key, "Timer stopped");
    }
}

fn format_interval(interval: Duration) -> String {
    let secs = interval.as_secs_f64();
    let (value, unit) = if secs >= 3600.0 {
        (secs / 3600.0, "hour")
    } else if secs >= 60.0 {
        (secs / 60.0, "minute")
    } else {
        return format!("{} ms", interval.as_millis());
    };
    if (value - 1.0).abs() < f64::EPSILON {
        format!("1 {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    use autoclaim_core::{AccountId, ServiceKind};

    use crate::sink::RecordingSink;

    struct Noop;

    #[async_trait::async_trait]
    impl CycleRunner for Noop {
        async fn run_cycle(&self, account: &Account) -> autoclaim_core::CycleReport {
            autoclaim_core::CycleReport::begin(account.id.clone(), account.service).finish()
        }
    }

    fn scheduler() -> Scheduler {
        Scheduler::new(Arc::new(Noop), Arc::new(RecordingSink::new()))
    }

    fn key(id: &str) -> AccountScope {
        AccountScope::new(AccountId::new(id), ServiceKind::Hot)
    }

    fn counting(counter: &Arc<AtomicU32>) -> CycleCallback {
        let counter = Arc::clone(counter);
        Arc::new(move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
            }
            .boxed()
        })
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(Duration::from_secs(8 * 3600)), "8 hours");
        assert_eq!(format_interval(Duration::from_secs(12_600)), "3.5 hours");
        assert_eq!(format_interval(Duration::from_secs(120)), "2 minutes");
        assert_eq!(format_interval(Duration::from_secs(3600)), "1 hour");
        assert_eq!(format_interval(Duration::from_millis(5)), "5 ms");
    }

    #[tokio::test(start_paused = true)]
    async fn test_arm_runs_immediately_then_every_interval() {
        let mut scheduler = scheduler();
        let calls = Arc::new(AtomicU32::new(0));

        scheduler.arm(key("a"), Duration::from_secs(60), counting(&calls));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        tokio::time::sleep(Duration::from_secs(180)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 4);

        scheduler.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_timer() {
        let mut scheduler = scheduler();
        let calls = Arc::new(AtomicU32::new(0));

        scheduler.arm(key("a"), Duration::from_secs(60), counting(&calls));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(scheduler.cancel(&key("a")));
        assert!(!scheduler.cancel(&key("a")));
        assert!(!scheduler.is_armed(&key("a")));

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let mut scheduler = scheduler();
        let calls = Arc::new(AtomicU32::new(0));

        scheduler.arm(key("a"), Duration::ZERO, counting(&calls));
        assert_eq!(scheduler.interval(&key("a")), Some(MIN_INTERVAL));
        scheduler.shutdown().await;
    }
}
