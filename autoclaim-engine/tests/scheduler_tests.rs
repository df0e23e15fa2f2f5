//! Scheduler tests on a paused clock.

mod common;

use std::sync::Arc;
use std::time::Duration;

use autoclaim_core::{AccountScope, ServiceKind, Stage};
use autoclaim_engine::{RecordingSink, Scheduler, ServiceRouter, TicketLoopConfig};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use common::{FakePort, account, fast_budget, invoker, task, transient};

const MINUTE: Duration = Duration::from_secs(60);

struct Harness {
    scheduler: Scheduler,
    sink: Arc<RecordingSink>,
}

fn harness(ports: Vec<Arc<FakePort>>) -> Harness {
    let sink = Arc::new(RecordingSink::new());
    let root = CancellationToken::new();
    let budget = fast_budget().with_attempt_timeout(Duration::from_secs(600));
    let mut router = ServiceRouter::new(task(
        invoker(budget, &sink, &root),
        TicketLoopConfig::default(),
    ));
    for port in ports {
        router = router.with_port(port);
    }
    let scheduler = Scheduler::new(Arc::new(router), sink.clone()).with_cancellation(root);
    Harness { scheduler, sink }
}

#[tokio::test(start_paused = true)]
async fn test_empty_account_list_arms_nothing() {
    let mut h = harness(vec![]);
    h.scheduler.start(&[]);
    assert_eq!(h.scheduler.live_timers(), 0);
    assert!(h.sink.events().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_start_runs_every_account_immediately() {
    let hot = Arc::new(FakePort::new(ServiceKind::Hot));
    let vooi = Arc::new(FakePort::new(ServiceKind::Vooi));
    let mut h = harness(vec![hot.clone(), vooi.clone()]);

    h.scheduler.start(&[
        account("a", ServiceKind::Hot).with_interval(MINUTE),
        account("b", ServiceKind::Vooi).with_interval(MINUTE),
    ]);
    assert_eq!(h.scheduler.live_timers(), 2);

    tokio::time::sleep(Duration::from_millis(10)).await;
    assert_eq!(hot.claims(), 1);
    assert_eq!(vooi.claims(), 1);

    let scheduled = h
        .sink
        .events()
        .into_iter()
        .filter(|e| e.stage == Stage::Schedule)
        .count();
    assert_eq!(scheduled, 2);

    h.scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_claims_once_per_interval_plus_initial() {
    let hot = Arc::new(FakePort::new(ServiceKind::Hot));
    let mut h = harness(vec![hot.clone()]);

    h.scheduler
        .start(&[account("a", ServiceKind::Hot).with_interval(MINUTE).with_tickets(false)]);
    tokio::time::sleep(Duration::from_secs(300) + Duration::from_millis(10)).await;

    assert_eq!(hot.claims(), 6);
    h.scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_default_interval_comes_from_service() {
    let meow = Arc::new(FakePort::new(ServiceKind::SuperMeow));
    let mut h = harness(vec![meow.clone()]);
    let acc = account("a", ServiceKind::SuperMeow);

    h.scheduler.start(std::slice::from_ref(&acc));

    assert_eq!(
        h.scheduler.interval(&AccountScope::from(&acc)),
        Some(Duration::from_secs(12_600))
    );
    h.scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_slow_account_does_not_delay_others() {
    let slow = Arc::new(FakePort::new(ServiceKind::Hot).with_claim_delay(Duration::from_secs(100)));
    let fast = Arc::new(FakePort::new(ServiceKind::Vooi));
    let mut h = harness(vec![slow.clone(), fast.clone()]);

    h.scheduler.start(&[
        account("slow", ServiceKind::Hot).with_interval(MINUTE),
        account("fast", ServiceKind::Vooi).with_interval(MINUTE),
    ]);
    tokio::time::sleep(Duration::from_secs(130)).await;

    assert_eq!(fast.claims(), 3);
    assert!(slow.claims() <= 2);
    h.scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_cycles_for_one_account_never_overlap() {
    let slow = Arc::new(FakePort::new(ServiceKind::Hot).with_claim_delay(Duration::from_secs(150)));
    let mut h = harness(vec![slow.clone()]);

    h.scheduler
        .start(&[account("a", ServiceKind::Hot).with_interval(MINUTE)]);
    tokio::time::sleep(Duration::from_secs(600)).await;

    assert!(slow.claims() >= 3);
    assert_eq!(slow.max_concurrent_claims(), 1);
    h.scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_rearm_replaces_timer() {
    let hot = Arc::new(FakePort::new(ServiceKind::Hot));
    let mut h = harness(vec![hot.clone()]);
    let acc = account("a", ServiceKind::Hot).with_interval(MINUTE);

    h.scheduler.start(std::slice::from_ref(&acc));
    h.scheduler.start(std::slice::from_ref(&acc));
    assert_eq!(h.scheduler.live_timers(), 1);

    tokio::time::sleep(MINUTE + Duration::from_millis(10)).await;
    assert_eq!(hot.claims(), 2);
    h.scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_same_id_on_different_services_are_separate_timers() {
    let hot = Arc::new(FakePort::new(ServiceKind::Hot));
    let vooi = Arc::new(FakePort::new(ServiceKind::Vooi));
    let mut h = harness(vec![hot, vooi]);

    h.scheduler.start(&[
        account("same", ServiceKind::Hot),
        account("same", ServiceKind::Vooi),
    ]);

    assert_eq!(h.scheduler.live_timers(), 2);
    h.scheduler.shutdown().await;
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_stops_all_timers() {
    let hot = Arc::new(FakePort::new(ServiceKind::Hot));
    let mut h = harness(vec![hot.clone()]);

    h.scheduler
        .start(&[account("a", ServiceKind::Hot).with_interval(MINUTE)]);
    tokio::time::sleep(Duration::from_millis(10)).await;
    h.scheduler.shutdown().await;

    assert_eq!(h.scheduler.live_timers(), 0);
    assert!(h.scheduler.cancellation().is_cancelled());

    tokio::time::sleep(MINUTE * 10).await;
    assert_eq!(hot.claims(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_shutdown_interrupts_retry_delay() {
    let hot = Arc::new(FakePort::new(ServiceKind::Hot).with_claims(vec![Err(transient("503"))]));
    let mut h = harness(vec![hot.clone()]);

    h.scheduler
        .start(&[account("a", ServiceKind::Hot).with_interval(MINUTE)]);
    // Inside the first 5s retry delay.
    tokio::time::sleep(Duration::from_secs(1)).await;

    let start = Instant::now();
    h.scheduler.shutdown().await;

    assert!(start.elapsed() < Duration::from_secs(1));
    assert_eq!(hot.claims(), 1);
}
