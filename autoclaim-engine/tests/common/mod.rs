//! Scripted in-memory ports shared by the engine tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use autoclaim_core::{
    Account, ClaimFailure, ClaimOutcome, ClaimPort, Credentials, EventSink, PlayId, Receipt,
    ServiceKind, Session, TicketPort,
};
use autoclaim_engine::{AccountTask, RecordingSink, TicketLoopConfig, TicketLoopRunner};
use autoclaim_fetch::{RetryBudget, RetryingInvoker};
use tokio_util::sync::CancellationToken;

/// Pops the next scripted outcome; the last one repeats forever.
fn next<T: Clone>(script: &Mutex<VecDeque<T>>, fallback: T) -> T {
    let mut script = script.lock().unwrap();
    if script.len() > 1 {
        script.pop_front().unwrap()
    } else {
        script.front().cloned().unwrap_or(fallback)
    }
}

// ============================================================================
// Ticket port
// ============================================================================

#[derive(Default)]
pub struct FakeTickets {
    pub purchase: Mutex<VecDeque<ClaimOutcome<()>>>,
    pub counts: Mutex<VecDeque<ClaimOutcome<u32>>>,
    pub plays: Mutex<VecDeque<ClaimOutcome<Option<PlayId>>>>,
    pub claims: Mutex<VecDeque<ClaimOutcome<Receipt>>>,
    pub purchase_calls: AtomicU32,
    pub check_calls: AtomicU32,
    pub play_calls: AtomicU32,
    pub claim_calls: AtomicU32,
}

impl FakeTickets {
    /// Remote that reports `counts` in order, then repeats the last one.
    pub fn with_counts(counts: &[u32]) -> Self {
        let tickets = Self::default();
        *tickets.counts.lock().unwrap() = counts.iter().copied().map(Ok).collect();
        tickets
    }

    pub fn script_plays(self, plays: Vec<ClaimOutcome<Option<PlayId>>>) -> Self {
        *self.plays.lock().unwrap() = plays.into();
        self
    }

    pub fn script_claims(self, claims: Vec<ClaimOutcome<Receipt>>) -> Self {
        *self.claims.lock().unwrap() = claims.into();
        self
    }

    pub fn script_purchase(self, purchase: Vec<ClaimOutcome<()>>) -> Self {
        *self.purchase.lock().unwrap() = purchase.into();
        self
    }

    pub fn script_counts(self, counts: Vec<ClaimOutcome<u32>>) -> Self {
        *self.counts.lock().unwrap() = counts.into();
        self
    }

    pub fn plays_started(&self) -> u32 {
        self.play_calls.load(Ordering::SeqCst)
    }

    pub fn plays_claimed(&self) -> u32 {
        self.claim_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TicketPort for FakeTickets {
    async fn purchase_tickets(&self, _account: &Account, _session: &Session) -> ClaimOutcome<()> {
        self.purchase_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.purchase, Ok(()))
    }

    async fn check_count(&self, _account: &Account, _session: &Session) -> ClaimOutcome<u32> {
        self.check_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.counts, Ok(0))
    }

    async fn play_once(
        &self,
        _account: &Account,
        _session: &Session,
    ) -> ClaimOutcome<Option<PlayId>> {
        let n = self.play_calls.fetch_add(1, Ordering::SeqCst) + 1;
        next(&self.plays, Ok(Some(PlayId::new(format!("game-{n}")))))
            .map(|play| play.map(|_| PlayId::new(format!("game-{n}"))))
    }

    async fn claim_play(
        &self,
        _account: &Account,
        _session: &Session,
        play: &PlayId,
    ) -> ClaimOutcome<Receipt> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.claims, Ok(Receipt::new(format!("claimed {play}"))))
    }
}

// ============================================================================
// Claim port
// ============================================================================

pub struct FakePort {
    pub service: ServiceKind,
    pub login: Mutex<VecDeque<ClaimOutcome<Session>>>,
    pub claims: Mutex<VecDeque<ClaimOutcome<Receipt>>>,
    pub farm: Mutex<VecDeque<ClaimOutcome<Option<Receipt>>>>,
    pub status: Mutex<VecDeque<ClaimOutcome<Option<Receipt>>>>,
    pub claim_delay: Duration,
    pub tickets: Option<FakeTickets>,
    pub login_calls: AtomicU32,
    pub claim_calls: AtomicU32,
    pub farm_calls: AtomicU32,
    pub status_calls: AtomicU32,
    in_flight: AtomicU32,
    max_in_flight: AtomicU32,
}

impl FakePort {
    pub fn new(service: ServiceKind) -> Self {
        Self {
            service,
            login: Mutex::default(),
            claims: Mutex::default(),
            farm: Mutex::default(),
            status: Mutex::default(),
            claim_delay: Duration::ZERO,
            tickets: None,
            login_calls: AtomicU32::new(0),
            claim_calls: AtomicU32::new(0),
            farm_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            in_flight: AtomicU32::new(0),
            max_in_flight: AtomicU32::new(0),
        }
    }

    pub fn with_login(self, login: ClaimOutcome<Session>) -> Self {
        *self.login.lock().unwrap() = VecDeque::from([login]);
        self
    }

    pub fn with_claims(self, claims: Vec<ClaimOutcome<Receipt>>) -> Self {
        *self.claims.lock().unwrap() = claims.into();
        self
    }

    pub fn with_farm(self, farm: Vec<ClaimOutcome<Option<Receipt>>>) -> Self {
        *self.farm.lock().unwrap() = farm.into();
        self
    }

    pub fn with_status(self, status: Vec<ClaimOutcome<Option<Receipt>>>) -> Self {
        *self.status.lock().unwrap() = status.into();
        self
    }

    pub fn with_claim_delay(mut self, delay: Duration) -> Self {
        self.claim_delay = delay;
        self
    }

    pub fn with_tickets(mut self, tickets: FakeTickets) -> Self {
        self.tickets = Some(tickets);
        self
    }

    pub fn claims(&self) -> u32 {
        self.claim_calls.load(Ordering::SeqCst)
    }

    pub fn max_concurrent_claims(&self) -> u32 {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    pub fn ticket_port(&self) -> &FakeTickets {
        self.tickets.as_ref().unwrap()
    }
}

#[async_trait]
impl ClaimPort for FakePort {
    fn service(&self) -> ServiceKind {
        self.service
    }

    async fn login(&self, _account: &Account) -> ClaimOutcome<Session> {
        self.login_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.login, Ok(Session::new("token")))
    }

    async fn perform_claim(&self, _account: &Account, _session: &Session) -> ClaimOutcome<Receipt> {
        self.claim_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if !self.claim_delay.is_zero() {
            tokio::time::sleep(self.claim_delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        next(&self.claims, Ok(Receipt::with_amount(1.0, "claimed 1.0")))
    }

    async fn start_farming(
        &self,
        _account: &Account,
        _session: &Session,
    ) -> ClaimOutcome<Option<Receipt>> {
        self.farm_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.farm, Ok(Some(Receipt::new("farming"))))
    }

    async fn read_status(
        &self,
        _account: &Account,
        _session: &Session,
    ) -> ClaimOutcome<Option<Receipt>> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        next(&self.status, Ok(Some(Receipt::with_amount(10.0, "balance 10"))))
    }

    fn tickets(&self) -> Option<&dyn TicketPort> {
        self.tickets.as_ref().map(|t| t as &dyn TicketPort)
    }
}

// ============================================================================
// Wiring helpers
// ============================================================================

pub fn account(id: &str, service: ServiceKind) -> Account {
    Account::new(id, service, Credentials::default())
}

pub fn fast_budget() -> RetryBudget {
    RetryBudget::new(3, Duration::from_millis(5000))
}

pub fn invoker(
    budget: RetryBudget,
    sink: &Arc<RecordingSink>,
    cancel: &CancellationToken,
) -> RetryingInvoker {
    let sink: Arc<dyn EventSink> = sink.clone();
    RetryingInvoker::new(budget, sink).with_cancellation(cancel.clone())
}

pub fn task(invoker: RetryingInvoker, config: TicketLoopConfig) -> AccountTask {
    AccountTask::new(invoker.clone(), TicketLoopRunner::new(config, invoker))
}

pub fn transient(message: &str) -> ClaimFailure {
    ClaimFailure::transient(message)
}
