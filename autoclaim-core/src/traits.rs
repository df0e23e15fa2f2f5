//! Port traits for autoclaim.
//!
//! A remote reward service is reached only through these traits. The
//! engine never sees HTTP; the providers crate never sees scheduling.

use async_trait::async_trait;

use crate::models::{Account, ClaimOutcome, PlayId, ProgressEvent, Receipt, ServiceKind, Session};

/// Claim-capable remote endpoint for one service.
///
/// Implementors are responsible for:
/// - Establishing a session for an account
/// - Performing the claim request
/// - Classifying every failure into a [`crate::FailureKind`]
#[async_trait]
pub trait ClaimPort: Send + Sync {
    /// The service this port talks to.
    fn service(&self) -> ServiceKind;

    /// Establishes a session. Never retried; failure aborts the cycle.
    async fn login(&self, account: &Account) -> ClaimOutcome<Session>;

    /// Claims the accumulated reward.
    async fn perform_claim(&self, account: &Account, session: &Session) -> ClaimOutcome<Receipt>;

    /// Starts the next farming window. `Ok(None)` means the service has no
    /// such stage.
    async fn start_farming(
        &self,
        _account: &Account,
        _session: &Session,
    ) -> ClaimOutcome<Option<Receipt>> {
        Ok(None)
    }

    /// Reads balance/status. `Ok(None)` means the service has no such stage.
    async fn read_status(
        &self,
        _account: &Account,
        _session: &Session,
    ) -> ClaimOutcome<Option<Receipt>> {
        Ok(None)
    }

    /// The ticket endpoints, if the service has a play sub-loop.
    fn tickets(&self) -> Option<&dyn TicketPort> {
        None
    }
}

/// Ticket sub-loop endpoints `{purchase, checkCount, playOnce, claimPlay}`.
#[async_trait]
pub trait TicketPort: Send + Sync {
    /// Acquires additional tickets. Remote may report they were already
    /// obtained today (`AlreadyClaimed`).
    async fn purchase_tickets(&self, account: &Account, session: &Session) -> ClaimOutcome<()>;

    /// Reads the remaining play count.
    async fn check_count(&self, account: &Account, session: &Session) -> ClaimOutcome<u32>;

    /// Starts one play. `Ok(None)` means nothing is playable.
    async fn play_once(&self, account: &Account, session: &Session)
    -> ClaimOutcome<Option<PlayId>>;

    /// Claims a started play.
    async fn claim_play(
        &self,
        account: &Account,
        session: &Session,
        play: &PlayId,
    ) -> ClaimOutcome<Receipt>;
}

/// Sink for structured progress/error events.
///
/// Shared by every account; implementations serialize their own writes.
pub trait EventSink: Send + Sync {
    /// Records one event.
    fn emit(&self, event: ProgressEvent);
}
