//! Matchain ticket endpoints.

use async_trait::async_trait;
use autoclaim_core::{Account, ClaimOutcome, PlayId, Receipt, Session, TicketPort};
use autoclaim_fetch::{Classifier, FetchError};
use serde_json::Value;
use tracing::{debug, info};

use super::api::{MatchainApiClient, CLAIM_POINT};

/// [`TicketPort`] for Matchain's daily games.
#[derive(Debug, Clone)]
pub struct MatchainGames {
    api: MatchainApiClient,
    classifier: Classifier,
}

impl MatchainGames {
    pub(crate) fn new(api: MatchainApiClient, classifier: Classifier) -> Self {
        Self { api, classifier }
    }

    fn classify<T>(&self, result: Result<T, FetchError>) -> ClaimOutcome<T> {
        result.map_err(|e| self.classifier.classify(&e))
    }
}

#[async_trait]
impl TicketPort for MatchainGames {
    async fn purchase_tickets(&self, account: &Account, session: &Session) -> ClaimOutcome<()> {
        let result = async {
            let uid = account.credentials.require_i64("uid")?;
            self.api.purchase_tickets(uid, session.token()).await
        }
        .await;
        self.classify(result)?;
        info!(account = %account.id, "Purchased additional tickets");
        Ok(())
    }

    async fn check_count(&self, account: &Account, session: &Session) -> ClaimOutcome<u32> {
        let count = self.classify(self.api.game_count(session.token()).await)?;
        debug!(account = %account.id, count, "Ticket count");
        Ok(count)
    }

    async fn play_once(
        &self,
        account: &Account,
        session: &Session,
    ) -> ClaimOutcome<Option<PlayId>> {
        let play = self.classify(self.api.play_game(session.token()).await)?;
        debug!(account = %account.id, play = ?play, "Game started");
        Ok(play)
    }

    async fn claim_play(
        &self,
        account: &Account,
        session: &Session,
        play: &PlayId,
    ) -> ClaimOutcome<Receipt> {
        let data = self.classify(self.api.claim_game(session.token(), play).await)?;
        info!(account = %account.id, play = %play, "Game completed");
        Ok(match data {
            Value::Null => Receipt::with_amount(f64::from(CLAIM_POINT), format!("game {play}")),
            other => Receipt::new(format!("game {play}: {other}")),
        })
    }
}
