//! Matchain claim port.

use async_trait::async_trait;
use autoclaim_core::{
    Account, ClaimOutcome, ClaimPort, Receipt, ServiceKind, Session, TicketPort,
};
use autoclaim_fetch::{Classifier, FetchError};
use serde_json::Value;
use tracing::{info, instrument};

use super::api::MatchainApiClient;
use super::games::MatchainGames;
use crate::descriptor::PortParts;

/// [`ClaimPort`] for Matchain.
#[derive(Debug, Clone)]
pub struct MatchainPort {
    api: MatchainApiClient,
    classifier: Classifier,
    games: MatchainGames,
}

impl MatchainPort {
    /// Creates a port from resolved parts.
    pub fn new(parts: PortParts) -> Result<Self, FetchError> {
        let api = MatchainApiClient::new(parts.base_url, parts.timeout)?;
        Ok(Self {
            games: MatchainGames::new(api.clone(), parts.classifier.clone()),
            api,
            classifier: parts.classifier,
        })
    }

    async fn with_uid<F, Fut>(&self, account: &Account, call: F) -> ClaimOutcome<Value>
    where
        F: FnOnce(i64) -> Fut,
        Fut: std::future::Future<Output = Result<Value, FetchError>>,
    {
        let result = match account.credentials.require_i64("uid") {
            Ok(uid) => call(uid).await,
            Err(e) => Err(e.into()),
        };
        result.map_err(|e| self.classifier.classify(&e))
    }
}

/// Renders an envelope payload as a receipt, keeping numeric amounts.
fn receipt(label: &str, data: &Value) -> Receipt {
    let amount = match data {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    };
    match amount {
        Some(amount) => Receipt::with_amount(amount, format!("{label} {data}")),
        None => Receipt::new(format!("{label} {data}")),
    }
}

#[async_trait]
impl ClaimPort for MatchainPort {
    fn service(&self) -> ServiceKind {
        ServiceKind::Matchain
    }

    #[instrument(skip(self, account), fields(account = %account.id))]
    async fn login(&self, account: &Account) -> ClaimOutcome<Session> {
        let token = self
            .api
            .login(&account.credentials)
            .await
            .map_err(|e| self.classifier.classify(&e))?;
        info!("Login successful");
        Ok(Session::new(token))
    }

    async fn perform_claim(&self, account: &Account, session: &Session) -> ClaimOutcome<Receipt> {
        let data = self
            .with_uid(account, |uid| self.api.claim(uid, session.token()))
            .await?;
        info!(account = %account.id, points = %data, "Claimed points");
        Ok(receipt("claimed", &data))
    }

    async fn start_farming(
        &self,
        account: &Account,
        session: &Session,
    ) -> ClaimOutcome<Option<Receipt>> {
        let data = self
            .with_uid(account, |uid| self.api.farm(uid, session.token()))
            .await?;
        info!(account = %account.id, rate = %data, "Started farming");
        Ok(Some(receipt("farming rate", &data)))
    }

    async fn read_status(
        &self,
        account: &Account,
        session: &Session,
    ) -> ClaimOutcome<Option<Receipt>> {
        let data = self
            .with_uid(account, |uid| self.api.balance(uid, session.token()))
            .await?;
        info!(account = %account.id, balance = %data, "Current balance");
        Ok(Some(receipt("balance", &data)))
    }

    fn tickets(&self) -> Option<&dyn TicketPort> {
        Some(&self.games)
    }
}
