//! Vooi claim port.

use async_trait::async_trait;
use autoclaim_core::{Account, ClaimFailure, ClaimOutcome, ClaimPort, Receipt, ServiceKind, Session};
use autoclaim_fetch::{Classifier, FetchError};
use tracing::{info, instrument};

use super::api::VooiApiClient;
use crate::descriptor::PortParts;

/// [`ClaimPort`] for Vooi.
#[derive(Debug, Clone)]
pub struct VooiPort {
    api: VooiApiClient,
    classifier: Classifier,
}

impl VooiPort {
    /// Creates a port from resolved parts.
    pub fn new(parts: PortParts) -> Result<Self, FetchError> {
        Ok(Self {
            api: VooiApiClient::new(parts.base_url, parts.timeout)?,
            classifier: parts.classifier,
        })
    }

    fn classify<T>(&self, result: Result<T, FetchError>) -> ClaimOutcome<T> {
        result.map_err(|e| self.classifier.classify(&e))
    }
}

#[async_trait]
impl ClaimPort for VooiPort {
    fn service(&self) -> ServiceKind {
        ServiceKind::Vooi
    }

    #[instrument(skip(self, account), fields(account = %account.id))]
    async fn login(&self, account: &Account) -> ClaimOutcome<Session> {
        let token = self.classify(self.api.login(&account.credentials).await)?;
        info!("Login successful");
        Ok(Session::new(token))
    }

    async fn perform_claim(&self, account: &Account, session: &Session) -> ClaimOutcome<Receipt> {
        let Some(trade) = self.classify(self.api.auto_trade(session.token()).await)? else {
            return Ok(Receipt::new("no active auto trade"));
        };

        if !trade.is_finished() {
            return Err(ClaimFailure::already_claimed(format!(
                "auto trade still running until {}",
                trade.end_time.as_deref().unwrap_or("unknown")
            )));
        }

        let Some(trade_id) = trade.auto_trade_id.as_ref() else {
            return Ok(Receipt::new("no active auto trade"));
        };
        let claim = self.classify(self.api.claim(session.token(), trade_id).await)?;
        let money = claim.reward.virt_money.unwrap_or_default();
        let points = claim.reward.virt_points.unwrap_or_default();
        info!(account = %account.id, virt_money = money, virt_points = points, "Rewards claimed");

        Ok(Receipt::with_amount(
            money,
            format!("VirtMoney: {money}, VirtPoints: {points}"),
        ))
    }

    async fn start_farming(
        &self,
        account: &Account,
        session: &Session,
    ) -> ClaimOutcome<Option<Receipt>> {
        let trade = self.classify(self.api.start(session.token()).await)?;
        let ends = trade.end_time.unwrap_or_else(|| "unknown".to_string());
        info!(account = %account.id, end_time = %ends, "Farming started");
        Ok(Some(Receipt::new(format!("farming ends at {ends}"))))
    }
}
