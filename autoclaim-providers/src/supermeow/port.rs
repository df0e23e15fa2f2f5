//! SuperMeow claim port.

use async_trait::async_trait;
use autoclaim_core::{Account, ClaimOutcome, ClaimPort, Receipt, ServiceKind, Session};
use autoclaim_fetch::{Classifier, FetchError};
use serde_json::Value;
use tracing::info;

use super::api::{SuperMeowApiClient, SuperMeowCredentials};
use crate::descriptor::PortParts;

/// [`ClaimPort`] for SuperMeow.
#[derive(Debug, Clone)]
pub struct SuperMeowPort {
    api: SuperMeowApiClient,
    classifier: Classifier,
}

impl SuperMeowPort {
    /// Creates a port from resolved parts.
    pub fn new(parts: PortParts) -> Result<Self, FetchError> {
        Ok(Self {
            api: SuperMeowApiClient::new(parts.base_url, parts.timeout)?,
            classifier: parts.classifier,
        })
    }

    fn credentials(&self, account: &Account) -> ClaimOutcome<SuperMeowCredentials> {
        SuperMeowCredentials::from_credentials(&account.credentials)
            .map_err(|e| self.classifier.classify(&FetchError::from(e)))
    }
}

fn balance_receipt(label: &str, value: &Value) -> Receipt {
    let balance = value
        .get("balance")
        .and_then(Value::as_f64)
        .or_else(|| value.as_f64());
    match balance {
        Some(balance) => Receipt::with_amount(balance, format!("{label}: {value}")),
        None => Receipt::new(format!("{label}: {value}")),
    }
}

#[async_trait]
impl ClaimPort for SuperMeowPort {
    fn service(&self) -> ServiceKind {
        ServiceKind::SuperMeow
    }

    async fn login(&self, account: &Account) -> ClaimOutcome<Session> {
        let creds = self.credentials(account)?;
        Ok(Session::new(creds.auth_data))
    }

    async fn perform_claim(&self, account: &Account, _session: &Session) -> ClaimOutcome<Receipt> {
        let creds = self.credentials(account)?;
        let balance = self
            .api
            .claim(&creds)
            .await
            .map_err(|e| self.classifier.classify(&e))?;
        info!(account = %account.id, balance = %balance, "Claim successful");
        Ok(balance_receipt("balance", &balance))
    }

    async fn read_status(
        &self,
        account: &Account,
        _session: &Session,
    ) -> ClaimOutcome<Option<Receipt>> {
        let creds = self.credentials(account)?;
        let info = self
            .api
            .info(&creds)
            .await
            .map_err(|e| self.classifier.classify(&e))?;
        Ok(Some(balance_receipt("info", &info)))
    }
}
