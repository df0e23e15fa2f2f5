//! HOT claim port.

use async_trait::async_trait;
use autoclaim_core::{Account, ClaimOutcome, ClaimPort, Receipt, ServiceKind, Session};
use autoclaim_fetch::{Classifier, FetchError};
use tracing::{info, instrument};

use super::api::{HotApiClient, HotCredentials};
use crate::descriptor::PortParts;

/// [`ClaimPort`] for HOT.
#[derive(Debug, Clone)]
pub struct HotPort {
    api: HotApiClient,
    classifier: Classifier,
}

impl HotPort {
    /// Creates a port from resolved parts.
    pub fn new(parts: PortParts) -> Result<Self, FetchError> {
        Ok(Self {
            api: HotApiClient::new(parts.base_url, parts.timeout)?,
            classifier: parts.classifier,
        })
    }
}

#[async_trait]
impl ClaimPort for HotPort {
    fn service(&self) -> ServiceKind {
        ServiceKind::Hot
    }

    async fn login(&self, account: &Account) -> ClaimOutcome<Session> {
        let creds = HotCredentials::from_credentials(&account.credentials)
            .map_err(|e| self.classifier.classify(&e))?;
        Ok(Session::new(creds.authorization))
    }

    #[instrument(skip(self, account, _session), fields(account = %account.id))]
    async fn perform_claim(&self, account: &Account, _session: &Session) -> ClaimOutcome<Receipt> {
        let result = async {
            let creds = HotCredentials::from_credentials(&account.credentials)?;
            let response = self.api.claim(&creds).await?;
            response.hot().ok_or_else(|| {
                FetchError::InvalidResponse(format!(
                    "unreadable hot_in_storage: {}",
                    response.hot_in_storage
                ))
            })
        }
        .await;

        let hot = result.map_err(|e| self.classifier.classify(&e))?;
        info!(hot_in_storage = hot, "HOT claimed");
        Ok(Receipt::with_amount(hot, format!("hot_in_storage: {hot:.6}")))
    }
}
