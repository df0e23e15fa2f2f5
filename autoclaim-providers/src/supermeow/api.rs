//! SuperMeow API client.

use std::time::Duration;

use autoclaim_core::{CoreError, Credentials};
use autoclaim_fetch::client::header_map;
use autoclaim_fetch::{FetchError, HttpClient};
use reqwest::header::HeaderMap;
use serde_json::{json, Value};
use tracing::{debug, instrument};
use url::Url;

/// SuperMeow API base URL.
pub(crate) const SUPERMEOW_API_BASE: &str = "https://api.supermeow.vip";

const CLAIM_ENDPOINT: &str = "/meow/claim";
const INFO_ENDPOINT: &str = "/meow/info";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/125.0.0.0 Safari/537.36 Edg/125.0.0.0";

/// Per-account SuperMeow credentials.
#[derive(Debug, Clone)]
pub struct SuperMeowCredentials {
    /// Telegram user id.
    pub telegram: String,
    /// Serialized Telegram auth payload.
    pub auth_data: String,
    /// Telegram user object sent with info requests.
    pub user: Value,
}

impl SuperMeowCredentials {
    /// Reads credentials from an account payload.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self, CoreError> {
        let telegram = match credentials.get("telegram") {
            Some(Value::String(s)) => s.clone(),
            Some(_) => credentials.require_i64("telegram")?.to_string(),
            None => return Err(CoreError::MissingCredential("telegram".to_string())),
        };
        let auth_data = credentials.require_str("auth_data")?.to_string();
        let user = credentials.get("user").cloned().unwrap_or(Value::Null);

        Ok(Self {
            telegram,
            auth_data,
            user,
        })
    }
}

/// SuperMeow API client.
#[derive(Debug, Clone)]
pub struct SuperMeowApiClient {
    http: HttpClient,
    base_url: String,
}

impl SuperMeowApiClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let defaults = header_map([
            ("User-Agent", USER_AGENT),
            ("Origin", "https://lfg.supermeow.vip"),
            ("Referer", "https://lfg.supermeow.vip/"),
            ("Accept-Language", "en-US,en;q=0.9"),
        ])?;
        Ok(Self {
            http: HttpClient::with_headers(timeout, defaults)?,
            base_url: base_url.into(),
        })
    }

    /// Builds an endpoint URL carrying the account's auth query.
    pub fn signed_url(
        &self,
        endpoint: &str,
        creds: &SuperMeowCredentials,
        extra: &[(&str, &str)],
    ) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("telegram", &creds.telegram);
            for (key, value) in extra {
                query.append_pair(key, value);
            }
            query.append_pair("auth_data", &creds.auth_data);
        }
        Ok(url)
    }

    /// Claims accumulated tokens; returns the reported balance.
    #[instrument(skip(self, creds))]
    pub async fn claim(&self, creds: &SuperMeowCredentials) -> Result<Value, FetchError> {
        debug!("Claiming SuperMeow");
        let url = self.signed_url(CLAIM_ENDPOINT, creds, &[("is_on_chain", "false")])?;
        self.http
            .post_json(url.as_str(), HeaderMap::new(), &json!({}))
            .await
    }

    /// Reads account info.
    #[instrument(skip(self, creds))]
    pub async fn info(&self, creds: &SuperMeowCredentials) -> Result<Value, FetchError> {
        let url = self.signed_url(INFO_ENDPOINT, creds, &[])?;
        self.http
            .post_json(url.as_str(), HeaderMap::new(), &json!({ "user": creds.user }))
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
