//! Vooi API client.

use std::time::Duration;

use autoclaim_core::Credentials;
use autoclaim_fetch::client::header_map;
use autoclaim_fetch::{FetchError, HttpClient};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

// ============================================================================
// Constants
// ============================================================================

/// Vooi API base URL.
pub(crate) const VOOI_API_BASE: &str = "https://api-tg.vooi.io/api";

const LOGIN_ENDPOINT: &str = "/v2/auth/login";
const AUTOTRADE_ENDPOINT: &str = "/autotrade";
const AUTOTRADE_CLAIM_ENDPOINT: &str = "/autotrade/claim";
const AUTOTRADE_START_ENDPOINT: &str = "/autotrade/start";

/// Auto-trade status that can be claimed.
const STATUS_FINISHED: &str = "finished";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// API Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct LoginResponse {
    tokens: LoginTokens,
}

#[derive(Debug, Deserialize)]
struct LoginTokens {
    access_token: String,
}

/// Current auto-trade.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VooiAutoTrade {
    /// Trade identifier, sent back when claiming.
    #[serde(default)]
    pub auto_trade_id: Option<Value>,
    /// Trade status, e.g. `finished`.
    #[serde(default)]
    pub status: Option<String>,
    /// When the trade ends.
    #[serde(default)]
    pub end_time: Option<String>,
}

impl VooiAutoTrade {
    /// Returns true when the trade can be claimed.
    pub fn is_finished(&self) -> bool {
        self.status.as_deref() == Some(STATUS_FINISHED)
    }

    /// Returns true when a trade exists.
    pub fn exists(&self) -> bool {
        self.auto_trade_id.as_ref().is_some_and(|id| !id.is_null())
    }
}

/// Claimed reward.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VooiReward {
    /// Virtual money.
    #[serde(default)]
    pub virt_money: Option<f64>,
    /// Virtual points.
    #[serde(default)]
    pub virt_points: Option<f64>,
}

/// Response from the claim endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct VooiClaimResponse {
    /// The reward.
    #[serde(default)]
    pub reward: VooiReward,
}

// ============================================================================
// API Client
// ============================================================================

/// Vooi API client.
#[derive(Debug, Clone)]
pub struct VooiApiClient {
    http: HttpClient,
    base_url: String,
}

impl VooiApiClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let defaults = header_map([("User-Agent", USER_AGENT)])?;
        Ok(Self {
            http: HttpClient::with_headers(timeout, defaults)?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn bearer(token: &str) -> Result<HeaderMap, FetchError> {
        header_map([("Authorization", format!("Bearer {token}").as_str())])
    }

    /// Logs in with Telegram init data and returns the access token.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<String, FetchError> {
        debug!("Logging in to Vooi");

        let init_data = match credentials.get("initData") {
            Some(_) => credentials.require_str("initData")?,
            None => credentials.require_str("init_data")?,
        };
        let value = self
            .http
            .post_json(
                &self.url(LOGIN_ENDPOINT),
                HeaderMap::new(),
                &json!({ "initData": init_data }),
            )
            .await?;

        let login: LoginResponse = serde_json::from_value(value)
            .map_err(|e| FetchError::InvalidResponse(format!("login response: {e}")))?;
        Ok(login.tokens.access_token)
    }

    /// Reads the current auto-trade; `None` when there is none.
    #[instrument(skip(self, token))]
    pub async fn auto_trade(&self, token: &str) -> Result<Option<VooiAutoTrade>, FetchError> {
        let value = self
            .http
            .get_json(&self.url(AUTOTRADE_ENDPOINT), Self::bearer(token)?)
            .await?;
        if value.is_null() {
            return Ok(None);
        }

        let trade: VooiAutoTrade = serde_json::from_value(value)
            .map_err(|e| FetchError::InvalidResponse(format!("autotrade response: {e}")))?;
        Ok(trade.exists().then_some(trade))
    }

    /// Claims a finished auto-trade.
    #[instrument(skip(self, token))]
    pub async fn claim(&self, token: &str, auto_trade_id: &Value) -> Result<VooiClaimResponse, FetchError> {
        let value = self
            .http
            .post_json(
                &self.url(AUTOTRADE_CLAIM_ENDPOINT),
                Self::bearer(token)?,
                &json!({ "autoTradeId": auto_trade_id }),
            )
            .await?;
        serde_json::from_value(value)
            .map_err(|e| FetchError::InvalidResponse(format!("claim response: {e}")))
    }

    /// Starts a new auto-trade.
    #[instrument(skip(self, token))]
    pub async fn start(&self, token: &str) -> Result<VooiAutoTrade, FetchError> {
        let value = self
            .http
            .post_json(&self.url(AUTOTRADE_START_ENDPOINT), Self::bearer(token)?, &json!({}))
            .await?;
        serde_json::from_value(value)
            .map_err(|e| FetchError::InvalidResponse(format!("start response: {e}")))
    }
}

// ============================================================================
// Tests
// ============================================================================
