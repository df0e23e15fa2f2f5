//! Matchain API client.

use std::time::Duration;

use autoclaim_core::{Credentials, PlayId};
use autoclaim_fetch::client::header_map;
use autoclaim_fetch::{FetchError, HttpClient};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, instrument};

// ============================================================================
// Constants
// ============================================================================

/// Matchain API base URL.
pub(crate) const MATCHAIN_API_BASE: &str = "https://tgapp-api.matchain.io/api/tgapp/v1";

const LOGIN_ENDPOINT: &str = "/user/login";
const CLAIM_ENDPOINT: &str = "/point/reward/claim";
const FARMING_ENDPOINT: &str = "/point/reward/farming";
const BALANCE_ENDPOINT: &str = "/point/balance";
const PURCHASE_ENDPOINT: &str = "/daily/task/purchase";
const GAME_RULE_ENDPOINT: &str = "/game/rule";
const GAME_PLAY_ENDPOINT: &str = "/game/play";
const GAME_CLAIM_ENDPOINT: &str = "/game/claim";

/// Envelope code for success.
const CODE_OK: i64 = 200;

/// Points submitted with every game claim.
pub const CLAIM_POINT: u32 = 56;

/// Message the remote sends when a play has already ended.
pub const GAME_EXPIRED_MESSAGE: &str = "game does not exist, claim error.";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

// ============================================================================
// API Response Types
// ============================================================================

/// `{code, err, data}` response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct MatchainEnvelope {
    /// Application code; 200 is success.
    pub code: i64,
    /// Error message on failure.
    #[serde(default)]
    pub err: Option<String>,
    /// Payload.
    #[serde(default)]
    pub data: Value,
}

impl MatchainEnvelope {
    /// Returns the payload, or a [`FetchError::Rejected`] for non-200 codes.
    pub fn into_data(self) -> Result<Value, FetchError> {
        if self.code == CODE_OK {
            Ok(self.data)
        } else {
            Err(FetchError::Rejected {
                code: self.code,
                message: self.err.unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}

fn parse_envelope(value: Value) -> Result<Value, FetchError> {
    let envelope: MatchainEnvelope = serde_json::from_value(value)
        .map_err(|e| FetchError::InvalidResponse(format!("envelope: {e}")))?;
    envelope.into_data()
}

// ============================================================================
// API Client
// ============================================================================

/// Matchain API client.
#[derive(Debug, Clone)]
pub struct MatchainApiClient {
    http: HttpClient,
    base_url: String,
}

impl MatchainApiClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let defaults = header_map([
            ("User-Agent", USER_AGENT),
            ("Accept-Language", "en-US,en;q=0.9"),
            ("Origin", "https://tgapp.matchain.io"),
            ("Referer", "https://tgapp.matchain.io/"),
            ("Sec-Ch-Ua-Mobile", "?0"),
            ("Sec-Ch-Ua-Platform", "\"Windows\""),
        ])?;

        Ok(Self {
            http: HttpClient::with_headers(timeout, defaults)?,
            base_url: base_url.into(),
        })
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{}", self.base_url, endpoint)
    }

    fn auth(token: &str) -> Result<HeaderMap, FetchError> {
        header_map([("Authorization", token)])
    }

    /// Builds the login body: the whole credential payload with `uid` as an integer.
    pub fn login_body(credentials: &Credentials) -> Result<Value, FetchError> {
        let uid = credentials.require_i64("uid")?;
        let mut body = credentials.as_map().clone();
        body.insert("uid".to_string(), json!(uid));
        Ok(Value::Object(body))
    }

    /// Logs in and returns the session token.
    #[instrument(skip(self, credentials))]
    pub async fn login(&self, credentials: &Credentials) -> Result<String, FetchError> {
        debug!("Logging in to Matchain");

        let body = Self::login_body(credentials)?;
        let value = self
            .http
            .post_json(&self.url(LOGIN_ENDPOINT), HeaderMap::new(), &body)
            .await?;

        parse_envelope(value)?
            .get("token")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| FetchError::InvalidResponse("login response has no token".into()))
    }

    async fn post_uid(&self, endpoint: &str, uid: i64, token: &str) -> Result<Value, FetchError> {
        let value = self
            .http
            .post_json(&self.url(endpoint), Self::auth(token)?, &json!({ "uid": uid }))
            .await?;
        parse_envelope(value)
    }

    /// Claims accumulated points.
    #[instrument(skip(self, token))]
    pub async fn claim(&self, uid: i64, token: &str) -> Result<Value, FetchError> {
        self.post_uid(CLAIM_ENDPOINT, uid, token).await
    }

    /// Starts the next farming window; returns the farming rate.
    #[instrument(skip(self, token))]
    pub async fn farm(&self, uid: i64, token: &str) -> Result<Value, FetchError> {
        self.post_uid(FARMING_ENDPOINT, uid, token).await
    }

    /// Reads the point balance.
    #[instrument(skip(self, token))]
    pub async fn balance(&self, uid: i64, token: &str) -> Result<Value, FetchError> {
        self.post_uid(BALANCE_ENDPOINT, uid, token).await
    }

    /// Buys the daily game tickets.
    #[instrument(skip(self, token))]
    pub async fn purchase_tickets(&self, uid: i64, token: &str) -> Result<(), FetchError> {
        let value = self
            .http
            .post_json(
                &self.url(PURCHASE_ENDPOINT),
                Self::auth(token)?,
                &json!({ "uid": uid, "type": "game" }),
            )
            .await?;
        parse_envelope(value).map(|_| ())
    }

    /// Reads the remaining game count; a missing count is zero.
    #[instrument(skip(self, token))]
    pub async fn game_count(&self, token: &str) -> Result<u32, FetchError> {
        let value = self
            .http
            .get_json(&self.url(GAME_RULE_ENDPOINT), Self::auth(token)?)
            .await?;
        let count = value
            .get("data")
            .and_then(|d| d.get("game_count"))
            .and_then(Value::as_u64)
            .unwrap_or(0);
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    /// Starts one game; `None` when the remote returns no game id.
    #[instrument(skip(self, token))]
    pub async fn play_game(&self, token: &str) -> Result<Option<PlayId>, FetchError> {
        let value = self
            .http
            .get_json(&self.url(GAME_PLAY_ENDPOINT), Self::auth(token)?)
            .await?;
        let data = parse_envelope(value)?;
        Ok(match data.get("game_id") {
            Some(Value::String(id)) if !id.is_empty() => Some(PlayId::new(id.clone())),
            Some(id @ Value::Number(_)) => Some(PlayId::from_value(id.clone())),
            _ => None,
        })
    }

    /// Claims a finished game.
    #[instrument(skip(self, token))]
    pub async fn claim_game(&self, token: &str, game: &PlayId) -> Result<Value, FetchError> {
        let body = json!({ "game_id": game.as_value(), "point": CLAIM_POINT });
        let value = self
            .http
            .post_json(&self.url(GAME_CLAIM_ENDPOINT), Self::auth(token)?, &body)
            .await?;
        parse_envelope(value)
    }
}

// ============================================================================
// Tests
// ============================================================================
