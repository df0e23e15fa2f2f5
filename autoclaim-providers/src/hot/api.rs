//! HOT API client.

use autoclaim_core::Credentials;
use autoclaim_fetch::client::header_map;
use autoclaim_fetch::{FetchError, HttpClient};
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, instrument};

// ============================================================================
// Constants
// ============================================================================

/// HOT API base URL.
pub(crate) const HOT_API_BASE: &str = "https://api0.herewallet.app";

/// Claim endpoint.
const CLAIM_ENDPOINT: &str = "/api/v1/user/hot/claim";

/// `hot_in_storage` is reported in millionths.
const HOT_UNITS: f64 = 1_000_000.0;

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/129.0.0.0 Safari/537.36";

// ============================================================================
// Credentials
// ============================================================================

/// Per-account HOT credentials.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotCredentials {
    /// Value of the `Authorization` header.
    pub authorization: String,
    /// Value of the `Deviceid` header.
    #[serde(alias = "device_id")]
    pub device_id: String,
    /// Value of the `Telegram-Data` header.
    #[serde(alias = "telegram_data")]
    pub telegram_data: String,
    /// Saved game state posted with each claim.
    #[serde(alias = "game_state", default)]
    pub game_state: Value,
}

impl HotCredentials {
    /// Parses credentials from an account payload.
    pub fn from_credentials(credentials: &Credentials) -> Result<Self, FetchError> {
        Ok(credentials.parse()?)
    }
}

// ============================================================================
// API Response Types
// ============================================================================

/// Response from the claim endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct HotClaimResponse {
    /// Stored HOT in millionths; the API sends either a string or a number.
    pub hot_in_storage: Value,
}

impl HotClaimResponse {
    /// Stored HOT in whole units.
    pub fn hot(&self) -> Option<f64> {
        let raw = match &self.hot_in_storage {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        Some(raw / HOT_UNITS)
    }
}

// ============================================================================
// API Client
// ============================================================================

/// HOT API client.
#[derive(Debug, Clone)]
pub struct HotApiClient {
    http: HttpClient,
    base_url: String,
}

impl HotApiClient {
    /// Creates a new client.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let defaults = header_map([
            ("Network", "mainnet"),
            ("Platform", "telegram"),
            ("Is-Sbt", "false"),
            ("Sec-Ch-Ua-Platform", "Windows"),
            ("Sec-Ch-Ua-Mobile", "?0"),
            ("User-Agent", USER_AGENT),
            ("Origin", "https://tgapp.herewallet.app"),
            ("Referer", "https://tgapp.herewallet.app/"),
        ])?;

        Ok(Self {
            http: HttpClient::with_headers(timeout, defaults)?,
            base_url: base_url.into(),
        })
    }

    fn account_headers(creds: &HotCredentials) -> Result<HeaderMap, FetchError> {
        header_map([
            ("Authorization", creds.authorization.as_str()),
            ("Deviceid", creds.device_id.as_str()),
            ("Telegram-Data", creds.telegram_data.as_str()),
        ])
    }

    /// Claims stored HOT.
    #[instrument(skip(self, creds))]
    pub async fn claim(&self, creds: &HotCredentials) -> Result<HotClaimResponse, FetchError> {
        debug!("Claiming HOT");

        let url = format!("{}{}", self.base_url, CLAIM_ENDPOINT);
        let body = json!({ "game_state": creds.game_state });
        let value = self
            .http
            .post_json(&url, Self::account_headers(creds)?, &body)
            .await?;

        serde_json::from_value(value)
            .map_err(|e| FetchError::InvalidResponse(format!("claim response: {e}")))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hot_from_string() {
        let response: HotClaimResponse =
            serde_json::from_value(json!({ "hot_in_storage": "1234567" })).unwrap();
        assert!((response.hot().unwrap() - 1.234_567).abs() < 1e-9);
    }

    #[test]
    fn test_hot_from_number() {
        let response: HotClaimResponse =
            serde_json::from_value(json!({ "hot_in_storage": 500_000 })).unwrap();
        assert!((response.hot().unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_hot_missing_value() {
        let response: HotClaimResponse =
            serde_json::from_value(json!({ "hot_in_storage": null })).unwrap();
        assert!(response.hot().is_none());
    }

    #[test]
    fn test_credentials_accept_both_casings() {
        let creds = Credentials::from_value(json!({
            "authorization": "Bearer x",
            "deviceId": "dev",
            "telegram_data": "tg",
            "gameState": { "refs": 1 }
        }))
        .unwrap();
        let hot = HotCredentials::from_credentials(&creds).unwrap();
        assert_eq!(hot.device_id, "dev");
        assert_eq!(hot.telegram_data, "tg");
        assert_eq!(hot.game_state["refs"], 1);
    }

    #[test]
    fn test_credentials_missing_field() {
        let creds = Credentials::from_value(json!({ "authorization": "x" })).unwrap();
        assert!(matches!(
            HotCredentials::from_credentials(&creds),
            Err(FetchError::Credentials(_))
        ));
    }
}
