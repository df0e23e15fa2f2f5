//! HTTP client for reward APIs.
//!
//! Retries are not done here; the [`crate::RetryingInvoker`] owns the
//! retry budget so that every remote call shares one policy.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::{Client, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::FetchError;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Longest raw body kept in an error message.
const MAX_ERROR_BODY: usize = 200;

/// JSON HTTP client with a per-request timeout and default headers.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// Creates a new HTTP client with default settings.
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a new HTTP client with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self, FetchError> {
        Self::with_headers(timeout, HeaderMap::new())
    }

    /// Creates a client that sends `headers` on every request.
    pub fn with_headers(timeout: Duration, mut headers: HeaderMap) -> Result<Self, FetchError> {
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("application/json"));

        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        Ok(Self { inner: client })
    }

    /// Performs a GET request and parses the JSON body.
    #[instrument(skip(self, headers))]
    pub async fn get_json(&self, url: &str, headers: HeaderMap) -> Result<Value, FetchError> {
        self.send(self.inner.get(url).headers(headers)).await
    }

    /// Performs a POST request with a JSON body and parses the JSON response.
    #[instrument(skip(self, headers, body))]
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: HeaderMap,
        body: &B,
    ) -> Result<Value, FetchError> {
        let request = self
            .inner
            .post(url)
            .headers(headers)
            .header(CONTENT_TYPE, "application/json")
            .json(body);
        self.send(request).await
    }

    async fn send(&self, request: RequestBuilder) -> Result<Value, FetchError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!(status = %status, bytes = body.len(), "Received response");

        if !status.is_success() {
            let (code, message) = parse_error_body(&body);
            warn!(status = %status, code = ?code, message = %message, "Request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                code,
                message,
            });
        }

        if body.trim().is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Failed to parse response body");
            FetchError::InvalidResponse(format!("JSON error: {e}"))
        })
    }
}

/// Builds a header map from `(name, value)` pairs.
pub fn header_map<'a, I>(pairs: I) -> Result<HeaderMap, FetchError>
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| FetchError::InvalidHeader {
                name: name.to_string(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| FetchError::InvalidHeader {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

/// Extracts `(code, message)` from an error body.
///
/// Understands `{"code": 400, "err": "..."}` style envelopes and falls back
/// to the raw (truncated) body.
pub fn parse_error_body(body: &str) -> (Option<i64>, String) {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        let code = map.get("code").and_then(Value::as_i64);
        let message = ["err", "message", "error", "msg"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string);

        if let Some(message) = message {
            return (code, message);
        }
        return (code, truncate(body));
    }

    (None, truncate(body))
}

fn truncate(body: &str) -> String {
    let trimmed = body.trim();
    match trimmed.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &trimmed[..idx]),
        None => trimmed.to_string(),
    }
}

// ============================================================================
// Tests
// ============================================================================
