//! Client for the review status endpoint.
//!
//! One request per poll cycle: GET the endpoint with the cursor as
//! `from_date`, then classify the outcome. Classification is a pure
//! function over the status line and body so it can be tested without a
//! network.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde_json::Value;

use crate::error::WatchError;

/// Review status endpoint queried every cycle unless overridden.
pub const DEFAULT_ENDPOINT: &str =
    "https://practicum.yandex.ru/api/user_api/homework_statuses/";

// HTTP timeout constants
const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 30; // Total request timeout (connection + transfer)

/// Where poll cycles get their payloads from.
///
/// The production implementation is [`ReviewApi`]; tests drive the loop
/// through scripted sources instead.
pub trait StatusSource {
    /// Fetch all review activity at or after `cursor` (Unix seconds).
    ///
    /// # Returns
    /// The decoded payload, not yet shape-validated, or the
    /// classification of what went wrong.
    fn fetch_since(&self, cursor: i64) -> Result<Value, WatchError>;
}

/// Blocking HTTP client for the review status API.
pub struct ReviewApi {
    client: Client,
    endpoint: String,
    token: String,
}

impl ReviewApi {
    pub fn new(endpoint: &str, token: &str) -> Result<Self> {
        Ok(Self {
            client: create_http_client()?,
            endpoint: endpoint.to_string(),
            token: token.to_string(),
        })
    }
}

impl StatusSource for ReviewApi {
    fn fetch_since(&self, cursor: i64) -> Result<Value, WatchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .header("Authorization", format!("OAuth {}", self.token))
            .query(&[("from_date", cursor)])
            .send()
            .map_err(|e| WatchError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| WatchError::Transport(e.to_string()))?;

        classify_payload(status, &body)
    }
}

/// Create an HTTP client with explicit timeouts so a hung server can
/// never stall a cycle indefinitely.
pub(crate) fn create_http_client() -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("vigil/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

/// Classify a raw response into a decoded payload or a [`WatchError`].
///
/// Checks run in a fixed order: JSON decode, then body error markers,
/// then the HTTP status line. Markers come before the status because the
/// API reports some failures in the body of a nominally successful
/// response.
pub fn classify_payload(status: StatusCode, body: &str) -> Result<Value, WatchError> {
    let payload: Value = serde_json::from_str(body)?;

    if let Some(err) = remote_error(&payload) {
        return Err(err);
    }

    if status != StatusCode::OK {
        return Err(WatchError::UnsuccessfulResponse(status.as_u16()));
    }

    Ok(payload)
}

/// Extract a server-reported error marker, if the payload carries one.
fn remote_error(payload: &Value) -> Option<WatchError> {
    let object = payload.as_object()?;
    if !object.contains_key("code") && !object.contains_key("error") {
        return None;
    }

    let code = object
        .get("code")
        .and_then(Value::as_str)
        .unwrap_or("UnknownError")
        .to_string();
    let detail = object
        .get("message")
        .or_else(|| object.get("error"))
        .map(describe)
        .unwrap_or_else(|| "no detail provided".to_string());

    Some(WatchError::Remote { code, detail })
}

/// Render a marker field as text: strings verbatim, anything else as JSON.
fn describe(value: &Value) -> String {
    match value.as_str() {
        Some(text) => text.to_string(),
        None => value.to_string(),
    }
}
