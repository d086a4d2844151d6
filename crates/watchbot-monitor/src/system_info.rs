//! Client for the authenticated system info endpoint.
//!
//! The endpoint answers with an envelope:
//!
//! ```json
//! {"ResponseCode": 0, "ResponseData": {"cpu": {"load": 0.4}, "version": "1.2"}}
//! ```
//!
//! A non-zero `ResponseCode` is an application-level failure and is kept
//! apart from transport failures so the requester can tell them apart.

#[cfg(test)]
#[path = "system_info_tests.rs"]
mod tests;

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::error::MonitorError;

/// Failure to obtain system info.
#[derive(Debug, Error)]
pub enum SystemInfoError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with something other than 200.
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// 200 with a non-zero `ResponseCode`.
    #[error("ResponseCode {0}")]
    Application(i64),

    /// Body did not match the expected envelope.
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// The `ResponseData` mapping, in payload order.
#[derive(Debug, Clone, PartialEq)]
pub struct SystemInfo {
    pub data: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "ResponseCode")]
    code: i64,

    #[serde(rename = "ResponseData", default)]
    data: Value,
}

impl SystemInfo {
    /// Parse an envelope body.
    pub fn from_body(body: &str) -> Result<Self, SystemInfoError> {
        let envelope: Envelope =
            serde_json::from_str(body).map_err(|e| SystemInfoError::Malformed(e.to_string()))?;

        if envelope.code != 0 {
            return Err(SystemInfoError::Application(envelope.code));
        }

        match envelope.data {
            Value::Object(data) => Ok(Self { data }),
            other => Err(SystemInfoError::Malformed(format!(
                "ResponseData is not an object: {}",
                other
            ))),
        }
    }
}

/// Fetches system info with an optional bearer token.
pub struct SystemInfoClient {
    url: String,
    bearer_token: Option<String>,
    client: Client,
}

impl SystemInfoClient {
    pub fn new(
        url: impl Into<String>,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| MonitorError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            bearer_token,
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn fetch(&self) -> Result<SystemInfo, SystemInfoError> {
        let mut request = self.client.get(&self.url);
        if let Some(ref token) = self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SystemInfoError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            debug!("System info request to {} returned {}", self.url, status);
            return Err(SystemInfoError::HttpStatus(status.as_u16()));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SystemInfoError::Transport(e.to_string()))?;

        SystemInfo::from_body(&body)
    }
}
