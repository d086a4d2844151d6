//! HTTP health probe.

#[cfg(test)]
#[path = "http_probe_tests.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::error::MonitorError;
use crate::probe::Probe;

/// Issues one GET per check; healthy iff the response status is exactly 200.
///
/// There is no retry here: a transient failure shows up as unhealthy for
/// that cycle. Reachability probes retry instead.
pub struct HttpHealthProbe {
    url: String,
    headers: Vec<(String, String)>,
    client: Client,
}

impl HttpHealthProbe {
    /// Create a probe whose requests give up after `timeout`.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, MonitorError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("watchbot/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MonitorError::Http(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            headers: Vec::new(),
            client,
        })
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.with_header("Authorization", value)
    }

    /// Add a request header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl Probe for HttpHealthProbe {
    fn kind(&self) -> &str {
        "http"
    }

    async fn check(&self) -> bool {
        let mut request = self.client.get(&self.url);
        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        match request.send().await {
            Ok(response) => {
                let status = response.status();
                debug!("GET {} returned {}", self.url, status);
                status == StatusCode::OK
            }
            Err(e) => {
                debug!("GET {} failed: {}", self.url, e);
                false
            }
        }
    }
}
