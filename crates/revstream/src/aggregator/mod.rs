//! Upstream financial-data aggregator integration.
//!
//! The proxy endpoints shield the aggregator credential pair from browsers:
//! clients talk to the relay, the relay talks to the aggregator, and upstream
//! statuses and error messages are passed back as-is.

pub mod proxy;

pub use proxy::{aggregator_router, AggregatorProxy};

use std::time::Duration;

use async_trait::async_trait;

/// Raw upstream reply: the status code and the body exactly as received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpstreamResponse {
    pub status: u16,
    pub body: String,
}

impl UpstreamResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport failure reaching the aggregator.
#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("upstream aggregator unreachable: {0}")]
    Transport(String),
}

/// Outbound HTTP seam so the proxy can be exercised with stub upstreams.
#[async_trait]
pub trait AggregatorClient: Send + Sync {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<UpstreamResponse, AggregatorError>;
}

/// Production client speaking JSON over HTTPS to the aggregator.
pub struct HttpAggregatorClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpAggregatorClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl AggregatorClient for HttpAggregatorClient {
    async fn post_json(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<UpstreamResponse, AggregatorError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|err| AggregatorError::Transport(err.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| AggregatorError::Transport(err.to_string()))?;

        Ok(UpstreamResponse { status, body })
    }
}

/// Best-effort extraction of a human-readable message from an upstream error
/// payload. Returns `None` when the body is not JSON or carries no message.
pub(crate) fn extract_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error_message", "message"]
        .into_iter()
        .find_map(|key| value.get(key).and_then(|v| v.as_str()).map(str::to_string))
}
