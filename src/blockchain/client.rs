//! Gateway transport: JSON over HTTP(S).
//!
//! # Responsibilities
//! - POST/GET JSON bodies to gateway and discovery endpoints
//! - Map non-2xx statuses and connection failures to `NetworkError`
//! - Keep undecodable bodies distinct from transport failures
//!
//! Retries are never performed here; the outcome poller owns that policy.

use serde_json::Value;
use std::future::Future;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::blockchain::types::NetworkError;
use crate::config::schema::TimeoutConfig;
use crate::observability::metrics;

/// Minimal capability the account layer needs from the network.
///
/// Implementations must be cheap to share; the coordinator holds one behind
/// an `Arc` and calls it from spawned tasks.
pub trait GatewayTransport: Send + Sync + 'static {
    /// POST `body` as JSON and decode the JSON answer.
    fn post_json(&self, url: &str, body: &Value) -> impl Future<Output = Result<Value, NetworkError>> + Send;

    /// GET `url` and decode the JSON answer.
    fn get_json(&self, url: &str) -> impl Future<Output = Result<Value, NetworkError>> + Send;
}

/// `reqwest`-backed transport with connect and request deadlines.
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    timeouts: TimeoutConfig,
}

impl HttpTransport {
    /// Build a transport using the default 30 second deadlines.
    pub fn new() -> Result<Self, NetworkError> {
        Self::from_config(&TimeoutConfig::default())
    }

    /// Build a transport from timeout configuration.
    pub fn from_config(timeouts: &TimeoutConfig) -> Result<Self, NetworkError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(timeouts.connect_secs))
            .timeout(Duration::from_secs(timeouts.request_secs))
            .build()
            .map_err(|e| NetworkError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            timeouts: timeouts.clone(),
        })
    }

    async fn exchange(&self, request: reqwest::RequestBuilder, url: &str) -> Result<Value, NetworkError> {
        let request_id = Uuid::new_v4();
        let endpoint = endpoint_label(url);
        let started = Instant::now();

        tracing::debug!(request_id = %request_id, url = %url, "Gateway request");

        let result = async {
            let resp = request
                .send()
                .await
                .map_err(|e| NetworkError::Transport(e.to_string()))?;

            let status = resp.status();
            let text = resp
                .text()
                .await
                .map_err(|e| NetworkError::Transport(e.to_string()))?;

            if !status.is_success() {
                return Err(NetworkError::Status {
                    status: status.as_u16(),
                    body: text,
                });
            }

            serde_json::from_str::<Value>(&text).map_err(|e| NetworkError::Decode(e.to_string()))
        }
        .await;

        metrics::record_gateway_request(&endpoint, result.is_ok(), started.elapsed());
        match &result {
            Ok(_) => tracing::debug!(request_id = %request_id, elapsed_ms = started.elapsed().as_millis() as u64, "Gateway response"),
            Err(e) => tracing::debug!(request_id = %request_id, error = %e, "Gateway request failed"),
        }

        result
    }
}

impl GatewayTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: &Value) -> Result<Value, NetworkError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", url, e)))?;
        self.exchange(self.client.post(parsed).json(body), url).await
    }

    async fn get_json(&self, url: &str) -> Result<Value, NetworkError> {
        let parsed = reqwest::Url::parse(url).map_err(|e| NetworkError::InvalidUrl(format!("{}: {}", url, e)))?;
        self.exchange(self.client.get(parsed), url).await
    }
}

impl std::fmt::Debug for HttpTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpTransport")
            .field("connect_secs", &self.timeouts.connect_secs)
            .field("request_secs", &self.timeouts.request_secs)
            .finish()
    }
}

/// Metric label for a URL: the `Circular_*` endpoint name, or `discovery`.
fn endpoint_label(url: &str) -> String {
    match url.rfind("Circular_") {
        Some(idx) => {
            let name = &url[idx..];
            // Drop the trailing `_{network}`.
            match name.rfind('_') {
                Some(cut) if cut > "Circular".len() => name[..cut].to_string(),
                _ => name.to_string(),
            }
        }
        None => "discovery".to_string(),
    }
}
