//! Network discovery: network name → gateway base URL.

use once_cell::sync::Lazy;
use std::sync::{Arc, RwLock};
use url::Url;

use crate::blockchain::client::GatewayTransport;
use crate::blockchain::types::{CepError, CepResult, DiscoveryReply};
use crate::DEFAULT_NETWORK_URL;

/// Process-wide discovery base URL.
static DISCOVERY_URL: Lazy<Arc<RwLock<String>>> =
    Lazy::new(|| Arc::new(RwLock::new(DEFAULT_NETWORK_URL.to_string())));

/// Replace the process-wide discovery base URL.
///
/// Affects every resolver built with [`NetworkResolver::new`], starting with
/// its next `resolve` call.
pub fn set_discovery_url(url: &str) {
    match DISCOVERY_URL.write() {
        Ok(mut guard) => *guard = url.to_string(),
        Err(poisoned) => *poisoned.into_inner() = url.to_string(),
    }
}

/// Current process-wide discovery base URL.
pub fn discovery_url() -> String {
    read_url(&DISCOVERY_URL)
}

fn read_url(lock: &RwLock<String>) -> String {
    match lock.read() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

/// Resolves network names through the discovery endpoint.
pub struct NetworkResolver<T> {
    transport: Arc<T>,
    base_url: Arc<RwLock<String>>,
}

impl<T> Clone for NetworkResolver<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            base_url: self.base_url.clone(),
        }
    }
}

impl<T: GatewayTransport> NetworkResolver<T> {
    /// Resolver following the process-wide discovery URL.
    pub fn new(transport: Arc<T>) -> Self {
        Self {
            transport,
            base_url: DISCOVERY_URL.clone(),
        }
    }

    /// Resolver with its own discovery URL, unaffected by [`set_discovery_url`].
    pub fn with_discovery_url(transport: Arc<T>, base_url: &str) -> Self {
        Self {
            transport,
            base_url: Arc::new(RwLock::new(base_url.to_string())),
        }
    }

    /// Discovery URL this resolver will query next.
    pub fn base_url(&self) -> String {
        read_url(&self.base_url)
    }

    /// Build `{base}?network={name}` with proper escaping.
    pub fn request_url(&self, network: &str) -> CepResult<Url> {
        let base = self.base_url();
        let mut url = Url::parse(&base)
            .map_err(|e| CepError::DiscoveryUnreachable(format!("invalid discovery URL '{}': {}", base, e)))?;
        url.query_pairs_mut().append_pair("network", network);
        Ok(url)
    }

    /// Resolve `network` to its gateway base URL.
    pub async fn resolve(&self, network: &str) -> CepResult<String> {
        if network.is_empty() {
            return Err(CepError::EmptyNetworkName);
        }

        let url = self.request_url(network)?;
        let body = self
            .transport
            .get_json(url.as_str())
            .await
            .map_err(|e| CepError::DiscoveryUnreachable(e.to_string()))?;

        let reply: DiscoveryReply = serde_json::from_value(body)
            .map_err(|e| CepError::DiscoveryUnreachable(format!("failed to unmarshal NAG response: {}", e)))?;

        // Covers explicit "error" as well as unknown statuses.
        if reply.status != "success" || reply.url.is_empty() {
            return Err(CepError::DiscoveryRejected(reply.message));
        }

        tracing::debug!(network = %network, gateway_url = %reply.url, "Network resolved");
        Ok(reply.url)
    }
}
