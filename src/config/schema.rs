//! Configuration schema definitions.
//!
//! This module defines the configuration structure for the SDK and the CLI.
//! All types derive Serde traits for deserialization from TOML files, and
//! every section has defaults so an empty file is a valid configuration.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::resilience::polling::PollPolicy;
use crate::{DEFAULT_CHAIN, DEFAULT_NAG, DEFAULT_NETWORK_URL};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SdkConfig {
    /// Discovery endpoint, initial gateway, and target chain.
    pub network: NetworkConfig,

    /// Transport deadlines.
    pub timeouts: TimeoutConfig,

    /// Outcome polling defaults.
    pub polling: PollingConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Network endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Base URL queried with `?network=<name>` to resolve a gateway.
    pub discovery_url: String,

    /// Gateway used until a network is bound.
    pub gateway_url: String,

    /// Blockchain identifier (hex).
    pub blockchain: String,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            discovery_url: DEFAULT_NETWORK_URL.to_string(),
            gateway_url: DEFAULT_NAG.to_string(),
            blockchain: DEFAULT_CHAIN.to_string(),
        }
    }
}

/// Timeout configuration for gateway HTTP exchanges.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment timeout in seconds.
    pub connect_secs: u64,

    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 30,
            request_secs: 30,
        }
    }
}

/// Outcome polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct PollingConfig {
    /// Total budget for one outcome wait, in seconds.
    pub timeout_secs: u64,

    /// Pause between lookups, in seconds.
    pub interval_secs: u64,

    /// Keep polling after a failed lookup instead of returning its error.
    pub retry_on_error: bool,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            interval_secs: 2,
            retry_on_error: true,
        }
    }
}

impl PollingConfig {
    pub fn policy(&self) -> PollPolicy {
        PollPolicy {
            timeout: Duration::from_secs(self.timeout_secs),
            interval: Duration::from_secs(self.interval_secs),
            retry_on_error: self.retry_on_error,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or filter directive (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
