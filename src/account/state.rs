//! Account data model.
//!
//! Plain data plus synchronous transitions. Nothing here touches the network;
//! the coordinator owns the lock and the I/O.

use crate::blockchain::types::{CepError, CepResult};
use crate::config::SdkConfig;
use crate::{DEFAULT_CHAIN, DEFAULT_NAG, LIB_VERSION};

/// Default pause between outcome lookups, in seconds.
pub const DEFAULT_INTERVAL_SEC: u64 = 2;

/// Identity and session state for one blockchain address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountState {
    pub address: String,
    pub public_key: String,
    pub code_version: String,
    /// Base URL of the bound gateway; endpoint names are appended verbatim.
    pub gateway_url: String,
    pub network_name: String,
    pub blockchain_id: String,
    /// ID of the most recent accepted submission.
    pub latest_tx_id: String,
    /// Next nonce to use. Only advanced by a gateway-confirmed submission
    /// or replaced by a nonce sync.
    pub nonce: i64,
    pub interval_sec: u64,
    /// Message of the most recent failure. Successful operations leave it alone.
    pub last_error: Option<String>,
}

impl Default for AccountState {
    fn default() -> Self {
        Self {
            address: String::new(),
            public_key: String::new(),
            code_version: LIB_VERSION.to_string(),
            gateway_url: DEFAULT_NAG.to_string(),
            network_name: String::new(),
            blockchain_id: DEFAULT_CHAIN.to_string(),
            latest_tx_id: String::new(),
            nonce: 0,
            interval_sec: DEFAULT_INTERVAL_SEC,
            last_error: None,
        }
    }
}

impl AccountState {
    /// Fresh state seeded from configuration.
    pub fn from_config(config: &SdkConfig) -> Self {
        Self {
            gateway_url: config.network.gateway_url.clone(),
            blockchain_id: config.network.blockchain.clone(),
            interval_sec: config.polling.interval_secs,
            ..Self::default()
        }
    }

    pub fn open(&mut self, address: &str) -> CepResult<()> {
        if address.is_empty() {
            return Err(CepError::InvalidAddress);
        }
        self.address = address.to_string();
        Ok(())
    }

    /// Clear the session. Gateway and blockchain become empty rather than
    /// returning to their defaults, so a closed account must be reopened and
    /// rebound. `code_version` and `last_error` survive.
    pub fn close(&mut self) {
        self.address.clear();
        self.public_key.clear();
        self.gateway_url.clear();
        self.network_name.clear();
        self.blockchain_id.clear();
        self.latest_tx_id.clear();
        self.nonce = 0;
        self.interval_sec = 0;
    }

    pub fn is_open(&self) -> bool {
        !self.address.is_empty()
    }

    pub fn require_open(&self) -> CepResult<()> {
        if self.is_open() {
            Ok(())
        } else {
            Err(CepError::AccountNotOpen)
        }
    }

    pub fn require_network(&self) -> CepResult<()> {
        if self.gateway_url.is_empty() {
            Err(CepError::NetworkNotSet)
        } else {
            Ok(())
        }
    }

    pub fn record_error(&mut self, error: &CepError) {
        self.last_error = Some(error.to_string());
    }

    /// Record a failure prefixed with what was being attempted.
    pub fn record_error_in(&mut self, context: &str, error: &CepError) {
        self.last_error = Some(format!("{}: {}", context, error));
    }

    /// Bind a resolved gateway.
    pub fn bind(&mut self, network: &str, gateway_url: String) {
        self.gateway_url = gateway_url;
        self.network_name = network.to_string();
    }

    pub fn set_blockchain(&mut self, blockchain_id: &str) {
        self.blockchain_id = blockchain_id.to_string();
    }

    pub fn set_network_node(&mut self, network: &str) {
        self.network_name = network.to_string();
    }

    pub fn set_interval(&mut self, seconds: u64) {
        self.interval_sec = seconds;
    }

    pub fn set_public_key(&mut self, public_key: &str) {
        self.public_key = public_key.to_string();
    }

    pub fn set_gateway_url(&mut self, gateway_url: &str) {
        self.gateway_url = gateway_url.to_string();
    }
}
