//! Transaction lifecycle for one account.
//!
//! # Responsibilities
//! - Serialize every mutating operation on an account
//! - Refresh the nonce from the gateway
//! - Build, sign, and submit certificate transactions
//! - Look up transactions and wait for their outcome
//!
//! # Design Decisions
//! - One `tokio::sync::Mutex` per account, held for the whole
//!   read-nonce → build ID → POST → advance-nonce sequence
//! - Outcome polling snapshots the gateway binding and releases the lock, so
//!   a long wait never blocks submissions
//! - Every operation returns a structured error and also records its text in
//!   the account's `last_error`

use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::account::state::AccountState;
use crate::blockchain::client::{GatewayTransport, HttpTransport};
use crate::blockchain::discovery::NetworkResolver;
use crate::blockchain::transaction::{
    endpoint_url, TransactionRecord, ENDPOINT_ADD_TRANSACTION, ENDPOINT_TRANSACTION_BY_ID,
    ENDPOINT_WALLET_NONCE,
};
use crate::blockchain::types::{
    CepError, CepResult, GatewayReply, NonceRequest, TransactionQuery, RESULT_INSUFFICIENT_BALANCE,
    RESULT_INVALID_BLOCKCHAIN, RESULT_OK, STATUS_PENDING,
};
use crate::codec::{formatted_timestamp, hex_fix};
use crate::config::SdkConfig;
use crate::observability::metrics;
use crate::resilience::cancel::CancelSignal;
use crate::resilience::polling::{poll_until, PollPolicy, PollStep};

/// Block range scanned while waiting for an outcome.
const OUTCOME_START_BLOCK: i64 = 0;
const OUTCOME_END_BLOCK: i64 = 10;

/// Prefix for `last_error` when a single-block lookup fails.
const LOOKUP_ERROR_CONTEXT: &str = "failed to get transaction by ID";

/// Account handle backed by the HTTP transport.
pub type CepAccount = TransactionCoordinator<HttpTransport>;

/// Gateway coordinates captured for lock-free lookups.
#[derive(Debug, Clone)]
struct Binding {
    gateway_url: String,
    network_name: String,
    blockchain_id: String,
    code_version: String,
}

/// Drives the account transaction lifecycle.
///
/// Cloning yields another handle to the same account, so operations may be
/// spawned onto separate tasks; they still execute one at a time.
pub struct TransactionCoordinator<T = HttpTransport> {
    state: Arc<Mutex<AccountState>>,
    transport: Arc<T>,
    resolver: NetworkResolver<T>,
    poll_policy: PollPolicy,
}

impl<T> Clone for TransactionCoordinator<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            transport: self.transport.clone(),
            resolver: self.resolver.clone(),
            poll_policy: self.poll_policy,
        }
    }
}

impl TransactionCoordinator<HttpTransport> {
    /// Account with default settings, following the process-wide discovery URL.
    pub fn new() -> CepResult<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new()?)))
    }

    /// Account whose transport, discovery endpoint, and initial state come
    /// from configuration.
    pub fn from_config(config: &SdkConfig) -> CepResult<Self> {
        let transport = Arc::new(HttpTransport::from_config(&config.timeouts)?);
        let resolver = NetworkResolver::with_discovery_url(transport.clone(), &config.network.discovery_url);

        Ok(Self {
            state: Arc::new(Mutex::new(AccountState::from_config(config))),
            transport,
            resolver,
            poll_policy: config.polling.policy(),
        })
    }
}

impl<T: GatewayTransport> TransactionCoordinator<T> {
    pub fn with_transport(transport: Arc<T>) -> Self {
        let resolver = NetworkResolver::new(transport.clone());
        Self::with_resolver(transport, resolver)
    }

    pub fn with_resolver(transport: Arc<T>, resolver: NetworkResolver<T>) -> Self {
        Self {
            state: Arc::new(Mutex::new(AccountState::default())),
            transport,
            resolver,
            poll_policy: PollPolicy::default(),
        }
    }

    /// Policy used by [`TransactionCoordinator::wait_for_outcome`].
    pub fn with_poll_policy(mut self, policy: PollPolicy) -> Self {
        self.poll_policy = policy;
        self
    }

    // =========================================================================
    // Session
    // =========================================================================

    pub async fn open(&self, address: &str) -> CepResult<()> {
        let mut state = self.state.lock().await;
        let result = state.open(address);
        finish(&mut state, "open", result)
    }

    pub async fn close(&self) {
        self.state.lock().await.close();
        tracing::debug!("Account closed");
    }

    /// Resolve `network` and bind the account to its gateway.
    ///
    /// On failure the previous binding is kept.
    pub async fn set_network(&self, network: &str) -> CepResult<String> {
        let mut state = self.state.lock().await;
        let result = self.resolver.resolve(network).await;

        if let Ok(gateway_url) = &result {
            state.bind(network, gateway_url.clone());
            tracing::info!(network = %network, gateway_url = %gateway_url, "Network bound");
        }
        finish(&mut state, "set_network", result)
    }

    pub async fn set_blockchain(&self, blockchain_id: &str) {
        self.state.lock().await.set_blockchain(blockchain_id);
    }

    pub async fn set_network_node(&self, network: &str) {
        self.state.lock().await.set_network_node(network);
    }

    pub async fn set_interval(&self, seconds: u64) {
        self.state.lock().await.set_interval(seconds);
    }

    pub async fn set_public_key(&self, public_key: &str) {
        self.state.lock().await.set_public_key(public_key);
    }

    pub async fn set_gateway_url(&self, gateway_url: &str) {
        self.state.lock().await.set_gateway_url(gateway_url);
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> AccountState {
        self.state.lock().await.clone()
    }

    // =========================================================================
    // Nonce
    // =========================================================================

    /// Refresh the nonce from the gateway. Returns the next nonce to use.
    pub async fn update_account(&self) -> CepResult<i64> {
        let mut state = self.state.lock().await;
        let result = self.sync_nonce(&mut state).await;

        metrics::record_nonce_sync(result.is_ok());
        if let Ok(nonce) = &result {
            tracing::info!(address = %state.address, nonce = nonce, "Nonce synchronized");
        }
        finish(&mut state, "update_account", result)
    }

    async fn sync_nonce(&self, state: &mut AccountState) -> CepResult<i64> {
        state.require_open()?;
        state.require_network()?;

        let request = NonceRequest {
            address: hex_fix(&state.address),
            version: state.code_version.clone(),
            blockchain: hex_fix(&state.blockchain_id),
        };
        let url = endpoint_url(&state.gateway_url, ENDPOINT_WALLET_NONCE, &state.network_name);
        let body = self.transport.post_json(&url, &to_body(&request)?).await?;
        let reply = GatewayReply::parse(&body)?;

        match reply.code {
            RESULT_OK => {
                let nonce = reply
                    .response
                    .get("Nonce")
                    .and_then(Value::as_i64)
                    .and_then(|n| n.checked_add(1))
                    .ok_or_else(|| CepError::MalformedResponse("failed to decode nonce response".into()))?;
                state.nonce = nonce;
                Ok(nonce)
            }
            RESULT_INVALID_BLOCKCHAIN => Err(CepError::InvalidBlockchain),
            RESULT_INSUFFICIENT_BALANCE => Err(CepError::InsufficientBalance),
            _ => Err(CepError::UnknownRejection(format!(
                "failed to update account: {}",
                reply.message().unwrap_or("unknown error response")
            ))),
        }
    }

    // =========================================================================
    // Submission
    // =========================================================================

    /// Sign `data` into a certificate transaction and submit it.
    ///
    /// Returns the transaction ID. The nonce advances by exactly one only when
    /// the gateway accepts the transaction.
    pub async fn submit_certificate(&self, data: &str, private_key_hex: &str) -> CepResult<String> {
        let mut state = self.state.lock().await;
        let timestamp = formatted_timestamp();
        let result = self.submit_at(&mut state, data, private_key_hex, &timestamp).await;

        metrics::record_submission(result.is_ok());
        finish(&mut state, "submit_certificate", result)
    }

    async fn submit_at(
        &self,
        state: &mut AccountState,
        data: &str,
        private_key_hex: &str,
        timestamp: &str,
    ) -> CepResult<String> {
        state.require_open()?;
        state.require_network()?;

        let record = TransactionRecord::certificate(
            &state.address,
            &state.blockchain_id,
            data,
            state.nonce,
            timestamp,
            &state.code_version,
        )?
        .sign(private_key_hex)?;

        let url = endpoint_url(&state.gateway_url, ENDPOINT_ADD_TRANSACTION, &state.network_name);
        let body = self.transport.post_json(&url, &to_body(&record)?).await?;
        let reply = GatewayReply::parse(&body)?;

        if !reply.is_ok() {
            return Err(CepError::UnknownRejection(match reply.message() {
                Some(message) => format!("certificate submission failed: {}", message),
                None => "certificate submission failed with non-200 result code".to_string(),
            }));
        }

        state.latest_tx_id = record.id.clone();
        state.nonce += 1;
        tracing::info!(
            address = %state.address,
            tx_id = %record.id,
            nonce = state.nonce,
            "Certificate submitted"
        );
        Ok(record.id)
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Look up `tx_id` within a single block. Returns the full gateway reply.
    ///
    /// Block id errors are recorded as is; lookup failures are recorded as
    /// `failed to get transaction by ID: ...`.
    pub async fn get_transaction(&self, block_id: &str, tx_id: &str) -> CepResult<Value> {
        let block = match parse_block_id(block_id) {
            Ok(block) => block,
            Err(e) => return self.record("get_transaction", Err(e)).await,
        };

        let result = async {
            let binding = self.binding().await?;
            query_transaction(&*self.transport, &binding, tx_id, block, block).await
        }
        .await;

        if let Err(e) = &result {
            let mut state = self.state.lock().await;
            tracing::warn!(operation = "get_transaction", address = %state.address, error = %e, "Account operation failed");
            state.record_error_in(LOOKUP_ERROR_CONTEXT, e);
        }
        result
    }

    /// Wait for `tx_id` to leave the pending state.
    ///
    /// Failed lookups are retried until `timeout_sec` elapses.
    pub async fn get_transaction_outcome(
        &self,
        tx_id: &str,
        timeout_sec: u64,
        poll_interval_sec: u64,
    ) -> CepResult<Value> {
        self.get_transaction_outcome_with(tx_id, PollPolicy::from_secs(timeout_sec, poll_interval_sec), None)
            .await
    }

    /// Wait for an outcome using the configured timeout and the account's
    /// poll interval.
    pub async fn wait_for_outcome(&self, tx_id: &str) -> CepResult<Value> {
        let mut policy = self.poll_policy;
        let interval_sec = self.state.lock().await.interval_sec;
        if interval_sec > 0 {
            policy.interval = std::time::Duration::from_secs(interval_sec);
        }
        self.get_transaction_outcome_with(tx_id, policy, None).await
    }

    /// Wait for `tx_id` to leave the pending state under an explicit policy,
    /// optionally stopping early when `cancel` fires.
    pub async fn get_transaction_outcome_with(
        &self,
        tx_id: &str,
        policy: PollPolicy,
        cancel: Option<&CancelSignal>,
    ) -> CepResult<Value> {
        let result = match self.binding().await {
            Ok(binding) => {
                let transport = &*self.transport;
                let binding = &binding;
                tracing::debug!(tx_id = %tx_id, timeout_secs = policy.timeout.as_secs(), "Waiting for outcome");

                poll_until(policy, cancel, move || async move {
                    let body =
                        query_transaction(transport, binding, tx_id, OUTCOME_START_BLOCK, OUTCOME_END_BLOCK).await?;
                    let reply = GatewayReply::parse(&body)?;
                    let settled = reply.is_ok() && matches!(reply.status(), Some(status) if status != STATUS_PENDING);
                    let step = if settled {
                        PollStep::Final(reply.response)
                    } else {
                        PollStep::Pending
                    };
                    Ok::<_, CepError>(step)
                })
                .await
            }
            Err(e) => Err(e),
        };

        if let Ok(outcome) = &result {
            tracing::info!(tx_id = %tx_id, status = ?outcome.get("Status"), "Transaction outcome received");
        }
        self.record("get_transaction_outcome", result).await
    }

    async fn binding(&self) -> CepResult<Binding> {
        let state = self.state.lock().await;
        state.require_network()?;
        Ok(Binding {
            gateway_url: state.gateway_url.clone(),
            network_name: state.network_name.clone(),
            blockchain_id: state.blockchain_id.clone(),
            code_version: state.code_version.clone(),
        })
    }

    /// Record a failure from an operation that ran without the lock.
    async fn record<R>(&self, operation: &'static str, result: CepResult<R>) -> CepResult<R> {
        if result.is_ok() {
            return result;
        }
        let mut state = self.state.lock().await;
        finish(&mut state, operation, result)
    }
}

/// Write a failure into `last_error`; successes pass through untouched.
fn finish<R>(state: &mut AccountState, operation: &'static str, result: CepResult<R>) -> CepResult<R> {
    if let Err(e) = &result {
        tracing::warn!(operation = operation, address = %state.address, error = %e, "Account operation failed");
        state.record_error(e);
    }
    result
}

fn parse_block_id(block_id: &str) -> CepResult<i64> {
    if block_id.is_empty() {
        return Err(CepError::InvalidBlockId("blockID cannot be empty".into()));
    }
    block_id
        .trim()
        .parse::<i64>()
        .map_err(|_| CepError::InvalidBlockId(format!("invalid blockID '{}'", block_id)))
}

fn to_body<S: serde::Serialize>(value: &S) -> CepResult<Value> {
    serde_json::to_value(value).map_err(|e| CepError::MalformedResponse(format!("failed to encode request: {}", e)))
}

async fn query_transaction<T: GatewayTransport>(
    transport: &T,
    binding: &Binding,
    tx_id: &str,
    start: i64,
    end: i64,
) -> CepResult<Value> {
    let query = TransactionQuery {
        blockchain: hex_fix(&binding.blockchain_id),
        id: hex_fix(tx_id),
        start: start.to_string(),
        end: end.to_string(),
        version: binding.code_version.clone(),
    };
    let url = endpoint_url(&binding.gateway_url, ENDPOINT_TRANSACTION_BY_ID, &binding.network_name);
    Ok(transport.post_json(&url, &to_body(&query)?).await?)
}
