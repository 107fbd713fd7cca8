//! Gateway wire types and error definitions.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Gateway result code for an accepted request.
pub const RESULT_OK: i64 = 200;
/// Gateway result code rejecting an unknown blockchain.
pub const RESULT_INVALID_BLOCKCHAIN: i64 = 114;
/// Gateway result code rejecting an account without funds.
pub const RESULT_INSUFFICIENT_BALANCE: i64 = 115;

/// Status reported by the gateway while a transaction is not yet final.
pub const STATUS_PENDING: &str = "Pending";

/// Transport-level failures. Never retried by the transport itself.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NetworkError {
    /// Connection, TLS, or timeout failure.
    #[error("network request failed: {0}")]
    Transport(String),

    /// Gateway answered with a non-2xx status.
    #[error("network request failed with status: {status}")]
    Status { status: u16, body: String },

    /// Body was not valid JSON.
    #[error("failed to decode response JSON: {0}")]
    Decode(String),

    /// URL could not be parsed.
    #[error("invalid URL format: {0}")]
    InvalidUrl(String),
}

/// Errors surfaced by account and transaction operations.
///
/// `Display` output is what gets recorded in an account's `last_error`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CepError {
    #[error("invalid address format")]
    InvalidAddress,

    #[error("Account is not open")]
    AccountNotOpen,

    #[error("network is not set")]
    NetworkNotSet,

    #[error("network identifier cannot be empty")]
    EmptyNetworkName,

    /// Discovery service answered but refused to hand out a gateway.
    #[error("failed to get valid NAG URL from response: {0}")]
    DiscoveryRejected(String),

    /// Discovery service could not be reached or decoded.
    #[error("failed to fetch NAG URL: {0}")]
    DiscoveryUnreachable(String),

    #[error("Rejected: Invalid Blockchain")]
    InvalidBlockchain,

    #[error("Rejected: Insufficient balance")]
    InsufficientBalance,

    /// Any other non-200 result code: operation context plus the gateway's message.
    #[error("{0}")]
    UnknownRejection(String),

    /// A required field was missing or had the wrong type.
    #[error("{0}")]
    MalformedResponse(String),

    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("failed to sign data: {0}")]
    SigningFailed(String),

    #[error("{0}")]
    InvalidBlockId(String),

    /// Outcome polling exhausted its budget (seconds).
    #[error("timeout exceeded while waiting for transaction outcome")]
    PollTimeout(u64),

    /// Outcome polling was cancelled by the caller.
    #[error("transaction outcome polling cancelled")]
    Cancelled,

    #[error(transparent)]
    Network(#[from] NetworkError),
}

/// Result type for account operations.
pub type CepResult<T> = Result<T, CepError>;

/// Body of a `Circular_GetWalletNonce_` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct NonceRequest {
    pub address: String,
    pub version: String,
    pub blockchain: String,
}

/// Body of a `Circular_GetTransactionbyID_` request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionQuery {
    #[serde(rename = "Blockchain")]
    pub blockchain: String,
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Start")]
    pub start: String,
    #[serde(rename = "End")]
    pub end: String,
    #[serde(rename = "Version")]
    pub version: String,
}

/// Answer of the discovery endpoint. Missing fields decode as empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DiscoveryReply {
    pub status: String,
    pub url: String,
    pub message: String,
}

/// The `{Result, Response}` envelope every gateway endpoint answers with.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayReply {
    pub code: i64,
    pub response: Value,
}

impl GatewayReply {
    /// Extract the envelope; a missing or non-integer `Result` is malformed.
    pub fn parse(body: &Value) -> CepResult<Self> {
        let code = body
            .get("Result")
            .and_then(Value::as_i64)
            .ok_or_else(|| CepError::MalformedResponse("failed to get result from response".into()))?;

        Ok(Self {
            code,
            response: body.get("Response").cloned().unwrap_or(Value::Null),
        })
    }

    pub fn is_ok(&self) -> bool {
        self.code == RESULT_OK
    }

    /// The gateway's textual explanation, when `Response` is a string.
    pub fn message(&self) -> Option<&str> {
        self.response.as_str()
    }

    /// `Response.Status` for transaction lookups.
    pub fn status(&self) -> Option<&str> {
        self.response.get("Status").and_then(Value::as_str)
    }
}
