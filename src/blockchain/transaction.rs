//! Certificate transaction construction.
//!
//! # Responsibilities
//! - Encode user data into the double-hex certificate payload
//! - Compute the canonical transaction ID
//! - Assemble and sign the record submitted to `Circular_AddTransaction_`
//!
//! The encodings here are a cross-implementation wire contract: the same
//! inputs must yield the same ID in every client of the protocol.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::blockchain::types::{CepError, CepResult};
use crate::blockchain::wallet;
use crate::codec::{hex_fix, to_hex};

/// Action tag carried inside every certificate payload.
pub const CERTIFICATE_ACTION: &str = "CP_CERTIFICATE";
/// Transaction type for certificates.
pub const CERTIFICATE_TX_TYPE: &str = "C_TYPE_CERTIFICATE";

/// Gateway endpoint suffixes, completed with the network name.
pub const ENDPOINT_WALLET_NONCE: &str = "Circular_GetWalletNonce_";
pub const ENDPOINT_ADD_TRANSACTION: &str = "Circular_AddTransaction_";
pub const ENDPOINT_TRANSACTION_BY_ID: &str = "Circular_GetTransactionbyID_";

/// Full URL of a gateway endpoint: `{gateway}{endpoint}{network}`.
pub fn endpoint_url(gateway_url: &str, endpoint: &str, network: &str) -> String {
    format!("{}{}{}", gateway_url, endpoint, network)
}

/// `{Action, Data}` before hex encoding. Field order is part of the format.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct CertificatePayload {
    pub action: String,
    pub data: String,
}

impl CertificatePayload {
    pub fn new(data: &str) -> Self {
        Self {
            action: CERTIFICATE_ACTION.to_string(),
            data: to_hex(data),
        }
    }

    /// Uppercase hex of the compact JSON form.
    pub fn encode(&self) -> CepResult<String> {
        let json = serde_json::to_string(self)
            .map_err(|e| CepError::MalformedResponse(format!("failed to encode payload: {}", e)))?;
        Ok(to_hex(json))
    }
}

/// SHA-256 over `blockchain || from || to || payload || nonce || timestamp`,
/// lowercase hex. Identifiers are `hex_fix`ed first.
pub fn transaction_id(
    blockchain: &str,
    from: &str,
    to: &str,
    payload_hex: &str,
    nonce: i64,
    timestamp: &str,
) -> String {
    let preimage = format!(
        "{}{}{}{}{}{}",
        hex_fix(blockchain),
        hex_fix(from),
        hex_fix(to),
        payload_hex,
        nonce,
        timestamp
    );
    hex::encode(Sha256::digest(preimage.as_bytes()))
}

/// The unit submitted to the gateway.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TransactionRecord {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "From")]
    pub from: String,
    #[serde(rename = "To")]
    pub to: String,
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Payload")]
    pub payload: String,
    #[serde(rename = "Nonce")]
    pub nonce: String,
    #[serde(rename = "Signature")]
    pub signature: String,
    #[serde(rename = "Blockchain")]
    pub blockchain: String,
    #[serde(rename = "Type")]
    pub tx_type: String,
    #[serde(rename = "Version")]
    pub version: String,
}

impl TransactionRecord {
    /// Build an unsigned, self-addressed certificate transaction.
    ///
    /// `nonce` is the account's current (pre-increment) nonce and `timestamp`
    /// is reused verbatim in both the ID and the body.
    pub fn certificate(
        address: &str,
        blockchain: &str,
        data: &str,
        nonce: i64,
        timestamp: &str,
        version: &str,
    ) -> CepResult<Self> {
        let payload = CertificatePayload::new(data).encode()?;
        let id = transaction_id(blockchain, address, address, &payload, nonce, timestamp);

        Ok(Self {
            id,
            from: hex_fix(address),
            to: hex_fix(address),
            timestamp: timestamp.to_string(),
            payload,
            nonce: nonce.to_string(),
            signature: String::new(),
            blockchain: hex_fix(blockchain),
            tx_type: CERTIFICATE_TX_TYPE.to_string(),
            version: version.to_string(),
        })
    }

    /// Sign the ID with `private_key_hex`. Any signer failure is `SigningFailed`.
    pub fn sign(mut self, private_key_hex: &str) -> CepResult<Self> {
        self.signature = wallet::sign_data(&self.id, private_key_hex)
            .map_err(|e| CepError::SigningFailed(e.to_string()))?;
        Ok(self)
    }
}
