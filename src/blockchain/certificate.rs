//! Standalone certificate document.

use serde::{Deserialize, Serialize};

use crate::codec::{hex_to_str, to_hex};
use crate::LIB_VERSION;

/// A certificate chained to an earlier transaction.
///
/// Serialized keys are emitted in sorted order, which is the order other
/// clients of the protocol produce.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Certificate {
    /// Uppercase hex of the user data.
    data: String,
    #[serde(rename = "previousBlock")]
    previous_block: String,
    #[serde(rename = "previousTxID")]
    previous_tx_id: String,
    version: String,
}

impl Default for Certificate {
    fn default() -> Self {
        Self {
            data: String::new(),
            previous_block: String::new(),
            previous_tx_id: String::new(),
            version: LIB_VERSION.to_string(),
        }
    }
}

impl Certificate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_data(&mut self, data: &str) {
        self.data = to_hex(data);
    }

    /// Decoded data; empty if the stored hex is not valid UTF-8.
    pub fn data(&self) -> String {
        hex_to_str(&self.data)
    }

    pub fn set_previous_tx_id(&mut self, tx_id: &str) {
        self.previous_tx_id = tx_id.to_string();
    }

    pub fn previous_tx_id(&self) -> &str {
        &self.previous_tx_id
    }

    pub fn set_previous_block(&mut self, block: &str) {
        self.previous_block = block.to_string();
    }

    pub fn previous_block(&self) -> &str {
        &self.previous_block
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Compact JSON form; empty on serialization failure.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Byte length of [`Certificate::to_json`].
    pub fn size(&self) -> usize {
        self.to_json().len()
    }
}
