//! Circular protocol integration subsystem.
//!
//! # Data Flow
//! ```text
//! network name
//!     → discovery.rs (name → gateway base URL)
//!     → client.rs (JSON over HTTP(S), connect/request timeouts)
//!     → transaction.rs (payload, ID, record)
//!     → wallet.rs (SHA-256 + secp256k1 DER signature)
//! ```
//!
//! # Security Constraints
//! - Private keys are passed per call, never stored or logged
//! - The library never reads environment variables
//! - Every HTTP exchange is bounded by the transport timeouts

pub mod certificate;
pub mod client;
pub mod discovery;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use certificate::Certificate;
pub use client::{GatewayTransport, HttpTransport};
pub use discovery::{discovery_url, set_discovery_url, NetworkResolver};
pub use transaction::{transaction_id, CertificatePayload, TransactionRecord};
pub use types::{CepError, CepResult, GatewayReply, NetworkError};
