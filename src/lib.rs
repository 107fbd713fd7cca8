//! Circular Enterprise APIs client library.
//!
//! Registers an account against a Circular network, signs application data
//! into certificate transactions, submits them to a network access gateway,
//! and waits for their on-chain outcome.
//!
//! # Architecture Overview
//!
//! ```text
//!   caller
//!     │
//!     ▼
//!  ┌─────────────────────────────────┐
//!  │ account::TransactionCoordinator │  open → set_network → update_account
//!  │     (one lock per account)      │  → submit_certificate → get_transaction_outcome
//!  └──────┬───────────────┬──────────┘
//!         │               │
//!         ▼               ▼
//!  ┌────────────┐  ┌──────────────┐  ┌────────────┐
//!  │ blockchain │  │  resilience  │  │   codec    │
//!  │ discovery  │  │ poll, cancel │  │ hex, time  │
//!  │ transport  │  └──────────────┘  └────────────┘
//!  │ tx, wallet │
//!  └────────────┘
//!        cross-cutting: config, observability
//! ```

#![forbid(unsafe_code)]

pub mod account;
pub mod blockchain;
pub mod codec;
pub mod config;
pub mod observability;
pub mod resilience;

/// Library version sent with every request.
pub const LIB_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default blockchain identifier.
pub const DEFAULT_CHAIN: &str = "0x8a20baa40c45dc5055aeb26197c203e576ef389d9acb171bd62da11dc5ad72b2";

/// Default network access gateway base URL.
pub const DEFAULT_NAG: &str = "https://nag.circularlabs.io/NAG.php?cep=";

/// Default discovery endpoint, queried as `?network=<name>`.
pub const DEFAULT_NETWORK_URL: &str = "https://circularlabs.io/network/getNAG";

pub use account::{AccountState, CepAccount, TransactionCoordinator};
pub use blockchain::{Certificate, CepError, CepResult, GatewayTransport, HttpTransport, NetworkError, NetworkResolver};
pub use config::SdkConfig;
pub use resilience::{CancelSignal, PollPolicy};
