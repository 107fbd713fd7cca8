//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! transport, resolver, coordinator produce:
//!     → tracing events (request_id, address, nonce, tx_id fields)
//!     → metrics.rs (counters, histograms via the `metrics` facade)
//!
//! Consumers:
//!     → logging.rs subscriber (CLI, stderr)
//!     → whatever recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Request ID (UUID v4) tags every gateway exchange
//! - Metrics are cheap and no-ops without a recorder

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
