//! Account subsystem.
//!
//! # Data Flow
//! ```text
//! caller
//!     → coordinator.rs (per-account lock, lifecycle operations)
//!         → state.rs (address, nonce, binding, last_error)
//!         → blockchain/ (discovery, transport, transaction, wallet)
//!         → resilience/ (outcome polling, cancellation)
//! ```
//!
//! # Concurrency
//! - All mutating operations on one account run one at a time
//! - Handles are cheap to clone and share the same account

pub mod coordinator;
pub mod state;

pub use coordinator::{CepAccount, TransactionCoordinator};
pub use state::AccountState;
