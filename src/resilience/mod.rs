//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! get_transaction_outcome:
//!     → polling.rs (attempt, check budget, sleep interval, repeat)
//!     → cancel.rs (caller stops the wait early)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every wait has a deadline
//! - Only outcome lookups are retried; submissions never are
//! - Whether failed lookups are retried is an explicit policy field

pub mod cancel;
pub mod polling;

pub use cancel::CancelSignal;
pub use polling::{poll_until, PollPolicy, PollStep};
