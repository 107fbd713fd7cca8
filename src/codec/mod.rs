//! Deterministic encodings shared by every on-wire value.
//!
//! # Data Flow
//! ```text
//! user data / JSON payloads
//!     → hex_codec.rs (uppercase hex, hex_fix canonicalization)
//!     → transaction ID preimage
//!
//! wall clock
//!     → timestamp.rs (YYYY:MM:DD-HH:MM:SS, UTC)
//!     → transaction ID preimage + request body
//! ```
//!
//! # Design Decisions
//! - Hex conversions are total: malformed input yields an empty value, never an error
//! - Output must match other implementations of the protocol byte for byte

pub mod hex_codec;
pub mod timestamp;

pub use self::hex_codec::{from_hex, hex_fix, hex_to_str, to_hex};
pub use self::timestamp::{format_timestamp, formatted_timestamp, pad_number};
