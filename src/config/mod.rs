//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → SdkConfig (validated, immutable)
//!     → HttpTransport (timeouts), NetworkResolver (discovery URL),
//!       AccountState (gateway, blockchain), PollPolicy (polling)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - The library never reads environment variables; only the CLI does

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::{NetworkConfig, ObservabilityConfig, PollingConfig, SdkConfig, TimeoutConfig};
pub use validation::{validate_config, ValidationError};
