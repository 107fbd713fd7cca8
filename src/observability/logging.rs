//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the `tracing` subscriber for binaries
//! - Configure log level from config, overridable via `RUST_LOG`
//!
//! # Design Decisions
//! - The library only emits events; it never installs a subscriber on its own
//! - Private keys and signatures are never passed as event fields

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter used when `RUST_LOG` is unset: the configured level for this crate.
pub fn default_filter(config: &ObservabilityConfig) -> String {
    format!("circular_enterprise_apis={},cep_cli={}", config.log_level, config.log_level)
}

/// Install a global fmt subscriber. Returns `false` if one was already set.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter(config).into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok()
}
