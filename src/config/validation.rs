//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, poll budget at most a day, interval
//!   within the poll budget)
//! - Check that URLs and log levels parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: SdkConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::config::schema::SdkConfig;

/// Longest outcome wait a config file may ask for (one day).
pub const MAX_POLL_TIMEOUT_SECS: u64 = 86_400;

/// A single semantic problem, keyed by its TOML path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &SdkConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let discovery = &config.network.discovery_url;
    if discovery.is_empty() {
        errors.push(ValidationError::new("network.discovery_url", "must not be empty"));
    } else if let Err(e) = Url::parse(discovery) {
        errors.push(ValidationError::new("network.discovery_url", format!("invalid URL: {}", e)));
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let polling = &config.polling;
    if polling.timeout_secs == 0 {
        errors.push(ValidationError::new("polling.timeout_secs", "must be greater than 0"));
    } else if polling.timeout_secs > MAX_POLL_TIMEOUT_SECS {
        errors.push(ValidationError::new(
            "polling.timeout_secs",
            format!("must not exceed {} seconds", MAX_POLL_TIMEOUT_SECS),
        ));
    }
    if polling.interval_secs == 0 {
        errors.push(ValidationError::new("polling.interval_secs", "must be greater than 0"));
    } else if polling.interval_secs > polling.timeout_secs {
        errors.push(ValidationError::new(
            "polling.interval_secs",
            format!("must not exceed polling.timeout_secs ({})", polling.timeout_secs),
        ));
    }

    if config.observability.log_level.parse::<LevelFilter>().is_err() {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
