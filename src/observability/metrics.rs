//! Metrics recording.
//!
//! # Metrics
//! - `cep_gateway_requests_total` (counter): gateway exchanges by endpoint, outcome
//! - `cep_gateway_request_duration_seconds` (histogram): exchange latency by endpoint
//! - `cep_certificates_submitted_total` (counter): submissions by outcome
//! - `cep_nonce_sync_total` (counter): nonce refreshes by outcome
//! - `cep_outcome_polls_total` (counter): finished outcome waits by outcome
//!
//! # Design Decisions
//! - Records through the `metrics` facade only; installing an exporter is
//!   left to the embedding application
//! - Without a recorder every call is a no-op

use metrics::{counter, histogram};
use std::time::Duration;

fn outcome(ok: bool) -> &'static str {
    if ok {
        "success"
    } else {
        "error"
    }
}

/// One HTTP exchange with a gateway or the discovery service.
pub fn record_gateway_request(endpoint: &str, ok: bool, elapsed: Duration) {
    counter!(
        "cep_gateway_requests_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome(ok)
    )
    .increment(1);
    histogram!("cep_gateway_request_duration_seconds", "endpoint" => endpoint.to_string())
        .record(elapsed.as_secs_f64());
}

pub fn record_submission(ok: bool) {
    counter!("cep_certificates_submitted_total", "outcome" => outcome(ok)).increment(1);
}

pub fn record_nonce_sync(ok: bool) {
    counter!("cep_nonce_sync_total", "outcome" => outcome(ok)).increment(1);
}

/// `outcome` is one of `final`, `timeout`, `cancelled`, `error`.
pub fn record_poll(outcome: &'static str) {
    counter!("cep_outcome_polls_total", "outcome" => outcome).increment(1);
}
