//! Bounded polling for transaction outcomes.
//!
//! # Responsibilities
//! - Repeat a lookup until it reports a final answer
//! - Enforce the wall-clock budget measured from the first attempt
//! - Apply the retry-on-error policy to failed attempts
//! - Stop promptly when the caller cancels
//!
//! # Design Decisions
//! - The budget is checked before every attempt. Both an attempt in flight
//!   and the pause after it are cut off at the deadline
//! - A budget too large to represent as an instant is treated as unbounded
//! - Errors folded into the budget (`retry_on_error`) are logged at debug
//!   level only; the caller sees `PollTimeout`
//! - No locks are held here; callers pass a self-contained attempt closure

use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep_until, timeout_at, Instant};

use crate::blockchain::types::{CepError, CepResult};
use crate::observability::metrics;
use crate::resilience::cancel::CancelSignal;

/// How long, how often, and how forgivingly to poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Total budget measured from the first attempt.
    pub timeout: Duration,
    /// Pause between attempts.
    pub interval: Duration,
    /// Keep polling after a failed attempt instead of returning its error.
    pub retry_on_error: bool,
}

impl PollPolicy {
    /// Whole-second policy that folds attempt errors into the budget.
    pub fn from_secs(timeout_sec: u64, interval_sec: u64) -> Self {
        Self {
            timeout: Duration::from_secs(timeout_sec),
            interval: Duration::from_secs(interval_sec),
            retry_on_error: true,
        }
    }

    pub fn with_retry_on_error(mut self, retry_on_error: bool) -> Self {
        self.retry_on_error = retry_on_error;
        self
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_secs(30, 2)
    }
}

/// Stand-in deadline for budgets that overflow `Instant` (about 30 years).
const FAR_FUTURE: Duration = Duration::from_secs(86400 * 365 * 30);

/// Result of one lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum PollStep {
    /// Terminal answer; polling stops.
    Final(Value),
    /// Not final yet; try again after the interval.
    Pending,
}

/// Run `attempt` until it returns [`PollStep::Final`], the budget runs out,
/// or `cancel` fires.
pub async fn poll_until<F, Fut>(
    policy: PollPolicy,
    cancel: Option<&CancelSignal>,
    mut attempt: F,
) -> CepResult<Value>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = CepResult<PollStep>>,
{
    let started = Instant::now();
    let deadline = started
        .checked_add(policy.timeout)
        .unwrap_or_else(|| started + FAR_FUTURE);
    let mut attempts: u32 = 0;

    let result = async {
        loop {
            if Instant::now() >= deadline {
                return Err(CepError::PollTimeout(policy.timeout.as_secs()));
            }

            attempts += 1;
            match timeout_at(deadline, attempt()).await {
                Ok(Ok(PollStep::Final(value))) => return Ok(value),
                Ok(Ok(PollStep::Pending)) => {
                    tracing::debug!(attempt = attempts, "Transaction pending");
                }
                Ok(Err(e)) if policy.retry_on_error => {
                    tracing::debug!(attempt = attempts, error = %e, "Outcome lookup failed, retrying");
                }
                Ok(Err(e)) => return Err(e),
                Err(_) => return Err(CepError::PollTimeout(policy.timeout.as_secs())),
            }

            let wake = Instant::now()
                .checked_add(policy.interval)
                .map_or(deadline, |at| at.min(deadline));
            sleep_until(wake).await;
        }
    };

    let result = match cancel {
        Some(signal) => {
            tokio::select! {
                result = result => result,
                _ = signal.cancelled() => Err(CepError::Cancelled),
            }
        }
        None => result.await,
    };

    metrics::record_poll(match &result {
        Ok(_) => "final",
        Err(CepError::PollTimeout(_)) => "timeout",
        Err(CepError::Cancelled) => "cancelled",
        Err(_) => "error",
    });
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blockchain::types::NetworkError;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::sleep;

    fn fast(timeout_ms: u64, interval_ms: u64) -> PollPolicy {
        PollPolicy {
            timeout: Duration::from_millis(timeout_ms),
            interval: Duration::from_millis(interval_ms),
            retry_on_error: true,
        }
    }

    #[tokio::test]
    async fn test_returns_first_final_answer() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let value = poll_until(fast(1000, 5), None, move || {
            let n = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Ok(PollStep::Pending)
                } else {
                    Ok(PollStep::Final(json!({"Status": "Executed"})))
                }
            }
        })
        .await
        .unwrap();

        assert_eq!(value["Status"], "Executed");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_always_pending_times_out() {
        let started = std::time::Instant::now();
        let err = poll_until(fast(100, 20), None, || async { Ok(PollStep::Pending) })
            .await
            .unwrap_err();

        assert!(matches!(err, CepError::PollTimeout(_)));
        assert!(started.elapsed() >= Duration::from_millis(100));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_errors_retried_within_budget() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();

        let err = poll_until(fast(100, 10), None, move || {
            counter.fetch_add(1, Ordering::SeqCst);
            async { Err(CepError::Network(NetworkError::Transport("refused".into()))) }
        })
        .await
        .unwrap_err();

        assert!(matches!(err, CepError::PollTimeout(_)));
        assert!(calls.load(Ordering::SeqCst) > 1);
    }

    #[tokio::test]
    async fn test_fail_fast_returns_attempt_error() {
        let policy = fast(1000, 10).with_retry_on_error(false);
        let err = poll_until(policy, None, || async {
            Err(CepError::MalformedResponse("failed to get result from response".into()))
        })
        .await
        .unwrap_err();

        assert!(matches!(err, CepError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_slow_attempt_cut_at_deadline() {
        let started = std::time::Instant::now();
        let err = poll_until(fast(50, 10), None, || async {
            sleep(Duration::from_secs(5)).await;
            Ok(PollStep::Pending)
        })
        .await
        .unwrap_err();

        assert!(matches!(err, CepError::PollTimeout(_)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_unbounded_timeout_returns_final_answer() {
        let policy = PollPolicy::from_secs(u64::MAX, 1);
        let value = poll_until(policy, None, || async { Ok(PollStep::Final(json!({"Status": "Executed"}))) })
            .await
            .unwrap();
        assert_eq!(value["Status"], "Executed");
    }

    #[tokio::test]
    async fn test_unbounded_interval_stops_at_deadline() {
        let policy = PollPolicy {
            timeout: Duration::from_millis(50),
            interval: Duration::MAX,
            retry_on_error: true,
        };
        let started = std::time::Instant::now();
        let err = poll_until(policy, None, || async { Ok(PollStep::Pending) }).await.unwrap_err();

        assert!(matches!(err, CepError::PollTimeout(_)));
        assert!(started.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_interval_longer_than_budget_stops_at_deadline() {
        let started = std::time::Instant::now();
        let err = poll_until(fast(200, 3000), None, || async { Ok(PollStep::Pending) })
            .await
            .unwrap_err();

        assert!(matches!(err, CepError::PollTimeout(_)));
        assert!(started.elapsed() >= Duration::from_millis(200));
        assert!(started.elapsed() < Duration::from_secs(1), "overran budget: {:?}", started.elapsed());
    }

    #[tokio::test]
    async fn test_cancel_stops_polling() {
        let signal = CancelSignal::new();
        let trigger = signal.clone();
        tokio::spawn(async move {
            sleep(Duration::from_millis(30)).await;
            trigger.cancel();
        });

        let err = poll_until(fast(5000, 10), Some(&signal), || async { Ok(PollStep::Pending) })
            .await
            .unwrap_err();
        assert_eq!(err, CepError::Cancelled);
    }

    #[test]
    fn test_policy_from_secs() {
        let policy = PollPolicy::from_secs(2, 1);
        assert_eq!(policy.timeout, Duration::from_secs(2));
        assert_eq!(policy.interval, Duration::from_secs(1));
        assert!(policy.retry_on_error);
        assert!(!policy.with_retry_on_error(false).retry_on_error);
    }
}
