//! Caller-driven cancellation for long-running waits.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast;

struct Inner {
    tx: broadcast::Sender<()>,
    cancelled: AtomicBool,
}

/// Cloneable cancellation handle.
///
/// Every clone observes the same signal. Cancelling is sticky: waits started
/// after [`CancelSignal::cancel`] return immediately.
#[derive(Clone)]
pub struct CancelSignal {
    inner: Arc<Inner>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(1);
        Self {
            inner: Arc::new(Inner {
                tx,
                cancelled: AtomicBool::new(false),
            }),
        }
    }

    /// Trigger the signal.
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        let _ = self.inner.tx.send(());
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Resolves once the signal has been triggered.
    pub async fn cancelled(&self) {
        // Subscribe before checking the flag so a concurrent cancel is not missed.
        let mut rx = self.inner.tx.subscribe();
        if self.is_cancelled() {
            return;
        }
        let _ = rx.recv().await;
    }

    /// Number of waits currently listening.
    pub fn waiter_count(&self) -> usize {
        self.inner.tx.receiver_count()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CancelSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelSignal")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}
