//! Shutdown signalling for the scheduler loop and lock-conflict retries.

use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

#[derive(Debug, Default)]
struct Inner {
    triggered: Mutex<bool>,
    condvar: Condvar,
}

/// Cloneable shutdown flag that can also wake sleeping waiters
#[derive(Debug, Clone, Default)]
pub struct ShutdownSignal {
    inner: Arc<Inner>,
}

impl ShutdownSignal {
    /// Create a signal that has not fired yet
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request shutdown and wake every waiter
    pub fn trigger(&self) {
        let mut triggered = self
            .inner
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *triggered = true;
        self.inner.condvar.notify_all();
    }

    /// Whether shutdown has been requested
    #[must_use]
    pub fn is_triggered(&self) -> bool {
        *self
            .inner
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Sleep for `timeout` or until shutdown is requested.
    ///
    /// Returns `true` if shutdown was requested. A timeout too large to
    /// represent as an [`Instant`] waits until shutdown.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now().checked_add(timeout);
        let mut triggered = self
            .inner
            .triggered
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        while !*triggered {
            triggered = match deadline {
                Some(deadline) => {
                    let now = Instant::now();
                    if now >= deadline {
                        break;
                    }
                    self.inner
                        .condvar
                        .wait_timeout(triggered, deadline - now)
                        .unwrap_or_else(PoisonError::into_inner)
                        .0
                }
                None => self
                    .inner
                    .condvar
                    .wait(triggered)
                    .unwrap_or_else(PoisonError::into_inner),
            };
        }

        *triggered
    }
}
