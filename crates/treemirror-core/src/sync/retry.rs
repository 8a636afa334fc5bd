//! Fixed-delay retry for copies that hit a lock conflict

use std::io;
use std::path::Path;
use std::time::Duration;

use tracing::warn;

use crate::error::{Error, Result, is_lock_conflict};
use crate::shutdown::ShutdownSignal;

/// Retry policy applied when a source file is held open by another process
///
/// Lock conflicts are retried indefinitely after `delay`; any other error is
/// returned immediately. A triggered [`ShutdownSignal`] ends the wait early
/// with [`Error::Cancelled`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl RetryPolicy {
    /// Delay between attempts unless configured otherwise
    pub const DEFAULT_DELAY: Duration = Duration::from_secs(60);

    /// Create a policy with the given delay between attempts
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Delay between attempts
    #[must_use]
    pub const fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `op` until it succeeds, retrying only on lock conflicts.
    ///
    /// Returns the operation's value and how many retries it took.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] for any non-lock failure and
    /// [`Error::Cancelled`] if shutdown is requested while waiting.
    pub fn run<T>(
        &self,
        path: &Path,
        shutdown: &ShutdownSignal,
        mut op: impl FnMut() -> io::Result<T>,
    ) -> Result<(T, u32)> {
        let mut retries = 0u32;

        loop {
            match op() {
                Ok(value) => return Ok((value, retries)),
                Err(e) if is_lock_conflict(&e) => {
                    warn!(
                        "File {} is in use. Retrying in {} seconds...",
                        path.display(),
                        self.delay.as_secs_f64()
                    );
                    retries = retries.saturating_add(1);
                    if shutdown.wait_timeout(self.delay) {
                        return Err(Error::Cancelled);
                    }
                }
                Err(e) => return Err(Error::io("copy", path, e)),
            }
        }
    }
}
