//! Retry policy for transient transport failures

use std::future::Future;
use std::time::Duration;

use log::warn;

use crate::error::Result;

/// Total attempts including the first.
/// Two retries usually ride out a flaky connection without hiding a real outage.
const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Factor the wait grows by between attempts.
const DEFAULT_MULTIPLIER: u32 = 2;

/// Shortest wait between attempts.
const DEFAULT_MIN_WAIT: Duration = Duration::from_secs(2);

/// Longest wait between attempts.
const DEFAULT_MAX_WAIT: Duration = Duration::from_secs(10);

/// Exponential-backoff retry policy for transient transport failures.
///
/// Only errors classified transient by [`crate::error::Error::is_transient`]
/// (connection failures, connect and read timeouts) are retried; HTTP status
/// errors and application-level rejections surface immediately. When every
/// attempt fails the last transport error is returned unmodified so callers
/// see the real network failure.
///
/// One policy instance is injected into the client and applied uniformly to
/// every operation, the token exchange included.
///
/// # Example
/// ```ignore
/// let policy = RetryPolicy::new()
///     .max_attempts(5)
///     .min_wait(Duration::from_secs(1));
/// ```
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Total attempts including the first
    pub max_attempts: u32,
    /// Backoff growth factor
    pub multiplier: u32,
    /// Wait floor between attempts
    pub min_wait: Duration,
    /// Wait ceiling between attempts
    pub max_wait: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            multiplier: DEFAULT_MULTIPLIER,
            min_wait: DEFAULT_MIN_WAIT,
            max_wait: DEFAULT_MAX_WAIT,
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the total number of attempts (including the first).
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Set the backoff growth factor.
    pub fn multiplier(mut self, multiplier: u32) -> Self {
        self.multiplier = multiplier.max(1);
        self
    }

    /// Set the wait floor between attempts.
    pub fn min_wait(mut self, wait: Duration) -> Self {
        self.min_wait = wait;
        self
    }

    /// Set the wait ceiling between attempts.
    pub fn max_wait(mut self, wait: Duration) -> Self {
        self.max_wait = wait;
        self
    }

    /// Run `op` until it succeeds, fails non-transiently, or attempts are
    /// exhausted.
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut wait = self.min_wait;
        let mut attempt = 1u32;

        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() && attempt < self.max_attempts => {
                    warn!(
                        "transient network failure (attempt {}/{}), retrying in {:?}: {}",
                        attempt, self.max_attempts, wait, err
                    );
                    tokio::time::sleep(wait).await;
                    wait = (wait * self.multiplier).min(self.max_wait);
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
