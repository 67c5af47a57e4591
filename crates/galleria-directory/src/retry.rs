//! Explicit retry combinator.
//!
//! [`with_retry`] runs an async operation up to
//! [`RetryPolicy::max_attempts`] times and returns the first success or the
//! last error. There is no global retry policy: every call site passes the
//! policy it wants.

use std::{fmt::Display, future::Future, time::Duration};

use log::{debug, warn};

/// Total attempts allowed per network call.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// How many times an operation is attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    /// Creates a policy.
    ///
    /// # Arguments
    ///
    /// * `max_attempts` - Total attempts, including the first. Clamped to at
    ///   least one.
    /// * `backoff` - Base delay. The wait before attempt `n + 1` is
    ///   `backoff * n`.
    pub fn new(max_attempts: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            backoff,
        }
    }

    /// Policy with the default attempt count and no delay between attempts.
    pub fn immediate() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::ZERO)
    }

    /// Returns the total number of attempts.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Returns the base backoff delay.
    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    fn delay_after(&self, attempt: u32) -> Duration {
        self.backoff.saturating_mul(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ATTEMPTS, Duration::from_millis(250))
    }
}

/// Runs `operation` until it succeeds or the policy is exhausted.
///
/// The operation receives the 1-based attempt number. On exhaustion the error
/// of the final attempt is returned unchanged.
///
/// # Arguments
///
/// * `policy` - Attempt budget and backoff.
/// * `label` - Short description used in log records.
/// * `operation` - Produces a fresh future for each attempt.
pub async fn with_retry<T, E, F, Fut>(policy: &RetryPolicy, label: &str, mut operation: F) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match operation(attempt).await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(label = label, attempt = attempt; "Succeeded after retry");
                }
                return Ok(value);
            }
            Err(err) if attempt < policy.max_attempts => {
                warn!(
                    label = label,
                    attempt = attempt,
                    max_attempts = policy.max_attempts,
                    err:% = err;
                    "Attempt failed, retrying"
                );
                let delay = policy.delay_after(attempt);
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
