//! Bounded retry with exponential backoff for the HTTP adapter
//!
//! Only transient failures are retried (timeouts, connection faults, 429,
//! 5xx); everything else surfaces immediately. After the attempt cap the
//! final failure is returned unchanged.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::error::{Result, StoreError};

/// Retry policy applied around each outbound store request
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total attempts, including the first (must be >= 1)
    pub max_attempts: u32,
    /// Delay before the first retry; doubles per attempt
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries (used by tests)
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff delay before retry number `attempt` (0-based)
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }

    /// Run `f`, retrying transient upstream failures with backoff
    pub async fn run<F, Fut, T>(&self, operation: &str, f: F) -> Result<T>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    let retryable = attempt + 1 < self.max_attempts && is_transient(&err);
                    if !retryable {
                        return Err(err);
                    }
                    let delay = self.delay_for(attempt);
                    warn!(
                        operation,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "transient store error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }
}

/// Whether an error is worth retrying
///
/// Validation and NotFound are definitive answers from our own layer or the
/// store; only `Upstream` faults that look like network or server hiccups
/// qualify.
pub fn is_transient(err: &StoreError) -> bool {
    let StoreError::Upstream(msg) = err else {
        return false;
    };
    let msg = msg.to_lowercase();
    msg.contains("timeout")
        || msg.contains("timed out")
        || msg.contains("connection")
        || msg.contains("429")
        || msg.contains("too many requests")
        || msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("504")
}
