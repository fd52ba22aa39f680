//! Bounded retry with fixed delay
//!
//! Applied around the provider-open call only. The database variant is the
//! one family member with a real budget; every other variant runs with the
//! degenerate single-attempt policy.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ContextError, ContextResult};

fn default_max_attempts() -> u32 {
    3
}

fn default_interval_ms() -> u64 {
    3_000
}

/// Bounded-retry-with-fixed-delay policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Total number of connection attempts allowed.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed delay between consecutive attempts, in milliseconds.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            interval_ms: default_interval_ms(),
        }
    }
}

impl RetryPolicy {
    /// Create a policy with the given budget and delay.
    #[must_use]
    pub fn new(max_attempts: u32, interval_ms: u64) -> Self {
        Self {
            max_attempts,
            interval_ms,
        }
    }

    /// The degenerate policy: exactly one attempt, no delay.
    #[must_use]
    pub fn once() -> Self {
        Self {
            max_attempts: 1,
            interval_ms: 0,
        }
    }

    /// The delay between attempts as a Duration.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    /// Whether another attempt is allowed after `attempt` attempts have
    /// failed with `error`.
    pub fn should_retry(&self, attempt: u32, error: &ContextError) -> bool {
        error.is_transient() && attempt < self.max_attempts
    }

    /// Drive `operation` under this policy.
    ///
    /// Only a transient fault earns another attempt; any other failure
    /// consumes the entire remaining budget and surfaces immediately. The
    /// lopsided accounting is deliberate and load-bearing: a refused or
    /// unreachable target may recover within the delay window, a rejected
    /// credential or broken configuration will not.
    pub async fn run<F, Fut, T>(&self, mut operation: F) -> ContextResult<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = ContextResult<T>>,
    {
        let mut attempts: u32 = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if err.is_transient() {
                        attempts += 1;
                    } else {
                        attempts += self.max_attempts;
                    }

                    if attempts > self.max_attempts {
                        return Err(err);
                    }

                    debug!(
                        attempt = attempts,
                        max_attempts = self.max_attempts,
                        delay_ms = self.interval_ms,
                        error = %err,
                        "retrying after transient connection failure"
                    );
                    tokio::time::sleep(self.delay()).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn fast(max_attempts: u32) -> RetryPolicy {
        RetryPolicy::new(max_attempts, 1)
    }

    #[tokio::test]
    async fn succeeds_first_try() {
        let calls = AtomicUsize::new(0);
        let result = fast(3)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, ContextError>(7) }
            })
            .await;

        assert_eq!(result.expect("ok"), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn transient_failures_use_the_full_budget() {
        let calls = Arc::new(AtomicUsize::new(0));
        let seen = calls.clone();

        let result = fast(3)
            .run(move || {
                let n = seen.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(ContextError::connectivity("target unavailable"))
                    } else {
                        Ok(42)
                    }
                }
            })
            .await;

        assert_eq!(result.expect("ok"), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn budget_exhaustion_surfaces_last_error() {
        let calls = AtomicUsize::new(0);
        let result: ContextResult<()> = fast(3)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ContextError::connectivity("still down")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_failure_fails_fast() {
        let calls = AtomicUsize::new(0);
        let result: ContextResult<()> = fast(5)
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ContextError::authentication("rejected")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn once_policy_never_retries() {
        let calls = AtomicUsize::new(0);
        let result: ContextResult<()> = RetryPolicy::once()
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(ContextError::connectivity("down")) }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn should_retry_matches_run_semantics() {
        let policy = fast(3);
        let transient = ContextError::connectivity("down");
        let permanent = ContextError::authentication("no");

        assert!(policy.should_retry(1, &transient));
        assert!(policy.should_retry(2, &transient));
        assert!(!policy.should_retry(3, &transient));
        assert!(!policy.should_retry(1, &permanent));
    }

    #[test]
    fn defaults() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay(), Duration::from_millis(3_000));
    }
}
