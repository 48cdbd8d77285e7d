//! Retry policy for provider calls
//!
//! Provider calls are billable, so the default policy makes a single
//! attempt. Raising `max_attempts` retries only errors that report
//! themselves as retryable (transient call failures and timeouts).

use rand::Rng;
use std::time::Duration;
use tokio::time::sleep;

use crate::error::ModerationError;

/// Each retry waits twice as long as the previous one.
const BACKOFF_MULTIPLIER: f64 = 2.0;
/// Jitter spreads a delay by up to this fraction in either direction.
const JITTER_FACTOR: f64 = 0.1;

/// How a single provider call is retried
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    /// Maximum number of provider calls per analysis, including the first
    pub max_attempts: u32,
    /// Wait before the first retry
    pub initial_delay: Duration,
    /// Upper bound on any single wait
    pub max_delay: Duration,
    /// Whether waits are randomized
    pub use_jitter: bool,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 1,
            initial_delay: Duration::from_millis(1000),
            max_delay: Duration::from_secs(30),
            use_jitter: true,
        }
    }
}

impl RetryPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub const fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    pub const fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    pub const fn with_jitter(mut self, use_jitter: bool) -> Self {
        self.use_jitter = use_jitter;
        self
    }

    /// Only errors the provider layer marks as transient are retried.
    pub fn should_retry(&self, error: &ModerationError) -> bool {
        error.is_retryable()
    }

    /// Wait before retry number `retry` (zero based), capped at `max_delay`.
    pub fn calculate_delay(&self, retry: u32) -> Duration {
        let base_ms = self.initial_delay.as_millis() as f64 * BACKOFF_MULTIPLIER.powi(retry as i32);
        let delay = Duration::from_millis(base_ms as u64).min(self.max_delay);

        if self.use_jitter {
            jittered(delay)
        } else {
            delay
        }
    }
}

fn jittered(delay: Duration) -> Duration {
    let spread = delay.as_millis() as f64 * JITTER_FACTOR;
    if spread <= 0.0 {
        return delay;
    }
    let offset = rand::thread_rng().gen_range(-spread..=spread);
    Duration::from_millis((delay.as_millis() as f64 + offset).max(0.0) as u64)
}

/// Retry executor that handles the actual retry logic
#[derive(Debug, Clone)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    /// Create a new retry executor
    pub const fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    /// Execute a function with retry logic
    pub async fn execute<F, Fut, T>(&self, mut operation: F) -> Result<T, ModerationError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, ModerationError>>,
    {
        let attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(error) => {
                    attempt += 1;
                    if attempt >= attempts || !self.policy.should_retry(&error) {
                        return Err(error);
                    }

                    let delay = self.policy.calculate_delay(attempt - 1);
                    tracing::debug!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "retrying provider call"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new()
            .with_max_attempts(attempts)
            .with_initial_delay(Duration::from_millis(1))
            .with_jitter(false)
    }

    #[tokio::test]
    async fn test_retry_success_on_second_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let executor = RetryExecutor::new(fast_policy(3));

        let result = executor
            .execute(|| {
                let counter = counter_clone.clone();
                async move {
                    let count = counter.fetch_add(1, Ordering::SeqCst);
                    if count == 0 {
                        Err(ModerationError::provider_call("openai", "503", true))
                    } else {
                        Ok("success")
                    }
                }
            })
            .await;

        assert_eq!(result.unwrap(), "success");
        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_default_policy_makes_single_attempt() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let executor = RetryExecutor::new(RetryPolicy::default());
        let result: Result<(), _> = executor
            .execute(|| {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(ModerationError::provider_call("azure", "503", true))
                }
            })
            .await;

        assert!(result.is_err());
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_non_retryable_error_stops_immediately() {
        let counter = Arc::new(AtomicU32::new(0));
        let counter_clone = counter.clone();

        let executor = RetryExecutor::new(fast_policy(5));
        let result: Result<(), _> = executor
            .execute(|| {
                let counter = counter_clone.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Err(ModerationError::missing_field("openai", "results"))
                }
            })
            .await;

        assert!(matches!(
            result,
            Err(ModerationError::Normalization { .. })
        ));
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_delay_grows_and_caps() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_millis(300))
            .with_jitter(false);
        assert_eq!(policy.calculate_delay(0), Duration::from_millis(100));
        assert_eq!(policy.calculate_delay(1), Duration::from_millis(200));
        assert_eq!(policy.calculate_delay(5), Duration::from_millis(300));
    }

    #[test]
    fn test_jitter_stays_within_ten_percent() {
        let policy = RetryPolicy::new()
            .with_initial_delay(Duration::from_millis(1000))
            .with_jitter(true);
        for _ in 0..20 {
            let delay = policy.calculate_delay(0);
            assert!(delay >= Duration::from_millis(900));
            assert!(delay <= Duration::from_millis(1100));
        }
    }
}
