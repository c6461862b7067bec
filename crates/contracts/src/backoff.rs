//! BackoffPolicy - bounded retry with linearly increasing delay.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, warn};

use crate::ContractError;

/// Retry wrapper for establishing connections.
///
/// Delay grows strictly linearly: `start_delay`, then `+delay_step` after
/// each failed attempt. No jitter, no exponential growth - a deliberate
/// simplicity trade-off.
#[derive(Debug, Clone, Copy)]
pub struct BackoffPolicy {
    max_retries: u32,
    start_delay: Duration,
    delay_step: Duration,
}

impl BackoffPolicy {
    /// Create a policy with `max_retries` attempts, starting at
    /// `start_delay` and adding `delay_step` after each failure.
    pub const fn new(max_retries: u32, start_delay: Duration, delay_step: Duration) -> Self {
        Self {
            max_retries,
            start_delay,
            delay_step,
        }
    }

    /// Run `op` until it succeeds or `max_retries` attempts fail.
    ///
    /// `op` must be idempotently retryable. Sleeps for the current delay
    /// after every failed attempt.
    ///
    /// # Errors
    /// `ContractError::MaxRetriesExceeded` naming `operation` once all
    /// attempts fail; terminal for this process lifetime.
    pub async fn run<T, E, F, Fut>(&self, operation: &str, mut op: F) -> Result<T, ContractError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Display,
    {
        let mut delay = self.start_delay;
        for attempt in 1..=self.max_retries {
            debug!(operation, attempt, max = self.max_retries, "Attempt");
            match op().await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        operation,
                        attempt,
                        error = %e,
                        retry_in_secs = delay.as_secs_f64(),
                        "Attempt failed"
                    );
                    sleep(delay).await;
                    delay += self.delay_step;
                }
            }
        }
        error!(operation, "Max retries exceeded, cannot recover");
        Err(ContractError::MaxRetriesExceeded {
            operation: operation.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use tokio::time::Instant;

    #[tokio::test(start_paused = true)]
    async fn test_succeeds_after_k_failures() {
        let policy = BackoffPolicy::new(5, Duration::from_secs(2), Duration::from_secs(3));
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let begin = Instant::now();
        let value = policy
            .run("flaky", move || {
                let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n <= 2 {
                        Err(format!("boom {n}"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        // Two failures: slept 2s then 2+3=5s
        assert_eq!(begin.elapsed(), Duration::from_secs(7));
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_attempt_success_no_sleep() {
        let policy = BackoffPolicy::new(3, Duration::from_secs(10), Duration::from_secs(10));
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let begin = Instant::now();
        policy
            .run("immediate", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, String>(()) }
            })
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(begin.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_always_failing_exhausts_exactly_max_retries() {
        let policy = BackoffPolicy::new(3, Duration::from_secs(1), Duration::from_secs(1));
        let calls = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&calls);

        let result = policy
            .run("doomed", move || {
                counter.fetch_add(1, Ordering::SeqCst);
                async { Err::<(), _>("boom".to_string()) }
            })
            .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        match result {
            Err(ContractError::MaxRetriesExceeded { operation }) => {
                assert_eq!(operation, "doomed");
            }
            other => panic!("expected MaxRetriesExceeded, got {other:?}"),
        }
    }
}
