use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

/// Fixed-interval retry policy for connection bootstrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    interval: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, interval: Duration) -> Self {
        Self { max_attempts, interval }
    }

    /// Total attempts, never less than one.
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn wait_before_retry(&self, attempt: u32) {
        if attempt == 0 || self.interval.is_zero() {
            return;
        }
        debug!("Retrying in {:?} (attempt {})", self.interval, attempt + 1);
        sleep(self.interval).await;
    }
}

/// Outcome of a retried operation that never succeeded.
#[derive(Debug)]
pub struct Exhausted<E> {
    pub attempts: u32,
    pub last_error: E,
}

/// Run `operation` until it succeeds or the policy is exhausted.
///
/// `on_failure` sees the 1-based attempt number and the error of each failed
/// attempt. No wait happens after the final attempt.
pub async fn retry_with_policy<F, Fut, T, E, L>(
    policy: &RetryPolicy,
    mut on_failure: L,
    mut operation: F,
) -> Result<(T, u32), Exhausted<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
    L: FnMut(u32, &E),
{
    let max = policy.max_attempts();
    let mut attempt = 0;
    loop {
        policy.wait_before_retry(attempt).await;
        attempt += 1;
        match operation().await {
            Ok(result) => {
                if attempt > 1 {
                    debug!("Operation succeeded after {} retries", attempt - 1);
                }
                return Ok((result, attempt));
            }
            Err(error) => {
                on_failure(attempt, &error);
                if attempt >= max {
                    warn!("Max retries ({}) reached: {}", max, error);
                    return Err(Exhausted { attempts: attempt, last_error: error });
                }
            }
        }
    }
}
