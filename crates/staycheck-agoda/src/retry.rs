//! Bounded retry with a fixed back-off schedule.
//!
//! [`retry_with_backoff`] wraps one logical API call. Errors the classifier
//! marks retryable (timeouts, connection failures, 5xx) are retried after
//! the scheduled delay; everything else is returned on first occurrence.
//! Running out of attempts yields [`AgodaError::RetryExhausted`].

use std::future::Future;
use std::time::Duration;

use crate::classify::classify;
use crate::error::AgodaError;

/// Attempt budget and the delays slept between attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// `delays[n]` is slept before attempt `n + 2`. When the schedule is
    /// shorter than the budget its last entry is reused.
    pub delays: Vec<Duration>,
}

impl Default for RetryPolicy {
    /// Three attempts; 1 s before the second, 2 s before the third.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            delays: vec![
                Duration::from_secs(1),
                Duration::from_secs(2),
                Duration::from_secs(4),
            ],
        }
    }
}

impl RetryPolicy {
    /// Same budget, no waiting. Handy against mock servers.
    #[must_use]
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            delays: Vec::new(),
        }
    }

    /// Delay slept after failed attempt number `attempt` (1-based).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let idx = usize::try_from(attempt.saturating_sub(1)).unwrap_or(usize::MAX);
        self.delays
            .get(idx)
            .or_else(|| self.delays.last())
            .copied()
            .unwrap_or(Duration::ZERO)
    }
}

/// Runs `operation` under `policy`.
///
/// | Attempt | Sleep before it (default policy) |
/// |---------|----------------------------------|
/// | 1       | none                             |
/// | 2       | 1 s                              |
/// | 3       | 2 s                              |
///
/// No delay follows the final attempt.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, AgodaError>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, AgodaError>>,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1u32;
    loop {
        match operation(attempt).await {
            Ok(value) => return Ok(value),
            Err(err) => {
                let verdict = classify(&err);
                if !verdict.is_retryable() {
                    return Err(err);
                }
                if attempt >= max_attempts {
                    tracing::error!(
                        attempts = attempt,
                        error = %err,
                        "retry budget exhausted"
                    );
                    return Err(AgodaError::RetryExhausted {
                        attempts: attempt,
                        last: Box::new(err),
                    });
                }
                let delay = policy.delay_after(attempt);
                #[allow(clippy::cast_possible_truncation)]
                let delay_ms = delay.as_millis() as u64;
                tracing::warn!(
                    attempt,
                    max_attempts,
                    delay_ms,
                    ?verdict,
                    error = %err,
                    "transient API error, retrying after back-off"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    use tokio::time::Instant;

    use super::*;
    use crate::classify::status_error;

    #[test]
    fn default_schedule_is_one_two_four_seconds() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.delay_after(1), Duration::from_secs(1));
        assert_eq!(policy.delay_after(2), Duration::from_secs(2));
        assert_eq!(policy.delay_after(3), Duration::from_secs(4));
        assert_eq!(policy.delay_after(9), Duration::from_secs(4));
    }

    #[test]
    fn immediate_policy_never_waits() {
        assert_eq!(RetryPolicy::immediate(3).delay_after(2), Duration::ZERO);
    }

    #[tokio::test]
    async fn succeeds_immediately_on_first_try() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), |_| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Ok::<u32, AgodaError>(42)
            }
        })
        .await;
        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn three_server_errors_exhaust_with_one_and_two_second_waits() {
        let started = Instant::now();
        let seen = Arc::new(std::sync::Mutex::new(Vec::new()));
        let s = Arc::clone(&seen);
        let result = retry_with_backoff(&RetryPolicy::default(), |attempt| {
            let s = Arc::clone(&s);
            async move {
                s.lock().unwrap().push((attempt, started.elapsed()));
                Err::<(), _>(status_error(503))
            }
        })
        .await;

        let seen = seen.lock().unwrap().clone();
        let attempts: Vec<u32> = seen.iter().map(|(a, _)| *a).collect();
        assert_eq!(attempts, vec![1, 2, 3]);
        assert_eq!(seen[0].1, Duration::ZERO);
        assert_eq!(seen[1].1, Duration::from_secs(1));
        assert_eq!(seen[2].1, Duration::from_secs(3));
        // No trailing delay after the last attempt.
        assert_eq!(started.elapsed(), Duration::from_secs(3));
        assert!(matches!(
            result,
            Err(AgodaError::RetryExhausted { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), |_| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(status_error(401))
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1, "401 must not be retried");
        assert!(matches!(result, Err(AgodaError::Client { status: 401, .. })));
    }

    #[tokio::test]
    async fn api_error_is_not_retried() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), |_| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                Err::<u32, _>(AgodaError::Api {
                    id: 911,
                    message: "No search result".to_owned(),
                })
            }
        })
        .await;
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(AgodaError::Api { id: 911, .. })));
    }

    #[tokio::test]
    async fn retries_then_succeeds() {
        let calls = Arc::new(AtomicU32::new(0));
        let c = Arc::clone(&calls);
        let result = retry_with_backoff(&RetryPolicy::immediate(3), |attempt| {
            let c = Arc::clone(&c);
            async move {
                c.fetch_add(1, Ordering::SeqCst);
                if attempt < 3 {
                    Err(status_error(500))
                } else {
                    Ok(99)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 99, "should succeed after retries");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }
}
