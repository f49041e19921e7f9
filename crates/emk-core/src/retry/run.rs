//! Retry loop: run an async operation until success or policy says stop.

use std::future::Future;

use super::classify;
use super::policy::{RetryDecision, RetryPolicy};
use crate::fetch::FetchError;

/// Final result of a retried operation plus the number of attempts made.
#[derive(Debug)]
pub struct Attempted<T> {
    pub result: Result<T, FetchError>,
    pub attempts: u32,
}

/// Runs `f` until it succeeds or the retry policy says to stop. On a
/// retryable failure, sleeps for the backoff duration then tries again.
/// `f` receives the 1-based attempt number.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut f: F) -> Attempted<T>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, FetchError>>,
{
    let mut attempt = 1u32;
    loop {
        match f(attempt).await {
            Ok(v) => {
                return Attempted {
                    result: Ok(v),
                    attempts: attempt,
                }
            }
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => {
                        return Attempted {
                            result: Err(e),
                            attempts: attempt,
                        }
                    }
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, ?kind, delay_ms = d.as_millis() as u64, "retrying: {}", e);
                        tokio::time::sleep(d).await;
                        attempt += 1;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    fn http(status: u32) -> FetchError {
        FetchError::Http {
            status,
            url: "http://test/".into(),
        }
    }

    #[tokio::test]
    async fn retries_transient_then_succeeds() {
        let out = run_with_retry(&fast_policy(3), |attempt| async move {
            if attempt < 3 {
                Err(http(503))
            } else {
                Ok(attempt)
            }
        })
        .await;
        assert_eq!(out.result.unwrap(), 3);
        assert_eq!(out.attempts, 3);
    }

    #[tokio::test]
    async fn not_found_is_not_retried() {
        let out: Attempted<()> = run_with_retry(&fast_policy(5), |_| async { Err(http(404)) }).await;
        assert!(matches!(out.result, Err(FetchError::Http { status: 404, .. })));
        assert_eq!(out.attempts, 1);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let out: Attempted<()> = run_with_retry(&fast_policy(2), |_| async { Err(http(500)) }).await;
        assert!(out.result.is_err());
        assert_eq!(out.attempts, 2);
    }
}
