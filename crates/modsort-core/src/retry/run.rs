//! Retry loop: run an async operation until success or policy says stop.

use std::future::Future;

use super::classify;
use super::error::TransportError;
use super::policy::{RetryDecision, RetryPolicy};

/// Runs `f` until it succeeds or the retry policy says to stop.
/// On retryable failure, sleeps for the backoff duration then tries again.
/// Returns the last error once attempts are exhausted.
pub async fn run_with_retry<T, F, Fut>(policy: &RetryPolicy, mut f: F) -> Result<T, TransportError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, TransportError>>,
{
    let mut attempt = 1u32;
    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                let kind = classify::classify(&e);
                match policy.decide(attempt, kind) {
                    RetryDecision::NoRetry => return Err(e),
                    RetryDecision::RetryAfter(d) => {
                        tracing::debug!(attempt, delay = ?d, "remote call failed, retrying: {}", e);
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
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast_policy(max_attempts: u32) -> RetryPolicy {
        RetryPolicy {
            max_attempts,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(2),
        }
    }

    #[tokio::test]
    async fn stops_after_max_attempts() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let res: Result<(), _> = run_with_retry(&fast_policy(4), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Timeout(Duration::from_millis(1)))
        })
        .await;
        assert!(matches!(res, Err(TransportError::Timeout(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let res = run_with_retry(&fast_policy(5), || async move {
            let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n < 3 {
                Err(TransportError::Http(503))
            } else {
                Ok(n)
            }
        })
        .await;
        assert_eq!(res.unwrap(), 3);
    }

    #[tokio::test]
    async fn non_retryable_error_returns_immediately() {
        let counter = AtomicU32::new(0);
        let calls = &counter;
        let res: Result<(), _> = run_with_retry(&fast_policy(5), || async move {
            calls.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Http(404))
        })
        .await;
        assert!(matches!(res, Err(TransportError::Http(404))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
