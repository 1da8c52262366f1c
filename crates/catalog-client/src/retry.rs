//! Retry utilities for the catalog client.
//!
//! Provides exponential backoff retry logic for transient HTTP errors such as
//! 429 Rate Limited responses. Non-retriable errors (bad statuses, parse
//! failures) are propagated immediately without retrying.

use std::future::Future;
use std::time::Duration;

use crate::error::ClientError;

/// Transient failures worth another attempt: 429 and transport errors.
/// Every other status, and any body that fails to decode, is final.
fn is_retriable(err: &ClientError) -> bool {
    matches!(
        err,
        ClientError::RateLimited { .. } | ClientError::Http(_)
    )
}

/// Seconds to wait before retry number `attempt + 1`.
///
/// Exponential in `backoff_base_secs` (`base * 2^attempt`), but never shorter
/// than a server-provided `Retry-After`.
fn backoff_delay_secs(err: &ClientError, attempt: u32, backoff_base_secs: u64) -> u64 {
    let exponential = backoff_base_secs.saturating_mul(1u64 << attempt.min(62));
    match err {
        ClientError::RateLimited { retry_after_secs } => exponential.max(*retry_after_secs),
        _ => exponential,
    }
}

/// Runs `operation`, retrying transient errors up to `max_retries` extra times.
///
/// With `max_retries = 0` the operation runs exactly once. Non-retriable
/// errors and the error of the final attempt are returned as-is.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_secs: u64,
    mut operation: F,
) -> Result<T, ClientError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, ClientError>>,
{
    let mut attempt = 0u32;

    loop {
        let err = match operation().await {
            Ok(value) => return Ok(value),
            Err(err) if !is_retriable(&err) || attempt >= max_retries => return Err(err),
            Err(err) => err,
        };

        let delay_secs = backoff_delay_secs(&err, attempt, backoff_base_secs);
        tracing::warn!(
            attempt,
            max_retries,
            delay_secs,
            error = %err,
            "transient catalog error, retrying after backoff"
        );
        tokio::time::sleep(Duration::from_secs(delay_secs)).await;
        attempt += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn rate_limited(retry_after_secs: u64) -> ClientError {
        ClientError::RateLimited { retry_after_secs }
    }

    /// Feeds `outcomes` to `retry_with_backoff` one per attempt and reports
    /// the final result together with the number of attempts made.
    async fn run_outcomes(
        max_retries: u32,
        outcomes: Vec<Result<u32, ClientError>>,
    ) -> (Result<u32, ClientError>, usize) {
        let outcomes = Mutex::new(outcomes.into_iter());
        let attempts = AtomicUsize::new(0);
        let result = retry_with_backoff(max_retries, 0, || {
            attempts.fetch_add(1, Ordering::SeqCst);
            let next = outcomes
                .lock()
                .unwrap()
                .next()
                .expect("more attempts than outcomes");
            async move { next }
        })
        .await;
        (result, attempts.into_inner())
    }

    #[test]
    fn backoff_doubles_per_attempt() {
        let err = ClientError::UnexpectedStatus {
            status: 500,
            url: String::new(),
        };
        assert_eq!(backoff_delay_secs(&err, 0, 2), 2);
        assert_eq!(backoff_delay_secs(&err, 1, 2), 4);
        assert_eq!(backoff_delay_secs(&err, 3, 2), 16);
    }

    #[test]
    fn backoff_respects_retry_after() {
        assert_eq!(backoff_delay_secs(&rate_limited(30), 0, 1), 30);
        assert_eq!(backoff_delay_secs(&rate_limited(1), 4, 1), 16);
    }

    #[test]
    fn backoff_saturates_instead_of_overflowing() {
        assert_eq!(backoff_delay_secs(&rate_limited(0), 200, u64::MAX), u64::MAX);
    }

    #[tokio::test]
    async fn default_config_never_retries() {
        let (result, attempts) = run_outcomes(0, vec![Err(rate_limited(0))]).await;
        assert_eq!(attempts, 1);
        assert!(matches!(result, Err(ClientError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn rate_limit_then_success_within_budget() {
        let (result, attempts) = run_outcomes(2, vec![Err(rate_limited(0)), Ok(7)]).await;
        assert_eq!(result.unwrap(), 7);
        assert_eq!(attempts, 2);
    }

    #[tokio::test]
    async fn gives_up_with_last_error_after_budget() {
        let outcomes = vec![Err(rate_limited(0)), Err(rate_limited(0)), Err(rate_limited(0))];
        let (result, attempts) = run_outcomes(2, outcomes).await;
        assert_eq!(attempts, 3);
        assert!(matches!(result, Err(ClientError::RateLimited { .. })));
    }

    #[tokio::test]
    async fn server_error_status_is_final() {
        let outcomes = vec![Err(ClientError::UnexpectedStatus {
            status: 503,
            url: "https://example.com/products".to_owned(),
        })];
        let (result, attempts) = run_outcomes(3, outcomes).await;
        assert_eq!(attempts, 1);
        assert!(matches!(
            result,
            Err(ClientError::UnexpectedStatus { status: 503, .. })
        ));
    }
}
