//! Bounded retry for remote calls.

use crate::error::{FailureKind, PlayError, Result};
use std::future::Future;
use tracing::warn;

/// Default number of attempts for retryable calls.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Executes `op` up to `max_attempts` times.
///
/// Only failures classified as [`FailureKind::Transient`] are retried; any
/// other failure aborts immediately and is surfaced verbatim, as is the last
/// error once attempts are exhausted. Attempts are sequential with no delay;
/// callers needing backoff must add it themselves.
///
/// `max_attempts` must be at least 1; zero is a configuration error raised
/// before the first attempt.
pub async fn retryable_execute<T, F, Fut>(mut op: F, max_attempts: u32) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    if max_attempts == 0 {
        return Err(PlayError::InvalidConfig(
            "The number of attempts must be greater than 0.".to_string(),
        ));
    }

    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if e.kind() == FailureKind::Transient && attempt < max_attempts => {
                warn!("Transient failure on attempt {}/{}: {}", attempt, max_attempts, e);
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn transient() -> PlayError {
        PlayError::api(FailureKind::Transient, 500, "backend error")
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = retryable_execute(
            || {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 2 {
                        Err(transient())
                    } else {
                        Ok("uploaded")
                    }
                }
            },
            3,
        )
        .await;

        assert_eq!(result.unwrap(), "uploaded");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn exhaustion_surfaces_the_last_error() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retryable_execute(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(transient()) }
            },
            3,
        )
        .await;

        let err = result.unwrap_err();
        assert!(matches!(err, PlayError::Api { status: 500, .. }));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_transient_failure_aborts_on_first_attempt() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retryable_execute(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err(PlayError::api(FailureKind::Other, 400, "bad request")) }
            },
            5,
        )
        .await;

        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn zero_attempts_is_a_precondition_error() {
        let calls = AtomicU32::new(0);
        let result: Result<()> = retryable_execute(
            || {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            },
            0,
        )
        .await;

        assert!(matches!(result, Err(PlayError::InvalidConfig(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
