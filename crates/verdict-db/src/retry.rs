//! Retry with exponential backoff for storage operations.
//!
//! Recomputations are idempotent, so at-least-once execution is safe: a
//! failed attempt rolls back and the whole unit of work runs again after a
//! capped, doubling delay.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use crate::error::DatabaseError;

/// Configuration for retry behavior on storage failures.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts (including the initial one).
    pub max_attempts: u32,
    /// Initial delay before the first retry.
    pub base_delay: Duration,
    /// Maximum delay between retries (backoff is capped here).
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(2),
        }
    }
}

impl RetryConfig {
    /// Delay before retry number `retry` (1-based): `base * 2^(retry-1)`, capped.
    #[must_use]
    pub fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }
}

/// Whether a failed unit of work is worth running again.
///
/// Missing submissions, duplicates and validation failures are permanent.
pub const fn is_retryable(e: &DatabaseError) -> bool {
    !matches!(
        e,
        DatabaseError::UnknownSubmission(_)
            | DatabaseError::Duplicate { .. }
            | DatabaseError::Validation(_)
    )
}

/// Run `op` until it succeeds, fails permanently, or attempts run out.
///
/// # Errors
///
/// Returns the last error from `op`.
pub async fn with_retry<T, E, F, Fut>(
    config: &RetryConfig,
    label: &str,
    retryable: impl Fn(&E) -> bool,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Display,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < config.max_attempts && retryable(&e) => {
                let delay = config.delay_for(attempt);
                tracing::warn!(
                    %label,
                    attempt,
                    max_attempts = config.max_attempts,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %e,
                    "storage operation failed, retrying"
                );
                tokio::time::sleep(delay).await;
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

    fn fast() -> RetryConfig {
        RetryConfig {
            max_attempts: 3,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(4),
        }
    }

    #[test]
    fn backoff_doubles_and_caps() {
        let config = RetryConfig::default();
        assert_eq!(config.delay_for(1), Duration::from_millis(100));
        assert_eq!(config.delay_for(2), Duration::from_millis(200));
        assert_eq!(config.delay_for(3), Duration::from_millis(400));
        assert_eq!(config.delay_for(10), Duration::from_secs(2));
    }

    #[tokio::test]
    async fn succeeds_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result: Result<u32, DatabaseError> = with_retry(&fast(), "test", is_retryable, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(DatabaseError::Query("database is locked".into()))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_max_attempts() {
        let calls = AtomicU32::new(0);
        let result: Result<(), DatabaseError> = with_retry(&fast(), "test", is_retryable, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DatabaseError::NoResult) }
        })
        .await;
        assert!(matches!(result, Err(DatabaseError::NoResult)));
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), DatabaseError> = with_retry(&fast(), "test", is_retryable, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(DatabaseError::UnknownSubmission("sub-missing".into())) }
        })
        .await;
        assert!(matches!(result, Err(DatabaseError::UnknownSubmission(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
