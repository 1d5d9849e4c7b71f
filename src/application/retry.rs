use backoff::ExponentialBackoff;
use backoff::future::retry;
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Errors that can tell whether another attempt might succeed.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

impl Transient for crate::error::ResolutionError {
    fn is_transient(&self) -> bool {
        crate::error::ResolutionError::is_transient(self)
    }
}

impl Transient for crate::error::LedgerError {
    fn is_transient(&self) -> bool {
        crate::error::LedgerError::is_transient(self)
    }
}

/// Retry policy for resolver and ledger calls. Retries are off by default.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Extra attempts after the first one; zero disables retrying.
    pub max_retries: u32,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 0,
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(30),
            multiplier: 2.0,
        }
    }
}

impl RetryPolicy {
    pub fn with_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    fn backoff(&self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_interval: self.initial_interval,
            max_interval: self.max_interval,
            multiplier: self.multiplier,
            max_elapsed_time: None,
            ..Default::default()
        }
    }

    /// Runs `operation`, retrying transient failures up to `max_retries` times.
    pub async fn run<T, E, F, Fut>(&self, what: &str, mut operation: F) -> Result<T, E>
    where
        E: Transient + std::fmt::Display,
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        let max_retries = self.max_retries;
        let mut attempt = 0u32;
        retry(self.backoff(), || {
            attempt += 1;
            let current = attempt;
            let call = operation();
            async move {
                match call.await {
                    Ok(value) => Ok(value),
                    Err(err) if err.is_transient() && current <= max_retries => {
                        warn!(what, attempt = current, error = %err, "Attempt failed, retrying");
                        Err(backoff::Error::transient(err))
                    }
                    Err(err) => Err(backoff::Error::permanent(err)),
                }
            }
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            initial_interval: Duration::from_millis(1),
            max_interval: Duration::from_millis(2),
            multiplier: 1.0,
        }
    }

    #[tokio::test]
    async fn test_default_policy_does_not_retry() {
        let calls = AtomicU32::new(0);
        let result: Result<(), LedgerError> = RetryPolicy::default()
            .run("submit", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LedgerError::Transport("down".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_transient_errors_are_retried() {
        let calls = AtomicU32::new(0);
        let result = fast(3)
            .run("submit", || async {
                if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                    Err(LedgerError::Transport("down".into()))
                } else {
                    Ok("TX")
                }
            })
            .await;
        assert_eq!(result.unwrap(), "TX");
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_retries_are_bounded() {
        let calls = AtomicU32::new(0);
        let result: Result<(), LedgerError> = fast(2)
            .run("submit", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LedgerError::Transport("down".into()))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<(), LedgerError> = fast(5)
            .run("submit", || async {
                calls.fetch_add(1, Ordering::SeqCst);
                Err(LedgerError::Rejected("overspend".into()))
            })
            .await;
        assert!(matches!(result, Err(LedgerError::Rejected(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
