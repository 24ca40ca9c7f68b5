use std::{fmt::Display, future::Future};

use thiserror::Error;
use tracing::{debug, warn};

use crate::backoff::{BackoffConfig, ExponentialBackoff};

/// Classification of a failed attempt.
#[derive(Debug, Error)]
pub enum RetryError<E> {
    /// Worth trying again unchanged.
    #[error("{0}")]
    Transient(E),
    /// Cannot succeed by repetition.
    #[error("{0}")]
    Permanent(E),
}

impl<E> RetryError<E> {
    pub fn into_inner(self) -> E {
        match self {
            RetryError::Transient(err) | RetryError::Permanent(err) => err,
        }
    }

    pub fn is_permanent(&self) -> bool {
        matches!(self, RetryError::Permanent(_))
    }
}

#[derive(Debug, Clone, Default)]
pub struct RetryPolicy {
    config: BackoffConfig,
}

impl RetryPolicy {
    pub fn new(config: BackoffConfig) -> Self {
        Self { config }
    }

    /// Runs `operation` until it succeeds or fails permanently.
    ///
    /// There is no attempt limit and no overall deadline. Every call starts from a fresh
    /// backoff generator.
    pub async fn retry<T, E, F, Fut>(&self, operation_name: &str, mut operation: F) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, RetryError<E>>>,
        E: Display,
    {
        let mut backoff = ExponentialBackoff::new(self.config);
        let mut attempt = 0u64;

        loop {
            attempt += 1;

            match operation().await {
                Ok(value) => {
                    if attempt > 1 {
                        debug!(attempt, "{operation_name} succeeded after retrying");
                    }
                    return Ok(value);
                }
                Err(RetryError::Permanent(err)) => {
                    warn!(attempt, error = %err, "{operation_name} failed permanently, giving up");
                    return Err(err);
                }
                Err(RetryError::Transient(err)) => {
                    let delay = backoff.next_backoff();
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "{operation_name} failed, retrying..."
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
