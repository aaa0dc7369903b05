//! Escalation constants and the bounded retry policy for the fallback model

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::domain::DomainError;

/// Confidence assigned when a model does not score its own answer.
///
/// Applies both to unscored primary replies and to every fallback reply.
pub const DEFAULT_CONFIDENCE: f32 = 0.9;

/// Sampling temperature used for form-data extraction
pub const EXTRACTION_TEMPERATURE: f32 = 0.1;

/// Delay between two fallback attempts
pub const FALLBACK_RETRY_BACKOFF: Duration = Duration::from_secs(1);

/// Longest response-cache lifetime a configuration may ask for (30 days)
pub const MAX_CACHE_TTL_SECS: u64 = 30 * 24 * 3600;

/// How long the active configuration may be served from cache
pub const CONFIG_CACHE_TTL: Duration = Duration::from_secs(300);

/// Result of running an operation under a [`RetryPolicy`]
#[derive(Debug)]
pub enum RetryOutcome<T> {
    Succeeded { value: T, attempts: u32 },
    Exhausted { attempts: u32, last_error: DomainError },
}

impl<T> RetryOutcome<T> {
    pub fn attempts(&self) -> u32 {
        match self {
            RetryOutcome::Succeeded { attempts, .. } | RetryOutcome::Exhausted { attempts, .. } => {
                *attempts
            }
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            RetryOutcome::Succeeded { value, .. } => Some(value),
            RetryOutcome::Exhausted { .. } => None,
        }
    }
}

/// Fixed-backoff retry policy: one initial attempt plus `max_retries` retries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    backoff: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: max_retries.saturating_add(1),
            backoff,
        }
    }

    pub fn with_default_backoff(max_retries: u32) -> Self {
        Self::new(max_retries, FALLBACK_RETRY_BACKOFF)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn backoff(&self) -> Duration {
        self.backoff
    }

    /// Runs `operation` until it succeeds or the attempts are used up.
    ///
    /// The closure receives the 1-based attempt number. The backoff is awaited
    /// between attempts, never after the last one.
    pub async fn run<T, F, Fut>(&self, mut operation: F) -> RetryOutcome<T>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<T, DomainError>>,
    {
        let mut attempt = 1;

        loop {
            match operation(attempt).await {
                Ok(value) => {
                    return RetryOutcome::Succeeded {
                        value,
                        attempts: attempt,
                    };
                }
                Err(error) => {
                    warn!(
                        attempt = attempt,
                        max_attempts = self.max_attempts,
                        error = %error,
                        "Attempt failed"
                    );

                    if attempt >= self.max_attempts {
                        return RetryOutcome::Exhausted {
                            attempts: attempt,
                            last_error: error,
                        };
                    }
                }
            }

            if !self.backoff.is_zero() {
                tokio::time::sleep(self.backoff).await;
            }
            attempt += 1;
        }
    }
}
