//! Retry logic.
//!
//! # Responsibilities
//! - Decide whether a failure is transient
//! - Execute retries with exponential backoff + jitter
//! - Enforce the retry budget (max retries per operation)
//!
//! # Design Decisions
//! - Zero retries unless configured; the first failure is final by default
//! - Only operations that set state (safe to repeat) are wrapped
//! - Jittered backoff prevents thundering herd

use std::future::Future;

use crate::config::PublishConfig;
use crate::resilience::backoff::calculate_backoff;

/// Errors that know whether repeating the operation could help.
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

/// Bounded retry budget for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetryPolicy {
    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            base_delay_ms: 0,
            max_delay_ms: 0,
        }
    }

    pub fn from_publish(config: &PublishConfig) -> Self {
        Self {
            max_retries: config.max_retries,
            base_delay_ms: config.retry_base_delay_ms,
            max_delay_ms: config.retry_max_delay_ms,
        }
    }
}

/// Run `op` until it succeeds, fails permanently, or the budget is spent.
///
/// `op` receives the 1-based attempt number.
pub async fn retry_with_backoff<T, E, F, Fut>(
    policy: &RetryPolicy,
    operation: &'static str,
    mut op: F,
) -> Result<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: Retryable + std::fmt::Display,
{
    let mut attempt = 1;
    loop {
        match op(attempt).await {
            Ok(value) => return Ok(value),
            Err(e) if e.is_retryable() && attempt <= policy.max_retries => {
                let delay = calculate_backoff(attempt, policy.base_delay_ms, policy.max_delay_ms);
                tracing::warn!(
                    operation,
                    attempt = attempt,
                    max_retries = policy.max_retries,
                    delay_ms = delay.as_millis() as u64,
                    error = %e,
                    "Transient failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}
