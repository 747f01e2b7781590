//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Remote publish:
//!     → HTTP client timeout (per attempt)
//!     → On failure: retries.rs (check if retryable, retry with backoff.rs)
//! ```
//!
//! Deployment is never retried: a second attempt would create a second contract.

pub mod backoff;
pub mod retries;

pub use retries::{retry_with_backoff, RetryPolicy, Retryable};
