//! Publish results and error definitions.

use std::path::PathBuf;

use thiserror::Error;

use crate::resilience::Retryable;

/// Errors from the remote variable store.
#[derive(Debug, Error)]
pub enum PublishError {
    /// Configuration could not be turned into a request.
    #[error("Invalid publish configuration: {0}")]
    Config(String),

    /// Network failure before a response arrived (connect, TLS, timeout).
    #[error("Publish request failed: {0}")]
    Transport(String),

    /// Server answered with a non-2xx status.
    #[error("Publish rejected with HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

impl PublishError {
    pub fn status(&self) -> Option<u16> {
        match self {
            PublishError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl Retryable for PublishError {
    fn is_retryable(&self) -> bool {
        match self {
            PublishError::Config(_) => false,
            PublishError::Transport(_) => true,
            PublishError::Status { status, .. } => *status == 429 || *status >= 500,
        }
    }
}

impl From<reqwest::Error> for PublishError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_builder() {
            PublishError::Config(e.to_string())
        } else {
            PublishError::Transport(e.to_string())
        }
    }
}

/// Result type for remote publish operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Non-error response of the remote publish. Logged, not parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOutcome {
    pub status: u16,
    pub body: String,
    /// Attempts made, including the successful one.
    pub attempts: u32,
}

/// Errors from the local export.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Invalid export name '{0}'")]
    InvalidName(String),

    #[error("Invalid export value: {0}")]
    InvalidValue(String),

    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for local export operations.
pub type ExportResult<T> = Result<T, ExportError>;

/// Which local sinks received the address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportOutcome {
    pub written: Vec<PathBuf>,
}

impl ExportOutcome {
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}
