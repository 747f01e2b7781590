//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that every value a stage needs is present before the stage runs
//! - Validate value ranges (timeouts > 0, confirmations >= 1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: DeployConfig → Result<(), Vec<ValidationError>>
//! - Runs before any network call is attempted

use alloy::signers::local::PrivateKeySigner;
use thiserror::Error;

use crate::config::schema::DeployConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} is not a valid URL: {reason}")]
    InvalidUrl { field: &'static str, reason: String },

    #[error("{field} must use http or https, got '{scheme}'")]
    UnsupportedScheme { field: &'static str, scheme: String },

    #[error("signer.private_key is not a valid private key")]
    InvalidPrivateKey,

    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Validate a fully layered configuration.
pub fn validate_config(config: &DeployConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_url(&mut errors, "network.rpc_url", &config.network.rpc_url);

    let key = config.signer.private_key.expose().trim();
    if key.is_empty() {
        errors.push(ValidationError::Missing {
            field: "signer.private_key",
        });
    } else if !is_valid_private_key(key) {
        errors.push(ValidationError::InvalidPrivateKey);
    }

    if config.network.confirmations == 0 {
        errors.push(ValidationError::Zero {
            field: "network.confirmations",
        });
    }
    for (field, value) in [
        ("network.rpc_timeout_secs", config.network.rpc_timeout_secs),
        (
            "network.confirmation_timeout_secs",
            config.network.confirmation_timeout_secs,
        ),
        ("network.poll_interval_ms", config.network.poll_interval_ms),
    ] {
        if value == 0 {
            errors.push(ValidationError::Zero { field });
        }
    }

    if config.contract.artifact_path.trim().is_empty() {
        errors.push(ValidationError::Missing {
            field: "contract.artifact_path",
        });
    }
    if config.export.variable_name.trim().is_empty() {
        errors.push(ValidationError::Missing {
            field: "export.variable_name",
        });
    }

    let publish = &config.publish;
    if publish.enabled {
        check_url(&mut errors, "publish.api_url", &publish.api_url);
        if publish.org.trim().is_empty() {
            errors.push(ValidationError::Missing { field: "publish.org" });
        }
        if publish.variable_name.trim().is_empty() {
            errors.push(ValidationError::Missing {
                field: "publish.variable_name",
            });
        }
        if publish.token.is_empty() {
            errors.push(ValidationError::Missing {
                field: "publish.token",
            });
        }
        if publish.timeout_secs == 0 {
            errors.push(ValidationError::Zero {
                field: "publish.timeout_secs",
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if value.trim().is_empty() {
        errors.push(ValidationError::Missing { field });
        return;
    }
    match url::Url::parse(value) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        // `localhost:8545` parses with scheme `localhost`
        Ok(url) => errors.push(ValidationError::UnsupportedScheme {
            field,
            scheme: url.scheme().to_string(),
        }),
        Err(e) => errors.push(ValidationError::InvalidUrl {
            field,
            reason: e.to_string(),
        }),
    }
}

fn is_valid_private_key(key: &str) -> bool {
    let key = key.strip_prefix("0x").unwrap_or(key);
    key.parse::<PrivateKeySigner>().is_ok()
}
