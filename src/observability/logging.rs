//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, `-v`, and `RUST_LOG`
//! - Log to stdout; the final error goes to stderr from `main`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for CI log ingestion, pretty format for terminals
//! - `RUST_LOG` always wins over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::schema::{LogFormat, ObservabilityConfig};

/// Filter directive used when `RUST_LOG` is unset.
pub fn default_directive(level: &str, verbose: bool) -> String {
    let level = if verbose { "debug" } else { level };
    format!("artwork_deploy={},warn", level)
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(config: &ObservabilityConfig, verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(&config.log_level, verbose)));

    let registry = tracing_subscriber::registry().with(filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .compact(),
            )
            .init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive() {
        assert_eq!(default_directive("info", false), "artwork_deploy=info,warn");
        assert_eq!(default_directive("info", true), "artwork_deploy=debug,warn");
        assert_eq!(default_directive("trace", false), "artwork_deploy=trace,warn");
    }

    #[test]
    fn test_directive_parses() {
        assert!(EnvFilter::try_new(default_directive("info", false)).is_ok());
    }
}
