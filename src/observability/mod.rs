//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! config / blockchain / publish / pipeline produce:
//!     → tracing events with structured fields
//!     → logging.rs (filter + fmt layer, stdout)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) available for machine parsing
//! - Secrets are never recorded as fields

pub mod logging;

pub use logging::init_logging;
