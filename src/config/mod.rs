//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! defaults
//!     → optional TOML file (loader.rs)
//!     → process environment, seeded from .env (loader.rs)
//!     → command-line overrides (loader.rs)
//!     → validation.rs (semantic checks)
//!     → DeployConfig (validated, immutable)
//!     → passed by reference to the deployer and publishers
//! ```
//!
//! # Design Decisions
//! - Config is built once at process start and never mutated afterwards
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Secrets are wrapped so they cannot be logged by accident

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use loader::{ConfigError, LoadOptions, LoadedConfig, Overrides};
pub use schema::DeployConfig;
pub use schema::NetworkConfig;
pub use schema::PublishConfig;
pub use schema::ExportConfig;
pub use secret::Secret;
