//! Address publishing subsystem.
//!
//! # Data Flow
//! ```text
//! DeploymentRecord (address)
//!     → export.rs (append NAME=value to $GITHUB_ENV / $GITHUB_OUTPUT)
//!     → github.rs (PATCH organization Actions variable, optional retry)
//! ```
//!
//! # Design Decisions
//! - Publishers receive the address as a value; they never read it from ambient state
//! - Responses are returned typed; the pipeline decides what a failure means

pub mod export;
pub mod github;
pub mod types;

pub use export::LocalExport;
pub use github::{GithubVariables, VariableStore};
pub use types::{ExportError, ExportOutcome, PublishError, PublishOutcome, PublishResult};
