//! Artwork contract deployment library

pub mod blockchain;
pub mod config;
pub mod observability;
pub mod pipeline;
pub mod publish;
pub mod resilience;

pub use blockchain::{ChainDeployer, Deployer, DeploymentRecord};
pub use config::schema::DeployConfig;
pub use pipeline::{Pipeline, PipelineError, PipelineReport};
pub use publish::{GithubVariables, LocalExport, VariableStore};
