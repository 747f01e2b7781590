//! Deploy-and-publish pipeline.
//!
//! # Data Flow
//! ```text
//! Deployer::deploy  ──▶ DeploymentRecord ──▶ log address
//!                                           ──▶ LocalExport::export
//!                                           ──▶ VariableStore::set_value
//! ```
//!
//! # Design Decisions
//! - Strictly sequential; each step gates the next
//! - A failed deployment never reaches the publishers
//! - The address is logged before any publish attempt, and errors raised
//!   after deployment carry it, so an operator can finish by hand

pub mod state;

use thiserror::Error;

use crate::blockchain::{DeployError, Deployer, DeploymentRecord};
use crate::config::ConfigError;
use crate::publish::{
    ExportError, ExportOutcome, LocalExport, PublishError, PublishOutcome, VariableStore,
};

pub use state::{IllegalTransition, Stage, StageTracker};

/// Process exit codes, one per failure class.
pub mod exit_code {
    pub const SUCCESS: u8 = 0;
    pub const CONFIG: u8 = 2;
    pub const DEPLOY: u8 = 3;
    pub const EXPORT: u8 = 4;
    pub const PUBLISH: u8 = 5;
}

/// Everything that can abort a run.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Publisher setup failed: {0}")]
    PublishSetup(#[source] PublishError),

    #[error("Deployment failed: {0}")]
    Deploy(#[from] DeployError),

    #[error("Contract deployed to {address} but local export failed: {source}")]
    Export {
        address: String,
        record: Box<DeploymentRecord>,
        #[source]
        source: ExportError,
    },

    #[error("Contract deployed to {address} but publishing to {target} failed: {source}")]
    Publish {
        address: String,
        target: String,
        record: Box<DeploymentRecord>,
        #[source]
        source: PublishError,
    },
}

impl PipelineError {
    pub fn exit_code(&self) -> u8 {
        match self {
            PipelineError::Config(_) | PipelineError::PublishSetup(_) => exit_code::CONFIG,
            PipelineError::Deploy(_) => exit_code::DEPLOY,
            PipelineError::Export { .. } => exit_code::EXPORT,
            PipelineError::Publish { .. } => exit_code::PUBLISH,
        }
    }

    /// Address of the contract created before the failure, if any.
    pub fn deployed_address(&self) -> Option<&str> {
        match self {
            PipelineError::Export { address, .. } | PipelineError::Publish { address, .. } => {
                Some(address)
            }
            _ => None,
        }
    }
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub record: DeploymentRecord,
    /// `None` when the environment offers no export target.
    pub export: Option<ExportOutcome>,
    /// `None` when remote publishing is disabled.
    pub publish: Option<PublishOutcome>,
    pub stages: Vec<Stage>,
}

impl PipelineReport {
    pub fn address(&self) -> String {
        self.record.address_string()
    }
}

/// One deploy-and-publish run.
#[derive(Debug)]
pub struct Pipeline<D, S> {
    deployer: D,
    export: LocalExport,
    store: Option<S>,
}

impl<D, S> Pipeline<D, S>
where
    D: Deployer,
    S: VariableStore,
{
    /// `store` is `None` when remote publishing is disabled.
    pub fn new(deployer: D, export: LocalExport, store: Option<S>) -> Self {
        Self {
            deployer,
            export,
            store,
        }
    }

    /// Deploy, then export and publish the address.
    ///
    /// Not idempotent: each call creates a new contract.
    pub async fn run(&self) -> Result<PipelineReport, PipelineError> {
        let mut stages = StageTracker::new();
        advance(&mut stages, Stage::Deploying);

        tracing::info!(
            contract = %self.deployer.contract_name(),
            network = %self.deployer.network(),
            "Deploying contract"
        );

        let record = match self.deployer.deploy().await {
            Ok(record) => record,
            Err(e) => {
                advance(&mut stages, Stage::Failed);
                tracing::error!(error = %e, "Deployment failed; nothing was published");
                return Err(PipelineError::Deploy(e));
            }
        };
        advance(&mut stages, Stage::Deployed);

        let address = record.address_string();
        tracing::info!(
            address = %address,
            tx_hash = %record.tx_hash,
            block_number = record.block_number,
            gas_used = record.gas_used,
            "{} contract deployed to {}",
            self.deployer.contract_name(),
            address
        );

        advance(&mut stages, Stage::Publishing);

        let export = if self.export.is_supported() {
            match self.export.export(&address).await {
                Ok(outcome) => {
                    tracing::info!(
                        name = %self.export.variable_name(),
                        files = outcome.written.len(),
                        "Exported address for later steps"
                    );
                    Some(outcome)
                }
                Err(e) => {
                    advance(&mut stages, Stage::Failed);
                    tracing::error!(address = %address, error = %e, "Local export failed");
                    return Err(PipelineError::Export {
                        address,
                        record: Box::new(record),
                        source: e,
                    });
                }
            }
        } else {
            tracing::debug!("No export target in this environment, skipping local export");
            None
        };

        let publish = match &self.store {
            Some(store) => {
                let target = store.describe();
                tracing::info!(target = %target, "Publishing address");
                match store.set_value(&address).await {
                    Ok(outcome) => {
                        tracing::info!(
                            target = %target,
                            status = outcome.status,
                            attempts = outcome.attempts,
                            "Address published"
                        );
                        Some(outcome)
                    }
                    Err(e) => {
                        advance(&mut stages, Stage::Failed);
                        tracing::error!(
                            address = %address,
                            target = %target,
                            error = %e,
                            "Publish failed; the contract is deployed, set the variable manually"
                        );
                        return Err(PipelineError::Publish {
                            address,
                            target,
                            record: Box::new(record),
                            source: e,
                        });
                    }
                }
            }
            None => {
                tracing::info!("Remote publishing disabled");
                None
            }
        };

        advance(&mut stages, Stage::Done);

        Ok(PipelineReport {
            record,
            export,
            publish,
            stages: stages.history().to_vec(),
        })
    }
}

fn advance(stages: &mut StageTracker, next: Stage) {
    if let Err(e) = stages.advance(next) {
        tracing::error!(error = %e, "Pipeline state machine violated");
    }
}
