//! Contract deployment subsystem.
//!
//! # Data Flow
//! ```text
//! DeployConfig (private key, RPC URL, artifact path)
//!     → wallet.rs (key loading)
//!     → artifact.rs (creation bytecode)
//!     → client.rs (RPC connection with timeouts)
//!     → deployer.rs (pre-flight, submit)
//!     → transaction.rs (confirmation monitoring)
//!     → DeploymentRecord
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from configuration (environment or .env)
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts

pub mod artifact;
pub mod client;
pub mod deployer;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::BlockchainClient;
pub use deployer::{ChainDeployer, Deployer};
pub use types::{ChainId, DeployError, DeployResult, DeploymentPlan, DeploymentRecord};
pub use wallet::Wallet;
