//! Chain-specific types and error definitions.

use std::time::SystemTime;

use alloy::primitives::{Address, TxHash};
use thiserror::Error;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur while deploying a contract.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Contract artifact could not be read or parsed.
    #[error("Artifact error: {0}")]
    Artifact(String),

    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within expected time.
    #[error("Transaction {tx_hash} not confirmed within {secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, secs: u64 },

    /// Transaction was reverted on-chain.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Deployer cannot pay for the deployment.
    #[error("Insufficient funds: balance {balance} wei, deployment needs {required} wei")]
    InsufficientFunds { balance: String, required: String },

    /// Receipt did not carry a contract address.
    #[error("Receipt for {0} has no contract address")]
    MissingContractAddress(TxHash),

    /// Invalid private key format or derivation error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Result type for deployment operations.
pub type DeployResult<T> = Result<T, DeployError>;

/// Transaction confirmation status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// Transaction is pending in mempool.
    Pending,
    /// Transaction has been mined but not enough confirmations.
    Confirming { current: u32, required: u32 },
    /// Transaction is confirmed with required block depth.
    Confirmed { block_number: u64 },
    /// Transaction failed or was dropped.
    Failed(String),
}

/// Outcome of one successful deployment.
///
/// Created once, never mutated. Not persisted beyond the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentRecord {
    pub contract_address: Address,
    pub network: String,
    pub chain_id: u64,
    pub tx_hash: TxHash,
    pub block_number: u64,
    pub gas_used: u64,
    pub deployed_at: SystemTime,
}

impl DeploymentRecord {
    /// EIP-55 checksummed address, the form exported and published.
    pub fn address_string(&self) -> String {
        self.contract_address.to_checksum(None)
    }
}

/// Pre-flight view of a deployment, produced without broadcasting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentPlan {
    pub deployer: Address,
    pub chain_id: u64,
    pub nonce: u64,
    pub gas_limit: u64,
    /// Fee cap the transaction is sent with; the funds check uses it.
    pub max_fee_per_gas: u128,
    pub max_priority_fee_per_gas: u128,
    /// Address the contract will get if the transaction is mined at `nonce`.
    pub predicted_address: Address,
}
