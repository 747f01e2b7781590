//! Blockchain RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to the JSON-RPC endpoint with the deployer wallet attached
//! - Query chain state (chain id, block number, balances, receipts)
//! - Submit signed transactions
//! - Bound every call with the configured RPC timeout

use std::future::IntoFuture;
use std::time::Duration;

use alloy::eips::eip1559::Eip1559Estimation;
use alloy::primitives::{Address, TxHash, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::timeout;

use crate::blockchain::types::{ChainId, DeployError, DeployResult};
use crate::blockchain::wallet::Wallet;
use crate::config::NetworkConfig;

/// Blockchain RPC client wrapper.
#[derive(Clone)]
pub struct BlockchainClient {
    /// Provider with nonce, gas, chain-id and wallet fillers.
    provider: DynProvider,
    /// RPC endpoint, kept for diagnostics.
    rpc_url: String,
    /// Request timeout duration.
    timeout_duration: Duration,
}

impl BlockchainClient {
    /// Create a new blockchain client.
    ///
    /// No request is sent here; an unreachable endpoint surfaces on first use.
    pub fn new(network: &NetworkConfig, wallet: &Wallet) -> DeployResult<Self> {
        let url: url::Url = network.rpc_url.parse().map_err(|e| {
            DeployError::Rpc(format!("Invalid RPC URL '{}': {}", network.rpc_url, e))
        })?;

        let provider = ProviderBuilder::new()
            .wallet(wallet.ethereum_wallet())
            .connect_http(url)
            .erased();

        tracing::debug!(
            network = %network.name,
            timeout_secs = network.rpc_timeout_secs,
            "Blockchain client initialized"
        );

        Ok(Self {
            provider,
            rpc_url: network.rpc_url.clone(),
            timeout_duration: Duration::from_secs(network.rpc_timeout_secs),
        })
    }

    async fn call<F, T, E>(&self, op: &'static str, fut: F) -> DeployResult<T>
    where
        F: IntoFuture<Output = Result<T, E>>,
        E: std::fmt::Display,
    {
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(op, error = %e, "RPC error");
                Err(DeployError::Rpc(format!("{} failed: {}", op, e)))
            }
            Err(_) => {
                tracing::warn!(op, "RPC timeout");
                Err(DeployError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }

    /// Verify the connected chain ID matches `expected`.
    pub async fn verify_chain_id(&self, expected: u64) -> DeployResult<()> {
        let chain_id = self.get_chain_id().await?;
        if chain_id.0 != expected {
            return Err(DeployError::ChainMismatch {
                expected,
                actual: chain_id.0,
            });
        }
        Ok(())
    }

    /// Get the chain ID from the RPC.
    pub async fn get_chain_id(&self) -> DeployResult<ChainId> {
        self.call("eth_chainId", self.provider.get_chain_id())
            .await
            .map(ChainId)
    }

    /// Get the latest block number.
    pub async fn get_block_number(&self) -> DeployResult<u64> {
        self.call("eth_blockNumber", self.provider.get_block_number())
            .await
    }

    /// Get the balance of an address.
    pub async fn get_balance(&self, address: Address) -> DeployResult<U256> {
        self.call("eth_getBalance", self.provider.get_balance(address))
            .await
    }

    /// Get the transaction count (nonce) for an address.
    pub async fn get_transaction_count(&self, address: Address) -> DeployResult<u64> {
        self.call(
            "eth_getTransactionCount",
            self.provider.get_transaction_count(address),
        )
        .await
    }

    /// Estimate EIP-1559 fees from recent fee history.
    pub async fn estimate_fees(&self) -> DeployResult<Eip1559Estimation> {
        self.call("eth_feeHistory", self.provider.estimate_eip1559_fees())
            .await
    }

    /// Estimate gas for a transaction.
    pub async fn estimate_gas(&self, tx: &TransactionRequest) -> DeployResult<u64> {
        self.call("eth_estimateGas", self.provider.estimate_gas(tx.clone()))
            .await
    }

    /// Get a transaction receipt by hash.
    pub async fn get_transaction_receipt(
        &self,
        tx_hash: TxHash,
    ) -> DeployResult<Option<TransactionReceipt>> {
        self.call(
            "eth_getTransactionReceipt",
            self.provider.get_transaction_receipt(tx_hash),
        )
        .await
    }

    /// Sign and broadcast a transaction; returns its hash once the node accepted it.
    pub async fn send_transaction(&self, tx: TransactionRequest) -> DeployResult<TxHash> {
        let pending = self
            .call("eth_sendRawTransaction", self.provider.send_transaction(tx))
            .await?;
        Ok(*pending.tx_hash())
    }
}

impl std::fmt::Debug for BlockchainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockchainClient")
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
