//! Contract deployment driver.
//!
//! Every successful [`Deployer::deploy`] call creates a new contract instance
//! on chain. Calling it twice yields two distinct addresses.

use std::future::Future;
use std::time::{Duration, SystemTime};

use alloy::network::TransactionBuilder;
use alloy::primitives::{Bytes, U256};

use crate::blockchain::artifact::ContractArtifact;
use crate::blockchain::client::BlockchainClient;
use crate::blockchain::transaction::{deploy_request, ConfirmationMonitor};
use crate::blockchain::types::{DeployError, DeployResult, DeploymentPlan, DeploymentRecord};
use crate::blockchain::wallet::Wallet;
use crate::config::{DeployConfig, NetworkConfig};

/// Something that can put the contract on chain.
pub trait Deployer: Send + Sync {
    /// Contract being deployed, for logs.
    fn contract_name(&self) -> &str;

    /// Network name recorded in deployment records and logs.
    fn network(&self) -> &str;

    /// Submit a contract-creation transaction and wait for confirmation.
    fn deploy(&self) -> impl Future<Output = DeployResult<DeploymentRecord>> + Send;
}

/// Deploys the configured artifact through a JSON-RPC endpoint.
#[derive(Debug)]
pub struct ChainDeployer {
    client: BlockchainClient,
    wallet: Wallet,
    contract_name: String,
    creation_code: Bytes,
    network: NetworkConfig,
}

impl ChainDeployer {
    /// Load the wallet and artifact and build the RPC client.
    ///
    /// Fails on a bad key or artifact before any network traffic.
    pub fn from_config(config: &DeployConfig) -> DeployResult<Self> {
        let wallet = Wallet::from_secret(&config.signer.private_key)?;
        let artifact = ContractArtifact::load(&config.contract.artifact_path)?;
        let creation_code = artifact.creation_code()?;
        let client = BlockchainClient::new(&config.network, &wallet)?;

        Ok(Self {
            client,
            wallet,
            contract_name: artifact.contract_name,
            creation_code,
            network: config.network.clone(),
        })
    }

    /// Pre-flight checks without broadcasting: chain id, gas, balance.
    pub async fn plan(&self) -> DeployResult<DeploymentPlan> {
        let chain_id = self.client.get_chain_id().await?.0;
        if let Some(expected) = self.network.chain_id {
            if chain_id != expected {
                return Err(DeployError::ChainMismatch {
                    expected,
                    actual: chain_id,
                });
            }
        }

        let deployer = self.wallet.address();
        let nonce = self.client.get_transaction_count(deployer).await?;
        let request = deploy_request(deployer, self.creation_code.clone());
        let gas_limit = self.client.estimate_gas(&request).await?;
        let fees = self.client.estimate_fees().await?;

        let balance = self.client.get_balance(deployer).await?;
        let required = U256::from(gas_limit) * U256::from(fees.max_fee_per_gas);
        if balance < required {
            return Err(DeployError::InsufficientFunds {
                balance: balance.to_string(),
                required: required.to_string(),
            });
        }

        let plan = DeploymentPlan {
            deployer,
            chain_id,
            nonce,
            gas_limit,
            max_fee_per_gas: fees.max_fee_per_gas,
            max_priority_fee_per_gas: fees.max_priority_fee_per_gas,
            predicted_address: deployer.create(nonce),
        };

        tracing::info!(
            contract = %self.contract_name,
            network = %self.network.name,
            chain_id = plan.chain_id,
            deployer = %plan.deployer,
            nonce = plan.nonce,
            gas_limit = plan.gas_limit,
            max_fee_per_gas = plan.max_fee_per_gas,
            predicted_address = %plan.predicted_address,
            "Deployment pre-flight passed"
        );

        Ok(plan)
    }

    async fn deploy_contract(&self) -> DeployResult<DeploymentRecord> {
        let plan = self.plan().await?;

        let request = deploy_request(plan.deployer, self.creation_code.clone())
            .with_gas_limit(plan.gas_limit)
            .with_max_fee_per_gas(plan.max_fee_per_gas)
            .with_max_priority_fee_per_gas(plan.max_priority_fee_per_gas);

        let tx_hash = self.client.send_transaction(request).await?;
        tracing::info!(
            contract = %self.contract_name,
            tx_hash = %tx_hash,
            "Contract-creation transaction submitted"
        );

        let monitor = ConfirmationMonitor::new(
            &self.client,
            self.network.confirmations,
            Duration::from_millis(self.network.poll_interval_ms),
            Duration::from_secs(self.network.confirmation_timeout_secs),
        );
        let receipt = monitor.wait_for_confirmation(tx_hash).await?;

        let contract_address = receipt
            .contract_address
            .ok_or(DeployError::MissingContractAddress(tx_hash))?;
        if contract_address != plan.predicted_address {
            // Another transaction from the same key took the planned nonce
            tracing::warn!(
                predicted = %plan.predicted_address,
                actual = %contract_address,
                "Deployed address differs from pre-flight prediction"
            );
        }

        Ok(DeploymentRecord {
            contract_address,
            network: self.network.name.clone(),
            chain_id: plan.chain_id,
            tx_hash,
            block_number: receipt.block_number.unwrap_or_default(),
            gas_used: receipt.gas_used,
            deployed_at: SystemTime::now(),
        })
    }
}

impl Deployer for ChainDeployer {
    fn contract_name(&self) -> &str {
        &self.contract_name
    }

    fn network(&self) -> &str {
        &self.network.name
    }

    async fn deploy(&self) -> DeployResult<DeploymentRecord> {
        self.deploy_contract().await
    }
}
