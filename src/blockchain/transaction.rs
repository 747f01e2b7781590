//! Contract-creation transactions and confirmation monitoring.
//!
//! # Responsibilities
//! - Build the contract-creation request
//! - Poll for the receipt until the required depth is reached
//! - Bound the whole wait with the confirmation timeout

use std::time::Duration;

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use tokio::time::{interval, timeout, MissedTickBehavior};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{ConfirmationStatus, DeployError, DeployResult};

/// Build a contract-creation request (no `to`, creation code as input).
pub fn deploy_request(from: Address, creation_code: Bytes) -> TransactionRequest {
    TransactionRequest::default()
        .with_from(from)
        .with_deploy_code(creation_code)
}

/// Classify a transaction given its receipt (if any) and the chain head.
///
/// `mined` is `(succeeded, block_number)`. The inclusion block counts as the
/// first confirmation.
pub fn confirmation_status(
    mined: Option<(bool, u64)>,
    current_block: u64,
    required: u32,
) -> ConfirmationStatus {
    match mined {
        None => ConfirmationStatus::Pending,
        Some((false, _)) => ConfirmationStatus::Failed("Transaction reverted".to_string()),
        Some((true, block_number)) => {
            let current = current_block.saturating_sub(block_number).saturating_add(1);
            let current = u32::try_from(current).unwrap_or(u32::MAX);
            if current >= required {
                ConfirmationStatus::Confirmed { block_number }
            } else {
                ConfirmationStatus::Confirming { current, required }
            }
        }
    }
}

/// Waits for a submitted transaction to reach the required depth.
pub struct ConfirmationMonitor<'a> {
    client: &'a BlockchainClient,
    required_confirmations: u32,
    poll_interval: Duration,
    timeout_duration: Duration,
}

impl<'a> ConfirmationMonitor<'a> {
    pub fn new(
        client: &'a BlockchainClient,
        required_confirmations: u32,
        poll_interval: Duration,
        timeout_duration: Duration,
    ) -> Self {
        Self {
            client,
            required_confirmations,
            poll_interval,
            timeout_duration,
        }
    }

    /// Wait for a transaction to be confirmed and return its receipt.
    ///
    /// A reverted transaction or an expired wait is an error.
    pub async fn wait_for_confirmation(&self, tx_hash: TxHash) -> DeployResult<TransactionReceipt> {
        let result = timeout(self.timeout_duration, async {
            let mut ticker = interval(self.poll_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let receipt = self.client.get_transaction_receipt(tx_hash).await?;
                let current_block = match &receipt {
                    Some(_) => self.client.get_block_number().await?,
                    None => 0,
                };
                let mined = receipt.as_ref().map(|r| {
                    (r.status(), r.block_number.unwrap_or(current_block))
                });

                match confirmation_status(mined, current_block, self.required_confirmations) {
                    ConfirmationStatus::Pending => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                    }
                    ConfirmationStatus::Confirming { current, required } => {
                        tracing::debug!(
                            tx_hash = %tx_hash,
                            confirmations = current,
                            required = required,
                            "Waiting for confirmations"
                        );
                    }
                    ConfirmationStatus::Failed(reason) => {
                        return Err(DeployError::Reverted(format!("{} ({})", reason, tx_hash)));
                    }
                    ConfirmationStatus::Confirmed { block_number } => {
                        tracing::info!(
                            tx_hash = %tx_hash,
                            block_number = block_number,
                            "Transaction confirmed"
                        );
                        if let Some(receipt) = receipt {
                            return Ok(receipt);
                        }
                    }
                }
            }
        })
        .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(DeployError::ConfirmationTimeout {
                tx_hash,
                secs: self.timeout_duration.as_secs(),
            }),
        }
    }
}
