//! Deployer wallet.
//!
//! # Security
//! - The private key comes from configuration, which reads it from the environment
//! - Keys are never logged or serialized

use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;

use crate::blockchain::types::{DeployError, DeployResult};
use crate::config::Secret;

/// Signing account for contract-creation transactions.
#[derive(Debug, Clone)]
pub struct Wallet {
    /// The underlying signer (private key).
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a hex-encoded private key string.
    ///
    /// # Arguments
    /// * `private_key_hex` - Hex string (with or without 0x prefix)
    pub fn from_private_key(private_key_hex: &str) -> DeployResult<Self> {
        // Strip 0x prefix if present
        let key_hex = private_key_hex.trim();
        let key_hex = key_hex.strip_prefix("0x").unwrap_or(key_hex);

        let signer: PrivateKeySigner = key_hex
            .parse()
            .map_err(|e| DeployError::Wallet(format!("Invalid private key format: {}", e)))?;

        tracing::info!(address = %signer.address(), "Deployer wallet loaded");

        Ok(Self { signer })
    }

    /// Load the wallet from the configured signing credential.
    pub fn from_secret(secret: &Secret) -> DeployResult<Self> {
        if secret.is_empty() {
            return Err(DeployError::Wallet("Signing key not configured".to_string()));
        }
        Self::from_private_key(secret.expose())
    }

    /// Get the wallet's address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wallet usable by alloy's provider filler stack.
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}
