//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a deployment run.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::config::secret::Secret;

/// Root configuration for a deploy-and-publish run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct DeployConfig {
    /// Target network (RPC endpoint, timeouts, confirmations).
    pub network: NetworkConfig,

    /// Transaction signing credential.
    pub signer: SignerConfig,

    /// Compiled contract to deploy.
    pub contract: ContractConfig,

    /// Contract-verification service credentials.
    pub verification: VerificationConfig,

    /// Local export of the deployed address for later CI steps.
    pub export: ExportConfig,

    /// Remote publish to an organization Actions variable.
    pub publish: PublishConfig,

    /// Logging settings.
    pub observability: ObservabilityConfig,
}

/// Network configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NetworkConfig {
    /// Human-readable network name, used in logs and the deployment record.
    pub name: String,

    /// JSON-RPC endpoint URL.
    pub rpc_url: String,

    /// Expected chain ID. When set, the endpoint is checked before deploying.
    pub chain_id: Option<u64>,

    /// Number of blocks (including the inclusion block) before a deployment counts as confirmed.
    pub confirmations: u32,

    /// Timeout for a single RPC request in seconds.
    pub rpc_timeout_secs: u64,

    /// Upper bound on the whole confirmation wait in seconds.
    pub confirmation_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub poll_interval_ms: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            name: "sepolia".to_string(),
            rpc_url: String::new(),
            chain_id: None,
            confirmations: 1,
            rpc_timeout_secs: 30,
            confirmation_timeout_secs: 300,
            poll_interval_ms: 2000,
        }
    }
}

/// Signing credential.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct SignerConfig {
    /// Hex-encoded secp256k1 private key (with or without 0x prefix).
    pub private_key: Secret,
}

/// Compiled contract artifact location.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ContractConfig {
    /// Path to the compiler artifact JSON holding the creation bytecode.
    pub artifact_path: String,
}

impl Default for ContractConfig {
    fn default() -> Self {
        Self {
            artifact_path: "artifacts/contracts/Artwork.sol/Artwork.json".to_string(),
        }
    }
}

/// Contract-verification (Etherscan) credentials.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct VerificationConfig {
    pub etherscan_api_key: Option<Secret>,
}

/// Local export configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Name under which the address is exported.
    pub variable_name: String,

    /// File receiving `NAME=value` lines for later steps' environment (`$GITHUB_ENV`).
    pub env_file: Option<String>,

    /// File receiving `NAME=value` step outputs (`$GITHUB_OUTPUT`).
    pub output_file: Option<String>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            variable_name: "SC_ADDRESS".to_string(),
            env_file: None,
            output_file: None,
        }
    }
}

/// Remote publish configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Enable the remote publish step.
    pub enabled: bool,

    /// REST API base URL.
    pub api_url: String,

    /// Organization owning the variable.
    pub org: String,

    /// Name of the organization variable to update.
    pub variable_name: String,

    /// Bearer token for the REST API.
    pub token: Secret,

    /// HTTP request timeout in seconds.
    pub timeout_secs: u64,

    /// Retries after the first attempt for transient failures. 0 disables retry.
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub retry_base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub retry_max_delay_ms: u64,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            api_url: "https://api.github.com".to_string(),
            org: String::new(),
            variable_name: String::new(),
            token: Secret::default(),
            timeout_secs: 30,
            max_retries: 0,
            retry_base_delay_ms: 500,
            retry_max_delay_ms: 5000,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default log level (trace, debug, info, warn, error) when RUST_LOG is unset.
    pub log_level: String,

    /// Output format.
    pub log_format: LogFormat,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
        }
    }
}
