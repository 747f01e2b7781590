//! Compiled contract artifacts.
//!
//! The compiler toolchain is external; this only reads its JSON output
//! (`contractName`, `abi`, `bytecode`) and extracts the creation bytecode.

use std::path::Path;

use alloy::primitives::Bytes;
use serde::Deserialize;

use crate::blockchain::types::{DeployError, DeployResult};

/// Compiler output for one contract. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractArtifact {
    pub contract_name: String,
    #[serde(default)]
    pub abi: serde_json::Value,
    pub bytecode: String,
}

impl ContractArtifact {
    /// Read and parse an artifact file.
    pub fn load(path: impl AsRef<Path>) -> DeployResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            DeployError::Artifact(format!("failed to read {}: {}", path.display(), e))
        })?;
        let artifact = Self::from_json(&raw).map_err(|e| match e {
            DeployError::Artifact(msg) => {
                DeployError::Artifact(format!("{}: {}", path.display(), msg))
            }
            other => other,
        })?;

        tracing::debug!(
            path = %path.display(),
            contract = %artifact.contract_name,
            "Loaded contract artifact"
        );
        Ok(artifact)
    }

    /// Parse artifact JSON.
    pub fn from_json(raw: &str) -> DeployResult<Self> {
        serde_json::from_str(raw)
            .map_err(|e| DeployError::Artifact(format!("invalid artifact JSON: {}", e)))
    }

    /// Creation bytecode, decoded from hex.
    ///
    /// Abstract contracts and interfaces compile to `0x`; they cannot be deployed.
    pub fn creation_code(&self) -> DeployResult<Bytes> {
        let code: Bytes = self.bytecode.trim().parse().map_err(|e| {
            DeployError::Artifact(format!(
                "{} bytecode is not valid hex: {}",
                self.contract_name, e
            ))
        })?;
        if code.is_empty() {
            return Err(DeployError::Artifact(format!(
                "{} has empty bytecode (abstract contract or interface?)",
                self.contract_name
            )));
        }
        Ok(code)
    }
}
