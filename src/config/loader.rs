//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::{DeployConfig, LogFormat};
use crate::config::secret::Secret;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_NETWORK: &str = "ARTWORK_NETWORK";
pub const ENV_RPC_URL: &str = "ARTWORK_RPC_URL";
pub const ENV_CHAIN_ID: &str = "ARTWORK_CHAIN_ID";
pub const ENV_CONFIRMATIONS: &str = "ARTWORK_CONFIRMATIONS";
pub const ENV_RPC_TIMEOUT_SECS: &str = "ARTWORK_RPC_TIMEOUT_SECS";
pub const ENV_CONFIRMATION_TIMEOUT_SECS: &str = "ARTWORK_CONFIRMATION_TIMEOUT_SECS";
pub const ENV_POLL_INTERVAL_MS: &str = "ARTWORK_POLL_INTERVAL_MS";
pub const ENV_PRIVATE_KEY: &str = "ARTWORK_PRIVATE_KEY";
pub const ENV_ARTIFACT: &str = "ARTWORK_ARTIFACT";
pub const ENV_ETHERSCAN_API_KEY: &str = "ARTWORK_ETHERSCAN_API_KEY";
pub const ENV_EXPORT_NAME: &str = "ARTWORK_EXPORT_NAME";
pub const ENV_GITHUB_ENV: &str = "GITHUB_ENV";
pub const ENV_GITHUB_OUTPUT: &str = "GITHUB_OUTPUT";
pub const ENV_PUBLISH: &str = "ARTWORK_PUBLISH";
pub const ENV_GITHUB_API_URL: &str = "ARTWORK_GITHUB_API_URL";
pub const ENV_GITHUB_ORG: &str = "ARTWORK_GITHUB_ORG";
pub const ENV_VARIABLE_NAME: &str = "ARTWORK_VARIABLE_NAME";
pub const ENV_GITHUB_TOKEN: &str = "ARTWORK_GITHUB_TOKEN";
pub const ENV_PUBLISH_TIMEOUT_SECS: &str = "ARTWORK_PUBLISH_TIMEOUT_SECS";
pub const ENV_PUBLISH_RETRIES: &str = "ARTWORK_PUBLISH_RETRIES";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    DotEnv(dotenv::Error),
    Env { var: &'static str, reason: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::DotEnv(e) => write!(f, "Failed to load .env file: {}", e),
            ConfigError::Env { var, reason } => write!(f, "Invalid value for {}: {}", var, reason),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Values supplied on the command line. They win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub network: Option<String>,
    pub rpc_url: Option<String>,
    pub artifact: Option<String>,
    pub no_publish: bool,
    /// A dry run never publishes, so publish settings are not required.
    pub dry_run: bool,
    pub log_format: Option<LogFormat>,
}

/// Where configuration comes from.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Optional TOML file providing the base layer.
    pub config_path: Option<PathBuf>,
    /// Explicit `.env` file. When unset, `./.env` is loaded if it exists.
    pub env_file: Option<PathBuf>,
    pub overrides: Overrides,
}

/// Read the base layer from a TOML file. Validation happens once every layer
/// has been applied, so a file may legitimately omit secrets.
pub fn load_config(path: &Path) -> Result<DeployConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    toml::from_str(&content).map_err(ConfigError::Parse)
}

/// A validated configuration and where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: DeployConfig,
    /// `.env` file that seeded the environment, if any.
    pub env_file: Option<PathBuf>,
    pub config_file: Option<PathBuf>,
}

impl LoadedConfig {
    /// Report the configuration sources. Loading happens before logging is
    /// installed, so this is called once the subscriber exists.
    pub fn log_summary(&self) {
        if let Some(path) = &self.env_file {
            tracing::debug!(path = %path.display(), "Loaded .env file");
        }
        if let Some(path) = &self.config_file {
            tracing::debug!(path = %path.display(), "Loaded configuration file");
        }
        tracing::debug!(
            network = %self.config.network.name,
            chain_id = ?self.config.network.chain_id,
            publish_enabled = self.config.publish.enabled,
            "Configuration loaded"
        );
    }
}

/// Build the run configuration: defaults, then TOML file, then environment
/// (seeded from `.env`), then command-line overrides. Validates the result.
pub fn load(options: &LoadOptions) -> Result<LoadedConfig, ConfigError> {
    let env_file = load_dotenv(options.env_file.as_deref())?;

    let mut config = match &options.config_path {
        Some(path) => load_config(path)?,
        None => DeployConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    apply_overrides(&mut config, &options.overrides);

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(LoadedConfig {
        config,
        env_file,
        config_file: options.config_path.clone(),
    })
}

fn load_dotenv(path: Option<&Path>) -> Result<Option<PathBuf>, ConfigError> {
    match path {
        Some(path) => dotenv::from_path(path)
            .map(|()| Some(path.to_path_buf()))
            .map_err(ConfigError::DotEnv),
        None => match dotenv::dotenv() {
            Ok(path) => Ok(Some(path)),
            Err(e) if e.not_found() => Ok(None),
            Err(e) => Err(ConfigError::DotEnv(e)),
        },
    }
}

/// Overlay environment values onto `config`.
///
/// `lookup` abstracts the environment so callers (and tests) can supply any
/// key/value source. Empty values are treated as unset.
pub fn apply_env<F>(config: &mut DeployConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get(ENV_NETWORK) {
        config.network.name = v;
    }
    if let Some(v) = get(ENV_RPC_URL) {
        config.network.rpc_url = v;
    }
    if let Some(v) = get(ENV_CHAIN_ID) {
        config.network.chain_id = Some(parse_env(ENV_CHAIN_ID, &v)?);
    }
    if let Some(v) = get(ENV_CONFIRMATIONS) {
        config.network.confirmations = parse_env(ENV_CONFIRMATIONS, &v)?;
    }
    if let Some(v) = get(ENV_RPC_TIMEOUT_SECS) {
        config.network.rpc_timeout_secs = parse_env(ENV_RPC_TIMEOUT_SECS, &v)?;
    }
    if let Some(v) = get(ENV_CONFIRMATION_TIMEOUT_SECS) {
        config.network.confirmation_timeout_secs = parse_env(ENV_CONFIRMATION_TIMEOUT_SECS, &v)?;
    }
    if let Some(v) = get(ENV_POLL_INTERVAL_MS) {
        config.network.poll_interval_ms = parse_env(ENV_POLL_INTERVAL_MS, &v)?;
    }

    if let Some(v) = get(ENV_PRIVATE_KEY) {
        config.signer.private_key = Secret::from(v);
    }
    if let Some(v) = get(ENV_ARTIFACT) {
        config.contract.artifact_path = v;
    }
    if let Some(v) = get(ENV_ETHERSCAN_API_KEY) {
        config.verification.etherscan_api_key = Some(Secret::from(v));
    }

    if let Some(v) = get(ENV_EXPORT_NAME) {
        config.export.variable_name = v;
    }
    if let Some(v) = get(ENV_GITHUB_ENV) {
        config.export.env_file = Some(v);
    }
    if let Some(v) = get(ENV_GITHUB_OUTPUT) {
        config.export.output_file = Some(v);
    }

    if let Some(v) = get(ENV_PUBLISH) {
        config.publish.enabled = parse_bool(ENV_PUBLISH, &v)?;
    }
    if let Some(v) = get(ENV_GITHUB_API_URL) {
        config.publish.api_url = v;
    }
    if let Some(v) = get(ENV_GITHUB_ORG) {
        config.publish.org = v;
    }
    if let Some(v) = get(ENV_VARIABLE_NAME) {
        config.publish.variable_name = v;
    }
    if let Some(v) = get(ENV_GITHUB_TOKEN) {
        config.publish.token = Secret::from(v);
    }
    if let Some(v) = get(ENV_PUBLISH_TIMEOUT_SECS) {
        config.publish.timeout_secs = parse_env(ENV_PUBLISH_TIMEOUT_SECS, &v)?;
    }
    if let Some(v) = get(ENV_PUBLISH_RETRIES) {
        config.publish.max_retries = parse_env(ENV_PUBLISH_RETRIES, &v)?;
    }

    Ok(())
}

/// Overlay command-line values onto `config`.
pub fn apply_overrides(config: &mut DeployConfig, overrides: &Overrides) {
    if let Some(network) = &overrides.network {
        config.network.name = network.clone();
    }
    if let Some(rpc_url) = &overrides.rpc_url {
        config.network.rpc_url = rpc_url.clone();
    }
    if let Some(artifact) = &overrides.artifact {
        config.contract.artifact_path = artifact.clone();
    }
    if overrides.no_publish || overrides.dry_run {
        config.publish.enabled = false;
    }
    if let Some(format) = overrides.log_format {
        config.observability.log_format = format;
    }
}

fn parse_env<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError::Env {
        var,
        reason: e.to_string(),
    })
}

fn parse_bool(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::Env {
            var,
            reason: format!("expected a boolean, got '{}'", other),
        }),
    }
}
