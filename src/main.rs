//! Artwork contract deployer
//!
//! Deploys the compiled Artwork contract to an EVM network and publishes the
//! resulting address for CI.
//!
//! # Architecture Overview
//!
//! ```text
//!   env / .env / TOML / flags
//!            │
//!            ▼
//!   ┌─────────────────┐    ┌──────────────────┐    ┌────────────────────────┐
//!   │     config      │───▶│    blockchain    │───▶│        publish         │
//!   │ load + validate │    │ deploy + confirm │    │ $GITHUB_ENV, org var   │
//!   └─────────────────┘    └──────────────────┘    └────────────────────────┘
//!                                   │                          │
//!                                   └──── pipeline (Start → … → Done | Failed)
//! ```
//!
//! Exit status: 0 on success, 2 configuration, 3 deployment, 4 local export,
//! 5 remote publish.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use artwork_deploy::blockchain::ChainDeployer;
use artwork_deploy::config::loader::{self, LoadOptions, Overrides};
use artwork_deploy::config::schema::LogFormat;
use artwork_deploy::config::DeployConfig;
use artwork_deploy::observability::init_logging;
use artwork_deploy::pipeline::{exit_code, Pipeline, PipelineError};
use artwork_deploy::publish::{GithubVariables, LocalExport};

#[derive(Parser)]
#[command(name = "artwork-deploy", version)]
#[command(about = "Deploy the Artwork contract and publish its address", long_about = None)]
struct Cli {
    /// TOML configuration file (base layer, environment overrides it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// .env file to load (defaults to ./.env when present)
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Network name recorded in logs
    #[arg(long)]
    network: Option<String>,

    /// JSON-RPC endpoint
    #[arg(long)]
    rpc_url: Option<String>,

    /// Compiled contract artifact JSON
    #[arg(long)]
    artifact: Option<String>,

    /// Skip the remote organization-variable publish
    #[arg(long)]
    no_publish: bool,

    /// Run pre-flight checks only, do not broadcast
    #[arg(long)]
    dry_run: bool,

    #[arg(long, value_enum)]
    log_format: Option<CliLogFormat>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum CliLogFormat {
    Pretty,
    Json,
}

impl From<CliLogFormat> for LogFormat {
    fn from(format: CliLogFormat) -> Self {
        match format {
            CliLogFormat::Pretty => LogFormat::Pretty,
            CliLogFormat::Json => LogFormat::Json,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let options = LoadOptions {
        config_path: cli.config.clone(),
        env_file: cli.env_file.clone(),
        overrides: Overrides {
            network: cli.network.clone(),
            rpc_url: cli.rpc_url.clone(),
            artifact: cli.artifact.clone(),
            no_publish: cli.no_publish,
            dry_run: cli.dry_run,
            log_format: cli.log_format.map(LogFormat::from),
        },
    };

    let loaded = match loader::load(&options) {
        Ok(loaded) => loaded,
        Err(e) => return fail(PipelineError::from(e)),
    };
    let config = &loaded.config;

    init_logging(&config.observability, cli.verbose);
    loaded.log_summary();

    tracing::info!(
        network = %config.network.name,
        artifact = %config.contract.artifact_path,
        publish_enabled = config.publish.enabled,
        verification_key = config.verification.etherscan_api_key.is_some(),
        dry_run = cli.dry_run,
        "artwork-deploy v{} starting",
        env!("CARGO_PKG_VERSION")
    );

    match run(config, cli.dry_run).await {
        Ok(()) => ExitCode::from(exit_code::SUCCESS),
        Err(e) => fail(e),
    }
}

fn fail(e: PipelineError) -> ExitCode {
    eprintln!("error: {}", e);
    if let Some(address) = e.deployed_address() {
        eprintln!("deployed contract address: {}", address);
    }
    ExitCode::from(e.exit_code())
}

async fn run(config: &DeployConfig, dry_run: bool) -> Result<(), PipelineError> {
    let deployer = ChainDeployer::from_config(config)?;

    if dry_run {
        let plan = deployer.plan().await?;
        tracing::info!(
            predicted_address = %plan.predicted_address,
            "Dry run complete, nothing broadcast"
        );
        return Ok(());
    }

    // Publisher is built before deploying
    let store = if config.publish.enabled {
        Some(GithubVariables::new(&config.publish).map_err(PipelineError::PublishSetup)?)
    } else {
        None
    };
    let export = LocalExport::new(&config.export);

    let report = Pipeline::new(deployer, export, store).run().await?;

    tracing::info!(
        address = %report.address(),
        chain_id = report.record.chain_id,
        published = report.publish.is_some(),
        exported = report.export.is_some(),
        "Done"
    );
    Ok(())
}
