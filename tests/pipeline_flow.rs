//! End-to-end pipeline runs with a stubbed chain and a mock variables API.

use artwork_deploy::config::{ExportConfig, PublishConfig, Secret};
use artwork_deploy::pipeline::{exit_code, Pipeline, PipelineError, Stage};
use artwork_deploy::publish::{GithubVariables, LocalExport};

mod common;

use common::{FixedDeployer, SequentialDeployer, FIXED_ADDRESS};

fn store_for(addr: std::net::SocketAddr) -> GithubVariables {
    GithubVariables::new(&PublishConfig {
        api_url: format!("http://{}", addr),
        org: "acme-art".to_string(),
        variable_name: "ARTWORK_CONTRACT".to_string(),
        token: Secret::new("ghp_test_token"),
        timeout_secs: 5,
        ..PublishConfig::default()
    })
    .unwrap()
}

#[tokio::test]
async fn test_logs_and_publishes_fixed_address() {
    let (logs, _guard) = common::capture_logs();
    let (addr, requests) = common::start_recording_backend(|_| async { (204, String::new()) }).await;

    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join("github_env");
    let export = LocalExport::new(&ExportConfig {
        variable_name: "SC_ADDRESS".to_string(),
        env_file: Some(env_file.display().to_string()),
        output_file: None,
    });

    let pipeline = Pipeline::new(FixedDeployer { fail: false }, export, Some(store_for(addr)));
    let report = pipeline.run().await.unwrap();

    let expected = FIXED_ADDRESS.to_checksum(None);
    assert_eq!(report.address(), expected);
    assert_eq!(report.stages.last(), Some(&Stage::Done));

    assert!(logs
        .contents()
        .contains(&format!("Artwork contract deployed to {}", expected)));

    assert_eq!(
        std::fs::read_to_string(&env_file).unwrap(),
        format!("SC_ADDRESS={}\n", expected)
    );

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].path, "/orgs/acme-art/actions/variables/ARTWORK_CONTRACT");
    assert_eq!(requests[0].json()["value"], expected.as_str());
}

#[tokio::test]
async fn test_failed_deploy_sends_nothing() {
    let (addr, requests) = common::start_recording_backend(|_| async { (204, String::new()) }).await;
    let dir = tempfile::tempdir().unwrap();
    let env_file = dir.path().join("github_env");
    let export = LocalExport::new(&ExportConfig {
        env_file: Some(env_file.display().to_string()),
        ..ExportConfig::default()
    });

    let pipeline = Pipeline::new(FixedDeployer { fail: true }, export, Some(store_for(addr)));
    let err = pipeline.run().await.unwrap_err();

    assert!(matches!(err, PipelineError::Deploy(_)));
    assert_eq!(err.exit_code(), exit_code::DEPLOY);
    assert!(requests.lock().unwrap().is_empty());
    assert!(!env_file.exists());
}

#[tokio::test]
async fn test_publish_failure_leaves_address_in_logs() {
    let (logs, _guard) = common::capture_logs();
    let (addr, _requests) = common::start_recording_backend(|_| async {
        (404, r#"{"message":"Not Found"}"#.to_string())
    })
    .await;

    let pipeline = Pipeline::new(
        FixedDeployer { fail: false },
        LocalExport::new(&ExportConfig::default()),
        Some(store_for(addr)),
    );
    let err = pipeline.run().await.unwrap_err();

    let expected = FIXED_ADDRESS.to_checksum(None);
    assert_ne!(err.exit_code(), exit_code::SUCCESS);
    assert_eq!(err.exit_code(), exit_code::PUBLISH);
    assert_eq!(err.deployed_address(), Some(expected.as_str()));

    let output = logs.contents();
    let deployed_at = output.find("contract deployed to").unwrap();
    let failed_at = output.find("Publish failed").unwrap();
    assert!(deployed_at < failed_at, "address must be logged before the publish attempt");
    assert!(output.contains(&expected));
}

#[tokio::test]
async fn test_each_run_deploys_a_new_contract() {
    let (addr, requests) = common::start_recording_backend(|_| async { (204, String::new()) }).await;
    let pipeline = Pipeline::new(
        SequentialDeployer::new(),
        LocalExport::new(&ExportConfig::default()),
        Some(store_for(addr)),
    );

    let first = pipeline.run().await.unwrap().address();
    let second = pipeline.run().await.unwrap().address();
    assert_ne!(first, second);

    let published: Vec<String> = requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.json()["value"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(published, vec![first, second]);
}
