//! Remote publish against a mock variables API.

use artwork_deploy::config::{PublishConfig, Secret};
use artwork_deploy::publish::{GithubVariables, PublishError, VariableStore};

mod common;

const ADDRESS: &str = "0xABC0000000000000000000000000000000000123";

fn publish_config(addr: std::net::SocketAddr) -> PublishConfig {
    PublishConfig {
        api_url: format!("http://{}", addr),
        org: "acme-art".to_string(),
        variable_name: "ARTWORK_CONTRACT".to_string(),
        token: Secret::new("ghp_test_token"),
        timeout_secs: 5,
        retry_base_delay_ms: 1,
        retry_max_delay_ms: 5,
        ..PublishConfig::default()
    }
}

#[tokio::test]
async fn test_patch_targets_org_variable() {
    let (addr, requests) = common::start_recording_backend(|_| async { (204, String::new()) }).await;
    let store = GithubVariables::new(&publish_config(addr)).unwrap();

    let outcome = store.set_value(ADDRESS).await.unwrap();
    assert_eq!(outcome.status, 204);
    assert_eq!(outcome.attempts, 1);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.method, "PATCH");
    assert_eq!(request.path, "/orgs/acme-art/actions/variables/ARTWORK_CONTRACT");
    assert_eq!(request.header("authorization"), Some("Bearer ghp_test_token"));
    assert_eq!(request.header("accept"), Some("application/vnd.github+json"));
    assert_eq!(request.header("x-github-api-version"), Some("2022-11-28"));
    assert!(request.header("user-agent").is_some());

    let body = request.json();
    assert_eq!(body["value"], ADDRESS);
    assert_eq!(body["name"], "ARTWORK_CONTRACT");
}

#[tokio::test]
async fn test_non_2xx_is_error_with_body() {
    let (addr, requests) = common::start_recording_backend(|_| async {
        (401, r#"{"message":"Bad credentials"}"#.to_string())
    })
    .await;
    let mut config = publish_config(addr);
    config.max_retries = 3;
    let store = GithubVariables::new(&config).unwrap();

    let err = store.set_value(ADDRESS).await.unwrap_err();
    assert_eq!(err.status(), Some(401));
    assert!(err.to_string().contains("Bad credentials"));
    // Auth failures are permanent: no retry even with a budget
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_zero_retry_baseline() {
    let (addr, requests) = common::start_recording_backend(|_| async { (503, "busy".to_string()) }).await;
    let store = GithubVariables::new(&publish_config(addr)).unwrap();

    let err = store.set_value(ADDRESS).await.unwrap_err();
    assert!(matches!(err, PublishError::Status { status: 503, .. }));
    assert_eq!(requests.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_bounded_retry_recovers_from_transient_failure() {
    let (addr, requests) = common::start_recording_backend(|index| async move {
        if index == 0 {
            (502, "bad gateway".to_string())
        } else {
            (204, String::new())
        }
    })
    .await;
    let mut config = publish_config(addr);
    config.max_retries = 2;
    let store = GithubVariables::new(&config).unwrap();

    let outcome = store.set_value(ADDRESS).await.unwrap();
    assert_eq!(outcome.attempts, 2);

    let requests = requests.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.json()["value"] == ADDRESS));
}

#[tokio::test]
async fn test_unreachable_api_is_transport_error() {
    // Bind then drop to get a port nobody listens on
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let store = GithubVariables::new(&publish_config(addr)).unwrap();
    let err = store.set_value(ADDRESS).await.unwrap_err();
    assert!(matches!(err, PublishError::Transport(_)));
}

#[tokio::test]
async fn test_unlisted_error_status_is_not_success() {
    let (addr, _requests) = common::start_recording_backend(|_| async {
        (422, r#"{"message":"Validation Failed"}"#.to_string())
    })
    .await;
    let store = GithubVariables::new(&publish_config(addr)).unwrap();

    let err = store.set_value(ADDRESS).await.unwrap_err();
    assert_eq!(err.status(), Some(422));
    assert!(err.to_string().contains("Validation Failed"));
}

#[tokio::test]
async fn test_unreadable_body_is_logged() {
    let (logs, _guard) = common::capture_logs();
    let addr = common::start_truncating_backend(200).await;
    let store = GithubVariables::new(&publish_config(addr)).unwrap();

    let outcome = store.set_value(ADDRESS).await.unwrap();
    assert_eq!(outcome.status, 200);
    assert!(outcome.body.is_empty());
    assert!(logs.contents().contains("Failed to read response body"));
}
