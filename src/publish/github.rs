//! Organization Actions variables over the GitHub REST API.
//!
//! `PATCH {api_url}/orgs/{org}/actions/variables/{name}` with body
//! `{"name": ..., "value": ...}`. Any 2xx counts as success (GitHub answers 204).

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::Serialize;
use url::Url;

use crate::config::{PublishConfig, Secret};
use crate::publish::types::{PublishError, PublishOutcome, PublishResult};
use crate::resilience::{retry_with_backoff, RetryPolicy};

const GITHUB_ACCEPT: &str = "application/vnd.github+json";
const GITHUB_API_VERSION: &str = "2022-11-28";

/// A remote store for named configuration values.
pub trait VariableStore: Send + Sync {
    /// Human-readable target, for logs.
    fn describe(&self) -> String;

    /// Set the configured variable to `value`.
    fn set_value(&self, value: &str) -> impl Future<Output = PublishResult<PublishOutcome>> + Send;
}

#[derive(Debug, Serialize)]
struct UpdateVariable<'a> {
    name: &'a str,
    value: &'a str,
}

/// Client for one organization variable.
#[derive(Debug, Clone)]
pub struct GithubVariables {
    client: reqwest::Client,
    api_url: Url,
    org: String,
    variable_name: String,
    token: Secret,
    retry: RetryPolicy,
}

impl GithubVariables {
    pub fn new(config: &PublishConfig) -> PublishResult<Self> {
        let api_url = Url::parse(&config.api_url).map_err(|e| {
            PublishError::Config(format!("Invalid API URL '{}': {}", config.api_url, e))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_ACCEPT));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_url,
            org: config.org.clone(),
            variable_name: config.variable_name.clone(),
            token: config.token.clone(),
            retry: RetryPolicy::from_publish(config),
        })
    }

    /// Endpoint for the configured variable. Org and name are substituted as
    /// single path segments, so reserved characters are percent-encoded.
    pub fn variable_url(&self) -> PublishResult<Url> {
        let mut url = self.api_url.clone();
        url.path_segments_mut()
            .map_err(|_| PublishError::Config(format!("API URL '{}' cannot be a base", self.api_url)))?
            .pop_if_empty()
            .extend([
                "orgs",
                self.org.as_str(),
                "actions",
                "variables",
                self.variable_name.as_str(),
            ]);
        Ok(url)
    }

    async fn patch_once(&self, url: &Url, value: &str, attempt: u32) -> PublishResult<PublishOutcome> {
        let response = self
            .client
            .patch(url.clone())
            .bearer_auth(self.token.expose())
            .json(&UpdateVariable {
                name: &self.variable_name,
                value,
            })
            .send()
            .await?;

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!(status = status.as_u16(), error = %e, "Failed to read response body");
                String::new()
            }
        };

        tracing::info!(
            org = %self.org,
            variable = %self.variable_name,
            status = status.as_u16(),
            body = %body,
            attempt = attempt,
            "Variable store responded"
        );

        if !status.is_success() {
            return Err(PublishError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(PublishOutcome {
            status: status.as_u16(),
            body,
            attempts: attempt,
        })
    }
}

impl VariableStore for GithubVariables {
    fn describe(&self) -> String {
        format!("orgs/{}/actions/variables/{}", self.org, self.variable_name)
    }

    async fn set_value(&self, value: &str) -> PublishResult<PublishOutcome> {
        let url = self.variable_url()?;
        retry_with_backoff(&self.retry, "publish_variable", |attempt| {
            self.patch_once(&url, value, attempt)
        })
        .await
    }
}
