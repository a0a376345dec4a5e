//! GitHub issues client
//!
//! Credentials come from `GITHUB_TOKEN` and `GITHUB_REPO` (`owner/repo`).
//! Only the two operations the pipeline needs are exposed: creating an
//! issue for a requirement and commenting on it as stages complete.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{CollabError, CollabResult};
use crate::SourceHost;

const API_BASE: &str = "https://api.github.com";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// GitHub client scoped to a single repository
pub struct GithubClient {
    client: Client,
    repo: String,
    token: String,
}

#[derive(Debug, Deserialize)]
struct CreatedIssue {
    number: u64,
}

impl GithubClient {
    /// Create a client for a repository with an explicit token.
    pub fn new(repo: &str, token: &str) -> Self {
        let client = Client::builder()
            .user_agent("pipeline-tracker/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            repo: repo.to_string(),
            token: token.to_string(),
        }
    }

    /// Create a client from the environment, or `None` when `GITHUB_TOKEN`
    /// or `GITHUB_REPO` is missing.
    pub fn from_env() -> Option<Self> {
        let token = std::env::var("GITHUB_TOKEN").ok()?;
        let repo = std::env::var("GITHUB_REPO").ok()?;
        Some(Self::new(&repo, &token))
    }

    async fn post(&self, path: &str, payload: &serde_json::Value) -> CollabResult<reqwest::Response> {
        let response = self
            .client
            .post(format!("{API_BASE}{path}"))
            .bearer_auth(&self.token)
            .header(reqwest::header::ACCEPT, "application/vnd.github+json")
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CollabError::from_response(response).await);
        }
        Ok(response)
    }
}

#[async_trait]
impl SourceHost for GithubClient {
    async fn create_issue(&self, title: &str, body: &str) -> CollabResult<u64> {
        let response = self
            .post(
                &format!("/repos/{}/issues", self.repo),
                &json!({ "title": title, "body": body }),
            )
            .await?;
        let issue: CreatedIssue = response
            .json()
            .await
            .map_err(|e| CollabError::UnexpectedResponse(format!("issue number missing: {e}")))?;
        Ok(issue.number)
    }

    async fn add_comment(&self, issue_number: u64, body: &str) -> CollabResult<()> {
        self.post(
            &format!("/repos/{}/issues/{}/comments", self.repo, issue_number),
            &json!({ "body": body }),
        )
        .await?;
        Ok(())
    }
}
