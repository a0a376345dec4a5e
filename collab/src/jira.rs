//! Jira REST v3 client
//!
//! Credentials come from `JIRA_BASE_URL`, `JIRA_EMAIL`, and `JIRA_API_TOKEN`.
//! Comments are posted as Atlassian Document Format with the text capped at
//! 3000 characters, which keeps long agent outputs within Jira's limits.

use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::error::{CollabError, CollabResult};
use crate::IssueTracker;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const COMMENT_TEXT_LIMIT: usize = 3000;

/// Jira client
pub struct JiraClient {
    client: Client,
    base_url: String,
    email: String,
    token: String,
}

/// Summary fields for a fetched issue
#[derive(Debug, Clone, Deserialize)]
pub struct IssueDetails {
    /// Issue summary (used as the requirement title on intake)
    pub summary: Option<String>,
    /// Issue description, an Atlassian Document Format node when present
    pub description: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct IssueResponse {
    fields: IssueDetails,
}

#[derive(Debug, Deserialize)]
struct MyselfResponse {
    #[serde(rename = "displayName")]
    display_name: String,
}

impl JiraClient {
    /// Create a client from explicit credentials.
    pub fn new(base_url: &str, email: &str, token: &str) -> Self {
        let client = Client::builder()
            .user_agent("pipeline-tracker/0.1")
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
            token: token.to_string(),
        }
    }

    /// Create a client from the environment, or `None` when any of
    /// `JIRA_BASE_URL`, `JIRA_EMAIL`, `JIRA_API_TOKEN` is missing.
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("JIRA_BASE_URL").ok()?;
        let email = std::env::var("JIRA_EMAIL").ok()?;
        let token = std::env::var("JIRA_API_TOKEN").ok()?;
        Some(Self::new(&base_url, &email, &token))
    }

    fn auth_header(&self) -> String {
        let credentials =
            base64::engine::general_purpose::STANDARD.encode(format!("{}:{}", self.email, self.token));
        format!("Basic {credentials}")
    }

    async fn get(&self, path: &str) -> CollabResult<reqwest::Response> {
        let response = self
            .client
            .get(format!("{}{}", self.base_url, path))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CollabError::from_response(response).await);
        }
        Ok(response)
    }

    async fn post(&self, path: &str, payload: &serde_json::Value) -> CollabResult<reqwest::Response> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header(reqwest::header::AUTHORIZATION, self.auth_header())
            .json(payload)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CollabError::from_response(response).await);
        }
        Ok(response)
    }

    /// Validate the configured credentials and return the account's
    /// display name.
    pub async fn myself(&self) -> CollabResult<String> {
        let response = self.get("/rest/api/3/myself").await?;
        let myself: MyselfResponse = response.json().await?;
        Ok(myself.display_name)
    }
}

#[async_trait]
impl IssueTracker for JiraClient {
    async fn fetch_issue(&self, key: &str) -> CollabResult<IssueDetails> {
        let response = self
            .get(&format!(
                "/rest/api/3/issue/{key}?fields=summary,description"
            ))
            .await?;
        let issue: IssueResponse = response.json().await?;
        Ok(issue.fields)
    }

    async fn add_comment(&self, key: &str, text: &str) -> CollabResult<()> {
        let capped: String = text.chars().take(COMMENT_TEXT_LIMIT).collect();
        let body = json!({
            "body": {
                "type": "doc",
                "version": 1,
                "content": [{
                    "type": "paragraph",
                    "content": [{ "type": "text", "text": capped }],
                }],
            }
        });
        self.post(&format!("/rest/api/3/issue/{key}/comment"), &body)
            .await?;
        Ok(())
    }
}

/// Extract an issue key from a browsable Jira link.
///
/// Links look like `https://example.atlassian.net/browse/ABC-123`; anything
/// without a `/browse/` segment yields `None`.
pub fn issue_key_from_link(link: &str) -> Option<String> {
    let (_, rest) = link.split_once("/browse/")?;
    let key = rest
        .split('?')
        .next()
        .unwrap_or_default()
        .split('/')
        .next()
        .unwrap_or_default();

    if key.is_empty() {
        None
    } else {
        Some(key.to_string())
    }
}
