//! External collaborator clients for the pipeline tracker
//!
//! Each client wraps one outbound HTTP call pattern with credentials drawn
//! from the process environment. A client only exists when its credentials
//! are fully configured (`from_env` returns `None` otherwise), so callers
//! never have to guard individual calls against missing configuration.
//!
//! All calls here are best-effort from the caller's perspective: failures
//! are returned as [`CollabError`] and the caller decides whether to record
//! and continue or to abort.

pub mod error;
pub mod github;
pub mod jira;
pub mod observability;

pub use error::{CollabError, CollabResult};
pub use github::GithubClient;
pub use jira::{issue_key_from_link, IssueDetails, JiraClient};
pub use observability::ObservabilitySink;

use async_trait::async_trait;

/// Issue tracker operations used by the orchestration routine.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Fetch summary/description for an issue key.
    async fn fetch_issue(&self, key: &str) -> CollabResult<IssueDetails>;

    /// Add a plain-text comment to an issue.
    async fn add_comment(&self, key: &str, text: &str) -> CollabResult<()>;
}

/// Source-host operations used by the orchestration routine.
#[async_trait]
pub trait SourceHost: Send + Sync {
    /// Create an issue and return its number.
    async fn create_issue(&self, title: &str, body: &str) -> CollabResult<u64>;

    /// Add a comment to an existing issue.
    async fn add_comment(&self, issue_number: u64, body: &str) -> CollabResult<()>;
}
