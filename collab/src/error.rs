//! Error types for collaborator calls
//!
//! Distinguishes HTTP-level rejections (status + body are kept so error
//! events can report them) from transport failures.

use thiserror::Error;

/// Errors that can occur when calling an external collaborator
#[derive(Error, Debug)]
pub enum CollabError {
    /// The service answered with a non-success status
    #[error("HTTP {status}: {reason}")]
    Status {
        /// Response status code
        status: u16,
        /// Response body, or the canonical reason when the body is empty
        reason: String,
    },

    /// The request never completed (connect, timeout, decode)
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered 2xx but the payload was not what we expected
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

/// Result type alias for collaborator operations
pub type CollabResult<T> = Result<T, CollabError>;

impl CollabError {
    /// Build a [`CollabError::Status`] from a non-success response,
    /// consuming the body for the reason text.
    pub async fn from_response(response: reqwest::Response) -> Self {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        let reason = if body.is_empty() {
            status.canonical_reason().unwrap_or("unknown").to_string()
        } else {
            body
        };
        Self::Status {
            status: status.as_u16(),
            reason,
        }
    }

    /// Event payload describing this failure, mirroring what the audit log
    /// records per failure class.
    pub fn event_payload(&self) -> serde_json::Value {
        match self {
            Self::Status { status, reason } => {
                serde_json::json!({ "status": status, "reason": reason })
            }
            other => serde_json::json!({ "error": other.to_string() }),
        }
    }
}
