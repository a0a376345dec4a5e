//! Best-effort observability sink
//!
//! Mirrors audit-log events to an external collector. The sink is never on
//! any critical path: emit failures are reported back to the caller, which
//! records them in the local event log and moves on.

use reqwest::Client;
use serde_json::json;
use std::time::Duration;

use crate::error::{CollabError, CollabResult};

const EMIT_TIMEOUT: Duration = Duration::from_secs(6);

/// Event sink client
pub struct ObservabilitySink {
    client: Client,
    url: String,
    api_key: String,
}

impl ObservabilitySink {
    /// Create a sink with an explicit endpoint and key.
    pub fn new(url: &str, api_key: &str) -> Self {
        let client = Client::builder()
            .user_agent("pipeline-tracker/0.1")
            .timeout(EMIT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            url: url.to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Create a sink from the environment, or `None` when `CORALOGIX_URL`
    /// or `CORALOGIX_API_KEY` is missing.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("CORALOGIX_URL").ok()?;
        let api_key = std::env::var("CORALOGIX_API_KEY").ok()?;
        Some(Self::new(&url, &api_key))
    }

    /// Forward one event to the collector.
    pub async fn emit(
        &self,
        event_type: &str,
        timestamp_ms: i64,
        payload: &serde_json::Value,
    ) -> CollabResult<()> {
        let body = json!({
            "eventType": event_type,
            "timestamp": timestamp_ms,
            "payload": payload,
        });

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::AUTHORIZATION, self.api_key.as_str())
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(CollabError::from_response(response).await);
        }
        Ok(())
    }
}
