//! Core data model
//!
//! Requirements flow through the pipeline; approvals and events are
//! append-only; tasks are replaced wholesale by each agent run.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::workflow::WorkflowState;

/// Current time as epoch milliseconds.
pub fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

/// Fresh uuid-v4 identifier.
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}

/// The unit of work flowing through the pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Requirement {
    pub id: String,
    pub source: String,
    pub title: String,
    pub description: String,
    pub jira_link: Option<String>,
    pub jira_key: Option<String>,
    pub github_issue_number: Option<u64>,
    pub created_at: i64,
    pub state: WorkflowState,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
}

impl Requirement {
    /// Create a requirement in the `Intake` state.
    pub fn new(
        source: String,
        title: String,
        description: String,
        jira_link: Option<String>,
        jira_key: Option<String>,
    ) -> Self {
        Self {
            id: new_id(),
            source,
            title,
            description,
            jira_link,
            jira_key,
            github_issue_number: None,
            created_at: now_ms(),
            state: WorkflowState::Intake,
            acceptance_criteria: Vec::new(),
            risks: Vec::new(),
        }
    }
}

/// A recorded sign-off at a pipeline milestone
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    pub id: String,
    pub requirement_id: Option<String>,
    pub role: Option<String>,
    pub milestone: Option<String>,
    pub status: String,
    pub signed_by: String,
    pub signed_at: i64,
}

/// A task derived from the latest Team-Lead output
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub lane: String,
    pub estimate: String,
    pub status: String,
}

/// Audit-log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub payload: serde_json::Value,
    pub ts: i64,
}

impl Event {
    /// Create an event stamped with the current time.
    pub fn new(event_type: &str, payload: serde_json::Value) -> Self {
        Self {
            id: new_id(),
            event_type: event_type.to_string(),
            payload,
            ts: now_ms(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_requirement_starts_in_intake() {
        let req = Requirement::new(
            "text".to_string(),
            "Title".to_string(),
            String::new(),
            None,
            None,
        );
        assert_eq!(req.state, WorkflowState::Intake);
        assert!(req.github_issue_number.is_none());
        assert!(req.acceptance_criteria.is_empty());
    }

    #[test]
    fn event_serializes_type_tag() {
        let event = Event::new("intake.created", serde_json::json!({"requirement_id": "r1"}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "intake.created");
        assert_eq!(json["payload"]["requirement_id"], "r1");
    }
}
