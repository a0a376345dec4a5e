//! REST API handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use collab::issue_key_from_link;

use super::state::AppState;
use crate::model::{new_id, now_ms, Approval, Event, Requirement, Task};
use crate::orchestrator::RunOutcome;
use crate::workflow::{is_legal_transition, WorkflowState};

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn not_found() -> ApiError {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not_found")))
}

/// Plain acknowledgement
#[derive(Debug, Serialize)]
pub struct OkResponse {
    pub ok: bool,
}

impl OkResponse {
    fn new() -> Self {
        Self { ok: true }
    }
}

/// Health check endpoint
pub async fn health_check() -> Json<OkResponse> {
    Json(OkResponse::new())
}

/// Everything the UI needs to render one requirement's pipeline
#[derive(Debug, Serialize)]
pub struct WorkflowViewResponse {
    pub requirement: Requirement,
    pub states: Vec<&'static str>,
    pub current_state: WorkflowState,
    pub approvals: Vec<Approval>,
    pub events: Vec<Event>,
    pub tasks: Vec<Task>,
    pub agent_outputs: serde_json::Value,
}

/// Full pipeline view for a requirement
pub async fn get_workflow(
    State(state): State<AppState>,
    Path(requirement_id): Path<String>,
) -> Result<Json<WorkflowViewResponse>, ApiError> {
    let requirement = state
        .store
        .get_requirement(&requirement_id)
        .await
        .ok_or_else(not_found)?;

    let agent_outputs = match state.store.agent_outputs(&requirement_id).await {
        Some(outputs) => serde_json::to_value(outputs).unwrap_or_else(|_| json!({})),
        None => json!({}),
    };

    Ok(Json(WorkflowViewResponse {
        current_state: requirement.state,
        states: WorkflowState::labels(),
        approvals: state.store.approvals().await,
        events: state.store.events().await,
        tasks: state.store.tasks(&requirement_id).await,
        agent_outputs,
        requirement,
    }))
}

#[derive(Debug, Serialize)]
pub struct EventsResponse {
    pub events: Vec<Event>,
}

/// Whole audit log
pub async fn list_events(State(state): State<AppState>) -> Json<EventsResponse> {
    Json(EventsResponse {
        events: state.store.events().await,
    })
}

/// Intake request
#[derive(Debug, Default, Deserialize)]
pub struct IntakeRequest {
    pub source: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub jira_link: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub id: String,
}

/// Create a requirement, optionally resolving its title from the linked
/// issue tracker.
pub async fn intake(
    State(state): State<AppState>,
    Json(req): Json<IntakeRequest>,
) -> Json<IntakeResponse> {
    let jira_key = req.jira_link.as_deref().and_then(issue_key_from_link);
    let mut requirement = Requirement::new(
        req.source.unwrap_or_else(|| "text".to_string()),
        req.title.unwrap_or_else(|| "Untitled Requirement".to_string()),
        req.description.unwrap_or_default(),
        req.jira_link,
        jira_key.clone(),
    );

    if let (Some(tracker), Some(key)) = (&state.issue_tracker, jira_key.as_deref()) {
        match tracker.fetch_issue(key).await {
            Ok(issue) => {
                if let Some(summary) = issue.summary {
                    requirement.title = summary;
                }
            }
            Err(e) => {
                tracing::warn!("Failed to fetch Jira issue {key}: {e}");
                state.events.record("jira.error", e.event_payload()).await;
            }
        }
    }

    let id = requirement.id.clone();
    state.store.insert_requirement(requirement).await;
    state
        .events
        .record("intake.created", json!({ "requirement_id": id }))
        .await;

    Json(IntakeResponse { id })
}

/// Approval request
#[derive(Debug, Deserialize)]
pub struct ApprovalRequest {
    pub requirement_id: Option<String>,
    pub role: Option<String>,
    pub milestone: Option<String>,
    pub status: Option<String>,
    pub signed_by: Option<String>,
}

/// Record a milestone sign-off.
pub async fn record_approval(
    State(state): State<AppState>,
    Json(req): Json<ApprovalRequest>,
) -> Json<OkResponse> {
    let approval = Approval {
        id: new_id(),
        requirement_id: req.requirement_id,
        role: req.role,
        milestone: req.milestone,
        status: req.status.unwrap_or_else(|| "approved".to_string()),
        signed_by: req.signed_by.unwrap_or_else(|| "demo_user".to_string()),
        signed_at: now_ms(),
    };

    let payload = serde_json::to_value(&approval).unwrap_or_else(|_| json!({}));
    state.store.record_approval(approval).await;
    state.events.record("approval.recorded", payload).await;

    Json(OkResponse::new())
}

/// State update request
#[derive(Debug, Deserialize)]
pub struct StateUpdateRequest {
    pub requirement_id: String,
    pub state: WorkflowState,
}

/// Set a requirement's workflow state.
pub async fn update_state(
    State(state): State<AppState>,
    Json(req): Json<StateUpdateRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let requirement = state
        .store
        .get_requirement(&req.requirement_id)
        .await
        .ok_or_else(not_found)?;

    if state.enforce_transitions && !is_legal_transition(requirement.state, req.state) {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse::new(format!(
                "illegal transition: {} -> {}",
                requirement.state, req.state
            ))),
        ));
    }

    state.store.set_state(&req.requirement_id, req.state).await;
    state
        .events
        .record(
            "state.changed",
            json!({ "requirement_id": req.requirement_id, "state": req.state }),
        )
        .await;

    Ok(Json(OkResponse::new()))
}

/// Task status update request
#[derive(Debug, Deserialize)]
pub struct TaskUpdateRequest {
    pub requirement_id: String,
    pub task_id: String,
    pub status: String,
}

/// Update one task's status within a requirement's list.
pub async fn update_task(
    State(state): State<AppState>,
    Json(req): Json<TaskUpdateRequest>,
) -> Json<OkResponse> {
    state
        .store
        .update_task_status(&req.requirement_id, &req.task_id, &req.status)
        .await;
    state
        .events
        .record(
            "task.updated",
            json!({
                "requirement_id": req.requirement_id,
                "task_id": req.task_id,
                "status": req.status,
            }),
        )
        .await;

    Json(OkResponse::new())
}

/// Forced-rework request
#[derive(Debug, Deserialize)]
pub struct TestFailRequest {
    pub requirement_id: String,
}

/// Force a requirement back into development after a failed test.
pub async fn test_fail(
    State(state): State<AppState>,
    Json(req): Json<TestFailRequest>,
) -> Result<Json<OkResponse>, ApiError> {
    let updated = state
        .store
        .set_state(&req.requirement_id, WorkflowState::InDevelopment)
        .await;
    if !updated {
        return Err(not_found());
    }

    state
        .events
        .record("test.failed", json!({ "requirement_id": req.requirement_id }))
        .await;

    Ok(Json(OkResponse::new()))
}

/// Agent run request
#[derive(Debug, Deserialize)]
pub struct RunAgentsRequest {
    pub requirement_id: String,
}

/// Execute the orchestration routine for a requirement.
pub async fn run_agents(
    State(state): State<AppState>,
    Json(req): Json<RunAgentsRequest>,
) -> Result<Json<RunOutcome>, ApiError> {
    if state
        .store
        .get_requirement(&req.requirement_id)
        .await
        .is_none()
    {
        return Err(not_found());
    }

    match state.engine().run(&req.requirement_id).await {
        Ok(outcome) => Ok(Json(outcome)),
        Err(e) => {
            tracing::error!("Agent run failed: {e}");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse::new(e.to_string())),
            ))
        }
    }
}
