//! HTTP surface tests
//!
//! Each test boots the real router on an ephemeral port with an
//! in-process scripted inference backend, then drives it over HTTP the
//! way the demo UI does.

use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use tracker::events::EventRecorder;
use tracker::llm::Llm;
use tracker::store::Store;
use tracker::web::state::AppState;
use tracker::web::create_router;

/// Scripted backend answering per role prompt
struct ScriptedLlm;

#[async_trait]
impl Llm for ScriptedLlm {
    async fn chat(&self, prompt: &str) -> Result<String> {
        if prompt.starts_with("You are a Product Owner") {
            Ok(r#"{"scope": "small", "acceptance_criteria": ["AC1", "AC2"], "risks": ["A", "B"], "clarifying_questions": []}"#.to_string())
        } else if prompt.starts_with("You are a Team Lead") {
            Ok(r#"{"tasks": [{"title": "Build it", "lane": "Backend", "estimate": "M"}]}"#.to_string())
        } else if prompt.starts_with("You are a Developer") {
            Ok(r#"{"test_cases": ["tc1"], "implementation_notes": []}"#.to_string())
        } else {
            Ok(r#"{"e2e_tests": ["e2e1"], "qa_risks": ["B", "C"]}"#.to_string())
        }
    }
}

/// Backend that never answers
struct BrokenLlm;

#[async_trait]
impl Llm for BrokenLlm {
    async fn chat(&self, _prompt: &str) -> Result<String> {
        Err(anyhow!("Missing BEDROCK_MODEL_ID or AWS_REGION"))
    }
}

struct TestApp {
    base_url: String,
    store: Store,
    client: reqwest::Client,
}

impl TestApp {
    async fn spawn(llm: Arc<dyn Llm>, enforce_transitions: bool) -> Self {
        let store = Store::new();
        let events = EventRecorder::new(store.clone(), None);
        let state = AppState::new(
            store.clone(),
            events,
            llm,
            None,
            None,
            enforce_transitions,
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, create_router(state)).await.unwrap();
        });

        Self {
            base_url: format!("http://{addr}"),
            store,
            client: reqwest::Client::new(),
        }
    }

    async fn scripted() -> Self {
        Self::spawn(Arc::new(ScriptedLlm), false).await
    }

    async fn post(&self, path: &str, body: Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.base_url))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    async fn get(&self, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.base_url))
            .send()
            .await
            .unwrap()
    }

    async fn intake(&self, body: Value) -> String {
        let response = self.post("/api/intake", body).await;
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        body["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn health_returns_ok() {
    let app = TestApp::scripted().await;

    let response = app.get("/api/health").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"ok": true}));
}

#[tokio::test]
async fn intake_creates_requirement_with_derived_jira_key() {
    let app = TestApp::scripted().await;

    let id = app
        .intake(json!({
            "title": "Dark mode",
            "description": "Add a dark theme",
            "jira_link": "https://example.atlassian.net/browse/ABC-1",
        }))
        .await;

    let response = app.get(&format!("/api/workflow/{id}")).await;
    assert_eq!(response.status(), 200);
    let view: Value = response.json().await.unwrap();

    assert_eq!(view["requirement"]["title"], "Dark mode");
    assert_eq!(view["requirement"]["jira_key"], "ABC-1");
    assert_eq!(view["requirement"]["source"], "text");
    assert_eq!(view["current_state"], "Intake");
    assert_eq!(view["states"].as_array().unwrap().len(), 12);
    assert_eq!(view["agent_outputs"], json!({}));
    assert_eq!(view["tasks"], json!([]));

    let events = view["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["type"], "intake.created");
}

#[tokio::test]
async fn intake_defaults_apply_to_empty_body() {
    let app = TestApp::scripted().await;

    let id = app.intake(json!({})).await;

    let view: Value = app
        .get(&format!("/api/workflow/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["requirement"]["title"], "Untitled Requirement");
    assert_eq!(view["requirement"]["jira_key"], Value::Null);
}

#[tokio::test]
async fn workflow_view_of_unknown_requirement_is_404() {
    let app = TestApp::scripted().await;

    let response = app.get("/api/workflow/missing").await;
    assert_eq!(response.status(), 404);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn state_update_moves_the_requirement() {
    let app = TestApp::scripted().await;
    let id = app.intake(json!({"title": "Req"})).await;

    let response = app
        .post(
            "/api/state",
            json!({"requirement_id": id, "state": "In_Development"}),
        )
        .await;
    assert_eq!(response.status(), 200);

    let view: Value = app
        .get(&format!("/api/workflow/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["current_state"], "In_Development");
}

#[tokio::test]
async fn state_update_for_unknown_id_is_404_and_appends_no_event() {
    let app = TestApp::scripted().await;

    let response = app
        .post(
            "/api/state",
            json!({"requirement_id": "missing", "state": "Done"}),
        )
        .await;
    assert_eq!(response.status(), 404);

    assert!(app.store.events().await.is_empty());
}

#[tokio::test]
async fn unknown_state_label_is_rejected() {
    let app = TestApp::scripted().await;
    let id = app.intake(json!({"title": "Req"})).await;

    let response = app
        .post(
            "/api/state",
            json!({"requirement_id": id, "state": "Shipped"}),
        )
        .await;
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn enforced_transitions_reject_forward_jumps() {
    let app = TestApp::spawn(Arc::new(ScriptedLlm), true).await;
    let id = app.intake(json!({"title": "Req"})).await;

    // Intake -> Done skips the whole pipeline
    let response = app
        .post("/api/state", json!({"requirement_id": id, "state": "Done"}))
        .await;
    assert_eq!(response.status(), 400);

    // Intake -> Preflight_Risk_Check is the legal successor
    let response = app
        .post(
            "/api/state",
            json!({"requirement_id": id, "state": "Preflight_Risk_Check"}),
        )
        .await;
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_fail_forces_in_development() {
    let app = TestApp::scripted().await;
    let id = app.intake(json!({"title": "Req"})).await;

    app.post("/api/state", json!({"requirement_id": id, "state": "QA_E2E"}))
        .await;
    let response = app
        .post("/api/test/fail", json!({"requirement_id": id}))
        .await;
    assert_eq!(response.status(), 200);

    let view: Value = app
        .get(&format!("/api/workflow/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["current_state"], "In_Development");
}

#[tokio::test]
async fn test_fail_for_unknown_id_is_404() {
    let app = TestApp::scripted().await;

    let response = app
        .post("/api/test/fail", json!({"requirement_id": "missing"}))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn approval_is_recorded_and_visible() {
    let app = TestApp::scripted().await;
    let id = app.intake(json!({"title": "Req"})).await;

    let response = app
        .post(
            "/api/approval",
            json!({"requirement_id": id, "role": "PO", "milestone": "Backlog_Ready"}),
        )
        .await;
    assert_eq!(response.status(), 200);

    let view: Value = app
        .get(&format!("/api/workflow/{id}"))
        .await
        .json()
        .await
        .unwrap();
    let approvals = view["approvals"].as_array().unwrap();
    assert_eq!(approvals.len(), 1);
    assert_eq!(approvals[0]["status"], "approved");
    assert_eq!(approvals[0]["signed_by"], "demo_user");
}

#[tokio::test]
async fn agent_run_produces_tasks_outputs_and_merged_risks() {
    let app = TestApp::scripted().await;
    let id = app.intake(json!({"title": "Dark mode"})).await;

    let response = app
        .post("/api/agent/run", json!({"requirement_id": id}))
        .await;
    assert_eq!(response.status(), 200);
    let outcome: Value = response.json().await.unwrap();

    assert_eq!(outcome["acceptance_criteria"], json!(["AC1", "AC2"]));
    assert_eq!(outcome["risks"], json!(["A", "B", "C"]));
    let tasks = outcome["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["title"], "Build it");
    assert_eq!(tasks[0]["status"], "running");
    assert_eq!(
        outcome["agent_outputs"]["QATester"]["e2e_tests"],
        json!(["e2e1"])
    );

    // Task status can then be updated by id
    let task_id = tasks[0]["id"].as_str().unwrap();
    let response = app
        .post(
            "/api/task/update",
            json!({"requirement_id": id, "task_id": task_id, "status": "done"}),
        )
        .await;
    assert_eq!(response.status(), 200);

    let view: Value = app
        .get(&format!("/api/workflow/{id}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(view["tasks"][0]["status"], "done");
    assert_eq!(view["agent_outputs"]["ProductOwner"]["scope"], "small");
}

#[tokio::test]
async fn agent_run_for_unknown_id_is_404() {
    let app = TestApp::scripted().await;

    let response = app
        .post("/api/agent/run", json!({"requirement_id": "missing"}))
        .await;
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn agent_run_surfaces_inference_failure_as_500() {
    let app = TestApp::spawn(Arc::new(BrokenLlm), false).await;
    let id = app.intake(json!({"title": "Req"})).await;

    let response = app
        .post("/api/agent/run", json!({"requirement_id": id}))
        .await;
    assert_eq!(response.status(), 500);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Missing BEDROCK_MODEL_ID"));

    // Nothing was merged
    assert!(app.store.tasks(&id).await.is_empty());
}

#[tokio::test]
async fn events_endpoint_lists_the_audit_log() {
    let app = TestApp::scripted().await;
    let id = app.intake(json!({"title": "Req"})).await;
    app.post("/api/state", json!({"requirement_id": id, "state": "Release"}))
        .await;

    let response = app.get("/api/events").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let types: Vec<&str> = body["events"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["intake.created", "state.changed"]);
}
