//! In-memory repository
//!
//! Process-local state with no eviction and no persistence. All mutation
//! goes through one `RwLock`, which serializes writers under concurrent
//! HTTP requests; the lock is only held for the duration of a method, never
//! across an outbound call.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::model::{Approval, Event, Requirement, Task};
use crate::orchestrator::outputs::AgentOutputs;
use crate::workflow::WorkflowState;

#[derive(Default)]
struct StoreInner {
    requirements: HashMap<String, Requirement>,
    approvals: Vec<Approval>,
    events: Vec<Event>,
    tasks: HashMap<String, Vec<Task>>,
    agent_outputs: HashMap<String, AgentOutputs>,
}

/// Shared in-memory store
#[derive(Clone, Default)]
pub struct Store {
    inner: Arc<RwLock<StoreInner>>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Requirements
    // ------------------------------------------------------------------

    pub async fn insert_requirement(&self, requirement: Requirement) {
        let mut inner = self.inner.write().await;
        inner
            .requirements
            .insert(requirement.id.clone(), requirement);
    }

    pub async fn get_requirement(&self, id: &str) -> Option<Requirement> {
        let inner = self.inner.read().await;
        inner.requirements.get(id).cloned()
    }

    /// Set the requirement's state. Returns `false` for an unknown id.
    pub async fn set_state(&self, id: &str, state: WorkflowState) -> bool {
        let mut inner = self.inner.write().await;
        match inner.requirements.get_mut(id) {
            Some(requirement) => {
                requirement.state = state;
                true
            }
            None => false,
        }
    }

    /// Record the source-host issue number created for a requirement.
    pub async fn set_source_issue(&self, id: &str, issue_number: u64) -> bool {
        let mut inner = self.inner.write().await;
        match inner.requirements.get_mut(id) {
            Some(requirement) => {
                requirement.github_issue_number = Some(issue_number);
                true
            }
            None => false,
        }
    }

    /// Store the merged results of a successful agent run.
    pub async fn apply_run_results(
        &self,
        id: &str,
        acceptance_criteria: Vec<String>,
        risks: Vec<String>,
    ) -> bool {
        let mut inner = self.inner.write().await;
        match inner.requirements.get_mut(id) {
            Some(requirement) => {
                requirement.acceptance_criteria = acceptance_criteria;
                requirement.risks = risks;
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Approvals
    // ------------------------------------------------------------------

    pub async fn record_approval(&self, approval: Approval) {
        let mut inner = self.inner.write().await;
        inner.approvals.push(approval);
    }

    pub async fn approvals(&self) -> Vec<Approval> {
        let inner = self.inner.read().await;
        inner.approvals.clone()
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    pub async fn push_event(&self, event: Event) {
        let mut inner = self.inner.write().await;
        inner.events.push(event);
    }

    pub async fn events(&self) -> Vec<Event> {
        let inner = self.inner.read().await;
        inner.events.clone()
    }

    // ------------------------------------------------------------------
    // Tasks
    // ------------------------------------------------------------------

    pub async fn tasks(&self, requirement_id: &str) -> Vec<Task> {
        let inner = self.inner.read().await;
        inner
            .tasks
            .get(requirement_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Replace the whole task list for a requirement. Previous tasks are
    /// discarded, not merged.
    pub async fn replace_tasks(&self, requirement_id: &str, tasks: Vec<Task>) {
        let mut inner = self.inner.write().await;
        inner.tasks.insert(requirement_id.to_string(), tasks);
    }

    /// Update the status of every task matching `task_id` in the
    /// requirement's list. Matching nothing is not an error.
    pub async fn update_task_status(&self, requirement_id: &str, task_id: &str, status: &str) {
        let mut inner = self.inner.write().await;
        if let Some(tasks) = inner.tasks.get_mut(requirement_id) {
            for task in tasks.iter_mut().filter(|t| t.id == task_id) {
                task.status = status.to_string();
            }
        }
    }

    // ------------------------------------------------------------------
    // Agent outputs
    // ------------------------------------------------------------------

    pub async fn agent_outputs(&self, requirement_id: &str) -> Option<AgentOutputs> {
        let inner = self.inner.read().await;
        inner.agent_outputs.get(requirement_id).cloned()
    }

    /// Replace the per-requirement role outputs wholesale.
    pub async fn set_agent_outputs(&self, requirement_id: &str, outputs: AgentOutputs) {
        let mut inner = self.inner.write().await;
        inner
            .agent_outputs
            .insert(requirement_id.to_string(), outputs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::new_id;

    fn requirement() -> Requirement {
        Requirement::new(
            "text".to_string(),
            "Test".to_string(),
            String::new(),
            None,
            None,
        )
    }

    fn task(title: &str) -> Task {
        Task {
            id: new_id(),
            title: title.to_string(),
            lane: "Development".to_string(),
            estimate: "M".to_string(),
            status: "running".to_string(),
        }
    }

    #[tokio::test]
    async fn set_state_on_unknown_id_is_false() {
        let store = Store::new();
        assert!(!store.set_state("missing", WorkflowState::Done).await);
    }

    #[tokio::test]
    async fn replace_tasks_discards_previous_list() {
        let store = Store::new();
        let req = requirement();
        let id = req.id.clone();
        store.insert_requirement(req).await;

        store.replace_tasks(&id, vec![task("first"), task("second")]).await;
        store.replace_tasks(&id, vec![task("only")]).await;

        let tasks = store.tasks(&id).await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "only");
    }

    #[tokio::test]
    async fn update_task_status_touches_only_matching_task() {
        let store = Store::new();
        let first = task("first");
        let second = task("second");
        let first_id = first.id.clone();
        store.replace_tasks("r1", vec![first, second]).await;

        store.update_task_status("r1", &first_id, "done").await;

        let tasks = store.tasks("r1").await;
        assert_eq!(tasks[0].status, "done");
        assert_eq!(tasks[1].status, "running");
    }

    #[tokio::test]
    async fn update_task_status_on_unknown_requirement_is_a_no_op() {
        let store = Store::new();
        store.update_task_status("missing", "t1", "done").await;
        assert!(store.tasks("missing").await.is_empty());
    }

    #[tokio::test]
    async fn apply_run_results_sets_criteria_and_risks() {
        let store = Store::new();
        let req = requirement();
        let id = req.id.clone();
        store.insert_requirement(req).await;

        assert!(
            store
                .apply_run_results(&id, vec!["AC1".to_string()], vec!["R1".to_string()])
                .await
        );

        let stored = store.get_requirement(&id).await.unwrap();
        assert_eq!(stored.acceptance_criteria, vec!["AC1"]);
        assert_eq!(stored.risks, vec!["R1"]);
    }
}
