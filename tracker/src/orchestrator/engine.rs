//! Orchestration routine
//!
//! Runs the four simulated roles for one requirement:
//!
//! 1. Product Owner (acceptance criteria, risks, questions)
//! 2. Source-host issue creation, once per requirement
//! 3. Team Lead (task breakdown)
//! 4. Developer and QA Tester, concurrently
//! 5. Merge results into the store
//!
//! Inference and extraction failures abort the run before anything is
//! merged; collaborator failures are recorded as error events and never
//! abort.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;

use collab::{CollabResult, IssueTracker, SourceHost};

use crate::events::EventRecorder;
use crate::llm::Llm;
use crate::model::{Requirement, Task};
use crate::store::Store;

use super::extract::extract_json;
use super::outputs::{
    AgentOutputs, DeveloperOutput, ProductOwnerOutput, QaOutput, TaskSpec, TeamLeadOutput,
};
use super::prompts::{developer_prompt, product_owner_prompt, qa_prompt, team_lead_prompt};

/// Result of a completed agent run
#[derive(Debug, Clone, Serialize)]
pub struct RunOutcome {
    pub acceptance_criteria: Vec<String>,
    pub tasks: Vec<Task>,
    pub risks: Vec<String>,
    pub agent_outputs: AgentOutputs,
}

/// Executes agent runs against the store and external collaborators
pub struct PipelineEngine {
    store: Store,
    events: EventRecorder,
    llm: Arc<dyn Llm>,
    issue_tracker: Option<Arc<dyn IssueTracker>>,
    source_host: Option<Arc<dyn SourceHost>>,
}

impl PipelineEngine {
    pub fn new(
        store: Store,
        events: EventRecorder,
        llm: Arc<dyn Llm>,
        issue_tracker: Option<Arc<dyn IssueTracker>>,
        source_host: Option<Arc<dyn SourceHost>>,
    ) -> Self {
        Self {
            store,
            events,
            llm,
            issue_tracker,
            source_host,
        }
    }

    /// Run all four roles for a requirement and merge the results.
    pub async fn run(&self, requirement_id: &str) -> Result<RunOutcome> {
        let mut requirement = self
            .store
            .get_requirement(requirement_id)
            .await
            .ok_or_else(|| anyhow!("Requirement not found: {requirement_id}"))?;

        // Product Owner
        let po: ProductOwnerOutput = self.role_output(&product_owner_prompt(&requirement)).await?;
        self.record_stage("agent.product_owner", &requirement).await;

        if let (Some(tracker), Some(key)) = (&self.issue_tracker, requirement.jira_key.as_deref()) {
            let comment = format!(
                "PO output:\nAcceptance Criteria: {:?}\nRisks: {:?}\nQuestions: {:?}",
                po.acceptance_criteria, po.risks, po.clarifying_questions
            );
            self.best_effort("jira", tracker.add_comment(key, &comment).await)
                .await;
        }

        // Mirror the requirement to the source host once; the number is
        // stored immediately so a later run never opens a duplicate.
        if requirement.github_issue_number.is_none() {
            if let Some(host) = &self.source_host {
                let body = format!(
                    "Requirement: {}\n\nAcceptance Criteria: {:?}\nRisks: {:?}",
                    requirement.title, po.acceptance_criteria, po.risks
                );
                if let Some(number) = self
                    .best_effort("github", host.create_issue(&requirement.title, &body).await)
                    .await
                {
                    requirement.github_issue_number = Some(number);
                    self.store.set_source_issue(&requirement.id, number).await;
                }
            }
        }

        // Team Lead
        let tl: TeamLeadOutput = self
            .role_output(&team_lead_prompt(&requirement, &po))
            .await?;
        self.record_stage("agent.team_lead", &requirement).await;

        let task_summary = format!(
            "Team Lead tasks: {}",
            serde_json::to_string(&tl.tasks).unwrap_or_default()
        );
        self.comment_everywhere(&requirement, &task_summary).await;

        // Developer and QA depend only on the Team-Lead output, so both
        // inference calls go out together and the run waits for both.
        let dev_prompt = developer_prompt(&requirement, &tl);
        let qa_prompt_text = qa_prompt(&requirement, &tl);
        let (dev_text, qa_text) =
            tokio::join!(self.llm.chat(&dev_prompt), self.llm.chat(&qa_prompt_text));
        let dev: DeveloperOutput = extract_json(&dev_text?)?;
        let qa: QaOutput = extract_json(&qa_text?)?;
        self.record_stage("agent.developer", &requirement).await;
        self.record_stage("agent.qa_tester", &requirement).await;

        self.comment_everywhere(
            &requirement,
            &format!("Developer test cases: {:?}", dev.test_cases),
        )
        .await;
        self.comment_everywhere(&requirement, &format!("QA E2E tests: {:?}", qa.e2e_tests))
            .await;

        // Merge: criteria from PO, risks from PO + QA deduplicated, task
        // list replaced wholesale with fresh identifiers.
        let risks =
            dedupe_preserving_order(po.risks.iter().chain(qa.qa_risks.iter()).cloned());
        let tasks: Vec<Task> = tl.tasks.iter().map(TaskSpec::to_task).collect();

        self.store
            .apply_run_results(&requirement.id, po.acceptance_criteria.clone(), risks.clone())
            .await;
        self.store.replace_tasks(&requirement.id, tasks.clone()).await;

        let agent_outputs = AgentOutputs {
            product_owner: po,
            team_lead: tl,
            developer: dev,
            qa_tester: qa,
        };
        self.store
            .set_agent_outputs(&requirement.id, agent_outputs.clone())
            .await;
        self.record_stage("agent.run", &requirement).await;

        Ok(RunOutcome {
            acceptance_criteria: agent_outputs.product_owner.acceptance_criteria.clone(),
            tasks,
            risks,
            agent_outputs,
        })
    }

    /// One inference round-trip parsed into a typed role output.
    async fn role_output<T: DeserializeOwned>(&self, prompt: &str) -> Result<T> {
        let text = self.llm.chat(prompt).await?;
        Ok(extract_json(&text)?)
    }

    async fn record_stage(&self, event_type: &str, requirement: &Requirement) {
        self.events
            .record(event_type, json!({ "requirement_id": requirement.id }))
            .await;
    }

    /// Log-and-continue wrapper for collaborator calls: a failure becomes
    /// a `<source>.error` event and the run moves on.
    async fn best_effort<T>(&self, source: &str, result: CollabResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(source, "Collaborator call failed: {e}");
                self.events
                    .record(&format!("{source}.error"), e.event_payload())
                    .await;
                None
            }
        }
    }

    /// Post the same text to every configured collaborator that has a
    /// destination on this requirement.
    async fn comment_everywhere(&self, requirement: &Requirement, text: &str) {
        if let (Some(tracker), Some(key)) = (&self.issue_tracker, requirement.jira_key.as_deref()) {
            self.best_effort("jira", tracker.add_comment(key, text).await)
                .await;
        }
        if let (Some(host), Some(number)) = (&self.source_host, requirement.github_issue_number) {
            self.best_effort("github", host.add_comment(number, text).await)
                .await;
        }
    }
}

/// Deduplicate by first occurrence, preserving order.
pub fn dedupe_preserving_order(items: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for item in items {
        if seen.insert(item.clone()) {
            out.push(item);
        }
    }
    out
}
