//! Typed role outputs
//!
//! Each simulated role is asked for a JSON object with a known shape;
//! every field is defaulted so a sparse answer still parses, while a
//! wrong-shaped one fails extraction and aborts the run.

use serde::{Deserialize, Serialize};

use crate::model::{new_id, Task};

/// Product-Owner output: scope, acceptance criteria, risks, questions
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductOwnerOutput {
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub acceptance_criteria: Vec<String>,
    #[serde(default)]
    pub risks: Vec<String>,
    #[serde(default)]
    pub clarifying_questions: Vec<String>,
}

/// One task as proposed by the Team Lead
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub lane: Option<String>,
    #[serde(default)]
    pub estimate: Option<String>,
    #[serde(default)]
    pub dependencies: Vec<String>,
}

impl TaskSpec {
    /// Materialize a stored task: fresh id, defaults filled in, status
    /// `running`.
    pub fn to_task(&self) -> Task {
        Task {
            id: new_id(),
            title: self
                .title
                .clone()
                .unwrap_or_else(|| "Untitled Task".to_string()),
            lane: self
                .lane
                .clone()
                .unwrap_or_else(|| "Development".to_string()),
            estimate: self.estimate.clone().unwrap_or_else(|| "M".to_string()),
            status: "running".to_string(),
        }
    }
}

/// Team-Lead output: the task breakdown
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamLeadOutput {
    #[serde(default)]
    pub tasks: Vec<TaskSpec>,
}

/// Developer output: TDD-first test cases and implementation notes
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeveloperOutput {
    #[serde(default)]
    pub test_cases: Vec<String>,
    #[serde(default)]
    pub implementation_notes: Vec<String>,
}

/// QA output: end-to-end tests and QA-side risks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QaOutput {
    #[serde(default)]
    pub e2e_tests: Vec<String>,
    #[serde(default)]
    pub qa_risks: Vec<String>,
}

/// The last structured output per role for one requirement; replaced
/// wholesale on every run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutputs {
    #[serde(rename = "ProductOwner")]
    pub product_owner: ProductOwnerOutput,
    #[serde(rename = "TeamLead")]
    pub team_lead: TeamLeadOutput,
    #[serde(rename = "Developer")]
    pub developer: DeveloperOutput,
    #[serde(rename = "QATester")]
    pub qa_tester: QaOutput,
}
