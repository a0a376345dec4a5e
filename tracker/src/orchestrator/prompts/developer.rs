//! Developer prompt

use crate::model::Requirement;
use crate::orchestrator::outputs::TeamLeadOutput;

pub fn developer_prompt(requirement: &Requirement, tl_output: &TeamLeadOutput) -> String {
    let tasks = serde_json::to_string(&tl_output.tasks).unwrap_or_default();
    format!(
        "You are a Developer. \
         Return JSON only with keys: test_cases (array), implementation_notes (array). \
         Focus on TDD-first steps.\n\n\
         Title: {}\n\
         Tasks: {}\n",
        requirement.title, tasks
    )
}
