//! QA-Tester prompt

use crate::model::Requirement;
use crate::orchestrator::outputs::TeamLeadOutput;

pub fn qa_prompt(requirement: &Requirement, tl_output: &TeamLeadOutput) -> String {
    let tasks = serde_json::to_string(&tl_output.tasks).unwrap_or_default();
    format!(
        "You are a QA Engineer. \
         Return JSON only with keys: e2e_tests (array), qa_risks (array).\n\n\
         Title: {}\n\
         Tasks: {}\n",
        requirement.title, tasks
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_names_the_qa_keys() {
        let req = Requirement::new(
            "text".to_string(),
            "Dark mode".to_string(),
            String::new(),
            None,
            None,
        );
        let prompt = qa_prompt(&req, &TeamLeadOutput::default());
        assert!(prompt.contains("You are a QA Engineer."));
        assert!(prompt.contains("e2e_tests"));
        assert!(prompt.contains("qa_risks"));
    }
}
