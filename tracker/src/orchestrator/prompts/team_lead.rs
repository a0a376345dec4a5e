//! Team-Lead prompt

use crate::model::Requirement;
use crate::orchestrator::outputs::ProductOwnerOutput;

pub fn team_lead_prompt(requirement: &Requirement, po_output: &ProductOwnerOutput) -> String {
    format!(
        "You are a Team Lead. \
         Based on the requirement and PO output, return JSON only with keys: \
         tasks (array of objects with title, lane, estimate, dependencies).\n\n\
         Title: {}\n\
         Description: {}\n\
         Acceptance Criteria: {:?}\n",
        requirement.title, requirement.description, po_output.acceptance_criteria
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_carries_po_acceptance_criteria() {
        let req = Requirement::new(
            "text".to_string(),
            "Dark mode".to_string(),
            String::new(),
            None,
            None,
        );
        let po = ProductOwnerOutput {
            acceptance_criteria: vec!["Theme toggles".to_string()],
            ..Default::default()
        };
        let prompt = team_lead_prompt(&req, &po);
        assert!(prompt.contains("You are a Team Lead."));
        assert!(prompt.contains("Theme toggles"));
    }
}
