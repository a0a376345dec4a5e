//! Product-Owner prompt

use crate::model::Requirement;

pub fn product_owner_prompt(requirement: &Requirement) -> String {
    format!(
        "You are a Product Owner. \
         Return JSON only with keys: scope, acceptance_criteria (array), risks (array), clarifying_questions (array). \
         Be concise and testable.\n\n\
         Title: {}\n\
         Description: {}\n\
         Source: {}\n",
        requirement.title, requirement.description, requirement.source
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prompt_embeds_requirement_fields() {
        let req = Requirement::new(
            "jira".to_string(),
            "Dark mode".to_string(),
            "Add a dark theme".to_string(),
            None,
            None,
        );
        let prompt = product_owner_prompt(&req);
        assert!(prompt.contains("You are a Product Owner."));
        assert!(prompt.contains("Title: Dark mode"));
        assert!(prompt.contains("Description: Add a dark theme"));
        assert!(prompt.contains("Source: jira"));
    }
}
