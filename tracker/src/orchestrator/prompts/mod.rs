//! Prompt builders for the simulated roles
//!
//! Pure, deterministic string templates. Each embeds the role instructions
//! plus the requirement fields and prior-stage outputs that role needs;
//! no side effects, no I/O.

mod developer;
mod product_owner;
mod qa_tester;
mod team_lead;

pub use developer::developer_prompt;
pub use product_owner::product_owner_prompt;
pub use qa_tester::qa_prompt;
pub use team_lead::team_lead_prompt;
