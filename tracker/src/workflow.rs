//! Workflow states for the delivery pipeline
//!
//! The pipeline is a fixed linear sequence of twelve states. A
//! requirement's state is always one of them (the enum is the invariant),
//! but transition legality is only checked when enforcement is switched on
//! (see [`crate::config::enforce_transitions`]); by default any state may
//! follow any other.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A stage of the delivery pipeline, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkflowState {
    Intake,
    #[serde(rename = "Preflight_Risk_Check")]
    PreflightRiskCheck,
    #[serde(rename = "PO_Refinement")]
    PoRefinement,
    #[serde(rename = "Backlog_Ready")]
    BacklogReady,
    #[serde(rename = "Task_Decomposition")]
    TaskDecomposition,
    #[serde(rename = "In_Development")]
    InDevelopment,
    #[serde(rename = "Code_Review")]
    CodeReview,
    Integrated,
    #[serde(rename = "QA_E2E")]
    QaE2e,
    #[serde(rename = "PO_Acceptance")]
    PoAcceptance,
    Release,
    Done,
}

impl WorkflowState {
    /// All states, in pipeline order.
    pub const ALL: [WorkflowState; 12] = [
        WorkflowState::Intake,
        WorkflowState::PreflightRiskCheck,
        WorkflowState::PoRefinement,
        WorkflowState::BacklogReady,
        WorkflowState::TaskDecomposition,
        WorkflowState::InDevelopment,
        WorkflowState::CodeReview,
        WorkflowState::Integrated,
        WorkflowState::QaE2e,
        WorkflowState::PoAcceptance,
        WorkflowState::Release,
        WorkflowState::Done,
    ];

    /// Wire label for this state.
    pub fn label(&self) -> &'static str {
        match self {
            WorkflowState::Intake => "Intake",
            WorkflowState::PreflightRiskCheck => "Preflight_Risk_Check",
            WorkflowState::PoRefinement => "PO_Refinement",
            WorkflowState::BacklogReady => "Backlog_Ready",
            WorkflowState::TaskDecomposition => "Task_Decomposition",
            WorkflowState::InDevelopment => "In_Development",
            WorkflowState::CodeReview => "Code_Review",
            WorkflowState::Integrated => "Integrated",
            WorkflowState::QaE2e => "QA_E2E",
            WorkflowState::PoAcceptance => "PO_Acceptance",
            WorkflowState::Release => "Release",
            WorkflowState::Done => "Done",
        }
    }

    /// Position in the pipeline sequence.
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|s| s == self)
            .unwrap_or_default()
    }

    /// The wire labels for all states, in pipeline order.
    pub fn labels() -> Vec<&'static str> {
        Self::ALL.iter().map(WorkflowState::label).collect()
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for WorkflowState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|state| state.label() == s)
            .ok_or_else(|| UnknownState(s.to_string()))
    }
}

/// A state label outside the fixed list
#[derive(Debug, thiserror::Error)]
#[error("unknown workflow state: {0}")]
pub struct UnknownState(pub String);

/// Transition check used when enforcement is enabled.
///
/// Legal moves are the immediate successor (normal progress) and any
/// earlier state (rework, including the forced `In_Development` rework on
/// a failed test). Forward jumps past the successor are rejected.
pub fn is_legal_transition(from: WorkflowState, to: WorkflowState) -> bool {
    to.index() <= from.index() || to.index() == from.index() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_round_trip_through_serde() {
        for state in WorkflowState::ALL {
            let json = serde_json::to_string(&state).unwrap();
            assert_eq!(json, format!("\"{}\"", state.label()));
            let back: WorkflowState = serde_json::from_str(&json).unwrap();
            assert_eq!(back, state);
        }
    }

    #[test]
    fn unknown_label_is_rejected() {
        assert!(serde_json::from_str::<WorkflowState>("\"Shipped\"").is_err());
        assert!("Shipped".parse::<WorkflowState>().is_err());
    }

    #[test]
    fn pipeline_order_is_fixed() {
        assert_eq!(WorkflowState::ALL.len(), 12);
        assert_eq!(WorkflowState::Intake.index(), 0);
        assert_eq!(WorkflowState::Done.index(), 11);
        assert_eq!(WorkflowState::labels()[5], "In_Development");
    }

    #[test]
    fn successor_and_rework_are_legal() {
        assert!(is_legal_transition(
            WorkflowState::Intake,
            WorkflowState::PreflightRiskCheck
        ));
        // Rework: QA failure forces development again
        assert!(is_legal_transition(
            WorkflowState::QaE2e,
            WorkflowState::InDevelopment
        ));
        // Re-entering the same state is allowed
        assert!(is_legal_transition(
            WorkflowState::Release,
            WorkflowState::Release
        ));
    }

    #[test]
    fn forward_jumps_are_illegal() {
        assert!(!is_legal_transition(
            WorkflowState::Intake,
            WorkflowState::Done
        ));
        assert!(!is_legal_transition(
            WorkflowState::PoRefinement,
            WorkflowState::InDevelopment
        ));
    }
}
