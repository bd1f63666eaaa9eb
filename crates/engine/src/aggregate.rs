//! Workflow-level status and phase derived from step state.
//!
//! The stored `status` / `current_phase` on a workflow are labels the
//! caller maintains. These functions compute what they should be.

use ecoassess_interchange::{AssessmentWorkflow, Phase, StepStatus, WorkflowStatus};

pub fn derived_status(workflow: &AssessmentWorkflow) -> WorkflowStatus {
    if workflow.steps.is_empty() {
        return WorkflowStatus::NotStarted;
    }
    if workflow.steps.iter().all(|s| s.status.is_completed()) {
        WorkflowStatus::Completed
    } else if workflow
        .steps
        .iter()
        .any(|s| s.status != StepStatus::NotStarted)
    {
        WorkflowStatus::InProgress
    } else {
        WorkflowStatus::NotStarted
    }
}

/// First phase, in execution order, that still has unfinished work.
/// A finished (or empty) workflow reports `Reporting`.
pub fn derived_phase(workflow: &AssessmentWorkflow) -> Phase {
    Phase::ALL
        .into_iter()
        .find(|phase| {
            workflow
                .steps_in_phase(*phase)
                .any(|s| !s.status.is_completed())
        })
        .unwrap_or(Phase::Reporting)
}
