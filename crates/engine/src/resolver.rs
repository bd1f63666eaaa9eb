//! Dependency resolution: which steps are ready, which are blocked, and why.
//!
//! A step is ready ("next") when it is not completed and every one of its
//! dependencies is completed. It is blocked when it is not completed and
//! at least one dependency is not. A dependency ID that matches no step
//! counts as not completed. Results keep the workflow's step order.

use std::collections::BTreeMap;

use ecoassess_interchange::{AssessmentWorkflow, StepStatus, WorkflowStep};

use crate::error::EngineError;

/// Step ID -> status for every step in the snapshot.
fn status_index(workflow: &AssessmentWorkflow) -> BTreeMap<&str, StepStatus> {
    workflow
        .steps
        .iter()
        .map(|s| (s.id.as_str(), s.status))
        .collect()
}

fn unsatisfied<'a>(step: &'a WorkflowStep, index: &BTreeMap<&str, StepStatus>) -> Vec<&'a str> {
    step.dependencies
        .iter()
        .filter(|dep| !index.get(dep.as_str()).is_some_and(|s| s.is_completed()))
        .map(String::as_str)
        .collect()
}

/// Every non-completed step whose dependencies are all completed.
///
/// Steps already `in_progress` are included: this reports eligibility,
/// not "not yet started".
pub fn next_steps(workflow: &AssessmentWorkflow) -> Vec<&WorkflowStep> {
    let index = status_index(workflow);
    workflow
        .steps
        .iter()
        .filter(|s| !s.status.is_completed())
        .filter(|s| unsatisfied(s, &index).is_empty())
        .collect()
}

/// Every non-completed step with at least one dependency not completed.
pub fn blocked_steps(workflow: &AssessmentWorkflow) -> Vec<&WorkflowStep> {
    let index = status_index(workflow);
    workflow
        .steps
        .iter()
        .filter(|s| !s.status.is_completed())
        .filter(|s| !unsatisfied(s, &index).is_empty())
        .collect()
}

/// Dependency IDs of `step_id` that are not yet completed, in declared order.
///
/// Empty for a step that is ready or already completed.
pub fn blockers<'a>(
    workflow: &'a AssessmentWorkflow,
    step_id: &str,
) -> Result<Vec<&'a str>, EngineError> {
    let step = workflow
        .step(step_id)
        .ok_or_else(|| EngineError::StepNotFound {
            workflow_id: workflow.id.clone(),
            step_id: step_id.to_string(),
        })?;
    if step.status.is_completed() {
        return Ok(Vec::new());
    }
    let index = status_index(workflow);
    Ok(unsatisfied(step, &index))
}

/// Whether a single step is currently eligible to be worked on.
pub fn is_ready(workflow: &AssessmentWorkflow, step_id: &str) -> Result<bool, EngineError> {
    let step = workflow
        .step(step_id)
        .ok_or_else(|| EngineError::StepNotFound {
            workflow_id: workflow.id.clone(),
            step_id: step_id.to_string(),
        })?;
    Ok(!step.status.is_completed() && blockers(workflow, step_id)?.is_empty())
}
