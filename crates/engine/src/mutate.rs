//! Immutable step updates.
//!
//! Every function here takes a workflow snapshot by reference and returns
//! a new snapshot; the input is never modified. Each successful call
//! refreshes the workflow's `updated_at`. An unknown step ID is reported
//! as `EngineError::StepNotFound` rather than silently ignored.

use ecoassess_interchange::{
    AssessmentWorkflow, Clock, QualityCheckResult, StepStatus, WorkflowStep,
};
use tracing::debug;

use crate::aggregate::{derived_phase, derived_status};
use crate::error::EngineError;

/// Clone the workflow, apply `apply` to the matching step, stamp `updated_at`.
fn with_step<F>(
    workflow: &AssessmentWorkflow,
    step_id: &str,
    clock: &dyn Clock,
    apply: F,
) -> Result<AssessmentWorkflow, EngineError>
where
    F: FnOnce(&mut WorkflowStep, &str),
{
    let position = workflow
        .steps
        .iter()
        .position(|s| s.id == step_id)
        .ok_or_else(|| EngineError::StepNotFound {
            workflow_id: workflow.id.clone(),
            step_id: step_id.to_string(),
        })?;

    let now = clock.timestamp();
    let mut next = workflow.clone();
    apply(&mut next.steps[position], &now);
    next.updated_at = now;
    Ok(next)
}

/// Set a step's status.
///
/// Entering `in_progress` stamps `started_at` only when it is unset.
/// Entering `completed` always stamps `completed_at`.
pub fn update_step_status(
    workflow: &AssessmentWorkflow,
    step_id: &str,
    new_status: StepStatus,
    clock: &dyn Clock,
) -> Result<AssessmentWorkflow, EngineError> {
    let next = with_step(workflow, step_id, clock, |step, now| {
        step.status = new_status;
        match new_status {
            StepStatus::InProgress if step.started_at.is_none() => {
                step.started_at = Some(now.to_string());
            }
            StepStatus::Completed => {
                step.completed_at = Some(now.to_string());
            }
            _ => {}
        }
    })?;
    debug!(
        workflow_id = %next.id,
        step_id,
        status = %new_status,
        "step status updated"
    );
    Ok(next)
}

pub fn assign_step(
    workflow: &AssessmentWorkflow,
    step_id: &str,
    assignee: &str,
    clock: &dyn Clock,
) -> Result<AssessmentWorkflow, EngineError> {
    with_step(workflow, step_id, clock, |step, _| {
        step.assigned_to = Some(assignee.to_string());
    })
}

/// Append artifact IDs to a step's outputs, skipping ones already recorded.
pub fn record_outputs(
    workflow: &AssessmentWorkflow,
    step_id: &str,
    artifact_ids: &[&str],
    clock: &dyn Clock,
) -> Result<AssessmentWorkflow, EngineError> {
    with_step(workflow, step_id, clock, |step, _| {
        let outputs = step.outputs.get_or_insert_with(Vec::new);
        for id in artifact_ids {
            if !outputs.iter().any(|o| o == id) {
                outputs.push(id.to_string());
            }
        }
    })
}

/// Store a quality check's errors on a step.
///
/// A failed check also moves the step to `needs_review`; a passing check
/// clears previous errors and leaves the status alone.
pub fn record_validation(
    workflow: &AssessmentWorkflow,
    step_id: &str,
    result: &QualityCheckResult,
    clock: &dyn Clock,
) -> Result<AssessmentWorkflow, EngineError> {
    let next = with_step(workflow, step_id, clock, |step, _| {
        if result.passed {
            step.validation_errors = None;
        } else {
            step.validation_errors = Some(result.errors.clone());
            step.status = StepStatus::NeedsReview;
        }
    })?;
    debug!(
        workflow_id = %next.id,
        step_id,
        passed = result.passed,
        errors = result.errors.len(),
        "validation recorded"
    );
    Ok(next)
}

/// Overwrite the stored `status` and `current_phase` with values derived
/// from the steps.
pub fn refresh_aggregates(workflow: &AssessmentWorkflow, clock: &dyn Clock) -> AssessmentWorkflow {
    let mut next = workflow.clone();
    next.status = derived_status(workflow);
    next.current_phase = derived_phase(workflow);
    next.updated_at = clock.timestamp();
    next
}
