//! Completion percentages, overall and per phase.

use ecoassess_interchange::{AssessmentWorkflow, Phase, WorkflowStep};
use serde::Serialize;

/// Completion figures for one phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseProgress {
    pub phase: Phase,
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

/// round(100 * completed / total), half rounding up. Zero when `total` is zero.
fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    let rounded = (200 * completed + total) / (2 * total);
    rounded.min(100) as u8
}

fn count<'a>(steps: impl Iterator<Item = &'a WorkflowStep>) -> (usize, usize) {
    steps.fold((0, 0), |(done, total), s| {
        (done + usize::from(s.status.is_completed()), total + 1)
    })
}

/// Percentage of all steps that are completed. An empty workflow is 0%.
pub fn workflow_progress(workflow: &AssessmentWorkflow) -> u8 {
    let (done, total) = count(workflow.steps.iter());
    percent(done, total)
}

/// Percentage of the phase's steps that are completed; 0 for a phase with no steps.
pub fn phase_progress(workflow: &AssessmentWorkflow, phase: Phase) -> u8 {
    let (done, total) = count(workflow.steps_in_phase(phase));
    percent(done, total)
}

pub fn phase_breakdown(workflow: &AssessmentWorkflow) -> Vec<PhaseProgress> {
    Phase::ALL
        .into_iter()
        .map(|phase| {
            let (completed, total) = count(workflow.steps_in_phase(phase));
            PhaseProgress {
                phase,
                completed,
                total,
                percent: percent(completed, total),
            }
        })
        .collect()
}
