//! The canonical 16-step site assessment workflow.
//!
//! Step IDs and dependency edges are fixed; display layers and stored
//! workflows refer to them directly.

use ecoassess_interchange::{
    AssessmentWorkflow, Clock, Phase, WorkflowStatus, WorkflowStep, STANDARD_TEMPLATE_ID,
};
use tracing::debug;
use uuid::Uuid;

/// Metadata a caller supplies when opening a new assessment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssessmentSpec {
    pub assessment_id: String,
    pub site_code: String,
    pub site_name: String,
    pub assigned_to: String,
    pub assigned_by: String,
    /// Calendar date, `YYYY-MM-DD`.
    pub due_date: String,
}

struct StepTemplate {
    id: &'static str,
    name: &'static str,
    description: &'static str,
    phase: Phase,
    depends_on: &'static [&'static str],
}

const STANDARD_STEPS: &[StepTemplate] = &[
    StepTemplate {
        id: "desk-1",
        name: "Define assessment scope",
        description: "Confirm site boundary, survey objectives and applicable guidance",
        phase: Phase::DeskResearch,
        depends_on: &[],
    },
    StepTemplate {
        id: "desk-2",
        name: "Biological records search",
        description: "Request species and habitat records from the local records centre",
        phase: Phase::DeskResearch,
        depends_on: &["desk-1"],
    },
    StepTemplate {
        id: "desk-3",
        name: "Designated sites review",
        description: "Identify statutory and non-statutory designations within the search radius",
        phase: Phase::DeskResearch,
        depends_on: &["desk-1"],
    },
    StepTemplate {
        id: "desk-4",
        name: "Habitat mapping review",
        description: "Interpret aerial imagery and existing habitat inventories",
        phase: Phase::DeskResearch,
        depends_on: &["desk-2"],
    },
    StepTemplate {
        id: "desk-5",
        name: "Desk study summary",
        description: "Summarise constraints and plan the field survey effort",
        phase: Phase::DeskResearch,
        depends_on: &["desk-2", "desk-3", "desk-4"],
    },
    StepTemplate {
        id: "field-1",
        name: "Survey planning and access",
        description: "Agree access, risk assessment and survey calendar",
        phase: Phase::FieldResearch,
        depends_on: &["desk-5"],
    },
    StepTemplate {
        id: "field-2",
        name: "Habitat condition survey",
        description: "Map habitats and score condition on site",
        phase: Phase::FieldResearch,
        depends_on: &["field-1"],
    },
    StepTemplate {
        id: "field-3",
        name: "Protected species survey",
        description: "Survey for protected and notable species",
        phase: Phase::FieldResearch,
        depends_on: &["field-1"],
    },
    StepTemplate {
        id: "field-4",
        name: "Field data upload",
        description: "Upload survey sheets, GPS tracks and photographs",
        phase: Phase::FieldResearch,
        depends_on: &["field-2", "field-3"],
    },
    StepTemplate {
        id: "field-4a",
        name: "Field data quality check",
        description: "Validate uploaded records against data quality rules",
        phase: Phase::FieldResearch,
        depends_on: &["field-4"],
    },
    StepTemplate {
        id: "field-5",
        name: "Invasive species and threats log",
        description: "Record invasive species, pressures and remediation needs",
        phase: Phase::FieldResearch,
        depends_on: &["field-2", "field-3"],
    },
    StepTemplate {
        id: "report-1",
        name: "Draft findings",
        description: "Compile baseline conditions from desk and field results",
        phase: Phase::Reporting,
        depends_on: &["field-4a", "field-5"],
    },
    StepTemplate {
        id: "report-2",
        name: "Impact assessment",
        description: "Assess likely effects on habitats and species",
        phase: Phase::Reporting,
        depends_on: &["report-1"],
    },
    StepTemplate {
        id: "report-3",
        name: "Mitigation and remediation actions",
        description: "Recommend avoidance, mitigation and remediation measures",
        phase: Phase::Reporting,
        depends_on: &["report-2"],
    },
    StepTemplate {
        id: "report-4",
        name: "Technical review",
        description: "Independent review of the draft report",
        phase: Phase::Reporting,
        depends_on: &["report-3"],
    },
    StepTemplate {
        id: "report-5",
        name: "Final report sign-off",
        description: "Issue the final assessment report",
        phase: Phase::Reporting,
        depends_on: &["report-4"],
    },
];

/// The standard steps, all `not_started`, in canonical order.
pub fn standard_steps() -> Vec<WorkflowStep> {
    STANDARD_STEPS
        .iter()
        .map(|t| WorkflowStep::new(t.id, t.name, t.description, t.phase, t.depends_on))
        .collect()
}

/// Build a fresh standard assessment workflow.
pub fn create_standard_assessment_workflow(
    spec: &AssessmentSpec,
    clock: &dyn Clock,
) -> AssessmentWorkflow {
    let now = clock.timestamp();
    let workflow = AssessmentWorkflow {
        id: format!("workflow-{}", Uuid::new_v4()),
        assessment_id: spec.assessment_id.clone(),
        site_code: spec.site_code.clone(),
        site_name: spec.site_name.clone(),
        template_id: STANDARD_TEMPLATE_ID.to_string(),
        status: WorkflowStatus::NotStarted,
        current_phase: Phase::DeskResearch,
        steps: standard_steps(),
        assigned_to: spec.assigned_to.clone(),
        assigned_by: spec.assigned_by.clone(),
        due_date: spec.due_date.clone(),
        created_at: now.clone(),
        updated_at: now,
    };
    debug!(
        workflow_id = %workflow.id,
        assessment_id = %workflow.assessment_id,
        site_code = %workflow.site_code,
        "standard assessment workflow created"
    );
    workflow
}

#[cfg(test)]
mod tests {
    use super::*;
    use ecoassess_interchange::{FixedClock, StepStatus};
    use time::macros::datetime;

    fn spec() -> AssessmentSpec {
        AssessmentSpec {
            assessment_id: "ASM-2026-014".to_string(),
            site_code: "RVR-07".to_string(),
            site_name: "Riverside Meadows".to_string(),
            assigned_to: "j.okafor".to_string(),
            assigned_by: "r.hale".to_string(),
            due_date: "2026-12-15".to_string(),
        }
    }

    fn clock() -> FixedClock {
        FixedClock(datetime!(2026-10-19 08:00 UTC))
    }

    fn deps_of<'a>(wf: &'a AssessmentWorkflow, id: &str) -> Vec<&'a str> {
        wf.step(id)
            .unwrap()
            .dependencies
            .iter()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn sixteen_steps_split_five_six_five() {
        let wf = create_standard_assessment_workflow(&spec(), &clock());
        assert_eq!(wf.steps.len(), 16);
        assert_eq!(wf.steps_in_phase(Phase::DeskResearch).count(), 5);
        assert_eq!(wf.steps_in_phase(Phase::FieldResearch).count(), 6);
        assert_eq!(wf.steps_in_phase(Phase::Reporting).count(), 5);
        assert!(wf.steps.iter().all(|s| s.status == StepStatus::NotStarted));
    }

    #[test]
    fn dependency_table_matches() {
        let wf = create_standard_assessment_workflow(&spec(), &clock());
        let expected: &[(&str, &[&str])] = &[
            ("desk-1", &[]),
            ("desk-2", &["desk-1"]),
            ("desk-3", &["desk-1"]),
            ("desk-4", &["desk-2"]),
            ("desk-5", &["desk-2", "desk-3", "desk-4"]),
            ("field-1", &["desk-5"]),
            ("field-2", &["field-1"]),
            ("field-3", &["field-1"]),
            ("field-4", &["field-2", "field-3"]),
            ("field-4a", &["field-4"]),
            ("field-5", &["field-2", "field-3"]),
            ("report-1", &["field-4a", "field-5"]),
            ("report-2", &["report-1"]),
            ("report-3", &["report-2"]),
            ("report-4", &["report-3"]),
            ("report-5", &["report-4"]),
        ];
        let order: Vec<&str> = wf.steps.iter().map(|s| s.id.as_str()).collect();
        let expected_order: Vec<&str> = expected.iter().map(|(id, _)| *id).collect();
        assert_eq!(order, expected_order);
        for (id, deps) in expected {
            assert_eq!(deps_of(&wf, id), deps.to_vec(), "dependencies of {}", id);
        }
    }

    #[test]
    fn metadata_and_timestamps() {
        let wf = create_standard_assessment_workflow(&spec(), &clock());
        assert_eq!(wf.template_id, "standard-assessment");
        assert_eq!(wf.status, WorkflowStatus::NotStarted);
        assert_eq!(wf.current_phase, Phase::DeskResearch);
        assert_eq!(wf.site_name, "Riverside Meadows");
        assert_eq!(wf.due_date, "2026-12-15");
        assert_eq!(wf.created_at, "2026-10-19T08:00:00Z");
        assert_eq!(wf.updated_at, wf.created_at);
        assert!(wf.id.starts_with("workflow-"));
    }

    #[test]
    fn ids_are_unique_per_call() {
        let a = create_standard_assessment_workflow(&spec(), &clock());
        let b = create_standard_assessment_workflow(&spec(), &clock());
        assert_ne!(a.id, b.id);
    }
}
