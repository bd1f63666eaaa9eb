//! Conversion between persisted workflow JSON and typed structs.
//!
//! The main entry point is [`from_json`], which takes a
//! `&serde_json::Value` and produces an [`AssessmentWorkflow`].
//! Errors name the missing field or the offending step so the host can
//! point at the broken record instead of reporting a bare serde error.

use crate::types::*;
use std::fmt;

/// Errors during workflow JSON conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterchangeError {
    /// The workflow is missing a required top-level field.
    MissingField { field: String },
    /// A step could not be parsed.
    InvalidStep { id: String, message: String },
    /// The workflow structure is invalid.
    InvalidWorkflow(String),
}

impl fmt::Display for InterchangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InterchangeError::MissingField { field } => {
                write!(f, "workflow missing required field: '{}'", field)
            }
            InterchangeError::InvalidStep { id, message } => {
                write!(f, "step '{}': {}", id, message)
            }
            InterchangeError::InvalidWorkflow(msg) => {
                write!(f, "invalid workflow: {}", msg)
            }
        }
    }
}

impl std::error::Error for InterchangeError {}

/// Deserialize a persisted workflow into typed structs.
///
/// Only the shape is checked here. Dependency references and cycles are
/// the engine's concern (`ecoassess_engine::check_integrity`).
pub fn from_json(value: &serde_json::Value) -> Result<AssessmentWorkflow, InterchangeError> {
    if !value.is_object() {
        return Err(InterchangeError::InvalidWorkflow(
            "workflow must be a JSON object".to_string(),
        ));
    }

    let id = required_str(value, "id")?;
    let assessment_id = required_str(value, "assessmentId")?;
    let site_code = required_str(value, "siteCode")?;
    let site_name = required_str(value, "siteName")?;
    let template_id = required_str(value, "templateId")?;
    let status: WorkflowStatus = required_enum(value, "status")?;
    let current_phase: Phase = required_enum(value, "currentPhase")?;
    let assigned_to = required_str(value, "assignedTo")?;
    let assigned_by = required_str(value, "assignedBy")?;
    let due_date = required_str(value, "dueDate")?;
    let created_at = required_str(value, "createdAt")?;
    let updated_at = required_str(value, "updatedAt")?;

    let steps_arr = value
        .get("steps")
        .and_then(|s| s.as_array())
        .ok_or_else(|| InterchangeError::MissingField {
            field: "steps".to_string(),
        })?;

    let mut steps = Vec::with_capacity(steps_arr.len());
    for (index, obj) in steps_arr.iter().enumerate() {
        steps.push(parse_step(index, obj)?);
    }

    Ok(AssessmentWorkflow {
        id,
        assessment_id,
        site_code,
        site_name,
        template_id,
        status,
        current_phase,
        steps,
        assigned_to,
        assigned_by,
        due_date,
        created_at,
        updated_at,
    })
}

/// Serialize a workflow into its persisted JSON shape.
pub fn to_json(workflow: &AssessmentWorkflow) -> Result<serde_json::Value, InterchangeError> {
    serde_json::to_value(workflow).map_err(|e| InterchangeError::InvalidWorkflow(e.to_string()))
}

// ── Parsing helpers ─────────────────────────────────────────────────

fn required_str(obj: &serde_json::Value, field: &str) -> Result<String, InterchangeError> {
    match obj.get(field) {
        None | Some(serde_json::Value::Null) => Err(InterchangeError::MissingField {
            field: field.to_string(),
        }),
        Some(v) => v.as_str().map(|s| s.to_string()).ok_or_else(|| {
            InterchangeError::InvalidWorkflow(format!("'{}' must be a string", field))
        }),
    }
}

fn required_enum<T: serde::de::DeserializeOwned>(
    obj: &serde_json::Value,
    field: &str,
) -> Result<T, InterchangeError> {
    let raw = obj.get(field).ok_or_else(|| InterchangeError::MissingField {
        field: field.to_string(),
    })?;
    serde_json::from_value(raw.clone())
        .map_err(|e| InterchangeError::InvalidWorkflow(format!("'{}': {}", field, e)))
}

fn parse_step(index: usize, obj: &serde_json::Value) -> Result<WorkflowStep, InterchangeError> {
    let id = obj
        .get("id")
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            InterchangeError::InvalidWorkflow(format!("step at index {} has no 'id'", index))
        })?
        .to_string();

    serde_json::from_value(obj.clone()).map_err(|e| InterchangeError::InvalidStep {
        id,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn make_workflow(steps: Vec<serde_json::Value>) -> serde_json::Value {
        json!({
            "id": "workflow-1",
            "assessmentId": "ASM-001",
            "siteCode": "WM-04",
            "siteName": "Whitmoor Common",
            "templateId": "standard-assessment",
            "status": "not_started",
            "currentPhase": "desk_research",
            "steps": steps,
            "assignedTo": "j.okafor",
            "assignedBy": "r.hale",
            "dueDate": "2026-11-30",
            "createdAt": "2026-10-01T09:00:00Z",
            "updatedAt": "2026-10-01T09:00:00Z"
        })
    }

    #[test]
    fn test_empty_workflow() {
        let wf = from_json(&make_workflow(vec![])).unwrap();
        assert_eq!(wf.id, "workflow-1");
        assert_eq!(wf.site_code, "WM-04");
        assert_eq!(wf.status, WorkflowStatus::NotStarted);
        assert_eq!(wf.current_phase, Phase::DeskResearch);
        assert!(wf.steps.is_empty());
    }

    #[test]
    fn test_parse_step_with_optionals() {
        let wf = from_json(&make_workflow(vec![json!({
            "id": "field-2",
            "name": "Habitat survey",
            "description": "Phase 1 habitat mapping",
            "phase": "field_research",
            "status": "in_progress",
            "dependencies": ["field-1"],
            "assignedTo": "a.singh",
            "startedAt": "2026-10-02T08:30:00Z",
            "outputs": ["map-17"]
        })]))
        .unwrap();

        let step = &wf.steps[0];
        assert_eq!(step.phase, Phase::FieldResearch);
        assert_eq!(step.status, StepStatus::InProgress);
        assert_eq!(step.dependencies, vec!["field-1"]);
        assert_eq!(step.assigned_to.as_deref(), Some("a.singh"));
        assert_eq!(step.outputs.as_deref(), Some(&["map-17".to_string()][..]));
        assert!(step.completed_at.is_none());
    }

    #[test]
    fn test_missing_steps_array() {
        let mut value = make_workflow(vec![]);
        value.as_object_mut().unwrap().remove("steps");
        match from_json(&value).unwrap_err() {
            InterchangeError::MissingField { field } => assert_eq!(field, "steps"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_site_code() {
        let mut value = make_workflow(vec![]);
        value.as_object_mut().unwrap().remove("siteCode");
        match from_json(&value).unwrap_err() {
            InterchangeError::MissingField { field } => assert_eq!(field, "siteCode"),
            other => panic!("expected MissingField, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_step_status_names_step() {
        let value = make_workflow(vec![json!({
            "id": "desk-1",
            "name": "Scope",
            "phase": "desk_research",
            "status": "finished"
        })]);
        match from_json(&value).unwrap_err() {
            InterchangeError::InvalidStep { id, message } => {
                assert_eq!(id, "desk-1");
                assert!(message.contains("finished"), "message: {}", message);
            }
            other => panic!("expected InvalidStep, got {:?}", other),
        }
    }

    #[test]
    fn test_step_without_id() {
        let value = make_workflow(vec![json!({"name": "anonymous"})]);
        let err = from_json(&value).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid workflow: step at index 0 has no 'id'"
        );
    }

    #[test]
    fn test_unknown_phase_in_workflow() {
        let mut value = make_workflow(vec![]);
        value["currentPhase"] = json!("monitoring");
        assert!(matches!(
            from_json(&value),
            Err(InterchangeError::InvalidWorkflow(_))
        ));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(from_json(&json!([1, 2, 3])).is_err());
    }

    #[test]
    fn test_to_json_uses_camel_case() {
        let wf = from_json(&make_workflow(vec![])).unwrap();
        let json = to_json(&wf).unwrap();
        assert_eq!(json["assessmentId"], "ASM-001");
        assert_eq!(json["currentPhase"], "desk_research");
    }
}
