//! Validates engine output against the persisted workflow schema at
//! schema/workflow-schema.json, and checks that stored JSON ingests back.

use std::path::Path;

use ecoassess_engine::{
    create_standard_assessment_workflow, ingest, record_outputs, update_step_status,
    AssessmentSpec, EngineError, FixedClock,
};
use ecoassess_interchange::{to_json, StepStatus};
use time::macros::datetime;

fn validator() -> jsonschema::Validator {
    let schema_path =
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../schema/workflow-schema.json");
    let schema_src = std::fs::read_to_string(&schema_path)
        .unwrap_or_else(|e| panic!("Failed to read schema at {}: {}", schema_path.display(), e));
    let schema_value: serde_json::Value = serde_json::from_str(&schema_src).unwrap();
    jsonschema::validator_for(&schema_value)
        .unwrap_or_else(|e| panic!("Failed to compile schema: {}", e))
}

fn spec() -> AssessmentSpec {
    AssessmentSpec {
        assessment_id: "ASM-2026-040".to_string(),
        site_code: "CLF-03".to_string(),
        site_name: "Clifftop Grassland".to_string(),
        assigned_to: "s.ng".to_string(),
        assigned_by: "r.hale".to_string(),
        due_date: "2027-02-14".to_string(),
    }
}

#[test]
fn fresh_workflow_matches_schema() {
    let clock = FixedClock(datetime!(2026-10-19 11:00 UTC));
    let wf = create_standard_assessment_workflow(&spec(), &clock);
    let json = to_json(&wf).unwrap();
    if let Err(error) = validator().validate(&json) {
        panic!("factory output failed schema validation: {}", error);
    }
}

#[test]
fn mutated_workflow_matches_schema_and_ingests() {
    let clock = FixedClock(datetime!(2026-10-19 11:00 UTC));
    let wf = create_standard_assessment_workflow(&spec(), &clock);
    let wf = update_step_status(&wf, "desk-1", StepStatus::Completed, &clock).unwrap();
    let wf = update_step_status(&wf, "desk-2", StepStatus::InProgress, &clock).unwrap();
    let wf = record_outputs(&wf, "desk-1", &["scope-memo"], &clock).unwrap();

    let json = to_json(&wf).unwrap();
    assert!(validator().is_valid(&json));
    assert_eq!(json["steps"][0]["completedAt"], "2026-10-19T11:00:00Z");

    let back = ingest(&json).unwrap();
    assert_eq!(back, wf);
}

#[test]
fn ingest_rejects_cyclic_workflow() {
    let clock = FixedClock(datetime!(2026-10-19 11:00 UTC));
    let wf = create_standard_assessment_workflow(&spec(), &clock);
    let mut json = to_json(&wf).unwrap();
    // desk-1 now waits on desk-5, which transitively waits on desk-1
    json["steps"][0]["dependencies"] = serde_json::json!(["desk-5"]);

    assert!(validator().is_valid(&json));
    match ingest(&json) {
        Err(EngineError::CyclicDependencies { steps }) => {
            assert!(steps.contains(&"desk-1".to_string()));
            assert!(steps.contains(&"report-5".to_string()));
        }
        other => panic!("expected CyclicDependencies, got {:?}", other),
    }
}

#[test]
fn ingest_reports_shape_errors() {
    let json = serde_json::json!({"id": "workflow-x"});
    assert!(matches!(ingest(&json), Err(EngineError::Interchange(_))));
}
