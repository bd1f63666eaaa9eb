use std::path::Path;
use std::process;

use crate::{read_json, report_error, OutputFormat};

static WORKFLOW_SCHEMA_STR: &str = include_str!("../../../../schema/workflow-schema.json");

/// Schema violations for `doc`, one message per error.
pub(crate) fn schema_errors(doc: &serde_json::Value) -> Result<Vec<String>, String> {
    let schema: serde_json::Value = serde_json::from_str(WORKFLOW_SCHEMA_STR)
        .map_err(|e| format!("internal error: failed to parse embedded workflow schema: {}", e))?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| format!("internal error: failed to compile schema: {}", e))?;
    Ok(validator.iter_errors(doc).map(|e| format!("{}", e)).collect())
}

pub(crate) fn cmd_check(path: &Path, output: OutputFormat, quiet: bool) {
    let doc = read_json(path, output, quiet);

    // Step 1: shape
    let errors = match schema_errors(&doc) {
        Ok(errors) => errors,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    if !errors.is_empty() {
        report_invalid("schema", &errors, output, quiet);
        process::exit(1);
    }

    // Step 2: dependency graph
    let workflow = match ecoassess_engine::ingest(&doc) {
        Ok(w) => w,
        Err(e) => {
            report_invalid("dependencies", &[e.to_string()], output, quiet);
            process::exit(1);
        }
    };

    if !quiet {
        match output {
            OutputFormat::Text => println!("valid ({} steps)", workflow.steps.len()),
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": true,
                    "id": workflow.id,
                    "steps": workflow.steps.len(),
                });
                println!("{}", json);
            }
        }
    }
}

fn report_invalid(stage: &str, errors: &[String], output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Text => {
            if !quiet {
                eprintln!("invalid workflow ({})", stage);
                for err in errors {
                    eprintln!("  - {}", err);
                }
            }
        }
        OutputFormat::Json => {
            let json = serde_json::json!({
                "valid": false,
                "stage": stage,
                "errors": errors,
            });
            eprintln!(
                "{}",
                serde_json::to_string_pretty(&json).unwrap_or_default()
            );
        }
    }
}
