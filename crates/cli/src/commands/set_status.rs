use std::path::Path;
use std::process;
use std::str::FromStr;

use ecoassess_engine::{refresh_aggregates, update_step_status, SystemClock};
use ecoassess_interchange::StepStatus;

use crate::{load_workflow, report_error, workflow_json, write_file, OutputFormat};

pub(crate) fn cmd_set_status(
    path: &Path,
    step_id: &str,
    status: &str,
    in_place: bool,
    refresh: bool,
    output: OutputFormat,
    quiet: bool,
) {
    let new_status = match StepStatus::from_str(status) {
        Ok(s) => s,
        Err(e) => {
            report_error(&e, output, quiet);
            process::exit(1);
        }
    };

    let workflow = load_workflow(path, output, quiet);
    let clock = SystemClock;
    let mut updated = match update_step_status(&workflow, step_id, new_status, &clock) {
        Ok(w) => w,
        Err(e) => {
            report_error(&e.to_string(), output, quiet);
            process::exit(1);
        }
    };
    if refresh {
        updated = refresh_aggregates(&updated, &clock);
    }

    let rendered = workflow_json(&updated, output, quiet);
    if !in_place {
        println!("{}", rendered);
        return;
    }

    write_file(path, &rendered, output, quiet);
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => println!("{}: {} -> {}", updated.id, step_id, new_status),
        OutputFormat::Json => {
            let summary = serde_json::json!({
                "id": updated.id,
                "step": step_id,
                "status": new_status,
                "workflowStatus": updated.status,
                "currentPhase": updated.current_phase,
            });
            println!("{}", summary);
        }
    }
}
