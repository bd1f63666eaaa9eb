use std::path::Path;
use std::process;

use ecoassess_engine::{
    blocked_steps, blockers, derived_phase, derived_status, next_steps, phase_breakdown,
    workflow_progress,
};
use ecoassess_interchange::AssessmentWorkflow;
use serde_json::{json, Value};

use crate::{load_workflow, report_error, OutputFormat};

/// A blocked step together with the dependencies it is waiting on.
struct BlockedEntry<'a> {
    id: &'a str,
    name: &'a str,
    waiting_on: Vec<&'a str>,
}

fn blocked_entries(workflow: &AssessmentWorkflow) -> Result<Vec<BlockedEntry<'_>>, String> {
    blocked_steps(workflow)
        .into_iter()
        .map(|step| {
            let waiting_on = blockers(workflow, &step.id).map_err(|e| e.to_string())?;
            Ok(BlockedEntry {
                id: &step.id,
                name: &step.name,
                waiting_on,
            })
        })
        .collect()
}

pub(crate) fn status_report(workflow: &AssessmentWorkflow) -> Result<Value, String> {
    let blocked = blocked_entries(workflow)?;
    Ok(json!({
        "id": workflow.id,
        "assessmentId": workflow.assessment_id,
        "siteCode": workflow.site_code,
        "siteName": workflow.site_name,
        "status": workflow.status,
        "currentPhase": workflow.current_phase,
        "derivedStatus": derived_status(workflow),
        "derivedPhase": derived_phase(workflow),
        "progress": workflow_progress(workflow),
        "phases": phase_breakdown(workflow),
        "next": next_steps(workflow)
            .iter()
            .map(|s| json!({"id": s.id, "name": s.name, "status": s.status}))
            .collect::<Vec<_>>(),
        "blocked": blocked
            .iter()
            .map(|b| json!({"id": b.id, "name": b.name, "waitingOn": b.waiting_on}))
            .collect::<Vec<_>>(),
    }))
}

fn print_text(workflow: &AssessmentWorkflow, blocked: &[BlockedEntry<'_>]) {
    println!(
        "{} {} ({})",
        workflow.site_code, workflow.site_name, workflow.id
    );
    println!(
        "status: {}, phase: {}",
        derived_status(workflow).label(),
        derived_phase(workflow).label()
    );
    println!("progress: {}%", workflow_progress(workflow));
    for phase in phase_breakdown(workflow) {
        println!(
            "  {:<16} {:>2}/{:<2} {:>3}%",
            phase.phase.label(),
            phase.completed,
            phase.total,
            phase.percent
        );
    }

    let next = next_steps(workflow);
    if !next.is_empty() {
        println!("next:");
        for step in next {
            println!("  {:<10} {} [{}]", step.id, step.name, step.status.label());
        }
    }
    if !blocked.is_empty() {
        println!("blocked:");
        for entry in blocked {
            println!(
                "  {:<10} {} (waiting on {})",
                entry.id,
                entry.name,
                entry.waiting_on.join(", ")
            );
        }
    }
}

pub(crate) fn cmd_status(path: &Path, output: OutputFormat, quiet: bool) {
    let workflow = load_workflow(path, output, quiet);

    match output {
        OutputFormat::Json => match status_report(&workflow) {
            Ok(report) => println!(
                "{}",
                serde_json::to_string_pretty(&report).unwrap_or_default()
            ),
            Err(msg) => {
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        },
        OutputFormat::Text => match blocked_entries(&workflow) {
            Ok(blocked) => print_text(&workflow, &blocked),
            Err(msg) => {
                report_error(&msg, output, quiet);
                process::exit(1);
            }
        },
    }
}
