use std::path::PathBuf;
use std::process;

use ecoassess_engine::{create_standard_assessment_workflow, AssessmentSpec, SystemClock};
use time::macros::format_description;
use time::Date;

use crate::config::Config;
use crate::{report_error, workflow_json, write_file, OutputFormat};

pub(crate) struct CreateArgs {
    pub assessment: String,
    pub site_code: String,
    pub site_name: String,
    pub assigned_to: String,
    pub assigned_by: Option<String>,
    pub due: String,
    pub out: Option<PathBuf>,
}

/// Parse a `YYYY-MM-DD` calendar date and return it in canonical form.
pub(crate) fn parse_due_date(raw: &str) -> Result<String, String> {
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(raw.trim(), &format)
        .map_err(|e| format!("invalid due date '{}': {} (expected YYYY-MM-DD)", raw, e))?;
    date.format(&format)
        .map_err(|e| format!("invalid due date '{}': {}", raw, e))
}

pub(crate) fn cmd_create(args: CreateArgs, config: &Config, output: OutputFormat, quiet: bool) {
    let due_date = match parse_due_date(&args.due) {
        Ok(d) => d,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let Some(assigned_by) = args
        .assigned_by
        .or_else(|| config.defaults.assigned_by.clone())
    else {
        report_error(
            "missing --assigned-by (and no [defaults] assigned_by in config)",
            output,
            quiet,
        );
        process::exit(1);
    };

    let spec = AssessmentSpec {
        assessment_id: args.assessment,
        site_code: args.site_code,
        site_name: args.site_name,
        assigned_to: args.assigned_to,
        assigned_by,
        due_date,
    };
    let workflow = create_standard_assessment_workflow(&spec, &SystemClock);
    let rendered = workflow_json(&workflow, output, quiet);

    match args.out {
        None => println!("{}", rendered),
        Some(path) => {
            write_file(&path, &rendered, output, quiet);
            if !quiet {
                match output {
                    OutputFormat::Text => {
                        println!("created {} -> {}", workflow.id, path.display());
                    }
                    OutputFormat::Json => {
                        let summary = serde_json::json!({
                            "id": workflow.id,
                            "path": path.display().to_string(),
                        });
                        println!("{}", summary);
                    }
                }
            }
        }
    }
}
