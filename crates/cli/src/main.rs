mod commands;
mod config;

use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand, ValueEnum};
use ecoassess_interchange::AssessmentWorkflow;

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    Text,
    Json,
}

/// Ecological site assessment workflows.
#[derive(Parser)]
#[command(
    name = "ecoassess",
    version,
    about = "Ecological site assessment workflow engine"
)]
struct Cli {
    /// Output format (text or json)
    #[arg(long, global = true, default_value = "text", value_enum)]
    output: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    quiet: bool,

    /// Configuration file (default: ./ecoassess.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a standard 16-step assessment workflow
    Create {
        /// Assessment identifier
        #[arg(long)]
        assessment: String,
        /// Site code
        #[arg(long)]
        site_code: String,
        /// Human-readable site name
        #[arg(long)]
        site_name: String,
        /// Lead ecologist responsible for the assessment
        #[arg(long)]
        assigned_to: String,
        /// Who assigned the work (falls back to [defaults] assigned_by)
        #[arg(long)]
        assigned_by: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: String,
        /// Write the workflow here instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Show progress, ready steps and blocked steps
    Status {
        /// Path to the workflow JSON file
        workflow: PathBuf,
    },

    /// Change the status of one step
    SetStatus {
        /// Path to the workflow JSON file
        workflow: PathBuf,
        /// Step ID, e.g. field-4a
        step: String,
        /// not_started, in_progress, completed, blocked or needs_review
        status: String,
        /// Rewrite the workflow file instead of printing the result
        #[arg(long)]
        in_place: bool,
        /// Also recompute the workflow status and current phase from its steps
        #[arg(long)]
        refresh: bool,
    },

    /// Check a workflow file against the JSON Schema and the dependency rules
    Check {
        /// Path to the workflow JSON file
        workflow: PathBuf,
    },

    /// Validate a survey record against a rule set
    Validate {
        /// Path to the record JSON file
        record: PathBuf,
        /// Rule set, JSON or TOML (by extension)
        #[arg(long)]
        rules: PathBuf,
        /// Identity recorded on the result (falls back to [quality] checked_by)
        #[arg(long)]
        checked_by: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.output, cli.quiet);

    let config = match config::load(cli.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            report_error(&e, cli.output, cli.quiet);
            process::exit(1);
        }
    };

    match cli.command {
        Commands::Create {
            assessment,
            site_code,
            site_name,
            assigned_to,
            assigned_by,
            due,
            out,
        } => {
            commands::create::cmd_create(
                commands::create::CreateArgs {
                    assessment,
                    site_code,
                    site_name,
                    assigned_to,
                    assigned_by,
                    due,
                    out,
                },
                &config,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Status { workflow } => {
            commands::status::cmd_status(&workflow, cli.output, cli.quiet);
        }
        Commands::SetStatus {
            workflow,
            step,
            status,
            in_place,
            refresh,
        } => {
            commands::set_status::cmd_set_status(
                &workflow,
                &step,
                &status,
                in_place,
                refresh,
                cli.output,
                cli.quiet,
            );
        }
        Commands::Check { workflow } => {
            commands::check::cmd_check(&workflow, cli.output, cli.quiet);
        }
        Commands::Validate {
            record,
            rules,
            checked_by,
        } => {
            commands::validate::cmd_validate(
                &record,
                &rules,
                checked_by.as_deref(),
                &config,
                cli.output,
                cli.quiet,
            );
        }
    }
}

/// Filter used when `ECOASSESS_LOG` is unset. JSON output keeps stderr
/// for the machine-readable error only.
pub(crate) fn default_log_filter(output: OutputFormat, quiet: bool) -> &'static str {
    if quiet || output == OutputFormat::Json {
        "off"
    } else {
        "warn"
    }
}

/// Log to stderr, filtered by `ECOASSESS_LOG`.
fn init_tracing(output: OutputFormat, quiet: bool) {
    use std::io::IsTerminal;
    use tracing_subscriber::prelude::*;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env("ECOASSESS_LOG")
                .unwrap_or_else(|_| default_log_filter(output, quiet).into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .with_target(false),
        )
        .init();
}

/// Read and parse a JSON file, exiting with a reported error on failure.
pub(crate) fn read_json(path: &Path, output: OutputFormat, quiet: bool) -> serde_json::Value {
    let text = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("error reading file '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    match serde_json::from_str(&text) {
        Ok(v) => v,
        Err(e) => {
            let msg = format!("error parsing JSON in '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Read a workflow file and run the integrity check on it.
pub(crate) fn load_workflow(path: &Path, output: OutputFormat, quiet: bool) -> AssessmentWorkflow {
    let value = read_json(path, output, quiet);
    match ecoassess_engine::ingest(&value) {
        Ok(w) => w,
        Err(e) => {
            let msg = format!("invalid workflow '{}': {}", path.display(), e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

/// Pretty JSON for a workflow, as written to files and stdout.
pub(crate) fn workflow_json(
    workflow: &AssessmentWorkflow,
    output: OutputFormat,
    quiet: bool,
) -> String {
    let rendered = ecoassess_interchange::to_json(workflow)
        .map_err(|e| e.to_string())
        .and_then(|v| serde_json::to_string_pretty(&v).map_err(|e| e.to_string()));
    match rendered {
        Ok(s) => s,
        Err(e) => {
            let msg = format!("serialization error: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    }
}

pub(crate) fn write_file(path: &Path, contents: &str, output: OutputFormat, quiet: bool) {
    if let Err(e) = std::fs::write(path, format!("{}\n", contents)) {
        let msg = format!("error writing '{}': {}", path.display(), e);
        report_error(&msg, output, quiet);
        process::exit(1);
    }
}

/// Report an error message in the appropriate format.
pub(crate) fn report_error(msg: &str, output: OutputFormat, quiet: bool) {
    if quiet {
        return;
    }
    match output {
        OutputFormat::Text => eprintln!("{}", msg),
        OutputFormat::Json => {
            eprintln!("{}", serde_json::json!({ "error": msg }));
        }
    }
}
