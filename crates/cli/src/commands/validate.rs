use std::path::Path;
use std::process;

use ecoassess_engine::SystemClock;
use ecoassess_quality::{validate_data, CheckOptions, QualityCheckResult, RuleSet};

use crate::config::Config;
use crate::{read_json, report_error, OutputFormat};

/// Load a rule set; `.toml` files are TOML, everything else JSON.
pub(crate) fn read_rules(path: &Path) -> Result<RuleSet, String> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| format!("could not read '{}': {}", path.display(), e))?;
    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    if is_toml {
        toml::from_str(&content)
            .map_err(|e| format!("could not parse '{}': {}", path.display(), e))
    } else {
        serde_json::from_str(&content)
            .map_err(|e| format!("could not parse '{}': {}", path.display(), e))
    }
}

pub(crate) fn cmd_validate(
    record_path: &Path,
    rules_path: &Path,
    checked_by: Option<&str>,
    config: &Config,
    output: OutputFormat,
    quiet: bool,
) {
    let rule_set = match read_rules(rules_path) {
        Ok(r) => r,
        Err(msg) => {
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };
    if let Err(problems) = rule_set.check_definitions() {
        let lines: Vec<String> = problems.iter().map(|p| p.to_string()).collect();
        let msg = format!(
            "invalid rule set '{}':\n  - {}",
            rules_path.display(),
            lines.join("\n  - ")
        );
        report_error(&msg, output, quiet);
        process::exit(1);
    }

    let record = read_json(record_path, output, quiet);
    let options = CheckOptions {
        checked_by: checked_by.or(config.quality.checked_by.as_deref()),
        custom: None,
    };
    let result = validate_data(&record, &rule_set.rules, &options, &SystemClock);

    print_result(&result, output, quiet);
    if !result.passed {
        process::exit(1);
    }
}

fn print_result(result: &QualityCheckResult, output: OutputFormat, quiet: bool) {
    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(result).unwrap_or_default()
            );
        }
        OutputFormat::Text => {
            if quiet {
                return;
            }
            if result.passed {
                println!("passed (checked by {})", result.checked_by);
            } else {
                println!(
                    "failed: {} error(s) (checked by {})",
                    result.errors.len(),
                    result.checked_by
                );
                for err in &result.errors {
                    println!("  - {}", err);
                }
            }
            for warning in &result.warnings {
                println!("  warning: {}", warning);
            }
        }
    }
}
