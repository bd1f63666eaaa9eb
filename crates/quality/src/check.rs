//! Record validation against a list of rules.

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

use ecoassess_interchange::{Clock, QualityCheckResult};
use regex::Regex;
use serde_json::Value;
use tracing::{debug, warn};

use crate::rules::{RuleKind, ValidationRule};
use crate::value::{compare_number, is_present, stringify};

/// Identity recorded when the caller names no checker.
pub const DEFAULT_CHECKER: &str = "system";

/// A named predicate behind a `custom` rule.
///
/// Receives the field value (if any) and the whole record; returns
/// `true` when the record is acceptable.
pub trait CustomCheck: Send + Sync {
    fn check(&self, value: Option<&Value>, record: &Value) -> bool;
}

impl<F> CustomCheck for F
where
    F: Fn(Option<&Value>, &Value) -> bool + Send + Sync,
{
    fn check(&self, value: Option<&Value>, record: &Value) -> bool {
        self(value, record)
    }
}

/// Predicates available to `custom` rules, keyed by `params.predicate`.
#[derive(Default)]
pub struct CustomRuleRegistry {
    checks: BTreeMap<String, Box<dyn CustomCheck>>,
}

impl CustomRuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `check` under `name`, replacing any previous entry.
    pub fn register(&mut self, name: impl Into<String>, check: impl CustomCheck + 'static) {
        self.checks.insert(name.into(), Box::new(check));
    }

    pub fn get(&self, name: &str) -> Option<&dyn CustomCheck> {
        self.checks.get(name).map(|c| c.as_ref())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.checks.keys().map(String::as_str)
    }
}

impl fmt::Debug for CustomRuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.names()).finish()
    }
}

/// Per-call settings for [`validate_data`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CheckOptions<'a> {
    pub checked_by: Option<&'a str>,
    pub custom: Option<&'a CustomRuleRegistry>,
}

enum Outcome {
    Pass,
    Fail,
    /// Passed without being evaluated.
    Skipped(String),
    /// The rule itself is unusable; counts as a failure.
    Broken(String),
}

/// Check `record` against every rule and collect the failures.
///
/// Each failed rule contributes its `error_message` once. The record is
/// expected to be a JSON object; fields of anything else read as absent.
pub fn validate_data(
    record: &Value,
    rules: &[ValidationRule],
    options: &CheckOptions<'_>,
    clock: &dyn Clock,
) -> QualityCheckResult {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    for rule in rules {
        let value = record.get(&rule.field);
        match evaluate(rule, value, record, options) {
            Outcome::Pass => {}
            Outcome::Fail => errors.push(rule.error_message.clone()),
            Outcome::Skipped(message) => {
                warn!(field = %rule.field, rule = %rule.rule, "{}", message);
                warnings.push(message);
            }
            Outcome::Broken(message) => {
                warn!(field = %rule.field, rule = %rule.rule, "{}", message);
                warnings.push(message);
                errors.push(rule.error_message.clone());
            }
        }
    }

    let result = QualityCheckResult {
        passed: errors.is_empty(),
        errors,
        warnings,
        timestamp: clock.timestamp(),
        checked_by: options.checked_by.unwrap_or(DEFAULT_CHECKER).to_string(),
    };
    debug!(
        rules = rules.len(),
        errors = result.errors.len(),
        warnings = result.warnings.len(),
        "record validated"
    );
    result
}

fn evaluate(
    rule: &ValidationRule,
    value: Option<&Value>,
    record: &Value,
    options: &CheckOptions<'_>,
) -> Outcome {
    let params = rule.params();
    match rule.rule {
        RuleKind::Required => {
            if is_present(value, params.allow_zero) {
                Outcome::Pass
            } else {
                Outcome::Fail
            }
        }
        RuleKind::Range => {
            let n = match value {
                None => return Outcome::Pass,
                Some(Value::Number(n)) => n,
                Some(_) => return Outcome::Fail,
            };
            let below = params
                .min
                .is_some_and(|min| compare_number(n, min) == Some(Ordering::Less));
            let above = params
                .max
                .is_some_and(|max| compare_number(n, max) == Some(Ordering::Greater));
            if below || above {
                Outcome::Fail
            } else {
                Outcome::Pass
            }
        }
        RuleKind::Format => {
            let Some(pattern) = params.pattern else {
                return Outcome::Skipped(format!(
                    "format rule for '{}' has no pattern; skipped",
                    rule.field
                ));
            };
            match Regex::new(&pattern) {
                Ok(re) if re.is_match(&stringify(value)) => Outcome::Pass,
                Ok(_) => Outcome::Fail,
                Err(e) => Outcome::Broken(format!(
                    "format rule for '{}' has invalid pattern '{}': {}",
                    rule.field, pattern, e
                )),
            }
        }
        RuleKind::Custom => {
            let Some(name) = params.predicate else {
                return Outcome::Skipped(format!(
                    "custom rule for '{}' names no predicate; skipped",
                    rule.field
                ));
            };
            match options.custom.and_then(|registry| registry.get(&name)) {
                Some(check) if check.check(value, record) => Outcome::Pass,
                Some(_) => Outcome::Fail,
                None => Outcome::Skipped(format!(
                    "custom rule for '{}' uses unregistered predicate '{}'; skipped",
                    rule.field, name
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RuleParams;
    use ecoassess_interchange::FixedClock;
    use serde_json::json;
    use time::macros::datetime;

    fn clock() -> FixedClock {
        FixedClock(datetime!(2026-10-19 14:30:00 UTC))
    }

    fn run(record: Value, rules: &[ValidationRule]) -> QualityCheckResult {
        validate_data(&record, rules, &CheckOptions::default(), &clock())
    }

    fn range(min: Option<f64>, max: Option<f64>) -> ValidationRule {
        ValidationRule::new("habitatArea", RuleKind::Range, "Y").with_params(RuleParams {
            min,
            max,
            ..Default::default()
        })
    }

    fn format(pattern: &str) -> ValidationRule {
        ValidationRule::new("gridRef", RuleKind::Format, "Bad grid reference").with_params(
            RuleParams {
                pattern: Some(pattern.to_string()),
                ..Default::default()
            },
        )
    }

    #[test]
    fn zero_population_fails_required() {
        let rule = ValidationRule::new("populationCount", RuleKind::Required, "X");
        let result = run(json!({"populationCount": 0}), &[rule]);
        assert!(!result.passed);
        assert_eq!(result.errors, vec!["X"]);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn allow_zero_accepts_zero_population() {
        let rule = ValidationRule::new("populationCount", RuleKind::Required, "X").with_params(
            RuleParams {
                allow_zero: true,
                ..Default::default()
            },
        );
        assert!(run(json!({"populationCount": 0}), &[rule.clone()]).passed);
        assert!(!run(json!({}), &[rule]).passed);
    }

    #[test]
    fn required_rejects_missing_and_empty() {
        let rule = ValidationRule::new("surveyor", RuleKind::Required, "Surveyor is required");
        assert!(!run(json!({}), &[rule.clone()]).passed);
        assert!(!run(json!({"surveyor": ""}), &[rule.clone()]).passed);
        assert!(!run(json!({"surveyor": null}), &[rule.clone()]).passed);
        assert!(run(json!({"surveyor": "k.ndlovu"}), &[rule]).passed);
    }

    #[test]
    fn range_minimum() {
        let rule = range(Some(0.01), None);
        let low = run(json!({"habitatArea": -1}), &[rule.clone()]);
        assert!(!low.passed);
        assert_eq!(low.errors, vec!["Y"]);
        assert!(run(json!({"habitatArea": 5}), &[rule.clone()]).passed);
        assert!(run(json!({"habitatArea": 0.01}), &[rule]).passed);
    }

    #[test]
    fn range_maximum_and_both_bounds() {
        let rule = range(Some(0.0), Some(100.0));
        assert!(run(json!({"habitatArea": 100}), &[rule.clone()]).passed);
        assert!(!run(json!({"habitatArea": 100.5}), &[rule.clone()]).passed);
        assert!(run(json!({"habitatArea": 0}), &[rule]).passed);
    }

    #[test]
    fn range_rejects_non_numbers_and_skips_absent() {
        let rule = range(Some(0.01), None);
        assert!(!run(json!({"habitatArea": "5"}), &[rule.clone()]).passed);
        assert!(!run(json!({"habitatArea": true}), &[rule.clone()]).passed);
        assert!(run(json!({}), &[rule]).passed);
    }

    #[test]
    fn range_rejects_null() {
        let result = run(json!({"habitatArea": null}), &[range(Some(0.01), None)]);
        assert!(!result.passed);
        assert_eq!(result.errors, vec!["Y"]);
    }

    #[test]
    fn format_matches_stringified_value() {
        let rule = format(r"^[A-Z]{2}\d{4}$");
        assert!(run(json!({"gridRef": "SU1234"}), &[rule.clone()]).passed);
        assert!(!run(json!({"gridRef": "su1234"}), &[rule]).passed);

        let digits = ValidationRule::new("plotNumber", RuleKind::Format, "Plot must be 3 digits")
            .with_params(RuleParams {
                pattern: Some(r"^\d{3}$".to_string()),
                ..Default::default()
            });
        assert!(run(json!({"plotNumber": 123}), &[digits.clone()]).passed);
        assert!(!run(json!({"plotNumber": 12}), &[digits.clone()]).passed);
        assert!(run(json!({"plotNumber": 100.0}), &[digits]).passed);
    }

    #[test]
    fn format_fails_missing_and_null_values() {
        let digits = ValidationRule::new("plotNumber", RuleKind::Format, "Plot must be 3 digits")
            .with_params(RuleParams {
                pattern: Some(r"^\d{3}$".to_string()),
                ..Default::default()
            });
        let missing = run(json!({}), &[digits.clone()]);
        assert_eq!(missing.errors, vec!["Plot must be 3 digits"]);
        let null = run(json!({"plotNumber": null}), &[digits]);
        assert_eq!(null.errors, vec!["Plot must be 3 digits"]);

        let placeholder = format("^(null|undefined)$");
        assert!(run(json!({}), &[placeholder.clone()]).passed);
        assert!(run(json!({"gridRef": null}), &[placeholder]).passed);
    }

    #[test]
    fn invalid_pattern_fails_with_warning() {
        let result = run(json!({"gridRef": "SU1234"}), &[format("([A-Z")]);
        assert!(!result.passed);
        assert_eq!(result.errors, vec!["Bad grid reference"]);
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("invalid pattern '([A-Z'"));
    }

    #[test]
    fn every_failed_rule_contributes_its_message() {
        let rules = vec![
            ValidationRule::new("siteCode", RuleKind::Required, "Site code is required"),
            range(Some(0.01), None),
            format(r"^[A-Z]{2}\d{4}$"),
        ];
        let result = run(
            json!({"siteCode": "", "habitatArea": -2, "gridRef": "nowhere"}),
            &rules,
        );
        assert_eq!(
            result.errors,
            vec!["Site code is required", "Y", "Bad grid reference"]
        );
    }

    fn custom(predicate: Option<&str>) -> ValidationRule {
        ValidationRule::new("speciesCount", RuleKind::Custom, "Species count exceeds records")
            .with_params(RuleParams {
                predicate: predicate.map(str::to_string),
                ..Default::default()
            })
    }

    #[test]
    fn registered_predicate_decides() {
        let mut registry = CustomRuleRegistry::new();
        registry.register("not_more_than_records", |value: Option<&Value>, record: &Value| {
            let count = value.and_then(Value::as_u64).unwrap_or(0);
            let records = record.get("recordCount").and_then(Value::as_u64).unwrap_or(0);
            count <= records
        });
        let options = CheckOptions {
            checked_by: None,
            custom: Some(&registry),
        };
        let rules = [custom(Some("not_more_than_records"))];

        let ok = validate_data(
            &json!({"speciesCount": 4, "recordCount": 10}),
            &rules,
            &options,
            &clock(),
        );
        assert!(ok.passed);

        let bad = validate_data(
            &json!({"speciesCount": 12, "recordCount": 10}),
            &rules,
            &options,
            &clock(),
        );
        assert_eq!(bad.errors, vec!["Species count exceeds records"]);
    }

    #[test]
    fn unregistered_predicate_passes_with_warning() {
        let result = run(json!({"speciesCount": 4}), &[custom(Some("missing"))]);
        assert!(result.passed);
        assert_eq!(
            result.warnings,
            vec!["custom rule for 'speciesCount' uses unregistered predicate 'missing'; skipped"]
        );

        let unnamed = run(json!({}), &[custom(None)]);
        assert!(unnamed.passed);
        assert_eq!(unnamed.warnings.len(), 1);
    }

    #[test]
    fn stamps_time_and_checker() {
        let result = run(json!({}), &[]);
        assert!(result.passed);
        assert_eq!(result.timestamp, "2026-10-19T14:30:00Z");
        assert_eq!(result.checked_by, "system");

        let options = CheckOptions {
            checked_by: Some("field-team"),
            custom: None,
        };
        let named = validate_data(&json!({}), &[], &options, &clock());
        assert_eq!(named.checked_by, "field-team");
    }

    #[test]
    fn registry_debug_lists_names() {
        let mut registry = CustomRuleRegistry::new();
        registry.register("b", |_: Option<&Value>, _: &Value| true);
        registry.register("a", |_: Option<&Value>, _: &Value| false);
        assert_eq!(format!("{:?}", registry), r#"{"a", "b"}"#);
    }
}
