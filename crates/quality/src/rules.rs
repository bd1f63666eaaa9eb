//! Rule definitions and rule-set sanity checks.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::param_decimal;

/// Kind of check a rule performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    Range,
    Format,
    Custom,
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RuleKind::Required => "required",
            RuleKind::Range => "range",
            RuleKind::Format => "format",
            RuleKind::Custom => "custom",
        };
        f.write_str(s)
    }
}

/// Optional parameters; which ones matter depends on the rule kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Regular expression for `format` rules. Unanchored.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    /// Registered predicate name for `custom` rules.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub predicate: Option<String>,
    /// Let numeric zero satisfy a `required` rule.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub allow_zero: bool,
}

/// One declarative check against a single record field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationRule {
    pub field: String,
    pub rule: RuleKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<RuleParams>,
    pub error_message: String,
}

impl ValidationRule {
    pub fn new(field: impl Into<String>, rule: RuleKind, error_message: impl Into<String>) -> Self {
        ValidationRule {
            field: field.into(),
            rule,
            params: None,
            error_message: error_message.into(),
        }
    }

    pub fn with_params(mut self, params: RuleParams) -> Self {
        self.params = Some(params);
        self
    }

    pub(crate) fn params(&self) -> RuleParams {
        self.params.clone().unwrap_or_default()
    }
}

/// A named collection of rules, as loaded from a rules file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuleSet {
    #[serde(default)]
    pub rules: Vec<ValidationRule>,
}

/// A rule that can never be evaluated as written.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RuleDefinitionError {
    #[error("rule {index} ({field}): invalid pattern '{pattern}': {message}")]
    InvalidPattern {
        index: usize,
        field: String,
        pattern: String,
        message: String,
    },
    #[error("rule {index} ({field}): {kind} rule is missing '{param}'")]
    MissingParam {
        index: usize,
        field: String,
        kind: RuleKind,
        param: &'static str,
    },
    #[error("rule {index} ({field}): min {min} is greater than max {max}")]
    InvertedRange {
        index: usize,
        field: String,
        min: f64,
        max: f64,
    },
    #[error("rule {index} ({field}): bound {value} is not a representable number")]
    UnrepresentableBound {
        index: usize,
        field: String,
        value: f64,
    },
}

impl RuleSet {
    pub fn new(rules: Vec<ValidationRule>) -> Self {
        RuleSet { rules }
    }

    /// Every definition problem in the set, in rule order.
    pub fn check_definitions(&self) -> Result<(), Vec<RuleDefinitionError>> {
        let mut problems = Vec::new();
        for (index, rule) in self.rules.iter().enumerate() {
            let params = rule.params();
            let field = rule.field.clone();
            match rule.rule {
                RuleKind::Required => {}
                RuleKind::Range => {
                    if params.min.is_none() && params.max.is_none() {
                        problems.push(RuleDefinitionError::MissingParam {
                            index,
                            field: field.clone(),
                            kind: rule.rule,
                            param: "min or max",
                        });
                    }
                    for bound in [params.min, params.max].into_iter().flatten() {
                        if param_decimal(bound).is_none() {
                            problems.push(RuleDefinitionError::UnrepresentableBound {
                                index,
                                field: field.clone(),
                                value: bound,
                            });
                        }
                    }
                    if let (Some(min), Some(max)) = (params.min, params.max) {
                        if min > max {
                            problems.push(RuleDefinitionError::InvertedRange {
                                index,
                                field,
                                min,
                                max,
                            });
                        }
                    }
                }
                RuleKind::Format => match params.pattern {
                    None => problems.push(RuleDefinitionError::MissingParam {
                        index,
                        field,
                        kind: rule.rule,
                        param: "pattern",
                    }),
                    Some(pattern) => {
                        if let Err(e) = regex::Regex::new(&pattern) {
                            problems.push(RuleDefinitionError::InvalidPattern {
                                index,
                                field,
                                pattern,
                                message: e.to_string(),
                            });
                        }
                    }
                },
                RuleKind::Custom => {
                    if params.predicate.is_none() {
                        problems.push(RuleDefinitionError::MissingParam {
                            index,
                            field,
                            kind: rule.rule,
                            param: "predicate",
                        });
                    }
                }
            }
        }
        if problems.is_empty() {
            Ok(())
        } else {
            Err(problems)
        }
    }
}
