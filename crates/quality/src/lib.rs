//! ecoassess-quality: declarative data quality checks for survey records.
//!
//! A [`ValidationRule`] names a record field, a rule kind
//! (`required`, `range`, `format`, `custom`) and the message reported
//! when the field fails. [`validate_data`] runs a rule list against one
//! JSON record and returns a [`QualityCheckResult`]; failures are data,
//! not errors. [`RuleSet::check_definitions`] catches rules that can
//! never be evaluated before any record is seen.
//!
//! The crate is independent of workflows; the engine only consumes the
//! resulting `QualityCheckResult`.

pub mod check;
pub mod rules;
pub mod value;

pub use check::{validate_data, CheckOptions, CustomCheck, CustomRuleRegistry, DEFAULT_CHECKER};
pub use ecoassess_interchange::QualityCheckResult;
pub use rules::{RuleDefinitionError, RuleKind, RuleParams, RuleSet, ValidationRule};
