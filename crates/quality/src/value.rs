//! Loose value semantics for survey records.
//!
//! Records are arbitrary JSON from forms and imports, so presence is a
//! loose truthiness test. Numeric bounds compare as decimals.

use std::borrow::Cow;
use std::cmp::Ordering;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// Presence test used by `required` rules.
///
/// `null`, `false`, `0` and `""` count as absent. With `allow_zero`, a
/// numeric zero counts as present.
pub fn is_present(value: Option<&Value>, allow_zero: bool) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => allow_zero || !is_zero(n),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(_)) | Some(Value::Object(_)) => true,
    }
}

fn is_zero(n: &Number) -> bool {
    match n.as_f64() {
        Some(f) => f == 0.0,
        None => false,
    }
}

fn number_decimal(n: &Number) -> Option<Decimal> {
    let text = n.to_string();
    Decimal::from_str(&text)
        .or_else(|_| Decimal::from_scientific(&text))
        .ok()
}

/// Exact decimal form of a rule bound. `None` for NaN, infinities and
/// magnitudes beyond `Decimal`.
pub fn param_decimal(bound: f64) -> Option<Decimal> {
    if !bound.is_finite() {
        return None;
    }
    Decimal::from_str(&bound.to_string()).ok()
}

/// Order a record number against a rule bound.
///
/// Decimal comparison when both sides fit, f64 otherwise.
pub fn compare_number(n: &Number, bound: f64) -> Option<Ordering> {
    match (number_decimal(n), param_decimal(bound)) {
        (Some(a), Some(b)) => Some(a.cmp(&b)),
        _ => n.as_f64()?.partial_cmp(&bound),
    }
}

/// Text a `format` pattern is matched against.
///
/// An absent field reads as `undefined` and `null` as `null`. Integral
/// floats drop their fraction (`1.0` is `1`). Arrays join their elements
/// with commas, with `null` elements empty; objects read as `[object Object]`.
pub fn stringify(value: Option<&Value>) -> Cow<'_, str> {
    match value {
        None => Cow::Borrowed("undefined"),
        Some(Value::Null) => Cow::Borrowed("null"),
        Some(Value::String(s)) => Cow::Borrowed(s.as_str()),
        Some(Value::Bool(true)) => Cow::Borrowed("true"),
        Some(Value::Bool(false)) => Cow::Borrowed("false"),
        Some(Value::Number(n)) => Cow::Owned(number_text(n)),
        Some(Value::Array(items)) => Cow::Owned(
            items
                .iter()
                .map(|item| match item {
                    Value::Null => Cow::Borrowed(""),
                    other => stringify(Some(other)),
                })
                .collect::<Vec<_>>()
                .join(","),
        ),
        Some(Value::Object(_)) => Cow::Borrowed("[object Object]"),
    }
}

fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f == 0.0 => "0".to_string(),
        Some(f) if n.is_f64() => f.to_string(),
        _ => n.to_string(),
    }
}
