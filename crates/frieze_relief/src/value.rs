//! Dynamic values.
//!
//! Frieze evaluates expressions to JSON-shaped values. Objects keep insertion
//! order (`serde_json` is built with `preserve_order`) so iterating a named
//! collection follows the order its keys were written in.

pub use serde_json::{Map, Value};

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Build a number value, preferring an integer representation when exact.
///
/// Non-finite results collapse to `null` since JSON has no encoding for them.
pub fn number_value(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

/// Scripting-flavoured helpers on [`Value`].
pub trait ValueExt {
    /// `null`, `false`, `0` and `""` are falsy, everything else is truthy.
    fn is_truthy(&self) -> bool;

    /// Short type name used in error messages.
    fn type_name(&self) -> &'static str;

    /// Text shown when the value is bound into a text node or attribute.
    fn to_display_string(&self) -> String;

    /// Equality that treats `1` and `1.0` as the same number.
    fn loose_eq(&self, other: &Value) -> bool;
}

impl ValueExt for Value {
    fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            Value::String(s) => !s.is_empty(),
            Value::Array(_) | Value::Object(_) => true,
        }
    }

    fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        }
    }

    fn to_display_string(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => match (a.as_f64(), b.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => a == b,
            },
            _ => self == other,
        }
    }
}
