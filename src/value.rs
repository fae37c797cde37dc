//! Runtime value classification.
//!
//! This module provides [`ValueKind`], the closed set of runtime kinds a
//! validated value can have, along with the equality rules used by `enum`,
//! `const`, `denied` and `uniqueItems` constraints.

use std::fmt::{self, Display};

use serde_json::Value;

/// The runtime kind of a value being validated.
///
/// Every value is classified exactly once per dispatch, and the classification
/// is matched exhaustively so that each kind-specific constraint family is
/// considered by the compiler.
///
/// # Example
///
/// ```rust
/// use verdict::ValueKind;
/// use serde_json::json;
///
/// assert_eq!(ValueKind::of(&json!(42)), ValueKind::Integer);
/// assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Number);
/// assert_eq!(ValueKind::of(&json!("hi")), ValueKind::String);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Integer,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classifies a value's runtime kind.
    ///
    /// Numbers that fit an integer representation are classified as
    /// `Integer`; everything else with a numeric representation is `Number`.
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Bool(_) => ValueKind::Boolean,
            Value::Number(n) => {
                if n.is_i64() || n.is_u64() {
                    ValueKind::Integer
                } else {
                    ValueKind::Number
                }
            }
            Value::String(_) => ValueKind::String,
            Value::Array(_) => ValueKind::Array,
            Value::Object(_) => ValueKind::Object,
        }
    }

    /// Returns the schema-facing name of this kind.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Integer => "integer",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }

    /// Parses a schema `type` name.
    ///
    /// Returns `None` for names outside the closed set of seven kinds.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "null" => Some(ValueKind::Null),
            "boolean" => Some(ValueKind::Boolean),
            "integer" => Some(ValueKind::Integer),
            "number" => Some(ValueKind::Number),
            "string" => Some(ValueKind::String),
            "array" => Some(ValueKind::Array),
            "object" => Some(ValueKind::Object),
            _ => None,
        }
    }
}

impl Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Tests whether a value satisfies a declared `type` name.
///
/// Integer values satisfy both `integer` and `number`. A float with a zero
/// fractional part (e.g. `2.0`) satisfies `integer`, matching how a schema
/// treats numerals at the boundary of dynamically-typed data.
pub fn matches_type(value: &Value, declared: ValueKind) -> bool {
    let kind = ValueKind::of(value);
    if kind == declared {
        return true;
    }
    match (kind, declared) {
        (ValueKind::Integer, ValueKind::Number) => true,
        (ValueKind::Number, ValueKind::Integer) => value
            .as_f64()
            .map(|n| n.fract() == 0.0 && n.is_finite())
            .unwrap_or(false),
        _ => false,
    }
}

/// Structural deep equality with numeric tolerance.
///
/// Numbers compare by numeric value rather than representation, so `1` and
/// `1.0` are equal. Arrays compare element-wise, objects key-wise with
/// identical key sets.
pub fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_f64(), y.as_f64()) {
            (Some(x), Some(y)) => x == y,
            _ => x == y,
        },
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).map(|y| values_equal(x, y)).unwrap_or(false))
        }
        _ => a == b,
    }
}
