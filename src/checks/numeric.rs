//! Numeric range and divisibility checks.

use serde_json::Value;

use crate::error::{ErrorAggregate, ErrorKind, ValidationError};
use crate::path::JsonPath;
use crate::schema::SchemaNode;

/// Tolerance for `multipleOf` under binary floating point; `0.3` is a
/// multiple of `0.1` even though the remainder is not exactly zero.
const MULTIPLE_OF_EPSILON: f64 = 1e-9;

pub(super) fn check(
    node: &SchemaNode,
    value: &Value,
    path: &JsonPath,
    errors: &mut ErrorAggregate,
) {
    let Some(n) = value.as_f64() else { return };

    if let Some(limit) = node.minimum {
        if n < limit {
            errors.insert(ValidationError::new(
                path.clone(),
                ErrorKind::Minimum { limit, value: n },
            ));
        }
    }
    if let Some(limit) = node.maximum {
        if n > limit {
            errors.insert(ValidationError::new(
                path.clone(),
                ErrorKind::Maximum { limit, value: n },
            ));
        }
    }
    if let Some(limit) = node.exclusive_minimum {
        if n <= limit {
            errors.insert(ValidationError::new(
                path.clone(),
                ErrorKind::ExclusiveMinimum { limit, value: n },
            ));
        }
    }
    if let Some(limit) = node.exclusive_maximum {
        if n >= limit {
            errors.insert(ValidationError::new(
                path.clone(),
                ErrorKind::ExclusiveMaximum { limit, value: n },
            ));
        }
    }
    if let Some(divisor) = node.multiple_of {
        if !is_multiple(n, divisor) {
            errors.insert(ValidationError::new(
                path.clone(),
                ErrorKind::MultipleOf { divisor, value: n },
            ));
        }
    }
}

/// Remainder-zero test with floating-point tolerance.
///
/// Zero is a multiple of anything; nothing else is a multiple of zero.
pub(super) fn is_multiple(value: f64, divisor: f64) -> bool {
    if value == 0.0 {
        return true;
    }
    if divisor == 0.0 {
        return false;
    }
    let quotient = value / divisor;
    (quotient - quotient.round()).abs() < MULTIPLE_OF_EPSILON
}
