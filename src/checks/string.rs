//! String shape checks: format, pattern, word counts.
//!
//! Length limits are handled by the generic size family, which also covers
//! arrays and objects.

use crate::error::{ErrorAggregate, ErrorKind, ValidationError};
use crate::formats::FormatRegistry;
use crate::path::JsonPath;
use crate::schema::SchemaNode;

pub(super) fn check(
    node: &SchemaNode,
    value: &str,
    path: &JsonPath,
    formats: &FormatRegistry,
    errors: &mut ErrorAggregate,
) {
    if let Some(format) = &node.format {
        // Unknown names were already warned about (or rejected) at
        // construction; here they simply skip the check.
        if formats.check(format, value) == Some(false) {
            errors.insert(ValidationError::new(
                path.clone(),
                ErrorKind::Format {
                    format: format.clone(),
                },
            ));
        }
    }

    if let Some(pattern) = &node.pattern {
        if !pattern.is_match(value) {
            errors.insert(ValidationError::new(
                path.clone(),
                ErrorKind::Pattern {
                    pattern: pattern.source.clone(),
                },
            ));
        }
    }

    if node.min_words.is_some() || node.max_words.is_some() {
        let words = value.split_whitespace().count();
        if let Some(limit) = node.min_words {
            if words < limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MinWords {
                        limit,
                        actual: words,
                    },
                ));
            }
        }
        if let Some(limit) = node.max_words {
            if words > limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MaxWords {
                        limit,
                        actual: words,
                    },
                ));
            }
        }
    }
}
