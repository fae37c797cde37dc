//! Schema-level boolean composition: `allOf`, `anyOf`, `oneOf`, `not`.
//!
//! Sub-schemas are probed in collect mode so a failing branch surfaces its
//! complete sub-aggregate, and the whole family runs even when fail-fast has
//! already halted the other constraint families on the node.

use serde_json::Value;

use crate::error::{ErrorAggregate, ErrorKind, ValidationError};
use crate::path::JsonPath;
use crate::registry::RegistryError;
use crate::schema::SchemaNode;

use super::Checker;

impl<'a> Checker<'a> {
    pub(super) fn check_combinators(
        &self,
        node: &SchemaNode,
        value: &Value,
        path: &JsonPath,
        depth: usize,
        errors: &mut ErrorAggregate,
    ) -> Result<(), RegistryError> {
        let probe = self.as_collect();

        if let Some(all) = &node.all_of {
            // Every branch must pass; every failing branch contributes its
            // sub-failures, flattened to their leaf paths.
            for sub in all {
                let agg = probe.validate_node(sub, Some(value), path, depth + 1)?;
                errors.merge(agg);
            }
        }

        if let Some(any) = &node.any_of {
            let mut last_failure = None;
            let mut passed = false;
            for sub in any {
                let agg = probe.validate_node(sub, Some(value), path, depth + 1)?;
                if agg.is_empty() {
                    passed = true;
                    break;
                }
                last_failure = Some(agg);
            }
            if !passed {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::AnyOf {
                        schemas: any.len(),
                    },
                ));
                // The last branch's failure is the reported cause.
                if let Some(agg) = last_failure {
                    errors.merge(agg);
                }
            }
        }

        if let Some(one) = &node.one_of {
            let mut matched = 0;
            for sub in one {
                if probe
                    .validate_node(sub, Some(value), path, depth + 1)?
                    .is_empty()
                {
                    matched += 1;
                }
            }
            if matched != 1 {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::OneOf {
                        schemas: one.len(),
                        matched,
                    },
                ));
            }
        }

        if let Some(not) = &node.not {
            if probe
                .validate_node(not, Some(value), path, depth + 1)?
                .is_empty()
            {
                errors.insert(ValidationError::new(path.clone(), ErrorKind::Not));
            }
        }

        Ok(())
    }
}
