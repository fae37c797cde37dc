//! Array constraint family: sizing, uniqueness, positional and per-element
//! schemas, and `contains` counting.

use serde_json::Value;

use crate::error::{ErrorAggregate, ErrorKind, ValidationError};
use crate::path::JsonPath;
use crate::registry::RegistryError;
use crate::schema::{SchemaNode, SubSchema};
use crate::value::values_equal;

use super::Checker;

impl<'a> Checker<'a> {
    pub(super) fn check_array(
        &self,
        node: &SchemaNode,
        items: &[Value],
        path: &JsonPath,
        depth: usize,
        errors: &mut ErrorAggregate,
    ) -> Result<(), RegistryError> {
        if let Some(limit) = node.min_items {
            if items.len() < limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MinItems {
                        limit,
                        actual: items.len(),
                    },
                ));
            }
        }
        if let Some(limit) = node.max_items {
            if items.len() > limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MaxItems {
                        limit,
                        actual: items.len(),
                    },
                ));
            }
        }
        if self.halted(errors) {
            return Ok(());
        }

        if node.unique_items == Some(true) {
            if let Some((first, second)) = first_duplicate(items) {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::UniqueItems { first, second },
                ));
            }
            if self.halted(errors) {
                return Ok(());
            }
        }

        let prefix_len = node.prefix_items.as_ref().map_or(0, Vec::len);
        if let Some(prefix) = &node.prefix_items {
            for (index, sub) in prefix.iter().enumerate().take(items.len()) {
                let agg =
                    self.validate_node(sub, Some(&items[index]), &path.push_index(index), depth + 1)?;
                errors.merge(agg);
                if self.halted(errors) {
                    return Ok(());
                }
            }
        }

        if let Some(item_schema) = &node.items {
            for (index, element) in items.iter().enumerate().skip(prefix_len) {
                match item_schema {
                    SubSchema::Bool(true) => {}
                    // With items: false, anything beyond the prefix is
                    // itself the failure.
                    SubSchema::Bool(false) => {
                        errors.insert(ValidationError::new(
                            path.push_index(index),
                            ErrorKind::AdditionalItem { index },
                        ));
                    }
                    SubSchema::Node(sub) => {
                        let agg = self.validate_node(
                            sub,
                            Some(element),
                            &path.push_index(index),
                            depth + 1,
                        )?;
                        errors.merge(agg);
                    }
                }
                if self.halted(errors) {
                    return Ok(());
                }
            }
        }

        if let Some(contains) = &node.contains {
            self.check_contains(node, contains, items, path, depth, errors)?;
        }

        Ok(())
    }

    fn check_contains(
        &self,
        node: &SchemaNode,
        contains: &SubSchema,
        items: &[Value],
        path: &JsonPath,
        depth: usize,
        errors: &mut ErrorAggregate,
    ) -> Result<(), RegistryError> {
        let matching = match contains {
            SubSchema::Bool(true) => items.len(),
            SubSchema::Bool(false) => 0,
            SubSchema::Node(sub) => {
                let mut matching = 0;
                for element in items {
                    if self
                        .validate_node(sub, Some(element), path, depth + 1)?
                        .is_empty()
                    {
                        matching += 1;
                    }
                }
                matching
            }
        };

        match node.min_contains {
            Some(limit) => {
                if matching < limit {
                    errors.insert(ValidationError::new(
                        path.clone(),
                        ErrorKind::MinContains {
                            limit,
                            actual: matching,
                        },
                    ));
                }
            }
            // Default rule: at least one element must match.
            None => {
                if matching == 0 {
                    errors.insert(ValidationError::new(path.clone(), ErrorKind::Contains));
                }
            }
        }
        if let Some(limit) = node.max_contains {
            if matching > limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MaxContains {
                        limit,
                        actual: matching,
                    },
                ));
            }
        }

        Ok(())
    }
}

/// Returns the indices of the first pair of deep-equal elements.
fn first_duplicate(items: &[Value]) -> Option<(usize, usize)> {
    for (second, candidate) in items.iter().enumerate().skip(1) {
        for (first, earlier) in items[..second].iter().enumerate() {
            if values_equal(earlier, candidate) {
                return Some((first, second));
            }
        }
    }
    None
}
