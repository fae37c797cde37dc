//! Object constraint family: declared, pattern-matched and additional
//! properties, property-name schemas, and key counts.

use serde_json::{Map, Value};

use crate::error::{ErrorAggregate, ErrorKind, ValidationError};
use crate::path::JsonPath;
use crate::registry::RegistryError;
use crate::schema::{SchemaNode, SubSchema};

use super::Checker;

impl<'a> Checker<'a> {
    pub(super) fn check_object(
        &self,
        node: &SchemaNode,
        map: &Map<String, Value>,
        path: &JsonPath,
        depth: usize,
        errors: &mut ErrorAggregate,
    ) -> Result<(), RegistryError> {
        if let Some(limit) = node.min_properties {
            if map.len() < limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MinProperties {
                        limit,
                        actual: map.len(),
                    },
                ));
            }
        }
        if let Some(limit) = node.max_properties {
            if map.len() > limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MaxProperties {
                        limit,
                        actual: map.len(),
                    },
                ));
            }
        }
        if self.halted(errors) {
            return Ok(());
        }

        if let Some(props) = &node.properties {
            for (name, sub) in props {
                // Absent keys skip every nested constraint; only the
                // enclosing `required` can reject absence.
                let Some(value) = map.get(name) else { continue };
                match sub {
                    SubSchema::Bool(true) => {}
                    SubSchema::Bool(false) => {
                        errors.insert(ValidationError::new(
                            path.push_field(name),
                            ErrorKind::PropertyForbidden { name: name.clone() },
                        ));
                    }
                    SubSchema::Node(sub) => {
                        let agg = self.validate_node(
                            sub,
                            Some(value),
                            &path.push_field(name),
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

        if let Some(patterns) = &node.pattern_properties {
            for (key, value) in map {
                // A key may match several patterns; all of them apply.
                for entry in patterns.iter().filter(|p| p.pattern.is_match(key)) {
                    match &entry.schema {
                        SubSchema::Bool(true) => {}
                        SubSchema::Bool(false) => {
                            errors.insert(ValidationError::new(
                                path.push_field(key),
                                ErrorKind::PropertyForbidden { name: key.clone() },
                            ));
                        }
                        SubSchema::Node(sub) => {
                            let agg = self.validate_node(
                                sub,
                                Some(value),
                                &path.push_field(key),
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
        }

        if let Some(additional) = &node.additional_properties {
            for (key, value) in map {
                if self.is_covered(node, key) {
                    continue;
                }
                match additional {
                    SubSchema::Bool(true) => {}
                    SubSchema::Bool(false) => {
                        errors.insert(ValidationError::new(
                            path.push_field(key),
                            ErrorKind::AdditionalProperty { name: key.clone() },
                        ));
                    }
                    SubSchema::Node(sub) => {
                        let agg =
                            self.validate_node(sub, Some(value), &path.push_field(key), depth + 1)?;
                        errors.merge(agg);
                    }
                }
                if self.halted(errors) {
                    return Ok(());
                }
            }
        }

        if let Some(names) = &node.property_names {
            for key in map.keys() {
                match names {
                    SubSchema::Bool(true) => {}
                    SubSchema::Bool(false) => {
                        errors.insert(ValidationError::new(
                            path.push_field(key),
                            ErrorKind::PropertyForbidden { name: key.clone() },
                        ));
                    }
                    SubSchema::Node(sub) => {
                        // The key itself is validated as a string value.
                        let key_value = Value::String(key.clone());
                        let agg = self.validate_node(
                            sub,
                            Some(&key_value),
                            &path.push_field(key),
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

        Ok(())
    }

    /// A key is covered when `properties` declares it or any
    /// `patternProperties` pattern matches it; `additionalProperties` only
    /// sees uncovered keys.
    fn is_covered(&self, node: &SchemaNode, key: &str) -> bool {
        if node
            .properties
            .as_ref()
            .is_some_and(|props| props.contains_key(key))
        {
            return true;
        }
        node.pattern_properties
            .as_ref()
            .is_some_and(|patterns| patterns.iter().any(|p| p.pattern.is_match(key)))
    }
}
