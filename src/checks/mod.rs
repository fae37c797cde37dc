//! The recursive validation engine.
//!
//! A [`Checker`] walks a schema node and a value in lockstep. Per node the
//! constraint families run in a fixed order: `required`, `type`, value sets
//! (`enum`/`const`/`denied`), generic size, then the family matching the
//! value's runtime kind. Combinators run last and always run fully, even in
//! fail-fast mode. Absent values satisfy everything except an enclosing
//! `required`.

mod array;
mod combinators;
mod numeric;
mod object;
mod string;

use std::sync::Arc;

use serde_json::Value;

use crate::error::{ErrorAggregate, ErrorKind, ValidationError};
use crate::formats::FormatRegistry;
use crate::path::JsonPath;
use crate::registry::{RegistryError, SchemaRegistry};
use crate::schema::SchemaNode;
use crate::value::{matches_type, values_equal, ValueKind};

/// Failure-reporting mode.
///
/// Fail-fast stops evaluating further constraint families on a node once one
/// has failed (combinators excepted); collect evaluates every independent
/// branch. Both agree on which constraint fails first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Stop at the first failing constraint family.
    #[default]
    FailFast,
    /// Evaluate everything and aggregate all failures.
    Collect,
}

/// Per-call validation state, threaded read-only through the recursion.
#[derive(Clone, Copy)]
pub(crate) struct Checker<'a> {
    /// The root schema, owner of the `$defs` that local `$ref`s resolve
    /// against.
    pub root: &'a SchemaNode,
    pub formats: &'a FormatRegistry,
    pub registry: Option<&'a SchemaRegistry>,
    pub mode: Mode,
    pub max_depth: usize,
    pub char_count: fn(&str) -> usize,
}

/// A resolved `$ref` target: borrowed from the root's `$defs`, or shared
/// out of the registry.
enum Resolved<'a> {
    Local(&'a SchemaNode),
    Shared(Arc<SchemaNode>),
}

impl<'a> Checker<'a> {
    /// Validates `value` against `node`, returning every failure found.
    ///
    /// `Err` is reserved for unresolvable `$ref` names; ordinary violations
    /// come back inside the aggregate.
    pub(crate) fn validate_node(
        &self,
        node: &SchemaNode,
        value: Option<&Value>,
        path: &JsonPath,
        depth: usize,
    ) -> Result<ErrorAggregate, RegistryError> {
        let mut errors = ErrorAggregate::new();

        if depth > self.max_depth {
            errors.insert(ValidationError::new(
                path.clone(),
                ErrorKind::MaxDepthExceeded {
                    limit: self.max_depth,
                },
            ));
            return Ok(errors);
        }

        if let (Some(name), Some(_)) = (&node.reference, value) {
            match self.resolve_ref(name)? {
                Resolved::Local(target) => {
                    errors.merge(self.validate_node(target, value, path, depth + 1)?);
                }
                Resolved::Shared(target) => {
                    // A registry schema resolves its own refs against its
                    // own $defs.
                    let sub = Checker {
                        root: target.as_ref(),
                        ..*self
                    };
                    errors.merge(sub.validate_node(target.as_ref(), value, path, depth + 1)?);
                }
            }
        }

        'families: {
            if self.halted(&errors) {
                break 'families;
            }

            if let Some(Value::Object(map)) = value {
                self.check_required(node, map, path, &mut errors);
                if self.halted(&errors) {
                    break 'families;
                }
            }

            if let (Some(types), Some(v)) = (&node.types, value) {
                if !types.iter().any(|t| matches_type(v, *t)) {
                    errors.insert(ValidationError::new(
                        path.clone(),
                        ErrorKind::Type {
                            expected: types.clone(),
                            actual: ValueKind::of(v),
                        },
                    ));
                }
                if self.halted(&errors) {
                    break 'families;
                }
            }

            // Absence satisfies every remaining constraint.
            let Some(v) = value else { break 'families };

            self.check_value_sets(node, v, path, &mut errors);
            if self.halted(&errors) {
                break 'families;
            }

            self.check_size(node, v, path, &mut errors);
            if self.halted(&errors) {
                break 'families;
            }

            match v {
                Value::Number(_) => numeric::check(node, v, path, &mut errors),
                Value::String(s) => string::check(node, s, path, self.formats, &mut errors),
                Value::Array(items) => {
                    self.check_array(node, items, path, depth, &mut errors)?;
                }
                Value::Object(map) => {
                    self.check_object(node, map, path, depth, &mut errors)?;
                }
                Value::Null | Value::Bool(_) => {}
            }
        }

        if let Some(v) = value {
            self.check_combinators(node, v, path, depth, &mut errors)?;
        }

        Ok(errors)
    }

    /// True once fail-fast has something to report; collect never halts.
    fn halted(&self, errors: &ErrorAggregate) -> bool {
        self.mode == Mode::FailFast && !errors.is_empty()
    }

    /// A copy of this checker that aggregates everything, for combinator
    /// and sub-schema probing.
    fn as_collect(&self) -> Checker<'a> {
        Checker {
            mode: Mode::Collect,
            ..*self
        }
    }

    fn resolve_ref(&self, name: &str) -> Result<Resolved<'a>, RegistryError> {
        let name = name.strip_prefix("#/$defs/").unwrap_or(name);
        if let Some(node) = self.root.defs.as_ref().and_then(|defs| defs.get(name)) {
            return Ok(Resolved::Local(node));
        }
        if let Some(node) = self.registry.and_then(|registry| registry.get(name)) {
            return Ok(Resolved::Shared(node));
        }
        Err(RegistryError::SchemaNotFound(name.to_string()))
    }

    fn check_required(
        &self,
        node: &SchemaNode,
        map: &serde_json::Map<String, Value>,
        path: &JsonPath,
        errors: &mut ErrorAggregate,
    ) {
        let Some(required) = &node.required else {
            return;
        };
        for name in required {
            if !map.contains_key(name) {
                errors.insert(ValidationError::new(
                    path.push_field(name),
                    ErrorKind::Required { name: name.clone() },
                ));
            }
        }
    }

    fn check_value_sets(
        &self,
        node: &SchemaNode,
        value: &Value,
        path: &JsonPath,
        errors: &mut ErrorAggregate,
    ) {
        if let Some(allowed) = &node.enum_values {
            if !allowed.iter().any(|member| values_equal(value, member)) {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::Enum {
                        allowed: allowed.clone(),
                    },
                ));
            }
        }

        if let Some(expected) = &node.const_value {
            if !values_equal(value, expected) {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::Const {
                        expected: expected.clone(),
                    },
                ));
            }
        }

        if let Some(denied) = &node.denied {
            // Arrays are screened element-wise, everything else as a whole.
            match value {
                Value::Array(items) => {
                    for (index, element) in items.iter().enumerate() {
                        if denied.iter().any(|member| values_equal(element, member)) {
                            errors.insert(ValidationError::new(
                                path.push_index(index),
                                ErrorKind::Denied {
                                    value: element.clone(),
                                },
                            ));
                            if self.halted(errors) {
                                return;
                            }
                        }
                    }
                }
                other => {
                    if denied.iter().any(|member| values_equal(other, member)) {
                        errors.insert(ValidationError::new(
                            path.clone(),
                            ErrorKind::Denied {
                                value: other.clone(),
                            },
                        ));
                    }
                }
            }
        }
    }

    /// The generic size family: `length`, `minLength`, `maxLength` apply to
    /// any value exposing a size.
    fn check_size(
        &self,
        node: &SchemaNode,
        value: &Value,
        path: &JsonPath,
        errors: &mut ErrorAggregate,
    ) {
        let Some(actual) = self.size_of(value) else {
            return;
        };

        if let Some(expected) = node.length {
            if actual != expected {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::Length { expected, actual },
                ));
            }
        }
        if let Some(limit) = node.min_length {
            if actual < limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MinLength { limit, actual },
                ));
            }
        }
        if let Some(limit) = node.max_length {
            if actual > limit {
                errors.insert(ValidationError::new(
                    path.clone(),
                    ErrorKind::MaxLength { limit, actual },
                ));
            }
        }
    }

    fn size_of(&self, value: &Value) -> Option<usize> {
        match value {
            Value::String(s) => Some((self.char_count)(s)),
            Value::Array(items) => Some(items.len()),
            Value::Object(map) => Some(map.len()),
            _ => None,
        }
    }
}
