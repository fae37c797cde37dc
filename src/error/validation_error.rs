//! Validation error taxonomy and aggregation.
//!
//! Every constraint family produces exactly one [`ErrorKind`] variant, each
//! carrying the violated constraint's own parameters. Errors are aggregated
//! into an [`ErrorAggregate`], a path-keyed map in which a later failure at
//! the same path overwrites an earlier one within a single pass.

use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::Value;
use stillwater::prelude::*;

use crate::path::JsonPath;
use crate::registry::RegistryError;
use crate::value::ValueKind;

/// The closed set of failure reasons, one per constraint family.
///
/// Each variant carries the constraint's own parameters (the violated bound,
/// the disallowed set, the matched pattern) so callers can pattern-match on
/// the specific failure without parsing messages.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// The value's runtime kind is not in the declared `type` set.
    Type {
        expected: Vec<ValueKind>,
        actual: ValueKind,
    },
    /// A key listed in `required` is absent.
    Required { name: String },
    /// The value deep-equals no member of `enum`.
    Enum { allowed: Vec<Value> },
    /// The value does not deep-equal `const`.
    Const { expected: Value },
    /// The value (or an array element) deep-equals a `denied` member.
    Denied { value: Value },
    Minimum { limit: f64, value: f64 },
    Maximum { limit: f64, value: f64 },
    ExclusiveMinimum { limit: f64, value: f64 },
    ExclusiveMaximum { limit: f64, value: f64 },
    MultipleOf { divisor: f64, value: f64 },
    /// Exact-size mismatch for any sized value.
    Length { expected: usize, actual: usize },
    MinLength { limit: usize, actual: usize },
    MaxLength { limit: usize, actual: usize },
    MinWords { limit: usize, actual: usize },
    MaxWords { limit: usize, actual: usize },
    Pattern { pattern: String },
    Format { format: String },
    MinItems { limit: usize, actual: usize },
    MaxItems { limit: usize, actual: usize },
    /// An element beyond `prefixItems` when `items` is `false`.
    AdditionalItem { index: usize },
    UniqueItems { first: usize, second: usize },
    /// No element matched `contains` (default at-least-one rule).
    Contains,
    MinContains { limit: usize, actual: usize },
    MaxContains { limit: usize, actual: usize },
    MinProperties { limit: usize, actual: usize },
    MaxProperties { limit: usize, actual: usize },
    /// A key whose `properties` entry is the boolean `false` is present.
    PropertyForbidden { name: String },
    /// A key not covered by `properties`/`patternProperties` when
    /// `additionalProperties` is `false`.
    AdditionalProperty { name: String },
    /// Zero `anyOf` branches passed.
    AnyOf { schemas: usize },
    /// The `oneOf` pass-count was not exactly one.
    OneOf { schemas: usize, matched: usize },
    /// The `not` sub-schema passed.
    Not,
    /// Recursion exceeded the configured depth guard.
    MaxDepthExceeded { limit: usize },
}

impl ErrorKind {
    /// Returns the stable machine-readable code for this reason.
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Type { .. } => "type",
            ErrorKind::Required { .. } => "required",
            ErrorKind::Enum { .. } => "enum",
            ErrorKind::Const { .. } => "const",
            ErrorKind::Denied { .. } => "denied",
            ErrorKind::Minimum { .. } => "minimum",
            ErrorKind::Maximum { .. } => "maximum",
            ErrorKind::ExclusiveMinimum { .. } => "exclusive_minimum",
            ErrorKind::ExclusiveMaximum { .. } => "exclusive_maximum",
            ErrorKind::MultipleOf { .. } => "multiple_of",
            ErrorKind::Length { .. } => "length",
            ErrorKind::MinLength { .. } => "min_length",
            ErrorKind::MaxLength { .. } => "max_length",
            ErrorKind::MinWords { .. } => "min_words",
            ErrorKind::MaxWords { .. } => "max_words",
            ErrorKind::Pattern { .. } => "pattern",
            ErrorKind::Format { .. } => "format",
            ErrorKind::MinItems { .. } => "min_items",
            ErrorKind::MaxItems { .. } => "max_items",
            ErrorKind::AdditionalItem { .. } => "additional_item",
            ErrorKind::UniqueItems { .. } => "unique_items",
            ErrorKind::Contains => "contains",
            ErrorKind::MinContains { .. } => "min_contains",
            ErrorKind::MaxContains { .. } => "max_contains",
            ErrorKind::MinProperties { .. } => "min_properties",
            ErrorKind::MaxProperties { .. } => "max_properties",
            ErrorKind::PropertyForbidden { .. } => "property_forbidden",
            ErrorKind::AdditionalProperty { .. } => "additional_property",
            ErrorKind::AnyOf { .. } => "any_of",
            ErrorKind::OneOf { .. } => "one_of",
            ErrorKind::Not => "not",
            ErrorKind::MaxDepthExceeded { .. } => "max_depth_exceeded",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Type { expected, actual } => {
                let names: Vec<_> = expected.iter().map(|k| k.name()).collect();
                write!(f, "expected {}, got {}", names.join(" or "), actual)
            }
            ErrorKind::Required { name } => {
                write!(f, "required field '{}' is missing", name)
            }
            ErrorKind::Enum { allowed } => {
                write!(f, "value is not one of {} allowed values", allowed.len())
            }
            ErrorKind::Const { expected } => {
                write!(f, "value must equal {}", expected)
            }
            ErrorKind::Denied { value } => write!(f, "value {} is denied", value),
            ErrorKind::Minimum { limit, value } => {
                write!(f, "value must be at least {}, got {}", limit, value)
            }
            ErrorKind::Maximum { limit, value } => {
                write!(f, "value must be at most {}, got {}", limit, value)
            }
            ErrorKind::ExclusiveMinimum { limit, value } => {
                write!(f, "value must be greater than {}, got {}", limit, value)
            }
            ErrorKind::ExclusiveMaximum { limit, value } => {
                write!(f, "value must be less than {}, got {}", limit, value)
            }
            ErrorKind::MultipleOf { divisor, value } => {
                write!(f, "value must be a multiple of {}, got {}", divisor, value)
            }
            ErrorKind::Length { expected, actual } => {
                write!(f, "size must be exactly {}, got {}", expected, actual)
            }
            ErrorKind::MinLength { limit, actual } => {
                write!(f, "length must be at least {}, got {}", limit, actual)
            }
            ErrorKind::MaxLength { limit, actual } => {
                write!(f, "length must be at most {}, got {}", limit, actual)
            }
            ErrorKind::MinWords { limit, actual } => {
                write!(f, "must contain at least {} words, got {}", limit, actual)
            }
            ErrorKind::MaxWords { limit, actual } => {
                write!(f, "must contain at most {} words, got {}", limit, actual)
            }
            ErrorKind::Pattern { pattern } => {
                write!(f, "must match pattern '{}'", pattern)
            }
            ErrorKind::Format { format } => write!(f, "must be a valid {}", format),
            ErrorKind::MinItems { limit, actual } => {
                write!(f, "array must have at least {} items, got {}", limit, actual)
            }
            ErrorKind::MaxItems { limit, actual } => {
                write!(f, "array must have at most {} items, got {}", limit, actual)
            }
            ErrorKind::AdditionalItem { index } => {
                write!(f, "item at index {} is not allowed", index)
            }
            ErrorKind::UniqueItems { first, second } => {
                write!(f, "items at indices {} and {} are duplicates", first, second)
            }
            ErrorKind::Contains => write!(f, "no item matches the 'contains' schema"),
            ErrorKind::MinContains { limit, actual } => {
                write!(
                    f,
                    "at least {} items must match 'contains', got {}",
                    limit, actual
                )
            }
            ErrorKind::MaxContains { limit, actual } => {
                write!(
                    f,
                    "at most {} items may match 'contains', got {}",
                    limit, actual
                )
            }
            ErrorKind::MinProperties { limit, actual } => {
                write!(
                    f,
                    "object must have at least {} properties, got {}",
                    limit, actual
                )
            }
            ErrorKind::MaxProperties { limit, actual } => {
                write!(
                    f,
                    "object must have at most {} properties, got {}",
                    limit, actual
                )
            }
            ErrorKind::PropertyForbidden { name } => {
                write!(f, "property '{}' is not allowed", name)
            }
            ErrorKind::AdditionalProperty { name } => {
                write!(f, "unknown property '{}'", name)
            }
            ErrorKind::AnyOf { schemas } => {
                write!(f, "value did not match any of {} schemas", schemas)
            }
            ErrorKind::OneOf { schemas, matched } => {
                write!(
                    f,
                    "value matched {} of {} schemas, expected exactly one",
                    matched, schemas
                )
            }
            ErrorKind::Not => write!(f, "value must not match the 'not' schema"),
            ErrorKind::MaxDepthExceeded { limit } => {
                write!(f, "maximum validation depth {} exceeded", limit)
            }
        }
    }
}

/// A single validation failure: where it happened and why.
///
/// # Example
///
/// ```rust
/// use verdict::{ErrorKind, JsonPath, ValidationError};
///
/// let error = ValidationError::new(
///     JsonPath::root().push_field("age"),
///     ErrorKind::Minimum { limit: 18.0, value: 15.0 },
/// );
///
/// assert_eq!(error.code(), "minimum");
/// assert_eq!(error.to_string(), "age: value must be at least 18, got 15");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// The path to the value that failed validation.
    pub path: JsonPath,
    /// The reason, with the violated constraint's parameters.
    pub kind: ErrorKind,
}

impl ValidationError {
    /// Creates a new validation error at the given path.
    pub fn new(path: JsonPath, kind: ErrorKind) -> Self {
        Self { path, kind }
    }

    /// Returns the stable machine-readable code for this error's reason.
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "(root): {}", self.kind)
        } else {
            write!(f, "{}: {}", self.path, self.kind)
        }
    }
}

impl std::error::Error for ValidationError {}

/// A path-keyed collection of validation errors.
///
/// One entry is kept per distinct failing path; inserting a second error at
/// the same path overwrites the first within a single aggregation pass.
/// Iteration order is insertion order.
///
/// `ErrorAggregate` implements `Semigroup`, so sub-aggregates produced by
/// nested schemas and combinators merge into the top-level one:
///
/// ```rust
/// use verdict::{ErrorAggregate, ErrorKind, JsonPath, ValidationError};
/// use stillwater::prelude::*;
///
/// let mut a = ErrorAggregate::new();
/// a.insert(ValidationError::new(
///     JsonPath::from_field("name"),
///     ErrorKind::Required { name: "name".into() },
/// ));
/// let mut b = ErrorAggregate::new();
/// b.insert(ValidationError::new(
///     JsonPath::from_field("age"),
///     ErrorKind::Minimum { limit: 18.0, value: 15.0 },
/// ));
///
/// let combined = a.combine(b);
/// assert_eq!(combined.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ErrorAggregate {
    entries: IndexMap<String, ValidationError>,
}

impl ErrorAggregate {
    /// Creates an empty aggregate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an aggregate containing a single error.
    pub fn single(error: ValidationError) -> Self {
        let mut agg = Self::new();
        agg.insert(error);
        agg
    }

    /// Inserts an error, keyed by its path.
    ///
    /// A previous error at the same path is overwritten.
    pub fn insert(&mut self, error: ValidationError) {
        self.entries.insert(error.path.to_string(), error);
    }

    /// Merges all entries of `other` into this aggregate.
    ///
    /// Entries of `other` win on path collisions.
    pub fn merge(&mut self, other: ErrorAggregate) {
        for (path, error) in other.entries {
            self.entries.insert(path, error);
        }
    }

    /// Returns the number of distinct failing paths.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no errors were recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the error recorded at the given path string, if any.
    pub fn get(&self, path: &str) -> Option<&ValidationError> {
        self.entries.get(path)
    }

    /// Returns true if an error was recorded at the given path string.
    pub fn contains(&self, path: &str) -> bool {
        self.entries.contains_key(path)
    }

    /// Returns the first recorded error, if any.
    pub fn first(&self) -> Option<&ValidationError> {
        self.entries.values().next()
    }

    /// Iterates over `(path, error)` entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ValidationError)> {
        self.entries.iter().map(|(p, e)| (p.as_str(), e))
    }

    /// Iterates over the recorded errors in insertion order.
    pub fn errors(&self) -> impl Iterator<Item = &ValidationError> {
        self.entries.values()
    }

    /// Returns all errors with the specified reason code.
    pub fn with_code(&self, code: &str) -> Vec<&ValidationError> {
        self.entries.values().filter(|e| e.code() == code).collect()
    }

    /// Converts this aggregate into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.entries.into_values().collect()
    }
}

impl Semigroup for ErrorAggregate {
    fn combine(mut self, other: Self) -> Self {
        self.merge(other);
        self
    }
}

impl Display for ErrorAggregate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.errors().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl IntoIterator for ErrorAggregate {
    type Item = ValidationError;
    type IntoIter = indexmap::map::IntoValues<String, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_values()
    }
}

/// The failure side of the throwing `validate` entry point.
///
/// Ordinary data violations carry the full aggregate; an unresolvable `$ref`
/// is a schema configuration problem discovered lazily and is kept distinct
/// so callers never mistake it for a data error.
#[derive(Debug, thiserror::Error)]
pub enum ValidateError {
    /// The value violated one or more constraints.
    #[error("{0}")]
    Invalid(ErrorAggregate),
    /// A `$ref` could not be resolved against the supplied registry.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl ValidateError {
    /// Returns the aggregate if this is an ordinary validation failure.
    pub fn aggregate(&self) -> Option<&ErrorAggregate> {
        match self {
            ValidateError::Invalid(agg) => Some(agg),
            ValidateError::Registry(_) => None,
        }
    }
}

// All error types are owned data and must stay shareable across threads.
const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
    assert_send::<ErrorAggregate>();
    assert_sync::<ErrorAggregate>();
};
