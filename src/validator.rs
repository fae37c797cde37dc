//! The validator façade: construction-time schema checking and the
//! validation entry points.

use serde_json::Value;
use stillwater::Validation;

use crate::checks::{Checker, Mode};
use crate::error::{ErrorAggregate, ValidateError};
use crate::formats::FormatRegistry;
use crate::path::JsonPath;
use crate::registry::{RegistryError, SchemaRegistry};
use crate::schema::{ResolveError, SchemaBuildError, SchemaNode};
use crate::ValidationResult;

/// The depth guard applied when neither the options nor a registry set one.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Counts characters rather than bytes, so multi-byte text measures by
/// visible length. Swap in a grapheme segmenter via
/// [`ValidatorOptions::char_count`] where cluster-accurate counts matter.
pub fn default_char_count(s: &str) -> usize {
    s.chars().count()
}

/// Construction-time configuration for a [`Validator`].
#[derive(Clone)]
pub struct ValidatorOptions {
    /// Format predicates; defaults to the built-in set. Custom entries
    /// merged over it win on name collisions.
    pub formats: FormatRegistry,
    /// Named schemas for `$ref` resolution.
    pub registry: Option<SchemaRegistry>,
    /// When true, a `format` naming an unregistered predicate fails
    /// construction; when false (default) it logs a warning and the check
    /// is skipped.
    pub strict_formats: bool,
    /// Recursion depth guard. Falls back to the registry's configured
    /// depth, then to [`DEFAULT_MAX_DEPTH`].
    pub max_depth: Option<usize>,
    /// The string length measurement used by `length`/`minLength`/
    /// `maxLength`.
    pub char_count: fn(&str) -> usize,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            formats: FormatRegistry::defaults(),
            registry: None,
            strict_formats: false,
            max_depth: None,
            char_count: default_char_count,
        }
    }
}

impl std::fmt::Debug for ValidatorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorOptions")
            .field("formats", &self.formats)
            .field("registry", &self.registry.as_ref().map(|r| r.names()))
            .field("strict_formats", &self.strict_formats)
            .field("max_depth", &self.max_depth)
            .finish()
    }
}

/// Per-call validation options.
#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    /// Fail-fast (default) or collect-all reporting.
    pub mode: Mode,
    /// Base location prepended to every reported path.
    pub path: JsonPath,
}

impl ValidateOptions {
    /// Options for collect-all reporting at the root path.
    pub fn collect() -> Self {
        Self {
            mode: Mode::Collect,
            ..Self::default()
        }
    }
}

/// A schema bound to its validation configuration.
///
/// Construction validates the schema document's own shape; validation of
/// data never re-checks it. A `Validator` is immutable and can be shared
/// across threads.
///
/// # Example
///
/// ```rust
/// use verdict::Validator;
/// use serde_json::json;
///
/// let validator = Validator::new(&json!({
///     "type": "object",
///     "properties": {"age": {"type": "number", "minimum": 18}},
///     "required": ["age"]
/// }))
/// .unwrap();
///
/// assert!(validator.is_valid(&json!({"age": 20})));
/// assert!(!validator.is_valid(&json!({"age": 15})));
///
/// let err = validator.validate(&json!({})).unwrap_err();
/// let aggregate = err.aggregate().unwrap();
/// assert_eq!(aggregate.get("age").unwrap().code(), "required");
/// ```
#[derive(Debug, Clone)]
pub struct Validator {
    schema: SchemaNode,
    options: ValidatorOptions,
}

impl Validator {
    /// Builds a validator from an attribute document with default options.
    pub fn new(attrs: &Value) -> Result<Self, SchemaBuildError> {
        Self::with_options(attrs, ValidatorOptions::default())
    }

    /// Builds a validator from an attribute document.
    ///
    /// # Errors
    ///
    /// Fails on a malformed document, and in strict mode on a `format`
    /// naming no registered predicate.
    pub fn with_options(attrs: &Value, options: ValidatorOptions) -> Result<Self, SchemaBuildError> {
        Self::from_node(SchemaNode::from_value(attrs)?, options)
    }

    /// Builds a validator around an already-constructed schema node.
    pub fn from_node(schema: SchemaNode, options: ValidatorOptions) -> Result<Self, SchemaBuildError> {
        check_formats(&schema, &options)?;
        Ok(Self { schema, options })
    }

    /// Validates a value, failing fast by default.
    ///
    /// The error carries the aggregate assembled before evaluation stopped.
    pub fn validate(&self, value: &Value) -> Result<(), ValidateError> {
        self.validate_opt(Some(value), &ValidateOptions::default())
    }

    /// Validates a value with explicit per-call options.
    pub fn validate_with(
        &self,
        value: &Value,
        options: &ValidateOptions,
    ) -> Result<(), ValidateError> {
        self.validate_opt(Some(value), options)
    }

    /// Validates a possibly-absent value.
    ///
    /// Absence satisfies every constraint except an enclosing `required`,
    /// so `validate_opt(None, ..)` always succeeds at the top level.
    pub fn validate_opt(
        &self,
        value: Option<&Value>,
        options: &ValidateOptions,
    ) -> Result<(), ValidateError> {
        let errors = self.run(value, options)?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidateError::Invalid(errors))
        }
    }

    /// Returns true if the value passes validation.
    ///
    /// An unresolvable `$ref` also yields `false`; use [`Validator::validate`]
    /// or [`Validator::get_errors`] to tell the two cases apart.
    pub fn is_valid(&self, value: &Value) -> bool {
        self.run(Some(value), &ValidateOptions::default())
            .map(|errors| errors.is_empty())
            .unwrap_or(false)
    }

    /// Collects every violation, or `None` when the value is clean.
    pub fn get_errors(&self, value: &Value) -> Result<Option<ErrorAggregate>, RegistryError> {
        let errors = self.run(Some(value), &ValidateOptions::collect())?;
        Ok((!errors.is_empty()).then_some(errors))
    }

    /// Collect-mode validation as a `Validation`, for applicative
    /// composition with other validated inputs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::Validator;
    /// use serde_json::json;
    ///
    /// let validator = Validator::new(&json!({"type": "integer"})).unwrap();
    /// assert!(validator.check(&json!(3)).unwrap().is_success());
    /// assert!(validator.check(&json!("3")).unwrap().is_failure());
    /// ```
    pub fn check(&self, value: &Value) -> Result<ValidationResult<()>, RegistryError> {
        let errors = self.run(Some(value), &ValidateOptions::collect())?;
        Ok(if errors.is_empty() {
            Validation::Success(())
        } else {
            Validation::Failure(errors)
        })
    }

    /// Returns the declared sub-schema for a property name.
    pub fn get_property(&self, name: &str) -> Option<&crate::schema::SubSchema> {
        self.schema.get_property(name)
    }

    /// Resolves the sub-schema for a data path string such as
    /// `users[0].email`.
    pub fn resolve_property(&self, path: &str) -> Result<&SchemaNode, ResolveError> {
        self.schema.resolve_path(&JsonPath::parse(path)?)
    }

    /// Returns true if `name` is listed in the schema's `required`.
    pub fn is_property_required(&self, name: &str) -> bool {
        self.schema.is_property_required(name)
    }

    /// Serializes the schema back into its attribute document.
    pub fn to_attributes(&self) -> Value {
        self.schema.to_attributes()
    }

    /// Returns the underlying schema node.
    pub fn schema(&self) -> &SchemaNode {
        &self.schema
    }

    fn run(
        &self,
        value: Option<&Value>,
        options: &ValidateOptions,
    ) -> Result<ErrorAggregate, RegistryError> {
        let max_depth = self
            .options
            .max_depth
            .or_else(|| self.options.registry.as_ref().map(SchemaRegistry::max_depth))
            .unwrap_or(DEFAULT_MAX_DEPTH);

        let checker = Checker {
            root: &self.schema,
            formats: &self.options.formats,
            registry: self.options.registry.as_ref(),
            mode: options.mode,
            max_depth,
            char_count: self.options.char_count,
        };
        checker.validate_node(&self.schema, value, &options.path, 0)
    }
}

/// Walks the schema checking every `format` against the registry.
fn check_formats(schema: &SchemaNode, options: &ValidatorOptions) -> Result<(), SchemaBuildError> {
    let mut unknown = None;
    walk(schema, &mut |node| {
        if let Some(format) = &node.format {
            if !options.formats.contains(format) {
                if options.strict_formats {
                    if unknown.is_none() {
                        unknown = Some(format.clone());
                    }
                } else {
                    tracing::warn!(format = %format, "unknown format, check will be skipped");
                }
            }
        }
    });
    match unknown {
        Some(format) => Err(SchemaBuildError::UnknownFormat(format)),
        None => Ok(()),
    }
}

fn walk(node: &SchemaNode, visit: &mut dyn FnMut(&SchemaNode)) {
    visit(node);
    node.for_each_nested(&mut |child| walk(child, visit));
}
