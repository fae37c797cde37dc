//! # Verdict
//!
//! A schema validation engine for structured values, modeled on JSON Schema.
//! Given a declarative constraint document and a value, it determines
//! conformance and, on failure, reports every violated constraint with the
//! exact location inside the value where it occurred.
//!
//! ## Overview
//!
//! A schema is an attribute document (`type`, `minimum`, `properties`,
//! `allOf`, ...) compiled once into a [`SchemaNode`]. A [`Validator`] binds
//! the node to its configuration (format predicates, an optional
//! [`SchemaRegistry`] for `$ref`, a recursion depth guard) and walks the
//! schema and the value in lockstep. Failures are either raised on first
//! contact (fail-fast, the default) or accumulated into an
//! [`ErrorAggregate`] keyed by path (collect mode), using stillwater's
//! `Validation` type for applicative error accumulation.
//!
//! ## Core Types
//!
//! - [`Validator`]: construction-time schema checking plus `validate`,
//!   `is_valid` and `get_errors`
//! - [`SchemaNode`]: the compiled, immutable constraint document
//! - [`JsonPath`]: paths to values in nested structures (e.g., `users[0].email`)
//! - [`ValidationError`] / [`ErrorAggregate`]: a single failure with its
//!   path and reason, and the path-keyed collection of them
//! - [`SchemaRegistry`]: thread-safe named-schema storage for `$ref`
//!
//! ## Example
//!
//! ```rust
//! use verdict::Validator;
//! use serde_json::json;
//!
//! let validator = Validator::new(&json!({
//!     "type": "object",
//!     "properties": {
//!         "name": {"type": "string", "minLength": 1},
//!         "age": {"type": "number", "minimum": 18}
//!     },
//!     "required": ["name", "age"]
//! }))
//! .unwrap();
//!
//! assert!(validator.is_valid(&json!({"name": "Ada", "age": 36})));
//!
//! // Collect mode reports every violation, keyed by path.
//! let errors = validator
//!     .get_errors(&json!({"name": "", "age": 15}))
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(errors.len(), 2);
//! assert_eq!(errors.get("name").unwrap().code(), "min_length");
//! assert_eq!(errors.get("age").unwrap().code(), "minimum");
//! ```

pub mod error;
pub mod formats;
pub mod path;
pub mod registry;
pub mod schema;
pub mod validator;
pub mod value;

mod checks;

pub use checks::Mode;
pub use error::{ErrorAggregate, ErrorKind, ValidateError, ValidationError};
pub use formats::{FormatPredicate, FormatRegistry};
pub use path::{JsonPath, PathError, PathSegment};
pub use registry::{RegistryError, SchemaRegistry};
pub use schema::{
    CompiledPattern, PatternProperty, ResolveError, SchemaBuildError, SchemaNode, SubSchema,
    DEFAULT_SCHEMA_URI,
};
pub use validator::{
    default_char_count, ValidateOptions, Validator, ValidatorOptions, DEFAULT_MAX_DEPTH,
};
pub use value::{matches_type, values_equal, ValueKind};

/// Type alias for validation results using ErrorAggregate
pub type ValidationResult<T> = stillwater::Validation<T, ErrorAggregate>;
