//! Named schema storage for `$ref` resolution.
//!
//! This module provides the [`SchemaRegistry`] that stores named schemas
//! and resolves `$ref` attributes during validation.

use parking_lot::RwLock;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;

use crate::schema::{SchemaBuildError, SchemaNode, DEFAULT_SCHEMA_URI};

/// Type alias for the schema storage map.
type SchemaMap = Arc<RwLock<HashMap<String, Arc<SchemaNode>>>>;

/// A thread-safe registry for storing and retrieving named schemas.
///
/// The registry enables schema reuse through references: a node whose
/// `$ref` names a registered schema validates against that schema. Names
/// not found in the validated node's own `$defs` are looked up here.
///
/// # Thread Safety
///
/// The registry uses `Arc<RwLock<...>>` for thread-safe access:
/// - Multiple threads can validate concurrently (read-only access)
/// - Registration operations are serialized (write access)
///
/// # Example
///
/// ```rust
/// use verdict::SchemaRegistry;
/// use serde_json::json;
///
/// let registry = SchemaRegistry::new();
///
/// // Register base schemas
/// registry.register("Email", &json!({"type": "string", "format": "email"})).unwrap();
/// registry.register("UserId", &json!({"type": "integer", "exclusiveMinimum": 0})).unwrap();
///
/// // Register schemas that use references
/// registry.register("User", &json!({
///     "type": "object",
///     "properties": {
///         "id": {"$ref": "UserId"},
///         "email": {"$ref": "Email"}
///     }
/// })).unwrap();
/// ```
pub struct SchemaRegistry {
    schemas: SchemaMap,
    max_depth: usize,
}

impl SchemaRegistry {
    /// Creates a new empty schema registry with default max depth (100).
    pub fn new() -> Self {
        Self {
            schemas: Arc::new(RwLock::new(HashMap::new())),
            max_depth: 100,
        }
    }

    /// Sets the maximum reference depth for circular reference prevention.
    ///
    /// The default max depth is 100. When validating recursive schemas, a
    /// reference chain exceeding this depth fails validation with a
    /// `max_depth_exceeded` error.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::SchemaRegistry;
    ///
    /// let registry = SchemaRegistry::new()
    ///     .with_max_depth(50);
    /// ```
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Returns the configured maximum reference depth.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Registers a schema built from an attribute document.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::DuplicateName` if the name is already
    /// registered, or `RegistryError::Build` if the document is malformed.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::SchemaRegistry;
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("Email", &json!({"type": "string"})).unwrap();
    ///
    /// // Duplicate registration fails
    /// assert!(registry.register("Email", &json!({"type": "string"})).is_err());
    /// ```
    pub fn register(&self, name: impl Into<String>, attrs: &Value) -> Result<(), RegistryError> {
        self.register_node(name, SchemaNode::from_value(attrs)?)
    }

    /// Registers an already-built schema node.
    pub fn register_node(
        &self,
        name: impl Into<String>,
        node: SchemaNode,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        let mut schemas = self.schemas.write();

        if schemas.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }

        schemas.insert(name, Arc::new(node));
        Ok(())
    }

    /// Retrieves a schema by name.
    ///
    /// Returns `None` if no schema with the given name is registered.
    pub fn get(&self, name: &str) -> Option<Arc<SchemaNode>> {
        self.schemas.read().get(name).cloned()
    }

    /// Returns true if a schema is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.schemas.read().contains_key(name)
    }

    /// Returns the registered schema names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<_> = self.schemas.read().keys().cloned().collect();
        names.sort();
        names
    }

    /// Validates that all schema references can be resolved.
    ///
    /// Returns the reference names that resolve neither against the
    /// referencing schema's own `$defs` nor against the registry. This
    /// should be called after all schemas are registered.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::SchemaRegistry;
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("User", &json!({
    ///     "type": "object",
    ///     "properties": {"id": {"$ref": "UserId"}}  // UserId not registered!
    /// })).unwrap();
    ///
    /// let unresolved = registry.validate_refs();
    /// assert_eq!(unresolved, vec!["UserId"]);
    /// ```
    pub fn validate_refs(&self) -> Vec<String> {
        let schemas = self.schemas.read();
        let mut unresolved = Vec::new();

        for schema in schemas.values() {
            let mut refs = Vec::new();
            schema.collect_refs(&mut refs);
            for name in refs {
                let name = name.strip_prefix("#/$defs/").unwrap_or(&name);
                let local = schema
                    .defs
                    .as_ref()
                    .is_some_and(|defs| defs.contains_key(name));
                if !local && !schemas.contains_key(name) {
                    unresolved.push(name.to_string());
                }
            }
        }

        unresolved.sort();
        unresolved.dedup();
        unresolved
    }

    /// Exports all registered schemas as a single document with `$defs`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use verdict::SchemaRegistry;
    /// use serde_json::json;
    ///
    /// let registry = SchemaRegistry::new();
    /// registry.register("UserId", &json!({"type": "integer"})).unwrap();
    ///
    /// let doc = registry.to_defs_document();
    /// assert_eq!(doc["$defs"]["UserId"]["type"], "integer");
    /// ```
    pub fn to_defs_document(&self) -> Value {
        let schemas = self.schemas.read();
        let mut defs = serde_json::Map::new();

        for (name, schema) in schemas.iter() {
            defs.insert(name.clone(), schema.to_attributes());
        }

        json!({
            "$schema": DEFAULT_SCHEMA_URI,
            "$defs": defs
        })
    }
}

impl Default for SchemaRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SchemaRegistry {
    fn clone(&self) -> Self {
        Self {
            schemas: Arc::clone(&self.schemas),
            max_depth: self.max_depth,
        }
    }
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a schema with a name that already exists.
    #[error("schema '{0}' already registered")]
    DuplicateName(String),

    /// A `$ref` named a schema that doesn't exist.
    #[error("schema '{0}' not found")]
    SchemaNotFound(String),

    /// The attribute document submitted for registration was malformed.
    #[error(transparent)]
    Build(#[from] SchemaBuildError),
}
