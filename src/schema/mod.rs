//! The schema data model.
//!
//! A [`SchemaNode`] is the recursive attribute bag describing constraints on
//! a value. Every field is optional; absence means "no constraint". Nodes are
//! immutable after construction: transforms always produce a new node.

mod build;
mod transform;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::{Map, Value};

pub use build::SchemaBuildError;

use crate::path::{JsonPath, PathError, PathSegment};
use crate::value::ValueKind;

/// The draft identifier injected into `$schema` when absent.
pub const DEFAULT_SCHEMA_URI: &str = "https://json-schema.org/draft/2020-12/schema";

/// A nested schema position that admits a boolean.
///
/// `Bool(true)` accepts anything, `Bool(false)` rejects everything. This is
/// the meaning of `items: false`, `"name": false` under `properties`, and
/// the two settings of `additionalProperties`.
#[derive(Debug, Clone)]
pub enum SubSchema {
    Bool(bool),
    Node(Box<SchemaNode>),
}

impl SubSchema {
    /// Returns the nested node, if this position holds one.
    pub fn as_node(&self) -> Option<&SchemaNode> {
        match self {
            SubSchema::Node(node) => Some(node),
            SubSchema::Bool(_) => None,
        }
    }

    fn to_attributes(&self) -> Value {
        match self {
            SubSchema::Bool(b) => Value::Bool(*b),
            SubSchema::Node(node) => node.to_attributes(),
        }
    }
}

/// A regex compiled once at schema construction, keeping its source text
/// for error reporting and round-tripping.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pub source: String,
    pub regex: Regex,
}

impl CompiledPattern {
    pub(crate) fn new(source: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            source: source.to_string(),
            regex: Regex::new(source)?,
        })
    }

    /// Returns true if the pattern matches anywhere in `value`.
    pub fn is_match(&self, value: &str) -> bool {
        self.regex.is_match(value)
    }
}

/// One `patternProperties` entry: keys matching the pattern validate
/// against the schema.
#[derive(Debug, Clone)]
pub struct PatternProperty {
    pub pattern: CompiledPattern,
    pub schema: SubSchema,
}

/// Errors raised by schema-path introspection.
///
/// These are developer-facing lookup failures, distinct from data
/// validation errors and never folded into an aggregate.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error(transparent)]
    Path(#[from] PathError),
    #[error("cannot resolve '{segment}' in path '{path}'")]
    Unresolvable { path: String, segment: String },
}

/// The recursive constraint document.
///
/// Constructed from an attribute document via [`SchemaNode::from_value`],
/// which validates the document's own shape (§"schema-of-schema") before any
/// data is validated. Unknown attributes are preserved and round-trip
/// through [`SchemaNode::to_attributes`].
///
/// # Example
///
/// ```rust
/// use verdict::SchemaNode;
/// use serde_json::json;
///
/// let node = SchemaNode::from_value(&json!({
///     "type": "object",
///     "properties": {"age": {"type": "number", "minimum": 18}},
///     "required": ["age"],
/// }))
/// .unwrap();
///
/// assert!(node.is_property_required("age"));
/// assert!(node.get_property("age").is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct SchemaNode {
    pub id: Option<String>,
    pub schema: Option<String>,
    pub title: Option<String>,
    /// The `type` set; the value's kind must match at least one member.
    pub types: Option<Vec<ValueKind>>,
    pub enum_values: Option<Vec<Value>>,
    pub const_value: Option<Value>,
    pub denied: Option<Vec<Value>>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: Option<f64>,
    pub exclusive_maximum: Option<f64>,
    pub multiple_of: Option<f64>,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<CompiledPattern>,
    pub format: Option<String>,
    pub min_words: Option<usize>,
    pub max_words: Option<usize>,
    /// Exact size, for strings, arrays, and objects alike.
    pub length: Option<usize>,
    pub min_properties: Option<usize>,
    pub max_properties: Option<usize>,
    pub items: Option<SubSchema>,
    pub prefix_items: Option<Vec<SchemaNode>>,
    pub min_items: Option<usize>,
    pub max_items: Option<usize>,
    pub unique_items: Option<bool>,
    pub contains: Option<SubSchema>,
    pub min_contains: Option<usize>,
    pub max_contains: Option<usize>,
    pub properties: Option<IndexMap<String, SubSchema>>,
    pub pattern_properties: Option<Vec<PatternProperty>>,
    pub additional_properties: Option<SubSchema>,
    pub property_names: Option<SubSchema>,
    pub required: Option<Vec<String>>,
    pub all_of: Option<Vec<SchemaNode>>,
    pub any_of: Option<Vec<SchemaNode>>,
    pub one_of: Option<Vec<SchemaNode>>,
    pub not: Option<Box<SchemaNode>>,
    pub defs: Option<IndexMap<String, SchemaNode>>,
    pub reference: Option<String>,
    /// Attributes outside the recognized set, preserved for round-tripping.
    pub extras: IndexMap<String, Value>,
}

impl SchemaNode {
    /// Returns the declared sub-schema for a property name.
    pub fn get_property(&self, name: &str) -> Option<&SubSchema> {
        self.properties.as_ref()?.get(name)
    }

    /// Returns true if `name` is listed in `required`.
    pub fn is_property_required(&self, name: &str) -> bool {
        self.required
            .as_ref()
            .map(|req| req.iter().any(|r| r == name))
            .unwrap_or(false)
    }

    /// Resolves the sub-schema for a data path.
    ///
    /// Numeric indices are stripped (schema shape does not branch per
    /// index); field steps descend into `properties[key]` or, failing that,
    /// into `items`' nested `properties[key]`, recursively.
    pub fn resolve_path(&self, path: &JsonPath) -> Result<&SchemaNode, ResolveError> {
        let mut node = self;
        for segment in path.segments() {
            match segment {
                PathSegment::Index(_) => continue,
                PathSegment::Field(key) => {
                    node = node
                        .property_node(key)
                        .ok_or_else(|| ResolveError::Unresolvable {
                            path: path.to_string(),
                            segment: key.clone(),
                        })?;
                }
            }
        }
        Ok(node)
    }

    fn property_node(&self, key: &str) -> Option<&SchemaNode> {
        if let Some(props) = &self.properties {
            if let Some(sub) = props.get(key) {
                return sub.as_node();
            }
        }
        if let Some(items) = self.items.as_ref().and_then(SubSchema::as_node) {
            return items.property_node(key);
        }
        None
    }

    /// Collects every `$ref` name reachable from this node.
    pub fn collect_refs(&self, refs: &mut Vec<String>) {
        if let Some(name) = &self.reference {
            refs.push(name.clone());
        }
        self.for_each_nested(&mut |child| child.collect_refs(refs));
    }

    /// Visits every directly nested schema node.
    pub(crate) fn for_each_nested(&self, visit: &mut dyn FnMut(&SchemaNode)) {
        let mut sub = |s: &SubSchema| {
            if let Some(node) = s.as_node() {
                visit(node);
            }
        };
        if let Some(props) = &self.properties {
            props.values().for_each(&mut sub);
        }
        if let Some(patterns) = &self.pattern_properties {
            patterns.iter().for_each(|p| sub(&p.schema));
        }
        if let Some(s) = &self.additional_properties {
            sub(s);
        }
        if let Some(s) = &self.property_names {
            sub(s);
        }
        if let Some(s) = &self.items {
            sub(s);
        }
        if let Some(s) = &self.contains {
            sub(s);
        }
        if let Some(prefix) = &self.prefix_items {
            prefix.iter().for_each(&mut *visit);
        }
        for list in [&self.all_of, &self.any_of, &self.one_of].into_iter().flatten() {
            list.iter().for_each(&mut *visit);
        }
        if let Some(not) = &self.not {
            visit(not);
        }
        if let Some(defs) = &self.defs {
            defs.values().for_each(&mut *visit);
        }
    }

    /// Serializes this node back into its attribute document.
    ///
    /// The output deep-equals the document the node was built from, except
    /// for the `$schema` identifier injected at construction when absent.
    pub fn to_attributes(&self) -> Value {
        let mut map = Map::new();

        if let Some(id) = &self.id {
            map.insert("$id".into(), Value::String(id.clone()));
        }
        if let Some(schema) = &self.schema {
            map.insert("$schema".into(), Value::String(schema.clone()));
        }
        if let Some(title) = &self.title {
            map.insert("title".into(), Value::String(title.clone()));
        }
        if let Some(types) = &self.types {
            let value = if types.len() == 1 {
                Value::String(types[0].name().to_string())
            } else {
                Value::Array(
                    types
                        .iter()
                        .map(|k| Value::String(k.name().to_string()))
                        .collect(),
                )
            };
            map.insert("type".into(), value);
        }
        if let Some(values) = &self.enum_values {
            map.insert("enum".into(), Value::Array(values.clone()));
        }
        if let Some(value) = &self.const_value {
            map.insert("const".into(), value.clone());
        }
        if let Some(values) = &self.denied {
            map.insert("denied".into(), Value::Array(values.clone()));
        }
        insert_number(&mut map, "minimum", self.minimum);
        insert_number(&mut map, "maximum", self.maximum);
        insert_number(&mut map, "exclusiveMinimum", self.exclusive_minimum);
        insert_number(&mut map, "exclusiveMaximum", self.exclusive_maximum);
        insert_number(&mut map, "multipleOf", self.multiple_of);
        insert_usize(&mut map, "minLength", self.min_length);
        insert_usize(&mut map, "maxLength", self.max_length);
        if let Some(pattern) = &self.pattern {
            map.insert("pattern".into(), Value::String(pattern.source.clone()));
        }
        if let Some(format) = &self.format {
            map.insert("format".into(), Value::String(format.clone()));
        }
        insert_usize(&mut map, "minWords", self.min_words);
        insert_usize(&mut map, "maxWords", self.max_words);
        insert_usize(&mut map, "length", self.length);
        insert_usize(&mut map, "minProperties", self.min_properties);
        insert_usize(&mut map, "maxProperties", self.max_properties);
        if let Some(items) = &self.items {
            map.insert("items".into(), items.to_attributes());
        }
        if let Some(prefix) = &self.prefix_items {
            map.insert(
                "prefixItems".into(),
                Value::Array(prefix.iter().map(SchemaNode::to_attributes).collect()),
            );
        }
        insert_usize(&mut map, "minItems", self.min_items);
        insert_usize(&mut map, "maxItems", self.max_items);
        if let Some(unique) = self.unique_items {
            map.insert("uniqueItems".into(), Value::Bool(unique));
        }
        if let Some(contains) = &self.contains {
            map.insert("contains".into(), contains.to_attributes());
        }
        insert_usize(&mut map, "minContains", self.min_contains);
        insert_usize(&mut map, "maxContains", self.max_contains);
        if let Some(props) = &self.properties {
            let mut out = Map::new();
            for (name, sub) in props {
                out.insert(name.clone(), sub.to_attributes());
            }
            map.insert("properties".into(), Value::Object(out));
        }
        if let Some(patterns) = &self.pattern_properties {
            let mut out = Map::new();
            for entry in patterns {
                out.insert(entry.pattern.source.clone(), entry.schema.to_attributes());
            }
            map.insert("patternProperties".into(), Value::Object(out));
        }
        if let Some(additional) = &self.additional_properties {
            map.insert("additionalProperties".into(), additional.to_attributes());
        }
        if let Some(names) = &self.property_names {
            map.insert("propertyNames".into(), names.to_attributes());
        }
        if let Some(required) = &self.required {
            map.insert(
                "required".into(),
                Value::Array(required.iter().cloned().map(Value::String).collect()),
            );
        }
        for (key, list) in [
            ("allOf", &self.all_of),
            ("anyOf", &self.any_of),
            ("oneOf", &self.one_of),
        ] {
            if let Some(list) = list {
                map.insert(
                    key.into(),
                    Value::Array(list.iter().map(SchemaNode::to_attributes).collect()),
                );
            }
        }
        if let Some(not) = &self.not {
            map.insert("not".into(), not.to_attributes());
        }
        if let Some(defs) = &self.defs {
            let mut out = Map::new();
            for (name, node) in defs {
                out.insert(name.clone(), node.to_attributes());
            }
            map.insert("$defs".into(), Value::Object(out));
        }
        if let Some(reference) = &self.reference {
            map.insert("$ref".into(), Value::String(reference.clone()));
        }
        for (key, value) in &self.extras {
            map.insert(key.clone(), value.clone());
        }

        Value::Object(map)
    }
}

fn insert_number(map: &mut Map<String, Value>, key: &str, value: Option<f64>) {
    if let Some(n) = value {
        // Whole numbers serialize as integers so documents round-trip.
        let number = if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
            serde_json::Number::from(n as i64)
        } else {
            serde_json::Number::from_f64(n).unwrap_or_else(|| serde_json::Number::from(0))
        };
        map.insert(key.to_string(), Value::Number(number));
    }
}

fn insert_usize(map: &mut Map<String, Value>, key: &str, value: Option<usize>) {
    if let Some(n) = value {
        map.insert(key.to_string(), Value::Number(serde_json::Number::from(n as u64)));
    }
}
