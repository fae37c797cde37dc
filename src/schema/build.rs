//! Construction of schema nodes from attribute documents.
//!
//! Parsing doubles as schema-of-schema validation: every recognized field is
//! shape-checked, regexes compile, and nested schema values are built
//! recursively. A malformed document fails here, before any data is
//! validated.

use indexmap::IndexMap;
use serde_json::Value;

use crate::value::ValueKind;

use super::{
    CompiledPattern, PatternProperty, SchemaNode, SubSchema, DEFAULT_SCHEMA_URI,
};

/// Construction-time schema failures.
///
/// These are raised while building a validator and are never deferred to
/// validation time.
#[derive(Debug, thiserror::Error)]
pub enum SchemaBuildError {
    #[error("schema attributes must be an object, got {0}")]
    NotAnObject(&'static str),
    #[error("'{field}' must be {expected}")]
    InvalidField {
        field: &'static str,
        expected: &'static str,
    },
    #[error("unknown type name '{0}'")]
    UnknownType(String),
    #[error("'enum' and 'denied' cannot both be set")]
    EnumDeniedConflict,
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    #[error("unknown format '{0}'")]
    UnknownFormat(String),
}

impl SchemaNode {
    /// Builds a schema node from an attribute document.
    ///
    /// The document's `$schema` defaults to the draft identifier when
    /// absent. Fails on any field whose shape is wrong, on `enum` and
    /// `denied` both present, and on regexes that do not compile,
    /// recursively for every nested schema.
    pub fn from_value(attrs: &Value) -> Result<Self, SchemaBuildError> {
        let mut node = Self::parse(attrs)?;
        if node.schema.is_none() {
            node.schema = Some(DEFAULT_SCHEMA_URI.to_string());
        }
        Ok(node)
    }

    /// Parses without injecting the default `$schema`; nested schema values
    /// go through here so they round-trip untouched.
    fn parse(attrs: &Value) -> Result<Self, SchemaBuildError> {
        let map = match attrs {
            Value::Object(map) => map,
            other => return Err(SchemaBuildError::NotAnObject(type_name(other))),
        };

        let mut node = SchemaNode::default();

        for (key, value) in map {
            match key.as_str() {
                "$id" => node.id = Some(expect_string(value, "$id")?),
                "$schema" => node.schema = Some(expect_string(value, "$schema")?),
                "title" => node.title = Some(expect_string(value, "title")?),
                "type" => node.types = Some(parse_types(value)?),
                "enum" => node.enum_values = Some(expect_array(value, "enum")?),
                "const" => node.const_value = Some(value.clone()),
                "denied" => node.denied = Some(expect_array(value, "denied")?),
                "minimum" => node.minimum = Some(expect_number(value, "minimum")?),
                "maximum" => node.maximum = Some(expect_number(value, "maximum")?),
                "exclusiveMinimum" => {
                    node.exclusive_minimum = Some(expect_number(value, "exclusiveMinimum")?)
                }
                "exclusiveMaximum" => {
                    node.exclusive_maximum = Some(expect_number(value, "exclusiveMaximum")?)
                }
                "multipleOf" => node.multiple_of = Some(expect_number(value, "multipleOf")?),
                "minLength" => node.min_length = Some(expect_usize(value, "minLength")?),
                "maxLength" => node.max_length = Some(expect_usize(value, "maxLength")?),
                "pattern" => {
                    let source = expect_string(value, "pattern")?;
                    node.pattern = Some(compile_pattern(&source)?);
                }
                "format" => node.format = Some(expect_string(value, "format")?),
                "minWords" => node.min_words = Some(expect_usize(value, "minWords")?),
                "maxWords" => node.max_words = Some(expect_usize(value, "maxWords")?),
                "length" => node.length = Some(expect_usize(value, "length")?),
                "minProperties" => {
                    node.min_properties = Some(expect_usize(value, "minProperties")?)
                }
                "maxProperties" => {
                    node.max_properties = Some(expect_usize(value, "maxProperties")?)
                }
                "items" => node.items = Some(parse_sub_schema(value, "items")?),
                "prefixItems" => node.prefix_items = Some(parse_node_list(value, "prefixItems")?),
                "minItems" => node.min_items = Some(expect_usize(value, "minItems")?),
                "maxItems" => node.max_items = Some(expect_usize(value, "maxItems")?),
                "uniqueItems" => node.unique_items = Some(expect_bool(value, "uniqueItems")?),
                "contains" => node.contains = Some(parse_sub_schema(value, "contains")?),
                "minContains" => node.min_contains = Some(expect_usize(value, "minContains")?),
                "maxContains" => node.max_contains = Some(expect_usize(value, "maxContains")?),
                "properties" => node.properties = Some(parse_sub_schema_map(value, "properties")?),
                "patternProperties" => {
                    node.pattern_properties = Some(parse_pattern_properties(value)?)
                }
                "additionalProperties" => {
                    node.additional_properties =
                        Some(parse_sub_schema(value, "additionalProperties")?)
                }
                "propertyNames" => {
                    node.property_names = Some(parse_sub_schema(value, "propertyNames")?)
                }
                "required" => node.required = Some(parse_string_list(value, "required")?),
                "allOf" => node.all_of = Some(parse_node_list(value, "allOf")?),
                "anyOf" => node.any_of = Some(parse_node_list(value, "anyOf")?),
                "oneOf" => node.one_of = Some(parse_node_list(value, "oneOf")?),
                "not" => node.not = Some(Box::new(SchemaNode::parse(value)?)),
                "$defs" => node.defs = Some(parse_node_map(value, "$defs")?),
                "$ref" => node.reference = Some(expect_string(value, "$ref")?),
                _ => {
                    node.extras.insert(key.clone(), value.clone());
                }
            }
        }

        if node.enum_values.is_some() && node.denied.is_some() {
            return Err(SchemaBuildError::EnumDeniedConflict);
        }

        Ok(node)
    }
}

fn type_name(value: &Value) -> &'static str {
    ValueKind::of(value).name()
}

fn compile_pattern(source: &str) -> Result<CompiledPattern, SchemaBuildError> {
    CompiledPattern::new(source).map_err(|source_err| SchemaBuildError::InvalidPattern {
        pattern: source.to_string(),
        source: source_err,
    })
}

fn expect_string(value: &Value, field: &'static str) -> Result<String, SchemaBuildError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or(SchemaBuildError::InvalidField {
            field,
            expected: "a string",
        })
}

fn expect_number(value: &Value, field: &'static str) -> Result<f64, SchemaBuildError> {
    value.as_f64().ok_or(SchemaBuildError::InvalidField {
        field,
        expected: "a number",
    })
}

fn expect_usize(value: &Value, field: &'static str) -> Result<usize, SchemaBuildError> {
    value
        .as_u64()
        .map(|n| n as usize)
        .ok_or(SchemaBuildError::InvalidField {
            field,
            expected: "a non-negative integer",
        })
}

fn expect_bool(value: &Value, field: &'static str) -> Result<bool, SchemaBuildError> {
    value.as_bool().ok_or(SchemaBuildError::InvalidField {
        field,
        expected: "a boolean",
    })
}

fn expect_array(value: &Value, field: &'static str) -> Result<Vec<Value>, SchemaBuildError> {
    value
        .as_array()
        .cloned()
        .ok_or(SchemaBuildError::InvalidField {
            field,
            expected: "an array",
        })
}

fn parse_types(value: &Value) -> Result<Vec<ValueKind>, SchemaBuildError> {
    let names: Vec<&str> = match value {
        Value::String(name) => vec![name.as_str()],
        Value::Array(list) if !list.is_empty() => list
            .iter()
            .map(|v| {
                v.as_str().ok_or(SchemaBuildError::InvalidField {
                    field: "type",
                    expected: "a type name or non-empty array of type names",
                })
            })
            .collect::<Result<_, _>>()?,
        _ => {
            return Err(SchemaBuildError::InvalidField {
                field: "type",
                expected: "a type name or non-empty array of type names",
            })
        }
    };

    names
        .into_iter()
        .map(|name| {
            ValueKind::parse(name).ok_or_else(|| SchemaBuildError::UnknownType(name.to_string()))
        })
        .collect()
}

fn parse_sub_schema(value: &Value, field: &'static str) -> Result<SubSchema, SchemaBuildError> {
    match value {
        Value::Bool(b) => Ok(SubSchema::Bool(*b)),
        Value::Object(_) => Ok(SubSchema::Node(Box::new(SchemaNode::parse(value)?))),
        _ => Err(SchemaBuildError::InvalidField {
            field,
            expected: "a boolean or an object",
        }),
    }
}

fn parse_sub_schema_map(
    value: &Value,
    field: &'static str,
) -> Result<IndexMap<String, SubSchema>, SchemaBuildError> {
    let map = value.as_object().ok_or(SchemaBuildError::InvalidField {
        field,
        expected: "an object of schemas",
    })?;

    let mut out = IndexMap::with_capacity(map.len());
    for (name, sub) in map {
        out.insert(name.clone(), parse_sub_schema(sub, field)?);
    }
    Ok(out)
}

fn parse_pattern_properties(value: &Value) -> Result<Vec<PatternProperty>, SchemaBuildError> {
    let map = value.as_object().ok_or(SchemaBuildError::InvalidField {
        field: "patternProperties",
        expected: "an object of schemas keyed by regex",
    })?;

    let mut out = Vec::with_capacity(map.len());
    for (source, sub) in map {
        out.push(PatternProperty {
            pattern: compile_pattern(source)?,
            schema: parse_sub_schema(sub, "patternProperties")?,
        });
    }
    Ok(out)
}

fn parse_string_list(value: &Value, field: &'static str) -> Result<Vec<String>, SchemaBuildError> {
    let list = value.as_array().ok_or(SchemaBuildError::InvalidField {
        field,
        expected: "an array of strings",
    })?;

    list.iter()
        .map(|v| {
            v.as_str()
                .map(str::to_string)
                .ok_or(SchemaBuildError::InvalidField {
                    field,
                    expected: "an array of strings",
                })
        })
        .collect()
}

fn parse_node_list(value: &Value, field: &'static str) -> Result<Vec<SchemaNode>, SchemaBuildError> {
    let list = value.as_array().ok_or(SchemaBuildError::InvalidField {
        field,
        expected: "a non-empty array of schemas",
    })?;
    if list.is_empty() {
        return Err(SchemaBuildError::InvalidField {
            field,
            expected: "a non-empty array of schemas",
        });
    }

    list.iter().map(SchemaNode::parse).collect()
}

fn parse_node_map(
    value: &Value,
    field: &'static str,
) -> Result<IndexMap<String, SchemaNode>, SchemaBuildError> {
    let map = value.as_object().ok_or(SchemaBuildError::InvalidField {
        field,
        expected: "an object of schemas",
    })?;

    let mut out = IndexMap::with_capacity(map.len());
    for (name, sub) in map {
        out.insert(name.clone(), SchemaNode::parse(sub)?);
    }
    Ok(out)
}
