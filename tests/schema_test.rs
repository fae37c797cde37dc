//! Integration tests for schema construction, introspection and
//! round-tripping.

use serde_json::json;
use verdict::{ResolveError, SchemaBuildError, SchemaNode, SubSchema, Validator};

#[test]
fn test_round_trip_preserves_the_document() {
    let attrs = json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": "user",
        "type": "object",
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "age": {"type": "number", "minimum": 18, "maximum": 130},
            "tags": {
                "type": "array",
                "items": {"type": "string"},
                "uniqueItems": true
            },
            "secret": false
        },
        "patternProperties": {"^x_": {"type": "number"}},
        "additionalProperties": false,
        "required": ["name"],
        "oneOf": [{"required": ["age"]}, {"required": ["tags"]}],
        "$defs": {"id": {"type": "integer"}},
        "x-vendor-extension": {"keep": "me"}
    });

    let validator = Validator::new(&attrs).unwrap();
    assert_eq!(validator.to_attributes(), attrs);
}

#[test]
fn test_default_schema_identifier_is_injected_at_the_root() {
    let attrs = json!({
        "type": "object",
        "properties": {"a": {"type": "string"}}
    });

    let out = Validator::new(&attrs).unwrap().to_attributes();
    assert_eq!(
        out["$schema"],
        json!("https://json-schema.org/draft/2020-12/schema")
    );
    // Nested nodes are left untouched.
    assert!(out["properties"]["a"].get("$schema").is_none());
}

#[test]
fn test_malformed_documents_fail_at_construction() {
    let cases = [
        json!("not an object"),
        json!({"type": "banana"}),
        json!({"type": []}),
        json!({"required": [1, 2]}),
        json!({"maximum": "high"}),
        json!({"pattern": "[unclosed"}),
        json!({"minLength": -1}),
        json!({"allOf": []}),
        json!({"properties": {"a": {"enum": [1], "denied": [2]}}}),
    ];
    for attrs in cases {
        assert!(
            Validator::new(&attrs).is_err(),
            "expected construction failure for {}",
            attrs
        );
    }
}

#[test]
fn test_construction_failure_precedes_validation() {
    // The nested conflict is a build error, never a validation error.
    let err = SchemaNode::from_value(&json!({
        "items": {"enum": ["a"], "denied": ["b"]}
    }))
    .unwrap_err();
    assert!(matches!(err, SchemaBuildError::EnumDeniedConflict));
}

#[test]
fn test_get_property_and_required() {
    let v = Validator::new(&json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "secret": false
        },
        "required": ["name"]
    }))
    .unwrap();

    assert!(v.get_property("name").is_some());
    assert!(matches!(v.get_property("secret"), Some(SubSchema::Bool(false))));
    assert!(v.get_property("missing").is_none());

    assert!(v.is_property_required("name"));
    assert!(!v.is_property_required("secret"));
}

#[test]
fn test_resolve_property_descends_through_items() {
    let v = Validator::new(&json!({
        "type": "object",
        "properties": {
            "users": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {"email": {"type": "string", "format": "email"}}
                }
            }
        }
    }))
    .unwrap();

    let node = v.resolve_property("users[0].email").unwrap();
    assert_eq!(node.format.as_deref(), Some("email"));

    // Indices are stripped; the same node resolves without one.
    let node = v.resolve_property("users.email").unwrap();
    assert_eq!(node.format.as_deref(), Some("email"));

    let err = v.resolve_property("users.phone").unwrap_err();
    assert!(matches!(err, ResolveError::Unresolvable { .. }));

    let err = v.resolve_property("users[].email").unwrap_err();
    assert!(matches!(err, ResolveError::Path(_)));
}

#[test]
fn test_unknown_attributes_are_preserved() {
    let node = SchemaNode::from_value(&json!({
        "type": "string",
        "deprecated": true,
        "examples": ["a", "b"]
    }))
    .unwrap();

    assert_eq!(node.extras.get("deprecated"), Some(&json!(true)));
    let out = node.to_attributes();
    assert_eq!(out["examples"], json!(["a", "b"]));
}

#[test]
fn test_transforms_compose_with_validation() {
    let base = SchemaNode::from_value(&json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "age": {"type": "number"}
        },
        "required": ["name", "age"]
    }))
    .unwrap();

    let partial = base.partial();
    let v = Validator::from_node(partial, Default::default()).unwrap();
    assert!(v.is_valid(&json!({})));

    let picked = base.pick_properties(&["name"]);
    let v = Validator::from_node(picked, Default::default()).unwrap();
    assert!(v.is_valid(&json!({"name": "Ada"})));
    assert!(!v.is_valid(&json!({"name": 7})));
}
