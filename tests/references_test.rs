//! Integration tests for $defs/$ref resolution and the recursion depth
//! guard.

use serde_json::{json, Value};
use std::sync::Arc;
use std::thread;
use verdict::{
    RegistryError, SchemaRegistry, ValidateError, ValidateOptions, Validator, ValidatorOptions,
};

fn with_registry(attrs: &Value, registry: SchemaRegistry) -> Validator {
    Validator::with_options(
        attrs,
        ValidatorOptions {
            registry: Some(registry),
            ..Default::default()
        },
    )
    .unwrap()
}

#[test]
fn test_local_defs_resolution() {
    let v = Validator::new(&json!({
        "type": "object",
        "properties": {
            "home": {"$ref": "address"},
            "work": {"$ref": "#/$defs/address"}
        },
        "$defs": {
            "address": {
                "type": "object",
                "properties": {"city": {"type": "string"}},
                "required": ["city"]
            }
        }
    }))
    .unwrap();

    assert!(v.is_valid(&json!({"home": {"city": "London"}, "work": {"city": "Paris"}})));

    let errors = v.get_errors(&json!({"work": {}})).unwrap().unwrap();
    assert_eq!(errors.get("work.city").unwrap().code(), "required");
}

#[test]
fn test_registry_resolution() {
    let registry = SchemaRegistry::new();
    registry
        .register("Email", &json!({"type": "string", "format": "email"}))
        .unwrap();

    let v = with_registry(
        &json!({
            "type": "object",
            "properties": {"contact": {"$ref": "Email"}}
        }),
        registry,
    );

    assert!(v.is_valid(&json!({"contact": "a@b.co"})));

    let errors = v.get_errors(&json!({"contact": "nope"})).unwrap().unwrap();
    assert_eq!(errors.get("contact").unwrap().code(), "format");
}

#[test]
fn test_local_defs_shadow_the_registry() {
    let registry = SchemaRegistry::new();
    registry.register("Id", &json!({"type": "string"})).unwrap();

    let v = with_registry(
        &json!({
            "properties": {"id": {"$ref": "Id"}},
            "$defs": {"Id": {"type": "integer"}}
        }),
        registry,
    );

    assert!(v.is_valid(&json!({"id": 7})));
    assert!(!v.is_valid(&json!({"id": "seven"})));
}

#[test]
fn test_recursive_schema_within_depth() {
    let v = Validator::new(&json!({
        "$ref": "node",
        "$defs": {
            "node": {
                "type": "object",
                "properties": {
                    "value": {"type": "number"},
                    "next": {"$ref": "node"}
                },
                "required": ["value"]
            }
        }
    }))
    .unwrap();

    assert!(v.is_valid(&json!({
        "value": 1,
        "next": {"value": 2, "next": {"value": 3}}
    })));

    let errors = v
        .get_errors(&json!({"value": 1, "next": {"value": "x"}}))
        .unwrap()
        .unwrap();
    assert_eq!(errors.get("next.value").unwrap().code(), "type");
}

#[test]
fn test_cycle_hits_the_depth_guard() {
    let v = Validator::new(&json!({
        "$ref": "node",
        "$defs": {
            "node": {
                "type": "object",
                "properties": {"next": {"$ref": "node"}}
            }
        }
    }))
    .unwrap();

    // Deeper than the default guard of 100.
    let mut value = json!({});
    for _ in 0..120 {
        value = json!({"next": value});
    }

    let errors = v.get_errors(&value).unwrap().unwrap();
    assert_eq!(errors.with_code("max_depth_exceeded").len(), 1);
}

#[test]
fn test_registry_max_depth_is_honored() {
    let registry = SchemaRegistry::new().with_max_depth(10);
    registry
        .register(
            "Node",
            &json!({
                "type": "object",
                "properties": {"next": {"$ref": "Node"}}
            }),
        )
        .unwrap();

    let v = with_registry(&json!({"$ref": "Node"}), registry);

    let mut shallow = json!({});
    for _ in 0..3 {
        shallow = json!({"next": shallow});
    }
    assert!(v.is_valid(&shallow));

    let mut deep = json!({});
    for _ in 0..20 {
        deep = json!({"next": deep});
    }
    let errors = v.get_errors(&deep).unwrap().unwrap();
    let error = &errors.with_code("max_depth_exceeded")[0];
    assert!(error.to_string().contains("maximum validation depth 10"));
}

#[test]
fn test_unresolvable_ref_is_a_registry_error_not_a_data_error() {
    let v = Validator::new(&json!({
        "type": "object",
        "properties": {"x": {"$ref": "Missing"}}
    }))
    .unwrap();

    // is_valid cannot raise; it reports false.
    assert!(!v.is_valid(&json!({"x": 1})));

    // validate and get_errors surface the distinct registry error.
    let err = v.validate(&json!({"x": 1})).unwrap_err();
    assert!(matches!(
        err,
        ValidateError::Registry(RegistryError::SchemaNotFound(ref name)) if name == "Missing"
    ));
    assert!(err.aggregate().is_none());

    let err = v.get_errors(&json!({"x": 1})).unwrap_err();
    assert!(matches!(err, RegistryError::SchemaNotFound(_)));

    // A value without the referencing key never touches the ref.
    assert!(v.is_valid(&json!({})));
}

#[test]
fn test_concurrent_validation_through_a_shared_registry() {
    let registry = SchemaRegistry::new();
    registry
        .register(
            "User",
            &json!({
                "type": "object",
                "properties": {
                    "name": {"type": "string", "minLength": 1},
                    "age": {"type": "number", "minimum": 0}
                },
                "required": ["name", "age"]
            }),
        )
        .unwrap();

    let validator = Arc::new(with_registry(&json!({"$ref": "User"}), registry));

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let validator = Arc::clone(&validator);
            thread::spawn(move || {
                assert!(validator.is_valid(&json!({
                    "name": format!("User{}", i),
                    "age": 20 + i
                })));
                assert!(!validator.is_valid(&json!({"name": "", "age": -1})));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_base_path_prefixes_ref_failures() {
    let v = Validator::new(&json!({
        "properties": {"inner": {"$ref": "leaf"}},
        "$defs": {"leaf": {"type": "integer"}}
    }))
    .unwrap();

    let options = ValidateOptions {
        path: "outer".parse().unwrap(),
        ..Default::default()
    };
    let err = v
        .validate_with(&json!({"inner": "x"}), &options)
        .unwrap_err();
    assert!(err.aggregate().unwrap().contains("outer.inner"));
}
