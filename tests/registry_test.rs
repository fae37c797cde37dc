//! Integration tests for the schema registry.

use serde_json::json;
use verdict::{RegistryError, SchemaNode, SchemaRegistry};

#[test]
fn test_register_and_get() {
    let registry = SchemaRegistry::new();
    registry
        .register("Email", &json!({"type": "string", "format": "email"}))
        .unwrap();

    assert!(registry.contains("Email"));
    assert!(!registry.contains("Unknown"));

    let schema = registry.get("Email").unwrap();
    assert_eq!(schema.format.as_deref(), Some("email"));
    assert!(registry.get("Unknown").is_none());
}

#[test]
fn test_duplicate_registration_fails() {
    let registry = SchemaRegistry::new();
    registry.register("Email", &json!({"type": "string"})).unwrap();

    let err = registry
        .register("Email", &json!({"type": "string"}))
        .unwrap_err();
    assert!(matches!(err, RegistryError::DuplicateName(name) if name == "Email"));
}

#[test]
fn test_register_rejects_malformed_documents() {
    let registry = SchemaRegistry::new();
    let err = registry
        .register("Broken", &json!({"type": "banana"}))
        .unwrap_err();
    assert!(matches!(err, RegistryError::Build(_)));
    assert!(!registry.contains("Broken"));
}

#[test]
fn test_register_node() {
    let registry = SchemaRegistry::new();
    let node = SchemaNode::from_value(&json!({"type": "integer"})).unwrap();
    registry.register_node("Count", node).unwrap();
    assert!(registry.contains("Count"));
}

#[test]
fn test_names_are_sorted() {
    let registry = SchemaRegistry::new();
    registry.register("Zeta", &json!({})).unwrap();
    registry.register("Alpha", &json!({})).unwrap();
    assert_eq!(registry.names(), vec!["Alpha", "Zeta"]);
}

#[test]
fn test_validate_refs_reports_unresolved_names() {
    let registry = SchemaRegistry::new();
    registry
        .register(
            "User",
            &json!({
                "type": "object",
                "properties": {
                    "id": {"$ref": "UserId"},
                    "tags": {"items": {"$ref": "Tag"}},
                    "local": {"$ref": "Inline"}
                },
                "$defs": {"Inline": {"type": "string"}}
            }),
        )
        .unwrap();
    registry.register("Tag", &json!({"type": "string"})).unwrap();

    // Inline resolves against the schema's own $defs, Tag against the
    // registry; only UserId is left dangling.
    assert_eq!(registry.validate_refs(), vec!["UserId"]);
}

#[test]
fn test_validate_refs_clean_registry() {
    let registry = SchemaRegistry::new();
    registry.register("A", &json!({"$ref": "B"})).unwrap();
    registry.register("B", &json!({"type": "null"})).unwrap();
    assert!(registry.validate_refs().is_empty());
}

#[test]
fn test_defs_document_export() {
    let registry = SchemaRegistry::new();
    registry
        .register("UserId", &json!({"type": "integer", "exclusiveMinimum": 0}))
        .unwrap();
    registry
        .register("Email", &json!({"type": "string", "format": "email"}))
        .unwrap();

    let doc = registry.to_defs_document();
    assert_eq!(
        doc["$schema"],
        json!("https://json-schema.org/draft/2020-12/schema")
    );
    assert_eq!(doc["$defs"]["UserId"]["type"], json!("integer"));
    assert_eq!(doc["$defs"]["UserId"]["exclusiveMinimum"], json!(0));
    assert_eq!(doc["$defs"]["Email"]["format"], json!("email"));
}

#[test]
fn test_clones_share_storage() {
    let registry = SchemaRegistry::new();
    let clone = registry.clone();
    registry.register("Late", &json!({})).unwrap();
    assert!(clone.contains("Late"));
}
