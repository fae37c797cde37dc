//! Integration tests for array constraints.

use serde_json::json;
use verdict::Validator;

#[test]
fn test_items_schema_applies_to_every_element() {
    let v = Validator::new(&json!({"type": "array", "items": {"type": "number"}})).unwrap();
    assert!(v.is_valid(&json!([1, 2.5, 3])));
    assert!(v.is_valid(&json!([])));

    let errors = v.get_errors(&json!([1, "two", 3, "four"])).unwrap().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("[1]").unwrap().code(), "type");
    assert_eq!(errors.get("[3]").unwrap().code(), "type");
}

#[test]
fn test_min_and_max_items() {
    let v = Validator::new(&json!({"type": "array", "minItems": 1, "maxItems": 3})).unwrap();
    assert!(v.is_valid(&json!([1])));
    assert!(v.is_valid(&json!([1, 2, 3])));

    let errors = v.get_errors(&json!([])).unwrap().unwrap();
    assert_eq!(errors.first().unwrap().code(), "min_items");
    let errors = v.get_errors(&json!([1, 2, 3, 4])).unwrap().unwrap();
    assert_eq!(errors.first().unwrap().code(), "max_items");
}

#[test]
fn test_unique_items_reports_at_root_path() {
    let v = Validator::new(&json!({
        "type": "array",
        "items": {"type": "number"},
        "uniqueItems": true
    }))
    .unwrap();

    assert!(v.get_errors(&json!([1, 2, 3])).unwrap().is_none());

    let errors = v.get_errors(&json!([1, 2, 2])).unwrap().unwrap();
    assert_eq!(errors.len(), 1);
    let error = errors.get("").unwrap();
    assert_eq!(error.code(), "unique_items");
    assert_eq!(
        error.to_string(),
        "(root): items at indices 1 and 2 are duplicates"
    );
}

#[test]
fn test_unique_items_uses_deep_equality() {
    let v = Validator::new(&json!({"type": "array", "uniqueItems": true})).unwrap();
    assert!(!v.is_valid(&json!([{"a": [1]}, {"a": [1]}])));
    // 1 and 1.0 are numerically equal.
    assert!(!v.is_valid(&json!([1, 1.0])));
    assert!(v.is_valid(&json!([1, "1"])));
}

#[test]
fn test_prefix_items_validate_by_position() {
    let v = Validator::new(&json!({
        "type": "array",
        "prefixItems": [{"type": "string"}, {"type": "number"}],
        "items": {"type": "boolean"}
    }))
    .unwrap();

    assert!(v.is_valid(&json!(["id", 3, true, false])));
    assert!(v.is_valid(&json!(["id"])));

    let errors = v.get_errors(&json!([3, "id", true])).unwrap().unwrap();
    assert_eq!(errors.get("[0]").unwrap().code(), "type");
    assert_eq!(errors.get("[1]").unwrap().code(), "type");

    // Elements past the prefix fall to `items`.
    let errors = v.get_errors(&json!(["id", 3, "not-bool"])).unwrap().unwrap();
    assert_eq!(errors.get("[2]").unwrap().code(), "type");
}

#[test]
fn test_items_false_forbids_elements_beyond_prefix() {
    let v = Validator::new(&json!({
        "type": "array",
        "prefixItems": [{"type": "string"}],
        "items": false
    }))
    .unwrap();

    assert!(v.is_valid(&json!(["only"])));

    let errors = v.get_errors(&json!(["only", 2, 3])).unwrap().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("[1]").unwrap().code(), "additional_item");
    assert_eq!(errors.get("[2]").unwrap().code(), "additional_item");
}

#[test]
fn test_contains_defaults_to_at_least_one() {
    let v = Validator::new(&json!({
        "type": "array",
        "contains": {"type": "number", "minimum": 10}
    }))
    .unwrap();

    assert!(v.is_valid(&json!([1, 20, 3])));

    let errors = v.get_errors(&json!([1, 2, 3])).unwrap().unwrap();
    assert_eq!(errors.first().unwrap().code(), "contains");
}

#[test]
fn test_min_and_max_contains() {
    let v = Validator::new(&json!({
        "type": "array",
        "contains": {"type": "number"},
        "minContains": 2,
        "maxContains": 3
    }))
    .unwrap();

    assert!(v.is_valid(&json!([1, 2, "x"])));
    assert!(v.is_valid(&json!([1, 2, 3])));

    let errors = v.get_errors(&json!([1, "x"])).unwrap().unwrap();
    assert_eq!(errors.first().unwrap().code(), "min_contains");

    let errors = v.get_errors(&json!([1, 2, 3, 4])).unwrap().unwrap();
    assert_eq!(errors.first().unwrap().code(), "max_contains");
}

#[test]
fn test_min_contains_zero_permits_no_matches() {
    let v = Validator::new(&json!({
        "type": "array",
        "contains": {"type": "number"},
        "minContains": 0
    }))
    .unwrap();
    assert!(v.is_valid(&json!(["a", "b"])));
}

#[test]
fn test_denied_screens_array_elements() {
    let v = Validator::new(&json!({"type": "array", "denied": ["root", "admin"]})).unwrap();
    assert!(v.is_valid(&json!(["alice", "bob"])));

    let errors = v.get_errors(&json!(["alice", "root", "admin"])).unwrap().unwrap();
    assert_eq!(errors.len(), 2);
    assert_eq!(errors.get("[1]").unwrap().code(), "denied");
    assert_eq!(errors.get("[2]").unwrap().code(), "denied");
}
