//! Integration tests for the two failure-reporting modes and the
//! aggregation policy.

use serde_json::{json, Value};
use verdict::{Mode, ValidateOptions, Validator};

fn schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": {"type": "string", "minLength": 1},
            "age": {"type": "number", "minimum": 18},
            "email": {"type": "string", "format": "email"}
        },
        "required": ["name", "age", "email"]
    })
}

fn bad_value() -> Value {
    json!({"name": "", "age": 15, "email": "broken"})
}

#[test]
fn test_collect_mode_reports_every_independent_path() {
    let v = Validator::new(&schema()).unwrap();
    let errors = v.get_errors(&bad_value()).unwrap().unwrap();

    assert_eq!(errors.len(), 3);
    assert_eq!(errors.get("name").unwrap().code(), "min_length");
    assert_eq!(errors.get("age").unwrap().code(), "minimum");
    assert_eq!(errors.get("email").unwrap().code(), "format");
}

#[test]
fn test_fail_fast_stops_at_the_first_family() {
    let v = Validator::new(&schema()).unwrap();
    let err = v.validate(&bad_value()).unwrap_err();
    let aggregate = err.aggregate().unwrap();

    // Declared properties evaluate in key order, so `age` fails first and
    // halts the family; `email` and `name` are never evaluated.
    assert_eq!(aggregate.len(), 1);
    assert_eq!(aggregate.first().unwrap().code(), "minimum");
    assert_eq!(aggregate.first().unwrap().path.to_string(), "age");
}

#[test]
fn test_modes_agree_on_a_single_violation() {
    let v = Validator::new(&schema()).unwrap();
    let value = json!({"name": "Ada", "age": 15, "email": "ada@example.com"});

    let collected = v.get_errors(&value).unwrap().unwrap();
    let err = v.validate(&value).unwrap_err();
    let fast = err.aggregate().unwrap();

    assert_eq!(collected.len(), 1);
    assert_eq!(fast.len(), 1);
    assert_eq!(
        collected.first().unwrap().code(),
        fast.first().unwrap().code()
    );
    assert_eq!(collected.first().unwrap().path, fast.first().unwrap().path);
}

#[test]
fn test_fail_fast_still_evaluates_combinators() {
    let v = Validator::new(&json!({
        "type": "object",
        "properties": {"a": {"type": "number"}},
        "allOf": [
            {"properties": {"b": {"type": "string"}}, "required": ["b"]}
        ]
    }))
    .unwrap();

    let err = v.validate(&json!({"a": "wrong"})).unwrap_err();
    let aggregate = err.aggregate().unwrap();

    // The properties family failed first, yet the allOf branch still ran.
    assert_eq!(aggregate.get("a").unwrap().code(), "type");
    assert_eq!(aggregate.get("b").unwrap().code(), "required");
}

#[test]
fn test_validate_with_explicit_collect_mode() {
    let v = Validator::new(&schema()).unwrap();
    let options = ValidateOptions {
        mode: Mode::Collect,
        ..Default::default()
    };
    let err = v.validate_with(&bad_value(), &options).unwrap_err();
    assert_eq!(err.aggregate().unwrap().len(), 3);
}

#[test]
fn test_clean_value_yields_no_errors_in_either_mode() {
    let v = Validator::new(&schema()).unwrap();
    let value = json!({"name": "Ada", "age": 36, "email": "ada@example.com"});

    assert!(v.validate(&value).is_ok());
    assert!(v.get_errors(&value).unwrap().is_none());
    assert!(v.is_valid(&value));
}

#[test]
fn test_aggregate_display_lists_errors_in_order() {
    let v = Validator::new(&schema()).unwrap();
    let errors = v.get_errors(&bad_value()).unwrap().unwrap();
    let rendered = errors.to_string();

    assert!(rendered.contains("Validation failed with 3 error(s):"));
    assert!(rendered.contains("1. age: value must be at least 18, got 15"));
    assert!(rendered.contains("2. email: must be a valid email"));
    assert!(rendered.contains("3. name: length must be at least 1, got 0"));
}

#[test]
fn test_check_returns_applicative_validation() {
    let v = Validator::new(&schema()).unwrap();
    assert!(v.check(&bad_value()).unwrap().is_failure());
    assert!(v
        .check(&json!({"name": "A", "age": 20, "email": "a@b.co"}))
        .unwrap()
        .is_success());
}
