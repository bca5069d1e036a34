//! Property tests for response validation

use llm_tester_core::{TestCase, Validator};
use proptest::prelude::*;

fn padded() -> impl Strategy<Value = String> {
    ("[ \t\n]{0,3}", "[a-zA-Z0-9 ]{0,16}", "[ \t\n]{0,3}")
        .prop_map(|(lead, body, trail)| format!("{}{}{}", lead, body, trail))
}

/// Property: with only an expected result, a response is valid iff the
/// trimmed strings are equal
#[test]
fn prop_expected_result_is_trimmed_equality() {
    proptest!(|(expected in padded(), response in padded())| {
        let case = TestCase::new("t", "p", "basic").with_expected_result(expected.clone());
        prop_assert_eq!(
            case.validate_response(&response),
            response.trim() == expected.trim()
        );
    });
}

/// Property: a response equal to the expected result up to surrounding
/// whitespace always passes
#[test]
fn prop_expected_result_ignores_surrounding_whitespace() {
    proptest!(|(body in "[a-zA-Z0-9]{1,12}", lead in "[ \n]{0,3}", trail in "[ \n]{0,3}")| {
        let case = TestCase::new("t", "p", "basic").with_expected_result(body.clone());
        let response = format!("{}{}{}", lead, body, trail);
        prop_assert!(case.validate_response(&response));
    });
}

/// Property: with only a validator, validation is exactly the validator's verdict
#[test]
fn prop_validator_alone_decides() {
    proptest!(|(needle in "[a-z]{1,3}", response in "[a-z ]{0,24}")| {
        let validator = Validator::contains(needle.clone());
        let case = TestCase::new("t", "p", "basic").with_validator(validator.clone());
        prop_assert_eq!(case.validate_response(&response), validator.validate(&response));
        prop_assert_eq!(case.validate_response(&response), response.contains(&needle));
    });
}

/// Property: custom validators are applied verbatim
#[test]
fn prop_custom_validator_alone_decides() {
    proptest!(|(limit in 0usize..20, response in "[a-z ]{0,24}")| {
        let case = TestCase::new("t", "p", "basic")
            .with_validator(Validator::custom(move |r| r.len() > limit));
        prop_assert_eq!(case.validate_response(&response), response.len() > limit);
    });
}

/// Property: without any criterion every response passes
#[test]
fn prop_no_criterion_always_valid() {
    proptest!(|(response in ".*")| {
        let case = TestCase::new("t", "p", "basic");
        prop_assert!(case.validate_response(&response));
    });
}

/// Property: validation is deterministic
#[test]
fn prop_validation_is_deterministic() {
    proptest!(|(response in "[a-zA-Z ]{0,24}")| {
        let case = TestCase::new("t", "p", "basic")
            .with_validator(Validator::contains_any(["hello", "world"]).ignore_case());
        let first = case.validate_response(&response);
        prop_assert_eq!(first, case.validate_response(&response));
    });
}

#[test]
fn test_contains_any_and_all_semantics() {
    let any = Validator::contains_any(["armstrong", "neil"]).ignore_case();
    assert!(any.validate("Neil Armstrong"));
    assert!(any.validate("it was NEIL"));
    assert!(!any.validate("Buzz Aldrin"));

    let all = Validator::contains_all(["print", "Hello, World"]);
    assert!(all.validate("print('Hello, World!')"));
    assert!(!all.validate("PRINT('Hello, World!')"));
}

#[test]
fn test_exact_match_validator_trims_and_folds_case() {
    let exact = Validator::exact("Paris");
    assert!(exact.validate(" Paris\n"));
    assert!(!exact.validate("paris"));
    assert!(Validator::exact("Paris").ignore_case().validate("PARIS "));
}

#[test]
fn test_serializable_validator_round_trips() {
    let validator = Validator::contains_all(["select", "from"]).ignore_case();
    let encoded = serde_json::to_string(&validator).unwrap();
    assert!(encoded.contains("\"kind\":\"contains_all\""));

    let back: Validator = serde_json::from_str(&encoded).unwrap();
    assert!(back.validate("SELECT * FROM users"));
}

#[test]
fn test_test_case_deserializes_with_generated_id() {
    let case: TestCase = serde_json::from_str(
        r#"{"name":"Capital","prompt":"Capital of France?","category":"basic","expected_result":"Paris"}"#,
    )
    .unwrap();
    assert!(!case.id().is_empty());
    assert!(case.validate_response("Paris"));
}
