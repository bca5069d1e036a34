//! Tests for the summary, details and comparison views

use std::collections::BTreeMap;

use chrono::Utc;
use llm_tester_core::{ResultMap, TestResult};
use llm_tester_report::{compare, render_comparison, render_details, render_summary, summarize};
use proptest::prelude::*;

fn result(model: &str, test: &str, valid: bool, time: f64, tokens: u64) -> TestResult {
    TestResult {
        test_case_id: format!("{}-id", test),
        test_case_name: test.to_string(),
        model_name: model.to_string(),
        prompt: format!("prompt for {}", test),
        response: format!("answer to {}", test),
        response_time: time,
        token_count: tokens,
        is_valid: valid,
        category: "basic".to_string(),
        timestamp: Utc::now(),
        metrics: BTreeMap::new(),
        complete: true,
    }
}

fn sample() -> ResultMap {
    let mut results = ResultMap::new();
    results.insert(
        "llama3".to_string(),
        vec![
            result("llama3", "Greeting", true, 1.0, 10),
            result("llama3", "Capital", false, 3.0, 20),
        ],
    );
    results.insert(
        "mistral".to_string(),
        vec![result("mistral", "Greeting", true, 0.5, 8)],
    );
    results.insert("phi3".to_string(), Vec::new());
    results
}

// ============================================================================
// Summary
// ============================================================================

#[test]
fn test_summary_aggregates_per_model_and_skips_empty() {
    let summaries = summarize(&sample());

    assert_eq!(summaries.len(), 2);
    let llama = &summaries[0];
    assert_eq!(llama.model, "llama3");
    assert_eq!(llama.total_tests, 2);
    assert_eq!(llama.passed_tests, 1);
    assert_eq!(llama.pass_rate, 50.0);
    assert_eq!(llama.avg_response_time, 2.0);
    assert_eq!(llama.avg_tokens, 15.0);
    assert_eq!(summaries[1].model, "mistral");
    assert_eq!(summaries[1].pass_rate, 100.0);
}

#[test]
fn test_render_summary_format() {
    let text = render_summary(&sample());

    assert!(text.starts_with("Test Results Summary\n"));
    assert!(text.contains("Model: llama3\nTests Run: 2\nTests Passed: 1\nSuccess Rate: 50.0%"));
    assert!(text.contains("Average Response Time: 2.00s"));
    assert!(text.contains("Average Tokens Used: 15.0"));
    assert!(!text.contains("phi3"));
}

#[test]
fn test_render_summary_without_results() {
    let mut results = ResultMap::new();
    results.insert("phi3".to_string(), Vec::new());
    assert!(render_summary(&results).ends_with("No test results available."));
}

#[test]
fn prop_pass_rate_is_a_percentage() {
    proptest!(|(flags in prop::collection::vec(any::<bool>(), 1..20))| {
        let mut results = ResultMap::new();
        results.insert(
            "m".to_string(),
            flags.iter().enumerate().map(|(i, v)| result("m", &i.to_string(), *v, 1.0, 1)).collect(),
        );
        let summary = &summarize(&results)[0];
        let passed = flags.iter().filter(|v| **v).count();
        prop_assert_eq!(summary.passed_tests, passed);
        prop_assert!(summary.pass_rate >= 0.0 && summary.pass_rate <= 100.0);
    });
}

// ============================================================================
// Details
// ============================================================================

#[test]
fn test_details_lists_transcripts_in_stored_order() {
    let text = render_details(&sample());

    let greeting = text.find("Test: Greeting").unwrap();
    let capital = text.find("Test: Capital").unwrap();
    assert!(greeting < capital);
    assert!(text.contains("Status: ✓ Passed"));
    assert!(text.contains("Status: ✗ Failed"));
    assert!(text.contains("Prompt:\nprompt for Capital"));
    assert!(text.contains("Response:\nanswer to Capital"));
    assert!(text.contains("Response Time: 3.00s"));
    assert!(text.contains("Tokens Used: 20"));
    assert!(!text.contains("Model: phi3"));
}

#[test]
fn test_details_marks_incomplete_responses() {
    let mut partial = result("m", "Cut off", true, 1.0, 3);
    partial.complete = false;
    let mut results = ResultMap::new();
    results.insert("m".to_string(), vec![partial]);

    assert!(render_details(&results).contains("Status: ✓ Passed (incomplete response)"));
}

// ============================================================================
// Comparison
// ============================================================================

#[test]
fn test_comparison_fills_missing_tests_with_placeholder() {
    let table = compare(&sample());

    assert_eq!(table.models, vec!["llama3", "mistral"]);
    let names: Vec<_> = table.rows.iter().map(|r| r.test_name.as_str()).collect();
    assert_eq!(names, vec!["Greeting", "Capital"]);

    let capital = table.row("Capital").unwrap();
    assert!(capital.cells[0].is_some());
    assert!(capital.cells[1].is_none());
}

#[test]
fn test_render_comparison_shows_na_for_missing_model() {
    let text = render_comparison(&sample());

    assert!(text.contains("Test: Capital"));
    assert!(text.contains("Metric     | llama3 | mistral"));
    assert!(text.contains("Status     | Fail | N/A"));
    assert!(text.contains("Time (s)   | 3.00 | N/A"));
    assert!(text.contains("Tokens     | 20 | N/A"));
    assert!(text.contains("Status     | Pass | Pass"));
}

#[test]
fn test_render_comparison_without_results() {
    assert!(render_comparison(&ResultMap::new()).ends_with("No test results available."));
}
