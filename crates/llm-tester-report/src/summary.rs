//! Per-model summary statistics

use llm_tester_core::{ResultMap, TestResult};
use serde::Serialize;

use crate::NO_RESULTS;

/// Aggregates for one model
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelSummary {
    pub model: String,
    pub total_tests: usize,
    pub passed_tests: usize,
    /// Percentage in `0.0..=100.0`
    pub pass_rate: f64,
    /// Seconds
    pub avg_response_time: f64,
    pub avg_tokens: f64,
    /// Results whose stream ended without a completion marker
    pub incomplete: usize,
}

impl ModelSummary {
    /// `None` when there are no results to summarize
    pub fn from_results(model: &str, results: &[TestResult]) -> Option<Self> {
        if results.is_empty() {
            return None;
        }

        let total = results.len();
        let passed = results.iter().filter(|r| r.is_valid).count();
        let time: f64 = results.iter().map(|r| r.response_time).sum();
        let tokens: u64 = results.iter().map(|r| r.token_count).sum();

        Some(Self {
            model: model.to_string(),
            total_tests: total,
            passed_tests: passed,
            pass_rate: passed as f64 / total as f64 * 100.0,
            avg_response_time: time / total as f64,
            avg_tokens: tokens as f64 / total as f64,
            incomplete: results.iter().filter(|r| !r.complete).count(),
        })
    }
}

/// One summary per model that has at least one result, in model-name order
pub fn summarize(results: &ResultMap) -> Vec<ModelSummary> {
    results
        .iter()
        .filter_map(|(model, model_results)| ModelSummary::from_results(model, model_results))
        .collect()
}

pub fn render_summary(results: &ResultMap) -> String {
    let mut lines = vec![
        "Test Results Summary".to_string(),
        "===================".to_string(),
        String::new(),
    ];

    let summaries = summarize(results);
    if summaries.is_empty() {
        lines.push(NO_RESULTS.to_string());
    }

    for s in summaries {
        lines.push(format!("Model: {}", s.model));
        lines.push(format!("Tests Run: {}", s.total_tests));
        lines.push(format!("Tests Passed: {}", s.passed_tests));
        lines.push(format!("Success Rate: {:.1}%", s.pass_rate));
        lines.push(format!("Average Response Time: {:.2}s", s.avg_response_time));
        lines.push(format!("Average Tokens Used: {:.1}", s.avg_tokens));
        if s.incomplete > 0 {
            lines.push(format!("Incomplete Responses: {}", s.incomplete));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
