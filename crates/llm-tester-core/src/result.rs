//! Test results

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use llm_tester_client::GenerationResult;
use serde::{Deserialize, Serialize};

use crate::case::TestCase;

/// Results grouped by model name
pub type ResultMap = BTreeMap<String, Vec<TestResult>>;

/// Outcome of one test case against one model. Built once, never mutated.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TestResult {
    pub test_case_id: String,
    pub test_case_name: String,
    pub model_name: String,
    pub prompt: String,
    pub response: String,
    /// Seconds, from the generation's wall-clock duration
    pub response_time: f64,
    /// Prompt tokens plus generated tokens
    pub token_count: u64,
    pub is_valid: bool,
    pub category: String,
    pub timestamp: DateTime<Utc>,
    pub metrics: BTreeMap<String, u64>,
    /// False when the stream ended without a completion marker
    pub complete: bool,
}

impl TestResult {
    pub fn new(test_case: &TestCase, model: &str, generation: &GenerationResult) -> Self {
        let metrics = BTreeMap::from([
            ("load_duration".to_string(), generation.load_duration),
            ("prompt_eval_count".to_string(), generation.prompt_eval_count),
            (
                "prompt_eval_duration".to_string(),
                generation.prompt_eval_duration,
            ),
            ("eval_count".to_string(), generation.eval_count),
            ("eval_duration".to_string(), generation.eval_duration),
        ]);

        Self {
            test_case_id: test_case.id().to_string(),
            test_case_name: test_case.name().to_string(),
            model_name: model.to_string(),
            prompt: test_case.prompt().to_string(),
            response: generation.response.clone(),
            response_time: generation.total_duration as f64 / 1000.0,
            token_count: generation.token_count(),
            is_valid: test_case.validate_response(&generation.response),
            category: test_case.category().to_string(),
            timestamp: Utc::now(),
            metrics,
            complete: generation.is_complete(),
        }
    }

    pub fn metric(&self, name: &str) -> Option<u64> {
        self.metrics.get(name).copied()
    }
}
