//! Side-by-side comparison of models per test

use std::collections::HashMap;

use llm_tester_core::{ResultMap, TestResult};
use serde::Serialize;

use crate::NO_RESULTS;

/// Placeholder for a model that did not run a test
pub const NOT_AVAILABLE: &str = "N/A";

const METRIC_WIDTH: usize = 10;

/// One model's figures for one test
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonCell {
    pub passed: bool,
    pub response_time: f64,
    pub token_count: u64,
}

impl From<&TestResult> for ComparisonCell {
    fn from(result: &TestResult) -> Self {
        Self {
            passed: result.is_valid,
            response_time: result.response_time,
            token_count: result.token_count,
        }
    }
}

/// One test across every model; `cells[i]` belongs to `ComparisonTable::models[i]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub test_name: String,
    pub cells: Vec<Option<ComparisonCell>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
pub struct ComparisonTable {
    /// Models with at least one result, in model-name order
    pub models: Vec<String>,
    /// Tests in order of first appearance
    pub rows: Vec<ComparisonRow>,
}

impl ComparisonTable {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, test_name: &str) -> Option<&ComparisonRow> {
        self.rows.iter().find(|r| r.test_name == test_name)
    }
}

/// Pivot results by test name, then by model.
///
/// A model that has no result for a test gets an empty cell; when a test ran
/// more than once for a model, the last stored result wins.
pub fn compare(results: &ResultMap) -> ComparisonTable {
    let models: Vec<String> = results
        .iter()
        .filter(|(_, r)| !r.is_empty())
        .map(|(m, _)| m.clone())
        .collect();

    let mut order: Vec<&str> = Vec::new();
    let mut by_test: HashMap<&str, HashMap<&str, &TestResult>> = HashMap::new();
    for model in &models {
        for result in results.get(model).into_iter().flatten() {
            let name = result.test_case_name.as_str();
            by_test
                .entry(name)
                .or_insert_with(|| {
                    order.push(name);
                    HashMap::new()
                })
                .insert(model.as_str(), result);
        }
    }

    let rows = order
        .into_iter()
        .map(|test_name| {
            let per_model = by_test.get(test_name);
            let cells = models
                .iter()
                .map(|m| {
                    per_model
                        .and_then(|p| p.get(m.as_str()))
                        .map(|r| ComparisonCell::from(*r))
                })
                .collect();
            ComparisonRow {
                test_name: test_name.to_string(),
                cells,
            }
        })
        .collect();

    ComparisonTable { models, rows }
}

pub fn render_comparison(results: &ResultMap) -> String {
    let mut lines = vec![
        "Model Comparison".to_string(),
        "===============".to_string(),
        String::new(),
    ];

    let table = compare(results);
    if table.is_empty() {
        lines.push(NO_RESULTS.to_string());
        return lines.join("\n");
    }

    let width: usize = table.models.iter().map(|m| m.chars().count() + 3).sum();

    for row in &table.rows {
        lines.push(format!("Test: {}", row.test_name));
        lines.push("-".repeat(row.test_name.chars().count() + 6));
        lines.push(String::new());
        lines.push(format!("{:<w$} | {}", "Metric", table.models.join(" | "), w = METRIC_WIDTH));
        lines.push("-".repeat(METRIC_WIDTH + 3 + width));

        let metrics: [(&str, fn(&ComparisonCell) -> String); 3] = [
            ("Status", |c| (if c.passed { "Pass" } else { "Fail" }).to_string()),
            ("Time (s)", |c| format!("{:.2}", c.response_time)),
            ("Tokens", |c| c.token_count.to_string()),
        ];
        for (label, format_cell) in metrics {
            let values: Vec<String> = row
                .cells
                .iter()
                .map(|cell| match cell {
                    Some(cell) => format_cell(cell),
                    None => NOT_AVAILABLE.to_string(),
                })
                .collect();
            lines.push(format!("{:<w$} | {}", label, values.join(" | "), w = METRIC_WIDTH));
        }
        lines.push(String::new());
    }

    lines.join("\n")
}
