//! Full per-test transcripts

use llm_tester_core::ResultMap;

use crate::NO_RESULTS;

/// Render every stored result, model by model, in stored order
pub fn render_details(results: &ResultMap) -> String {
    let mut lines = vec![
        "Detailed Test Results".to_string(),
        "===================".to_string(),
        String::new(),
    ];

    let mut has_results = false;
    for (model, model_results) in results.iter().filter(|(_, r)| !r.is_empty()) {
        has_results = true;
        lines.push(format!("Model: {}", model));
        lines.push("-".repeat(model.chars().count() + 7));

        for result in model_results {
            let status = if result.is_valid {
                "✓ Passed"
            } else {
                "✗ Failed"
            };
            lines.push(String::new());
            lines.push(format!("Test: {}", result.test_case_name));
            lines.push(format!("Category: {}", result.category));
            if result.complete {
                lines.push(format!("Status: {}", status));
            } else {
                lines.push(format!("Status: {} (incomplete response)", status));
            }
            lines.push(format!("Response Time: {:.2}s", result.response_time));
            lines.push(format!("Tokens Used: {}", result.token_count));
            lines.push(String::new());
            lines.push("Prompt:".to_string());
            lines.push(result.prompt.clone());
            lines.push(String::new());
            lines.push("Response:".to_string());
            lines.push(result.response.clone());
            lines.push("-".repeat(80));
        }
        lines.push(String::new());
    }

    if !has_results {
        lines.push(NO_RESULTS.to_string());
    }

    lines.join("\n")
}
