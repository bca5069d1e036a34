//! Result aggregation for LLM Tester
//!
//! Each view is a typed structure built from a [`ResultMap`] plus a plain-text
//! renderer for terminals and logs.

pub mod comparison;
pub mod details;
pub mod summary;

pub use comparison::{compare, render_comparison, ComparisonCell, ComparisonRow, ComparisonTable};
pub use details::render_details;
pub use summary::{render_summary, summarize, ModelSummary};

pub use llm_tester_core::ResultMap;

/// Shown by every renderer when there is nothing to report
pub const NO_RESULTS: &str = "No test results available.";
