//! Error types for test execution

use llm_tester_client::ClientError;
use thiserror::Error;

/// Errors raised while running tests
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TestError {
    /// The generation call behind a test failed
    #[error("Test execution failed for '{test_name}' on model '{model}': {source}")]
    ExecutionFailed {
        test_name: String,
        model: String,
        #[source]
        source: ClientError,
    },

    #[error("No models selected")]
    NoModelsSelected,

    #[error("Unknown test suite: {0}")]
    UnknownSuite(String),
}

impl TestError {
    /// Model the failure belongs to, when there is one
    pub fn model(&self) -> Option<&str> {
        match self {
            TestError::ExecutionFailed { model, .. } => Some(model),
            _ => None,
        }
    }
}
