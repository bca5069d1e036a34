//! CLI error type

use llm_tester_client::ClientError;
use llm_tester_core::TestError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model service error: {0}")]
    Client(#[from] ClientError),

    #[error("Test error: {0}")]
    Test(#[from] TestError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// User-facing message with a hint on what to check
    pub fn user_message(&self) -> String {
        match self {
            CliError::Config(msg) => format!(
                "Configuration error: {}\n\nCheck .llm-tester/config.yaml and LLM_TESTER_* environment variables.",
                msg
            ),
            CliError::Client(e) if e.is_not_connected() => {
                "Not connected to the model service.\n\nRun 'llm-tester models' to check the connection."
                    .to_string()
            }
            CliError::Client(ClientError::ConnectionFailed(reason)) => format!(
                "Could not reach the model service: {}\n\nIs the server running? Use --host and --port to point at it.",
                reason
            ),
            CliError::Client(e) => format!("Model service error: {}", e),
            CliError::Test(TestError::NoModelsSelected) => {
                "No models selected.\n\nPass at least one --model.".to_string()
            }
            CliError::Test(e) => format!("Test run failed: {}", e),
            CliError::Io(e) => format!("File operation failed: {}", e),
        }
    }

    /// Debug representation for verbose mode
    pub fn technical_details(&self) -> String {
        format!("{:?}", self)
    }
}

pub type CliResult<T> = Result<T, CliError>;
