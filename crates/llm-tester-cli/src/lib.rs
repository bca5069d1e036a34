//! LLM Tester command-line front end

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod output;
pub mod progress;

pub use cli::{run_cli, Cli, Commands, View};
pub use config::{ConfigOverrides, TesterConfig};
pub use error::{CliError, CliResult};
