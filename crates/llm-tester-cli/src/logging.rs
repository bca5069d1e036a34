//! Tracing subscriber setup

use tracing::Level;

use crate::error::{CliError, CliResult};

/// `--verbose` and `--quiet` win over the configured level
pub fn resolve_level(verbose: bool, quiet: bool, configured: &str) -> Level {
    if verbose {
        return Level::DEBUG;
    }
    if quiet {
        return Level::ERROR;
    }
    match configured.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global fmt subscriber, writing to stderr so reports on stdout stay clean
pub fn init_logging(level: Level) -> CliResult<()> {
    let detailed = level >= Level::DEBUG;
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(detailed)
        .with_file(detailed)
        .with_line_number(detailed)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| CliError::Config(format!("Failed to initialize logging: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_configured_level() {
        assert_eq!(resolve_level(true, false, "error"), Level::DEBUG);
        assert_eq!(resolve_level(false, true, "debug"), Level::ERROR);
    }

    #[test]
    fn test_configured_level_parsing() {
        assert_eq!(resolve_level(false, false, "WARN"), Level::WARN);
        assert_eq!(resolve_level(false, false, "trace"), Level::TRACE);
        assert_eq!(resolve_level(false, false, "bogus"), Level::INFO);
    }
}
