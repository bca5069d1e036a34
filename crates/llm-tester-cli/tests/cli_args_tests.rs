//! Tests for command-line parsing

use clap::Parser;
use llm_tester_cli::{Cli, Commands, View};

#[test]
fn test_run_parses_repeated_models() {
    let cli = Cli::try_parse_from([
        "llm-tester", "run", "--suite", "math", "-m", "llama3", "-m", "mistral", "--parallel",
        "-c", "4", "--view", "all",
    ])
    .unwrap();

    match &cli.command {
        Commands::Run {
            suite,
            models,
            parallel,
            max_concurrency,
            view,
        } => {
            assert_eq!(suite, "math");
            assert_eq!(models, &vec!["llama3".to_string(), "mistral".to_string()]);
            assert!(*parallel);
            assert_eq!(*max_concurrency, Some(4));
            assert_eq!(*view, View::All);
        }
        other => panic!("Expected run command, got {:?}", other),
    }

    let overrides = cli.overrides();
    assert_eq!(overrides.parallel, Some(true));
    assert_eq!(overrides.max_concurrency, Some(4));
}

#[test]
fn test_run_requires_a_model() {
    assert!(Cli::try_parse_from(["llm-tester", "run"]).is_err());
}

#[test]
fn test_run_defaults() {
    let cli = Cli::try_parse_from(["llm-tester", "run", "--model", "llama3"]).unwrap();
    match &cli.command {
        Commands::Run {
            suite,
            parallel,
            view,
            ..
        } => {
            assert_eq!(suite, "basic");
            assert!(!*parallel);
            assert_eq!(*view, View::Summary);
        }
        other => panic!("Expected run command, got {:?}", other),
    }
    assert_eq!(cli.overrides().parallel, None);
}

#[test]
fn test_global_connection_flags() {
    let cli = Cli::try_parse_from([
        "llm-tester", "models", "--host", "gpu-box", "--port", "8080", "--timeout", "60",
    ])
    .unwrap();

    let overrides = cli.overrides();
    assert_eq!(overrides.host.as_deref(), Some("gpu-box"));
    assert_eq!(overrides.port, Some(8080));
    assert_eq!(overrides.timeout_secs, Some(60));
    assert!(matches!(cli.command, Commands::Models));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    assert!(Cli::try_parse_from(["llm-tester", "-v", "-q", "suites"]).is_err());
}
