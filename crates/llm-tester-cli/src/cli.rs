//! Command-line interface

use clap::{Parser, Subcommand, ValueEnum};

use crate::{
    commands,
    config::{ConfigOverrides, TesterConfig},
    error::CliResult,
    logging,
};

#[derive(Parser, Debug)]
#[command(name = "llm-tester")]
#[command(version, about = "Benchmark locally hosted language models")]
pub struct Cli {
    /// Model service host
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Model service port
    #[arg(long, global = true)]
    pub port: Option<u16>,

    /// Transport timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors and hide progress
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the models served by the endpoint
    Models,

    /// List the built-in test suites and their cases
    Suites,

    /// Run a test suite against one or more models
    Run {
        /// Built-in suite id (basic, math, code, knowledge)
        #[arg(short, long, default_value = "basic")]
        suite: String,

        /// Model to test; repeat for several models
        #[arg(short, long = "model", required = true)]
        models: Vec<String>,

        /// Run all (model, test) pairs through a bounded worker pool
        #[arg(short, long)]
        parallel: bool,

        /// Maximum tests in flight in parallel mode
        #[arg(short = 'c', long)]
        max_concurrency: Option<usize>,

        /// Which report to print
        #[arg(long, value_enum, default_value_t = View::Summary)]
        view: View,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum View {
    Summary,
    Details,
    Comparison,
    All,
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        let mut overrides = ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            timeout_secs: self.timeout,
            ..ConfigOverrides::default()
        };
        if let Commands::Run {
            parallel,
            max_concurrency,
            ..
        } = &self.command
        {
            overrides.max_concurrency = *max_concurrency;
            if *parallel {
                overrides.parallel = Some(true);
            }
        }
        overrides
    }
}

/// Resolve configuration, install logging and dispatch the command
pub async fn run_cli(cli: Cli) -> CliResult<()> {
    let mut config = TesterConfig::load_with_precedence()?;
    config.apply_overrides(&cli.overrides());
    config.validate()?;

    logging::init_logging(logging::resolve_level(
        cli.verbose,
        cli.quiet,
        &config.log_level,
    ))?;
    config.log_warnings();

    match cli.command {
        Commands::Models => commands::models::list_models(&config, cli.quiet).await,
        Commands::Suites => {
            commands::suites::list_suites();
            Ok(())
        }
        Commands::Run {
            suite,
            models,
            view,
            ..
        } => commands::run::run_suite(&config, &suite, models, view, cli.quiet).await,
    }
}
