//! `llm-tester run`

use std::sync::Arc;

use llm_tester_client::OllamaClient;
use llm_tester_core::{ExecutionMode, RunOutcome, TestSession, TestSuite};
use llm_tester_report::{render_comparison, render_details, render_summary};
use tracing::{info, warn};

use crate::{
    cli::View,
    config::TesterConfig,
    error::CliResult,
    output::OutputStyle,
    progress::{create_spinner, ProgressReporter},
};

pub async fn run_suite(
    config: &TesterConfig,
    suite_id: &str,
    models: Vec<String>,
    view: View,
    quiet: bool,
) -> CliResult<()> {
    let style = OutputStyle::default();
    let client = Arc::new(OllamaClient::with_timeout(config.timeout()));

    let spinner = (!quiet).then(|| {
        create_spinner(&format!(
            "Connecting to {}:{}...",
            config.host, config.port
        ))
    });
    let connected = client.connect(&config.host, config.port).await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    connected?;

    match client.list_models().await {
        Ok(available) => {
            for model in &models {
                if !available.iter().any(|m| &m.name == model) {
                    warn!("Model '{}' is not in the endpoint's listing", model);
                    eprintln!(
                        "{}",
                        style.warning(&format!("Model '{}' is not listed by the server", model))
                    );
                }
            }
        }
        Err(e) => warn!("Could not verify model names: {}", e),
    }

    let suite = TestSuite::builtin(suite_id);
    let mode = if config.parallel {
        ExecutionMode::Parallel {
            max_concurrency: config.max_concurrency,
        }
    } else {
        ExecutionMode::Sequential
    };

    let mut session = TestSession::new(client.clone());
    session.set_selected_models(models);

    let total = session.selected_models().len() * suite.len();
    let reporter = if quiet {
        ProgressReporter::hidden()
    } else {
        ProgressReporter::new(total)
    };
    let mut session = session.with_observer(Arc::new(reporter));

    info!("Running suite '{}' in {:?} mode", suite.name, mode);
    let outcome = session.run(&suite, mode).await;
    client.close();
    let outcome = outcome?;

    print_outcome(&outcome, view, &style);
    Ok(())
}

fn print_outcome(outcome: &RunOutcome, view: View, style: &OutputStyle) {
    for failure in &outcome.failures {
        let model = failure.model.as_deref().unwrap_or("unknown model");
        eprintln!(
            "{}",
            style.error(&format!("Error testing model {}: {}", model, failure.error))
        );
    }

    let sections: Vec<String> = match view {
        View::Summary => vec![render_summary(&outcome.results)],
        View::Details => vec![render_details(&outcome.results)],
        View::Comparison => vec![render_comparison(&outcome.results)],
        View::All => vec![
            render_summary(&outcome.results),
            render_details(&outcome.results),
            render_comparison(&outcome.results),
        ],
    };
    println!("{}", sections.join("\n\n"));

    if outcome.is_success() {
        eprintln!(
            "{}",
            style.success(&format!("{} tests completed", outcome.total_results()))
        );
    }
}
