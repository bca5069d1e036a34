//! `llm-tester models`

use llm_tester_client::OllamaClient;
use tracing::info;

use crate::{
    config::TesterConfig,
    error::CliResult,
    output::{format_size, OutputStyle},
    progress::create_spinner,
};

pub async fn list_models(config: &TesterConfig, quiet: bool) -> CliResult<()> {
    let style = OutputStyle::default();
    let client = OllamaClient::with_timeout(config.timeout());

    let spinner = (!quiet).then(|| {
        create_spinner(&format!(
            "Connecting to {}:{}...",
            config.host, config.port
        ))
    });
    let listing = async {
        client.connect(&config.host, config.port).await?;
        client.list_models().await
    }
    .await;
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    client.close();

    let models = listing?;
    info!("Listed {} models", models.len());

    if models.is_empty() {
        let base_url = client.base_url().unwrap_or_default();
        println!(
            "{}",
            style.warning(&format!("No models found at {}", base_url))
        );
        return Ok(());
    }

    let width = models
        .iter()
        .map(|m| m.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(4);
    println!(
        "{}",
        style.header(&format!("{:<width$}  {:>10}  {}", "NAME", "SIZE", "MODIFIED", width = width))
    );
    for model in &models {
        println!(
            "{:<width$}  {:>10}  {}",
            model.name,
            format_size(model.size),
            style.dim(&model.modified_at),
            width = width
        );
    }

    Ok(())
}
