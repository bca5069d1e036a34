use std::process;

use clap::Parser;
use llm_tester_cli::{run_cli, Cli};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let verbose = cli.verbose;

    if let Err(e) = run_cli(cli).await {
        eprintln!("Error: {}", e.user_message());
        if verbose {
            eprintln!("\n{}", e.technical_details());
        }
        process::exit(1);
    }
}
