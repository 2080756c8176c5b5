use std::io::Read;
use std::process::ExitCode;

use anyhow::{Context, Result};
use arena::agents::DebateInput;
use arena::models::{ArenaConfig, DebateOutcome};
use clap::Parser;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "arena",
    about = "Adversarial Long/Short debate over a research document"
)]
struct Cli {
    /// Path to configuration file (defaults apply when omitted)
    #[arg(short, long)]
    config: Option<String>,

    /// Research document to debate; repeatable. Reads stdin when omitted.
    #[arg(short, long)]
    input: Vec<String>,

    /// Debate this ticker regardless of what selection picks
    #[arg(short, long)]
    ticker: Option<String>,

    /// Also write the outcome JSON to this file
    #[arg(long)]
    dump: Option<String>,

    /// Pretty-print the output JSON
    #[arg(long)]
    pretty: bool,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Initialize tracing (respects RUST_LOG env var)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => arena::load_config(path)?,
        None => ArenaConfig::default(),
    };

    let mut input = if cli.input.is_empty() {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read from stdin")?;
        DebateInput::new(buf)
    } else {
        arena::load_documents(&cli.input)?
    };
    input.ticker_override = cli.ticker.clone();

    let pipeline = arena::build_pipeline(&config).context("Failed to build pipeline")?;

    let outcome = arena::debate(&pipeline, &input)
        .await
        .map_err(|e| anyhow::anyhow!("Debate failed: {e}"))?;

    if let Some(path) = &cli.dump {
        arena::write_dump(path, &outcome)?;
    }

    // Output outcome as JSON to stdout
    let output = if cli.pretty {
        serde_json::to_string_pretty(&outcome)?
    } else {
        serde_json::to_string(&outcome)?
    };
    println!("{output}");

    match &outcome {
        DebateOutcome::Completed(_) => Ok(ExitCode::SUCCESS),
        DebateOutcome::Halted(halt) => {
            eprintln!("{}", halt.message);
            Ok(ExitCode::FAILURE)
        }
    }
}
