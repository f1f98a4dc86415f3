// Adaptive Chat
// Main entry point

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use adaptive_chat::cli::Repl;
use adaptive_chat::config::{load_config, ConfigOverrides, SamplingStore};
use adaptive_chat::logging::TranscriptLogger;
use adaptive_chat::orchestrator::Orchestrator;
use adaptive_chat::providers::create_provider;

/// Task-aware chat shell for OpenAI-compatible completion APIs
#[derive(Debug, Parser)]
#[command(name = "adaptive-chat", version, about)]
struct Cli {
    /// Config file (default: ~/.adaptive-chat/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Model identifier sent with every request
    #[arg(long)]
    model: Option<String>,

    /// Endpoint root; `/v1/chat/completions` is appended
    #[arg(long, value_name = "URL")]
    base_url: Option<String>,

    /// Append successful exchanges to this JSONL file
    #[arg(long, value_name = "PATH")]
    transcript: Option<PathBuf>,

    /// Debug logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG wins when set
    let default_filter = if cli.verbose {
        "adaptive_chat=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let overrides = ConfigOverrides {
        config_path: cli.config,
        model: cli.model,
        base_url: cli.base_url,
        transcript_path: cli.transcript,
    };
    let config = load_config(&overrides)?;

    let provider = create_provider(&config)?;
    let orchestrator = Orchestrator::new(provider, SamplingStore::new(config.sampling.clone()));

    let mut repl = Repl::new(orchestrator);
    if let Some(path) = config.transcript_path.clone() {
        repl = repl.with_transcript(TranscriptLogger::new(path)?);
    }

    repl.run().await?;

    Ok(())
}
