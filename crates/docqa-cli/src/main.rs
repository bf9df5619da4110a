//! docqa CLI - Answer typed questions about a document with an LLM.

use anyhow::Context;
use clap::Parser;
use docqa_cli::{Cli, Config};
use tracing::debug;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Initialize tracing (log to stderr, stdout carries the answers)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_level())),
        )
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::from_file(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    let formatter = docqa_cli::formatter(cli.format);

    if cli.dry_run {
        println!("{}", docqa_cli::dry_run(&config, &formatter)?);
        return Ok(());
    }

    let document = docqa_cli::read_document(cli.document.as_deref()).with_context(|| {
        match &cli.document {
            Some(path) => format!("Failed to read document {}", path.display()),
            None => "Failed to read document from stdin".to_string(),
        }
    })?;
    debug!("Read {} bytes of document", document.len());

    let api_key = config.api_key(cli.api_key.as_deref())?;
    let provider = docqa_cli::provider(&config, api_key)?;

    let output = docqa_cli::execute(&config, provider, &document, &formatter)?;
    println!("{}", output);
    Ok(())
}
