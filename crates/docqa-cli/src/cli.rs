//! CLI argument definitions.

use clap::Parser;
use std::path::PathBuf;

/// docqa - Answer typed questions about a document with an LLM.
#[derive(Debug, Parser)]
#[command(name = "docqa")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file with [provider], [extractor] and [questions.<key>] tables
    #[arg(short, long)]
    pub config: PathBuf,

    /// Document to read (defaults to stdin)
    #[arg(short, long)]
    pub document: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    pub format: CliFormat,

    /// API key (overrides the environment variable named in the config)
    #[arg(long)]
    pub api_key: Option<String>,

    /// Print the system prompt and schema instead of calling the model
    #[arg(long)]
    pub dry_run: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Compact JSON on one line
    Json,
    /// Indented JSON
    Pretty,
}

impl Cli {
    /// Log filter directive for the requested verbosity
    pub fn log_level(&self) -> &'static str {
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
