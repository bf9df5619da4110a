//! docqa CLI library.
//!
//! This library provides the core functionality for the docqa command-line interface,
//! including configuration loading, running an extraction, and output formatting.

pub mod cli;
pub mod config;
pub mod error;
pub mod output;

pub use cli::{Cli, CliFormat};
pub use config::Config;
pub use error::{CliError, Result};
pub use output::Formatter;

use docqa_domain::traits::LlmProvider;
use docqa_extractor::{BasicProtocol, Extractor, Protocol};
use docqa_llm::OpenAiProvider;
use docqa_types::{default_codec, default_types};
use std::fmt::Display;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Answer the configured questions about `document` and format the result.
///
/// When the extraction fails after the model answered, the tokens it cost are
/// logged before the error is returned.
pub fn execute<L>(
    config: &Config,
    provider: L,
    document: &str,
    formatter: &Formatter,
) -> Result<String>
where
    L: LlmProvider,
    L::Error: Display,
{
    let extractor = Extractor::new(provider, default_types(), config.extractor.clone());
    let extraction = extractor.extract(&config.questions, document).inspect_err(|failure| {
        if let Some(usage) = &failure.usage {
            warn!(
                "Extraction failed after using {} tokens ({} prompt, {} completion)",
                usage.total_tokens, usage.prompt_tokens, usage.completion_tokens
            );
        }
    })?;

    info!(
        "Answered {} of {} questions ({} tokens)",
        extraction.answers.values().filter(|a| !a.is_empty()).count(),
        config.questions.len(),
        extraction.usage.total_tokens
    );

    formatter.format_answers(&extraction.answers, &extraction.usage)
}

/// Render the system prompt and schema for the configured questions without calling a model.
pub fn dry_run(config: &Config, formatter: &Formatter) -> Result<String> {
    let protocol = BasicProtocol::new(config.extractor.role_and_task.clone(), default_types());
    protocol
        .validate_questions(&config.questions)
        .map_err(|e| CliError::Config(e.to_string()))?;

    formatter.format_request(
        &protocol.system_prompt(&config.questions),
        &protocol.schema(&config.questions),
    )
}

/// Set up the OpenAI-compatible provider from the `[provider]` section.
pub fn provider(config: &Config, api_key: String) -> Result<OpenAiProvider> {
    Ok(OpenAiProvider::from_config(&config.provider, api_key)?)
}

/// Read the document from `path`, or from stdin when no path is given.
pub fn read_document(path: Option<&Path>) -> Result<String> {
    let document = match path {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(document)
}

/// Formatter whose codec knows every default answer type.
pub fn formatter(format: CliFormat) -> Formatter {
    Formatter::new(format, default_codec())
}
