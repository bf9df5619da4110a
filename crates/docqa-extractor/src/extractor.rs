//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::{ExtractionFailure, ExtractorError};
use crate::protocol::{BasicProtocol, Protocol};
use docqa_domain::traits::LlmProvider;
use docqa_domain::{Answers, LlmUsage, Questions, TypeRegistry};
use std::fmt::Display;
use tracing::{debug, info};

/// Answers extracted from one document, plus what the call cost
#[derive(Debug)]
pub struct Extraction {
    /// Entities per question key, in the order the model gave them
    pub answers: Answers,
    /// Token usage of the LLM call
    pub usage: LlmUsage,
}

/// Ask `questions` about `text` in a single LLM call
///
/// Checks `questions` against `protocol`, builds the schema and system prompt,
/// sends `text` as the user prompt and parses the response permissively.
/// Questions the protocol rejects never reach the provider. There is no retry: a
/// transport or parse failure aborts the call. When the provider did respond,
/// its usage is reported alongside the failure.
pub fn extract_answers<L, P>(
    provider: &L,
    protocol: &P,
    questions: &Questions,
    text: &str,
) -> Result<Extraction, ExtractionFailure>
where
    L: LlmProvider,
    L::Error: Display,
    P: Protocol + ?Sized,
{
    run(provider, protocol, questions, text, false)
}

fn run<L, P>(
    provider: &L,
    protocol: &P,
    questions: &Questions,
    text: &str,
    strict: bool,
) -> Result<Extraction, ExtractionFailure>
where
    L: LlmProvider,
    L::Error: Display,
    P: Protocol + ?Sized,
{
    protocol.validate_questions(questions)?;

    let schema = protocol.schema(questions);
    let system_prompt = protocol.system_prompt(questions);

    debug!(
        "System prompt length: {} chars, document length: {} chars",
        system_prompt.len(),
        text.len()
    );

    let response = provider
        .get_response(&system_prompt, text, &schema)
        .map_err(|e| ExtractorError::TransportFailure(e.to_string()))?;

    debug!(
        "LLM response length: {} chars, {} tokens",
        response.text.len(),
        response.usage.total_tokens
    );

    let parsed = if strict {
        protocol.parse_response_for(questions, &response.text)
    } else {
        protocol.parse_response(&response.text)
    };

    match parsed {
        Ok(answers) => Ok(Extraction {
            answers,
            usage: response.usage,
        }),
        Err(e) => Err(ExtractionFailure::with_usage(e, response.usage)),
    }
}

/// The Extractor answers a fixed set of questions about documents
///
/// It wraps [`extract_answers`] with the checks an application wants before
/// spending tokens: document length, question validity, and (by default)
/// allow-list enforcement on the response.
pub struct Extractor<L, P = BasicProtocol> {
    llm_provider: L,
    protocol: P,
    config: ExtractorConfig,
}

impl<L> Extractor<L, BasicProtocol>
where
    L: LlmProvider,
    L::Error: Display,
{
    /// Create an Extractor using [`BasicProtocol`] over `types`
    pub fn new(llm_provider: L, types: TypeRegistry, config: ExtractorConfig) -> Self {
        let protocol = BasicProtocol::new(config.role_and_task.clone(), types);
        Self::with_protocol(llm_provider, protocol, config)
    }
}

impl<L, P> Extractor<L, P>
where
    L: LlmProvider,
    L::Error: Display,
    P: Protocol,
{
    /// Create an Extractor with a custom protocol
    pub fn with_protocol(llm_provider: L, protocol: P, config: ExtractorConfig) -> Self {
        Self {
            llm_provider,
            protocol,
            config,
        }
    }

    /// The protocol in use
    pub fn protocol(&self) -> &P {
        &self.protocol
    }

    /// The configuration in use
    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// The LLM provider in use
    pub fn provider(&self) -> &L {
        &self.llm_provider
    }

    /// Answer `questions` about `text`
    pub fn extract(
        &self,
        questions: &Questions,
        text: &str,
    ) -> Result<Extraction, ExtractionFailure> {
        self.config.validate().map_err(ExtractorError::Config)?;

        // Validate text length
        let length = text.chars().count();
        if length > self.config.max_text_length {
            let max = self.config.max_text_length;
            return Err(ExtractorError::TextTooLong(length, max).into());
        }

        if questions.is_empty() {
            return Err(ExtractorError::Config("no questions to ask".to_string()).into());
        }

        info!(
            "Starting extraction of {} questions, text length {}",
            questions.len(),
            length
        );

        let extraction = run(
            &self.llm_provider,
            &self.protocol,
            questions,
            text,
            self.config.enforce_allowed_types,
        )?;

        info!(
            "Extraction complete: {} answers to {} questions, {} tokens",
            extraction.answers.values().map(Vec::len).sum::<usize>(),
            extraction.answers.len(),
            extraction.usage.total_tokens
        );

        Ok(extraction)
    }
}
