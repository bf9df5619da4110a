//! Output formatting for the CLI.

use crate::cli::CliFormat;
use crate::error::Result;
use docqa_domain::{Answers, EntityCodec, LlmUsage};
use serde_json::{json, Value};

/// Output formatter.
pub struct Formatter {
    format: CliFormat,
    codec: EntityCodec,
}

impl Formatter {
    /// Create a new formatter that encodes entities with `codec`.
    pub fn new(format: CliFormat, codec: EntityCodec) -> Self {
        Self { format, codec }
    }

    /// Format answers and usage as `{"answers": {...}, "usage": {...}}`.
    pub fn format_answers(&self, answers: &Answers, usage: &LlmUsage) -> Result<String> {
        let output = json!({
            "answers": self.codec.encode_answers(answers)?,
            "usage": usage,
        });
        self.render(&output)
    }

    /// Format the prompt and schema a request would send.
    pub fn format_request(&self, system_prompt: &str, schema: &Value) -> Result<String> {
        match self.format {
            CliFormat::Json => self.render(&json!({
                "system_prompt": system_prompt,
                "schema": schema,
            })),
            CliFormat::Pretty => Ok(format!(
                "{}\n\n---\n\n{}",
                system_prompt,
                serde_json::to_string_pretty(schema)?
            )),
        }
    }

    fn render(&self, value: &Value) -> Result<String> {
        Ok(match self.format {
            CliFormat::Json => serde_json::to_string(value)?,
            CliFormat::Pretty => serde_json::to_string_pretty(value)?,
        })
    }
}
