//! Minimal markdown builder for system prompts

const WHITESPACE: &[char] = &[' ', '\n', '\r', '\t'];
const BULLET_TRIM: &[char] = &[' ', '\n', '\r', '\t', '.'];

/// Line-oriented markdown builder
#[derive(Debug, Default, Clone)]
pub struct MarkdownBuilder {
    lines: Vec<String>,
}

impl MarkdownBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a header of the given level (1 = `#`)
    pub fn header(&mut self, level: usize, text: &str) -> &mut Self {
        self.lines
            .push(format!("{} {}", "#".repeat(level), text.trim_matches(WHITESPACE)));
        self
    }

    /// Append a bullet, indented by `indent` levels
    ///
    /// Surrounding whitespace and periods are trimmed and exactly one period
    /// terminates the bullet.
    pub fn bullet(&mut self, indent: usize, text: &str) -> &mut Self {
        self.lines.push(format!(
            "{}- {}.",
            "  ".repeat(indent),
            text.trim_matches(BULLET_TRIM)
        ));
        self
    }

    /// Append `count` empty lines
    pub fn blank(&mut self, count: usize) -> &mut Self {
        self.lines.extend(std::iter::repeat_n(String::new(), count));
        self
    }

    /// Join all lines with `\n`
    pub fn build(&self) -> String {
        self.lines.join("\n")
    }
}
