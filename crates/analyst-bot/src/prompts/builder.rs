//! Fluent prompt builder

/// A fluent builder for constructing prompts piece by piece
///
/// # Examples
///
/// ```
/// use analyst_bot::prompts::PromptBuilder;
///
/// let prompt = PromptBuilder::new()
///     .line("Here is the data:")
///     .bullet("Price: 150.0")
///     .when(false, "never shown")
///     .build();
///
/// assert_eq!(prompt, "Here is the data:\n- Price: 150.0\n");
/// ```
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    parts: Vec<String>,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Add static text
    pub fn text(mut self, content: impl Into<String>) -> Self {
        self.parts.push(content.into());
        self
    }

    /// Add text followed by a newline
    pub fn line(self, content: impl Into<String>) -> Self {
        self.text(content).newline()
    }

    /// Add a newline
    pub fn newline(self) -> Self {
        self.text("\n")
    }

    /// Add a blank line (two newlines)
    pub fn blank_line(self) -> Self {
        self.text("\n\n")
    }

    /// Add a `- ` bullet line
    pub fn bullet(self, item: impl Into<String>) -> Self {
        self.text(format!("- {}\n", item.into()))
    }

    /// Add content conditionally
    pub fn when(self, condition: bool, content: impl Into<String>) -> Self {
        if condition { self.text(content) } else { self }
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        self.parts.concat()
    }
}
