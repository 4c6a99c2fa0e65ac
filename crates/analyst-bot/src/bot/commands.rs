//! Routing of inbound chat text

/// What an inbound text message asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/start`: greet the user
    Start,
    /// Any other `/command`; ignored
    Unsupported { name: String },
    /// Plain text, treated as a ticker symbol
    Ticker { text: String },
}

impl Command {
    /// Parse a message text
    ///
    /// Commands may carry a `@botname` suffix (group chats). Plain text is
    /// passed through untouched; normalising it is the pipeline's job.
    pub fn parse(input: &str) -> Self {
        let Some(rest) = input.trim_start().strip_prefix('/') else {
            return Command::Ticker {
                text: input.to_string(),
            };
        };

        let word = rest.split_whitespace().next().unwrap_or_default();
        let name = word.split('@').next().unwrap_or_default().to_lowercase();

        match name.as_str() {
            "start" => Command::Start,
            _ => Command::Unsupported { name },
        }
    }
}
