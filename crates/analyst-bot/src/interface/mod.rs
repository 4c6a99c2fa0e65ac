//! Chat platform abstractions
//!
//! The pipeline only talks to a [`ChatSurface`]; message texts come from a
//! [`Formatter`].

pub mod chat;
pub mod formatter;

pub use chat::{ChatId, ChatSurface, MessageId};
pub use formatter::{Formatter, HtmlFormatter, MAX_MESSAGE_CHARS, escape_html, split_message};

#[cfg(test)]
pub use chat::MockChatSurface;
