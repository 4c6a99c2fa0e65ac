//! Chat delivery surface

use crate::error::Result;
use crate::model::ChartImage;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Conversation identifier on the chat platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChatId(pub i64);

/// Message identifier within a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Operations the pipeline needs from a chat platform
///
/// All text is HTML. Failures surface as
/// [`AnalystError::Delivery`](crate::error::AnalystError::Delivery).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatSurface: Send + Sync {
    /// Send a text message, returning its id
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId>;

    /// Send an image with a caption, returning its id
    async fn send_image(&self, chat: ChatId, image: &ChartImage, caption: &str)
    -> Result<MessageId>;

    /// Replace the text of an existing message
    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) -> Result<()>;

    /// Delete a message
    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<()>;
}
