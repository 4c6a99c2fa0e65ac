//! Message types for LLM communication
//!
//! Chat-completion style messages: a role plus plain text content.

use serde::{Deserialize, Serialize};

/// Message role in a conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User message
    User,
    /// Assistant message
    Assistant,
    /// System message
    System,
}

/// A message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Message role
    pub role: Role,

    /// Message content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

impl Message {
    /// Create a user message with text
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: Some(text.into()),
        }
    }

    /// Create an assistant message with text
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: Some(text.into()),
        }
    }

    /// Create a system message with text
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: Some(text.into()),
        }
    }

    /// Text content of the message, if any
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Whether the message carries no visible text (absent, empty or whitespace-only)
    pub fn is_blank(&self) -> bool {
        self.text().is_none_or(|t| t.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_message() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), Some("Hello"));
    }

    #[test]
    fn test_assistant_message() {
        let msg = Message::assistant("Hi there");
        assert_eq!(msg.role, Role::Assistant);
        assert!(!msg.is_blank());
    }

    #[test]
    fn test_blank_detection() {
        assert!(Message::assistant("  \n\t ").is_blank());
        assert!(
            Message {
                role: Role::Assistant,
                content: None,
            }
            .is_blank()
        );
    }

    #[test]
    fn test_message_wire_shape() {
        let json = serde_json::to_value(Message::user("Test")).unwrap();
        assert_eq!(json, serde_json::json!({ "role": "user", "content": "Test" }));

        let parsed: Message =
            serde_json::from_value(serde_json::json!({ "role": "assistant" })).unwrap();
        assert_eq!(parsed.content, None);
    }
}
