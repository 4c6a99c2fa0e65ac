//! Language-model provider abstraction for the stock analyst bot
//!
//! This crate provides the small slice of LLM plumbing the analysis pipeline
//! needs:
//!
//! - Message types for chat-style requests
//! - Completion request/response types
//! - Provider trait for LLM implementations
//! - An OpenRouter provider (OpenAI-compatible chat completions, behind the
//!   `openrouter` feature)

pub mod completion;
pub mod error;
pub mod messages;
pub mod provider;

// Re-export main types
pub use completion::{CompletionRequest, CompletionResponse, TokenUsage};
pub use error::{LLMError, Result};
pub use messages::{Message, Role};
pub use provider::LLMProvider;

// Provider implementations (feature-gated)
#[cfg(feature = "openrouter")]
pub mod providers;
