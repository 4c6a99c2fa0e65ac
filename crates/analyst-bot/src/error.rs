//! Error types for the analysis pipeline
//!
//! Two families matter to the pipeline:
//! - [`ConnectivityError`]: a provider answered with a non-success status, or the
//!   request never completed (transport failure, timeout).
//! - [`DomainError`]: the provider answered fine but the content is unusable
//!   (unknown ticker, empty chart, empty narrative).
//!
//! Both end up in the same place: [`AnalystError::detail`] renders them into the
//! diagnostic line shown to the user.

use analyst_llm::LLMError;
use analyst_utils::ConfigError;
use std::fmt;
use thiserror::Error;

/// Longest provider response body carried into a user-facing diagnostic
const MAX_BODY_CHARS: usize = 500;

/// External service an outbound call was addressed to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    /// Market-data provider (quotes)
    TwelveData,
    /// Chart image provider
    Finviz,
    /// Language-model provider
    OpenRouter,
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Provider::TwelveData => write!(f, "Twelve Data"),
            Provider::Finviz => write!(f, "Finviz"),
            Provider::OpenRouter => write!(f, "OpenRouter"),
        }
    }
}

/// Non-success status or transport failure from a provider
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{provider} request failed: {reason}")]
pub struct ConnectivityError {
    /// Provider that failed
    pub provider: Provider,
    /// HTTP status, when the provider answered
    pub status: Option<u16>,
    /// Raw response body, when it could be decoded and was non-empty
    pub body: Option<String>,
    /// Short description of what went wrong
    pub reason: String,
}

impl ConnectivityError {
    /// The provider answered with a non-success status
    pub fn from_status(provider: Provider, status: u16, body: String) -> Self {
        Self {
            provider,
            status: Some(status),
            body: Some(body).filter(|b| !b.trim().is_empty()),
            reason: format!("HTTP {status}"),
        }
    }

    /// The request did not complete
    ///
    /// The URL is stripped from the error first: it can carry API keys or the bot token.
    pub fn from_transport(provider: Provider, err: reqwest::Error) -> Self {
        let err = err.without_url();
        let reason = if err.is_timeout() {
            "request timed out".to_string()
        } else {
            err.to_string()
        };
        Self {
            provider,
            status: err.status().map(|s| s.as_u16()),
            body: None,
            reason,
        }
    }

    /// A success response whose body could not be understood
    pub fn malformed(provider: Provider, err: &serde_json::Error, body: String) -> Self {
        Self {
            provider,
            status: None,
            body: Some(body).filter(|b| !b.trim().is_empty()),
            reason: format!("invalid response body: {err}"),
        }
    }
}

/// Well-formed response that cannot be used
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DomainError {
    /// Nothing left after trimming the user's message
    #[error("No ticker symbol was provided.")]
    EmptyTicker,

    /// Quote provider did not resolve the ticker to an exchange listing
    #[error(
        "Could not determine the stock exchange for '{ticker}'. Please check the ticker.{}",
        provider_note(.message)
    )]
    TickerNotFound {
        /// Normalised ticker
        ticker: String,
        /// The provider's own explanation, when it sent one
        message: Option<String>,
    },

    /// Chart provider answered with an empty body
    #[error("The chart service returned an empty image for '{ticker}'.")]
    EmptyChart {
        /// Normalised ticker
        ticker: String,
    },

    /// Language model produced no usable text
    #[error("The AI model returned an empty response.")]
    EmptyNarrative,
}

/// Errors raised by the analysis bot
#[derive(Debug, Error)]
pub enum AnalystError {
    /// Provider unreachable or answered with an error status
    #[error(transparent)]
    Connectivity(#[from] ConnectivityError),

    /// Provider answered but the content is unusable
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Invalid or missing configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The chat platform rejected or failed a send/edit/delete
    #[error("Chat delivery failed: {0}")]
    Delivery(String),
}

/// Result type alias for bot operations
pub type Result<T> = std::result::Result<T, AnalystError>;

impl AnalystError {
    /// Single human-readable diagnostic line, including the provider body when there is one
    pub fn detail(&self) -> String {
        match self {
            AnalystError::Connectivity(err) => match &err.body {
                Some(body) => format!("{err} | Response: {}", truncate(body, MAX_BODY_CHARS)),
                None => err.to_string(),
            },
            other => other.to_string(),
        }
    }

    /// Whether this is a [`DomainError`]
    pub fn is_domain(&self) -> bool {
        matches!(self, AnalystError::Domain(_))
    }

    /// Whether this is a [`ConnectivityError`]
    pub fn is_connectivity(&self) -> bool {
        matches!(self, AnalystError::Connectivity(_))
    }
}

#[allow(clippy::ref_option)]
fn provider_note(message: &Option<String>) -> String {
    message
        .as_deref()
        .map_or_else(String::new, |m| format!(" (Provider said: {m})"))
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}

/// Every language-model failure surfaces as a connectivity error against OpenRouter
impl From<LLMError> for AnalystError {
    fn from(err: LLMError) -> Self {
        let reason = match &err {
            LLMError::Status { status, .. } => format!("HTTP {status}"),
            LLMError::HttpError(_) if err.is_timeout() => "request timed out".to_string(),
            other => other.to_string(),
        };
        AnalystError::Connectivity(ConnectivityError {
            provider: Provider::OpenRouter,
            status: err.status(),
            body: err.body().map(str::to_owned),
            reason,
        })
    }
}

impl From<ConfigError> for AnalystError {
    fn from(err: ConfigError) -> Self {
        AnalystError::Config(err.to_string())
    }
}
