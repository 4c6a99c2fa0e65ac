//! Stock analyst chat bot
//!
//! Answers a ticker symbol with a chart and a language-model written analysis.
//! Each request runs the same fixed pipeline:
//!
//! 1. **Quote fetch**: Twelve Data resolves the ticker to a [`MarketSnapshot`]
//! 2. **Chart fetch**: Finviz renders a [`ChartImage`]
//! 3. **Prompt compose**: snapshot and ticker become an [`AnalysisPrompt`]
//! 4. **Narrative fetch**: an OpenRouter model writes the [`AnalysisResult`]
//!
//! A "processing" placeholder is posted before the first call. On success the
//! chart and narrative are sent and the placeholder deleted; on any failure the
//! placeholder is edited to show what went wrong.
//!
//! # Example
//!
//! ```rust,no_run
//! use analyst_bot::{AnalysisPipeline, AnalystConfig, TelegramBot, TelegramClient};
//! use std::sync::Arc;
//!
//! # async fn run() -> analyst_bot::Result<()> {
//! let config = AnalystConfig::from_env()?;
//! let client = Arc::new(TelegramClient::new(
//!     &config.telegram_base_url,
//!     &config.telegram_token,
//!     config.request_timeout,
//! )?);
//! let pipeline = AnalysisPipeline::from_config(&config, client.clone())?;
//!
//! TelegramBot::new(client, pipeline).run().await
//! # }
//! ```

pub mod api;
pub mod bot;
pub mod config;
pub mod engine;
pub mod error;
pub mod interface;
pub mod model;
pub mod platforms;
pub mod prompts;

// Re-export main types for convenience
pub use api::{ChartProvider, FinvizClient, QuoteProvider, TwelveDataClient};
pub use bot::TelegramBot;
pub use config::{AnalystConfig, DEFAULT_MODEL};
pub use engine::{AnalysisPipeline, DeliveryState, NarrativeClient, RequestContext};
pub use error::{AnalystError, ConnectivityError, DomainError, Provider, Result};
pub use interface::{ChatId, ChatSurface, MessageId};
pub use model::{AnalysisPrompt, AnalysisResult, ChartImage, MarketSnapshot, Ticker};
pub use platforms::TelegramClient;
pub use prompts::PromptComposer;
