//! Configuration for the analysis bot
//!
//! Credentials are plain values on [`AnalystConfig`]; they are read from the
//! environment once, by the binary, and injected into every client at
//! construction time.

use crate::error::{AnalystError, Result};
use analyst_utils::{env_or, env_parse, require_env};
use std::fmt;
use std::time::Duration;

/// Default language model used for the narrative
pub const DEFAULT_MODEL: &str = "tngtech/deepseek-r1t2-chimera:free";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_QUOTE_BASE_URL: &str = "https://api.twelvedata.com";
const DEFAULT_CHART_BASE_URL: &str = "https://finviz.com";
const DEFAULT_OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_TELEGRAM_BASE_URL: &str = "https://api.telegram.org";
const DEFAULT_APP_TITLE: &str = "Stock Analyst Telegram Bot";

/// Configuration for the analysis bot
#[derive(Clone)]
pub struct AnalystConfig {
    /// Telegram bot token from BotFather
    pub telegram_token: String,

    /// Twelve Data API key
    pub twelve_data_api_key: String,

    /// OpenRouter API key
    pub openrouter_api_key: String,

    /// Model identifier sent to OpenRouter
    pub model: String,

    /// Ceiling applied to every outbound call
    pub request_timeout: Duration,

    /// Twelve Data API base URL
    pub quote_base_url: String,

    /// Finviz base URL
    pub chart_base_url: String,

    /// OpenRouter API base URL
    pub openrouter_base_url: String,

    /// Telegram Bot API base URL
    pub telegram_base_url: String,

    /// `HTTP-Referer` attribution header for OpenRouter
    pub app_referer: Option<String>,

    /// `X-Title` attribution header for OpenRouter
    pub app_title: String,
}

impl AnalystConfig {
    /// Create a new configuration builder
    pub fn builder() -> AnalystConfigBuilder {
        AnalystConfigBuilder::default()
    }

    /// Load the configuration from environment variables
    ///
    /// `TELEGRAM_BOT_TOKEN`, `TWELVE_DATA_API_KEY` and `OPENROUTER_API_KEY` are
    /// required; everything else has a default.
    pub fn from_env() -> Result<Self> {
        let mut builder = Self::builder()
            .telegram_token(require_env("TELEGRAM_BOT_TOKEN")?)
            .twelve_data_api_key(require_env("TWELVE_DATA_API_KEY")?)
            .openrouter_api_key(require_env("OPENROUTER_API_KEY")?)
            .model(env_or("OPENROUTER_MODEL", DEFAULT_MODEL))
            .quote_base_url(env_or("TWELVE_DATA_BASE_URL", DEFAULT_QUOTE_BASE_URL))
            .chart_base_url(env_or("FINVIZ_BASE_URL", DEFAULT_CHART_BASE_URL))
            .openrouter_base_url(env_or("OPENROUTER_API_BASE", DEFAULT_OPENROUTER_BASE_URL))
            .telegram_base_url(env_or("TELEGRAM_API_BASE", DEFAULT_TELEGRAM_BASE_URL))
            .app_title(env_or("OPENROUTER_TITLE", DEFAULT_APP_TITLE));

        if let Ok(referer) = require_env("OPENROUTER_REFERER") {
            builder = builder.app_referer(referer);
        }

        if let Some(secs) = env_parse::<u64>("ANALYST_REQUEST_TIMEOUT_SECS")? {
            builder = builder.request_timeout(Duration::from_secs(secs));
        }

        builder.build()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("telegram_token", &self.telegram_token),
            ("twelve_data_api_key", &self.twelve_data_api_key),
            ("openrouter_api_key", &self.openrouter_api_key),
            ("model", &self.model),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(AnalystError::Config(format!("{name} must not be empty")));
            }
        }

        if self.request_timeout.is_zero() {
            return Err(AnalystError::Config(
                "request_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Keys and the bot token stay out of logs
impl fmt::Debug for AnalystConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalystConfig")
            .field("telegram_token", &"***")
            .field("twelve_data_api_key", &"***")
            .field("openrouter_api_key", &"***")
            .field("model", &self.model)
            .field("request_timeout", &self.request_timeout)
            .field("quote_base_url", &self.quote_base_url)
            .field("chart_base_url", &self.chart_base_url)
            .field("openrouter_base_url", &self.openrouter_base_url)
            .field("telegram_base_url", &self.telegram_base_url)
            .finish_non_exhaustive()
    }
}

/// Builder for AnalystConfig
#[derive(Debug, Default)]
pub struct AnalystConfigBuilder {
    telegram_token: Option<String>,
    twelve_data_api_key: Option<String>,
    openrouter_api_key: Option<String>,
    model: Option<String>,
    request_timeout: Option<Duration>,
    quote_base_url: Option<String>,
    chart_base_url: Option<String>,
    openrouter_base_url: Option<String>,
    telegram_base_url: Option<String>,
    app_referer: Option<String>,
    app_title: Option<String>,
}

impl AnalystConfigBuilder {
    /// Set the Telegram bot token
    pub fn telegram_token(mut self, token: impl Into<String>) -> Self {
        self.telegram_token = Some(token.into());
        self
    }

    /// Set the Twelve Data API key
    pub fn twelve_data_api_key(mut self, key: impl Into<String>) -> Self {
        self.twelve_data_api_key = Some(key.into());
        self
    }

    /// Set the OpenRouter API key
    pub fn openrouter_api_key(mut self, key: impl Into<String>) -> Self {
        self.openrouter_api_key = Some(key.into());
        self
    }

    /// Set the model identifier
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Set the per-call timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the Twelve Data base URL
    pub fn quote_base_url(mut self, url: impl Into<String>) -> Self {
        self.quote_base_url = Some(url.into());
        self
    }

    /// Set the Finviz base URL
    pub fn chart_base_url(mut self, url: impl Into<String>) -> Self {
        self.chart_base_url = Some(url.into());
        self
    }

    /// Set the OpenRouter base URL
    pub fn openrouter_base_url(mut self, url: impl Into<String>) -> Self {
        self.openrouter_base_url = Some(url.into());
        self
    }

    /// Set the Telegram Bot API base URL
    pub fn telegram_base_url(mut self, url: impl Into<String>) -> Self {
        self.telegram_base_url = Some(url.into());
        self
    }

    /// Set the `HTTP-Referer` attribution header
    pub fn app_referer(mut self, referer: impl Into<String>) -> Self {
        self.app_referer = Some(referer.into());
        self
    }

    /// Set the `X-Title` attribution header
    pub fn app_title(mut self, title: impl Into<String>) -> Self {
        self.app_title = Some(title.into());
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<AnalystConfig> {
        let config = AnalystConfig {
            telegram_token: self.telegram_token.unwrap_or_default(),
            twelve_data_api_key: self.twelve_data_api_key.unwrap_or_default(),
            openrouter_api_key: self.openrouter_api_key.unwrap_or_default(),
            model: self.model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_TIMEOUT),
            quote_base_url: self
                .quote_base_url
                .unwrap_or_else(|| DEFAULT_QUOTE_BASE_URL.to_string()),
            chart_base_url: self
                .chart_base_url
                .unwrap_or_else(|| DEFAULT_CHART_BASE_URL.to_string()),
            openrouter_base_url: self
                .openrouter_base_url
                .unwrap_or_else(|| DEFAULT_OPENROUTER_BASE_URL.to_string()),
            telegram_base_url: self
                .telegram_base_url
                .unwrap_or_else(|| DEFAULT_TELEGRAM_BASE_URL.to_string()),
            app_referer: self.app_referer,
            app_title: self
                .app_title
                .unwrap_or_else(|| DEFAULT_APP_TITLE.to_string()),
        };

        config.validate()?;
        Ok(config)
    }
}
