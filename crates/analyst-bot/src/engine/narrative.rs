//! Narrative stage: prompt in, analysis text out

use crate::config::AnalystConfig;
use crate::error::{AnalystError, DomainError, Result};
use crate::model::{AnalysisPrompt, AnalysisResult, Ticker};
use analyst_llm::providers::{OpenRouterConfig, OpenRouterProvider};
use analyst_llm::{CompletionRequest, LLMProvider, Message};
use std::sync::Arc;
use tracing::{debug, instrument};

/// Sends the composed prompt to a language model
#[derive(Clone)]
pub struct NarrativeClient {
    provider: Arc<dyn LLMProvider>,
    model: String,
}

impl NarrativeClient {
    pub fn new(provider: Arc<dyn LLMProvider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// OpenRouter-backed client
    pub fn from_config(config: &AnalystConfig) -> Result<Self> {
        let mut openrouter = OpenRouterConfig::new(&config.openrouter_api_key)
            .with_api_base(&config.openrouter_base_url)
            .with_timeout(config.request_timeout.as_secs().max(1));
        openrouter.referer.clone_from(&config.app_referer);
        openrouter.title = Some(config.app_title.clone());

        let provider = OpenRouterProvider::with_config(openrouter)
            .map_err(|e| AnalystError::Config(e.to_string()))?;
        Ok(Self::new(Arc::new(provider), &config.model))
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// One round trip carrying the prompt as the only message
    #[instrument(skip(self, prompt), fields(provider = self.provider.name(), model = %self.model))]
    pub async fn fetch(&self, ticker: &Ticker, prompt: &AnalysisPrompt) -> Result<AnalysisResult> {
        let request = CompletionRequest::builder(&self.model)
            .add_message(Message::user(prompt.as_str()))
            .build();

        let response = self.provider.complete(request).await?;
        if let Some(usage) = response.usage {
            debug!(
                input_tokens = usage.input_tokens,
                output_tokens = usage.output_tokens,
                "narrative usage"
            );
        }

        let text = response.first_text().ok_or(DomainError::EmptyNarrative)?;
        Ok(AnalysisResult::new(ticker.clone(), text)?)
    }
}
