//! The per-request analysis pipeline

use super::context::RequestContext;
use super::narrative::NarrativeClient;
use super::result::{AnalysisReport, DeliveryState};
use crate::api::{ChartProvider, FinvizClient, QuoteProvider, TwelveDataClient};
use crate::config::AnalystConfig;
use crate::error::Result;
use crate::interface::{
    ChatId, ChatSurface, Formatter, HtmlFormatter, MAX_MESSAGE_CHARS, split_message,
};
use crate::model::Ticker;
use crate::prompts::PromptComposer;
use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

/// Quote, chart, prompt and narrative stages plus delivery
///
/// Holds no per-request state; one instance serves any number of concurrent
/// requests.
#[derive(Clone)]
pub struct AnalysisPipeline {
    quotes: Arc<dyn QuoteProvider>,
    charts: Arc<dyn ChartProvider>,
    prompts: PromptComposer,
    narrative: NarrativeClient,
    chat: Arc<dyn ChatSurface>,
    formatter: Arc<dyn Formatter>,
}

impl AnalysisPipeline {
    pub fn new(
        quotes: Arc<dyn QuoteProvider>,
        charts: Arc<dyn ChartProvider>,
        prompts: PromptComposer,
        narrative: NarrativeClient,
        chat: Arc<dyn ChatSurface>,
    ) -> Self {
        Self {
            quotes,
            charts,
            prompts,
            narrative,
            chat,
            formatter: Arc::new(HtmlFormatter),
        }
    }

    /// Wire the production providers from configuration
    pub fn from_config(config: &AnalystConfig, chat: Arc<dyn ChatSurface>) -> Result<Self> {
        let quotes = TwelveDataClient::new(
            &config.quote_base_url,
            &config.twelve_data_api_key,
            config.request_timeout,
        )?;
        let charts = FinvizClient::new(&config.chart_base_url, config.request_timeout)?;
        let prompts = PromptComposer::new()?;
        let narrative = NarrativeClient::from_config(config)?;

        Ok(Self::new(
            Arc::new(quotes),
            Arc::new(charts),
            prompts,
            narrative,
            chat,
        ))
    }

    /// Replace the default HTML texts
    pub fn with_formatter(mut self, formatter: Arc<dyn Formatter>) -> Self {
        self.formatter = formatter;
        self
    }

    pub fn formatter(&self) -> &dyn Formatter {
        self.formatter.as_ref()
    }

    /// Send the welcome text
    pub async fn greet(&self, chat: ChatId, first_name: &str) -> Result<()> {
        self.chat
            .send_text(chat, &self.formatter.welcome(first_name))
            .await
            .map(|_| ())
    }

    /// Handle one inbound chat message
    ///
    /// Blank input gets a usage hint and no placeholder. Otherwise the
    /// placeholder is posted before any provider is called. `Err` means the
    /// chat surface itself failed while acknowledging or unwinding.
    #[instrument(skip_all, fields(chat = %chat))]
    pub async fn handle(&self, chat: ChatId, text: &str) -> Result<DeliveryState> {
        let Ok(ticker) = Ticker::parse(text) else {
            warn!("message carries no ticker");
            self.chat.send_text(chat, &self.formatter.usage_hint()).await?;
            return Ok(DeliveryState::Rejected);
        };

        let placeholder = self
            .chat
            .send_text(chat, &self.formatter.placeholder(&ticker))
            .await?;
        let ctx = RequestContext::new(chat, placeholder);

        self.run(&ticker, &ctx).await
    }

    /// Run all stages for a ticker whose placeholder is already posted
    ///
    /// Any stage or delivery failure is rendered into the placeholder.
    #[instrument(skip_all, fields(request_id = %ctx.request_id, ticker = %ticker))]
    pub async fn run(&self, ticker: &Ticker, ctx: &RequestContext) -> Result<DeliveryState> {
        let outcome = match self.analyze(ticker).await {
            Ok(report) => self.deliver(&report, ctx).await,
            Err(err) => Err(err),
        };

        match outcome {
            Ok(()) => {
                info!("analysis delivered");
                Ok(DeliveryState::ResultDelivered)
            }
            Err(err) => {
                let detail = err.detail();
                error!(error = %detail, "analysis failed");

                self.chat
                    .edit_text(
                        ctx.chat_id,
                        ctx.placeholder_id,
                        &self.formatter.error_notice(ticker, &detail),
                    )
                    .await?;
                Ok(DeliveryState::ErrorShown { detail })
            }
        }
    }

    /// Fetch and compose everything; no user-visible side effects
    pub async fn analyze(&self, ticker: &Ticker) -> Result<AnalysisReport> {
        let snapshot = self.quotes.fetch_quote(ticker).await?;
        let chart = self.charts.fetch_chart(ticker).await?;
        let prompt = self.prompts.compose(ticker, &snapshot)?;
        let result = self.narrative.fetch(ticker, &prompt).await?;

        Ok(AnalysisReport {
            snapshot,
            chart,
            result,
        })
    }

    /// Chart first, then the narrative in as many messages as it needs
    async fn deliver(&self, report: &AnalysisReport, ctx: &RequestContext) -> Result<()> {
        let parts = split_message(report.result.narrative(), MAX_MESSAGE_CHARS);
        if parts.len() > 1 {
            debug!(parts = parts.len(), "narrative split across messages");
        }

        let caption = self.formatter.chart_caption(report.ticker());
        self.chat
            .send_image(ctx.chat_id, &report.chart, &caption)
            .await?;
        for part in parts {
            self.chat.send_text(ctx.chat_id, part).await?;
        }
        self.chat
            .delete_message(ctx.chat_id, ctx.placeholder_id)
            .await
    }
}
