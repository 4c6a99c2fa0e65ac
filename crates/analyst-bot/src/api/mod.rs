//! Market-data and chart provider clients
//!
//! Each provider sits behind a trait so the pipeline can be exercised with
//! fakes; the concrete clients issue exactly one HTTP request per call and
//! never retry.

pub mod finviz;
pub mod twelve_data;

pub use finviz::FinvizClient;
pub use twelve_data::TwelveDataClient;

use crate::error::{AnalystError, ConnectivityError, Provider, Result};
use crate::model::{ChartImage, MarketSnapshot, Ticker};
use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;

/// Resolves a ticker to a market snapshot
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Fetch the current quote; a quote without an exchange is a
    /// [`DomainError::TickerNotFound`](crate::error::DomainError::TickerNotFound)
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<MarketSnapshot>;
}

/// Renders a chart image for a ticker
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChartProvider: Send + Sync {
    /// Download the chart image bytes
    async fn fetch_chart(&self, ticker: &Ticker) -> Result<ChartImage>;
}

/// HTTP client with the per-call ceiling applied
pub(crate) fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AnalystError::Config(format!("failed to build HTTP client: {e}")))
}

/// Pass success responses through; turn anything else into a connectivity error
pub(crate) async fn ensure_success(provider: Provider, response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(ConnectivityError::from_status(provider, status.as_u16(), body).into())
}

pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}
