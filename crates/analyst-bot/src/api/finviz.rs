//! Finviz chart image client

use super::{ChartProvider, ensure_success, http_client, join_url};
use crate::error::{ConnectivityError, DomainError, Provider, Result};
use crate::model::{ChartImage, Ticker};
use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use std::time::Duration;
use tracing::{debug, instrument};

/// Finviz refuses requests without a browser-like agent
const BROWSER_USER_AGENT: &str = "Mozilla/5.0";
const DEFAULT_CONTENT_TYPE: &str = "image/png";

/// Finviz chart client
#[derive(Debug, Clone)]
pub struct FinvizClient {
    client: Client,
    base_url: String,
}

impl FinvizClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ChartProvider for FinvizClient {
    #[instrument(skip_all, fields(ticker = %ticker))]
    async fn fetch_chart(&self, ticker: &Ticker) -> Result<ChartImage> {
        let response = self
            .client
            .get(join_url(&self.base_url, "chart.ashx"))
            .query(&[("t", ticker.as_str())])
            .header(USER_AGENT, BROWSER_USER_AGENT)
            .send()
            .await
            .map_err(|e| ConnectivityError::from_transport(Provider::Finviz, e))?;

        let response = ensure_success(Provider::Finviz, response).await?;
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_TYPE.to_string());
        let bytes = response
            .bytes()
            .await
            .map_err(|e| ConnectivityError::from_transport(Provider::Finviz, e))?;

        if bytes.is_empty() {
            return Err(DomainError::EmptyChart {
                ticker: ticker.to_string(),
            }
            .into());
        }

        debug!(bytes = bytes.len(), content_type = %content_type, "chart fetched");
        Ok(ChartImage::new(bytes.to_vec(), content_type))
    }
}
