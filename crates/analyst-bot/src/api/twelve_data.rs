//! Twelve Data quote client

use super::{QuoteProvider, ensure_success, http_client, join_url};
use crate::error::{ConnectivityError, DomainError, Provider, Result};
use crate::model::{MarketSnapshot, Ticker};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Error object Twelve Data sends with a 200 status
#[derive(Debug, Default, Deserialize)]
struct ErrorNotice {
    #[serde(default)]
    code: Option<u16>,
    #[serde(default)]
    message: Option<String>,
}

/// Twelve Data API client
#[derive(Debug, Clone)]
pub struct TwelveDataClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TwelveDataClient {
    /// Create a client with its own connection pool and timeout
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self::with_client(http_client(timeout)?, base_url, api_key))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }
}

#[async_trait]
impl QuoteProvider for TwelveDataClient {
    #[instrument(skip_all, fields(ticker = %ticker))]
    async fn fetch_quote(&self, ticker: &Ticker) -> Result<MarketSnapshot> {
        let response = self
            .client
            .get(join_url(&self.base_url, "quote"))
            .query(&[("symbol", ticker.as_str()), ("apikey", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| ConnectivityError::from_transport(Provider::TwelveData, e))?;

        let response = ensure_success(Provider::TwelveData, response).await?;
        let body = response
            .text()
            .await
            .map_err(|e| ConnectivityError::from_transport(Provider::TwelveData, e))?;

        let snapshot: MarketSnapshot = serde_json::from_str(&body)
            .map_err(|e| ConnectivityError::malformed(Provider::TwelveData, &e, body.clone()))?;

        // Unknown symbols, bad keys and rate limits all come back as 200
        // with an error object and no exchange
        if !snapshot.has_exchange() {
            let notice: ErrorNotice = serde_json::from_str(&body).unwrap_or_default();
            warn!(
                code = notice.code,
                message = notice.message.as_deref(),
                "quote has no exchange, treating ticker as unresolved"
            );
            return Err(DomainError::TickerNotFound {
                ticker: ticker.to_string(),
                message: notice.message.filter(|m| !m.trim().is_empty()),
            }
            .into());
        }

        debug!(exchange = snapshot.exchange.as_deref(), price = snapshot.close.as_deref(), "quote fetched");
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AnalystError;
    use serde_json::json;
    use tokio_test::{assert_err, assert_ok};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> TwelveDataClient {
        TwelveDataClient::new(server.uri(), "td-key", Duration::from_secs(5)).unwrap()
    }

    fn ticker(symbol: &str) -> Ticker {
        Ticker::parse(symbol).unwrap()
    }

    #[tokio::test]
    async fn test_fetch_quote_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", "AAPL"))
            .and(query_param("apikey", "td-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "symbol": "AAPL",
                "name": "Apple Inc",
                "exchange": "NASDAQ",
                "currency": "USD",
                "close": "150.0",
                "fifty_two_week": { "low": "120.5", "high": "199.6" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let snapshot = assert_ok!(client_for(&server).fetch_quote(&ticker("AAPL")).await);
        assert_eq!(snapshot.name.as_deref(), Some("Apple Inc"));
        assert_eq!(snapshot.close.as_deref(), Some("150.0"));
        assert_eq!(snapshot.week_52_high(), Some("199.6"));
    }

    #[tokio::test]
    async fn test_missing_exchange_is_domain_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 404,
                "message": "**symbol** not found: ZZZZ",
                "status": "error"
            })))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).fetch_quote(&ticker("ZZZZ")).await);

        assert!(matches!(
            err,
            AnalystError::Domain(DomainError::TickerNotFound { ref ticker, ref message })
                if ticker == "ZZZZ" && message.as_deref() == Some("**symbol** not found: ZZZZ")
        ));
    }

    #[tokio::test]
    async fn test_rejected_key_message_reaches_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "code": 401,
                "message": "**apikey** parameter is incorrect or not specified.",
                "status": "error"
            })))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).fetch_quote(&ticker("AAPL")).await);

        assert!(err.is_domain());
        assert!(
            err.detail()
                .ends_with("(Provider said: **apikey** parameter is incorrect or not specified.)")
        );
    }

    #[tokio::test]
    async fn test_missing_exchange_without_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/quote"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "symbol": "ZZZZ" })))
            .mount(&server)
            .await;

        let err = assert_err!(client_for(&server).fetch_quote(&ticker("ZZZZ")).await);

        assert_eq!(
            err.to_string(),
            "Could not determine the stock exchange for 'ZZZZ'. Please check the ticker."
        );
    }

    #[tokio::test]
    async fn test_http_error_is_connectivity_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_quote(&ticker("AAPL"))
            .await
            .unwrap_err();

        match err {
            AnalystError::Connectivity(inner) => {
                assert_eq!(inner.provider, Provider::TwelveData);
                assert_eq!(inner.status, Some(500));
                assert_eq!(inner.body.as_deref(), Some("upstream down"));
            }
            other => panic!("Expected Connectivity, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_body_is_connectivity_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .fetch_quote(&ticker("AAPL"))
            .await
            .unwrap_err();
        assert!(err.is_connectivity());
        assert!(err.detail().contains("<html>oops</html>"));
    }

    #[tokio::test]
    async fn test_timeout_is_connectivity_error_without_key() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "exchange": "NASDAQ" }))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client =
            TwelveDataClient::new(server.uri(), "td-key", Duration::from_millis(200)).unwrap();
        let err = client.fetch_quote(&ticker("AAPL")).await.unwrap_err();

        match &err {
            AnalystError::Connectivity(inner) => {
                assert_eq!(inner.status, None);
                assert_eq!(inner.reason, "request timed out");
            }
            other => panic!("Expected Connectivity, got {other:?}"),
        }
        assert!(!err.detail().contains("td-key"));
    }
}
