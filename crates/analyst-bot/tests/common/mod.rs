//! Shared wiremock setup for the end-to-end tests

#![allow(dead_code)]

use analyst_bot::{AnalysisPipeline, AnalystConfig, TelegramClient};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "4242:test-token";
pub const PNG_BYTES: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// One fake server per external provider
pub struct Providers {
    pub quotes: MockServer,
    pub charts: MockServer,
    pub llm: MockServer,
    pub telegram: MockServer,
}

impl Providers {
    pub async fn start() -> Self {
        Self {
            quotes: MockServer::start().await,
            charts: MockServer::start().await,
            llm: MockServer::start().await,
            telegram: MockServer::start().await,
        }
    }

    pub fn config(&self) -> AnalystConfig {
        AnalystConfig::builder()
            .telegram_token(TOKEN)
            .twelve_data_api_key("td-key")
            .openrouter_api_key("or-key")
            .model("test/model")
            .request_timeout(Duration::from_secs(5))
            .quote_base_url(self.quotes.uri())
            .chart_base_url(self.charts.uri())
            .openrouter_base_url(self.llm.uri())
            .telegram_base_url(self.telegram.uri())
            .build()
            .unwrap()
    }

    pub fn telegram_client(&self) -> Arc<TelegramClient> {
        let config = self.config();
        Arc::new(
            TelegramClient::new(
                &config.telegram_base_url,
                &config.telegram_token,
                config.request_timeout,
            )
            .unwrap(),
        )
    }

    pub fn pipeline(&self, client: Arc<TelegramClient>) -> AnalysisPipeline {
        AnalysisPipeline::from_config(&self.config(), client).unwrap()
    }

    pub async fn mount_quote(&self, symbol: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path("/quote"))
            .and(query_param("symbol", symbol))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.quotes)
            .await;
    }

    pub async fn mount_chart(&self) {
        Mock::given(method("GET"))
            .and(path("/chart.ashx"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(PNG_BYTES, "image/png"))
            .mount(&self.charts)
            .await;
    }

    pub async fn mount_narrative(&self, text: &str) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": text } }]
            })))
            .mount(&self.llm)
            .await;
    }

    /// Every Bot API method answers with a plausible success
    pub async fn mount_telegram(&self) {
        for (api_method, message_id) in [("sendMessage", 100), ("sendPhoto", 101)] {
            Mock::given(method("POST"))
                .and(path(format!("/bot{TOKEN}/{api_method}")))
                .respond_with(sent(message_id))
                .mount(&self.telegram)
                .await;
        }
        Mock::given(method("POST"))
            .and(path(format!("/bot{TOKEN}/editMessageText")))
            .respond_with(sent(100))
            .mount(&self.telegram)
            .await;
        Mock::given(method("POST"))
            .and(path(format!("/bot{TOKEN}/deleteMessage")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
            .mount(&self.telegram)
            .await;
    }

    /// Bot API methods called so far, in order, with their bodies
    pub async fn telegram_calls(&self) -> Vec<(String, Vec<u8>)> {
        let prefix = format!("/bot{TOKEN}/");
        self.telegram
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| {
                let name = r.url.path().strip_prefix(&prefix)?.to_string();
                (name != "getUpdates").then_some((name, r.body))
            })
            .collect()
    }

    /// Every Bot API method called so far, `getUpdates` included
    pub async fn telegram_methods(&self) -> Vec<String> {
        let prefix = format!("/bot{TOKEN}/");
        self.telegram
            .received_requests()
            .await
            .unwrap_or_default()
            .into_iter()
            .filter_map(|r| r.url.path().strip_prefix(&prefix).map(str::to_owned))
            .collect()
    }

    pub async fn request_count(server: &MockServer) -> usize {
        server.received_requests().await.map_or(0, |r| r.len())
    }
}

fn sent(message_id: i64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": { "message_id": message_id, "chat": { "id": 42 }, "date": 0 }
    }))
}

/// JSON body of a Bot API call
pub fn json_body(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}
