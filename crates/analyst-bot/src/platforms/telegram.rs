//! Telegram Bot API client
//!
//! Implements [`ChatSurface`] on top of `sendMessage`, `sendPhoto`,
//! `editMessageText` and `deleteMessage`, plus the long-polling `getUpdates`
//! call the host loop needs. Every text goes out with `parse_mode=HTML`.

use crate::error::{AnalystError, Result};
use crate::interface::{ChatId, ChatSurface, MessageId};
use crate::model::ChartImage;
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, instrument};

const PARSE_MODE: &str = "HTML";

/// Added on top of the long-poll timeout so the HTTP call outlives the poll
const POLL_GRACE: Duration = Duration::from_secs(10);

/// Telegram Bot API client
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AnalystError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self::with_client(client, base_url, token))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.base_url.trim_end_matches('/'),
            self.token,
            method
        )
    }

    /// The bot's own account; doubles as a token check at startup
    pub async fn get_me(&self) -> Result<User> {
        self.call("getMe", &json!({})).await
    }

    /// Long-poll for new updates
    ///
    /// `offset` is one past the last `update_id` already handled.
    pub async fn get_updates(&self, offset: Option<i64>, timeout: Duration) -> Result<Vec<Update>> {
        let body = GetUpdates {
            offset,
            timeout: timeout.as_secs(),
            allowed_updates: &["message"],
        };
        let request = self
            .client
            .post(self.method_url("getUpdates"))
            .timeout(timeout + POLL_GRACE)
            .json(&body);
        send("getUpdates", request).await
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: &impl Serialize) -> Result<T> {
        let request = self.client.post(self.method_url(method)).json(body);
        send(method, request).await
    }
}

/// Send a Bot API request and unwrap its `{ok, result}` envelope
async fn send<T: DeserializeOwned>(method: &str, request: RequestBuilder) -> Result<T> {
    // The URL carries the bot token
    let response = request
        .send()
        .await
        .map_err(|e| delivery_error(method, &e.without_url().to_string()))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| delivery_error(method, &e.without_url().to_string()))?;

    match serde_json::from_str::<ApiResponse<T>>(&body) {
        Ok(ApiResponse {
            ok: true,
            result: Some(result),
            ..
        }) => Ok(result),
        Ok(reply) => Err(delivery_error(
            method,
            reply
                .description
                .as_deref()
                .unwrap_or("request was not successful"),
        )),
        Err(_) if !status.is_success() => {
            Err(delivery_error(method, &format!("HTTP {}", status.as_u16())))
        }
        Err(e) => Err(delivery_error(method, &format!("invalid response body: {e}"))),
    }
}

fn delivery_error(method: &str, reason: &str) -> AnalystError {
    AnalystError::Delivery(format!("Telegram {method} failed: {reason}"))
}

#[async_trait]
impl ChatSurface for TelegramClient {
    #[instrument(skip_all, fields(chat = %chat))]
    async fn send_text(&self, chat: ChatId, text: &str) -> Result<MessageId> {
        let sent: SentMessage = self
            .call(
                "sendMessage",
                &json!({ "chat_id": chat, "text": text, "parse_mode": PARSE_MODE }),
            )
            .await?;
        debug!(message = %sent.message_id, "text sent");
        Ok(sent.message_id)
    }

    #[instrument(skip_all, fields(chat = %chat, bytes = image.len()))]
    async fn send_image(&self, chat: ChatId, image: &ChartImage, caption: &str) -> Result<MessageId> {
        let photo = Part::bytes(image.bytes.clone())
            .file_name(image.file_name())
            .mime_str(&image.content_type)
            .map_err(|e| delivery_error("sendPhoto", &e.without_url().to_string()))?;
        let form = Form::new()
            .text("chat_id", chat.to_string())
            .text("caption", caption.to_string())
            .text("parse_mode", PARSE_MODE)
            .part("photo", photo);

        let request = self.client.post(self.method_url("sendPhoto")).multipart(form);
        let sent: SentMessage = send("sendPhoto", request).await?;
        debug!(message = %sent.message_id, "image sent");
        Ok(sent.message_id)
    }

    #[instrument(skip_all, fields(chat = %chat, message = %message))]
    async fn edit_text(&self, chat: ChatId, message: MessageId, text: &str) -> Result<()> {
        // Result is the edited message, or `true` for inline messages
        let _: serde_json::Value = self
            .call(
                "editMessageText",
                &json!({
                    "chat_id": chat,
                    "message_id": message,
                    "text": text,
                    "parse_mode": PARSE_MODE,
                }),
            )
            .await?;
        Ok(())
    }

    #[instrument(skip_all, fields(chat = %chat, message = %message))]
    async fn delete_message(&self, chat: ChatId, message: MessageId) -> Result<()> {
        let _: bool = self
            .call(
                "deleteMessage",
                &json!({ "chat_id": chat, "message_id": message }),
            )
            .await?;
        Ok(())
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Serialize)]
struct GetUpdates {
    #[serde(skip_serializing_if = "Option::is_none")]
    offset: Option<i64>,
    timeout: u64,
    allowed_updates: &'static [&'static str],
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    message_id: MessageId,
}

/// Incoming update from `getUpdates`
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    /// Absent for update kinds other than new messages
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub message_id: MessageId,
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<User>,
    /// Absent for photos, stickers and other non-text messages
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: ChatId,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}
