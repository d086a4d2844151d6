//! Bot API client.

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use watchbot_monitor::{MessageSink, MonitorError};

use crate::error::TelegramError;
use crate::types::{ApiResponse, GetUpdatesRequest, Message, SendMessageRequest, Update};

/// Slack added on top of the long-poll timeout for the HTTP client.
const REQUEST_SLACK: Duration = Duration::from_secs(10);

/// Longest text a single `sendMessage` call accepts, in UTF-16 code units.
pub const MAX_MESSAGE_LEN: usize = 4096;

/// Thin client over the Bot API methods watchbot uses.
pub struct TelegramClient {
    base_url: String,
    token: String,
    client: Client,
}

impl TelegramClient {
    /// `poll_timeout` is the longest `getUpdates` long-poll this client
    /// will be asked to perform.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        poll_timeout: Duration,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(poll_timeout.saturating_add(REQUEST_SLACK))
            .build()
            .map_err(|e| TelegramError::Request(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
            client,
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn call<B, T>(&self, method: &str, body: &B) -> Result<T, TelegramError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.method_url(method))
            .json(body)
            .send()
            .await
            .map_err(|e| TelegramError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| TelegramError::Request(e.to_string()))?;

        let envelope: ApiResponse<T> = match serde_json::from_str(&text) {
            Ok(envelope) => envelope,
            Err(_) if !status.is_success() => return Err(TelegramError::Status(status.as_u16())),
            Err(e) => return Err(TelegramError::Decode(e.to_string())),
        };

        if !envelope.ok {
            return Err(TelegramError::Api {
                code: envelope.error_code.unwrap_or_else(|| i64::from(status.as_u16())),
                description: envelope.description.unwrap_or_default(),
            });
        }

        envelope
            .result
            .ok_or_else(|| TelegramError::Decode(format!("{} returned no result", method)))
    }

    /// Send a plain-text message. Text over [`MAX_MESSAGE_LEN`] goes out as
    /// several messages, split on line breaks where possible; the last one
    /// sent is returned.
    pub async fn send_message(&self, chat_id: &str, text: &str) -> Result<Message, TelegramError> {
        let chunks = split_message(text, MAX_MESSAGE_LEN);
        let mut last = None;
        for chunk in &chunks {
            let message: Message = self
                .call("sendMessage", &SendMessageRequest { chat_id, text: chunk })
                .await?;
            debug!("Sent message {} to chat {}", message.message_id, chat_id);
            last = Some(message);
        }
        last.ok_or_else(|| TelegramError::Decode("no message was sent".to_string()))
    }

    /// Long-poll for message updates with `update_id >= offset`.
    pub async fn get_updates(&self, offset: i64, timeout_secs: u64) -> Result<Vec<Update>, TelegramError> {
        self.call(
            "getUpdates",
            &GetUpdatesRequest {
                offset,
                timeout: timeout_secs,
                allowed_updates: &["message"],
            },
        )
        .await
    }
}

#[async_trait]
impl MessageSink for TelegramClient {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<(), MonitorError> {
        self.send_message(chat_id, text).await?;
        Ok(())
    }
}

/// Split `text` into pieces of at most `limit` UTF-16 code units. Lines are
/// kept whole unless a single line is longer than `limit`.
pub(crate) fn split_message(text: &str, limit: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len: usize = line.chars().map(char::len_utf16).sum();
        let separator = usize::from(!current.is_empty());

        if current_len + separator + line_len <= limit {
            if separator == 1 {
                current.push('\n');
            }
            current.push_str(line);
            current_len += separator + line_len;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        for ch in line.chars() {
            let width = ch.len_utf16();
            if current_len + width > limit {
                chunks.push(std::mem::take(&mut current));
                current_len = 0;
            }
            current.push(ch);
            current_len += width;
        }
    }

    if !current.is_empty() || chunks.is_empty() {
        chunks.push(current);
    }
    chunks
}
