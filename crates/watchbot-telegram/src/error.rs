//! Telegram transport errors.

use thiserror::Error;

use watchbot_monitor::MonitorError;

/// Telegram transport error types.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// The request did not complete.
    #[error("Telegram request failed: {0}")]
    Request(String),

    /// The Bot API answered `ok: false`.
    #[error("Telegram API error {code}: {description}")]
    Api { code: i64, description: String },

    /// Non-success status without a Bot API error body.
    #[error("Telegram returned HTTP {0}")]
    Status(u16),

    /// The response body could not be decoded.
    #[error("Invalid Telegram response: {0}")]
    Decode(String),
}

impl From<TelegramError> for MonitorError {
    fn from(e: TelegramError) -> Self {
        MonitorError::Delivery(e.to_string())
    }
}
