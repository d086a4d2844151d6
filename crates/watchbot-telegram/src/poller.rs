//! Long-polling loop for incoming commands.

#[cfg(test)]
#[path = "poller_tests.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::TelegramClient;
use crate::command::BotCommand;
use crate::error::TelegramError;
use crate::handler::CommandHandler;
use crate::types::Update;

/// Back-off after a failed poll.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fetches updates, dispatches commands and replies to the originating chat.
pub struct UpdatePoller {
    client: Arc<TelegramClient>,
    handler: Arc<dyn CommandHandler>,
    poll_timeout_secs: u64,
    retry_delay: Duration,
}

impl UpdatePoller {
    pub fn new(client: Arc<TelegramClient>, handler: Arc<dyn CommandHandler>, poll_timeout_secs: u64) -> Self {
        Self {
            client,
            handler,
            poll_timeout_secs,
            retry_delay: DEFAULT_RETRY_DELAY,
        }
    }

    pub fn with_retry_delay(mut self, delay: Duration) -> Self {
        self.retry_delay = delay;
        self
    }

    /// Poll until cancelled. Poll failures are logged and retried after the
    /// back-off; they never end the loop.
    pub async fn run(&self, cancel: CancellationToken) {
        let mut offset = 0;
        info!("Polling for bot commands");

        loop {
            let polled = tokio::select! {
                _ = cancel.cancelled() => break,
                polled = self.poll_once(offset) => polled,
            };

            match polled {
                Ok(next) => offset = next,
                Err(e) => {
                    warn!("Polling for updates failed: {}; retrying in {:?}", e, self.retry_delay);
                    tokio::select! {
                        _ = cancel.cancelled() => break,
                        _ = tokio::time::sleep(self.retry_delay) => {}
                    }
                }
            }
        }

        info!("Command polling stopped");
    }

    /// Fetch one batch and handle it. Returns the offset for the next poll,
    /// which is past every update in the batch whether or not it held a
    /// command.
    pub async fn poll_once(&self, offset: i64) -> Result<i64, TelegramError> {
        let updates = self.client.get_updates(offset, self.poll_timeout_secs).await?;

        let mut next = offset;
        for update in &updates {
            next = next.max(update.update_id + 1);
            self.dispatch(update).await;
        }

        Ok(next)
    }

    async fn dispatch(&self, update: &Update) {
        let Some(message) = update.message.as_ref() else {
            return;
        };
        let Some(command) = message.text.as_deref().and_then(BotCommand::parse) else {
            debug!("Ignoring non-command update {}", update.update_id);
            return;
        };

        let chat_id = message.chat.id;
        let reply = self.handler.handle(command, chat_id).await;
        if let Err(e) = self.client.send_message(&chat_id.to_string(), &reply).await {
            error!("Failed to reply to /{} in chat {}: {}", command.name(), chat_id, e);
        }
    }
}
