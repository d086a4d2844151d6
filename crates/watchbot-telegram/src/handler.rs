//! Command handling.

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use watchbot_monitor::{Reporter, Scheduler, SystemInfoClient};

use crate::command::BotCommand;

/// Produces the reply text for a command.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    async fn handle(&self, command: BotCommand, chat_id: i64) -> String;
}

/// Answers commands from the monitor.
pub struct MonitorCommands {
    scheduler: Arc<Scheduler>,
    reporter: Arc<Reporter>,
    system_info: Option<Arc<SystemInfoClient>>,
}

impl MonitorCommands {
    pub fn new(scheduler: Arc<Scheduler>, reporter: Arc<Reporter>) -> Self {
        Self {
            scheduler,
            reporter,
            system_info: None,
        }
    }

    pub fn with_system_info(mut self, client: Arc<SystemInfoClient>) -> Self {
        self.system_info = Some(client);
        self
    }
}

#[async_trait]
impl CommandHandler for MonitorCommands {
    async fn handle(&self, command: BotCommand, chat_id: i64) -> String {
        info!("/{} requested by chat {}", command.name(), chat_id);

        match command {
            BotCommand::Status => {
                let snapshot = self.scheduler.check_now().await;
                self.reporter.format_snapshot(&snapshot)
            }
            BotCommand::Info => match self.system_info {
                Some(ref client) => {
                    let result = client.fetch().await;
                    self.reporter.format_system_info(&result)
                }
                None => "System info is not configured".to_string(),
            },
            BotCommand::ChatId => format!("Chat ID: {}", chat_id),
        }
    }
}
