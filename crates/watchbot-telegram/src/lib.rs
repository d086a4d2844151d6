//! # Watchbot Telegram
//!
//! Telegram Bot API transport for watchbot: message delivery to
//! subscribers, long-polling for updates and the `/status`, `/info` and
//! `/chatid` commands.

mod client;
mod command;
mod error;
mod handler;
mod poller;
mod types;

pub use client::TelegramClient;
pub use command::BotCommand;
pub use error::TelegramError;
pub use handler::{CommandHandler, MonitorCommands};
pub use poller::UpdatePoller;
pub use types::{ApiResponse, Chat, Message, Update, User};
