//! Outbound message delivery to subscribers.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::error::MonitorError;

/// Something that can deliver a text message to a chat.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Sink name, used in logs.
    fn name(&self) -> &str;

    /// Deliver `text` to `chat_id`.
    async fn send(&self, chat_id: &str, text: &str) -> Result<(), MonitorError>;
}

/// Sink that writes messages to the log instead of delivering them.
pub struct LogSink;

#[async_trait]
impl MessageSink for LogSink {
    fn name(&self) -> &str {
        "log"
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<(), MonitorError> {
        info!("[MESSAGE to {}]\n{}", chat_id, text);
        Ok(())
    }
}

/// Outcome of a broadcast.
#[derive(Debug, Default)]
pub struct DeliveryReport {
    pub delivered: usize,
    pub failed: Vec<(String, MonitorError)>,
}

impl DeliveryReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn attempted(&self) -> usize {
        self.delivered + self.failed.len()
    }
}

/// Fans a message out to every subscriber through one sink.
#[derive(Clone)]
pub struct Notifier {
    sink: Arc<dyn MessageSink>,
}

impl Notifier {
    pub fn new(sink: Arc<dyn MessageSink>) -> Self {
        Self { sink }
    }

    pub fn sink_name(&self) -> &str {
        self.sink.name()
    }

    /// Send `text` to each subscriber in turn. A failed delivery is logged
    /// and recorded; the remaining subscribers are still attempted.
    pub async fn broadcast(&self, subscribers: &[String], text: &str) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for chat_id in subscribers {
            match self.sink.send(chat_id, text).await {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    error!("Failed to deliver to {} via {}: {}", chat_id, self.sink.name(), e);
                    report.failed.push((chat_id.clone(), e));
                }
            }
        }

        report
    }
}
