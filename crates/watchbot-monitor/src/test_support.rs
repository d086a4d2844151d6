//! Stub probes and sinks shared by unit tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::MonitorError;
use crate::notifier::MessageSink;
use crate::probe::Probe;
use crate::target::Target;

/// Probe whose answer can be flipped between cycles.
pub struct SwitchProbe {
    healthy: AtomicBool,
    calls: AtomicU32,
}

impl SwitchProbe {
    pub fn new(healthy: bool) -> Arc<Self> {
        Arc::new(Self {
            healthy: AtomicBool::new(healthy),
            calls: AtomicU32::new(0),
        })
    }

    pub fn set(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for SwitchProbe {
    fn kind(&self) -> &str {
        "stub"
    }

    async fn check(&self) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.healthy.load(Ordering::SeqCst)
    }
}

/// Probe that sleeps before answering healthy.
pub struct SlowProbe(pub Duration);

#[async_trait]
impl Probe for SlowProbe {
    fn kind(&self) -> &str {
        "slow"
    }

    async fn check(&self) -> bool {
        tokio::time::sleep(self.0).await;
        true
    }
}

/// Probe that panics.
pub struct PanickingProbe;

#[async_trait]
impl Probe for PanickingProbe {
    fn kind(&self) -> &str {
        "panic"
    }

    async fn check(&self) -> bool {
        panic!("probe exploded");
    }
}

pub fn target(name: &str, probe: Arc<dyn Probe>) -> Target {
    Target::new(name, probe)
}

/// Sink that records deliveries and fails for selected chats.
#[derive(Default)]
pub struct RecordingSink {
    sent: Mutex<Vec<(String, String)>>,
    failing: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_for(&self, chat_id: &str) {
        self.failing.lock().push(chat_id.to_string());
    }

    pub fn sent(&self) -> Vec<(String, String)> {
        self.sent.lock().clone()
    }
}

#[async_trait]
impl MessageSink for RecordingSink {
    fn name(&self) -> &str {
        "recording"
    }

    async fn send(&self, chat_id: &str, text: &str) -> Result<(), MonitorError> {
        if self.failing.lock().iter().any(|c| c == chat_id) {
            return Err(MonitorError::Delivery(format!("chat {} unavailable", chat_id)));
        }
        self.sent.lock().push((chat_id.to_string(), text.to_string()));
        Ok(())
    }
}
