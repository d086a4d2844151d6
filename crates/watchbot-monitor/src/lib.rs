//! # Watchbot Monitor
//!
//! Target probing and outage alerting.
//!
//! ## Features
//!
//! - Reachability (ICMP with bounded retry) and HTTP 200 probes
//! - Concurrent status aggregation with per-probe timeouts
//! - Edge-triggered alerting with subscriber fan-out
//! - Periodic and on-demand scheduling
//! - Health check endpoint (/health) and Prometheus metrics (/metrics)

pub mod aggregator;
pub mod alert_policy;
pub mod config;
pub mod error;
pub mod health;
pub mod http_probe;
pub mod metrics;
pub mod notifier;
pub mod ping;
pub mod probe;
pub mod reporter;
pub mod scheduler;
pub mod snapshot;
pub mod system_info;
pub mod target;

#[cfg(test)]
mod test_support;

pub use aggregator::StatusAggregator;
pub use alert_policy::{AlertEvent, AlertPhase, AlertPolicy, AlertState};
pub use error::MonitorError;
pub use health::HealthEndpoint;
pub use http_probe::HttpHealthProbe;
pub use metrics::MetricsRegistry;
pub use notifier::{DeliveryReport, LogSink, MessageSink, Notifier};
pub use ping::{NetworkReachabilityProbe, Pinger, SystemPinger};
pub use probe::{Probe, RetryPolicy};
pub use reporter::Reporter;
pub use scheduler::{CycleOutcome, Scheduler};
pub use snapshot::{StatusSnapshot, TargetStatus};
pub use system_info::{SystemInfo, SystemInfoClient, SystemInfoError};
pub use target::Target;
