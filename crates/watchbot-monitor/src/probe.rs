//! Probe trait and retry policy.
//!
//! A probe checks one target and answers healthy or not. Transport
//! problems (timeouts, refused connections, bad status codes, failed
//! processes) are folded into `false` inside the probe; nothing is
//! propagated to the caller.

use std::time::Duration;

use async_trait::async_trait;

/// Health check for a single target.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Short probe kind used in logs (e.g. "ping", "http").
    fn kind(&self) -> &str;

    /// Check the target. Never fails; errors map to `false`.
    async fn check(&self) -> bool;
}

/// Bounded retry policy for probes that tolerate transient failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    delay: Duration,
}

impl RetryPolicy {
    /// Create a policy. `max_attempts` is clamped to at least 1.
    pub fn new(max_attempts: u32, delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            delay,
        }
    }

    /// Policy without any pause between attempts.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO)
    }

    /// Single attempt, no retry.
    pub fn none() -> Self {
        Self::immediate(1)
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}
