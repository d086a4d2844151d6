//! Network reachability probe.

#[cfg(test)]
#[path = "ping_tests.rs"]
mod tests;

use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::error::MonitorError;
use crate::probe::{Probe, RetryPolicy};

/// A single reachability attempt against a host.
#[async_trait]
pub trait Pinger: Send + Sync {
    async fn ping(&self, host: &str) -> Result<(), MonitorError>;
}

/// Pinger backed by the system `ping` command (one ICMP echo).
#[derive(Debug, Clone)]
pub struct SystemPinger {
    wait: Duration,
}

impl SystemPinger {
    /// `wait` bounds how long one echo may take to come back.
    pub fn new(wait: Duration) -> Self {
        Self { wait }
    }
}

impl Default for SystemPinger {
    fn default() -> Self {
        Self::new(Duration::from_secs(2))
    }
}

#[async_trait]
impl Pinger for SystemPinger {
    async fn ping(&self, host: &str) -> Result<(), MonitorError> {
        let wait_secs = self.wait.as_secs().max(1);

        let mut cmd = Command::new("ping");
        cmd.arg("-c")
            .arg("1")
            .arg("-W")
            .arg(wait_secs.to_string())
            .arg(host)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true);

        let status = timeout(self.wait + Duration::from_secs(1), cmd.status())
            .await
            .map_err(|_| MonitorError::Unreachable(format!("{}: ping timed out", host)))?
            .map_err(|e| MonitorError::Unreachable(format!("{}: failed to run ping: {}", host, e)))?;

        if status.success() {
            Ok(())
        } else {
            Err(MonitorError::Unreachable(format!(
                "{}: ping exited with {}",
                host,
                status.code().unwrap_or(-1)
            )))
        }
    }
}

/// Reachability probe with bounded retry.
///
/// Healthy as soon as one attempt succeeds; unhealthy only after every
/// attempt allowed by the retry policy has failed.
pub struct NetworkReachabilityProbe {
    host: String,
    pinger: Arc<dyn Pinger>,
    retry: RetryPolicy,
}

impl NetworkReachabilityProbe {
    pub fn new(host: impl Into<String>, pinger: Arc<dyn Pinger>, retry: RetryPolicy) -> Self {
        Self {
            host: host.into(),
            pinger,
            retry,
        }
    }

    /// Probe using the system `ping` command and the default retry policy.
    pub fn system(host: impl Into<String>) -> Self {
        Self::new(host, Arc::new(SystemPinger::default()), RetryPolicy::default())
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        self.retry
    }
}

#[async_trait]
impl Probe for NetworkReachabilityProbe {
    fn kind(&self) -> &str {
        "ping"
    }

    async fn check(&self) -> bool {
        let attempts = self.retry.max_attempts();

        for attempt in 1..=attempts {
            match self.pinger.ping(&self.host).await {
                Ok(()) => {
                    debug!("{} reachable on attempt {}/{}", self.host, attempt, attempts);
                    return true;
                }
                Err(e) => {
                    debug!("Ping attempt {}/{} failed: {}", attempt, attempts, e);
                }
            }

            if attempt < attempts && !self.retry.delay().is_zero() {
                tokio::time::sleep(self.retry.delay()).await;
            }
        }

        debug!("{} unreachable after {} attempts", self.host, attempts);
        false
    }
}
