//! Status aggregation across all targets.

#[cfg(test)]
#[path = "aggregator_tests.rs"]
mod tests;

use std::collections::HashSet;
use std::panic::AssertUnwindSafe;
use std::time::Duration;

use futures::future::join_all;
use futures::FutureExt;
use tokio::time::timeout;
use tracing::{debug, warn};

use crate::error::MonitorError;
use crate::snapshot::{StatusSnapshot, TargetStatus};
use crate::target::Target;

/// Runs every registered probe and collects a snapshot.
///
/// Probes run concurrently; the snapshot keeps registration order. A probe
/// that exceeds the timeout or panics counts as unhealthy and never affects
/// the other targets.
#[derive(Debug)]
pub struct StatusAggregator {
    targets: Vec<Target>,
    probe_timeout: Duration,
}

impl StatusAggregator {
    /// Create an aggregator over a fixed, uniquely named target list.
    pub fn new(targets: Vec<Target>, probe_timeout: Duration) -> Result<Self, MonitorError> {
        let mut seen = HashSet::new();
        for target in &targets {
            if !seen.insert(target.name()) {
                return Err(MonitorError::DuplicateTarget(target.name().to_string()));
            }
        }

        Ok(Self {
            targets,
            probe_timeout,
        })
    }

    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    /// Check every target once.
    pub async fn run(&self) -> StatusSnapshot {
        let checks = self.targets.iter().map(|target| self.check_target(target));
        let entries = join_all(checks).await;

        let snapshot = StatusSnapshot::new(entries);
        debug!(
            "Aggregated {} targets, {} unhealthy",
            snapshot.len(),
            snapshot.unhealthy_count()
        );
        snapshot
    }

    async fn check_target(&self, target: &Target) -> TargetStatus {
        let check = AssertUnwindSafe(target.probe().check()).catch_unwind();

        let healthy = match timeout(self.probe_timeout, check).await {
            Ok(Ok(healthy)) => healthy,
            Ok(Err(_)) => {
                warn!("Probe for {} panicked, marking unhealthy", target.name());
                false
            }
            Err(_) => {
                warn!(
                    "Probe for {} timed out after {:?}, marking unhealthy",
                    target.name(),
                    self.probe_timeout
                );
                false
            }
        };

        if !healthy {
            debug!("{} ({}) is unhealthy", target.name(), target.probe().kind());
        }

        TargetStatus {
            name: target.name().to_string(),
            display_name: target.display_name().to_string(),
            healthy,
        }
    }
}
