//! Periodic and on-demand status checks.
//!
//! The periodic cycle is the only path that feeds [`AlertPolicy`]; on-demand
//! checks run the aggregator and hand the snapshot back without touching the
//! alert state.

#[cfg(test)]
#[path = "scheduler_tests.rs"]
mod tests;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::aggregator::StatusAggregator;
use crate::alert_policy::{AlertEvent, AlertPolicy, AlertState};
use crate::metrics::{
    ALERTS_TOTAL, CYCLES_TOTAL, DELIVERY_FAILURES_TOTAL, MetricsRegistry, PROBE_FAILURES_TOTAL,
    TARGETS_UNHEALTHY,
};
use crate::notifier::{DeliveryReport, Notifier};
use crate::reporter::Reporter;
use crate::snapshot::StatusSnapshot;

/// Default time between periodic cycles.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(300);

/// Bounds applied to the configured interval.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);
pub const MAX_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// What one periodic cycle did.
#[derive(Debug)]
pub struct CycleOutcome {
    pub snapshot: StatusSnapshot,
    pub alert: Option<AlertEvent>,
    /// Present only when an alert was raised.
    pub delivery: Option<DeliveryReport>,
}

/// Drives the aggregator on a fixed interval and on request.
pub struct Scheduler {
    aggregator: Arc<StatusAggregator>,
    policy: AlertPolicy,
    state: Mutex<AlertState>,
    reporter: Arc<Reporter>,
    notifier: Notifier,
    subscribers: Vec<String>,
    interval: Duration,
    metrics: Arc<MetricsRegistry>,
    last_snapshot: RwLock<Option<StatusSnapshot>>,
    cancel: Mutex<Option<CancellationToken>>,
}

impl Scheduler {
    pub fn new(
        aggregator: Arc<StatusAggregator>,
        policy: AlertPolicy,
        notifier: Notifier,
        subscribers: Vec<String>,
        interval: Duration,
    ) -> Self {
        let clamped = interval.clamp(MIN_INTERVAL, MAX_INTERVAL);
        if clamped != interval {
            warn!("Check interval {:?} out of range, using {:?}", interval, clamped);
        }

        Self {
            aggregator,
            policy,
            state: Mutex::new(AlertState::default()),
            reporter: Arc::new(Reporter::default()),
            notifier,
            subscribers,
            interval: clamped,
            metrics: Arc::new(MetricsRegistry::new()),
            last_snapshot: RwLock::new(None),
            cancel: Mutex::new(None),
        }
    }

    pub fn with_reporter(mut self, reporter: Arc<Reporter>) -> Self {
        self.reporter = reporter;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn subscribers(&self) -> &[String] {
        &self.subscribers
    }

    pub fn reporter(&self) -> &Arc<Reporter> {
        &self.reporter
    }

    pub fn alert_state(&self) -> AlertState {
        *self.state.lock()
    }

    /// Snapshot from the most recent periodic cycle.
    pub fn last_snapshot(&self) -> Option<StatusSnapshot> {
        self.last_snapshot.read().clone()
    }

    /// Spawn the periodic loop. The first cycle runs one full interval after
    /// start. Calling `start` again replaces the previous loop.
    pub fn start(self: &Arc<Self>) -> JoinHandle<()> {
        let token = CancellationToken::new();
        if let Some(previous) = self.cancel.lock().replace(token.clone()) {
            warn!("Scheduler already running, restarting");
            previous.cancel();
        }

        let scheduler = Arc::clone(self);
        tokio::spawn(async move {
            // Cancels the token however the loop ends, so a panicking cycle
            // is not reported as running.
            let _running = token.clone().drop_guard();
            let period = scheduler.interval;
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                "Scheduler started: {} target(s) every {:?}, {} subscriber(s)",
                scheduler.aggregator.targets().len(),
                period,
                scheduler.subscribers.len()
            );

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        info!("Scheduler stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let outcome = scheduler.run_cycle().await;
                        debug!(
                            "Cycle done: {}/{} unhealthy, alert={}",
                            outcome.snapshot.unhealthy_count(),
                            outcome.snapshot.len(),
                            outcome.alert.is_some()
                        );
                    }
                }
            }
        })
    }

    /// Cancel the periodic loop. A cycle already in flight completes.
    pub fn stop(&self) {
        if let Some(token) = self.cancel.lock().take() {
            token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel
            .lock()
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// One periodic cycle: aggregate, evaluate the alert policy and fan the
    /// alert out to every subscriber when one is raised.
    pub async fn run_cycle(&self) -> CycleOutcome {
        let snapshot = self.aggregator.run().await;

        let alert = {
            let mut state = self.state.lock();
            self.policy.evaluate(&snapshot, &mut state)
        };

        let down = snapshot.unhealthy_count() as u64;
        self.metrics.inc(CYCLES_TOTAL);
        self.metrics.add(PROBE_FAILURES_TOTAL, down);
        self.metrics.set(TARGETS_UNHEALTHY, down);
        *self.last_snapshot.write() = Some(snapshot.clone());

        let delivery = match alert {
            Some(ref event) => {
                warn!("Targets down: {:?}", event.unhealthy_targets());
                self.metrics.inc(ALERTS_TOTAL);

                let text = self.reporter.format_alert(event);
                let report = self.notifier.broadcast(&self.subscribers, &text).await;
                self.metrics
                    .add(DELIVERY_FAILURES_TOTAL, report.failed.len() as u64);
                info!(
                    "Alert delivered to {}/{} subscriber(s)",
                    report.delivered,
                    report.attempted()
                );
                Some(report)
            }
            None => None,
        };

        CycleOutcome {
            snapshot,
            alert,
            delivery,
        }
    }

    /// On-demand check. Never reads or writes the alert state.
    pub async fn check_now(&self) -> StatusSnapshot {
        self.aggregator.run().await
    }
}
