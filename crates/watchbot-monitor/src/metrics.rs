//! Prometheus-style metrics for the check cycle.
//!
//! The metric set is fixed: every name in [`WATCHBOT_METRICS`] exists from
//! construction, and updates to any other name are dropped.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use axum::http::StatusCode;

pub const CYCLES_TOTAL: &str = "watchbot_cycles_total";
pub const ALERTS_TOTAL: &str = "watchbot_alerts_total";
pub const DELIVERY_FAILURES_TOTAL: &str = "watchbot_delivery_failures_total";
pub const PROBE_FAILURES_TOTAL: &str = "watchbot_probe_failures_total";
pub const TARGETS_UNHEALTHY: &str = "watchbot_targets_unhealthy";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Counter,
    Gauge,
}

impl MetricKind {
    fn as_str(self) -> &'static str {
        match self {
            MetricKind::Counter => "counter",
            MetricKind::Gauge => "gauge",
        }
    }
}

/// Name, kind and help text of every exported metric.
pub const WATCHBOT_METRICS: [(&str, MetricKind, &str); 5] = [
    (CYCLES_TOTAL, MetricKind::Counter, "Completed periodic check cycles"),
    (ALERTS_TOTAL, MetricKind::Counter, "Outage alerts raised"),
    (
        DELIVERY_FAILURES_TOTAL,
        MetricKind::Counter,
        "Messages that could not be delivered",
    ),
    (
        PROBE_FAILURES_TOTAL,
        MetricKind::Counter,
        "Probe checks that reported unhealthy",
    ),
    (
        TARGETS_UNHEALTHY,
        MetricKind::Gauge,
        "Targets unhealthy in the last cycle",
    ),
];

struct Metric {
    kind: MetricKind,
    help: &'static str,
    value: AtomicU64,
}

/// Cycle metrics, keyed by name so the export is sorted.
pub struct MetricsRegistry {
    metrics: BTreeMap<&'static str, Metric>,
}

impl MetricsRegistry {
    pub fn new() -> Self {
        let metrics = WATCHBOT_METRICS
            .iter()
            .map(|&(name, kind, help)| {
                (
                    name,
                    Metric {
                        kind,
                        help,
                        value: AtomicU64::new(0),
                    },
                )
            })
            .collect();
        Self { metrics }
    }

    fn metric(&self, name: &str, kind: MetricKind) -> Option<&Metric> {
        self.metrics.get(name).filter(|m| m.kind == kind)
    }

    pub fn inc(&self, counter: &str) {
        self.add(counter, 1);
    }

    /// Add to a counter. Gauges and unknown names are left alone.
    pub fn add(&self, counter: &str, delta: u64) {
        if let Some(metric) = self.metric(counter, MetricKind::Counter) {
            metric.value.fetch_add(delta, Ordering::Relaxed);
        }
    }

    /// Set a gauge. Counters and unknown names are left alone.
    pub fn set(&self, gauge: &str, value: u64) {
        if let Some(metric) = self.metric(gauge, MetricKind::Gauge) {
            metric.value.store(value, Ordering::Relaxed);
        }
    }

    pub fn value(&self, name: &str) -> Option<u64> {
        self.metrics
            .get(name)
            .map(|m| m.value.load(Ordering::Relaxed))
    }

    /// Prometheus text exposition, sorted by metric name.
    pub fn render(&self) -> String {
        self.metrics
            .iter()
            .map(|(name, m)| {
                format!(
                    "# HELP {name} {}\n# TYPE {name} {}\n{name} {}\n",
                    m.help,
                    m.kind.as_str(),
                    m.value.load(Ordering::Relaxed)
                )
            })
            .collect()
    }

    /// Axum handler body for `/metrics`.
    pub fn handler(&self) -> (StatusCode, [(&'static str, &'static str); 1], String) {
        (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            self.render(),
        )
    }
}

impl Default for MetricsRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_metrics_start_at_zero() {
        let registry = MetricsRegistry::new();
        for (name, _, _) in WATCHBOT_METRICS {
            assert_eq!(registry.value(name), Some(0), "{name}");
        }
    }

    #[test]
    fn test_counters_accumulate() {
        let registry = MetricsRegistry::new();
        registry.inc(CYCLES_TOTAL);
        registry.add(CYCLES_TOTAL, 2);
        assert_eq!(registry.value(CYCLES_TOTAL), Some(3));
    }

    #[test]
    fn test_gauge_is_overwritten() {
        let registry = MetricsRegistry::new();
        registry.set(TARGETS_UNHEALTHY, 2);
        registry.set(TARGETS_UNHEALTHY, 0);
        assert_eq!(registry.value(TARGETS_UNHEALTHY), Some(0));
    }

    #[test]
    fn test_kind_mismatch_and_unknown_names_are_dropped() {
        let registry = MetricsRegistry::new();
        registry.set(ALERTS_TOTAL, 7);
        registry.add(TARGETS_UNHEALTHY, 7);
        registry.inc("nope");

        assert_eq!(registry.value(ALERTS_TOTAL), Some(0));
        assert_eq!(registry.value(TARGETS_UNHEALTHY), Some(0));
        assert_eq!(registry.value("nope"), None);
    }

    #[test]
    fn test_render_sorted_by_name() {
        let registry = MetricsRegistry::new();
        registry.inc(ALERTS_TOTAL);
        registry.set(TARGETS_UNHEALTHY, 4);

        let output = registry.render();
        assert!(output.starts_with(
            "# HELP watchbot_alerts_total Outage alerts raised\n\
             # TYPE watchbot_alerts_total counter\n\
             watchbot_alerts_total 1\n"
        ));
        assert!(output.ends_with(
            "# TYPE watchbot_targets_unhealthy gauge\nwatchbot_targets_unhealthy 4\n"
        ));

        let names: Vec<_> = output
            .lines()
            .filter(|l| l.starts_with("# TYPE"))
            .map(|l| l.split(' ').nth(2).unwrap_or_default())
            .collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 5);
    }
}
