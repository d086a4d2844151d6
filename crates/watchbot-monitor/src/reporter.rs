//! Human-readable rendering of snapshots, alerts and system info.

#[cfg(test)]
#[path = "reporter_tests.rs"]
mod tests;

use serde_json::Value;

use crate::alert_policy::AlertEvent;
use crate::snapshot::StatusSnapshot;
use crate::system_info::{SystemInfo, SystemInfoError};

pub const HEALTHY_MARKER: &str = "\u{1F7E2}";
pub const UNHEALTHY_MARKER: &str = "\u{1F534}";
const WARNING_MARKER: &str = "\u{26A0}\u{FE0F}";

/// Formats plain-text messages.
#[derive(Debug, Clone)]
pub struct Reporter {
    title: String,
    alert_title: String,
    healthy_marker: String,
    unhealthy_marker: String,
}

impl Default for Reporter {
    fn default() -> Self {
        Self::new("Status", "Alert")
    }
}

impl Reporter {
    pub fn new(title: impl Into<String>, alert_title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            alert_title: alert_title.into(),
            healthy_marker: HEALTHY_MARKER.to_string(),
            unhealthy_marker: UNHEALTHY_MARKER.to_string(),
        }
    }

    pub fn with_markers(mut self, healthy: impl Into<String>, unhealthy: impl Into<String>) -> Self {
        self.healthy_marker = healthy.into();
        self.unhealthy_marker = unhealthy.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn alert_title(&self) -> &str {
        &self.alert_title
    }

    /// Title line followed by one `"<marker> \t <name>"` line per target, in
    /// snapshot order.
    pub fn format_snapshot(&self, snapshot: &StatusSnapshot) -> String {
        let mut out = format!("{}:\n", self.title);
        out.push_str(&self.status_lines(snapshot));
        out
    }

    pub fn format_alert(&self, event: &AlertEvent) -> String {
        let snapshot = &event.snapshot;
        let mut out = format!(
            "{} {}: {} of {} targets down\n",
            WARNING_MARKER,
            self.alert_title,
            snapshot.unhealthy_count(),
            snapshot.len()
        );
        out.push_str(&self.status_lines(snapshot));
        out
    }

    /// Nested mappings become a `"<key>:"` header with indented
    /// `"  <subkey>: <value>"` lines; scalars render inline. On failure only
    /// the error is reported.
    pub fn format_system_info(&self, result: &Result<SystemInfo, SystemInfoError>) -> String {
        let info = match result {
            Ok(info) => info,
            Err(e) => return format!("Unable to fetch system info: {}", e),
        };

        let mut lines = vec!["System info:".to_string()];
        for (key, value) in &info.data {
            match value {
                Value::Object(fields) => {
                    lines.push(format!("{}:", key));
                    for (subkey, subvalue) in fields {
                        lines.push(format!("  {}: {}", subkey, render_value(subvalue)));
                    }
                }
                other => lines.push(format!("{}: {}", key, render_value(other))),
            }
        }

        lines.join("\n")
    }

    fn status_lines(&self, snapshot: &StatusSnapshot) -> String {
        snapshot
            .iter()
            .map(|entry| {
                let marker = if entry.healthy {
                    &self.healthy_marker
                } else {
                    &self.unhealthy_marker
                };
                format!("{} \t {}", marker, entry.display_name)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

// Strings without quotes, everything else as compact JSON.
fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}
