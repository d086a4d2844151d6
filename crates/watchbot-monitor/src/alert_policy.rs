//! Edge-triggered outage alerting.
//!
//! Two states, `Ok` and `Alerted`. The only transition that fires is
//! `Ok -> Alerted`, taken when a snapshot has at least one unhealthy target.
//! Staying down is silent, and so is recovering; a full recovery re-arms the
//! policy for the next outage.

#[cfg(test)]
#[path = "alert_policy_tests.rs"]
mod tests;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::snapshot::StatusSnapshot;

/// Alerting phase derived from [`AlertState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertPhase {
    Ok,
    Alerted,
}

/// Alert suppression state. In-memory only; a restart starts from `Ok`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertState {
    pub last_notified_unhealthy: bool,
}

impl AlertState {
    pub fn phase(&self) -> AlertPhase {
        if self.last_notified_unhealthy {
            AlertPhase::Alerted
        } else {
            AlertPhase::Ok
        }
    }
}

/// Fired once per outage.
#[derive(Debug, Clone)]
pub struct AlertEvent {
    pub snapshot: StatusSnapshot,
    pub raised_at: DateTime<Utc>,
}

impl AlertEvent {
    /// Names of the targets that were down when the alert fired.
    pub fn unhealthy_targets(&self) -> Vec<&str> {
        self.snapshot.unhealthy_names()
    }
}

/// Decides when an outage notification is due.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlertPolicy;

impl AlertPolicy {
    pub fn new() -> Self {
        Self
    }

    /// Notify iff at least one target is unhealthy and no alert is
    /// outstanding. An all-healthy snapshot resets the state.
    pub fn evaluate(&self, snapshot: &StatusSnapshot, state: &mut AlertState) -> Option<AlertEvent> {
        if snapshot.all_healthy() {
            if state.last_notified_unhealthy {
                info!("All targets healthy again, alerting re-armed");
            }
            state.last_notified_unhealthy = false;
            return None;
        }

        if state.last_notified_unhealthy {
            debug!(
                "Still unhealthy ({:?}), alert already sent",
                snapshot.unhealthy_names()
            );
            return None;
        }

        state.last_notified_unhealthy = true;
        Some(AlertEvent {
            snapshot: snapshot.clone(),
            raised_at: Utc::now(),
        })
    }
}
