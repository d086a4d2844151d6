//! Status snapshots.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::target::title_case;

/// Health of one target within a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetStatus {
    pub name: String,
    pub display_name: String,
    pub healthy: bool,
}

/// Result of one aggregation cycle: one entry per registered target, in
/// registration order. Never mutated once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    entries: Vec<TargetStatus>,
    taken_at: DateTime<Utc>,
}

impl StatusSnapshot {
    pub fn new(entries: Vec<TargetStatus>) -> Self {
        Self {
            entries,
            taken_at: Utc::now(),
        }
    }

    /// Build from `(name, healthy)` pairs with title-cased display names.
    pub fn from_pairs<I, S>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (S, bool)>,
        S: Into<String>,
    {
        let entries = pairs
            .into_iter()
            .map(|(name, healthy)| {
                let name = name.into();
                TargetStatus {
                    display_name: title_case(&name),
                    name,
                    healthy,
                }
            })
            .collect();
        Self::new(entries)
    }

    pub fn entries(&self) -> &[TargetStatus] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &TargetStatus> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn taken_at(&self) -> DateTime<Utc> {
        self.taken_at
    }

    /// Health of the named target, if it is part of the snapshot.
    pub fn get(&self, name: &str) -> Option<bool> {
        self.entries.iter().find(|e| e.name == name).map(|e| e.healthy)
    }

    /// True when every target is healthy (vacuously true when empty).
    pub fn all_healthy(&self) -> bool {
        self.entries.iter().all(|e| e.healthy)
    }

    pub fn any_unhealthy(&self) -> bool {
        !self.all_healthy()
    }

    pub fn unhealthy_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.healthy).count()
    }

    /// Names of unhealthy targets, in snapshot order.
    pub fn unhealthy_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|e| !e.healthy)
            .map(|e| e.name.as_str())
            .collect()
    }
}
