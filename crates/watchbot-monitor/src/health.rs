//! Health check endpoint.

use std::collections::BTreeMap;
use std::time::Instant;

use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::snapshot::StatusSnapshot;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: HealthStatus,
    pub version: String,
    pub uptime_secs: u64,
    /// When the last periodic cycle finished, if any has run yet.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_check: Option<String>,
    /// Per-target statuses keyed by target name.
    pub components: BTreeMap<String, ComponentHealth>,
}

/// Health status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Degraded,
    Unhealthy,
}

/// Component health.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Reports the last known state of the monitored targets.
pub struct HealthEndpoint {
    version: String,
    start_time: Instant,
}

impl HealthEndpoint {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            start_time: Instant::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Healthy when every target is up (or nothing has been checked yet),
    /// degraded when some are down, unhealthy when all are down.
    pub fn check(&self, snapshot: Option<&StatusSnapshot>) -> HealthResponse {
        let mut components = BTreeMap::new();
        let mut status = HealthStatus::Healthy;

        if let Some(snapshot) = snapshot {
            for entry in snapshot.iter() {
                let component = if entry.healthy {
                    ComponentHealth {
                        status: HealthStatus::Healthy,
                        details: None,
                    }
                } else {
                    ComponentHealth {
                        status: HealthStatus::Unhealthy,
                        details: Some(format!("{} is not responding", entry.display_name)),
                    }
                };
                components.insert(entry.name.clone(), component);
            }

            let down = snapshot.unhealthy_count();
            if down > 0 {
                status = if down == snapshot.len() {
                    HealthStatus::Unhealthy
                } else {
                    HealthStatus::Degraded
                };
            }
        }

        HealthResponse {
            status,
            version: self.version.clone(),
            uptime_secs: self.uptime_secs(),
            last_check: snapshot.map(|s| s.taken_at().to_rfc3339()),
            components,
        }
    }

    /// Axum handler body for `/health`.
    pub fn handler(&self, snapshot: Option<&StatusSnapshot>) -> (StatusCode, Json<HealthResponse>) {
        let response = self.check(snapshot);
        let status_code = match response.status {
            HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
            HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        };

        (status_code, Json(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_endpoint_new() {
        let endpoint = HealthEndpoint::new("1.0.0");
        assert!(endpoint.uptime_secs() < 1);
    }

    #[test]
    fn test_no_snapshot_yet_is_healthy() {
        let response = HealthEndpoint::new("1.0.0").check(None);
        assert_eq!(response.status, HealthStatus::Healthy);
        assert!(response.components.is_empty());
        assert!(response.last_check.is_none());
    }

    #[test]
    fn test_all_up_is_healthy() {
        let snapshot = StatusSnapshot::from_pairs([("site", true), ("api", true)]);
        let response = HealthEndpoint::new("1.0.0").check(Some(&snapshot));
        assert_eq!(response.status, HealthStatus::Healthy);
        assert_eq!(response.components.len(), 2);
        assert!(response.last_check.is_some());
    }

    #[test]
    fn test_some_down_is_degraded() {
        let snapshot = StatusSnapshot::from_pairs([("site", true), ("api", false)]);
        let response = HealthEndpoint::new("1.0.0").check(Some(&snapshot));

        assert_eq!(response.status, HealthStatus::Degraded);
        let api = &response.components["api"];
        assert_eq!(api.status, HealthStatus::Unhealthy);
        assert_eq!(api.details.as_deref(), Some("Api is not responding"));
    }

    #[test]
    fn test_all_down_is_unhealthy() {
        let snapshot = StatusSnapshot::from_pairs([("site", false), ("api", false)]);
        let response = HealthEndpoint::new("1.0.0").check(Some(&snapshot));
        assert_eq!(response.status, HealthStatus::Unhealthy);
    }

    #[test]
    fn test_handler_status_codes() {
        let endpoint = HealthEndpoint::new("1.0.0");
        let degraded = StatusSnapshot::from_pairs([("site", true), ("api", false)]);
        let down = StatusSnapshot::from_pairs([("site", false)]);

        assert_eq!(endpoint.handler(Some(&degraded)).0, StatusCode::OK);
        assert_eq!(endpoint.handler(Some(&down)).0, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_response_serialization() {
        let snapshot = StatusSnapshot::from_pairs([("site", true)]);
        let response = HealthEndpoint::new("0.3.0").check(Some(&snapshot));
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["status"], "healthy");
        assert_eq!(json["version"], "0.3.0");
        assert_eq!(json["components"]["site"]["status"], "healthy");
        assert!(json["components"]["site"].get("details").is_none());
    }
}
