//! Configuration schema definitions.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub bot: BotConfig,

    #[serde(default)]
    pub alerts: AlertsConfig,

    #[serde(default)]
    pub probes: ProbesConfig,

    #[serde(default)]
    pub report: ReportConfig,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info: Option<InfoConfig>,

    #[serde(default)]
    pub server: ServerConfig,

    /// Monitored targets, in report order.
    #[serde(default)]
    pub targets: Vec<TargetConfig>,
}

/// Chat bot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot API credential.
    #[serde(default)]
    pub token: String,

    /// Bot API base URL.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Long-poll timeout for fetching updates.
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_url: default_api_url(),
            poll_timeout_secs: default_poll_timeout(),
        }
    }
}

fn default_api_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

/// Alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    /// Chat identifiers that receive outage alerts.
    #[serde(default, deserialize_with = "deserialize_chat_ids")]
    pub subscribers: Vec<String>,

    /// Seconds between periodic checks.
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
}

impl AlertsConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            subscribers: Vec::new(),
            interval_secs: default_interval(),
        }
    }
}

fn default_interval() -> u64 {
    300
}

/// Seconds a single ICMP echo waits for its reply.
pub const PING_ECHO_WAIT_SECS: u64 = 1;

/// Probe tuning shared by all targets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbesConfig {
    /// Upper bound for a single probe, retries included.
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,

    /// Reachability attempts before a host is reported down.
    #[serde(default = "default_ping_attempts")]
    pub ping_attempts: u32,

    /// Pause between reachability attempts.
    #[serde(default = "default_ping_delay")]
    pub ping_delay_secs: u64,
}

impl ProbesConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn ping_delay(&self) -> Duration {
        Duration::from_secs(self.ping_delay_secs)
    }

    /// Seconds a ping target takes when every attempt fails: one echo wait
    /// per attempt plus the pauses between attempts.
    pub fn ping_worst_case_secs(&self) -> u64 {
        let attempts = u64::from(self.ping_attempts.max(1));
        self.ping_delay_secs
            .saturating_mul(attempts - 1)
            .saturating_add(attempts.saturating_mul(PING_ECHO_WAIT_SECS))
    }
}

impl Default for ProbesConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
            ping_attempts: default_ping_attempts(),
            ping_delay_secs: default_ping_delay(),
        }
    }
}

fn default_probe_timeout() -> u64 {
    10
}

fn default_ping_attempts() -> u32 {
    5
}

fn default_ping_delay() -> u64 {
    1
}

/// Report wording.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Heading of the status report.
    #[serde(default = "default_title")]
    pub title: String,

    /// Heading of the outage alert.
    #[serde(default = "default_alert_title")]
    pub alert_title: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            alert_title: default_alert_title(),
        }
    }
}

fn default_title() -> String {
    "Status".to_string()
}

fn default_alert_title() -> String {
    "Alert".to_string()
}

/// Authenticated system info endpoint backing the `info` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoConfig {
    pub url: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Local HTTP endpoint exposing `/health` and `/metrics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    9090
}

/// A monitored target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetConfig {
    /// Unique key, also used for the report line unless `display_name` is set.
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    #[serde(flatten)]
    pub probe: ProbeConfig,
}

/// How a target is checked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProbeConfig {
    /// Network reachability (one ICMP echo per attempt).
    Ping { host: String },

    /// Single GET, healthy iff the response status is 200.
    Http {
        url: String,

        #[serde(default, skip_serializing_if = "Option::is_none")]
        bearer_token: Option<String>,

        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        headers: BTreeMap<String, String>,
    },
}

impl ProbeConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeConfig::Ping { .. } => "ping",
            ProbeConfig::Http { .. } => "http",
        }
    }
}

/// Chat ids are accepted as TOML strings or integers.
fn deserialize_chat_ids<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum ChatId {
        Text(String),
        Number(i64),
    }

    let ids = Vec::<ChatId>::deserialize(deserializer)?;
    Ok(ids
        .into_iter()
        .map(|id| match id {
            ChatId::Text(s) => s,
            ChatId::Number(n) => n.to_string(),
        })
        .collect())
}

#[cfg(test)]
#[path = "schema_tests.rs"]
mod tests;
