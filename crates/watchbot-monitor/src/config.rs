//! Building monitor components from the loaded configuration.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;
use watchbot_config::{Config, PING_ECHO_WAIT_SECS, ProbeConfig, ProbesConfig, TargetConfig};

use crate::aggregator::StatusAggregator;
use crate::error::MonitorError;
use crate::http_probe::HttpHealthProbe;
use crate::ping::{NetworkReachabilityProbe, Pinger, SystemPinger};
use crate::probe::{Probe, RetryPolicy};
use crate::reporter::Reporter;
use crate::system_info::SystemInfoClient;
use crate::target::Target;

/// Build one probe from its configuration.
pub fn build_probe(
    probe: &ProbeConfig,
    probes: &ProbesConfig,
    pinger: &Arc<dyn Pinger>,
) -> Result<Arc<dyn Probe>, MonitorError> {
    match probe {
        ProbeConfig::Ping { host } => {
            let retry = RetryPolicy::new(probes.ping_attempts, probes.ping_delay());
            Ok(Arc::new(NetworkReachabilityProbe::new(
                host.clone(),
                Arc::clone(pinger),
                retry,
            )))
        }
        ProbeConfig::Http {
            url,
            bearer_token,
            headers,
        } => {
            let mut http = HttpHealthProbe::new(url.clone(), probes.timeout())?;
            if let Some(token) = bearer_token {
                http = http.with_bearer_token(token);
            }
            for (name, value) in headers {
                http = http.with_header(name.clone(), value.clone());
            }
            Ok(Arc::new(http))
        }
    }
}

/// Build a target, applying the display name override.
pub fn build_target(
    config: &TargetConfig,
    probes: &ProbesConfig,
    pinger: &Arc<dyn Pinger>,
) -> Result<Target, MonitorError> {
    let probe = build_probe(&config.probe, probes, pinger)?;
    let target = Target::new(config.name.clone(), probe);
    debug!("Registered {} target '{}'", config.probe.kind(), config.name);

    Ok(match config.display_name {
        Some(ref display) => target.with_display_name(display.clone()),
        None => target,
    })
}

/// Build the aggregator over every configured target, in file order.
pub fn build_aggregator(config: &Config) -> Result<StatusAggregator, MonitorError> {
    let pinger: Arc<dyn Pinger> = Arc::new(SystemPinger::new(Duration::from_secs(PING_ECHO_WAIT_SECS)));
    build_aggregator_with(config, pinger)
}

/// Same as [`build_aggregator`] with a caller-supplied pinger.
pub fn build_aggregator_with(
    config: &Config,
    pinger: Arc<dyn Pinger>,
) -> Result<StatusAggregator, MonitorError> {
    let targets = config
        .targets
        .iter()
        .map(|t| build_target(t, &config.probes, &pinger))
        .collect::<Result<Vec<_>, _>>()?;

    StatusAggregator::new(targets, config.probes.timeout())
}

pub fn build_reporter(config: &Config) -> Reporter {
    Reporter::new(config.report.title.clone(), config.report.alert_title.clone())
}

/// System info client, if an info endpoint is configured.
pub fn build_system_info(config: &Config) -> Result<Option<SystemInfoClient>, MonitorError> {
    config
        .info
        .as_ref()
        .map(|info| SystemInfoClient::new(info.url.clone(), info.token.clone(), config.probes.timeout()))
        .transpose()
}
