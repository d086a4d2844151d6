//! Component construction for watchbot.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, warn};

use watchbot_config::{Config, ConfigError, ConfigLoader, ConfigValidator};
use watchbot_monitor::config::{build_aggregator, build_reporter, build_system_info};
use watchbot_monitor::{
    AlertPolicy, MessageSink, MetricsRegistry, MonitorError, Notifier, Reporter, Scheduler,
    SystemInfoClient,
};

/// Get the watchbot home directory (~/.watchbot).
pub(crate) fn watchbot_dir() -> PathBuf {
    dirs::home_dir()
        .map(|h| h.join(".watchbot"))
        .unwrap_or_else(|| PathBuf::from(".watchbot"))
}

/// Load, override and validate the configuration. Warnings are logged.
pub(crate) fn load_config(
    path: &Path,
    interval_override: Option<u64>,
    require_bot: bool,
) -> Result<Config, ConfigError> {
    let mut config = ConfigLoader::load(path)?;
    info!("Loaded configuration from {}", path.display());

    if let Some(secs) = interval_override {
        info!("Check interval overridden to {}s", secs);
        config.alerts.interval_secs = secs;
    }

    let warnings = ConfigValidator::validate(&config, require_bot).into_result()?;
    for warning in warnings {
        warn!("Config {}: {}", warning.path, warning.message);
    }

    Ok(config)
}

/// Everything the bot needs at runtime.
pub(crate) struct Components {
    pub scheduler: Arc<Scheduler>,
    pub reporter: Arc<Reporter>,
    pub system_info: Option<Arc<SystemInfoClient>>,
}

/// Wire targets, alerting and delivery together.
pub(crate) fn build_components(
    config: &Config,
    sink: Arc<dyn MessageSink>,
    metrics: Arc<MetricsRegistry>,
) -> Result<Components, MonitorError> {
    let aggregator = Arc::new(build_aggregator(config)?);
    let reporter = Arc::new(build_reporter(config));
    let system_info = build_system_info(config)?.map(Arc::new);

    info!(
        "Monitoring {} target(s), delivering via {}",
        aggregator.targets().len(),
        sink.name()
    );

    let scheduler = Scheduler::new(
        aggregator,
        AlertPolicy::new(),
        Notifier::new(sink),
        config.alerts.subscribers.clone(),
        config.alerts.interval(),
    )
    .with_reporter(reporter.clone())
    .with_metrics(metrics);

    Ok(Components {
        scheduler: Arc::new(scheduler),
        reporter,
        system_info,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::time::Duration;
    use watchbot_monitor::LogSink;

    const CONFIG: &str = r#"
[bot]
token = "123:abc"

[alerts]
subscribers = [1001, "-2002"]
interval_secs = 120

[[targets]]
name = "site"
kind = "http"
url = "https://example.com"
"#;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_config_with_interval_override() {
        let file = write_config(CONFIG);

        let config = load_config(file.path(), None, true).unwrap();
        assert_eq!(config.alerts.interval_secs, 120);

        let config = load_config(file.path(), Some(30), true).unwrap();
        assert_eq!(config.alerts.interval(), Duration::from_secs(30));
    }

    #[test]
    fn test_zero_interval_override_rejected() {
        let file = write_config(CONFIG);
        let err = load_config(file.path(), Some(0), true).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref field, .. } if field == "alerts.interval_secs"));
    }

    #[test]
    fn test_missing_bot_token_only_matters_when_required() {
        let file = write_config("[[targets]]\nname = \"site\"\nkind = \"http\"\nurl = \"https://example.com\"\n");
        assert!(load_config(file.path(), None, true).is_err());
        assert!(load_config(file.path(), None, false).is_ok());
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/watchbot.toml"), None, false).unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_build_components() {
        let file = write_config(CONFIG);
        let config = load_config(file.path(), None, true).unwrap();

        let components =
            build_components(&config, Arc::new(LogSink), Arc::new(MetricsRegistry::new())).unwrap();

        assert_eq!(components.scheduler.interval(), Duration::from_secs(120));
        assert_eq!(components.scheduler.subscribers(), ["1001", "-2002"]);
        assert_eq!(components.reporter.title(), "Status");
        assert!(components.system_info.is_none());
    }

    #[test]
    fn test_watchbot_dir() {
        assert!(watchbot_dir().ends_with(".watchbot"));
    }
}
