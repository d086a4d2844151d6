//! One-shot `check` and `validate` subcommands.

use std::path::Path;

use tracing::info;

use watchbot_config::{ConfigLoader, ConfigValidator};
use watchbot_monitor::config::{build_aggregator, build_reporter};

use crate::register::load_config;

/// Probe every target once and print the status report.
///
/// Returns whether every target is up. Never touches the chat API.
pub(crate) async fn check(config_path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let config = load_config(config_path, None, false)?;
    let aggregator = build_aggregator(&config)?;
    let reporter = build_reporter(&config);

    info!("Checking {} target(s)", aggregator.targets().len());
    let snapshot = aggregator.run().await;
    println!("{}", reporter.format_snapshot(&snapshot));

    Ok(snapshot.all_healthy())
}

/// Print every validation error and warning. Returns whether the file is valid.
pub(crate) fn validate(config_path: &Path) -> Result<bool, Box<dyn std::error::Error>> {
    let config = ConfigLoader::load(config_path)?;
    let result = ConfigValidator::validate(&config, true);

    for error in &result.errors {
        println!("error: {}: {}", error.path, error.message);
    }
    for warning in &result.warnings {
        println!("warning: {}: {}", warning.path, warning.message);
    }

    if result.is_valid() {
        println!(
            "{} is valid ({} target(s), {} subscriber(s))",
            config_path.display(),
            config.targets.len(),
            config.alerts.subscribers.len()
        );
    }

    Ok(result.is_valid())
}
