//! Configuration validation.

use std::collections::HashSet;

use crate::error::ConfigError;
use crate::schema::{Config, ProbeConfig};

/// Upper bounds for durations read from the config file.
pub const MAX_INTERVAL_SECS: u64 = 7 * 24 * 60 * 60;
pub const MAX_PROBE_TIMEOUT_SECS: u64 = 60 * 60;
pub const MAX_PING_DELAY_SECS: u64 = 60 * 60;
pub const MAX_POLL_TIMEOUT_SECS: u64 = 60 * 60;

/// Validation result.
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<ValidationError>,
    pub warnings: Vec<ValidationWarning>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn add_warning(&mut self, warning: ValidationWarning) {
        self.warnings.push(warning);
    }

    /// Turn the first error into a `ConfigError`, handing back the warnings otherwise.
    pub fn into_result(self) -> Result<Vec<ValidationWarning>, ConfigError> {
        match self.errors.into_iter().next() {
            Some(error) => Err(ConfigError::InvalidValue {
                field: error.path,
                message: error.message,
            }),
            None => Ok(self.warnings),
        }
    }
}

/// A validation error.
#[derive(Debug)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
}

impl ValidationError {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// A validation warning.
#[derive(Debug)]
pub struct ValidationWarning {
    pub path: String,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Configuration validator.
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate the configuration.
    ///
    /// `require_bot` is false for one-shot checks that never talk to the chat API.
    pub fn validate(config: &Config, require_bot: bool) -> ValidationResult {
        let mut result = ValidationResult::default();

        if require_bot {
            Self::validate_bot(config, &mut result);
        }
        Self::validate_alerts(config, &mut result);
        Self::validate_probes(config, &mut result);
        Self::validate_info(config, &mut result);
        Self::validate_targets(config, &mut result);

        result
    }

    fn validate_bot(config: &Config, result: &mut ValidationResult) {
        if config.bot.token.trim().is_empty() {
            result.add_error(ValidationError::new("bot.token", "Bot token cannot be empty"));
        }

        if !is_http_url(&config.bot.api_url) {
            result.add_error(ValidationError::new(
                "bot.api_url",
                "api_url must start with http:// or https://",
            ));
        }

        check_range(
            result,
            "bot.poll_timeout_secs",
            config.bot.poll_timeout_secs,
            0,
            MAX_POLL_TIMEOUT_SECS,
        );

        if config.alerts.subscribers.is_empty() {
            result.add_warning(ValidationWarning::new(
                "alerts.subscribers",
                "No subscribers configured, outage alerts will not be delivered",
            ));
        }
    }

    fn validate_alerts(config: &Config, result: &mut ValidationResult) {
        check_range(
            result,
            "alerts.interval_secs",
            config.alerts.interval_secs,
            1,
            MAX_INTERVAL_SECS,
        );
    }

    fn validate_probes(config: &Config, result: &mut ValidationResult) {
        check_range(
            result,
            "probes.timeout_secs",
            config.probes.timeout_secs,
            1,
            MAX_PROBE_TIMEOUT_SECS,
        );
        check_range(
            result,
            "probes.ping_delay_secs",
            config.probes.ping_delay_secs,
            0,
            MAX_PING_DELAY_SECS,
        );

        if config.probes.ping_attempts == 0 {
            result.add_error(ValidationError::new(
                "probes.ping_attempts",
                "ping_attempts must be greater than 0",
            ));
        }

        let worst_ping = config.probes.ping_worst_case_secs();
        if worst_ping >= config.probes.timeout_secs && config.probes.timeout_secs > 0 {
            result.add_warning(ValidationWarning::new(
                "probes.timeout_secs",
                format!(
                    "timeout_secs ({}) is shorter than the worst-case ping retry time ({}s), \
                     hosts may be reported down before all attempts run",
                    config.probes.timeout_secs, worst_ping
                ),
            ));
        }
    }

    fn validate_info(config: &Config, result: &mut ValidationResult) {
        if let Some(ref info) = config.info {
            if !is_http_url(&info.url) {
                result.add_error(ValidationError::new(
                    "info.url",
                    "url must start with http:// or https://",
                ));
            }
        }
    }

    fn validate_targets(config: &Config, result: &mut ValidationResult) {
        if config.targets.is_empty() {
            result.add_warning(ValidationWarning::new("targets", "No targets configured"));
        }

        let mut seen = HashSet::new();
        for (index, target) in config.targets.iter().enumerate() {
            let path = format!("targets[{}]", index);

            if target.name.trim().is_empty() {
                result.add_error(ValidationError::new(
                    format!("{}.name", path),
                    "Target name cannot be empty",
                ));
            } else if !seen.insert(target.name.as_str()) {
                result.add_error(ValidationError::new(
                    format!("{}.name", path),
                    format!("Duplicate target name '{}'", target.name),
                ));
            }

            match &target.probe {
                ProbeConfig::Ping { host } => {
                    if host.trim().is_empty() {
                        result.add_error(ValidationError::new(
                            format!("{}.host", path),
                            "Host cannot be empty",
                        ));
                    }
                }
                ProbeConfig::Http { url, .. } => {
                    if !is_http_url(url) {
                        result.add_error(ValidationError::new(
                            format!("{}.url", path),
                            "url must start with http:// or https://",
                        ));
                    }
                }
            }
        }
    }
}

fn check_range(result: &mut ValidationResult, path: &str, value: u64, min: u64, max: u64) {
    if value < min || value > max {
        result.add_error(ValidationError::new(
            path,
            format!("must be between {} and {}, got {}", min, max, value),
        ));
    }
}

fn is_http_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

#[cfg(test)]
#[path = "validator_tests.rs"]
mod tests;
