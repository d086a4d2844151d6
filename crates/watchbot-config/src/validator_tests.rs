    use super::*;
    use crate::schema::TargetConfig;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.bot.token = "123:abc".to_string();
        config.alerts.subscribers = vec!["42".to_string()];
        config.targets = vec![
            TargetConfig {
                name: "server".to_string(),
                display_name: None,
                probe: ProbeConfig::Ping {
                    host: "10.0.0.1".to_string(),
                },
            },
            TargetConfig {
                name: "site".to_string(),
                display_name: None,
                probe: ProbeConfig::Http {
                    url: "https://www.example.com".to_string(),
                    bearer_token: None,
                    headers: Default::default(),
                },
            },
        ];
        config
    }

    #[test]
    fn test_validate_valid_config() {
        let result = ConfigValidator::validate(&valid_config(), true);
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_validate_missing_bot_token() {
        let mut config = valid_config();
        config.bot.token = "  ".to_string();

        let result = ConfigValidator::validate(&config, true);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.path == "bot.token"));
    }

    #[test]
    fn test_bot_token_not_required_for_one_shot_checks() {
        let mut config = valid_config();
        config.bot.token = String::new();

        let result = ConfigValidator::validate(&config, false);
        assert!(result.is_valid());
    }

    #[test]
    fn test_validate_zero_interval() {
        let mut config = valid_config();
        config.alerts.interval_secs = 0;

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "alerts.interval_secs"));
    }

    #[test]
    fn test_validate_zero_probe_timeout() {
        let mut config = valid_config();
        config.probes.timeout_secs = 0;

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "probes.timeout_secs"));
    }

    #[test]
    fn test_validate_zero_ping_attempts() {
        let mut config = valid_config();
        config.probes.ping_attempts = 0;

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "probes.ping_attempts"));
    }

    #[test]
    fn test_short_timeout_warning() {
        let mut config = valid_config();
        config.probes.timeout_secs = 3;

        let result = ConfigValidator::validate(&config, true);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "probes.timeout_secs"));
    }

    #[test]
    fn test_validate_duplicate_target_names() {
        let mut config = valid_config();
        config.targets[1].name = "server".to_string();

        let result = ConfigValidator::validate(&config, true);
        assert!(!result.is_valid());
        assert!(result
            .errors
            .iter()
            .any(|e| e.path == "targets[1].name" && e.message.contains("Duplicate")));
    }

    #[test]
    fn test_validate_empty_target_name() {
        let mut config = valid_config();
        config.targets[0].name = String::new();

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "targets[0].name"));
    }

    #[test]
    fn test_validate_invalid_http_url() {
        let mut config = valid_config();
        config.targets[1].probe = ProbeConfig::Http {
            url: "ftp://www.example.com".to_string(),
            bearer_token: None,
            headers: Default::default(),
        };

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "targets[1].url"));
    }

    #[test]
    fn test_validate_empty_ping_host() {
        let mut config = valid_config();
        config.targets[0].probe = ProbeConfig::Ping {
            host: String::new(),
        };

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "targets[0].host"));
    }

    #[test]
    fn test_no_subscribers_warning() {
        let mut config = valid_config();
        config.alerts.subscribers.clear();

        let result = ConfigValidator::validate(&config, true);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "alerts.subscribers"));
    }

    #[test]
    fn test_no_targets_warning() {
        let mut config = valid_config();
        config.targets.clear();

        let result = ConfigValidator::validate(&config, true);
        assert!(result.is_valid());
        assert!(result.warnings.iter().any(|w| w.path == "targets"));
    }

    #[test]
    fn test_into_result_reports_first_error() {
        let mut config = valid_config();
        config.alerts.interval_secs = 0;

        let err = ConfigValidator::validate(&config, true).into_result().unwrap_err();
        assert!(err.to_string().contains("alerts.interval_secs"));
    }

    #[test]
    fn test_into_result_returns_warnings() {
        let mut config = valid_config();
        config.targets.clear();

        let warnings = ConfigValidator::validate(&config, true).into_result().unwrap();
        assert_eq!(warnings.len(), 1);
    }

    #[test]
    fn test_huge_ping_delay_is_an_error_not_a_panic() {
        let mut config = valid_config();
        config.probes.ping_attempts = 3;
        config.probes.ping_delay_secs = i64::MAX as u64;

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "probes.ping_delay_secs"));
        assert!(result.warnings.iter().any(|w| w.path == "probes.timeout_secs"));
    }

    #[test]
    fn test_worst_case_ping_counts_echo_waits_not_trailing_delay() {
        let mut config = valid_config();
        config.probes.ping_attempts = 3;
        config.probes.ping_delay_secs = 4;

        // 2 pauses of 4s plus 3 echo waits of 1s.
        config.probes.timeout_secs = 12;
        assert!(ConfigValidator::validate(&config, true).warnings.is_empty());

        config.probes.timeout_secs = 11;
        let result = ConfigValidator::validate(&config, true);
        assert!(result.warnings.iter().any(|w| w.path == "probes.timeout_secs"));
    }

    #[test]
    fn test_validate_interval_upper_bound() {
        let mut config = valid_config();
        config.alerts.interval_secs = i64::MAX as u64;
        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "alerts.interval_secs"));

        config.alerts.interval_secs = MAX_INTERVAL_SECS;
        assert!(ConfigValidator::validate(&config, true).is_valid());
    }

    #[test]
    fn test_validate_probe_timeout_upper_bound() {
        let mut config = valid_config();
        config.probes.timeout_secs = MAX_PROBE_TIMEOUT_SECS + 1;

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "probes.timeout_secs"));
    }

    #[test]
    fn test_validate_poll_timeout_upper_bound() {
        let mut config = valid_config();
        config.bot.poll_timeout_secs = u64::MAX;

        let result = ConfigValidator::validate(&config, true);
        assert!(result.errors.iter().any(|e| e.path == "bot.poll_timeout_secs"));
        assert!(ConfigValidator::validate(&config, false).is_valid());
    }
