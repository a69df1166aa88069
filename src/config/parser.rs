//! Configuration parsing from CLI arguments and environment variables

use crate::{
    cli::Cli,
    config::env::EnvManager,
    error::{AppError, Result},
    models::config::{split_hosts, Config},
};

/// Configuration parser that combines CLI arguments with environment variables
pub struct ConfigParser {
    cli: Cli,
}

impl ConfigParser {
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Build the complete configuration: defaults, then .env and environment,
    /// then command-line overrides, then validation
    pub fn parse(&self) -> Result<Config> {
        self.cli.validate().map_err(AppError::validation)?;

        EnvManager::load_env_file(self.cli.debug)?;

        let mut config = Config::default();
        config.merge_from_env()?;
        self.finish(config)
    }

    /// Apply command-line overrides on top of `base` and validate the result
    pub fn finish(&self, mut base: Config) -> Result<Config> {
        self.apply_cli_overrides(&mut base);
        base.validate()?;
        Ok(base)
    }

    /// Apply CLI argument overrides to configuration
    fn apply_cli_overrides(&self, config: &mut Config) {
        let cli = &self.cli;

        if let Some(hosts) = &cli.hosts {
            config.hosts = split_hosts(hosts);
        }
        if let Some(duration) = cli.duration {
            config.duration_secs = duration;
        }
        if let Some(interval) = cli.interval {
            config.interval_secs = interval;
        }
        if let Some(packet_size) = cli.packet_size {
            config.packet_size = packet_size;
        }
        if let Some(ttl) = cli.ttl {
            config.ttl = ttl;
        }
        if let Some(timeout) = cli.timeout {
            config.probe_timeout_secs = timeout;
        }
        if cli.nolog {
            config.enable_log = false;
        }
        if let Some(dir) = &cli.results_dir {
            config.results_dir = dir.clone();
        }
        if cli.no_plot {
            config.enable_plot = false;
        }
        if cli.log_level.is_some() {
            config.log_level = cli.log_level;
        }
        if let Some(color) = cli.color_override() {
            config.enable_color = color;
        }

        // CLI-only switches
        config.fail_on_unreachable = cli.fail_on_unreachable;
        config.verbose = cli.verbose;
        config.debug = cli.debug;
    }
}

/// Convenience function to load complete configuration from CLI arguments
pub fn load_config(cli: Cli) -> Result<Config> {
    ConfigParser::new(cli).parse()
}

/// Display configuration summary for debug purposes
pub fn display_config_summary(config: &Config) -> String {
    let mut summary = Vec::new();

    summary.push(format!("Hosts: {}", config.hosts.join(", ")));
    summary.push(format!("Duration: {}s", config.duration_secs));
    summary.push(format!("Interval: {}s", config.interval_secs));
    summary.push(format!("Packet Size: {} bytes", config.packet_size));
    summary.push(format!("TTL: {}", config.ttl));
    summary.push(format!("Probe Timeout: {}s", config.probe_timeout_secs));
    if config.enable_log {
        summary.push(format!("Result Log: {}", config.results_dir.display()));
    } else {
        summary.push("Result Log: disabled".to_string());
    }
    summary.push(format!("Plot: {}", config.enable_plot));
    summary.push(format!("Log Level: {}", config.effective_log_level()));
    summary.push(format!("Fail On Unreachable: {}", config.fail_on_unreachable));
    summary.push(format!("Color Output: {}", config.enable_color));
    summary.push(format!("Verbose: {}", config.verbose));
    summary.push(format!("Debug: {}", config.debug));

    summary.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::LogLevel;
    use clap::Parser;
    use std::path::PathBuf;
    use std::sync::Mutex;

    static ENV_LOCK: Mutex<()> = Mutex::new(());

    fn parser(args: &[&str]) -> ConfigParser {
        let mut argv = vec!["nct"];
        argv.extend_from_slice(args);
        ConfigParser::new(Cli::parse_from(argv))
    }

    #[test]
    fn test_defaults_without_overrides() {
        let config = parser(&[]).finish(Config::default()).unwrap();

        assert_eq!(config.hosts, vec!["8.8.8.8", "1.1.1.1"]);
        assert_eq!(config.duration_secs, 30.0);
        assert_eq!(config.interval_secs, 1.0);
        assert_eq!(config.packet_size, 32);
        assert_eq!(config.ttl, 64);
        assert!(config.enable_log);
        assert!(config.enable_plot);
        assert!(!config.fail_on_unreachable);
    }

    #[test]
    fn test_cli_overrides() {
        let config = parser(&[
            "--hosts", "192.0.2.1, 192.0.2.2",
            "--duration", "3",
            "--interval", "0.5",
            "--ttl", "9",
            "--nolog",
            "--no-plot",
            "--no-color",
            "--verbose",
        ])
        .finish(Config::default())
        .unwrap();

        assert_eq!(config.hosts, vec!["192.0.2.1", "192.0.2.2"]);
        assert_eq!(config.duration_secs, 3.0);
        assert_eq!(config.interval_secs, 0.5);
        assert_eq!(config.ttl, 9);
        assert!(!config.enable_log);
        assert!(!config.enable_plot);
        assert!(!config.enable_color);
        assert!(config.verbose);
        assert_eq!(config.effective_log_level(), LogLevel::Info);
    }

    #[test]
    fn test_cli_overrides_env_values() {
        let base = Config {
            hosts: vec!["env.example".to_string()],
            duration_secs: 12.0,
            results_dir: PathBuf::from("from-env"),
            ..Config::default()
        };

        let config = parser(&["--duration", "4", "--results-dir", "from-cli"])
            .finish(base)
            .unwrap();

        assert_eq!(config.hosts, vec!["env.example"]);
        assert_eq!(config.duration_secs, 4.0);
        assert_eq!(config.results_dir, PathBuf::from("from-cli"));
    }

    #[test]
    fn test_invalid_result_is_rejected() {
        let err = parser(&["--timeout", "120"]).finish(Config::default()).unwrap_err();
        assert_eq!(err.category(), "CONFIG");
    }

    #[test]
    fn test_out_of_range_interval_from_env_is_rejected() {
        for interval_secs in [1e-10, 1e19] {
            let base = Config { interval_secs, ..Config::default() };
            let err = parser(&[]).finish(base).unwrap_err();
            assert_eq!(err.category(), "CONFIG");
        }
    }

    #[test]
    fn test_conflicting_flags_fail_before_env_is_read() {
        let err = parser(&["--color", "--no-color"]).parse().unwrap_err();
        assert_eq!(err.category(), "VALIDATION");
    }

    #[test]
    fn test_environment_then_cli_precedence() {
        let _guard = ENV_LOCK.lock().unwrap();

        std::env::set_var("HOSTS", "198.51.100.1,198.51.100.2");
        std::env::set_var("INTERVAL", "2");
        std::env::set_var("TTL", "33");

        let mut base = Config::default();
        let merged = base.merge_from_env();
        let config = merged.and_then(|_| parser(&["--ttl", "44"]).finish(base));

        std::env::remove_var("HOSTS");
        std::env::remove_var("INTERVAL");
        std::env::remove_var("TTL");

        let config = config.unwrap();
        assert_eq!(config.hosts, vec!["198.51.100.1", "198.51.100.2"]);
        assert_eq!(config.interval_secs, 2.0);
        assert_eq!(config.ttl, 44);
    }

    #[test]
    fn test_config_summary() {
        let summary = display_config_summary(&Config::default());

        assert!(summary.contains("Hosts: 8.8.8.8, 1.1.1.1"));
        assert!(summary.contains("Duration: 30s"));
        assert!(summary.contains("Result Log: results"));
        assert!(summary.contains("Log Level: WARN"));
    }
}
