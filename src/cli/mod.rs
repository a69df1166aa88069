//! Command-line interface module with topic help

pub mod help;

pub use help::HelpSystem;

use crate::logging::LogLevel;
use crate::models::config::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
use clap::Parser;
use std::path::PathBuf;

/// Network Connectivity Tester - concurrent ICMP reachability and latency measurement
///
/// Every option left unset falls back to the environment (or a .env file) and
/// then to the built-in default.
#[derive(Parser, Debug, Clone)]
#[command(name = "nct")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Hosts to ping (comma-separated IP addresses or hostnames)
    #[arg(long, value_name = "HOSTS")]
    pub hosts: Option<String>,

    /// Test duration in seconds (fractional values allowed, 0 sends nothing)
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_non_negative_secs)]
    pub duration: Option<f64>,

    /// Seconds between pings to the same host
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_interval_secs)]
    pub interval: Option<f64>,

    /// ICMP payload size in bytes
    #[arg(short = 's', long, value_name = "BYTES")]
    pub packet_size: Option<usize>,

    /// IPv4 time-to-live (1-255)
    #[arg(long, value_name = "TTL", value_parser = clap::value_parser!(u8).range(1..))]
    pub ttl: Option<u8>,

    /// Seconds to wait for each reply
    #[arg(short, long, value_name = "SECONDS", value_parser = parse_positive_secs)]
    pub timeout: Option<f64>,

    /// Do not write the CSV result log
    #[arg(long)]
    pub nolog: bool,

    /// Directory for CSV result logs
    #[arg(long, value_name = "DIR")]
    pub results_dir: Option<PathBuf>,

    /// Do not draw the latency chart after the run
    #[arg(long)]
    pub no_plot: bool,

    /// Diagnostic log level (trace, debug, info, warn, error)
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Exit with status 2 when any host never replied
    #[arg(long)]
    pub fail_on_unreachable: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output, including the full event log
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Show help for a specific topic (config, env, examples, output, permissions)
    #[arg(long, value_name = "TOPIC")]
    pub help_topic: Option<String>,
}

impl Cli {
    /// Validate CLI arguments for conflicts
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        if let Some(hosts) = &self.hosts {
            if hosts.split(',').all(|h| h.trim().is_empty()) {
                return Err("--hosts must name at least one host".to_string());
            }
        }

        if self.nolog && self.results_dir.is_some() {
            return Err("--results-dir has no effect together with --nolog".to_string());
        }

        Ok(())
    }

    pub fn should_show_topic_help(&self) -> bool {
        self.help_topic.is_some()
    }

    pub fn get_help_topic(&self) -> Option<&str> {
        self.help_topic.as_deref()
    }

    /// Explicit color choice from the command line, if any
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }

    /// Display help for the requested topic
    pub fn display_help(&self) -> String {
        let help_system = HelpSystem::new();
        let use_colors = self.use_colors();
        let topic = self.help_topic.as_deref().unwrap_or_default();

        help_system.display_topic_help(topic, use_colors).unwrap_or_else(|| {
            format!(
                "Unknown help topic: '{}'\n\nAvailable topics: {}\n",
                topic,
                HelpSystem::TOPICS.join(", ")
            )
        })
    }
}

fn parse_secs(s: &str) -> Result<f64, String> {
    let secs: f64 = s
        .trim()
        .parse()
        .map_err(|_| format!("Invalid number of seconds: {}", s))?;
    if !secs.is_finite() {
        return Err(format!("Invalid number of seconds: {}", s));
    }
    Ok(secs)
}

fn parse_non_negative_secs(s: &str) -> Result<f64, String> {
    let secs = parse_secs(s)?;
    if secs < 0.0 {
        return Err("Value cannot be negative".to_string());
    }
    Ok(secs)
}

fn parse_positive_secs(s: &str) -> Result<f64, String> {
    let secs = parse_secs(s)?;
    if secs <= 0.0 {
        return Err("Value must be greater than 0".to_string());
    }
    Ok(secs)
}

fn parse_interval_secs(s: &str) -> Result<f64, String> {
    let secs = parse_positive_secs(s)?;
    if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
        return Err(format!(
            "Interval must be between {} and {} seconds",
            MIN_INTERVAL_SECS, MAX_INTERVAL_SECS
        ));
    }
    Ok(secs)
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_defaults_are_unset() {
        let cli = Cli::parse_from(["nct"]);
        assert!(cli.hosts.is_none());
        assert!(cli.duration.is_none());
        assert!(cli.interval.is_none());
        assert!(cli.ttl.is_none());
        assert!(!cli.nolog);
        assert!(!cli.no_plot);
        assert!(!cli.fail_on_unreachable);
    }

    #[test]
    fn test_cli_parsing_all_options() {
        let cli = Cli::parse_from([
            "nct",
            "--hosts", "192.0.2.1,example.com",
            "--duration", "2.5",
            "--interval", "0.5",
            "--packet-size", "56",
            "--ttl", "12",
            "--timeout", "0.8",
            "--results-dir", "out",
            "--no-plot",
            "--log-level", "debug",
            "--fail-on-unreachable",
            "--no-color",
            "--verbose",
            "--debug",
        ]);

        assert_eq!(cli.hosts.as_deref(), Some("192.0.2.1,example.com"));
        assert_eq!(cli.duration, Some(2.5));
        assert_eq!(cli.interval, Some(0.5));
        assert_eq!(cli.packet_size, Some(56));
        assert_eq!(cli.ttl, Some(12));
        assert_eq!(cli.timeout, Some(0.8));
        assert_eq!(cli.results_dir, Some(PathBuf::from("out")));
        assert!(cli.no_plot);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
        assert!(cli.fail_on_unreachable);
        assert_eq!(cli.color_override(), Some(false));
        assert!(cli.verbose && cli.debug);
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Cli::try_parse_from(["nct", "--ttl", "0"]).is_err());
        assert!(Cli::try_parse_from(["nct", "--ttl", "256"]).is_err());
        assert!(Cli::try_parse_from(["nct", "--interval", "0"]).is_err());
        assert!(Cli::try_parse_from(["nct", "--timeout", "-1"]).is_err());
        assert!(Cli::try_parse_from(["nct", "--duration", "-3"]).is_err());
        assert!(Cli::try_parse_from(["nct", "--duration", "NaN"]).is_err());
        assert!(Cli::try_parse_from(["nct", "--log-level", "chatty"]).is_err());
        assert!(Cli::try_parse_from(["nct", "--duration", "0"]).is_ok());
    }

    #[test]
    fn test_rejects_out_of_range_interval() {
        for bad in ["1e-10", "0.0001", "86401", "1e19", "1e20"] {
            assert!(Cli::try_parse_from(["nct", "--interval", bad]).is_err(), "interval {}", bad);
        }
        let cli = Cli::try_parse_from(["nct", "--interval", "0.001"]).unwrap();
        assert_eq!(cli.interval, Some(0.001));
    }

    #[test]
    fn test_validate_conflicts() {
        let both_colors = Cli::parse_from(["nct", "--color", "--no-color"]);
        assert!(both_colors.validate().is_err());

        let empty_hosts = Cli::parse_from(["nct", "--hosts", " , "]);
        assert!(empty_hosts.validate().is_err());

        let nolog_dir = Cli::parse_from(["nct", "--nolog", "--results-dir", "x"]);
        assert!(nolog_dir.validate().is_err());
    }

    #[test]
    fn test_help_topic_methods() {
        let cli = Cli::parse_from(["nct", "--help-topic", "config"]);
        assert!(cli.should_show_topic_help());
        assert_eq!(cli.get_help_topic(), Some("config"));

        let unknown = Cli::parse_from(["nct", "--help-topic", "nonsense", "--no-color"]);
        assert!(unknown.display_help().starts_with("Unknown help topic: 'nonsense'"));
    }

    #[test]
    fn test_color_flags() {
        assert!(Cli::parse_from(["nct", "--color"]).use_colors());
        assert!(!Cli::parse_from(["nct", "--no-color"]).use_colors());
    }
}
