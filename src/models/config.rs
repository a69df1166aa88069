//! Configuration data model and validation

use crate::error::{AppError, Result};
use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Largest ICMP payload accepted (IPv4 datagram limit minus IP and ICMP headers)
pub const MAX_PACKET_SIZE: usize = 65_507;

/// Longest accepted test window, one day
pub const MAX_DURATION_SECS: f64 = 86_400.0;

/// Shortest accepted send interval, one millisecond
pub const MIN_INTERVAL_SECS: f64 = 0.001;

/// Longest accepted send interval; anything longer sends once per run anyway
pub const MAX_INTERVAL_SECS: f64 = MAX_DURATION_SECS;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Hosts to probe, in launch order
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,

    /// Length of the test window in seconds
    #[serde(default = "default_duration_secs")]
    pub duration_secs: f64,

    /// Cadence between sends to the same host, in seconds
    #[serde(default = "default_interval_secs")]
    pub interval_secs: f64,

    /// ICMP payload size in bytes
    #[serde(default = "default_packet_size")]
    pub packet_size: usize,

    /// IPv4 time-to-live of outgoing probes
    #[serde(default = "default_ttl")]
    pub ttl: u8,

    /// How long a single probe waits for its reply, in seconds
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: f64,

    /// Write a CSV row per attempt
    #[serde(default = "default_enable_log")]
    pub enable_log: bool,

    /// Directory receiving the per-run CSV file
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Render the latency chart after the run
    #[serde(default = "default_enable_plot")]
    pub enable_plot: bool,

    /// Explicit diagnostic log level; derived from verbose/debug when unset
    #[serde(default)]
    pub log_level: Option<LogLevel>,

    /// Exit with a failure status when any host never replied
    #[serde(default)]
    pub fail_on_unreachable: bool,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            duration_secs: default_duration_secs(),
            interval_secs: default_interval_secs(),
            packet_size: default_packet_size(),
            ttl: default_ttl(),
            probe_timeout_secs: default_probe_timeout_secs(),
            enable_log: default_enable_log(),
            results_dir: default_results_dir(),
            enable_plot: default_enable_plot(),
            log_level: None,
            fail_on_unreachable: false,
            enable_color: default_enable_color(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Test window as Duration
    pub fn duration(&self) -> Duration {
        secs_to_duration(self.duration_secs)
    }

    /// Send cadence as Duration
    pub fn interval(&self) -> Duration {
        secs_to_duration(self.interval_secs)
    }

    /// Per-probe reply wait as Duration
    pub fn probe_timeout(&self) -> Duration {
        secs_to_duration(self.probe_timeout_secs)
    }

    /// Diagnostic level after applying verbose/debug defaults
    pub fn effective_log_level(&self) -> LogLevel {
        match self.log_level {
            Some(level) => level,
            None if self.debug => LogLevel::Debug,
            None if self.verbose => LogLevel::Info,
            None => LogLevel::Warn,
        }
    }

    /// Validate the configuration and return the first error found
    pub fn validate(&self) -> Result<()> {
        if self.hosts.is_empty() {
            return Err(AppError::config("At least one host is required"));
        }

        for host in &self.hosts {
            if host.trim().is_empty() {
                return Err(AppError::config("Host cannot be empty"));
            }
            if host.chars().any(char::is_whitespace) {
                return Err(AppError::config(format!("Host '{}' contains whitespace", host)));
            }
        }

        if !self.duration_secs.is_finite() || self.duration_secs < 0.0 {
            return Err(AppError::config("Duration must be a non-negative number of seconds"));
        }

        if self.duration_secs > MAX_DURATION_SECS {
            return Err(AppError::config(format!("Duration cannot exceed {} seconds", MAX_DURATION_SECS)));
        }

        if !self.interval_secs.is_finite() || self.interval_secs < MIN_INTERVAL_SECS {
            return Err(AppError::config(format!("Interval must be at least {} seconds", MIN_INTERVAL_SECS)));
        }

        if self.interval_secs > MAX_INTERVAL_SECS {
            return Err(AppError::config(format!("Interval cannot exceed {} seconds", MAX_INTERVAL_SECS)));
        }

        if !self.probe_timeout_secs.is_finite() || self.probe_timeout_secs <= 0.0 {
            return Err(AppError::config("Probe timeout must be greater than 0"));
        }

        if self.probe_timeout_secs > 60.0 {
            return Err(AppError::config("Probe timeout cannot exceed 60 seconds"));
        }

        if self.ttl == 0 {
            return Err(AppError::config("TTL must be between 1 and 255"));
        }

        if self.packet_size > MAX_PACKET_SIZE {
            return Err(AppError::config(format!("Packet size cannot exceed {} bytes", MAX_PACKET_SIZE)));
        }

        if self.enable_log && self.results_dir.as_os_str().is_empty() {
            return Err(AppError::config("Results directory cannot be empty when logging is enabled"));
        }

        Ok(())
    }

    /// Merge environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        if let Ok(hosts) = std::env::var("HOSTS") {
            self.hosts = split_hosts(&hosts);
        }

        if let Ok(duration) = std::env::var("DURATION") {
            self.duration_secs = duration.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid DURATION value '{}': {}", duration, e)))?;
        }

        if let Ok(interval) = std::env::var("INTERVAL") {
            self.interval_secs = interval.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid INTERVAL value '{}': {}", interval, e)))?;
        }

        if let Ok(packet_size) = std::env::var("PACKET_SIZE") {
            self.packet_size = packet_size.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PACKET_SIZE value '{}': {}", packet_size, e)))?;
        }

        if let Ok(ttl) = std::env::var("TTL") {
            self.ttl = ttl.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid TTL value '{}': {}", ttl, e)))?;
        }

        if let Ok(timeout) = std::env::var("PROBE_TIMEOUT") {
            self.probe_timeout_secs = timeout.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid PROBE_TIMEOUT value '{}': {}", timeout, e)))?;
        }

        if let Ok(enable_log) = std::env::var("ENABLE_LOG") {
            self.enable_log = enable_log.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_LOG value '{}': {}", enable_log, e)))?;
        }

        if let Ok(results_dir) = std::env::var("RESULTS_DIR") {
            self.results_dir = PathBuf::from(results_dir.trim());
        }

        if let Ok(log_level) = std::env::var("LOG_LEVEL") {
            self.log_level = Some(log_level.parse()?);
        }

        if let Ok(enable_color) = std::env::var("ENABLE_COLOR") {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid ENABLE_COLOR value '{}': {}", enable_color, e)))?;
        }

        Ok(())
    }
}

/// Seconds to Duration without panicking: negative or NaN becomes zero,
/// values beyond the Duration range saturate
fn secs_to_duration(secs: f64) -> Duration {
    if secs.is_nan() || secs <= 0.0 {
        return Duration::ZERO;
    }
    Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
}

/// Split a comma-separated host list, dropping empty entries
pub fn split_hosts(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Default value functions for serde
fn default_hosts() -> Vec<String> {
    crate::defaults::DEFAULT_HOSTS
        .iter()
        .map(|&s| s.to_string())
        .collect()
}

fn default_duration_secs() -> f64 {
    crate::defaults::DEFAULT_DURATION.as_secs_f64()
}

fn default_interval_secs() -> f64 {
    crate::defaults::DEFAULT_INTERVAL.as_secs_f64()
}

fn default_packet_size() -> usize {
    crate::defaults::DEFAULT_PACKET_SIZE
}

fn default_ttl() -> u8 {
    crate::defaults::DEFAULT_TTL
}

fn default_probe_timeout_secs() -> f64 {
    crate::defaults::DEFAULT_PROBE_TIMEOUT.as_secs_f64()
}

fn default_enable_log() -> bool {
    true
}

fn default_results_dir() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_RESULTS_DIR)
}

fn default_enable_plot() -> bool {
    true
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}
