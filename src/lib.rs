//! Network Connectivity Tester
//!
//! Pings a set of hosts concurrently at a fixed cadence for a fixed duration,
//! streams every attempt to the console and an optional CSV result log, and
//! finishes with per-host statistics and a terminal latency chart.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod executor;
pub mod logging;
pub mod models;
pub mod output;
pub mod probe;
pub mod sink;
pub mod stats;
pub mod types;

// Re-export commonly used types
pub use app::{check_reachability, App};
pub use error::{AppError, Result};
pub use executor::{HostProber, ProbeSchedule, RunReport, TestCoordinator};
pub use models::{Config, EventLogEntry, HostSeries, ProbeOutcome, ProbeResult, RunSettings, TestRun};
pub use output::{ColoredFormatter, LatencyChart, OutputCoordinator, OutputFormatter, OutputFormatterFactory, PlainFormatter};
pub use probe::{IcmpProbe, Probe, ProbeSettings};
pub use sink::{ConsoleSink, CsvLogSink, PlotSink, ResultSink, SinkSet};
pub use stats::HostStatistics;

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    use std::time::Duration;

    pub const DEFAULT_HOSTS: &[&str] = &["8.8.8.8", "1.1.1.1"];
    pub const DEFAULT_DURATION: Duration = Duration::from_secs(30);
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);
    /// ICMP payload bytes
    pub const DEFAULT_PACKET_SIZE: usize = 32;
    pub const DEFAULT_TTL: u8 = 64;
    pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(1);
    pub const DEFAULT_RESULTS_DIR: &str = "results";
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    /// Timestamp layout for console events and result log rows
    pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
}
