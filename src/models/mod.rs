//! Data models and structures for the network connectivity tester

pub mod config;
pub mod run;

// Re-export main model types
pub use config::Config;
pub use run::{EventLogEntry, HostSeries, ProbeOutcome, ProbeResult, RunSettings, TestRun};
