//! Probe results, per-host series and the aggregated test run

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use uuid::Uuid;

use super::Config;
use crate::defaults::TIMESTAMP_FORMAT;

/// Upper bound on the preallocated series capacity
const MAX_SERIES_CAPACITY: usize = 65_536;

/// Outcome of a single echo request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ProbeOutcome {
    /// A reply arrived; round-trip time in milliseconds
    Reply { latency_ms: f64 },
    /// The wait timeout elapsed without a matching reply
    NoReply,
    /// The request could not be sent or the transport failed
    Error(String),
}

impl ProbeOutcome {
    /// Successful reply with the latency rounded to 4 decimal digits
    pub fn reply(latency_ms: f64) -> Self {
        Self::Reply {
            latency_ms: round_latency(latency_ms.max(0.0)),
        }
    }

    /// Transport failure with its cause
    pub fn error(cause: impl Into<String>) -> Self {
        Self::Error(cause.into())
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Reply { .. })
    }

    pub fn latency_ms(&self) -> Option<f64> {
        match self {
            Self::Reply { latency_ms } => Some(*latency_ms),
            _ => None,
        }
    }
}

/// Round a latency to 4 decimal digits
pub fn round_latency(latency_ms: f64) -> f64 {
    (latency_ms * 10_000.0).round() / 10_000.0
}

/// One measurement attempt for one host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeResult {
    /// Probed host as configured
    pub host: String,
    /// Zero-based send index within the host's series
    pub seq: usize,
    /// Wall-clock time at send
    pub timestamp: DateTime<Local>,
    /// What happened
    pub outcome: ProbeOutcome,
}

impl ProbeResult {
    pub fn new(host: impl Into<String>, seq: usize, timestamp: DateTime<Local>, outcome: ProbeOutcome) -> Self {
        Self {
            host: host.into(),
            seq,
            timestamp,
            outcome,
        }
    }

    pub fn success(&self) -> bool {
        self.outcome.is_success()
    }

    /// Latency, present if and only if the attempt succeeded
    pub fn latency_ms(&self) -> Option<f64> {
        self.outcome.latency_ms()
    }

    /// Send timestamp in log format
    pub fn formatted_timestamp(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }

    /// Status column of the result log
    pub fn status_text(&self) -> String {
        match self.outcome {
            ProbeOutcome::Reply { latency_ms } => format!("Success ({:.4} ms)", latency_ms),
            ProbeOutcome::NoReply | ProbeOutcome::Error(_) => "Failed".to_string(),
        }
    }

    /// Human-readable description used by the event log and console
    pub fn describe(&self) -> String {
        match &self.outcome {
            ProbeOutcome::Error(cause) => format!("Error pinging {}: {}", self.host, cause),
            _ => format!("Ping to {}: {}", self.host, self.status_text()),
        }
    }
}

/// Ordered probe results for one host, in send order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HostSeries {
    pub host: String,
    pub results: Vec<ProbeResult>,
}

impl HostSeries {
    pub fn new(host: impl Into<String>) -> Self {
        Self::with_capacity(host, 0)
    }

    /// Create a series sized for the expected number of samples
    pub fn with_capacity(host: impl Into<String>, expected: usize) -> Self {
        Self {
            host: host.into(),
            results: Vec::with_capacity(expected.min(MAX_SERIES_CAPACITY)),
        }
    }

    /// Append the next result
    pub fn push(&mut self, result: ProbeResult) {
        debug_assert_eq!(result.seq, self.results.len());
        self.results.push(result);
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Latency per sample; `None` marks a failed attempt
    pub fn latencies(&self) -> Vec<Option<f64>> {
        self.results.iter().map(ProbeResult::latency_ms).collect()
    }

    /// Latencies of successful samples only
    pub fn successful_latencies(&self) -> Vec<f64> {
        self.results.iter().filter_map(ProbeResult::latency_ms).collect()
    }

    pub fn success_count(&self) -> usize {
        self.results.iter().filter(|r| r.success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.len() - self.success_count()
    }

    /// True when at least one attempt was made and none got a reply
    pub fn is_unreachable(&self) -> bool {
        !self.is_empty() && self.success_count() == 0
    }
}

/// Timestamped description of one attempt
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub timestamp: DateTime<Local>,
    pub host: String,
    pub description: String,
}

impl EventLogEntry {
    pub fn from_result(result: &ProbeResult) -> Self {
        Self {
            timestamp: result.timestamp,
            host: result.host.clone(),
            description: result.describe(),
        }
    }
}

impl fmt::Display for EventLogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.timestamp.format(TIMESTAMP_FORMAT), self.description)
    }
}

/// Parameters a run was started with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    pub hosts: Vec<String>,
    pub duration: Duration,
    pub interval: Duration,
    pub packet_size: usize,
    pub ttl: u8,
    pub probe_timeout: Duration,
    /// CSV file receiving one row per attempt, if logging is enabled
    pub log_path: Option<PathBuf>,
}

impl RunSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            hosts: config.hosts.clone(),
            duration: config.duration(),
            interval: config.interval(),
            packet_size: config.packet_size,
            ttl: config.ttl,
            probe_timeout: config.probe_timeout(),
            log_path: None,
        }
    }

    pub fn with_log_path(mut self, path: PathBuf) -> Self {
        self.log_path = Some(path);
        self
    }
}

/// Completed test run: settings, per-host series and the merged event log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestRun {
    pub id: Uuid,
    pub settings: RunSettings,
    pub started_at: DateTime<Local>,
    pub completed_at: DateTime<Local>,
    /// One series per launched host, in launch order
    pub series: Vec<HostSeries>,
    pub events: Vec<EventLogEntry>,
    /// Set when the run ended early on user cancellation
    pub cancelled: bool,
}

impl TestRun {
    /// Series of the first launched prober for `host`
    pub fn series_for(&self, host: &str) -> Option<&HostSeries> {
        self.series.iter().find(|s| s.host == host)
    }

    pub fn total_attempts(&self) -> usize {
        self.series.iter().map(HostSeries::len).sum()
    }

    pub fn total_successes(&self) -> usize {
        self.series.iter().map(HostSeries::success_count).sum()
    }

    /// Hosts that were probed at least once and never replied
    pub fn unreachable_hosts(&self) -> Vec<&str> {
        self.series
            .iter()
            .filter(|s| s.is_unreachable())
            .map(|s| s.host.as_str())
            .collect()
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.completed_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(seq: usize, outcome: ProbeOutcome) -> ProbeResult {
        ProbeResult::new("192.0.2.7", seq, Local::now(), outcome)
    }

    #[test]
    fn test_latency_present_only_on_success() {
        let ok = result(0, ProbeOutcome::reply(12.345678));
        assert!(ok.success());
        assert_eq!(ok.latency_ms(), Some(12.3457));

        for outcome in [ProbeOutcome::NoReply, ProbeOutcome::error("denied")] {
            let failed = result(0, outcome);
            assert!(!failed.success());
            assert_eq!(failed.latency_ms(), None);
        }
    }

    #[test]
    fn test_reply_clamps_negative_latency() {
        assert_eq!(ProbeOutcome::reply(-0.5).latency_ms(), Some(0.0));
    }

    #[test]
    fn test_status_and_description_text() {
        let ok = result(0, ProbeOutcome::reply(10.0));
        assert_eq!(ok.status_text(), "Success (10.0000 ms)");
        assert_eq!(ok.describe(), "Ping to 192.0.2.7: Success (10.0000 ms)");

        let lost = result(1, ProbeOutcome::NoReply);
        assert_eq!(lost.status_text(), "Failed");
        assert_eq!(lost.describe(), "Ping to 192.0.2.7: Failed");

        let broken = result(2, ProbeOutcome::error("Operation not permitted"));
        assert_eq!(broken.status_text(), "Failed");
        assert_eq!(broken.describe(), "Error pinging 192.0.2.7: Operation not permitted");
    }

    #[test]
    fn test_series_sentinel_is_distinct_from_zero() {
        let mut series = HostSeries::new("192.0.2.7");
        series.push(result(0, ProbeOutcome::reply(0.0)));
        series.push(result(1, ProbeOutcome::NoReply));

        assert_eq!(series.latencies(), vec![Some(0.0), None]);
        assert_eq!(series.success_count(), 1);
        assert_eq!(series.failure_count(), 1);
        assert!(!series.is_unreachable());
    }

    #[test]
    fn test_empty_series_is_not_unreachable() {
        let series = HostSeries::with_capacity("192.0.2.7", 10);
        assert!(series.is_empty());
        assert!(!series.is_unreachable());
        assert!(series.results.capacity() >= 10);
    }

    #[test]
    fn test_event_entry_display() {
        let probe = result(0, ProbeOutcome::NoReply);
        let entry = EventLogEntry::from_result(&probe);
        let expected = format!("[{}] Ping to 192.0.2.7: Failed", probe.formatted_timestamp());
        assert_eq!(entry.to_string(), expected);
    }

    #[test]
    fn test_run_aggregates() {
        let mut up = HostSeries::new("up");
        up.push(ProbeResult::new("up", 0, Local::now(), ProbeOutcome::reply(5.0)));
        let mut down = HostSeries::new("down");
        down.push(ProbeResult::new("down", 0, Local::now(), ProbeOutcome::NoReply));

        let now = Local::now();
        let run = TestRun {
            id: Uuid::new_v4(),
            settings: RunSettings::from_config(&Config::default()),
            started_at: now,
            completed_at: now,
            series: vec![up, down, HostSeries::new("idle")],
            events: Vec::new(),
            cancelled: false,
        };

        assert_eq!(run.total_attempts(), 2);
        assert_eq!(run.total_successes(), 1);
        assert_eq!(run.unreachable_hosts(), vec!["down"]);
        assert!(run.series_for("idle").is_some());
        assert!(run.series_for("missing").is_none());
    }
}
