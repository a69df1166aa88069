//! Output formatting and display system
//!
//! This module provides a flexible output formatting system for test results,
//! supporting both colored and plain text output with table formatting, plus
//! the terminal latency chart.

mod colored;
mod formatter;
pub mod plot;

pub use colored::{ColorScheme, ColoredFormatter};
pub use formatter::{
    format_duration, format_percentage, Alignment, Column, FormattingOptions, OutputFormatter,
    PlainFormatter, RowData, TableFormat,
};
pub use plot::LatencyChart;

use crate::{
    error::Result,
    models::{RunSettings, TestRun},
    stats::HostStatistics,
};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
            table_borders: !enable_color,
            max_width: 120,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }

    /// Create a plain text formatter for scripts/logs
    pub fn create_plain_formatter() -> Box<dyn OutputFormatter> {
        Self::create_formatter(false, false)
    }
}

/// Main output coordinator that handles all result display
pub struct OutputCoordinator {
    formatter: Box<dyn OutputFormatter>,
    show_events: bool,
}

impl OutputCoordinator {
    /// Create a new output coordinator with the specified formatter
    pub fn new(formatter: Box<dyn OutputFormatter>) -> Self {
        Self {
            formatter,
            show_events: false,
        }
    }

    /// Also print the merged event log after a run
    pub fn with_event_log(mut self, show_events: bool) -> Self {
        self.show_events = show_events;
        self
    }

    /// Banner printed before probing starts
    pub fn display_start(&self, settings: &RunSettings) -> Result<String> {
        self.formatter.format_run_settings(settings)
    }

    /// Complete post-run report: header, statistics table and summary
    pub fn display_results(&self, run: &TestRun) -> Result<String> {
        let mut output = String::new();

        output.push_str(&self.formatter.format_header("Ping Statistics")?);
        output.push_str("\n\n");

        output.push_str(&self.formatter.format_host_table(&HostStatistics::for_run(run))?);
        output.push_str("\n\n");

        output.push_str(&self.formatter.format_run_summary(run)?);

        if self.show_events && !run.events.is_empty() {
            output.push_str("\n\n");
            output.push_str(&self.formatter.format_event_log(&run.events)?);
        }

        Ok(output)
    }

    pub fn display_error(&self, message: &str) -> Result<String> {
        self.formatter.format_error(message)
    }

    pub fn display_warning(&self, message: &str) -> Result<String> {
        self.formatter.format_warning(message)
    }

    pub fn display_success(&self, message: &str) -> Result<String> {
        self.formatter.format_success(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EventLogEntry, HostSeries, ProbeOutcome, ProbeResult};
    use chrono::Local;
    use std::time::Duration;
    use uuid::Uuid;

    fn run() -> TestRun {
        let mut series = HostSeries::new("192.0.2.1");
        series.push(ProbeResult::new("192.0.2.1", 0, Local::now(), ProbeOutcome::reply(8.0)));
        series.push(ProbeResult::new("192.0.2.1", 1, Local::now(), ProbeOutcome::NoReply));
        let events = series.results.iter().map(EventLogEntry::from_result).collect();

        TestRun {
            id: Uuid::new_v4(),
            settings: RunSettings {
                hosts: vec!["192.0.2.1".to_string()],
                duration: Duration::from_secs(2),
                interval: Duration::from_secs(1),
                packet_size: 32,
                ttl: 64,
                probe_timeout: Duration::from_secs(1),
                log_path: None,
            },
            started_at: Local::now(),
            completed_at: Local::now(),
            series: vec![series],
            events,
            cancelled: false,
        }
    }

    #[test]
    fn test_display_results_plain() {
        let coordinator = OutputCoordinator::new(OutputFormatterFactory::create_plain_formatter());
        let output = coordinator.display_results(&run()).unwrap();

        assert!(output.contains("Ping Statistics"));
        assert!(output.contains("192.0.2.1"));
        assert!(output.contains("50.0%"));
        assert!(output.contains("Attempts:      2"));
        assert!(!output.contains("Event Log:"));
    }

    #[test]
    fn test_event_log_when_requested() {
        let coordinator = OutputCoordinator::new(OutputFormatterFactory::create_plain_formatter())
            .with_event_log(true);
        let output = coordinator.display_results(&run()).unwrap();

        assert!(output.contains("Event Log:"));
        assert!(output.contains("Ping to 192.0.2.1: Success (8.0000 ms)"));
        assert!(output.contains("Ping to 192.0.2.1: Failed"));
    }
}
