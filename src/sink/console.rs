//! Per-attempt console event stream

use super::ResultSink;
use crate::{
    error::Result,
    models::{ProbeOutcome, ProbeResult},
};
use async_trait::async_trait;
use colored::Colorize;
use std::io::Write;

/// Prints one line per attempt as soon as it completes
pub struct ConsoleSink {
    use_color: bool,
}

impl ConsoleSink {
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    /// Console line for one attempt
    pub fn format_line(&self, result: &ProbeResult) -> String {
        let line = match &result.outcome {
            ProbeOutcome::Reply { .. } => format!("Ping to {}: {}", result.host, result.status_text()),
            ProbeOutcome::NoReply => format!("Ping to {} failed.", result.host),
            ProbeOutcome::Error(cause) => format!("Error pinging {}: {}", result.host, cause),
        };

        if !self.use_color {
            return line;
        }

        match result.outcome {
            ProbeOutcome::Reply { .. } => line.green().to_string(),
            ProbeOutcome::NoReply => line.yellow().to_string(),
            ProbeOutcome::Error(_) => line.red().to_string(),
        }
    }
}

#[async_trait]
impl ResultSink for ConsoleSink {
    fn name(&self) -> &str {
        "console"
    }

    async fn record(&self, result: &ProbeResult) -> Result<()> {
        let line = self.format_line(result);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout, "{}", line)?;
        stdout.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn result(outcome: ProbeOutcome) -> ProbeResult {
        ProbeResult::new("198.51.100.4", 0, Local::now(), outcome)
    }

    #[test]
    fn test_plain_lines() {
        let sink = ConsoleSink::new(false);

        assert_eq!(
            sink.format_line(&result(ProbeOutcome::reply(9.87654))),
            "Ping to 198.51.100.4: Success (9.8765 ms)"
        );
        assert_eq!(
            sink.format_line(&result(ProbeOutcome::NoReply)),
            "Ping to 198.51.100.4 failed."
        );
        assert_eq!(
            sink.format_line(&result(ProbeOutcome::error("Network is unreachable"))),
            "Error pinging 198.51.100.4: Network is unreachable"
        );
    }

    #[test]
    fn test_colored_line_keeps_text() {
        let sink = ConsoleSink::new(true);
        let line = sink.format_line(&result(ProbeOutcome::NoReply));
        assert!(line.contains("Ping to 198.51.100.4 failed."));
    }

    #[tokio::test]
    async fn test_record_writes_without_error() {
        let sink = ConsoleSink::new(false);
        assert!(sink.record(&result(ProbeOutcome::NoReply)).await.is_ok());
    }
}
