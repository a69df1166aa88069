//! Timed probe loop for a single host

use super::ProbeSchedule;
use crate::{
    logging::Logger,
    models::{EventLogEntry, HostSeries, ProbeOutcome, ProbeResult},
    probe::Probe,
    sink::SinkSet,
};
use chrono::Local;
use std::sync::Arc;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;

/// Everything one prober collected, handed to the coordinator on completion
#[derive(Debug, Clone)]
pub struct HostReport {
    pub series: HostSeries,
    pub events: Vec<EventLogEntry>,
    /// True when cancellation cut the schedule short
    pub cancelled: bool,
}

/// Owns the probe loop of exactly one host.
///
/// Sends are scheduled at a fixed cadence measured from each send's start.
/// The loop ends at the deadline or on cancellation, whichever comes first;
/// cancellation is observed before every send, during the attempt and while
/// waiting for the next one. An attempt interrupted by cancellation is
/// discarded; samples completed before that point are always returned.
pub struct HostProber {
    host: String,
    schedule: ProbeSchedule,
    probe: Arc<dyn Probe>,
    sinks: SinkSet,
    cancel: CancellationToken,
    logger: Logger,
}

impl HostProber {
    pub fn new(
        host: impl Into<String>,
        schedule: ProbeSchedule,
        probe: Arc<dyn Probe>,
        sinks: SinkSet,
        cancel: CancellationToken,
        logger: Logger,
    ) -> Self {
        Self {
            host: host.into(),
            schedule,
            probe,
            sinks,
            cancel,
            logger,
        }
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Run the loop to completion
    pub async fn run(self) -> HostReport {
        let now = Instant::now();
        let deadline = now.checked_add(self.schedule.duration).unwrap_or(now);
        let expected = self.schedule.expected_samples();
        let mut series = HostSeries::with_capacity(self.host.clone(), expected);
        let mut events = Vec::with_capacity(series.results.capacity());

        self.logger.debug("Host prober started")
            .field("host", &self.host)
            .field("expected_samples", expected)
            .log();

        let mut cancelled = false;
        loop {
            if self.cancel.is_cancelled() {
                cancelled = true;
                break;
            }

            let start = Instant::now();
            if start >= deadline {
                break;
            }

            let seq = series.len();
            let timestamp = Local::now();
            // ICMP sequence numbers are 16 bits and wrap on long runs
            let outcome = tokio::select! {
                outcome = self.probe.probe(&self.host, seq as u16) => outcome,
                _ = self.cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
            };
            self.log_outcome(seq, &outcome);

            let result = ProbeResult::new(self.host.clone(), seq, timestamp, outcome);
            events.push(EventLogEntry::from_result(&result));
            self.sinks.record(&result, &self.logger).await;
            series.push(result);

            let next_send = match start.checked_add(self.schedule.interval) {
                Some(next) if next < deadline => next,
                _ => break,
            };

            tokio::select! {
                _ = sleep_until(next_send) => {}
                _ = self.cancel.cancelled() => {
                    cancelled = true;
                    break;
                }
            }
        }

        self.logger.debug("Host prober finished")
            .field("host", &self.host)
            .field("samples", series.len())
            .field("cancelled", cancelled)
            .log();

        HostReport { series, events, cancelled }
    }

    fn log_outcome(&self, seq: usize, outcome: &ProbeOutcome) {
        match outcome {
            ProbeOutcome::Reply { latency_ms } => {
                self.logger.trace("Echo reply")
                    .field("host", &self.host)
                    .field("seq", seq)
                    .field("latency_ms", latency_ms)
                    .log();
            }
            ProbeOutcome::NoReply => {
                self.logger.debug("No reply before timeout")
                    .field("host", &self.host)
                    .field("seq", seq)
                    .log();
            }
            ProbeOutcome::Error(cause) => {
                self.logger.warn("Probe attempt failed")
                    .field("host", &self.host)
                    .field("seq", seq)
                    .field("error", cause)
                    .log();
            }
        }
    }
}
