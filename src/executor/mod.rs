//! Concurrent test execution
//!
//! A [`TestCoordinator`] launches one [`HostProber`] task per configured host,
//! waits for all of them and assembles the [`TestRun`]. Probers share nothing
//! but the probe, the sinks and the cancellation token, so a slow or failing
//! host never delays another host's schedule.

mod host;

pub use host::{HostProber, HostReport};

use crate::{
    error::AppError,
    logging::Logger,
    models::{EventLogEntry, HostSeries, RunSettings, TestRun},
    probe::Probe,
    sink::SinkSet,
};
use chrono::Local;
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Total run time and send cadence shared by every prober
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeSchedule {
    pub duration: Duration,
    pub interval: Duration,
}

impl ProbeSchedule {
    pub fn new(duration: Duration, interval: Duration) -> Self {
        Self { duration, interval }
    }

    /// Sends a prober makes when every attempt completes within the interval:
    /// one at each multiple of the interval strictly before the deadline.
    pub fn expected_samples(&self) -> usize {
        let interval = self.interval.as_nanos();
        if interval == 0 {
            return 0;
        }
        self.duration.as_nanos().div_ceil(interval) as usize
    }
}

impl From<&RunSettings> for ProbeSchedule {
    fn from(settings: &RunSettings) -> Self {
        Self::new(settings.duration, settings.interval)
    }
}

/// A finished run plus the sink errors raised while finalizing it
#[derive(Debug)]
pub struct RunReport {
    pub run: TestRun,
    pub sink_errors: Vec<AppError>,
}

/// Fans probers out over hosts and joins their results
pub struct TestCoordinator {
    probe: Arc<dyn Probe>,
    sinks: SinkSet,
    cancel: CancellationToken,
    logger: Logger,
    run_id: Uuid,
}

impl TestCoordinator {
    pub fn new(probe: Arc<dyn Probe>, sinks: SinkSet, logger: Logger) -> Self {
        Self {
            probe,
            sinks,
            cancel: CancellationToken::new(),
            logger,
            run_id: Uuid::new_v4(),
        }
    }

    /// Use an externally owned cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn with_run_id(mut self, run_id: Uuid) -> Self {
        self.run_id = run_id;
        self
    }

    /// Token that stops every prober when cancelled
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Probe every host in `settings` concurrently until the duration elapses
    /// or the run is cancelled.
    ///
    /// Series come back in launch order. A prober task that dies contributes
    /// an empty series for its host instead of failing the run. The run counts
    /// as cancelled only if cancellation cut some host's schedule short.
    pub async fn run(&self, settings: RunSettings) -> RunReport {
        let schedule = ProbeSchedule::from(&settings);
        let started_at = Local::now();

        self.logger.info("Starting test run")
            .field("run_id", self.run_id.to_string())
            .field("hosts", &settings.hosts)
            .field("duration_secs", schedule.duration.as_secs_f64())
            .field("interval_secs", schedule.interval.as_secs_f64())
            .field("expected_samples_per_host", schedule.expected_samples())
            .log();

        let mut handles = Vec::with_capacity(settings.hosts.len());
        let mut cancelled = false;
        for host in &settings.hosts {
            if self.cancel.is_cancelled() {
                cancelled = true;
                self.logger.info("Run cancelled; remaining hosts not launched")
                    .field("launched", handles.len())
                    .log();
                break;
            }

            let prober = HostProber::new(
                host.clone(),
                schedule,
                self.probe.clone(),
                self.sinks.clone(),
                self.cancel.clone(),
                self.logger.clone(),
            );
            handles.push((host.clone(), tokio::spawn(prober.run())));
        }

        let joined = join_all(
            handles
                .into_iter()
                .map(|(host, handle)| async move { (host, handle.await) }),
        )
        .await;

        let mut series = Vec::with_capacity(joined.len());
        let mut events: Vec<EventLogEntry> = Vec::new();
        for (host, outcome) in joined {
            match outcome {
                Ok(report) => {
                    cancelled |= report.cancelled;
                    events.extend(report.events);
                    series.push(report.series);
                }
                Err(e) => {
                    self.logger.error("Host prober task failed")
                        .field("host", &host)
                        .field("error", e.to_string())
                        .log();
                    series.push(HostSeries::new(host));
                }
            }
        }

        let run = TestRun {
            id: self.run_id,
            settings,
            started_at,
            completed_at: Local::now(),
            series,
            events,
            cancelled,
        };

        self.logger.info("Test run finished")
            .field("run_id", self.run_id.to_string())
            .field("attempts", run.total_attempts())
            .field("replies", run.total_successes())
            .field("cancelled", run.cancelled)
            .log();

        let sink_errors = self.sinks.finish(&run, &self.logger).await;
        RunReport { run, sink_errors }
    }
}
