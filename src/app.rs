//! Main application orchestration and execution

use crate::{
    error::{AppError, Result},
    executor::{RunReport, TestCoordinator},
    logging::{Logger, LoggerFactory},
    models::{Config, RunSettings, TestRun},
    output::LatencyChart,
    probe::{IcmpProbe, Probe, ProbeSettings},
    sink::{ConsoleSink, CsvLogSink, PlotSink, SinkSet},
};
use chrono::Local;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    probe: Option<Arc<dyn Probe>>,
    run_id: Uuid,
    loggers: LoggerFactory,
}

impl App {
    /// Create a new application instance for a validated configuration
    pub fn new(config: Config) -> Self {
        let run_id = Uuid::new_v4();
        let loggers = LoggerFactory::with_session(config.clone(), run_id.to_string());
        Self {
            config,
            probe: None,
            run_id,
            loggers,
        }
    }

    /// Replace the ICMP probe, e.g. with a simulated one
    pub fn with_probe(mut self, probe: Arc<dyn Probe>) -> Self {
        self.probe = Some(probe);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Settings the run will use, before the result log path is known
    pub fn settings(&self) -> RunSettings {
        RunSettings::from_config(&self.config)
    }

    /// Probe every configured host until the duration elapses or `cancel` fires.
    ///
    /// Fails only when the result log cannot be created; everything that goes
    /// wrong once probing started is recorded in the returned report.
    pub async fn run(&self, cancel: CancellationToken) -> Result<RunReport> {
        let logger = self.loggers.create_logger("APP");
        let started_at = Local::now();
        let mut settings = self.settings();

        let mut sinks = SinkSet::new().with(Arc::new(ConsoleSink::new(self.config.enable_color)));
        if self.config.enable_log {
            let csv = CsvLogSink::create(
                &self.config.results_dir,
                started_at,
                self.loggers.create_logger("RESULT_LOG"),
            )?;
            logger.info("Writing result log")
                .field("path", csv.path().display().to_string())
                .log();
            settings = settings.with_log_path(csv.path().to_path_buf());
            sinks.push(Arc::new(csv));
        }

        let coordinator = TestCoordinator::new(self.probe(), sinks, self.loggers.create_logger("EXECUTOR"))
            .with_cancellation(cancel)
            .with_run_id(self.run_id);

        let report = coordinator.run(settings).await;
        for error in &report.sink_errors {
            logger.warn("Result sink reported a problem")
                .error_info(error)
                .log();
        }
        Ok(report)
    }

    /// Render the latency chart for a completed run, when plotting is enabled.
    ///
    /// Interrupted runs are not plotted.
    pub async fn present(&self, run: &TestRun) -> Vec<AppError> {
        if !self.config.enable_plot || run.cancelled {
            return Vec::new();
        }

        let report_sinks = SinkSet::new()
            .with(Arc::new(PlotSink::new(LatencyChart::new(self.config.enable_color))));
        report_sinks.finish(run, &self.loggers.create_logger("PLOT")).await
    }

    fn probe(&self) -> Arc<dyn Probe> {
        match &self.probe {
            Some(probe) => probe.clone(),
            None => Arc::new(IcmpProbe::new(
                ProbeSettings::from(&self.config),
                self.loggers.create_logger("ICMP"),
            )),
        }
    }
}

/// Turn a finished run into the process outcome.
///
/// With `fail_on_unreachable`, a host that never replied makes the run fail
/// with a network error. Otherwise every completed or interrupted run is a
/// success.
pub fn check_reachability(config: &Config, run: &TestRun, logger: &Logger) -> Result<()> {
    let unreachable = run.unreachable_hosts();
    if unreachable.is_empty() {
        return Ok(());
    }

    logger.warn("Hosts without a single reply")
        .field("hosts", &unreachable)
        .log();

    if config.fail_on_unreachable && !run.cancelled {
        return Err(AppError::network(format!(
            "no replies received from {}",
            unreachable.join(", ")
        )));
    }
    Ok(())
}
