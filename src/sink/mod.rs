//! Result sinks: consumers of probe results that never influence probing
//!
//! Sinks receive each [`ProbeResult`] as soon as its attempt completes and the
//! finished [`TestRun`] once every prober is done. A failing sink is reported
//! through the logger as a log write error and the run carries on.

mod console;
mod csv_log;
mod plot;

pub use console::ConsoleSink;
pub use csv_log::CsvLogSink;
pub use plot::PlotSink;

use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{ProbeResult, TestRun},
};
use async_trait::async_trait;
use std::sync::Arc;

/// Consumer of streaming and final results
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Short name used in diagnostics
    fn name(&self) -> &str;

    /// Called once per attempt, right after it completes
    async fn record(&self, result: &ProbeResult) -> Result<()>;

    /// Called once after all probers finished
    async fn finish(&self, _run: &TestRun) -> Result<()> {
        Ok(())
    }
}

/// Ordered collection of sinks fed by every prober
#[derive(Clone, Default)]
pub struct SinkSet {
    sinks: Vec<Arc<dyn ResultSink>>,
}

impl SinkSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, sink: Arc<dyn ResultSink>) {
        self.sinks.push(sink);
    }

    pub fn with(mut self, sink: Arc<dyn ResultSink>) -> Self {
        self.push(sink);
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }

    /// Hand one result to every sink; returns the failures, already logged
    pub async fn record(&self, result: &ProbeResult, logger: &Logger) -> Vec<AppError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.record(result).await {
                report_failure(logger, sink.name(), &result.host, &e);
                failures.push(e);
            }
        }
        failures
    }

    /// Finalize every sink; returns the failures, already logged
    pub async fn finish(&self, run: &TestRun, logger: &Logger) -> Vec<AppError> {
        let mut failures = Vec::new();
        for sink in &self.sinks {
            if let Err(e) = sink.finish(run).await {
                logger.error("Result sink failed to finish")
                    .field("sink", sink.name())
                    .error_info(&e)
                    .log();
                failures.push(e);
            }
        }
        failures
    }
}

fn report_failure(logger: &Logger, sink: &str, host: &str, error: &AppError) {
    logger.error("Result sink rejected a probe result")
        .field("sink", sink)
        .field("host", host)
        .error_info(error)
        .log();
}
