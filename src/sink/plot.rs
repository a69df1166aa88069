//! Renders the latency chart once the run is complete

use super::ResultSink;
use crate::{
    error::Result,
    models::{ProbeResult, TestRun},
    output::LatencyChart,
};
use async_trait::async_trait;
use std::io::Write;

/// Prints a [`LatencyChart`] of the finished run to stdout
pub struct PlotSink {
    chart: LatencyChart,
}

impl PlotSink {
    pub fn new(chart: LatencyChart) -> Self {
        Self { chart }
    }
}

#[async_trait]
impl ResultSink for PlotSink {
    fn name(&self) -> &str {
        "plot"
    }

    async fn record(&self, _result: &ProbeResult) -> Result<()> {
        Ok(())
    }

    async fn finish(&self, run: &TestRun) -> Result<()> {
        let rendered = self.chart.render_run(run);
        let mut stdout = std::io::stdout().lock();
        writeln!(stdout)?;
        write!(stdout, "{}", rendered)?;
        stdout.flush()?;
        Ok(())
    }
}
