//! CSV result log with a single dedicated writer
//!
//! Probers push rows into an unbounded queue; one blocking writer thread owns
//! the file and writes and flushes each row before taking the next, so rows
//! from concurrent hosts never interleave and a crash loses at most the row in
//! flight.

use super::ResultSink;
use crate::{
    error::{AppError, Result},
    logging::Logger,
    models::{ProbeResult, TestRun},
};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};

/// File name pattern of a run's log, derived from its start time
const LOG_FILE_FORMAT: &str = "%Y-%m-%d_%H-%M-%S.csv";

enum WriterCommand {
    Row([String; 3]),
    Flush(oneshot::Sender<()>),
}

/// Appends `timestamp,host,status` rows to a per-run CSV file
pub struct CsvLogSink {
    path: PathBuf,
    tx: mpsc::UnboundedSender<WriterCommand>,
    failed_rows: Arc<AtomicUsize>,
}

impl CsvLogSink {
    /// Create the results directory if needed, open a fresh log file named
    /// after `started_at` and start the writer.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn create(results_dir: &Path, started_at: DateTime<Local>, logger: Logger) -> Result<Self> {
        fs::create_dir_all(results_dir).map_err(|e| {
            AppError::io(format!("Cannot create results directory '{}': {}", results_dir.display(), e))
        })?;

        let path = results_dir.join(Self::file_name(started_at));
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| AppError::io(format!("Cannot open log file '{}': {}", path.display(), e)))?;

        Ok(Self::spawn_writer(path, file, logger))
    }

    /// Log file name for a run started at `started_at`
    pub fn file_name(started_at: DateTime<Local>) -> String {
        started_at.format(LOG_FILE_FORMAT).to_string()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows the writer could not persist so far
    pub fn failed_rows(&self) -> usize {
        self.failed_rows.load(Ordering::SeqCst)
    }

    fn spawn_writer(path: PathBuf, file: File, logger: Logger) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel::<WriterCommand>();
        let failed_rows = Arc::new(AtomicUsize::new(0));
        let failures = failed_rows.clone();
        let display_path = path.display().to_string();

        tokio::task::spawn_blocking(move || {
            let mut writer = csv::WriterBuilder::new()
                .has_headers(false)
                .from_writer(file);

            while let Some(command) = rx.blocking_recv() {
                match command {
                    WriterCommand::Row(row) => {
                        let written = writer
                            .write_record(&row)
                            .and_then(|_| writer.flush().map_err(csv::Error::from));
                        if let Err(e) = written {
                            failures.fetch_add(1, Ordering::SeqCst);
                            logger.error("Failed to append to result log")
                                .field("path", &display_path)
                                .field("host", &row[1])
                                .error_info(&AppError::from(e))
                                .log();
                        }
                    }
                    WriterCommand::Flush(done) => {
                        if let Err(e) = writer.flush() {
                            failures.fetch_add(1, Ordering::SeqCst);
                            logger.error("Failed to flush result log")
                                .field("path", &display_path)
                                .field("error", e.to_string())
                                .log();
                        }
                        let _ = done.send(());
                    }
                }
            }
        });

        Self { path, tx, failed_rows }
    }

    /// Wait until every row queued so far has been written
    pub async fn flush(&self) -> Result<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(WriterCommand::Flush(done_tx))
            .map_err(|_| AppError::log_write("result log writer has stopped"))?;
        done_rx
            .await
            .map_err(|_| AppError::log_write("result log writer stopped before flushing"))
    }
}

#[async_trait]
impl ResultSink for CsvLogSink {
    fn name(&self) -> &str {
        "csv-log"
    }

    async fn record(&self, result: &ProbeResult) -> Result<()> {
        let row = [result.formatted_timestamp(), result.host.clone(), result.status_text()];
        self.tx
            .send(WriterCommand::Row(row))
            .map_err(|_| AppError::log_write(format!("result log writer for '{}' has stopped", self.path.display())))
    }

    async fn finish(&self, _run: &TestRun) -> Result<()> {
        self.flush().await?;
        match self.failed_rows() {
            0 => Ok(()),
            n => Err(AppError::log_write(format!(
                "{} row(s) could not be written to '{}'",
                n,
                self.path.display()
            ))),
        }
    }
}
