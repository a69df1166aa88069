//! Core formatting traits and implementations
//!
//! This module defines the output formatting interface and provides
//! a plain text implementation with table formatting capabilities.

use crate::{
    error::{AppError, Result},
    models::{EventLogEntry, RunSettings, TestRun},
    stats::HostStatistics,
    types::HostStatus,
};
use std::fmt::Write as _;
use std::time::Duration;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a header section
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the parameters a run starts with
    fn format_run_settings(&self, settings: &RunSettings) -> Result<String>;

    /// Format per-host statistics as a table
    fn format_host_table(&self, stats: &[HostStatistics]) -> Result<String>;

    /// Format totals of a finished run
    fn format_run_summary(&self, run: &TestRun) -> Result<String>;

    /// Format the merged event log
    fn format_event_log(&self, events: &[EventLogEntry]) -> Result<String>;

    /// Format error messages
    fn format_error(&self, error: &str) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;

    /// Format success messages
    fn format_success(&self, message: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Enable verbose mode with detailed information
    pub verbose_mode: bool,
    /// Show table borders
    pub table_borders: bool,
    /// Maximum output width
    pub max_width: usize,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
            table_borders: true,
            max_width: 120,
        }
    }
}

/// Table formatting configuration
#[derive(Debug, Clone)]
pub struct TableFormat {
    pub columns: Vec<Column>,
    pub show_borders: bool,
    pub show_header: bool,
}

/// Column definition for table formatting
#[derive(Debug, Clone)]
pub struct Column {
    pub header: String,
    pub alignment: Alignment,
    pub min_width: usize,
    pub max_width: usize,
}

impl Column {
    pub fn new(header: &str, alignment: Alignment, min_width: usize, max_width: usize) -> Self {
        Self {
            header: header.to_string(),
            alignment,
            min_width,
            max_width,
        }
    }
}

/// Text alignment options
#[derive(Debug, Clone, Copy)]
pub enum Alignment {
    Left,
    Right,
    Center,
}

/// Row data for table formatting
pub type RowData = Vec<String>;

pub(super) fn format_failure(e: std::fmt::Error) -> AppError {
    AppError::internal(format!("Failed to format output: {}", e))
}

/// Columns of the per-host statistics table
pub(super) fn host_table_format(show_borders: bool) -> TableFormat {
    TableFormat {
        columns: vec![
            Column::new("Host", Alignment::Left, 8, 40),
            Column::new("Sent", Alignment::Right, 4, 8),
            Column::new("Recv", Alignment::Right, 4, 8),
            Column::new("Loss", Alignment::Right, 6, 8),
            Column::new("Min ms", Alignment::Right, 6, 12),
            Column::new("Avg ms", Alignment::Right, 6, 12),
            Column::new("Max ms", Alignment::Right, 6, 12),
            Column::new("Jitter", Alignment::Right, 6, 12),
            Column::new("Status", Alignment::Center, 6, 8),
        ],
        show_borders,
        show_header: true,
    }
}

pub(super) fn host_row(stats: &HostStatistics) -> RowData {
    vec![
        stats.host.clone(),
        stats.sent.to_string(),
        stats.received.to_string(),
        format_percentage(stats.loss_pct),
        HostStatistics::format_ms(stats.min_ms),
        HostStatistics::format_ms(stats.avg_ms),
        HostStatistics::format_ms(stats.max_ms),
        HostStatistics::format_ms(stats.jitter_ms),
        HostStatus::from_statistics(stats).label().to_string(),
    ]
}

/// Format a run length in human-readable form
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs_f64();
    if secs < 60.0 {
        format!("{} seconds", trim_float(secs))
    } else {
        let minutes = (secs / 60.0) as u64;
        let rest = secs - minutes as f64 * 60.0;
        if rest < 0.05 {
            format!("{}m", minutes)
        } else {
            format!("{}m{:.1}s", minutes, rest)
        }
    }
}

/// Format percentage with appropriate precision
pub fn format_percentage(percentage: f64) -> String {
    if percentage >= 99.95 {
        "100.0%".to_string()
    } else if percentage < 0.05 {
        "0.0%".to_string()
    } else {
        format!("{:.1}%", percentage)
    }
}

fn trim_float(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as u64)
    } else {
        format!("{}", value)
    }
}

/// Plain text formatter implementation
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    /// Create a new plain formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    /// Create a table with the given format and data
    pub(super) fn create_table(&self, format: &TableFormat, rows: &[RowData]) -> String {
        if rows.is_empty() {
            return String::new();
        }

        let column_widths = self.calculate_column_widths(format, rows);
        let mut output = String::new();

        if format.show_header && !format.columns.is_empty() {
            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }

            let headers: Vec<String> = format.columns.iter().map(|c| c.header.clone()).collect();
            output.push_str(&self.create_row(&headers, &column_widths, format));
            output.push('\n');

            if format.show_borders {
                output.push_str(&self.create_horizontal_border(&column_widths));
                output.push('\n');
            }
        }

        for row in rows {
            output.push_str(&self.create_row(row, &column_widths, format));
            output.push('\n');
        }

        if format.show_borders {
            output.push_str(&self.create_horizontal_border(&column_widths));
        }

        output
    }

    /// Calculate column widths from headers and content within each column's bounds
    fn calculate_column_widths(&self, format: &TableFormat, rows: &[RowData]) -> Vec<usize> {
        format
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                let content = rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0);
                content
                    .max(col.min_width)
                    .max(col.header.len())
                    .min(col.max_width)
            })
            .collect()
    }

    fn create_row(&self, data: &[String], widths: &[usize], format: &TableFormat) -> String {
        let mut row = String::new();

        if format.show_borders {
            row.push('|');
        }

        for (idx, (cell, &width)) in data.iter().zip(widths.iter()).enumerate() {
            let alignment = format
                .columns
                .get(idx)
                .map(|c| c.alignment)
                .unwrap_or(Alignment::Left);

            if format.show_borders {
                row.push(' ');
            }
            row.push_str(&align_text(cell, width, alignment));
            if format.show_borders {
                row.push_str(" |");
            } else {
                row.push_str("  ");
            }
        }

        row.trim_end().to_string()
    }

    fn create_horizontal_border(&self, widths: &[usize]) -> String {
        let mut border = String::from("+");
        for &width in widths {
            border.push_str(&"-".repeat(width + 2));
            border.push('+');
        }
        border
    }
}

/// Align text within specified width, truncating overlong text
pub(super) fn align_text(text: &str, width: usize, alignment: Alignment) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.chars().take(width).collect();
    }

    let padding = width - len;
    match alignment {
        Alignment::Left => format!("{}{}", text, " ".repeat(padding)),
        Alignment::Right => format!("{}{}", " ".repeat(padding), text),
        Alignment::Center => {
            let left_pad = padding / 2;
            let right_pad = padding - left_pad;
            format!("{}{}{}", " ".repeat(left_pad), text, " ".repeat(right_pad))
        }
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let mut output = String::new();
        let border = "=".repeat(title.len() + 4);

        writeln!(output, "{}", border).map_err(format_failure)?;
        writeln!(output, "  {}  ", title).map_err(format_failure)?;
        write!(output, "{}", border).map_err(format_failure)?;

        Ok(output)
    }

    fn format_run_settings(&self, settings: &RunSettings) -> Result<String> {
        let mut output = String::new();

        writeln!(output, "Starting ping test to hosts: {}", settings.hosts.join(", "))
            .map_err(format_failure)?;
        write!(output, "Test duration: {}", format_duration(settings.duration))
            .map_err(format_failure)?;

        if self.options.verbose_mode {
            writeln!(output).map_err(format_failure)?;
            writeln!(output, "Interval:      {}", format_duration(settings.interval))
                .map_err(format_failure)?;
            writeln!(output, "Packet size:   {} bytes", settings.packet_size)
                .map_err(format_failure)?;
            writeln!(output, "TTL:           {}", settings.ttl).map_err(format_failure)?;
            write!(output, "Probe timeout: {}", format_duration(settings.probe_timeout))
                .map_err(format_failure)?;
            if let Some(path) = &settings.log_path {
                write!(output, "\nResult log:    {}", path.display()).map_err(format_failure)?;
            }
        }

        Ok(output)
    }

    fn format_host_table(&self, stats: &[HostStatistics]) -> Result<String> {
        if stats.is_empty() {
            return Ok("No hosts were probed.".to_string());
        }
        let rows: Vec<RowData> = stats.iter().map(host_row).collect();
        Ok(self.create_table(&host_table_format(self.options.table_borders), &rows))
    }

    fn format_run_summary(&self, run: &TestRun) -> Result<String> {
        let mut output = String::new();
        let attempts = run.total_attempts();
        let replies = run.total_successes();
        let success_rate = if attempts == 0 {
            0.0
        } else {
            replies as f64 / attempts as f64 * 100.0
        };

        writeln!(output, "Run Summary:").map_err(format_failure)?;
        writeln!(output, "------------").map_err(format_failure)?;
        writeln!(output, "Run ID:        {}", run.id).map_err(format_failure)?;
        writeln!(
            output,
            "Elapsed:       {:.1}s",
            run.elapsed().num_milliseconds() as f64 / 1000.0
        )
        .map_err(format_failure)?;
        writeln!(output, "Attempts:      {}", attempts).map_err(format_failure)?;
        write!(
            output,
            "Replies:       {} ({})",
            replies,
            format_percentage(success_rate)
        )
        .map_err(format_failure)?;

        let unreachable = run.unreachable_hosts();
        if !unreachable.is_empty() {
            write!(output, "\nUnreachable:   {}", unreachable.join(", ")).map_err(format_failure)?;
        }
        if let Some(path) = &run.settings.log_path {
            write!(output, "\nResult log:    {}", path.display()).map_err(format_failure)?;
        }

        Ok(output)
    }

    fn format_event_log(&self, events: &[EventLogEntry]) -> Result<String> {
        let mut output = String::new();
        writeln!(output, "Event Log:").map_err(format_failure)?;
        write!(output, "----------").map_err(format_failure)?;
        for event in events {
            write!(output, "\n{}", event).map_err(format_failure)?;
        }
        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("ERROR: {}", error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("WARNING: {}", warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("SUCCESS: {}", message))
    }
}
