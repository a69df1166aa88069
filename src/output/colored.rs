//! Colored formatter implementation with terminal color support

use super::formatter::{
    align_text, format_duration, Alignment, format_failure, format_percentage, host_row, host_table_format,
    FormattingOptions, OutputFormatter, PlainFormatter,
};
use crate::{
    error::Result,
    models::{EventLogEntry, RunSettings, TestRun},
    stats::HostStatistics,
    types::{HostStatus, PerformanceLevel},
};
use colored::*;
use std::fmt::Write as _;

impl PerformanceLevel {
    /// Get color for this performance level
    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub muted: Color,
    pub border: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            info: Color::Cyan,
            muted: Color::BrightBlack,
            border: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    plain_formatter: PlainFormatter,
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    /// Create a new colored formatter with options
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    /// Create a colored formatter with custom color scheme
    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self {
            plain_formatter: PlainFormatter::new(options.clone()),
            options,
            color_scheme,
        }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    /// Bold and colored text, or plain text when colors are disabled
    fn emphasize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.bold().color(color)
        } else {
            text.normal()
        }
    }

    fn latency_colored(&self, latency_ms: Option<f64>, width: usize) -> String {
        let text = align_text(&HostStatistics::format_ms(latency_ms), width, Alignment::Right);
        match latency_ms {
            Some(ms) => self.colorize(&text, PerformanceLevel::from_latency(ms).color()).to_string(),
            None => self.colorize(&text, self.color_scheme.muted).to_string(),
        }
    }

    fn loss_colored(&self, loss_pct: f64, width: usize) -> String {
        let text = align_text(&format_percentage(loss_pct), width, Alignment::Right);
        let color = if loss_pct < 0.05 {
            self.color_scheme.success
        } else if loss_pct < 20.0 {
            self.color_scheme.warning
        } else {
            self.color_scheme.error
        };
        self.colorize(&text, color).to_string()
    }

    fn status_colored(&self, status: HostStatus, width: usize) -> String {
        let text = align_text(status.label(), width, Alignment::Center);
        let color = match status {
            HostStatus::Reachable => self.color_scheme.success,
            HostStatus::Degraded => self.color_scheme.warning,
            HostStatus::Unreachable => self.color_scheme.error,
            HostStatus::NotProbed => self.color_scheme.muted,
        };
        self.colorize(&text, color).to_string()
    }

    /// Host table with per-cell colors; widths are computed on the plain text
    fn create_colored_table(&self, stats: &[HostStatistics]) -> String {
        let format = host_table_format(false);
        let rows: Vec<Vec<String>> = stats.iter().map(host_row).collect();
        let widths: Vec<usize> = format
            .columns
            .iter()
            .enumerate()
            .map(|(idx, col)| {
                rows.iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .max()
                    .unwrap_or(0)
                    .max(col.min_width)
                    .max(col.header.len())
                    .min(col.max_width)
            })
            .collect();

        let header: Vec<String> = format
            .columns
            .iter()
            .zip(&widths)
            .map(|(col, &width)| align_text(&col.header, width, col.alignment))
            .collect();
        let total_width = widths.iter().sum::<usize>() + 2 * widths.len();

        let mut output = String::new();
        output.push_str(&self.bold(header.join("  ").trim_end()).to_string());
        output.push('\n');
        output.push_str(&self.colorize(&"-".repeat(total_width), self.color_scheme.border).to_string());

        for stat in stats {
            let cells = [
                self.colorize(&align_text(&stat.host, widths[0], Alignment::Left), self.color_scheme.info)
                    .to_string(),
                align_text(&stat.sent.to_string(), widths[1], Alignment::Right),
                align_text(&stat.received.to_string(), widths[2], Alignment::Right),
                self.loss_colored(stat.loss_pct, widths[3]),
                self.latency_colored(stat.min_ms, widths[4]),
                self.latency_colored(stat.avg_ms, widths[5]),
                self.latency_colored(stat.max_ms, widths[6]),
                self.latency_colored(stat.jitter_ms, widths[7]),
                self.status_colored(HostStatus::from_statistics(stat), widths[8]),
            ];
            output.push('\n');
            output.push_str(&cells.join("  "));
        }

        output
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let border = "=".repeat(title.len() + 4);
        Ok(format!(
            "{}\n  {}  \n{}",
            self.colorize(&border, self.color_scheme.border),
            self.emphasize(title, self.color_scheme.header),
            self.colorize(&border, self.color_scheme.border)
        ))
    }

    fn format_run_settings(&self, settings: &RunSettings) -> Result<String> {
        let mut output = String::new();
        let hosts: Vec<String> = settings
            .hosts
            .iter()
            .map(|h| self.colorize(h, self.color_scheme.info).to_string())
            .collect();

        writeln!(output, "Starting ping test to hosts: {}", hosts.join(", ")).map_err(format_failure)?;
        write!(output, "Test duration: {}", self.bold(&format_duration(settings.duration)))
            .map_err(format_failure)?;

        if self.options.verbose_mode {
            let detail = self.plain_formatter.format_run_settings(settings)?;
            for line in detail.lines().skip(2) {
                write!(output, "\n{}", self.colorize(line, self.color_scheme.muted)).map_err(format_failure)?;
            }
        }

        Ok(output)
    }

    fn format_host_table(&self, stats: &[HostStatistics]) -> Result<String> {
        if stats.is_empty() {
            return Ok(self.colorize("No hosts were probed.", self.color_scheme.muted).to_string());
        }
        Ok(self.create_colored_table(stats))
    }

    fn format_run_summary(&self, run: &TestRun) -> Result<String> {
        let plain = self.plain_formatter.format_run_summary(run)?;
        let mut output = String::new();

        for (idx, line) in plain.lines().enumerate() {
            if idx > 0 {
                output.push('\n');
            }
            match idx {
                0 => output.push_str(&self.emphasize(line, self.color_scheme.header).to_string()),
                1 => output.push_str(&self.colorize(line, self.color_scheme.border).to_string()),
                _ if line.starts_with("Unreachable:") => {
                    output.push_str(&self.colorize(line, self.color_scheme.error).to_string())
                }
                _ => output.push_str(line),
            }
        }

        Ok(output)
    }

    fn format_event_log(&self, events: &[EventLogEntry]) -> Result<String> {
        let mut output = String::new();
        write!(output, "{}", self.emphasize("Event Log:", self.color_scheme.header)).map_err(format_failure)?;
        for event in events {
            let line = event.to_string();
            let colored = if event.description.starts_with("Error pinging") {
                self.colorize(&line, self.color_scheme.error)
            } else if event.description.ends_with("Failed") {
                self.colorize(&line, self.color_scheme.warning)
            } else {
                line.normal()
            };
            write!(output, "\n{}", colored).map_err(format_failure)?;
        }
        Ok(output)
    }

    fn format_error(&self, error: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("ERROR:", self.color_scheme.error), error))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("WARNING:", self.color_scheme.warning), warning))
    }

    fn format_success(&self, message: &str) -> Result<String> {
        Ok(format!("{} {}", self.emphasize("SUCCESS:", self.color_scheme.success), message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(host: &str, sent: usize, received: usize, avg: Option<f64>) -> HostStatistics {
        HostStatistics {
            host: host.to_string(),
            sent,
            received,
            loss_pct: if sent == 0 { 0.0 } else { (sent - received) as f64 / sent as f64 * 100.0 },
            min_ms: avg,
            avg_ms: avg,
            max_ms: avg,
            std_dev_ms: avg.map(|_| 0.0),
            jitter_ms: None,
        }
    }

    #[test]
    fn test_uncolored_table_keeps_content() {
        let formatter = ColoredFormatter::new(FormattingOptions {
            enable_color: false,
            ..Default::default()
        });
        let table = formatter
            .format_host_table(&[stats("8.8.8.8", 3, 3, Some(12.0)), stats("192.0.2.1", 3, 0, None)])
            .unwrap();

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Host"));
        assert!(lines[2].contains("12.00") && lines[2].contains("OK"));
        assert!(lines[3].contains("100.0%") && lines[3].contains("DOWN"));
    }

    #[test]
    fn test_disabled_colors_emit_no_escape_codes() {
        let formatter = ColoredFormatter::new(FormattingOptions {
            enable_color: false,
            ..Default::default()
        });
        let table = formatter.format_host_table(&[stats("1.1.1.1", 2, 1, Some(30.0))]).unwrap();
        assert!(!table.contains('\x1b'));
        assert!(table.contains("LOSSY"));
    }

    #[test]
    fn test_messages_carry_prefix() {
        let formatter = ColoredFormatter::new(FormattingOptions {
            enable_color: false,
            ..Default::default()
        });
        assert!(formatter.format_warning("careful").unwrap().ends_with("careful"));
        assert_eq!(formatter.format_error("boom").unwrap(), "ERROR: boom");
    }
}
