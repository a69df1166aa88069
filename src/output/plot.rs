//! Terminal latency chart
//!
//! One series per host: x is the sample index, y the round-trip time. Failed
//! samples leave a gap in their column. Long series are bucketed so the chart
//! fits the configured width; a bucket shows the mean of its replies and is a
//! gap only when none of its samples got a reply.

use crate::models::TestRun;
use colored::{Color, Colorize};
use std::fmt::Write as _;

const MARKERS: &[char] = &['*', 'o', '+', 'x', '#', '@'];
const COLORS: &[Color] = &[
    Color::Green,
    Color::Cyan,
    Color::Yellow,
    Color::Magenta,
    Color::Blue,
    Color::Red,
];

/// Renders latency series as a text chart
#[derive(Debug, Clone)]
pub struct LatencyChart {
    height: usize,
    max_width: usize,
    use_color: bool,
}

impl LatencyChart {
    pub fn new(use_color: bool) -> Self {
        Self {
            height: 12,
            max_width: 72,
            use_color,
        }
    }

    /// Override plot area size; both dimensions are at least 2
    pub fn with_size(mut self, height: usize, max_width: usize) -> Self {
        self.height = height.max(2);
        self.max_width = max_width.max(2);
        self
    }

    /// Chart every series of a finished run
    pub fn render_run(&self, run: &TestRun) -> String {
        let series: Vec<(&str, Vec<Option<f64>>)> = run
            .series
            .iter()
            .map(|s| (s.host.as_str(), s.latencies()))
            .collect();
        self.render(&series)
    }

    /// Chart named series of optional latencies
    pub fn render(&self, series: &[(&str, Vec<Option<f64>>)]) -> String {
        let longest = series.iter().map(|(_, values)| values.len()).max().unwrap_or(0);
        let peak = series
            .iter()
            .flat_map(|(_, values)| values.iter().flatten())
            .cloned()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))));

        let mut out = String::new();
        let _ = writeln!(out, "Ping Test Results");

        let peak = match peak {
            Some(peak) if longest > 0 => peak,
            _ => {
                let _ = writeln!(out, "No replies recorded; nothing to plot.");
                return out;
            }
        };

        let columns = longest.min(self.max_width);
        let bucket = longest.div_ceil(columns);

        // grid[row][col] holds the index of the series drawn there; row 0 is the bottom
        let mut grid: Vec<Vec<Option<usize>>> = vec![vec![None; columns]; self.height];
        for (index, (_, values)) in series.iter().enumerate() {
            for (col, chunk) in values.chunks(bucket).enumerate() {
                if let Some(value) = bucket_mean(chunk) {
                    let row = self.row_for(value, peak);
                    grid[row][col] = Some(index);
                }
            }
        }

        let _ = writeln!(out, "Round-Trip Time (ms)");
        for row in (0..self.height).rev() {
            let label = peak * row as f64 / (self.height - 1) as f64;
            let _ = write!(out, "{:>9.2} |", label);
            for cell in &grid[row] {
                match cell {
                    Some(index) => out.push_str(&self.marker(*index)),
                    None => out.push(' '),
                }
            }
            out.push('\n');
        }

        let _ = writeln!(out, "{:>9} +{}", "", "-".repeat(columns));
        let last_label = (longest - 1).to_string();
        let gap = columns.saturating_sub(last_label.len() + 1);
        let _ = writeln!(out, "{:>9}  0{}{}", "", " ".repeat(gap), last_label);
        if bucket > 1 {
            let _ = writeln!(out, "{:>9}  Ping Count ({} samples per column)", "", bucket);
        } else {
            let _ = writeln!(out, "{:>9}  Ping Count", "");
        }

        let legend: Vec<String> = series
            .iter()
            .enumerate()
            .map(|(index, (host, _))| format!("{} {}", self.marker(index), host))
            .collect();
        let _ = writeln!(out, "Legend: {}", legend.join("   "));

        out
    }

    fn row_for(&self, value: f64, peak: f64) -> usize {
        if peak <= 0.0 {
            return 0;
        }
        let scaled = (value / peak * (self.height - 1) as f64).round() as usize;
        scaled.min(self.height - 1)
    }

    fn marker(&self, index: usize) -> String {
        let marker = MARKERS[index % MARKERS.len()].to_string();
        if self.use_color {
            marker.color(COLORS[index % COLORS.len()]).to_string()
        } else {
            marker
        }
    }
}

fn bucket_mean(chunk: &[Option<f64>]) -> Option<f64> {
    let replies: Vec<f64> = chunk.iter().flatten().cloned().collect();
    if replies.is_empty() {
        None
    } else {
        Some(replies.iter().sum::<f64>() / replies.len() as f64)
    }
}
