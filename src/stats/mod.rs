//! Per-host latency statistics

use crate::models::{HostSeries, TestRun};
use serde::{Deserialize, Serialize};

/// Summary of one host's series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostStatistics {
    pub host: String,
    /// Attempts made
    pub sent: usize,
    /// Attempts that got a reply
    pub received: usize,
    /// Share of attempts without a reply, 0.0-100.0
    pub loss_pct: f64,
    pub min_ms: Option<f64>,
    pub avg_ms: Option<f64>,
    pub max_ms: Option<f64>,
    /// Population standard deviation of the replies
    pub std_dev_ms: Option<f64>,
    /// Mean absolute difference between consecutive replies
    pub jitter_ms: Option<f64>,
}

impl HostStatistics {
    /// Calculate statistics from a host series
    pub fn from_series(series: &HostSeries) -> Self {
        let sent = series.len();
        let latencies = series.successful_latencies();
        let received = latencies.len();

        let loss_pct = if sent == 0 {
            0.0
        } else {
            (sent - received) as f64 / sent as f64 * 100.0
        };

        if latencies.is_empty() {
            return Self {
                host: series.host.clone(),
                sent,
                received,
                loss_pct,
                min_ms: None,
                avg_ms: None,
                max_ms: None,
                std_dev_ms: None,
                jitter_ms: None,
            };
        }

        let count = received as f64;
        let avg = latencies.iter().sum::<f64>() / count;
        let min = latencies.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = latencies.iter().cloned().fold(f64::NEG_INFINITY, f64::max);

        let variance = latencies
            .iter()
            .map(|&x| (x - avg).powi(2))
            .sum::<f64>()
            / count;

        let jitter = if received > 1 {
            let diffs: f64 = latencies.windows(2).map(|w| (w[1] - w[0]).abs()).sum();
            Some(diffs / (received - 1) as f64)
        } else {
            None
        };

        Self {
            host: series.host.clone(),
            sent,
            received,
            loss_pct,
            min_ms: Some(min),
            avg_ms: Some(avg),
            max_ms: Some(max),
            std_dev_ms: Some(variance.sqrt()),
            jitter_ms: jitter,
        }
    }

    /// Statistics for every series of a run, in launch order
    pub fn for_run(run: &TestRun) -> Vec<Self> {
        run.series.iter().map(Self::from_series).collect()
    }

    /// Format an optional millisecond value for display
    pub fn format_ms(value: Option<f64>) -> String {
        match value {
            Some(ms) => format!("{:.2}", ms),
            None => "-".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ProbeOutcome, ProbeResult};
    use chrono::Local;

    fn series(outcomes: Vec<ProbeOutcome>) -> HostSeries {
        let mut series = HostSeries::new("203.0.113.9");
        for (seq, outcome) in outcomes.into_iter().enumerate() {
            series.push(ProbeResult::new("203.0.113.9", seq, Local::now(), outcome));
        }
        series
    }

    #[test]
    fn test_basic_statistics() {
        let stats = HostStatistics::from_series(&series(vec![
            ProbeOutcome::reply(10.0),
            ProbeOutcome::NoReply,
            ProbeOutcome::reply(20.0),
            ProbeOutcome::reply(30.0),
        ]));

        assert_eq!(stats.sent, 4);
        assert_eq!(stats.received, 3);
        assert!((stats.loss_pct - 25.0).abs() < 1e-9);
        assert_eq!(stats.min_ms, Some(10.0));
        assert_eq!(stats.max_ms, Some(30.0));
        assert!((stats.avg_ms.unwrap() - 20.0).abs() < 1e-9);
        assert!((stats.std_dev_ms.unwrap() - 8.16496580927726).abs() < 1e-9);
        assert!((stats.jitter_ms.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_all_failed_has_no_latency_figures() {
        let stats = HostStatistics::from_series(&series(vec![
            ProbeOutcome::NoReply,
            ProbeOutcome::error("denied"),
        ]));

        assert_eq!(stats.received, 0);
        assert!((stats.loss_pct - 100.0).abs() < 1e-9);
        assert_eq!(stats.avg_ms, None);
        assert_eq!(stats.jitter_ms, None);
    }

    #[test]
    fn test_empty_series() {
        let stats = HostStatistics::from_series(&HostSeries::new("idle"));
        assert_eq!(stats.sent, 0);
        assert_eq!(stats.loss_pct, 0.0);
        assert_eq!(stats.min_ms, None);
    }

    #[test]
    fn test_single_reply_has_no_jitter() {
        let stats = HostStatistics::from_series(&series(vec![ProbeOutcome::reply(4.0)]));
        assert_eq!(stats.std_dev_ms, Some(0.0));
        assert_eq!(stats.jitter_ms, None);
    }

    #[test]
    fn test_format_ms() {
        assert_eq!(HostStatistics::format_ms(Some(1.23456)), "1.23");
        assert_eq!(HostStatistics::format_ms(None), "-");
    }
}
