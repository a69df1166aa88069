//! Type definitions and aliases

use crate::stats::HostStatistics;
use serde::{Deserialize, Serialize};

// Re-export commonly used types
pub use crate::error::{AppError, Result};

/// Latency classification used for color coding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceLevel {
    /// Under 20 ms
    Excellent,
    /// 20-50 ms
    Good,
    /// 50-100 ms
    Fair,
    /// 100-250 ms
    Poor,
    /// 250 ms and above
    VeryPoor,
}

impl PerformanceLevel {
    /// Classify a round-trip time in milliseconds
    pub fn from_latency(latency_ms: f64) -> Self {
        if latency_ms < 20.0 {
            Self::Excellent
        } else if latency_ms < 50.0 {
            Self::Good
        } else if latency_ms < 100.0 {
            Self::Fair
        } else if latency_ms < 250.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
            Self::VeryPoor => "Very Poor",
        }
    }
}

/// Overall verdict for one host after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HostStatus {
    /// Every attempt got a reply
    Reachable,
    /// Some attempts were lost
    Degraded,
    /// Attempts were made and none got a reply
    Unreachable,
    /// No attempt was made
    NotProbed,
}

impl HostStatus {
    pub fn from_statistics(stats: &HostStatistics) -> Self {
        if stats.sent == 0 {
            Self::NotProbed
        } else if stats.received == 0 {
            Self::Unreachable
        } else if stats.received < stats.sent {
            Self::Degraded
        } else {
            Self::Reachable
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Reachable => "OK",
            Self::Degraded => "LOSSY",
            Self::Unreachable => "DOWN",
            Self::NotProbed => "N/A",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(sent: usize, received: usize) -> HostStatistics {
        HostStatistics {
            host: "192.0.2.1".to_string(),
            sent,
            received,
            loss_pct: 0.0,
            min_ms: None,
            avg_ms: None,
            max_ms: None,
            std_dev_ms: None,
            jitter_ms: None,
        }
    }

    #[test]
    fn test_performance_level_boundaries() {
        assert_eq!(PerformanceLevel::from_latency(0.4), PerformanceLevel::Excellent);
        assert_eq!(PerformanceLevel::from_latency(20.0), PerformanceLevel::Good);
        assert_eq!(PerformanceLevel::from_latency(99.9), PerformanceLevel::Fair);
        assert_eq!(PerformanceLevel::from_latency(100.0), PerformanceLevel::Poor);
        assert_eq!(PerformanceLevel::from_latency(1_000.0), PerformanceLevel::VeryPoor);
    }

    #[test]
    fn test_host_status() {
        assert_eq!(HostStatus::from_statistics(&stats(0, 0)), HostStatus::NotProbed);
        assert_eq!(HostStatus::from_statistics(&stats(5, 0)), HostStatus::Unreachable);
        assert_eq!(HostStatus::from_statistics(&stats(5, 3)), HostStatus::Degraded);
        assert_eq!(HostStatus::from_statistics(&stats(5, 5)), HostStatus::Reachable);
    }
}
