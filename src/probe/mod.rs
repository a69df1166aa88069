//! Probe primitive: one echo request, one outcome
//!
//! A [`Probe`] sends exactly one request per call and never retries. Every
//! failure mode is returned as a [`ProbeOutcome`] value, so the caller's loop
//! cannot be interrupted by a single bad attempt.

pub mod icmp;

pub use icmp::IcmpProbe;

use crate::models::{Config, ProbeOutcome};
use async_trait::async_trait;
use std::time::Duration;

/// Sends a single echo request to a host
#[async_trait]
pub trait Probe: Send + Sync {
    /// Probe `host` once; `seq` is the zero-based attempt index for that host
    async fn probe(&self, host: &str, seq: u16) -> ProbeOutcome;
}

/// Wire parameters applied to every request
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbeSettings {
    /// ICMP payload length in bytes
    pub packet_size: usize,
    /// IPv4 time-to-live
    pub ttl: u8,
    /// Maximum wait for the matching reply
    pub timeout: Duration,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            packet_size: crate::defaults::DEFAULT_PACKET_SIZE,
            ttl: crate::defaults::DEFAULT_TTL,
            timeout: crate::defaults::DEFAULT_PROBE_TIMEOUT,
        }
    }
}

impl From<&Config> for ProbeSettings {
    fn from(config: &Config) -> Self {
        Self {
            packet_size: config.packet_size,
            ttl: config.ttl,
            timeout: config.probe_timeout(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_settings_from_config() {
        let config = Config {
            packet_size: 56,
            ttl: 12,
            probe_timeout_secs: 2.5,
            ..Default::default()
        };

        let settings = ProbeSettings::from(&config);
        assert_eq!(settings.packet_size, 56);
        assert_eq!(settings.ttl, 12);
        assert_eq!(settings.timeout, Duration::from_millis(2500));
    }

    #[test]
    fn test_default_probe_settings() {
        let settings = ProbeSettings::default();
        assert_eq!(settings.packet_size, 32);
        assert_eq!(settings.ttl, 64);
        assert_eq!(settings.timeout, Duration::from_secs(1));
    }
}
