//! Configuration validation utilities and rules
//!
//! `Config::validate` rejects configurations that cannot run. The checks here
//! accept the configuration but point out settings that are likely to produce
//! misleading results.

use crate::{error::Result, models::Config};
use colored::*;
use std::collections::HashSet;
use std::net::IpAddr;

/// Payloads above this size exceed a typical Ethernet MTU and get fragmented
const FRAGMENTATION_THRESHOLD: usize = 1_472;

/// Runs producing more samples than this make for a very dense chart
const DENSE_RUN_SAMPLES: f64 = 10_000.0;

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration, then collect non-fatal warnings
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        config.validate()?;

        let mut warnings = Vec::new();
        warnings.extend(Self::validate_hosts(&config.hosts));
        warnings.extend(Self::validate_timing(config));
        warnings.extend(Self::validate_packet_settings(config));

        Ok(warnings)
    }

    fn validate_hosts(hosts: &[String]) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();
        let mut seen = HashSet::new();

        for host in hosts {
            if !seen.insert(host.as_str()) {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Host '{}' is listed more than once; each entry is pinged independently", host),
                ));
            }

            match host.parse::<IpAddr>() {
                Ok(ip) if ip.is_loopback() => {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Host {} is a loopback address and only measures the local stack", ip),
                    ));
                }
                Ok(ip) if ip.is_unspecified() || ip.is_multicast() => {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Warning,
                        format!("Host {} is not a unicast address and is unlikely to reply", ip),
                    ));
                }
                Ok(_) => {}
                Err(_) => {
                    warnings.push(ValidationWarning::new(
                        ValidationLevel::Info,
                        format!("Host '{}' is a name and is resolved before every ping", host),
                    ));
                }
            }
        }

        warnings
    }

    fn validate_timing(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.duration_secs == 0.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                "Duration is 0; no pings will be sent".to_string(),
            ));
        } else if config.duration_secs < config.interval_secs {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Duration {}s is shorter than the interval {}s; each host is pinged once",
                    config.duration_secs, config.interval_secs
                ),
            ));
        }

        if config.probe_timeout_secs > config.interval_secs {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Probe timeout {}s exceeds the interval {}s; unreachable hosts get fewer samples",
                    config.probe_timeout_secs, config.interval_secs
                ),
            ));
        }

        let samples = config.duration_secs / config.interval_secs;
        if samples > DENSE_RUN_SAMPLES {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("About {:.0} pings per host will be sent; the chart will be bucketed", samples),
            ));
        }

        warnings
    }

    fn validate_packet_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.packet_size > FRAGMENTATION_THRESHOLD {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "Packet size of {} bytes exceeds {} and will be fragmented on most links",
                    config.packet_size, FRAGMENTATION_THRESHOLD
                ),
            ));
        }

        if config.ttl < 8 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("TTL of {} may expire before reaching distant hosts", config.ttl),
            ));
        }

        if config.hosts.iter().any(|h| matches!(h.parse::<IpAddr>(), Ok(IpAddr::V6(_)))) {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                "TTL is not applied to IPv6 hosts".to_string(),
            ));
        }

        warnings
    }
}

/// Severity of a validation finding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(config: &Config) -> Vec<String> {
        validate_config(config)
            .unwrap()
            .into_iter()
            .map(|w| w.message)
            .collect()
    }

    #[test]
    fn test_default_config_has_no_warnings() {
        assert!(validate_config(&Config::default()).unwrap().is_empty());
    }

    #[test]
    fn test_invalid_config_is_an_error() {
        let config = Config {
            interval_secs: 0.0,
            ..Config::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_and_named_hosts() {
        let config = Config {
            hosts: vec!["192.0.2.1".into(), "example.com".into(), "192.0.2.1".into()],
            ..Config::default()
        };
        let found = messages(&config);

        assert!(found.iter().any(|m| m.contains("listed more than once")));
        assert!(found.iter().any(|m| m.contains("'example.com' is a name")));
    }

    #[test]
    fn test_timing_warnings() {
        let config = Config {
            duration_secs: 0.5,
            interval_secs: 1.0,
            probe_timeout_secs: 2.0,
            ..Config::default()
        };
        let found = messages(&config);

        assert!(found.iter().any(|m| m.contains("pinged once")));
        assert!(found.iter().any(|m| m.contains("exceeds the interval")));
    }

    #[test]
    fn test_zero_duration_warns() {
        let config = Config {
            duration_secs: 0.0,
            ..Config::default()
        };
        assert!(messages(&config).iter().any(|m| m.contains("no pings will be sent")));
    }

    #[test]
    fn test_packet_warnings() {
        let config = Config {
            hosts: vec!["2001:db8::1".into()],
            packet_size: 4_000,
            ttl: 2,
            ..Config::default()
        };
        let found = messages(&config);

        assert!(found.iter().any(|m| m.contains("fragmented")));
        assert!(found.iter().any(|m| m.contains("TTL of 2")));
        assert!(found.iter().any(|m| m.contains("IPv6")));
    }

    #[test]
    fn test_warning_format() {
        let warning = ValidationWarning::new(ValidationLevel::Warning, "careful".to_string());
        assert_eq!(warning.format(false), "[WARNING] careful");
    }
}
