//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::logging::LogLevel;
use crate::models::config::{MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists; variables already set in the environment win
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Network Connectivity Tester Configuration
#
# Values here act as defaults and are overridden by command-line arguments.

# Hosts to ping (comma-separated IP addresses or hostnames)
# HOSTS=8.8.8.8,1.1.1.1

# Test duration in seconds (fractional values allowed)
# DURATION=30

# Seconds between pings to the same host
# INTERVAL=1

# ICMP payload size in bytes
# PACKET_SIZE=32

# IPv4 time-to-live
# TTL=64

# Seconds to wait for each reply
# PROBE_TIMEOUT=1

# Write one CSV row per ping (true/false)
# ENABLE_LOG=true

# Directory receiving the CSV logs
# RESULTS_DIR=results

# Diagnostic log level: trace, debug, info, warn, error
# LOG_LEVEL=warn

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Example: a long, dense run against a gateway
# HOSTS=192.168.1.1
# DURATION=600
# INTERVAL=0.2
"#
        .to_string()
    }

    /// Validate environment variable format before parsing
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "HOSTS" => {
                if value.split(',').all(|h| h.trim().is_empty()) {
                    return Err(AppError::config("HOSTS must name at least one host"));
                }
            }
            "DURATION" => {
                let secs: f64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid DURATION value '{}': {}", value, e)))?;
                if !secs.is_finite() || secs < 0.0 {
                    return Err(AppError::config(format!("DURATION must be zero or positive, got: {}", value)));
                }
            }
            "INTERVAL" => {
                let secs: f64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if !secs.is_finite() || !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
                    return Err(AppError::config(format!(
                        "INTERVAL must be between {} and {} seconds, got: {}",
                        MIN_INTERVAL_SECS, MAX_INTERVAL_SECS, value
                    )));
                }
            }
            "PROBE_TIMEOUT" => {
                let secs: f64 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
                if !secs.is_finite() || secs <= 0.0 {
                    return Err(AppError::config(format!("{} must be greater than 0, got: {}", key, value)));
                }
            }
            "PACKET_SIZE" => {
                value
                    .parse::<usize>()
                    .map_err(|e| AppError::config(format!("Invalid PACKET_SIZE value '{}': {}", value, e)))?;
            }
            "TTL" => {
                let ttl: u8 = value
                    .parse()
                    .map_err(|e| AppError::config(format!("Invalid TTL value '{}': {}", value, e)))?;
                if ttl == 0 {
                    return Err(AppError::config("TTL must be between 1 and 255, got: 0"));
                }
            }
            "ENABLE_LOG" | "ENABLE_COLOR" => {
                value
                    .parse::<bool>()
                    .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", key, value, e)))?;
            }
            "LOG_LEVEL" => {
                value.parse::<LogLevel>()?;
            }
            _ => {
                // Unknown environment variable, ignore
            }
        }

        Ok(())
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            ("HOSTS", "Comma-separated list of hosts to ping", "8.8.8.8,1.1.1.1"),
            ("DURATION", "Test duration in seconds", "30"),
            ("INTERVAL", "Seconds between pings to a host", "1"),
            ("PACKET_SIZE", "ICMP payload size in bytes", "32"),
            ("TTL", "IPv4 time-to-live (1-255)", "64"),
            ("PROBE_TIMEOUT", "Seconds to wait for each reply", "1"),
            ("ENABLE_LOG", "Write the CSV result log", "true"),
            ("RESULTS_DIR", "Directory for CSV result logs", "results"),
            ("LOG_LEVEL", "Diagnostic log level", "warn"),
            ("ENABLE_COLOR", "Enable colored output", "true"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<15} {}\n", var, description));
            help.push_str(&format!("  {:<15} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n\n");

        help.push_str("Example .env file:\n\n");
        help.push_str(&Self::create_example_env_content());

        help
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_example_content_lists_every_variable() {
        let content = EnvManager::create_example_env_content();
        for (name, _, _) in EnvManager::get_supported_env_vars() {
            assert!(content.contains(&format!("{}=", name)), "missing {}", name);
        }
    }

    #[test]
    fn test_validate_env_var() {
        assert!(EnvManager::validate_env_var("HOSTS", "8.8.8.8, example.com").is_ok());
        assert!(EnvManager::validate_env_var("DURATION", "0").is_ok());
        assert!(EnvManager::validate_env_var("DURATION", "2.5").is_ok());
        assert!(EnvManager::validate_env_var("INTERVAL", "0.2").is_ok());
        assert!(EnvManager::validate_env_var("TTL", "255").is_ok());
        assert!(EnvManager::validate_env_var("ENABLE_LOG", "false").is_ok());
        assert!(EnvManager::validate_env_var("LOG_LEVEL", "debug").is_ok());
        assert!(EnvManager::validate_env_var("SOMETHING_ELSE", "whatever").is_ok());

        assert!(EnvManager::validate_env_var("HOSTS", " , ").is_err());
        assert!(EnvManager::validate_env_var("DURATION", "-1").is_err());
        assert!(EnvManager::validate_env_var("INTERVAL", "0").is_err());
        assert!(EnvManager::validate_env_var("INTERVAL", "1e-10").is_err());
        assert!(EnvManager::validate_env_var("INTERVAL", "1e20").is_err());
        assert!(EnvManager::validate_env_var("PROBE_TIMEOUT", "soon").is_err());
        assert!(EnvManager::validate_env_var("PACKET_SIZE", "-5").is_err());
        assert!(EnvManager::validate_env_var("TTL", "0").is_err());
        assert!(EnvManager::validate_env_var("TTL", "256").is_err());
        assert!(EnvManager::validate_env_var("ENABLE_COLOR", "maybe").is_err());
        assert!(EnvManager::validate_env_var("LOG_LEVEL", "loud").is_err());
    }

    #[test]
    fn test_display_env_help() {
        let help = EnvManager::display_env_help();
        assert!(help.contains("Supported Environment Variables:"));
        assert!(help.contains("PROBE_TIMEOUT"));
        assert!(help.contains("Configuration Priority"));
        assert!(help.contains("Example .env file:"));
    }

    #[test]
    fn test_missing_env_file_is_fine() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EnvManager::load_env_file_from(&dir.path().join(".env"), false).is_ok());
    }
}
