//! Watcher configuration
//!
//! Thresholds and paths for the rolling-file keeper. Values come from an
//! optional TOML file with CLI overrides on top; everything has a default so a
//! bare `logrot` invocation works out of the box.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Configuration for a watched directory
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchConfig {
    /// Directory to watch and manage (created at startup if absent)
    pub watch_dir: PathBuf,

    /// Rotate once the newest file reaches this many bytes
    pub size_threshold_bytes: u64,

    /// Evict the oldest file once more than this many files exist
    pub max_file_count: usize,

    /// Seconds between polling passes
    pub poll_interval_secs: u64,

    /// Extension given to newly created files
    pub file_extension: String,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watch_dir: PathBuf::from("./watched_folder"),
            size_threshold_bytes: 1024,
            max_file_count: 3,
            poll_interval_secs: 3,
            file_extension: "log".to_string(),
        }
    }
}

impl WatchConfig {
    /// Load configuration from a TOML file; missing keys keep their defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the rotation loops cannot make progress with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size_threshold_bytes == 0 {
            return Err(ConfigError::Invalid(
                "size_threshold_bytes must be at least 1".to_string(),
            ));
        }
        if self.max_file_count == 0 {
            return Err(ConfigError::Invalid(
                "max_file_count must be at least 1".to_string(),
            ));
        }
        if self.poll_interval_secs == 0 {
            return Err(ConfigError::Invalid(
                "poll_interval_secs must be at least 1".to_string(),
            ));
        }
        if self.file_extension.is_empty() {
            return Err(ConfigError::Invalid(
                "file_extension must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WatchConfig::default();
        assert_eq!(config.size_threshold_bytes, 1024);
        assert_eq!(config.max_file_count, 3);
        assert_eq!(config.poll_interval_secs, 3);
        assert_eq!(config.file_extension, "log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: WatchConfig = toml::from_str("size_threshold_bytes = 2048").unwrap();
        assert_eq!(config.size_threshold_bytes, 2048);
        assert_eq!(config.max_file_count, 3);
        assert_eq!(config.file_extension, "log");
    }

    #[test]
    fn test_zero_max_file_count_rejected() {
        let config = WatchConfig {
            max_file_count: 0,
            ..WatchConfig::default()
        };
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("logrot.toml");
        fs::write(&path, "max_file_count = 5\npoll_interval_secs = 1\n").unwrap();

        let config = WatchConfig::load(&path).unwrap();
        assert_eq!(config.max_file_count, 5);
        assert_eq!(config.poll_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("logrot.toml");
        fs::write(&path, "file_extension = \"\"\n").unwrap();

        assert!(WatchConfig::load(&path).is_err());
    }
}
