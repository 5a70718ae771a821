//! Logger configuration
//!
//! `LoggerConfig` is plain data with serde support so applications can embed
//! it in their own configuration files. Building a logger from it validates
//! everything up front; nothing is deferred to the first write.

use super::error::{LoggerError, Result};
use super::log_level::LogLevel;
use super::output_format::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Parameters handed to the rotating file appender
///
/// Zero values mean "use the default" for `max_size_mb` (100 MB) and
/// "unlimited" for `max_backups` and `max_age_days`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RotationConfig {
    pub max_size_mb: u64,
    pub max_backups: usize,
    pub max_age_days: u64,
    pub compress: bool,
}

/// Settings for a root logger
///
/// # Example
///
/// ```
/// use leveled_logger::{LoggerConfig, LogLevel};
///
/// let config: LoggerConfig = serde_json::from_str(
///     r#"{ "threshold": "debug", "json_output": true, "show_caller": false }"#,
/// ).unwrap();
/// assert_eq!(config.threshold, LogLevel::Debug);
/// assert!(config.color);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub threshold: LogLevel,
    pub json_output: bool,
    pub show_caller: bool,
    pub color: bool,
    /// `None` (or an empty path) writes to standard output
    pub output_path: Option<PathBuf>,
    pub rotation: RotationConfig,
}

impl Default for LoggerConfig {
    /// INFO threshold, text output with caller and colors, on standard output
    fn default() -> Self {
        Self {
            threshold: LogLevel::Info,
            json_output: false,
            show_caller: true,
            color: true,
            output_path: None,
            rotation: RotationConfig::default(),
        }
    }
}

impl LoggerConfig {
    pub fn output_format(&self) -> OutputFormat {
        if self.json_output {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }

    /// The file to log to, if any
    pub fn file_path(&self) -> Option<&PathBuf> {
        self.output_path
            .as_ref()
            .filter(|p| !p.as_os_str().is_empty())
    }

    /// Reject settings that cannot produce a working logger
    pub fn validate(&self) -> Result<()> {
        if self.rotation.max_size_mb.checked_mul(1024 * 1024).is_none() {
            return Err(LoggerError::config(
                "RotationConfig",
                format!("max_size_mb {} is too large", self.rotation.max_size_mb),
            ));
        }

        if let Some(path) = self.file_path() {
            if path.is_dir() {
                return Err(LoggerError::config(
                    "LoggerConfig",
                    format!("output path '{}' is a directory", path.display()),
                ));
            }
            if path.file_name().is_none() {
                return Err(LoggerError::config(
                    "LoggerConfig",
                    format!("output path '{}' has no file name", path.display()),
                ));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.threshold, LogLevel::Info);
        assert_eq!(config.output_format(), OutputFormat::Text);
        assert!(config.show_caller);
        assert!(config.color);
        assert!(config.file_path().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_empty_path_means_stdout() {
        let config = LoggerConfig {
            output_path: Some(PathBuf::new()),
            ..LoggerConfig::default()
        };
        assert!(config.file_path().is_none());
    }

    #[test]
    fn test_deserialize_full() {
        let config: LoggerConfig = serde_json::from_str(
            r#"{
                "threshold": "WARN",
                "json_output": true,
                "show_caller": false,
                "color": false,
                "output_path": "/var/log/app.log",
                "rotation": { "max_size_mb": 10, "max_backups": 3, "max_age_days": 28, "compress": true }
            }"#,
        )
        .unwrap();

        assert_eq!(config.threshold, LogLevel::Warn);
        assert_eq!(config.output_format(), OutputFormat::Json);
        assert_eq!(config.file_path(), Some(&PathBuf::from("/var/log/app.log")));
        assert_eq!(
            config.rotation,
            RotationConfig {
                max_size_mb: 10,
                max_backups: 3,
                max_age_days: 28,
                compress: true,
            }
        );
    }

    #[test]
    fn test_invalid_threshold_is_rejected() {
        let err = serde_json::from_str::<LoggerConfig>(r#"{ "threshold": 7 }"#).unwrap_err();
        assert!(err.to_string().contains("out of range"));

        assert!(serde_json::from_str::<LoggerConfig>(r#"{ "threshold": "trace" }"#).is_err());
    }

    #[test]
    fn test_validate_rejects_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = LoggerConfig {
            output_path: Some(dir.path().to_path_buf()),
            ..LoggerConfig::default()
        };
        assert!(config.validate().unwrap_err().is_config_error());
    }

    #[test]
    fn test_validate_rejects_huge_size() {
        let config = LoggerConfig {
            rotation: RotationConfig {
                max_size_mb: u64::MAX,
                ..RotationConfig::default()
            },
            ..LoggerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
