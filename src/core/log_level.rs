//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// The discriminants define the total order used for threshold filtering:
/// `Debug < Info < Warn < Error < Fatal`. Values outside this set cannot be
/// constructed; external input goes through [`FromStr`] or [`TryFrom<u8>`],
/// both of which reject unknown values with a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[derive(Serialize, Deserialize)]
#[serde(try_from = "LevelRepr", into = "&'static str")]
#[repr(u8)]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl LogLevel {
    /// All levels, lowest first
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Debug => Cyan,
            LogLevel::Info => Green,
            LogLevel::Warn => Yellow,
            LogLevel::Error => Red,
            LogLevel::Fatal => Magenta,
        }
    }

    /// ANSI escape that switches the terminal foreground to [`Self::color_code`]
    pub fn ansi_prefix(&self) -> String {
        format!("\x1b[{}m", self.color_code().to_fg_str())
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(LoggerError::config(
                "LogLevel",
                format!("Invalid log level: '{}'", s),
            )),
        }
    }
}

impl TryFrom<u8> for LogLevel {
    type Error = LoggerError;

    fn try_from(value: u8) -> Result<Self, LoggerError> {
        LogLevel::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| {
                LoggerError::config(
                    "LogLevel",
                    format!("level {} is out of range (0..=4)", value),
                )
            })
    }
}

impl From<LogLevel> for &'static str {
    fn from(level: LogLevel) -> Self {
        level.to_str()
    }
}

/// Accepted wire shapes for a level in configuration
#[derive(Deserialize)]
#[serde(untagged)]
enum LevelRepr {
    Name(String),
    Number(u64),
}

impl TryFrom<LevelRepr> for LogLevel {
    type Error = LoggerError;

    fn try_from(repr: LevelRepr) -> Result<Self, LoggerError> {
        match repr {
            LevelRepr::Name(name) => name.parse(),
            LevelRepr::Number(n) => u8::try_from(n)
                .map_err(|_| {
                    LoggerError::config("LogLevel", format!("level {} is out of range (0..=4)", n))
                })
                .and_then(LogLevel::try_from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordering_is_monotonic() {
        for pair in LogLevel::ALL.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        assert_eq!(LogLevel::ALL.iter().max(), Some(&LogLevel::Fatal));
    }

    #[test]
    fn test_names() {
        let names: Vec<&str> = LogLevel::ALL.iter().map(LogLevel::to_str).collect();
        assert_eq!(names, ["DEBUG", "INFO", "WARN", "ERROR", "FATAL"]);
        assert_eq!(LogLevel::Warn.to_string(), "WARN");
    }

    #[test]
    fn test_ansi_prefixes() {
        assert_eq!(LogLevel::Debug.ansi_prefix(), "\x1b[36m");
        assert_eq!(LogLevel::Info.ansi_prefix(), "\x1b[32m");
        assert_eq!(LogLevel::Warn.ansi_prefix(), "\x1b[33m");
        assert_eq!(LogLevel::Error.ansi_prefix(), "\x1b[31m");
        assert_eq!(LogLevel::Fatal.ansi_prefix(), "\x1b[35m");
    }

    #[test]
    fn test_parse() {
        assert_eq!("warning".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!(" Error ".parse::<LogLevel>().unwrap(), LogLevel::Error);

        let err = "verbose".parse::<LogLevel>().unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_try_from_u8_rejects_out_of_range() {
        assert_eq!(LogLevel::try_from(0).unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::try_from(4).unwrap(), LogLevel::Fatal);
        assert!(LogLevel::try_from(5).unwrap_err().is_config_error());
        assert!(LogLevel::try_from(255).is_err());
    }

    #[test]
    fn test_serde() {
        assert_eq!(serde_json::to_string(&LogLevel::Error).unwrap(), "\"ERROR\"");
        assert_eq!(
            serde_json::from_str::<LogLevel>("\"debug\"").unwrap(),
            LogLevel::Debug
        );
        assert_eq!(serde_json::from_str::<LogLevel>("2").unwrap(), LogLevel::Warn);
        assert!(serde_json::from_str::<LogLevel>("9").is_err());
        assert!(serde_json::from_str::<LogLevel>("\"loud\"").is_err());
    }
}
