//! Per-call log record

use super::caller::Caller;
use super::log_context::Fields;
use super::log_level::LogLevel;
use chrono::{DateTime, Local, SecondsFormat};

/// Everything a renderer needs for one line
///
/// Built on the calling thread after the threshold check and dropped as soon
/// as the line has been handed to the sink.
#[derive(Debug, Clone)]
pub struct LogRecord<'a> {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Local>,
    pub caller: Option<Caller>,
    pub fields: &'a Fields,
}

impl<'a> LogRecord<'a> {
    pub fn new(level: LogLevel, message: String, fields: &'a Fields) -> Self {
        Self {
            level,
            message,
            timestamp: Local::now(),
            caller: None,
            fields,
        }
    }

    #[must_use]
    pub fn with_caller(mut self, caller: Option<Caller>) -> Self {
        self.caller = caller;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Local>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// RFC 3339 timestamp with second precision, `Z` for UTC
    pub fn rfc3339(&self) -> String {
        self.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    }
}
