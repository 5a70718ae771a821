//! Core logger types and traits

pub mod appender;
pub mod caller;
pub mod config;
pub mod error;
pub mod log_context;
pub mod log_level;
pub mod log_record;
pub mod logger;
pub mod metrics;
pub mod output_format;

pub use appender::Appender;
pub use caller::Caller;
pub use config::{LoggerConfig, RotationConfig};
pub use error::{LoggerError, Result};
pub use log_context::{ContextKey, ContextLookup, FieldValue, Fields, RequestContext};
pub use log_level::LogLevel;
pub use log_record::LogRecord;
pub use logger::{default_logger, Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
