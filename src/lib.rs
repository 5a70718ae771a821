//! # Leveled Logger
//!
//! A synchronous, structured, leveled logger.
//!
//! ## Features
//!
//! - **Severity filtering**: DEBUG < INFO < WARN < ERROR < FATAL, rejected before formatting
//! - **Structured fields**: immutable field maps, extended by deriving child loggers
//! - **Call sites**: `file.rs:line` of the application call, via `#[track_caller]`
//! - **Two formats**: human-readable text (optionally colored) or one JSON object per line
//! - **Rotating files**: size-based rotation, backup count and age limits, gzip
//!
//! ```
//! use leveled_logger::prelude::*;
//! use leveled_logger::info;
//!
//! let logger = Logger::builder()
//!     .json(true)
//!     .appender(MemoryAppender::new())
//!     .build();
//!
//! let request_log = logger.with_context(
//!     &RequestContext::new().with_value(ContextKey::RequestId, "req-7"),
//! );
//! info!(request_log, "listening on port {}", 8080);
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, MemoryAppender, RotatingFileAppender, RotationPolicy};
    pub use crate::core::{
        default_logger, Appender, ContextKey, ContextLookup, FieldValue, Fields, LogLevel, Logger,
        LoggerBuilder, LoggerConfig, LoggerError, OutputFormat, RequestContext, Result,
        RotationConfig,
    };
}

pub use appenders::{ConsoleAppender, MemoryAppender, RotatingFileAppender, RotationPolicy, WriterAppender};
pub use core::{
    default_logger, Appender, Caller, ContextKey, ContextLookup, FieldValue, Fields, LogLevel,
    LogRecord, Logger, LoggerBuilder, LoggerConfig, LoggerError, LoggerMetrics, OutputFormat,
    RequestContext, Result, RotationConfig,
};
