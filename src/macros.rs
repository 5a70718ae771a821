//! Logging macros for ergonomic log message formatting.
//!
//! These macros take a logger followed by a `format!`-style template. The
//! template is captured with `format_args!`, so nothing is formatted unless
//! the record passes the logger's threshold, and the reported caller is the
//! line the macro was invoked on.
//!
//! # Examples
//!
//! ```
//! use leveled_logger::prelude::*;
//! use leveled_logger::info;
//!
//! let logger = Logger::builder().appender(MemoryAppender::new()).build();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port);
//! ```

/// Log a message at the given level.
///
/// `LogLevel::Fatal` written through `log!` does not exit the process; use
/// [`fatal!`] for that.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use leveled_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, ::std::format_args!($($arg)+))
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::builder().min_level(LogLevel::Debug).appender(MemoryAppender::new()).build();
/// use leveled_logger::debug;
/// debug!(logger, "Debug information");
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $logger.debug(::std::format_args!($($arg)+))
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use leveled_logger::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $logger.info(::std::format_args!($($arg)+))
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use leveled_logger::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $logger.warn(::std::format_args!($($arg)+))
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::builder().appender(MemoryAppender::new()).build();
/// use leveled_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, "Error code: {}, message: {}", 500, "Internal error");
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $logger.error(::std::format_args!($($arg)+))
    };
}

/// Log a fatal-level message and terminate the process.
///
/// Expands to [`Logger::fatal`](crate::Logger::fatal), which never returns.
///
/// # Examples
///
/// ```no_run
/// # use leveled_logger::prelude::*;
/// # let logger = Logger::new();
/// use leveled_logger::fatal;
/// fatal!(logger, "Unable to recover from error: {}", "disk full");
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $logger.fatal(::std::format_args!($($arg)+))
    };
}
