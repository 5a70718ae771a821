//! Main logger implementation

use super::{
    appender::Appender,
    caller::Caller,
    config::LoggerConfig,
    error::Result,
    log_context::{context_fields, ContextLookup, FieldValue, Fields},
    log_level::LogLevel,
    log_record::LogRecord,
    metrics::LoggerMetrics,
    output_format::OutputFormat,
};
use crate::appenders::{ConsoleAppender, RotatingFileAppender, RotationPolicy};
use parking_lot::Mutex;
use std::any::Any;
use std::fmt;
use std::sync::{Arc, OnceLock};

type SharedSink = Arc<Mutex<Box<dyn Appender>>>;

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

/// Settings fixed at construction and copied into derived loggers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Settings {
    min_level: LogLevel,
    format: OutputFormat,
    show_caller: bool,
    use_colors: bool,
}

impl From<&LoggerConfig> for Settings {
    fn from(config: &LoggerConfig) -> Self {
        Self {
            min_level: config.threshold,
            format: config.output_format(),
            show_caller: config.show_caller,
            use_colors: config.color,
        }
    }
}

/// Leveled, structured logger
///
/// Records below the threshold are rejected before the message is formatted.
/// Records that pass are rendered and written while holding the sink's
/// mutex, so lines from concurrent callers never interleave.
///
/// Loggers derived with [`Logger::with_fields`] or [`Logger::with_context`]
/// share the sink, its mutex and the metrics with their parent, and carry
/// their own copy of the field map. Cloning a logger is cheap.
///
/// Nothing on the write path reaches the caller: render and write failures
/// drop the record and show up in [`Logger::metrics`]. The one exception is
/// [`Logger::fatal`], which terminates the process after writing.
///
/// # Example
///
/// ```
/// use leveled_logger::prelude::*;
/// use leveled_logger::{info, warn};
///
/// let output = MemoryAppender::new();
/// let logger = Logger::builder()
///     .show_caller(false)
///     .colors(false)
///     .appender(output.clone())
///     .build();
///
/// info!(logger, "user {} logged in", "alice");
/// warn!(logger.with_field("service", "auth"), "slow query");
///
/// let lines = output.lines();
/// assert!(lines[0].starts_with("[INFO] "));
/// assert!(lines[1].ends_with("slow query | service=auth"));
/// ```
#[derive(Clone)]
pub struct Logger {
    settings: Settings,
    sink: SharedSink,
    fields: Fields,
    metrics: Arc<LoggerMetrics>,
}

impl Logger {
    /// Logger with the default settings writing to standard output
    #[must_use]
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Build a root logger from configuration
    ///
    /// The configuration is validated and the sink opened here, so an
    /// unusable output path fails now rather than on the first write.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the output file
    /// cannot be opened.
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        config.validate()?;

        let builder = LoggerBuilder::from_config(config);
        let logger = match config.file_path() {
            Some(path) => builder
                .appender(RotatingFileAppender::with_policy(
                    path,
                    RotationPolicy::from(&config.rotation),
                )?)
                .build(),
            None => builder.appender(ConsoleAppender::new()).build(),
        };
        Ok(logger)
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use leveled_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .json(true)
    ///     .build();
    /// assert!(logger.is_enabled(LogLevel::Debug));
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    /// Whether a record at `level` would be written
    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        level >= self.settings.min_level
    }

    /// Log `message` at `level`
    ///
    /// `message` is only formatted when the level passes the threshold, so
    /// `format_args!` (as used by the macros) costs nothing for rejected
    /// records. Logging at [`LogLevel::Fatal`] through this method writes the
    /// record but does not exit; use [`Logger::fatal`] for that.
    #[track_caller]
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        if !self.is_enabled(level) {
            return;
        }

        let caller = if self.settings.show_caller {
            Caller::resolve()
        } else {
            None
        };

        // Formatted outside the lock: a Display impl may itself log.
        let formatted = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            let mut buf = String::new();
            fmt::write(&mut buf, format_args!("{}", message)).map(|()| buf)
        }));

        match formatted {
            Ok(Ok(message)) => self.write_record(level, message, caller),
            Ok(Err(e)) => self.alert_and_drop(&format_args!("message formatting failed: {}", e)),
            Err(panic_info) => self.alert_and_drop(&panic_message(&*panic_info)),
        }
    }

    fn write_record(&self, level: LogLevel, message: String, caller: Option<Caller>) {
        let outcome = {
            let mut sink = self.sink.lock();
            let record = LogRecord::new(level, message, &self.fields).with_caller(caller);
            let settings = self.settings;

            std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let mut line = settings.format.format(&record, settings.use_colors)?;
                line.push('\n');
                sink.append(line.as_bytes())
            }))
        };

        match outcome {
            Ok(Ok(())) => self.metrics.record_logged(),
            Ok(Err(e)) => self.alert_and_drop(&e),
            Err(panic_info) => self.alert_and_drop(&panic_message(&*panic_info)),
        }
    }

    /// Count a dropped record, alerting on the first drop and every
    /// 1000th thereafter
    fn alert_and_drop(&self, reason: &dyn fmt::Display) {
        let dropped_count = self.metrics.record_dropped();

        if dropped_count == 0 || (dropped_count + 1) % 1000 == 0 {
            eprintln!(
                "[LOGGER WARNING] {} log records dropped; last failure: {}",
                dropped_count + 1,
                reason
            );
        }
    }

    #[inline]
    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warn, message);
    }

    #[inline]
    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }

    /// Log at FATAL, flush the sink and terminate the process with status 1
    ///
    /// **This never returns.** Unlike the other severities, calling it ends
    /// the process unconditionally: destructors of live values do not run
    /// and there is no way to intercept the exit.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) -> ! {
        self.log(LogLevel::Fatal, message);
        let _ = self.flush();
        std::process::exit(1)
    }

    /// Derive a logger whose fields are this logger's plus `fields`
    ///
    /// On key conflicts the new value wins. `self` is not modified.
    #[must_use]
    pub fn with_fields<I, K, V>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<FieldValue>,
    {
        Logger {
            settings: self.settings,
            sink: Arc::clone(&self.sink),
            fields: self.fields.merged(fields),
            metrics: Arc::clone(&self.metrics),
        }
    }

    /// Derive a logger with one extra field
    #[must_use]
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<FieldValue>) -> Logger {
        self.with_fields([(key.into(), value.into())])
    }

    /// Derive a logger carrying the well-known request values found in `ctx`
    ///
    /// Keys that are absent or null in `ctx` are skipped; this never fails.
    #[must_use]
    pub fn with_context<C>(&self, ctx: &C) -> Logger
    where
        C: ContextLookup + ?Sized,
    {
        self.with_fields(context_fields(ctx))
    }

    pub fn min_level(&self) -> LogLevel {
        self.settings.min_level
    }

    pub fn format(&self) -> OutputFormat {
        self.settings.format
    }

    pub fn shows_caller(&self) -> bool {
        self.settings.show_caller
    }

    pub fn uses_colors(&self) -> bool {
        self.settings.use_colors
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Write and drop counters, shared with derived loggers
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Whether `other` writes through the same sink as `self`
    pub fn shares_sink_with(&self, other: &Logger) -> bool {
        Arc::ptr_eq(&self.sink, &other.sink)
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.lock().flush()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("min_level", &self.settings.min_level)
            .field("format", &self.settings.format)
            .field("show_caller", &self.settings.show_caller)
            .field("use_colors", &self.settings.use_colors)
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

static DEFAULT_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Process-wide default logger
///
/// Created on first access with [`LoggerConfig::default`] (INFO threshold,
/// text output with caller and colors, standard output) and kept for the
/// rest of the process. Prefer passing a [`Logger`] explicitly; this is a
/// convenience for code that has none at hand.
pub fn default_logger() -> &'static Logger {
    DEFAULT_LOGGER.get_or_init(|| {
        LoggerBuilder::from_config(&LoggerConfig::default())
            .appender(ConsoleAppender::new())
            .build()
    })
}

/// Builder for constructing Logger with a fluent API
///
/// Defaults match [`LoggerConfig::default`]; without an explicit appender
/// the logger writes to standard output.
///
/// # Example
/// ```
/// use leveled_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Warn)
///     .format(OutputFormat::Json)
///     .field("service", "billing")
///     .appender(MemoryAppender::new())
///     .build();
/// assert_eq!(logger.fields().len(), 1);
/// ```
pub struct LoggerBuilder {
    settings: Settings,
    appender: Option<Box<dyn Appender>>,
    fields: Fields,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::from_config(&LoggerConfig::default())
    }

    /// Take threshold, format and display flags from `config`
    ///
    /// The output path is ignored; see [`Logger::from_config`].
    pub fn from_config(config: &LoggerConfig) -> Self {
        Self {
            settings: Settings::from(config),
            appender: None,
            fields: Fields::new(),
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.settings.min_level = level;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.settings.format = format;
        self
    }

    /// Shorthand for `format(OutputFormat::Json)` / `format(OutputFormat::Text)`
    #[must_use = "builder methods return a new value"]
    pub fn json(self, enabled: bool) -> Self {
        self.format(if enabled {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        })
    }

    #[must_use = "builder methods return a new value"]
    pub fn show_caller(mut self, enabled: bool) -> Self {
        self.settings.show_caller = enabled;
        self
    }

    /// Color text lines by level (never applies to JSON)
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, enabled: bool) -> Self {
        self.settings.use_colors = enabled;
        self
    }

    /// Set the sink, replacing any previous one
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Box::new(appender));
        self
    }

    /// Add a field carried by every record of the built logger
    #[must_use = "builder methods return a new value"]
    pub fn field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields = self.fields.merged([(key.into(), value.into())]);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let appender = self
            .appender
            .unwrap_or_else(|| Box::new(ConsoleAppender::new()));

        Logger {
            settings: self.settings,
            sink: Arc::new(Mutex::new(appender)),
            fields: self.fields,
            metrics: Arc::new(LoggerMetrics::new()),
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
