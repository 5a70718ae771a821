//! Appender trait for log output destinations

use super::error::Result;

/// Destination for rendered log lines
///
/// `append` receives one complete line including its trailing newline and
/// must write it with a single call to the underlying writer. The logger
/// serializes calls, so implementations need no locking of their own.
pub trait Appender: Send {
    fn append(&mut self, line: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
