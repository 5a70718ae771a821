//! Console appender implementation

use crate::core::{Appender, LoggerError, Result};
use std::io::{self, Write};

/// Writes lines to the process's standard output
#[derive(Debug, Default)]
pub struct ConsoleAppender {
    _private: (),
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, line: &[u8]) -> Result<()> {
        io::stdout()
            .lock()
            .write_all(line)
            .map_err(|e| LoggerError::io_operation("writing to stdout", "write failed", e))
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
