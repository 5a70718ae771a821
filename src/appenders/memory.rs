//! In-memory appender
//!
//! Keeps every line in a shared buffer. Clones share the buffer, so a test
//! can hand one clone to a logger and read the output through another.

use crate::core::{Appender, Result};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct MemoryAppender {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemoryAppender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_owned).collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Appender for MemoryAppender {
    fn append(&mut self, line: &[u8]) -> Result<()> {
        self.buffer.lock().extend_from_slice(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffer() {
        let reader = MemoryAppender::new();
        let mut writer = reader.clone();

        writer.append(b"first\n").unwrap();
        writer.append(b"second\n").unwrap();

        assert_eq!(reader.lines(), vec!["first", "second"]);

        reader.clear();
        assert!(writer.contents().is_empty());
    }
}
