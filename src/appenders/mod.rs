//! Appender implementations

pub mod console;
pub mod memory;
pub mod rotating_file;
pub mod writer;

pub use console::ConsoleAppender;
pub use memory::MemoryAppender;
pub use rotating_file::{RotatingFileAppender, RotationPolicy};
pub use writer::WriterAppender;

pub use crate::core::Appender;
