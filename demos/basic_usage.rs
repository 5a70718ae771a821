//! Basic logger usage example
//!
//! Demonstrates console logging at each level, threshold filtering and the
//! process-wide default logger.
//!
//! Run with: cargo run --example basic_usage

use leveled_logger::prelude::*;
use leveled_logger::{debug, info, warn};

fn main() -> Result<()> {
    println!("=== Leveled Logger - Basic Usage Example ===\n");

    // Colored text with caller, written to standard output
    let logger = Logger::builder().min_level(LogLevel::Debug).build();

    println!("1. Logging at different levels:");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");

    println!("\n2. Formatted messages:");
    info!(logger, "user {} logged in", "alice");
    warn!(logger, "retry attempt {} of {}", 3, 5);

    println!("\n3. Threshold set to WARN - debug and info won't show:");
    let quiet = Logger::builder().min_level(LogLevel::Warn).colors(false).build();
    debug!(quiet, "Debug message (hidden)");
    info!(quiet, "Info message (hidden)");
    warn!(quiet, "Warning message (visible)");

    println!("\n4. The default logger:");
    default_logger().info("written through the process-wide logger");

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
