//! File logging example
//!
//! Builds a logger from a JSON configuration that writes JSON lines to a
//! rotating, compressed log file.
//!
//! Run with: cargo run --example file_logging

use leveled_logger::prelude::*;
use leveled_logger::{error, info};

fn main() -> Result<()> {
    println!("=== Leveled Logger - File Logging Example ===\n");

    let config: LoggerConfig = serde_json::from_str(
        r#"{
            "threshold": "debug",
            "json_output": true,
            "show_caller": true,
            "output_path": "logs/application.log",
            "rotation": { "max_size_mb": 1, "max_backups": 3, "max_age_days": 7, "compress": true }
        }"#,
    )?;

    let logger = Logger::from_config(&config)?;

    println!("1. Writing records to logs/application.log:");
    logger.debug("Application starting");
    info!(logger, "Configuration loaded from {}", "config.toml");

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        let step = logger.with_field("step", i);
        info!(step, "Processing step {}", i);
        if i == 3 {
            step.warn("Step 3 took longer than expected");
        }
    }
    error!(logger.with_field("host", "db-1"), "Connection dropped");

    logger.flush()?;

    println!("\n=== Example completed successfully! ===");
    println!("Check 'logs/application.log' for the full log output");

    Ok(())
}
