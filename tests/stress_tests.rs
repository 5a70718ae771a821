//! Stress tests for the synchronous write path
//!
//! These tests verify:
//! - Every record from concurrent callers is written exactly once
//! - Lines never interleave, including across derived loggers
//! - Rotation stays consistent while many threads write
//! - FATAL writes its record and ends the process with status 1

use leveled_logger::appenders::{MemoryAppender, RotatingFileAppender, RotationPolicy};
use leveled_logger::{LogLevel, Logger, LoggerConfig, OutputFormat};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Arc;
use std::thread;
use tempfile::TempDir;

const THREADS: usize = 8;
const PER_THREAD: usize = 500;

fn parse_json_lines(content: &str) -> Vec<serde_json::Value> {
    content
        .lines()
        .map(|line| {
            serde_json::from_str(line)
                .unwrap_or_else(|e| panic!("malformed line {:?}: {}", line, e))
        })
        .collect()
}

/// Collect `(thread, seq)` pairs and check each thread wrote 0..count once
fn assert_complete(records: &[serde_json::Value], threads: usize, count: usize) {
    let mut seen: HashMap<u64, Vec<u64>> = HashMap::new();
    for record in records {
        let thread = record["thread"].as_u64().expect("thread field");
        let seq = record["seq"].as_u64().expect("seq field");
        seen.entry(thread).or_default().push(seq);
    }

    assert_eq!(seen.len(), threads);
    for (thread, mut seqs) in seen {
        seqs.sort_unstable();
        let expected: Vec<u64> = (0..count as u64).collect();
        assert_eq!(seqs, expected, "thread {} lost or duplicated records", thread);
    }
}

#[test]
fn test_concurrent_callers_do_not_interleave() {
    let output = MemoryAppender::new();
    let logger = Arc::new(
        Logger::builder()
            .min_level(LogLevel::Debug)
            .format(OutputFormat::Json)
            .appender(output.clone())
            .build(),
    );

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger
                        .with_fields([("thread", t as u64), ("seq", i as u64)])
                        .info(format_args!("message {} from thread {}", i, t));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let records = parse_json_lines(&output.contents());
    assert_eq!(records.len(), THREADS * PER_THREAD);
    assert_complete(&records, THREADS, PER_THREAD);
    assert_eq!(logger.metrics().total_logged(), (THREADS * PER_THREAD) as u64);
    assert_eq!(logger.metrics().dropped_count(), 0);
}

#[test]
fn test_derived_loggers_share_one_lock() {
    let output = MemoryAppender::new();
    let root = Logger::builder()
        .show_caller(true)
        .colors(true)
        .appender(output.clone())
        .build();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            // Each thread owns a clone of a distinct derived logger
            let logger = root.with_field("worker", t as u64);
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.warn(format_args!("tick {}", i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }

    let contents = output.contents();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), THREADS * PER_THREAD);
    for line in lines {
        assert!(line.starts_with("\x1b[33m[WARN] "), "torn line: {:?}", line);
        assert!(line.ends_with("\x1b[0m"), "torn line: {:?}", line);
        assert_eq!(line.matches("[WARN]").count(), 1, "interleaved: {:?}", line);
        assert!(line.contains(" | worker="));
    }
}

#[test]
fn test_concurrent_logging_with_rotation() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("stress.log");
    let max_bytes = 8 * 1024;

    let appender = RotatingFileAppender::with_policy(
        &log_file,
        RotationPolicy::new().with_max_size(max_bytes).with_max_backups(0),
    )
    .expect("Failed to create appender");

    let logger = Arc::new(
        Logger::builder()
            .format(OutputFormat::Json)
            .show_caller(false)
            .appender(appender)
            .build(),
    );

    let threads = 4;
    let per_thread = 250;
    let handles: Vec<_> = (0..threads)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for i in 0..per_thread {
                    logger
                        .with_fields([("thread", t as u64), ("seq", i as u64)])
                        .error("rotating under load");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("Thread panicked");
    }
    logger.flush().unwrap();

    let mut records = Vec::new();
    let mut backups = 0;
    for entry in fs::read_dir(temp_dir.path()).unwrap() {
        let path = entry.unwrap().path();
        let size = fs::metadata(&path).unwrap().len();
        assert!(size <= max_bytes, "{} is {} bytes", path.display(), size);
        if path != log_file {
            backups += 1;
        }
        records.extend(parse_json_lines(&fs::read_to_string(&path).unwrap()));
    }

    assert!(backups > 0, "expected at least one rotation");
    assert_eq!(records.len(), threads * per_thread);
    assert_complete(&records, threads, per_thread);
}

const FATAL_CHILD_ENV: &str = "LEVELED_LOGGER_FATAL_CHILD_LOG";

/// Body run inside the child process: logs at FATAL and never returns
fn run_fatal_child(path: &Path) -> ! {
    let config = LoggerConfig {
        threshold: LogLevel::Info,
        show_caller: false,
        color: false,
        output_path: Some(path.to_path_buf()),
        ..LoggerConfig::default()
    };
    let logger = Logger::from_config(&config).expect("logger from config");

    logger.error("about to give up");
    logger.with_field("code", 17).fatal("cannot continue")
}

#[test]
fn test_fatal_exits_with_status_one() {
    if let Some(path) = std::env::var_os(FATAL_CHILD_ENV) {
        run_fatal_child(Path::new(&path));
    }

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let log_file = temp_dir.path().join("fatal.log");

    let status = Command::new(std::env::current_exe().unwrap())
        .args(["test_fatal_exits_with_status_one", "--exact", "--nocapture"])
        .env(FATAL_CHILD_ENV, &log_file)
        .status()
        .expect("Failed to spawn child test process");

    assert_eq!(status.code(), Some(1));

    let content = fs::read_to_string(&log_file).expect("Failed to read log file");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("[ERROR] "));
    assert!(lines[1].starts_with("[FATAL] "));
    assert!(lines[1].ends_with("cannot continue | code=17"));
}
