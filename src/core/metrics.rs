//! Logger metrics for observability
//!
//! The write path never reports failures to the caller, so these counters
//! are the only place a dropped record becomes visible.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by a logger and every logger derived from it
///
/// # Example
///
/// ```
/// use leveled_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dropped();
/// metrics.record_logged();
///
/// assert_eq!(metrics.dropped_count(), 1);
/// assert_eq!(metrics.total_logged(), 1);
/// ```
#[derive(Debug, Default)]
pub struct LoggerMetrics {
    /// Records whose render or write failed
    dropped_count: AtomicU64,

    /// Records handed to the sink successfully
    total_logged: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            dropped_count: AtomicU64::new(0),
            total_logged: AtomicU64::new(0),
        }
    }

    /// Get the number of dropped records
    #[inline]
    pub fn dropped_count(&self) -> u64 {
        self.dropped_count.load(Ordering::Relaxed)
    }

    /// Get the number of records written
    #[inline]
    pub fn total_logged(&self) -> u64 {
        self.total_logged.load(Ordering::Relaxed)
    }

    /// Record a successful write
    #[inline]
    pub fn record_logged(&self) {
        self.total_logged.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a dropped record, returning the previous drop count
    #[inline]
    pub fn record_dropped(&self) -> u64 {
        self.dropped_count.fetch_add(1, Ordering::Relaxed)
    }

    /// Percentage of records dropped (0.0 - 100.0)
    pub fn drop_rate(&self) -> f64 {
        let dropped = self.dropped_count() as f64;
        let total = dropped + self.total_logged() as f64;
        if total == 0.0 {
            0.0
        } else {
            dropped / total * 100.0
        }
    }
}
