//! Delivery counters for a logger
//!
//! Tells apart records that reached every appender, records that reached only
//! some of them, and records the threshold filtered out.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use job_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_delivered();
/// metrics.record_partial(2);
///
/// assert_eq!(metrics.delivered_count(), 1);
/// assert_eq!(metrics.partial_count(), 1);
/// assert_eq!(metrics.appender_failures(), 2);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records every appender accepted
    delivered: AtomicU64,

    /// Records at least one appender rejected
    partial: AtomicU64,

    /// Individual appender failures (one record may fail on several appenders)
    appender_failures: AtomicU64,

    /// Records below the minimum level
    filtered: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            partial: AtomicU64::new(0),
            appender_failures: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered_count(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn partial_count(&self) -> u64 {
        self.partial.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn appender_failures(&self) -> u64 {
        self.appender_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    /// Record a record that `failures` appenders could not take
    #[inline]
    pub fn record_partial(&self, failures: u64) -> u64 {
        self.appender_failures.fetch_add(failures, Ordering::Relaxed);
        self.partial.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    /// Share of emitted records that missed at least one appender, 0.0 - 100.0
    pub fn partial_rate(&self) -> f64 {
        let partial = self.partial_count() as f64;
        let total = self.delivered_count() as f64 + partial;
        if total == 0.0 {
            0.0
        } else {
            (partial / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.partial.store(0, Ordering::Relaxed);
        self.appender_failures.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered_count()),
            partial: AtomicU64::new(self.partial_count()),
            appender_failures: AtomicU64::new(self.appender_failures()),
            filtered: AtomicU64::new(self.filtered_count()),
        }
    }
}
