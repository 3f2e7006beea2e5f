//! Leveled logging engine
//!
//! A named logger with a minimum level and an ordered list of appenders.
//! Records are written synchronously on the calling thread, to every appender
//! in attachment order.

use super::{
    appender::Appender,
    error::Result,
    error_channel::{ErrorChannel, FailureKind},
    log_entry::LogEntry,
    log_level::{LevelFilter, LogLevel},
    metrics::LoggerMetrics,
};
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::Display;
use std::sync::Arc;

pub struct Logger {
    name: String,
    min_level: RwLock<LevelFilter>,
    appenders: RwLock<Vec<Box<dyn Appender>>>,
    /// Metrics for observability (delivered, partial, filtered)
    metrics: Arc<LoggerMetrics>,
    errors: ErrorChannel,
}

impl Logger {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: RwLock::new(LevelFilter::All),
            appenders: RwLock::new(Vec::new()),
            metrics: Arc::new(LoggerMetrics::new()),
            errors: ErrorChannel::stderr(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Extract a readable message from a caught panic payload
    fn panic_message(panic_info: &(dyn std::any::Any + Send)) -> String {
        if let Some(s) = panic_info.downcast_ref::<&str>() {
            s.to_string()
        } else if let Some(s) = panic_info.downcast_ref::<String>() {
            s.clone()
        } else {
            "Unknown panic".to_string()
        }
    }

    /// Write one entry to every appender with per-appender panic isolation.
    ///
    /// One failing appender never prevents the others from receiving the
    /// entry. Returns the number of appenders that failed.
    fn process_sync(
        appenders: &mut [Box<dyn Appender>],
        entry: &LogEntry,
        errors: &ErrorChannel,
    ) -> u64 {
        let mut failures = 0;

        for appender in appenders.iter_mut() {
            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                appender.append(entry)
            }));

            match append_result {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    errors.report(appender.name(), FailureKind::Write, e.to_string());
                    failures += 1;
                }
                Err(panic_info) => {
                    errors.report(
                        appender.name(),
                        FailureKind::Panic,
                        Self::panic_message(panic_info.as_ref()),
                    );
                    failures += 1;
                }
            }
        }

        failures
    }

    pub fn add_appender(&mut self, appender: Box<dyn Appender>) {
        let mut appenders = self.appenders.write();
        appenders.push(appender);
    }

    /// Names of the attached appenders, in attachment order
    pub fn appender_names(&self) -> Vec<String> {
        self.appenders
            .read()
            .iter()
            .map(|a| a.name().to_string())
            .collect()
    }

    pub fn appender_count(&self) -> usize {
        self.appenders.read().len()
    }

    pub fn set_min_level(&mut self, level: impl Into<LevelFilter>) {
        let mut min_level = self.min_level.write();
        *min_level = level.into();
    }

    pub fn min_level(&self) -> LevelFilter {
        *self.min_level.read()
    }

    /// Replace the channel appender failures are reported to
    pub fn set_error_channel(&mut self, errors: ErrorChannel) {
        self.errors = errors;
    }

    #[inline]
    pub fn is_enabled(&self, level: LogLevel) -> bool {
        self.min_level.read().allows(level)
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>) {
        self.emit(level, message.as_ref(), &[], None);
    }

    /// Build an entry for `message` and dispatch it, if `level` passes the threshold
    pub fn emit(
        &self,
        level: LogLevel,
        message: &str,
        params: &[&dyn Display],
        error: Option<&(dyn Error + 'static)>,
    ) {
        if !self.is_enabled(level) {
            self.metrics.record_filtered();
            return;
        }

        let mut entry = LogEntry::new(level, self.name.as_str(), message);
        if !params.is_empty() {
            entry = entry.with_params(params);
        }
        if let Some(error) = error {
            entry = entry.with_error(error);
        }

        self.dispatch(&entry);
    }

    /// Write a prepared entry to every appender, subject to the threshold
    pub fn log_entry(&self, entry: &LogEntry) {
        if !self.is_enabled(entry.level) {
            self.metrics.record_filtered();
            return;
        }
        self.dispatch(entry);
    }

    fn dispatch(&self, entry: &LogEntry) {
        let mut appenders = self.appenders.write();
        let failures = Self::process_sync(&mut appenders, entry, &self.errors);

        if failures > 0 {
            self.metrics.record_partial(failures);
        } else {
            self.metrics.record_delivered();
        }
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    /// Flush every appender, even after one fails.
    ///
    /// Each failure is reported; the first one is returned.
    pub fn flush(&self) -> Result<()> {
        let mut appenders = self.appenders.write();
        let mut first_error = None;

        for appender in appenders.iter_mut() {
            if let Err(e) = appender.flush() {
                self.errors
                    .report(appender.name(), FailureKind::Flush, e.to_string());
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Close every appender. Failures are reported, not returned.
    pub fn close(&self) {
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            if let Err(e) = appender.close() {
                self.errors
                    .report(appender.name(), FailureKind::Close, e.to_string());
            }
        }
    }

    #[inline]
    pub fn message(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Message, message);
    }

    #[inline]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>) {
        self.log(LogLevel::Error, message);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        // Final flush of buffered appenders
        let mut appenders = self.appenders.write();
        for appender in appenders.iter_mut() {
            if let Err(e) = appender.flush() {
                self.errors
                    .report(appender.name(), FailureKind::Flush, e.to_string());
            }
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use job_logger::prelude::*;
///
/// let logger = Logger::builder("billing")
///     .min_level(LogLevel::Warning)
///     .appender(ConsoleAppender::new())
///     .build();
///
/// assert_eq!(logger.appender_names(), vec!["console"]);
/// ```
pub struct LoggerBuilder {
    name: String,
    min_level: LevelFilter,
    appenders: Vec<Box<dyn Appender>>,
    errors: ErrorChannel,
}

impl LoggerBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            min_level: LevelFilter::All,
            appenders: Vec::new(),
            errors: ErrorChannel::stderr(),
        }
    }

    /// Set minimum log level
    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: impl Into<LevelFilter>) -> Self {
        self.min_level = level.into();
        self
    }

    /// Add an appender
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appenders.push(Box::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn error_channel(mut self, errors: ErrorChannel) -> Self {
        self.errors = errors;
        self
    }

    pub fn build(self) -> Logger {
        let mut logger = Logger::new(self.name);
        logger.set_min_level(self.min_level);
        logger.set_error_channel(self.errors);
        for appender in self.appenders {
            logger.add_appender(appender);
        }
        logger
    }
}

impl Logger {
    #[must_use]
    pub fn builder(name: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(name)
    }
}
