//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

/// A sink that records or displays log entries.
///
/// Appenders do no level filtering of their own; the owning logger has
/// already applied its threshold before `append` is called.
pub trait Appender: Send + Sync {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    /// Release the underlying resource. Appending after close is an error.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }

    fn name(&self) -> &str;
}
