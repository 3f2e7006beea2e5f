//! Local error channel for sink failures
//!
//! Appender failures during steady-state logging must never reach the code
//! that called the logger. They are handed to an [`ErrorChannel`] instead,
//! which prints them on stderr unless a callback has been installed.

use std::fmt;
use std::sync::Arc;

/// What the failing sink was doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    Generic,
    Write,
    Flush,
    Close,
    /// The sink panicked instead of returning an error
    Panic,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::Generic => "operation",
            FailureKind::Write => "write",
            FailureKind::Flush => "flush",
            FailureKind::Close => "close",
            FailureKind::Panic => "panic",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Name of the sink (or logger) that failed
    pub origin: String,
    pub kind: FailureKind,
    pub message: String,
}

pub type ErrorCallback = Arc<dyn Fn(&ErrorReport) + Send + Sync>;

#[derive(Clone, Default)]
pub struct ErrorChannel {
    callback: Option<ErrorCallback>,
}

impl ErrorChannel {
    /// Channel that prints every report on stderr
    pub fn stderr() -> Self {
        Self { callback: None }
    }

    pub fn with_callback(callback: ErrorCallback) -> Self {
        Self {
            callback: Some(callback),
        }
    }

    pub fn report(&self, origin: &str, kind: FailureKind, message: impl Into<String>) {
        let report = ErrorReport {
            origin: origin.to_string(),
            kind,
            message: message.into(),
        };

        match self.callback {
            Some(ref callback) => callback(&report),
            None if kind == FailureKind::Panic => eprintln!(
                "[LOGGER CRITICAL] Appender '{}' panicked: {}. \
                 Other appenders continue to function.",
                report.origin, report.message
            ),
            None => eprintln!(
                "[LOGGER ERROR] Appender '{}' {} failed: {}",
                report.origin, report.kind, report.message
            ),
        }
    }
}

impl fmt::Debug for ErrorChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErrorChannel")
            .field("callback", &self.callback.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    #[test]
    fn test_callback_receives_reports() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = Arc::clone(&seen);
        let channel = ErrorChannel::with_callback(Arc::new(move |report: &ErrorReport| {
            seen_clone.lock().push(report.clone());
        }));

        channel.report("database", FailureKind::Write, "no such table");
        channel.report("file", FailureKind::Close, "bad descriptor");

        let seen = seen.lock();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].origin, "database");
        assert_eq!(seen[0].kind, FailureKind::Write);
        assert_eq!(seen[1].message, "bad descriptor");
    }

    #[test]
    fn test_stderr_channel_does_not_panic() {
        let channel = ErrorChannel::stderr();
        channel.report("console", FailureKind::Flush, "broken pipe");
        channel.report("console", FailureKind::Panic, "boom");
    }
}
