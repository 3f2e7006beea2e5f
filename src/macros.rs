//! Logging macros for ergonomic log message formatting.
//!
//! The macros take anything that dereferences to a [`JobLogger`](crate::JobLogger)
//! and format their arguments like `format!`. Formatting is skipped when the
//! level is below the logger's threshold.
//!
//! # Examples
//!
//! ```
//! use job_logger::prelude::*;
//! use job_logger::{error, message};
//!
//! let config = Config::defaults().with(ConfigKey::ConsoleEnabled, "false");
//! let logger = LoggerFactory::new(config).get_logger("nightly-import");
//!
//! message!(logger, "Import started");
//!
//! let rows = 1200;
//! let file = "accounts.csv";
//! error!(logger, "Import of {} failed after {} rows", file, rows);
//! ```

/// Log a formatted message at an explicit level.
///
/// # Examples
///
/// ```
/// # use job_logger::prelude::*;
/// # let logger = NullLogger::shared();
/// use job_logger::log;
/// log!(logger, LogLevel::Message, "Simple message");
/// log!(logger, LogLevel::Error, "Exit code: {}", 3);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        use $crate::JobLogger as _;
        let level = $level;
        let logger = &$logger;
        if logger.is_enabled(level) {
            logger.log(level, &format!($($arg)+), &[], None);
        }
    }};
}

/// Log a message-level record.
#[macro_export]
macro_rules! message {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Message, $($arg)+)
    };
}

/// Log a warning-level record.
///
/// # Examples
///
/// ```
/// # use job_logger::prelude::*;
/// # let logger = NullLogger::shared();
/// use job_logger::warning;
/// warning!(logger, "Disk usage at {}%", 91);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level record.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::core::{Appender, LevelFilter, LogEntry, LogLevel, Logger, Result};
    use crate::facade::StandardLogger;
    use parking_lot::Mutex;
    use std::sync::Arc;

    struct Recording(Arc<Mutex<Vec<String>>>);

    impl Appender for Recording {
        fn append(&mut self, entry: &LogEntry) -> Result<()> {
            self.0
                .lock()
                .push(format!("{} {}", entry.level, entry.formatted_message()));
            Ok(())
        }

        fn flush(&mut self) -> Result<()> {
            Ok(())
        }

        fn name(&self) -> &str {
            "recording"
        }
    }

    fn recording_logger(min_level: LevelFilter) -> (StandardLogger, Arc<Mutex<Vec<String>>>) {
        let lines = Arc::new(Mutex::new(Vec::new()));
        let engine = Logger::builder("macros")
            .min_level(min_level)
            .appender(Recording(Arc::clone(&lines)))
            .build();
        (StandardLogger::from_logger(engine), lines)
    }

    #[test]
    fn test_macros_format_and_tag_levels() {
        let (logger, lines) = recording_logger(LevelFilter::All);

        message!(logger, "started");
        warning!(logger, "{} retries left", 2);
        error!(logger, "failed: {}", "timeout");
        log!(logger, LogLevel::Warning, "explicit");

        assert_eq!(
            *lines.lock(),
            vec![
                "MESSAGE started",
                "WARNING 2 retries left",
                "ERROR failed: timeout",
                "WARNING explicit",
            ]
        );
    }

    #[test]
    fn test_macros_skip_filtered_levels() {
        let (logger, lines) = recording_logger(LevelFilter::AtLeast(LogLevel::Error));

        message!(logger, "hidden");
        warning!(logger, "hidden");
        error!(logger, "shown");

        assert_eq!(*lines.lock(), vec!["ERROR shown"]);
    }
}
