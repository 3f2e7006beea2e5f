//! Logger façade handed out by the factory
//!
//! [`JobLogger`] is the object-safe surface callers log through.
//! [`StandardLogger`] wires a configured [`Logger`] engine behind it;
//! [`NullLogger`] accepts everything and does nothing, and is what the
//! factory falls back to when a logger cannot be built.

use crate::appenders::{ConsoleAppender, DatabaseAppender, FileAppender};
use crate::config::{Config, ConfigKey};
use crate::connection::ConnectionRegistry;
use crate::core::{LogLevel, Logger, LoggerError, LoggerMetrics, Result};
use crate::util;
use std::error::Error;
use std::fmt::{self, Display};
use std::sync::{Arc, OnceLock};

pub trait JobLogger: Send + Sync {
    fn name(&self) -> &str;

    /// Log `message` at `level` with positional parameters and an optional cause
    fn log(
        &self,
        level: LogLevel,
        message: &str,
        params: &[&dyn Display],
        error: Option<&(dyn Error + 'static)>,
    );

    fn is_enabled(&self, level: LogLevel) -> bool;

    /// Names of the attached appenders, in attachment order
    fn appender_names(&self) -> Vec<String> {
        Vec::new()
    }

    /// True for loggers that discard every record
    fn is_noop(&self) -> bool {
        false
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    /// Close every appender. Closing a database appender closes its shared connection.
    fn close(&self) {}

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message, &[], None);
    }

    fn error_with_params(&self, message: &str, params: &[&dyn Display]) {
        self.log(LogLevel::Error, message, params, None);
    }

    fn error_with_source(&self, message: &str, error: &(dyn Error + 'static)) {
        self.log(LogLevel::Error, message, &[], Some(error));
    }

    fn warning(&self, message: &str) {
        self.log(LogLevel::Warning, message, &[], None);
    }

    fn warning_with_params(&self, message: &str, params: &[&dyn Display]) {
        self.log(LogLevel::Warning, message, params, None);
    }

    fn warning_with_source(&self, message: &str, error: &(dyn Error + 'static)) {
        self.log(LogLevel::Warning, message, &[], Some(error));
    }

    fn message(&self, message: &str) {
        self.log(LogLevel::Message, message, &[], None);
    }

    fn message_with_params(&self, message: &str, params: &[&dyn Display]) {
        self.log(LogLevel::Message, message, params, None);
    }

    fn message_with_source(&self, message: &str, error: &(dyn Error + 'static)) {
        self.log(LogLevel::Message, message, &[], Some(error));
    }
}

impl fmt::Debug for dyn JobLogger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobLogger")
            .field("name", &self.name())
            .field("appenders", &self.appender_names())
            .field("noop", &self.is_noop())
            .finish()
    }
}

/// Configuration-driven logger
pub struct StandardLogger {
    inner: Logger,
}

impl StandardLogger {
    /// Build a logger named `name` from `config`.
    ///
    /// Appenders are attached in the order console, file, database. The
    /// database appender takes its connection from `connections`, so loggers
    /// sharing a registry share one connection per settings.
    ///
    /// # Errors
    ///
    /// An argument error for a blank name. Any appender that cannot be set up
    /// (bad level, unopenable file, unknown driver, unreachable database,
    /// invalid table) fails the whole initialization.
    pub fn init(name: &str, config: &Config, connections: &ConnectionRegistry) -> Result<Self> {
        if util::is_blank(Some(name)) {
            return Err(LoggerError::argument("name", "can't be empty"));
        }

        let mut builder = Logger::builder(name).min_level(config.min_level()?);

        // The database appender is set up before the file is opened, so a
        // failing database never leaves a truncated log file behind.
        let database = if config.get_bool(ConfigKey::DbEnabled) {
            let connection = connections.get_or_open(&config.db_settings())?;
            let table = config.get(ConfigKey::DbTable).unwrap_or_default();
            Some(DatabaseAppender::new(connection, table)?)
        } else {
            None
        };

        if config.get_bool(ConfigKey::ConsoleEnabled) {
            builder = builder.appender(ConsoleAppender::new());
        }

        if config.get_bool(ConfigKey::FileEnabled) {
            let destination = config
                .get(ConfigKey::FileDestination)
                .filter(|d| util::is_not_blank(Some(*d)))
                .ok_or_else(|| {
                    LoggerError::config(ConfigKey::FileDestination.key(), "can't be empty")
                })?;
            let append = config.get_bool(ConfigKey::FileAppend);
            builder = builder.appender(FileAppender::new(destination, append)?);
        }

        if let Some(database) = database {
            builder = builder.appender(database);
        }

        Ok(Self {
            inner: builder.build(),
        })
    }

    /// Wrap an engine assembled by hand
    pub fn from_logger(inner: Logger) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &Logger {
        &self.inner
    }

    pub fn metrics(&self) -> &LoggerMetrics {
        self.inner.metrics()
    }
}

impl JobLogger for StandardLogger {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn log(
        &self,
        level: LogLevel,
        message: &str,
        params: &[&dyn Display],
        error: Option<&(dyn Error + 'static)>,
    ) {
        self.inner.emit(level, message, params, error);
    }

    fn is_enabled(&self, level: LogLevel) -> bool {
        self.inner.is_enabled(level)
    }

    fn appender_names(&self) -> Vec<String> {
        self.inner.appender_names()
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }

    fn close(&self) {
        self.inner.close();
    }
}

/// Logger that discards every record
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NullLogger;

impl NullLogger {
    /// Process-wide shared instance
    pub fn shared() -> Arc<dyn JobLogger> {
        static SHARED: OnceLock<Arc<dyn JobLogger>> = OnceLock::new();
        SHARED
            .get_or_init(|| Arc::new(NullLogger) as Arc<dyn JobLogger>)
            .clone()
    }
}

impl JobLogger for NullLogger {
    fn name(&self) -> &str {
        "null"
    }

    fn log(
        &self,
        _level: LogLevel,
        _message: &str,
        _params: &[&dyn Display],
        _error: Option<&(dyn Error + 'static)>,
    ) {
    }

    fn is_enabled(&self, _level: LogLevel) -> bool {
        false
    }

    fn is_noop(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LevelFilter;
    use tempfile::TempDir;

    fn quiet_config() -> Config {
        Config::defaults().with(ConfigKey::ConsoleEnabled, "false")
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let registry = ConnectionRegistry::new();
        for name in ["", "   "] {
            let err = StandardLogger::init(name, &quiet_config(), &registry)
                .err()
                .unwrap();
            assert!(err.is_argument_error());
        }
    }

    #[test]
    fn test_defaults_attach_console_only() {
        let registry = ConnectionRegistry::new();
        let logger = StandardLogger::init("jobs", &Config::defaults(), &registry).unwrap();

        assert_eq!(logger.appender_names(), vec!["console"]);
        assert_eq!(logger.inner().min_level(), LevelFilter::All);
        assert_eq!(registry.open_count(), 0);
    }

    #[test]
    fn test_min_level_is_applied() {
        let registry = ConnectionRegistry::new();
        let config = quiet_config().with(ConfigKey::MinLevel, "WARNING");
        let logger = StandardLogger::init("jobs", &config, &registry).unwrap();

        assert!(!logger.is_enabled(LogLevel::Message));
        assert!(logger.is_enabled(LogLevel::Warning));
        assert!(logger.is_enabled(LogLevel::Error));

        logger.message("dropped");
        assert_eq!(logger.metrics().filtered_count(), 1);
    }

    #[test]
    fn test_bad_level_fails_init() {
        let registry = ConnectionRegistry::new();
        let config = quiet_config().with(ConfigKey::MinLevel, "VERBOSE");
        assert!(StandardLogger::init("jobs", &config, &registry).is_err());
    }

    #[test]
    fn test_file_appender_receives_records() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("jobs.log");
        let config = quiet_config()
            .with(ConfigKey::FileEnabled, "true")
            .with(ConfigKey::FileDestination, path.to_string_lossy());

        let registry = ConnectionRegistry::new();
        let logger = StandardLogger::init("jobs", &config, &registry).unwrap();
        logger.warning_with_params("retry {0} of {1}", &[&2, &5]);
        logger.flush().unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("WARNING"));
        assert!(content.contains("retry 2 of 5"));
    }

    #[test]
    fn test_unknown_driver_fails_init() {
        let config = quiet_config()
            .with(ConfigKey::DbEnabled, "true")
            .with(ConfigKey::DbDriver, "org.hsqldb.jdbcDriver")
            .with(ConfigKey::DbUrl, ":memory:");

        let err = StandardLogger::init("jobs", &config, &ConnectionRegistry::new())
            .err()
            .unwrap();
        assert!(matches!(err, LoggerError::UnknownDriver(_)));
    }

    #[test]
    fn test_failed_database_leaves_log_file_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("precious.log");
        std::fs::write(&path, "precious\n").unwrap();

        let config = quiet_config()
            .with(ConfigKey::FileEnabled, "true")
            .with(ConfigKey::FileAppend, "false")
            .with(ConfigKey::FileDestination, path.to_string_lossy())
            .with(ConfigKey::DbEnabled, "true")
            .with(ConfigKey::DbDriver, "org.hsqldb.jdbcDriver")
            .with(ConfigKey::DbUrl, ":memory:");

        assert!(StandardLogger::init("jobs", &config, &ConnectionRegistry::new()).is_err());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "precious\n");
    }

    #[test]
    fn test_null_logger_accepts_everything() {
        let logger = NullLogger::shared();
        let io = std::io::Error::new(std::io::ErrorKind::Other, "boom");

        logger.error("");
        logger.error_with_params("", &[]);
        logger.error_with_source("failed", &io);
        logger.warning_with_params("{0}", &[&"x"]);
        logger.message_with_source("", &io);
        logger.close();

        assert!(logger.is_noop());
        assert!(logger.appender_names().is_empty());
        assert!(!logger.is_enabled(LogLevel::Error));
        assert!(logger.flush().is_ok());
    }
}
