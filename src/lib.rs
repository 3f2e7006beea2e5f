//! # Job Logger
//!
//! A pluggable logging façade for batch jobs. Loggers are obtained from a
//! [`LoggerFactory`], which reads an optional `joblogger.toml`, selects a
//! logger implementation and attaches console, file and database appenders.
//!
//! ## Features
//!
//! - **Three severities**: MESSAGE < WARNING < ERROR, with an `ALL` threshold
//! - **Database sink**: one row per record, table created on first use,
//!   one shared connection per connection settings
//! - **Never fails the caller**: a logger that cannot be built is replaced by
//!   a no-op [`NullLogger`] and the reason is printed on stderr
//!
//! ## Example
//!
//! ```
//! use job_logger::prelude::*;
//!
//! let config = Config::defaults()
//!     .with(ConfigKey::ConsoleEnabled, "false")
//!     .with(ConfigKey::DbEnabled, "true")
//!     .with(ConfigKey::DbDriver, "sqlite")
//!     .with(ConfigKey::DbUrl, ":memory:")
//!     .with(ConfigKey::DbTable, "joblogger");
//!
//! let factory = LoggerFactory::new(config);
//! let logger = factory.get_logger("nightly-import");
//! assert_eq!(logger.appender_names(), vec!["database"]);
//!
//! logger.warning_with_params("row {0} skipped", &[&42]);
//! factory.shutdown();
//! ```

pub mod appenders;
pub mod config;
pub mod connection;
pub mod core;
pub mod facade;
pub mod factory;
pub mod macros;
pub mod util;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, DatabaseAppender, FileAppender};
    pub use crate::config::{CachePolicy, Config, ConfigKey};
    pub use crate::connection::{ConnectionRegistry, DbConnection, DbSettings};
    pub use crate::core::{
        Appender, ErrorChannel, ErrorReport, FailureKind, LevelFilter, LogEntry, LogLevel, Logger,
        LoggerBuilder, LoggerError, LoggerMetrics, Result,
    };
    pub use crate::facade::{JobLogger, NullLogger, StandardLogger};
    pub use crate::factory::{get_logger, get_logger_for, LoggerFactory};
}

pub use appenders::{ConsoleAppender, DatabaseAppender, FileAppender};
pub use config::{CachePolicy, Config, ConfigKey};
pub use connection::{ConnectionRegistry, DbConnection, DbSettings};
pub use core::{
    Appender, ErrorCallback, ErrorChannel, ErrorReport, FailureKind, LevelFilter, LogEntry,
    LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics, Result,
};
pub use facade::{JobLogger, NullLogger, StandardLogger};
pub use factory::{get_logger, get_logger_for, LoggerConstructor, LoggerFactory};
