//! Core logger types and traits

pub mod appender;
pub mod error;
pub mod error_channel;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;

pub use appender::Appender;
pub use error::{LoggerError, Result};
pub use error_channel::{ErrorCallback, ErrorChannel, ErrorReport, FailureKind};
pub use log_entry::LogEntry;
pub use log_level::{LevelFilter, LogLevel};
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
