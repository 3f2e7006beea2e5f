//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Database error raised by the SQL driver
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Configuration file could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// A caller broke an argument contract (blank name, blank table, ...)
    #[error("Invalid argument '{argument}': {message}")]
    InvalidArgument { argument: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// No logger implementation registered under the identifier
    #[error("Unknown logger implementation '{0}'")]
    UnknownImplementation(String),

    /// No database driver registered under the identifier
    #[error("Could not load database driver '{0}'")]
    UnknownDriver(String),

    /// The shared database connection was already closed
    #[error("Database connection to '{url}' is closed")]
    ConnectionClosed { url: String },

    /// File appender error with path
    #[error("File appender error for '{path}': {message}")]
    FileAppenderError { path: String, message: String },

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create an invalid argument error
    pub fn argument(argument: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidArgument {
            argument: argument.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a file appender error
    pub fn file_appender(path: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::FileAppenderError {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn connection_closed(url: impl Into<String>) -> Self {
        LoggerError::ConnectionClosed { url: url.into() }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }

    /// True for errors raised because a caller broke an argument contract
    pub fn is_argument_error(&self) -> bool {
        matches!(self, LoggerError::InvalidArgument { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = LoggerError::argument("name", "can't be blank");
        assert!(err.is_argument_error());

        let err = LoggerError::config("min.level", "Invalid level");
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(!err.is_argument_error());

        let err = LoggerError::file_appender("/var/log/app.log", "Permission denied");
        assert!(matches!(err, LoggerError::FileAppenderError { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = LoggerError::argument("table", "can't be blank");
        assert_eq!(err.to_string(), "Invalid argument 'table': can't be blank");

        let err = LoggerError::UnknownDriver("org.hsqldb.jdbcDriver".to_string());
        assert_eq!(
            err.to_string(),
            "Could not load database driver 'org.hsqldb.jdbcDriver'"
        );

        let err = LoggerError::connection_closed(":memory:");
        assert_eq!(err.to_string(), "Database connection to ':memory:' is closed");
    }

    #[test]
    fn test_io_operation_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = LoggerError::io_operation("opening log file", "cannot open file", io_err);

        assert!(matches!(err, LoggerError::IoOperation { .. }));
        assert!(err.to_string().contains("opening log file"));
        assert!(err.to_string().contains("cannot open file"));
    }
}
