//! Database appender
//!
//! Persists one row per record into a relational table, creating the table on
//! construction when it does not exist. Write, clear and close failures go to
//! the appender's [`ErrorChannel`]; none of them reach the logging caller.

use crate::connection::DbConnection;
use crate::core::{Appender, ErrorChannel, FailureKind, LogEntry, LoggerError, Result};
use crate::util;
use rusqlite::params;

pub const LEVEL_MAX_CHARS: usize = 32;
pub const LOGGER_MAX_CHARS: usize = 255;
pub const MESSAGE_MAX_CHARS: usize = 255;
pub const STACK_TRACE_MAX_CHARS: usize = 8192;

const TABLE_KEY: &str = "{table}";
const CREATE_SQL: &str = "CREATE TABLE IF NOT EXISTS {table} (\
    logTime timestamp, \
    level varchar(32), \
    logger varchar(255), \
    message varchar(255), \
    sequence integer, \
    threadID integer, \
    stackTrace varchar(8192))";
const INSERT_SQL: &str = "INSERT INTO {table} \
    (logTime, level, logger, message, sequence, threadID, stackTrace) \
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)";
// SQLite has no TRUNCATE; an unqualified DELETE is its equivalent
const TRUNCATE_SQL: &str = "DELETE FROM {table}";

/// Database appender bound to one table
///
/// # Example
///
/// ```
/// use job_logger::appenders::DatabaseAppender;
/// use job_logger::connection::DbConnection;
/// use job_logger::prelude::*;
///
/// let connection = DbConnection::open_in_memory().unwrap();
/// let appender = DatabaseAppender::new(connection.clone(), "joblogger").unwrap();
///
/// let logger = Logger::builder("nightly-import").appender(appender).build();
/// logger.error("Import aborted");
///
/// let rows: i64 = connection
///     .with(|c| c.query_row("SELECT COUNT(*) FROM joblogger", [], |r| r.get(0)))
///     .unwrap();
/// assert_eq!(rows, 1);
/// ```
pub struct DatabaseAppender {
    connection: DbConnection,
    table: String,
    insert_sql: String,
    truncate_sql: String,
    errors: ErrorChannel,
}

impl DatabaseAppender {
    /// Bind an appender to `table`, creating the table if it is absent.
    ///
    /// # Errors
    ///
    /// An argument error when `table` is blank or not a plain SQL identifier
    /// (optionally schema-qualified); a database error when the table cannot
    /// be created or the statements cannot be prepared.
    pub fn new(connection: DbConnection, table: &str) -> Result<Self> {
        if util::is_blank(Some(table)) {
            return Err(LoggerError::argument("table", "can't be empty"));
        }

        let table = table.trim();
        if !Self::is_valid_identifier(table) {
            return Err(LoggerError::argument(
                "table",
                format!("'{}' is not a valid table name", table),
            ));
        }

        let insert_sql = INSERT_SQL.replace(TABLE_KEY, table);
        let truncate_sql = TRUNCATE_SQL.replace(TABLE_KEY, table);

        connection.with(|conn| {
            conn.execute_batch(&CREATE_SQL.replace(TABLE_KEY, table))?;
            // Prepare once up front so later calls hit the statement cache
            conn.prepare_cached(&insert_sql)?;
            conn.prepare_cached(&truncate_sql)?;
            Ok(())
        })?;

        Ok(Self {
            connection,
            table: table.to_string(),
            insert_sql,
            truncate_sql,
            errors: ErrorChannel::stderr(),
        })
    }

    #[must_use]
    pub fn with_error_channel(mut self, errors: ErrorChannel) -> Self {
        self.errors = errors;
        self
    }

    fn is_valid_identifier(table: &str) -> bool {
        table.split('.').all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn connection(&self) -> &DbConnection {
        &self.connection
    }

    /// Insert one row for `entry`, returning any database error
    pub fn try_publish(&self, entry: &LogEntry) -> Result<()> {
        let message = entry.formatted_message();

        self.connection.with(|conn| {
            let mut stmt = conn.prepare_cached(&self.insert_sql)?;
            stmt.execute(params![
                entry.timestamp,
                util::truncate(Some(entry.level.to_str()), LEVEL_MAX_CHARS),
                util::truncate(Some(entry.logger.as_str()), LOGGER_MAX_CHARS),
                util::truncate(Some(message.as_str()), MESSAGE_MAX_CHARS),
                entry.sequence as i64,
                entry.thread_id as i64,
                util::truncate(entry.error.as_deref(), STACK_TRACE_MAX_CHARS),
            ])?;
            Ok(())
        })
    }

    /// Insert one row for `entry`. Failures are reported, never returned.
    pub fn publish(&self, entry: &LogEntry) {
        if let Err(e) = self.try_publish(entry) {
            self.errors.report("database", FailureKind::Write, e.to_string());
        }
    }

    /// Delete every row of the table. Failures are reported, never returned.
    pub fn clear(&self) {
        let result = self.connection.with(|conn| {
            conn.prepare_cached(&self.truncate_sql)?.execute([])?;
            Ok(())
        });

        if let Err(e) = result {
            self.errors
                .report("database", FailureKind::Generic, e.to_string());
        }
    }
}

impl Appender for DatabaseAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        self.publish(entry);
        Ok(())
    }

    /// Every insert is committed on execution
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }

    /// Close the shared connection; a failure is reported, not returned
    fn close(&mut self) -> Result<()> {
        if let Err(e) = self.connection.close() {
            self.errors
                .report("database", FailureKind::Close, e.to_string());
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "database"
    }
}
