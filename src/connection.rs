//! Shared database connections
//!
//! A [`DbConnection`] is a cloneable handle to one SQLite connection guarded by
//! a mutex. The [`ConnectionRegistry`] opens at most one connection per set of
//! connection settings and hands out clones of the same handle to every
//! logger that asks for it. Nothing here closes a connection implicitly: only
//! [`DbConnection::close`] (reached through a database appender's `close`) or
//! [`ConnectionRegistry::close_all`] does.

use crate::core::{LoggerError, Result};
use crate::util;
use parking_lot::Mutex;
use rusqlite::{Connection, OpenFlags};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// SQL drivers known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Driver {
    Sqlite,
}

impl FromStr for Driver {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sqlite" | "sqlite3" | "rusqlite" => Ok(Driver::Sqlite),
            _ => Err(LoggerError::UnknownDriver(s.to_string())),
        }
    }
}

/// Parameters needed to open a connection.
///
/// `user` and `password` are carried for drivers that authenticate; SQLite
/// ignores them.
#[derive(Clone, PartialEq, Eq)]
pub struct DbSettings {
    pub driver: String,
    pub url: String,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl DbSettings {
    pub fn new(driver: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            driver: driver.into(),
            url: url.into(),
            user: None,
            password: None,
        }
    }

    #[must_use]
    pub fn with_credentials(mut self, user: Option<String>, password: Option<String>) -> Self {
        self.user = user;
        self.password = password;
        self
    }

    fn validate(&self) -> Result<Driver> {
        if util::is_blank(Some(self.driver.as_str())) {
            return Err(LoggerError::argument("driver", "can't be empty"));
        }
        if util::is_blank(Some(self.url.as_str())) {
            return Err(LoggerError::argument("url", "can't be empty"));
        }
        self.driver.parse()
    }

    fn registry_key(&self, driver: Driver) -> String {
        format!(
            "{:?}|{}|{}",
            driver,
            self.url.trim(),
            self.user.as_deref().unwrap_or_default()
        )
    }
}

impl fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbSettings")
            .field("driver", &self.driver)
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

/// Cloneable handle to one shared connection
#[derive(Clone)]
pub struct DbConnection {
    url: Arc<str>,
    inner: Arc<Mutex<Option<Connection>>>,
}

impl DbConnection {
    /// Open a new connection. Prefer [`ConnectionRegistry::get_or_open`] to share one.
    pub fn open(settings: &DbSettings) -> Result<Self> {
        match settings.validate()? {
            Driver::Sqlite => {
                let url = settings.url.trim();
                let conn = if url == ":memory:" {
                    Connection::open_in_memory()?
                } else if url.starts_with("file:") {
                    Connection::open_with_flags(url, OpenFlags::default() | OpenFlags::SQLITE_OPEN_URI)?
                } else {
                    Connection::open(url)?
                };
                Ok(Self::from_connection(url, conn))
            }
        }
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self::from_connection(":memory:", Connection::open_in_memory()?))
    }

    /// Wrap a connection opened elsewhere
    pub fn from_connection(url: &str, conn: Connection) -> Self {
        Self {
            url: Arc::from(url),
            inner: Arc::new(Mutex::new(Some(conn))),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_open(&self) -> bool {
        self.inner.lock().is_some()
    }

    /// Run `f` with exclusive access to the connection
    pub fn with<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        let guard = self.inner.lock();
        let conn = guard
            .as_ref()
            .ok_or_else(|| LoggerError::connection_closed(self.url.as_ref()))?;
        Ok(f(conn)?)
    }

    /// Close the connection for every holder of this handle.
    ///
    /// Closing an already closed connection is a no-op. If the driver refuses
    /// to close, the connection stays usable and the error is returned.
    pub fn close(&self) -> Result<()> {
        let mut guard = self.inner.lock();
        if let Some(conn) = guard.take() {
            if let Err((conn, e)) = conn.close() {
                *guard = Some(conn);
                return Err(e.into());
            }
        }
        Ok(())
    }

    pub fn same_connection(&self, other: &DbConnection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for DbConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DbConnection")
            .field("url", &self.url)
            .field("open", &self.is_open())
            .finish()
    }
}

/// Lazily opened connections, at most one per settings
#[derive(Default)]
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<String, DbConnection>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the open connection for `settings`, opening it on first use.
    ///
    /// The check and the open happen under the registry lock, so concurrent
    /// callers never open two connections for the same settings. A connection
    /// that was closed through one of its handles is reopened.
    pub fn get_or_open(&self, settings: &DbSettings) -> Result<DbConnection> {
        let driver = settings.validate()?;
        let key = settings.registry_key(driver);

        let mut connections = self.connections.lock();
        if let Some(existing) = connections.get(&key) {
            if existing.is_open() {
                return Ok(existing.clone());
            }
        }

        let conn = DbConnection::open(settings)?;
        connections.insert(key, conn.clone());
        Ok(conn)
    }

    /// Number of connections currently open
    pub fn open_count(&self) -> usize {
        self.connections
            .lock()
            .values()
            .filter(|c| c.is_open())
            .count()
    }

    /// Close and forget every connection. Close failures are printed, not returned.
    pub fn close_all(&self) {
        let drained: Vec<DbConnection> = self.connections.lock().drain().map(|(_, c)| c).collect();
        for conn in drained {
            if let Err(e) = conn.close() {
                eprintln!(
                    "[LOGGER ERROR] Failed to close database connection '{}': {}",
                    conn.url(),
                    e
                );
            }
        }
    }
}

impl fmt::Debug for ConnectionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionRegistry")
            .field("open", &self.open_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_settings() -> DbSettings {
        DbSettings::new("sqlite", ":memory:")
            .with_credentials(Some("sa".to_string()), Some(String::new()))
    }

    #[test]
    fn test_driver_parsing() {
        assert_eq!("SQLite".parse::<Driver>().unwrap(), Driver::Sqlite);
        assert_eq!("rusqlite".parse::<Driver>().unwrap(), Driver::Sqlite);

        let err = "org.hsqldb.jdbcDriver".parse::<Driver>().unwrap_err();
        assert!(matches!(err, LoggerError::UnknownDriver(_)));
    }

    #[test]
    fn test_blank_settings_are_argument_errors() {
        let err = DbConnection::open(&DbSettings::new(" ", ":memory:")).unwrap_err();
        assert!(err.is_argument_error());

        let err = DbConnection::open(&DbSettings::new("sqlite", "")).unwrap_err();
        assert!(err.is_argument_error());
    }

    #[test]
    fn test_registry_opens_once() {
        let registry = ConnectionRegistry::new();
        let first = registry.get_or_open(&memory_settings()).unwrap();
        let second = registry.get_or_open(&memory_settings()).unwrap();

        assert!(first.same_connection(&second));
        assert_eq!(registry.open_count(), 1);
    }

    #[test]
    fn test_registry_reopens_closed_connection() {
        let registry = ConnectionRegistry::new();
        let first = registry.get_or_open(&memory_settings()).unwrap();
        first.close().unwrap();
        assert_eq!(registry.open_count(), 0);

        let second = registry.get_or_open(&memory_settings()).unwrap();
        assert!(second.is_open());
        assert!(!first.same_connection(&second));
    }

    #[test]
    fn test_closed_connection_rejects_use() {
        let conn = DbConnection::open_in_memory().unwrap();
        conn.close().unwrap();
        conn.close().unwrap();

        let err = conn.with(|c| c.execute_batch("SELECT 1")).unwrap_err();
        assert!(matches!(err, LoggerError::ConnectionClosed { .. }));
    }

    #[test]
    fn test_close_all() {
        let registry = ConnectionRegistry::new();
        let conn = registry.get_or_open(&memory_settings()).unwrap();
        registry.close_all();

        assert!(!conn.is_open());
        assert_eq!(registry.open_count(), 0);
    }

    #[test]
    fn test_debug_masks_password() {
        let settings = DbSettings::new("sqlite", ":memory:")
            .with_credentials(Some("sa".to_string()), Some("secret".to_string()));
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("secret"));
        assert!(rendered.contains("***"));
    }
}
