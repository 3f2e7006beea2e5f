//! Logger factory
//!
//! Maps the configured `implementation` identifier to a constructor and
//! builds loggers on request. Construction failures never reach the caller:
//! they are printed on stderr and the shared [`NullLogger`] is returned.

use crate::config::{CachePolicy, Config, ConfigKey};
use crate::connection::ConnectionRegistry;
use crate::core::{LoggerError, Result};
use crate::facade::{JobLogger, NullLogger, StandardLogger};
use crate::util;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, OnceLock};

/// Builds a logger named by the first argument
pub type LoggerConstructor =
    fn(&str, &Config, &ConnectionRegistry) -> Result<Arc<dyn JobLogger>>;

pub const STANDARD_IMPLEMENTATION: &str = "standard";
pub const NULL_IMPLEMENTATION: &str = "null";

fn standard_constructor(
    name: &str,
    config: &Config,
    connections: &ConnectionRegistry,
) -> Result<Arc<dyn JobLogger>> {
    Ok(Arc::new(StandardLogger::init(name, config, connections)?))
}

fn null_constructor(
    _name: &str,
    _config: &Config,
    _connections: &ConnectionRegistry,
) -> Result<Arc<dyn JobLogger>> {
    Ok(NullLogger::shared())
}

/// A cached logger and the configuration it was built from
struct CachedLogger {
    config: Config,
    logger: Arc<dyn JobLogger>,
}

/// Identifier of the implementation `config` selects
fn implementation_of(config: &Config) -> &str {
    config
        .get(ConfigKey::Implementation)
        .map(str::trim)
        .unwrap_or(STANDARD_IMPLEMENTATION)
}

pub struct LoggerFactory {
    config: Config,
    implementations: RwLock<HashMap<String, LoggerConstructor>>,
    connections: ConnectionRegistry,
    cache: Mutex<HashMap<String, CachedLogger>>,
}

impl LoggerFactory {
    /// Factory over `config` knowing the `standard` and `null` implementations
    pub fn new(config: Config) -> Self {
        let mut implementations: HashMap<String, LoggerConstructor> = HashMap::new();
        implementations.insert(STANDARD_IMPLEMENTATION.to_string(), standard_constructor);
        implementations.insert(NULL_IMPLEMENTATION.to_string(), null_constructor);

        Self {
            config,
            implementations: RwLock::new(implementations),
            connections: ConnectionRegistry::new(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Factory over [`Config::resolve_default`]
    pub fn from_default_config() -> Self {
        Self::new(Config::resolve_default())
    }

    /// Process-wide factory, configured once on first use
    pub fn global() -> &'static LoggerFactory {
        static GLOBAL: OnceLock<LoggerFactory> = OnceLock::new();
        GLOBAL.get_or_init(LoggerFactory::from_default_config)
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn connections(&self) -> &ConnectionRegistry {
        &self.connections
    }

    /// Make `constructor` selectable as `implementation = "<identifier>"`.
    /// Replaces any constructor registered under the same identifier.
    pub fn register(&self, identifier: &str, constructor: LoggerConstructor) {
        self.implementations
            .write()
            .insert(identifier.trim().to_string(), constructor);
    }

    /// Registered identifiers, sorted
    pub fn implementations(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.implementations.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Logger named `name` built from the factory configuration. Never fails.
    pub fn get_logger(&self, name: &str) -> Arc<dyn JobLogger> {
        self.get_logger_with(name, &self.config)
    }

    /// Logger named `name` built from `config`. Never fails.
    pub fn get_logger_with(&self, name: &str, config: &Config) -> Arc<dyn JobLogger> {
        let attempt = panic::catch_unwind(AssertUnwindSafe(|| self.try_get_logger(name, config)));

        match attempt {
            Ok(Ok(logger)) => logger,
            Ok(Err(e)) => {
                eprintln!(
                    "[LOGGER ERROR] Unable to get logger '{}' (implementation '{}'): {}",
                    name,
                    implementation_of(config),
                    e
                );
                NullLogger::shared()
            }
            Err(panic_info) => {
                let reason = panic_info
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic_info.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "Unknown panic".to_string());
                eprintln!(
                    "[LOGGER CRITICAL] Logger construction for '{}' (implementation '{}') panicked: {}",
                    name,
                    implementation_of(config),
                    reason
                );
                NullLogger::shared()
            }
        }
    }

    /// Like [`get_logger_with`](Self::get_logger_with), but returns the failure.
    ///
    /// Under [`CachePolicy::ByName`] a cached logger is reused only when it was
    /// built from a configuration equal to `config`; otherwise a new one is
    /// built and replaces it.
    pub fn try_get_logger(&self, name: &str, config: &Config) -> Result<Arc<dyn JobLogger>> {
        if util::is_blank(Some(name)) {
            return Err(LoggerError::argument("name", "can't be empty"));
        }

        let policy = config.cache_policy()?;
        if policy == CachePolicy::ByName {
            if let Some(cached) = self.cache.lock().get(name) {
                if cached.config == *config {
                    return Ok(Arc::clone(&cached.logger));
                }
            }
        }

        let identifier = implementation_of(config);
        let constructor = self
            .implementations
            .read()
            .get(identifier)
            .copied()
            .ok_or_else(|| LoggerError::UnknownImplementation(identifier.to_string()))?;

        let logger = constructor(name, config, &self.connections)?;

        if policy == CachePolicy::ByName && !logger.is_noop() {
            // A concurrent caller with the same configuration may have won the race
            let mut cache = self.cache.lock();
            if let Some(cached) = cache.get(name) {
                if cached.config == *config {
                    return Ok(Arc::clone(&cached.logger));
                }
            }
            cache.insert(
                name.to_string(),
                CachedLogger {
                    config: config.clone(),
                    logger: Arc::clone(&logger),
                },
            );
        }

        Ok(logger)
    }

    /// Drop cached loggers and close every registry connection
    pub fn shutdown(&self) {
        let cached: Vec<Arc<dyn JobLogger>> = self
            .cache
            .lock()
            .drain()
            .map(|(_, cached)| cached.logger)
            .collect();
        for logger in cached {
            if let Err(e) = logger.flush() {
                eprintln!(
                    "[LOGGER ERROR] Failed to flush logger '{}': {}",
                    logger.name(),
                    e
                );
            }
        }
        self.connections.close_all();
    }
}

impl fmt::Debug for LoggerFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerFactory")
            .field("config", &self.config)
            .field("implementations", &self.implementations())
            .field("cached", &self.cache.lock().len())
            .field("connections", &self.connections)
            .finish()
    }
}

/// Logger from the global factory
pub fn get_logger(name: &str) -> Arc<dyn JobLogger> {
    LoggerFactory::global().get_logger(name)
}

/// Logger from the global factory, named after the type `T`
pub fn get_logger_for<T: ?Sized>() -> Arc<dyn JobLogger> {
    get_logger(std::any::type_name::<T>())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_config() -> Config {
        Config::defaults().with(ConfigKey::ConsoleEnabled, "false")
    }

    fn panicking_constructor(
        _name: &str,
        _config: &Config,
        _connections: &ConnectionRegistry,
    ) -> Result<Arc<dyn JobLogger>> {
        panic!("constructor exploded")
    }

    #[test]
    fn test_builtin_implementations() {
        let factory = LoggerFactory::new(quiet_config());
        assert_eq!(factory.implementations(), vec!["null", "standard"]);

        let logger = factory.get_logger("jobs");
        assert!(!logger.is_noop());
        assert_eq!(logger.name(), "jobs");
    }

    #[test]
    fn test_unknown_implementation_falls_back() {
        let factory =
            LoggerFactory::new(quiet_config().with(ConfigKey::Implementation, "com.acme.Missing"));

        let err = factory
            .try_get_logger("jobs", factory.config())
            .err()
            .unwrap();
        assert!(matches!(err, LoggerError::UnknownImplementation(_)));

        let logger = factory.get_logger("jobs");
        assert!(logger.is_noop());
        logger.error("still accepted");
    }

    #[test]
    fn test_blank_name_falls_back() {
        let factory = LoggerFactory::new(quiet_config());
        assert!(factory.get_logger(" ").is_noop());
    }

    #[test]
    fn test_panicking_constructor_falls_back() {
        let factory = LoggerFactory::new(quiet_config().with(ConfigKey::Implementation, "boom"));
        factory.register("boom", panicking_constructor);

        assert!(factory.get_logger("jobs").is_noop());
    }

    #[test]
    fn test_null_implementation() {
        let factory = LoggerFactory::new(quiet_config().with(ConfigKey::Implementation, "null"));
        assert!(factory.get_logger("jobs").is_noop());
    }

    #[test]
    fn test_cache_policy_none_builds_fresh_loggers() {
        let factory = LoggerFactory::new(quiet_config());
        let first = factory.get_logger("jobs");
        let second = factory.get_logger("jobs");
        assert!(!Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_cache_policy_by_name_reuses_loggers() {
        let factory = LoggerFactory::new(quiet_config().with(ConfigKey::CachePolicy, "by-name"));
        let first = factory.get_logger("jobs");
        let second = factory.get_logger("jobs");
        let other = factory.get_logger("reports");

        assert!(Arc::ptr_eq(&first, &second));
        assert!(!Arc::ptr_eq(&first, &other));
    }

    #[test]
    fn test_cache_respects_the_callers_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let base = quiet_config().with(ConfigKey::CachePolicy, "by-name");
        let factory = LoggerFactory::new(base.clone());

        let first = factory.get_logger("jobs");
        assert!(first.appender_names().is_empty());

        let with_file = base
            .with(ConfigKey::FileEnabled, "true")
            .with(
                ConfigKey::FileDestination,
                dir.path().join("jobs.log").to_string_lossy(),
            );
        let second = factory.get_logger_with("jobs", &with_file);
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.appender_names(), vec!["file"]);

        let again = factory.get_logger_with("jobs", &with_file);
        assert!(Arc::ptr_eq(&second, &again));
    }

    #[test]
    fn test_implementation_of() {
        assert_eq!(implementation_of(&Config::from_map(Default::default())), "standard");
        let config = quiet_config().with(ConfigKey::Implementation, " null ");
        assert_eq!(implementation_of(&config), "null");
    }

    #[test]
    fn test_fallback_is_not_cached() {
        let factory = LoggerFactory::new(
            quiet_config()
                .with(ConfigKey::CachePolicy, "by-name")
                .with(ConfigKey::MinLevel, "LOUD"),
        );
        assert!(factory.get_logger("jobs").is_noop());

        let fixed = factory.config().clone().with(ConfigKey::MinLevel, "ERROR");
        assert!(!factory.get_logger_with("jobs", &fixed).is_noop());
    }

    #[test]
    fn test_get_logger_for_uses_type_name() {
        let factory = LoggerFactory::new(quiet_config());
        let logger = factory.get_logger(std::any::type_name::<LoggerFactory>());
        assert_eq!(logger.name(), "job_logger::factory::LoggerFactory");
    }
}
