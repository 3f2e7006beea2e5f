//! Logger configuration
//!
//! # Data Flow
//! ```text
//! joblogger.toml (optional)
//!     → load_file (parse, flatten nested tables to dotted keys)
//!     → defaults applied to absent or blank keys
//!     → Config (immutable)
//!     → read by LoggerFactory on every get_logger call
//! ```
//!
//! A missing or unreadable file never fails resolution: the condition is
//! printed on stderr and the defaults are used.

use crate::connection::DbSettings;
use crate::core::{LevelFilter, LoggerError, Result};
use crate::util;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// File looked up when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "joblogger.toml";

/// Environment variable overriding [`DEFAULT_CONFIG_FILE`]
pub const CONFIG_PATH_ENV: &str = "JOBLOGGER_CONFIG";

/// Recognized configuration keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    // Global properties
    Implementation,
    MinLevel,
    CachePolicy,

    // Console appender
    ConsoleEnabled,

    // File appender
    FileEnabled,
    FileAppend,
    FileDestination,

    // Database appender
    DbEnabled,
    DbDriver,
    DbUrl,
    DbUser,
    DbPassword,
    DbTable,
}

impl ConfigKey {
    pub const ALL: [ConfigKey; 13] = [
        ConfigKey::Implementation,
        ConfigKey::MinLevel,
        ConfigKey::CachePolicy,
        ConfigKey::ConsoleEnabled,
        ConfigKey::FileEnabled,
        ConfigKey::FileAppend,
        ConfigKey::FileDestination,
        ConfigKey::DbEnabled,
        ConfigKey::DbDriver,
        ConfigKey::DbUrl,
        ConfigKey::DbUser,
        ConfigKey::DbPassword,
        ConfigKey::DbTable,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ConfigKey::Implementation => "implementation",
            ConfigKey::MinLevel => "min.level",
            ConfigKey::CachePolicy => "cache.policy",
            ConfigKey::ConsoleEnabled => "handler.console.enabled",
            ConfigKey::FileEnabled => "handler.file.enabled",
            ConfigKey::FileAppend => "handler.file.append",
            ConfigKey::FileDestination => "handler.file.destination",
            ConfigKey::DbEnabled => "handler.db.enabled",
            ConfigKey::DbDriver => "handler.db.driver",
            ConfigKey::DbUrl => "handler.db.url",
            ConfigKey::DbUser => "handler.db.user",
            ConfigKey::DbPassword => "handler.db.password",
            ConfigKey::DbTable => "handler.db.table",
        }
    }

    /// Built-in default, `None` for keys that must be supplied when used
    pub fn default_value(&self) -> Option<&'static str> {
        match self {
            ConfigKey::Implementation => Some(crate::factory::STANDARD_IMPLEMENTATION),
            ConfigKey::MinLevel => Some("ALL"),
            ConfigKey::CachePolicy => Some("none"),
            ConfigKey::ConsoleEnabled => Some("true"),
            ConfigKey::FileEnabled => Some("false"),
            ConfigKey::FileAppend => Some("true"),
            ConfigKey::FileDestination => Some("log"),
            ConfigKey::DbEnabled => Some("false"),
            ConfigKey::DbDriver
            | ConfigKey::DbUrl
            | ConfigKey::DbUser
            | ConfigKey::DbPassword => None,
            ConfigKey::DbTable => Some("log"),
        }
    }
}

impl fmt::Display for ConfigKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Whether the factory reuses loggers across calls with the same name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Build a fresh logger on every call
    #[default]
    None,
    /// Reuse the first successfully built logger for a name
    ByName,
}

impl FromStr for CachePolicy {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" => Ok(CachePolicy::None),
            "by-name" | "by_name" => Ok(CachePolicy::ByName),
            _ => Err(LoggerError::config(
                ConfigKey::CachePolicy.key(),
                format!("expected 'none' or 'by-name', got '{}'", s),
            )),
        }
    }
}

/// Set `key` to `value` unless it already holds a non-blank value
pub fn set_if_blank(values: &mut BTreeMap<String, String>, key: &str, value: &str) {
    if util::is_blank(values.get(key).map(String::as_str)) {
        values.insert(key.to_string(), value.to_string());
    }
}

/// Resolved, immutable logger configuration
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    values: BTreeMap<String, String>,
}

impl Config {
    /// Configuration holding only the built-in defaults
    pub fn defaults() -> Self {
        Self::with_defaults(BTreeMap::new())
    }

    /// Use `values` exactly as given, without defaults
    pub fn from_map(values: BTreeMap<String, String>) -> Self {
        Self { values }
    }

    /// Merge `values` with the built-in defaults
    pub fn with_defaults(mut values: BTreeMap<String, String>) -> Self {
        for key in ConfigKey::ALL {
            if let Some(default) = key.default_value() {
                set_if_blank(&mut values, key.key(), default);
            }
        }
        Self { values }
    }

    /// Parse TOML text and merge it with the defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let table: toml::Table = content.parse()?;
        let mut values = BTreeMap::new();
        flatten("", &table, &mut values);
        Ok(Self::with_defaults(values))
    }

    /// Load `path` and merge it with the defaults. Never fails.
    pub fn resolve(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let values = match load_file(path) {
            Ok(Some(values)) => values,
            Ok(None) => {
                eprintln!(
                    "[LOGGER WARNING] Logger configuration '{}' not found, using defaults",
                    path.display()
                );
                BTreeMap::new()
            }
            Err(e) => {
                eprintln!(
                    "[LOGGER ERROR] Error reading logger configuration '{}': {}",
                    path.display(),
                    e
                );
                BTreeMap::new()
            }
        };
        Self::with_defaults(values)
    }

    /// Resolve from `$JOBLOGGER_CONFIG`, or `joblogger.toml` in the working directory
    pub fn resolve_default() -> Self {
        Self::resolve(default_path())
    }

    /// Copy of this configuration with `key` set to `value`
    #[must_use]
    pub fn with(self, key: ConfigKey, value: impl Into<String>) -> Self {
        self.with_raw(key.key(), value)
    }

    #[must_use]
    pub fn with_raw(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_string(), value.into());
        self
    }

    /// Copy of this configuration with `key` removed
    #[must_use]
    pub fn without(mut self, key: ConfigKey) -> Self {
        self.values.remove(key.key());
        self
    }

    pub fn get(&self, key: ConfigKey) -> Option<&str> {
        self.get_raw(key.key())
    }

    pub fn get_raw(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// True only for a case-insensitive "true"; anything else, including absence, is false
    pub fn get_bool(&self, key: ConfigKey) -> bool {
        self.get(key)
            .is_some_and(|v| v.trim().eq_ignore_ascii_case("true"))
    }

    pub fn min_level(&self) -> Result<LevelFilter> {
        self.get(ConfigKey::MinLevel)
            .ok_or_else(|| LoggerError::config(ConfigKey::MinLevel.key(), "missing"))?
            .parse()
    }

    pub fn cache_policy(&self) -> Result<CachePolicy> {
        match self.get(ConfigKey::CachePolicy) {
            Some(v) if util::is_not_blank(Some(v)) => v.parse(),
            _ => Ok(CachePolicy::default()),
        }
    }

    /// Connection settings of the database appender
    pub fn db_settings(&self) -> DbSettings {
        let owned = |key| self.get(key).map(str::to_string);
        DbSettings::new(
            owned(ConfigKey::DbDriver).unwrap_or_default(),
            owned(ConfigKey::DbUrl).unwrap_or_default(),
        )
        .with_credentials(owned(ConfigKey::DbUser), owned(ConfigKey::DbPassword))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let password = ConfigKey::DbPassword.key();
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(k, v)| (k, if k == password { "***" } else { v })),
            )
            .finish()
    }
}

fn default_path() -> PathBuf {
    std::env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

/// Read raw key/value pairs from a TOML file.
///
/// Returns `Ok(None)` when the file does not exist.
pub fn load_file(path: &Path) -> Result<Option<BTreeMap<String, String>>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(LoggerError::io_operation(
                "reading logger configuration",
                path.display().to_string(),
                e,
            ))
        }
    };

    let table: toml::Table = content.parse()?;
    let mut values = BTreeMap::new();
    flatten("", &table, &mut values);
    Ok(Some(values))
}

/// Flatten nested tables into dotted keys; scalars keep their TOML text
fn flatten(prefix: &str, table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let full_key = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };

        match value {
            toml::Value::Table(nested) => flatten(&full_key, nested, out),
            toml::Value::String(s) => {
                out.insert(full_key, s.clone());
            }
            other => {
                out.insert(full_key, other.to_string());
            }
        }
    }
}
