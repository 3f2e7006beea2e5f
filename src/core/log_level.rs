//! Log level definitions

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record. Ranks are stable: MESSAGE < WARNING < ERROR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    Message = 1,
    Warning = 2,
    Error = 3,
}

impl LogLevel {
    pub const ALL_LEVELS: [LogLevel; 3] = [LogLevel::Message, LogLevel::Warning, LogLevel::Error];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Message => "MESSAGE",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// Numeric rank used for ordering
    pub fn rank(&self) -> u8 {
        *self as u8
    }

    #[cfg(feature = "console")]
    pub fn color_code(&self) -> colored::Color {
        use colored::Color::*;
        match self {
            LogLevel::Message => Green,
            LogLevel::Warning => Yellow,
            LogLevel::Error => Red,
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "MESSAGE" => Ok(LogLevel::Message),
            "WARNING" | "WARN" => Ok(LogLevel::Warning),
            "ERROR" => Ok(LogLevel::Error),
            _ => Err(LoggerError::config(
                "min.level",
                format!("Invalid log level: '{}'", s),
            )),
        }
    }
}

/// Minimum severity a logger lets through.
///
/// `All` is the inclusive sentinel: it matches every record regardless of level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelFilter {
    #[default]
    All,
    AtLeast(LogLevel),
}

impl LevelFilter {
    #[inline]
    pub fn allows(&self, level: LogLevel) -> bool {
        match self {
            LevelFilter::All => true,
            LevelFilter::AtLeast(min) => level >= *min,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        LevelFilter::AtLeast(level)
    }
}

impl fmt::Display for LevelFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelFilter::All => f.write_str("ALL"),
            LevelFilter::AtLeast(level) => write!(f, "{}", level),
        }
    }
}

impl FromStr for LevelFilter {
    type Err = LoggerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("ALL") {
            return Ok(LevelFilter::All);
        }
        s.parse::<LogLevel>().map(LevelFilter::AtLeast)
    }
}
