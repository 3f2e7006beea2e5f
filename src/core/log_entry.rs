//! Log entry structure

use super::log_level::LogLevel;
use crate::util;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::error::Error;
use std::fmt::Display;
use std::sync::atomic::{AtomicU64, Ordering};

/// Process-wide record counter
static NEXT_SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Source of small numeric thread ids
static NEXT_THREAD_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static THREAD_ID_CACHE: Cell<u64> = const { Cell::new(0) };
}

/// Get the numeric id of the current thread, assigning one on first access
fn get_thread_id() -> u64 {
    THREAD_ID_CACHE.with(|cache| {
        if cache.get() == 0 {
            cache.set(NEXT_THREAD_ID.fetch_add(1, Ordering::Relaxed));
        }
        cache.get()
    })
}

/// An immutable log record.
///
/// Created at the call site after the level check has passed, then handed by
/// reference to every appender.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub logger: String,
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
    /// Rendered error chain of the attached error, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub sequence: u64,
    pub timestamp: DateTime<Utc>,
    pub thread_id: u64,
    pub thread_name: Option<String>,
}

impl LogEntry {
    /// Sanitize log message to prevent log injection attacks
    ///
    /// Replaces newlines, carriage returns, and tabs with escape sequences
    /// to prevent attackers from injecting fake log entries.
    fn sanitize_message(message: &str) -> String {
        message
            .replace('\n', "\\n")
            .replace('\r', "\\r")
            .replace('\t', "\\t")
    }

    pub fn new(level: LogLevel, logger: impl Into<String>, message: impl AsRef<str>) -> Self {
        Self {
            level,
            logger: logger.into(),
            message: Self::sanitize_message(message.as_ref()),
            params: Vec::new(),
            error: None,
            sequence: NEXT_SEQUENCE.fetch_add(1, Ordering::Relaxed),
            timestamp: Utc::now(),
            thread_id: get_thread_id(),
            thread_name: std::thread::current().name().map(String::from),
        }
    }

    pub fn with_params(mut self, params: &[&dyn Display]) -> Self {
        self.params = params
            .iter()
            .map(|p| Self::sanitize_message(&p.to_string()))
            .collect();
        self
    }

    pub fn with_error(mut self, error: &(dyn Error + 'static)) -> Self {
        self.error = util::error_chain(Some(error));
        self
    }

    /// The message with its parameters substituted.
    ///
    /// `{N}` refers to the N-th parameter, `{}` to the next one in order.
    /// Placeholders without a matching parameter are kept verbatim.
    pub fn formatted_message(&self) -> String {
        if self.params.is_empty() {
            return self.message.clone();
        }

        let mut out = String::with_capacity(self.message.len());
        let mut next = 0;
        let mut rest = self.message.as_str();

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];

            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                rest = "";
                break;
            };

            let inner = &after[..close];
            let index = if inner.is_empty() {
                next += 1;
                Some(next - 1)
            } else {
                inner.parse::<usize>().ok()
            };

            match index.and_then(|i| self.params.get(i)) {
                Some(param) => out.push_str(param),
                None => {
                    out.push('{');
                    out.push_str(inner);
                    out.push('}');
                }
            }
            rest = &after[close + 1..];
        }

        out.push_str(rest);
        out
    }
}
