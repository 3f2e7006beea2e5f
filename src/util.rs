//! String and error helpers shared by the appenders and the configuration layer

use std::error::Error;
use std::fmt::Write;

/// True when the value is absent, empty, or whitespace only
pub fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.trim().is_empty())
}

pub fn is_not_blank(value: Option<&str>) -> bool {
    !is_blank(value)
}

/// Truncate a string to at most `length` characters.
///
/// Counts characters, not bytes, so the cut never splits a code point.
/// `None` stays `None`.
pub fn truncate(value: Option<&str>, length: usize) -> Option<&str> {
    let s = value?;
    match s.char_indices().nth(length) {
        Some((byte_idx, _)) => Some(&s[..byte_idx]),
        None => Some(s),
    }
}

/// Render an error and its `source()` chain, one cause per line.
///
/// This is what the database sink stores in its stack trace column.
pub fn error_chain(error: Option<&(dyn Error + 'static)>) -> Option<String> {
    let error = error?;
    let mut rendered = error.to_string();

    let mut source = error.source();
    while let Some(cause) = source {
        let _ = write!(rendered, "\nCaused by: {}", cause);
        source = cause.source();
    }

    Some(rendered)
}
