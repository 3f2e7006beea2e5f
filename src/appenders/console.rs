//! Console appender implementation

use crate::core::{Appender, LogEntry, LogLevel, Result};
#[cfg(feature = "console")]
use colored::Colorize;

pub struct ConsoleAppender {
    use_colors: bool,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            use_colors: cfg!(feature = "console"),
        }
    }

    /// Colors only take effect when the `console` feature is enabled
    pub fn with_colors(use_colors: bool) -> Self {
        Self { use_colors }
    }

    fn format_level(&self, level: LogLevel) -> String {
        let padded = format!("{:7}", level.to_str());

        #[cfg(feature = "console")]
        if self.use_colors {
            return padded.color(level.color_code()).to_string();
        }

        padded
    }

    fn format_text(&self, entry: &LogEntry) -> String {
        let thread = entry
            .thread_name
            .clone()
            .unwrap_or_else(|| format!("thread-{}", entry.thread_id));

        let mut line = format!(
            "[{}] [{}] {} {} - {}",
            entry.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            self.format_level(entry.level),
            thread,
            entry.logger,
            entry.formatted_message()
        );

        if let Some(ref error) = entry.error {
            line.push_str(" | caused by: ");
            line.push_str(&error.replace('\n', " <- "));
        }

        line
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format_text(entry);

        // Route errors to stderr, everything else to stdout
        match entry.level {
            LogLevel::Error => eprintln!("{}", output),
            _ => println!("{}", output),
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        use std::io::Write;
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_format() {
        let appender = ConsoleAppender::with_colors(false);
        let entry = LogEntry::new(LogLevel::Warning, "jobs.import", "row {0} skipped")
            .with_params(&[&17]);

        let line = appender.format_text(&entry);
        assert!(line.contains("[WARNING]"));
        assert!(line.contains("jobs.import - row 17 skipped"));
        assert!(!line.contains("caused by"));
    }

    #[test]
    fn test_error_chain_stays_on_one_line() {
        let appender = ConsoleAppender::with_colors(false);
        let io = std::io::Error::new(std::io::ErrorKind::Other, "refused");
        let entry = LogEntry::new(LogLevel::Error, "jobs", "connect failed").with_error(&io);

        let line = appender.format_text(&entry);
        assert!(line.ends_with("| caused by: refused"));
        assert_eq!(line.lines().count(), 1);
    }
}
