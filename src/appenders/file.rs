//! File appender implementation

use crate::core::{Appender, LogEntry, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    auto_flush: bool,
}

impl FileAppender {
    /// Open `path` for logging. With `append == false` an existing file is truncated.
    pub fn new(path: impl Into<PathBuf>, append: bool) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .append(append)
            .truncate(!append)
            .open(&path)
            .map_err(|e| {
                LoggerError::io_operation(
                    "opening log file",
                    format!("cannot open '{}'", path.display()),
                    e,
                )
            })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            auto_flush: true,
        })
    }

    /// Keep records buffered until `flush` instead of flushing after each one
    #[must_use]
    pub fn with_auto_flush(mut self, auto_flush: bool) -> Self {
        self.auto_flush = auto_flush;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Appender for FileAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::file_appender(self.path.display().to_string(), "appender is closed")
        })?;

        let mut output = format!(
            "[{}] [{:7}] [{}] {} - {}",
            entry.timestamp.format("%Y-%m-%dT%H:%M:%S%.3fZ"),
            entry.level.to_str(),
            entry.thread_name.as_deref().unwrap_or("-"),
            entry.logger,
            entry.formatted_message()
        );

        // Keep one record per line
        if let Some(ref error) = entry.error {
            output.push_str(" | caused by: ");
            output.push_str(&error.replace('\n', " <- "));
        }

        output.push('\n');

        writer.write_all(output.as_bytes())?;
        if self.auto_flush {
            writer.flush()?;
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
