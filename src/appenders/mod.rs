//! Appender implementations

pub mod console;
pub mod database;
pub mod file;

pub use console::ConsoleAppender;
pub use database::DatabaseAppender;
pub use file::FileAppender;

pub use crate::core::Appender;
