//! Basic logger usage example
//!
//! Demonstrates the factory, the three severities and the level threshold.
//!
//! Run with: cargo run --example basic_usage

use job_logger::prelude::*;
use job_logger::{error, message, warning};

fn main() {
    println!("=== Job Logger - Basic Usage Example ===\n");

    // Console output with every level enabled
    let factory = LoggerFactory::new(Config::defaults());
    let logger = factory.get_logger("basic-usage");

    println!("1. Logging at different levels:");
    logger.message("This is a message");
    logger.warning("This is a warning");
    logger.error("This is an error");

    println!("\n2. Positional parameters and attached errors:");
    logger.message_with_params("Processed {0} rows from {1}", &[&1200, &"accounts.csv"]);
    let cause = std::io::Error::new(std::io::ErrorKind::NotFound, "accounts.csv missing");
    logger.error_with_source("Import aborted", &cause);

    println!("\n3. Formatting macros:");
    message!(logger, "Batch {} of {}", 3, 10);
    warning!(logger, "Retrying in {}s", 5);
    error!(logger, "Giving up after {} attempts", 3);

    println!("\n4. Minimum level set to WARNING - messages won't show:");
    let strict = factory.get_logger_with(
        "basic-usage",
        &Config::defaults().with(ConfigKey::MinLevel, "WARNING"),
    );
    strict.message("Message (hidden)");
    strict.warning("Warning (visible)");

    println!("\n5. Unknown implementation falls back to a silent logger:");
    let silent = factory.get_logger_with(
        "basic-usage",
        &Config::defaults().with(ConfigKey::Implementation, "does-not-exist"),
    );
    silent.error("Nobody will see this");
    println!("   fallback is no-op: {}", silent.is_noop());

    println!("\n=== Example completed successfully! ===");
}
