//! File logging example
//!
//! Demonstrates the file appender driven by a TOML configuration file.
//!
//! Run with: cargo run --example file_logging

use job_logger::prelude::*;
use std::fs;

fn main() -> Result<()> {
    println!("=== Job Logger - File Logging Example ===\n");

    let dir = std::env::temp_dir().join("job_logger_demo");
    fs::create_dir_all(&dir)?;
    let config_path = dir.join("joblogger.toml");
    let log_path = dir.join("jobs.log");

    fs::write(
        &config_path,
        format!(
            "min.level = \"MESSAGE\"\n\
             \n\
             [handler.console]\n\
             enabled = false\n\
             \n\
             [handler.file]\n\
             enabled = true\n\
             append = false\n\
             destination = '{}'\n",
            log_path.display()
        ),
    )?;

    let factory = LoggerFactory::new(Config::resolve(&config_path));
    let logger = factory.get_logger("file-logging");
    println!("Appenders: {:?}", logger.appender_names());

    for step in 1..=5 {
        logger.message_with_params("Step {0} of {1} complete", &[&step, &5]);
    }
    logger.warning("Disk usage above 90%");
    logger.flush()?;

    println!("\nContents of {}:", log_path.display());
    print!("{}", fs::read_to_string(&log_path)?);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
