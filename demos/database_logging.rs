//! Database logging example
//!
//! Two loggers write to one SQLite table over a single shared connection.
//!
//! Run with: cargo run --example database_logging

use job_logger::prelude::*;

fn main() -> Result<()> {
    println!("=== Job Logger - Database Logging Example ===\n");

    let config = Config::defaults()
        .with(ConfigKey::ConsoleEnabled, "false")
        .with(ConfigKey::DbEnabled, "true")
        .with(ConfigKey::DbDriver, "sqlite")
        .with(ConfigKey::DbUrl, ":memory:")
        .with(ConfigKey::DbTable, "joblogger");

    let factory = LoggerFactory::new(config);
    let import = factory.get_logger("nightly-import");
    let export = factory.get_logger("nightly-export");

    import.message("Import started");
    export.warning_with_params("Export of {0} delayed", &[&"ledger"]);
    let cause = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
    import.error_with_source("Import failed", &cause);

    println!("Open connections: {}", factory.connections().open_count());

    let connection = factory
        .connections()
        .get_or_open(&factory.config().db_settings())?;
    let rows: Vec<(String, String, String, Option<String>)> = connection.with(|c| {
        let mut stmt = c.prepare(
            "SELECT level, logger, message, stackTrace FROM joblogger ORDER BY sequence",
        )?;
        let rows = stmt
            .query_map([], |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
    })?;

    for (level, logger, message, trace) in rows {
        println!(
            "{:7} {:15} {} {}",
            level,
            logger,
            message,
            trace.map(|t| format!("({})", t)).unwrap_or_default()
        );
    }

    factory.shutdown();
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
