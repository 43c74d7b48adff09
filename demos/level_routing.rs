//! Level routing example
//!
//! Sends errors to their own file, warnings to stderr and everything else to
//! stdout, while the main log file receives every line.
//!
//! Run with: cargo run --example level_routing

use condensed_log::prelude::*;
use std::sync::Arc;

fn main() -> Result<()> {
    println!("=== condensed_log - Level Routing Example ===\n");

    let dir = std::env::temp_dir().join("condensed_log_demo");
    std::fs::create_dir_all(&dir)?;
    let errors = Arc::new(FileWriter::new(dir.join("errors.log"))?);

    let router = LevelRouter::new()
        .route(Level::ERROR, errors.clone())
        .route(Level::WARN, ConsoleWriter::new().with_stderr_level(Level::WARN))
        .fallback(AllLevelsWriter::new(std::io::stdout()));

    let handler = TextHandler::builder()
        .time_format(TimestampFormat::Rfc3339Millis)
        .level(Level::DEBUG)
        .level_output(router)
        .build()?;
    let logger = Logger::new(handler).with_group("routing");

    logger.debug("to stdout");
    logger.info("to stdout");
    logger.warn("to stderr");
    logger.error("to errors.log");
    logger.log(Level::ERROR.offset(4), "also to errors.log");
    logger.flush()?;

    println!("\nErrors were written to {}", errors.path().display());
    println!("Records written: {}", logger.handler().metrics().records_written());
    println!("\n=== Example completed successfully! ===");
    Ok(())
}
