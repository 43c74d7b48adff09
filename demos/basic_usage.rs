//! Basic logger usage example
//!
//! Demonstrates building a text handler, logging at different levels and
//! changing the minimum level at runtime.
//!
//! Run with: cargo run --example basic_usage

use condensed_log::prelude::*;
use condensed_log::{info, warn};

fn main() -> Result<()> {
    println!("=== condensed_log - Basic Usage Example ===\n");

    let handler = TextHandler::builder()
        .time_format(TimestampFormat::TimeOnly)
        .level(Level::TRACE)
        .level_output(ConsoleWriter::new())
        .build()?;
    let logger = Logger::new(handler);

    println!("1. Logging at different levels:");
    logger.trace("This is a trace message");
    logger.debug("This is a debug message");
    logger.info("This is an info message");
    logger.warn("This is a warning message");
    logger.error("This is an error message");
    logger.log(Level::WARN.offset(2), "Between warning and error");

    println!("\n2. Changing the minimum level:");
    logger.set_level(Level::INFO);
    println!("   Minimum level set to INFO - trace and debug won't show:");
    logger.trace("Trace message (hidden)");
    logger.debug("Debug message (hidden)");
    logger.info("Info message (visible)");

    println!("\n3. Deferred formatting:");
    let items = 42;
    info!(logger, "Processed %d items in %.2fs", items, 1.5);
    warn!(logger, "Disk %s at %d%%", "/var", 93);
    logger.debug_attrs("never formatted", [Attr::new("expensive", "value")]);

    logger.flush()?;
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
