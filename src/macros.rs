//! Logging macros with deferred printf-style formatting.
//!
//! The format string uses printf verbs (`%s`, `%d`, `%.2f`, `%v`, ...) and is
//! only evaluated when the record's level is enabled. Each argument is converted
//! with [`FormatArg::from`](crate::FormatArg).
//!
//! # Examples
//!
//! ```
//! use condensed_log::prelude::*;
//! use condensed_log::info;
//!
//! let handler = TextHandler::builder()
//!     .level(Level::INFO)
//!     .output(std::io::sink())
//!     .build()
//!     .unwrap();
//! let logger = Logger::new(handler);
//!
//! // Basic logging
//! info!(logger, "Server started");
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port %d", port);
//!
//! let user = String::from("alice");
//! info!(logger, "User %s performed action: %q", &user, "login");
//! ```

/// Log a formatted message at an arbitrary level.
///
/// # Examples
///
/// ```
/// # use condensed_log::prelude::*;
/// # let logger = Logger::new(TextHandler::builder().output(std::io::sink()).build().unwrap());
/// use condensed_log::log;
/// log!(logger, Level::ERROR, "Simple message");
/// log!(logger, Level::WARN.offset(2), "Error code: %d", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:expr $(, $arg:expr)* $(,)?) => {
        $logger.logf($level, $fmt, &[$($crate::FormatArg::from($arg)),*])
    };
}

/// Log a trace-level message.
///
/// # Examples
///
/// ```
/// # use condensed_log::prelude::*;
/// # let logger = Logger::new(TextHandler::builder().output(std::io::sink()).build().unwrap());
/// # logger.set_level(Level::TRACE);
/// use condensed_log::trace;
/// trace!(logger, "Entering function: calculate()");
/// trace!(logger, "Variable value: %v", 42);
/// ```
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::TRACE, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use condensed_log::prelude::*;
/// # let logger = Logger::new(TextHandler::builder().output(std::io::sink()).build().unwrap());
/// use condensed_log::info;
/// info!(logger, "Application started");
/// info!(logger, "Processing %d items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use condensed_log::prelude::*;
/// # let logger = Logger::new(TextHandler::builder().output(std::io::sink()).build().unwrap());
/// use condensed_log::warn;
/// warn!(logger, "Low disk space");
/// warn!(logger, "Retry attempt %d of %d", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARN, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}

#[cfg(test)]
mod tests {
    use crate::writers::MemoryWriter;
    use crate::{Level, Logger, TextHandler};
    use std::sync::Arc;

    fn logger(sink: &Arc<MemoryWriter>) -> Logger {
        let handler = TextHandler::builder()
            .time_pattern("")
            .level(Level::TRACE)
            .level_output(sink.clone())
            .build()
            .unwrap();
        Logger::new(handler)
    }

    #[test]
    fn test_level_macros() {
        let sink = Arc::new(MemoryWriter::new());
        let logger = logger(&sink);

        trace!(logger, "t %d", 1);
        debug!(logger, "d %s", "x");
        info!(logger, "i");
        warn!(logger, "w %.1f", 0.5);
        error!(logger, "e %t", true,);

        assert_eq!(
            sink.lines(),
            vec!["trace t 1\n", "debug d x\n", "info  i\n", "warn  w 0.5\n", "error e true\n"]
        );
    }

    #[test]
    fn test_log_macro_custom_level() {
        let sink = Arc::new(MemoryWriter::new());
        let logger = logger(&sink);
        let name = String::from("disk");

        log!(logger, Level::INFO.offset(1), "%s at %d%%", &name, 93);
        assert_eq!(sink.contents(), "info+1 disk at 93%\n");
    }
}
