//! # Condensed Log
//!
//! A structured log formatter that renders each record as one compact,
//! human-oriented line:
//!
//! ```text
//! 03:04:05.6789 info  http/request: served : path=/index.html status=200
//! ```
//!
//! ## Features
//!
//! - **Group Condensing**: Nested single-child groups collapse into an `a/b/c: ` prefix
//! - **Deferred Formatting**: printf-style messages are only formatted when enabled
//! - **Level Offsets**: Any integer severity renders, e.g. `warn+2`
//! - **Level Routing**: Send lines to different sinks by severity
//! - **Thread Safe**: Handlers share a lock-free buffer pool and an atomic level

pub mod core;
pub mod macros;
pub mod writers;

pub mod prelude {
    pub use crate::core::{
        Attr, FormatArg, HandlerBuilder, HandlerConfig, Level, LevelVar, LevelWriter, Logger,
        LoggerError, Record, Result, Source, TextHandler, TimestampFormat, Value,
    };
    pub use crate::writers::{AllLevelsWriter, ConsoleWriter, FileWriter, LevelRouter};
}

pub use crate::core::{
    Attr, BufferPool, FormatArg, HandlerBuilder, HandlerConfig, HandlerMetrics, Level, LevelVar,
    LevelWriter, LogWriter, Logger, LoggerError, PoolStats, Record, Result, Source, TextHandler,
    TimestampFormat, Value,
};
pub use crate::writers::{AllLevelsWriter, ConsoleWriter, FileWriter, LevelRouter, MemoryWriter};
