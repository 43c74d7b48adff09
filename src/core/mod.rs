//! Core record model, rendering and handler types

pub mod attr;
pub mod buffer;
pub mod error;
pub mod group;
pub mod handler;
pub mod level_writer;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod printf;
pub mod quote;
pub mod record;
pub mod timestamp;

pub use attr::{Attr, Value};
pub use buffer::{Buffer, BufferPool, PoolStats, PooledBuffer};
pub use error::{LoggerError, Result};
pub use handler::{HandlerBuilder, HandlerConfig, TextHandler, DEFAULT_LEVEL};
pub use level_writer::LevelWriter;
pub use log_level::{Level, LevelVar};
pub use logger::{Clock, LogWriter, Logger};
pub use metrics::HandlerMetrics;
pub use printf::{sprintf, FormatArg};
pub use quote::{quote, quote_if_needed, unquote};
pub use record::{Record, Source};
pub use timestamp::TimestampFormat;
