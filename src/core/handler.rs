//! Record rendering
//!
//! A [`TextHandler`] turns each record into one line of text:
//!
//! ```text
//! [time ][level ][group/path: ]message[ : key=value ...][ (from file:line)]\n
//! ```
//!
//! and hands the finished line to its [`LevelWriter`]. Handlers are immutable
//! snapshots. Adding ambient attributes or groups produces a new handler that
//! shares the sink, the buffer pool, the metrics and the level with its parent.

use super::attr::Attr;
use super::buffer::{Buffer, BufferPool};
use super::error::{LoggerError, Result};
use super::group::{self, Remaining};
use super::level_writer::LevelWriter;
use super::log_level::{Level, LevelVar};
use super::metrics::HandlerMetrics;
use super::printf::{self, FormatArg};
use super::record::Record;
use super::timestamp::TimestampFormat;
use crate::writers::AllLevelsWriter;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Write as _};
use std::io::{self, Write};
use std::sync::Arc;

/// Level enabled when none is configured
pub const DEFAULT_LEVEL: Level = Level::WARN;

#[derive(Clone)]
pub struct TextHandler {
    time_format: TimestampFormat,
    level: Arc<LevelVar>,
    hide_level: Option<Level>,
    include_source: bool,
    attrs: Arc<Vec<Attr>>,
    groups: Arc<Vec<String>>,
    out: Arc<dyn LevelWriter>,
    pool: Arc<BufferPool>,
    metrics: Arc<HandlerMetrics>,
}

impl fmt::Debug for TextHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextHandler")
            .field("time_format", &self.time_format)
            .field("level", &self.level.get())
            .field("hide_level", &self.hide_level)
            .field("include_source", &self.include_source)
            .field("attrs", &self.attrs)
            .field("groups", &self.groups)
            .finish_non_exhaustive()
    }
}

impl TextHandler {
    #[must_use]
    pub fn builder() -> HandlerBuilder {
        HandlerBuilder::new()
    }

    /// Whether records at `level` are rendered at all.
    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        level >= self.level.get()
    }

    /// Current minimum level, shared with every derived handler
    pub fn level(&self) -> Level {
        self.level.get()
    }

    /// Change the minimum level for this handler and all handlers sharing its
    /// level. Returns whether the level changed.
    pub fn set_level(&self, level: Level) -> bool {
        self.level.set(level)
    }

    /// Whether rendered lines carry the record's source location
    pub fn include_source(&self) -> bool {
        self.include_source
    }

    pub fn level_var(&self) -> &Arc<LevelVar> {
        &self.level
    }

    pub fn metrics(&self) -> &HandlerMetrics {
        &self.metrics
    }

    pub fn buffer_pool(&self) -> &Arc<BufferPool> {
        &self.pool
    }

    /// Ambient groups, outermost first
    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    /// A handler whose records also carry `attrs`, placed before each record's own.
    #[must_use]
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        let mut attrs = attrs.into_iter().peekable();
        if attrs.peek().is_none() {
            return self.clone();
        }
        let mut merged = Vec::with_capacity(self.attrs.len());
        merged.extend(self.attrs.iter().cloned());
        merged.extend(attrs);
        Self {
            attrs: Arc::new(merged),
            ..self.clone()
        }
    }

    /// A handler whose records are rendered under one more group. An empty
    /// name returns an unchanged handler.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }
        let mut groups = Vec::with_capacity(self.groups.len() + 1);
        groups.extend(self.groups.iter().cloned());
        groups.push(name);
        Self {
            groups: Arc::new(groups),
            ..self.clone()
        }
    }

    /// Render `record` and write it. The message is used verbatim.
    ///
    /// The caller decides whether the record is enabled; `handle` always writes.
    pub fn handle(&self, record: &Record) -> Result<()> {
        self.handle_format(record, &[])
    }

    /// Render `record`, substituting `args` into its message as a printf format.
    ///
    /// With no arguments the message is written verbatim, `%` signs included.
    /// A sink error is returned as [`LoggerError::IoError`]; the buffer goes back
    /// to the pool either way.
    pub fn handle_format(&self, record: &Record, args: &[FormatArg<'_>]) -> Result<()> {
        let mut buf = self.pool.acquire();
        self.write_record(record, args, &mut buf);
        let written = self.out.write(record.level, buf.as_bytes());
        drop(buf);

        match written {
            Ok(n) => {
                self.metrics.record_written(n);
                Ok(())
            }
            Err(e) => {
                self.metrics.record_failure();
                Err(LoggerError::IoError(e))
            }
        }
    }

    /// Render `record` into `buf` without writing it anywhere.
    pub fn write_record(&self, record: &Record, args: &[FormatArg<'_>], buf: &mut Buffer) {
        if !self.time_format.is_omitted() {
            self.time_format.write_to(&record.time, buf);
            buf.push(' ');
        }

        if self.hide_level.map_or(true, |hide| record.level < hide) {
            record.level.write_label(buf);
        }

        let remaining =
            group::write_group_path(&self.groups, Remaining::new(&self.attrs, &record.attrs), buf);

        if args.is_empty() {
            buf.push_str(&record.message);
        } else {
            printf::write_format(&record.message, args, buf);
        }

        if !remaining.is_empty() {
            let mark = buf.len();
            buf.push_str(" : ");
            let start = buf.len();
            remaining.write(buf);
            // Nothing but empty groups left
            if buf.len() == start {
                buf.truncate(mark);
            }
        }

        if self.include_source {
            if let Some(source) = &record.source {
                let _ = write!(buf, " (from {}:{})", source.file, source.line);
            }
        }

        buf.push('\n');
    }

    /// Render `record` into a new string.
    #[must_use]
    pub fn format(&self, record: &Record, args: &[FormatArg<'_>]) -> String {
        let mut buf = self.pool.acquire();
        self.write_record(record, args, &mut buf);
        buf.as_str().to_string()
    }

    pub fn flush(&self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

/// Serializable handler settings
///
/// # Example
///
/// ```
/// use condensed_log::{HandlerConfig, Level};
///
/// let config = HandlerConfig::from_json(r#"{"time_format": "", "level": "info+2"}"#).unwrap();
/// assert_eq!(config.level, Level::INFO.offset(2));
/// assert!(!config.include_source);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// strftime pattern; empty leaves the time out
    pub time_format: String,
    pub level: Level,
    /// Records at or above this level are written without a level label
    pub hide_level: Option<Level>,
    pub include_source: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            time_format: "%Y-%m-%dT%H:%M:%S%.3f".to_string(),
            level: DEFAULT_LEVEL,
            hide_level: None,
            include_source: false,
        }
    }
}

impl HandlerConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Builder for [`TextHandler`]
///
/// # Example
///
/// ```
/// use condensed_log::{Level, TextHandler};
///
/// let handler = TextHandler::builder()
///     .time_pattern("%H:%M:%S%.4f")
///     .level(Level::DEBUG)
///     .hide_level(Level::ERROR)
///     .output(std::io::sink())
///     .build()
///     .unwrap();
/// assert!(handler.enabled(Level::INFO));
/// ```
pub struct HandlerBuilder {
    time_format: TimestampFormat,
    time_pattern: Option<String>,
    level: Option<Level>,
    level_var: Option<Arc<LevelVar>>,
    hide_level: Option<Level>,
    include_source: bool,
    attrs: Vec<Attr>,
    groups: Vec<String>,
    out: Option<Arc<dyn LevelWriter>>,
    pool: Option<Arc<BufferPool>>,
    metrics: Option<Arc<HandlerMetrics>>,
}

impl HandlerBuilder {
    pub fn new() -> Self {
        Self {
            time_format: TimestampFormat::default(),
            time_pattern: None,
            level: None,
            level_var: None,
            hide_level: None,
            include_source: false,
            attrs: Vec::new(),
            groups: Vec::new(),
            out: None,
            pool: None,
            metrics: None,
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self.time_pattern = None;
        self
    }

    /// Set the time format from a strftime pattern, checked by `build`.
    /// The empty pattern leaves the time out.
    #[must_use = "builder methods return a new value"]
    pub fn time_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.time_pattern = Some(pattern.into());
        self
    }

    /// Minimum enabled level (inclusive). Defaults to `WARN`.
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Share a level with other handlers. The shared value is left as it is:
    /// `level` (and the level of a [`HandlerConfig`]) is ignored when one is given.
    #[must_use = "builder methods return a new value"]
    pub fn level_var(mut self, level: Arc<LevelVar>) -> Self {
        self.level_var = Some(level);
        self
    }

    /// Leave the level label out for records at or above `level`.
    #[must_use = "builder methods return a new value"]
    pub fn hide_level(mut self, level: Level) -> Self {
        self.hide_level = Some(level);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn include_source(mut self, include: bool) -> Self {
        self.include_source = include;
        self
    }

    /// Write every line to `sink`, regardless of level.
    #[must_use = "builder methods return a new value"]
    pub fn output<W: Write + Send + 'static>(mut self, sink: W) -> Self {
        self.out = Some(Arc::new(AllLevelsWriter::new(sink)));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn level_output<L: LevelWriter + 'static>(mut self, sink: L) -> Self {
        self.out = Some(Arc::new(sink));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn group(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        if !name.is_empty() {
            self.groups.push(name);
        }
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn groups<S: Into<String>>(self, names: impl IntoIterator<Item = S>) -> Self {
        names.into_iter().fold(self, |builder, name| builder.group(name))
    }

    #[must_use = "builder methods return a new value"]
    pub fn buffer_pool(mut self, pool: Arc<BufferPool>) -> Self {
        self.pool = Some(pool);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn metrics(mut self, metrics: Arc<HandlerMetrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Apply serialized settings
    #[must_use = "builder methods return a new value"]
    pub fn config(mut self, config: HandlerConfig) -> Self {
        self.time_pattern = Some(config.time_format);
        self.level = Some(config.level);
        self.hide_level = config.hide_level;
        self.include_source = config.include_source;
        self
    }

    /// Build the handler
    ///
    /// # Errors
    ///
    /// Fails with [`LoggerError::InvalidConfiguration`] when the time pattern is not
    /// a valid strftime pattern.
    pub fn build(self) -> Result<TextHandler> {
        let time_format = match self.time_pattern {
            Some(pattern) => TimestampFormat::from_pattern(&pattern)?,
            None => {
                self.time_format.validate()?;
                self.time_format
            }
        };

        let level = match self.level_var {
            Some(shared) => shared,
            None => Arc::new(LevelVar::new(self.level.unwrap_or(DEFAULT_LEVEL))),
        };

        Ok(TextHandler {
            time_format,
            level,
            hide_level: self.hide_level,
            include_source: self.include_source,
            attrs: Arc::new(self.attrs),
            groups: Arc::new(self.groups),
            out: self
                .out
                .unwrap_or_else(|| Arc::new(AllLevelsWriter::new(io::stdout())) as Arc<dyn LevelWriter>),
            pool: self.pool.unwrap_or_default(),
            metrics: self.metrics.unwrap_or_default(),
        })
    }
}

impl Default for HandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
