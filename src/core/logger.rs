//! Logger handle
//!
//! A [`Logger`] is an explicit context object: pass it (or a derived copy) down
//! the call chain instead of looking one up from global state. Deriving a logger
//! with [`Logger::with`] or [`Logger::with_group`] is cheap and leaves the parent
//! untouched.

use super::attr::Attr;
use super::error::{LoggerError, Result};
use super::handler::TextHandler;
use super::log_level::Level;
use super::printf::FormatArg;
use super::record::{Record, Source};
use chrono::{DateTime, Utc};
use std::fmt;
use std::io;
use std::panic::Location;
use std::sync::Arc;

/// Time source for new records
pub type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Emits records through a shared [`TextHandler`].
///
/// Sink failures are not reported to the caller; they are counted in the
/// handler's metrics.
///
/// # Example
///
/// ```
/// use condensed_log::{Attr, Level, Logger, TextHandler};
///
/// let handler = TextHandler::builder()
///     .level(Level::INFO)
///     .output(std::io::sink())
///     .build()
///     .unwrap();
/// let logger = Logger::new(handler).with_group("http");
///
/// logger.info("server started");
/// logger.info_attrs("request", [Attr::new("path", "/index.html")]);
/// logger.warnf("slow response after %dms", &[1500.into()]);
/// assert_eq!(logger.handler().metrics().records_written(), 3);
/// ```
#[derive(Clone)]
pub struct Logger {
    handler: Arc<TextHandler>,
    clock: Clock,
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("handler", &self.handler)
            .finish_non_exhaustive()
    }
}

impl Logger {
    #[must_use]
    pub fn new(handler: TextHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            clock: Arc::new(Utc::now),
        }
    }

    /// Replace the time source, e.g. with a fixed instant in tests.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Utc> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    pub fn handler(&self) -> &TextHandler {
        &self.handler
    }

    /// A logger whose records carry `attrs` in addition to their own.
    #[must_use]
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.derive(self.handler.with_attrs(attrs))
    }

    /// A logger whose records render under the additional group `name`.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        if name.is_empty() {
            return self.clone();
        }
        self.derive(self.handler.with_group(name))
    }

    fn derive(&self, handler: TextHandler) -> Self {
        Self {
            handler: Arc::new(handler),
            clock: Arc::clone(&self.clock),
        }
    }

    #[inline]
    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Change the minimum level of every logger sharing this one's root.
    pub fn set_level(&self, level: Level) -> bool {
        self.handler.set_level(level)
    }

    /// An `io::Write` adapter that logs each write as one message at `level`.
    ///
    /// Records written through it report the place this method was called as
    /// their source.
    #[track_caller]
    #[must_use]
    pub fn writer(&self, level: Level) -> LogWriter {
        LogWriter {
            logger: self.clone(),
            level,
            caller: Location::caller(),
        }
    }

    fn emit(
        &self,
        caller: &Location<'_>,
        level: Level,
        message: String,
        attrs: Vec<Attr>,
        args: &[FormatArg<'_>],
    ) {
        let source = if self.handler.include_source() {
            Some(Source::from(caller))
        } else {
            None
        };
        let record = Record {
            time: (self.clock)(),
            level,
            message,
            attrs,
            source,
        };
        // Counted in the handler metrics; a failing sink must not log about itself.
        let _ = self.handler.handle_format(&record, args);
    }

    #[track_caller]
    pub fn log(&self, level: Level, message: impl Into<String>) {
        if self.enabled(level) {
            self.emit(Location::caller(), level, message.into(), Vec::new(), &[]);
        }
    }

    #[track_caller]
    pub fn log_attrs(
        &self,
        level: Level,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        if self.enabled(level) {
            self.emit(
                Location::caller(),
                level,
                message.into(),
                attrs.into_iter().collect(),
                &[],
            );
        }
    }

    /// Log `format` with printf-style `args`. Formatting happens only when the
    /// level is enabled, directly into the render buffer.
    #[track_caller]
    pub fn logf(&self, level: Level, format: &str, args: &[FormatArg<'_>]) {
        if self.enabled(level) {
            self.emit(Location::caller(), level, format.to_string(), Vec::new(), args);
        }
    }

    #[track_caller]
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::TRACE, message);
    }

    #[track_caller]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message);
    }

    #[track_caller]
    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message);
    }

    #[track_caller]
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARN, message);
    }

    #[track_caller]
    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message);
    }

    #[track_caller]
    pub fn trace_attrs(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log_attrs(Level::TRACE, message, attrs);
    }

    #[track_caller]
    pub fn debug_attrs(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log_attrs(Level::DEBUG, message, attrs);
    }

    #[track_caller]
    pub fn info_attrs(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log_attrs(Level::INFO, message, attrs);
    }

    #[track_caller]
    pub fn warn_attrs(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log_attrs(Level::WARN, message, attrs);
    }

    #[track_caller]
    pub fn error_attrs(&self, message: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) {
        self.log_attrs(Level::ERROR, message, attrs);
    }

    #[track_caller]
    pub fn tracef(&self, format: &str, args: &[FormatArg<'_>]) {
        self.logf(Level::TRACE, format, args);
    }

    #[track_caller]
    pub fn debugf(&self, format: &str, args: &[FormatArg<'_>]) {
        self.logf(Level::DEBUG, format, args);
    }

    #[track_caller]
    pub fn infof(&self, format: &str, args: &[FormatArg<'_>]) {
        self.logf(Level::INFO, format, args);
    }

    #[track_caller]
    pub fn warnf(&self, format: &str, args: &[FormatArg<'_>]) {
        self.logf(Level::WARN, format, args);
    }

    #[track_caller]
    pub fn errorf(&self, format: &str, args: &[FormatArg<'_>]) {
        self.logf(Level::ERROR, format, args);
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }
}

impl From<TextHandler> for Logger {
    fn from(handler: TextHandler) -> Self {
        Logger::new(handler)
    }
}

/// Logs everything written to it as messages at a fixed level.
///
/// Each `write` call becomes one record; a single trailing newline is dropped
/// since the handler adds its own.
#[derive(Debug, Clone)]
pub struct LogWriter {
    logger: Logger,
    level: Level,
    caller: &'static Location<'static>,
}

impl io::Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.logger.enabled(self.level) {
            let text = String::from_utf8_lossy(buf);
            let message = text.strip_suffix('\n').unwrap_or(&text);
            self.logger
                .emit(self.caller, self.level, message.to_string(), Vec::new(), &[]);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.logger.flush().map_err(|e| match e {
            LoggerError::IoError(e) => e,
            other => io::Error::new(io::ErrorKind::Other, other),
        })
    }
}

#[cfg(feature = "log-bridge")]
mod bridge {
    use super::*;

    impl From<log::Level> for Level {
        fn from(level: log::Level) -> Self {
            match level {
                log::Level::Error => Level::ERROR,
                log::Level::Warn => Level::WARN,
                log::Level::Info => Level::INFO,
                log::Level::Debug => Level::DEBUG,
                log::Level::Trace => Level::TRACE,
            }
        }
    }

    impl log::Log for Logger {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            Logger::enabled(self, metadata.level().into())
        }

        fn log(&self, record: &log::Record<'_>) {
            let level = Level::from(record.level());
            if !Logger::enabled(self, level) {
                return;
            }
            let source = if self.handler.include_source() {
                record.file().zip(record.line()).map(|(file, line)| Source::new(file, line))
            } else {
                None
            };
            let record = Record {
                time: (self.clock)(),
                level,
                message: record.args().to_string(),
                attrs: Vec::new(),
                source,
            };
            let _ = self.handler.handle(&record);
        }

        fn flush(&self) {
            let _ = self.handler.flush();
        }
    }

    impl Logger {
        /// Route records from the `log` macros through this logger.
        ///
        /// # Errors
        ///
        /// Fails if a global `log` logger is already installed.
        pub fn install(self, max_level: log::LevelFilter) -> Result<()> {
            log::set_boxed_logger(Box::new(self))
                .map_err(|e| LoggerError::other(format!("cannot install logger: {}", e)))?;
            log::set_max_level(max_level);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writers::MemoryWriter;
    use chrono::TimeZone;
    use std::io::Write as _;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(678_900)
    }

    fn logger(sink: &Arc<MemoryWriter>, level: Level) -> Logger {
        let handler = TextHandler::builder()
            .time_pattern("%H:%M:%S%.4f")
            .level(level)
            .level_output(sink.clone())
            .build()
            .expect("valid handler");
        Logger::new(handler).with_clock(fixed_time)
    }

    #[test]
    fn test_level_methods() {
        let sink = Arc::new(MemoryWriter::new());
        let logger = logger(&sink, Level::TRACE);
        logger.trace("t");
        logger.debug("d");
        logger.info("i");
        logger.warn("w");
        logger.error("e");

        let levels: Vec<Level> = sink.entries().into_iter().map(|(level, _)| level).collect();
        assert_eq!(
            levels,
            vec![Level::TRACE, Level::DEBUG, Level::INFO, Level::WARN, Level::ERROR]
        );
        assert_eq!(sink.lines()[2], "03:04:05.6789 info  i\n");
    }

    #[test]
    fn test_disabled_levels_write_nothing() {
        let sink = Arc::new(MemoryWriter::new());
        let logger = logger(&sink, Level::WARN);
        logger.info("hidden");
        logger.debugf("hidden %d", &[1.into()]);
        logger.info_attrs("hidden", [Attr::new("k", "v")]);
        assert!(sink.is_empty());

        logger.warn("shown");
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn test_derived_loggers() {
        let sink = Arc::new(MemoryWriter::new());
        let root = logger(&sink, Level::INFO);
        let child = root
            .with_group("first")
            .with_group("")
            .with([Attr::new("user", "alice")]);

        child.info_attrs("Hello", [Attr::new("n", 1)]);
        root.info("root");
        assert_eq!(
            sink.lines(),
            vec![
                "03:04:05.6789 info  first: Hello : user=alice n=1\n",
                "03:04:05.6789 info  root\n",
            ]
        );
    }

    #[test]
    fn test_tree_level() {
        let sink = Arc::new(MemoryWriter::new());
        let root = logger(&sink, Level::INFO);
        let child = root.with_group("child");

        assert!(child.set_level(Level::ERROR));
        assert!(!root.enabled(Level::WARN));
        root.warn("suppressed");
        assert!(sink.is_empty());
    }

    #[test]
    fn test_formatted_messages() {
        let sink = Arc::new(MemoryWriter::new());
        let logger = logger(&sink, Level::TRACE);
        logger.infof("Hello, %s!", &["world".into()]);
        logger.errorf("%d of %d failed", &[2.into()]);

        assert_eq!(
            sink.lines(),
            vec![
                "03:04:05.6789 info  Hello, world!\n",
                "03:04:05.6789 error 2 of %!d(MISSING) failed\n",
            ]
        );
    }

    #[test]
    fn test_source_is_call_site() {
        let sink = Arc::new(MemoryWriter::new());
        let handler = TextHandler::builder()
            .time_format(crate::core::TimestampFormat::Omit)
            .level(Level::INFO)
            .include_source(true)
            .level_output(sink.clone())
            .build()
            .unwrap();
        let logger = Logger::new(handler);

        let line = line!() + 1;
        logger.info("here");
        assert_eq!(
            sink.contents(),
            format!("info  here (from {}:{})\n", file!(), line)
        );
    }

    #[test]
    fn test_source_is_call_site_for_every_entry_point() {
        let sink = Arc::new(MemoryWriter::new());
        let handler = TextHandler::builder()
            .time_format(crate::core::TimestampFormat::Omit)
            .level(Level::INFO)
            .include_source(true)
            .level_output(sink.clone())
            .build()
            .unwrap();
        let logger = Logger::new(handler);

        let attrs_line = line!() + 1;
        logger.warn_attrs("a", [Attr::new("k", 1)]);
        let format_line = line!() + 1;
        logger.errorf("b %d", &[2.into()]);
        let writer_line = line!() + 1;
        let mut writer = logger.writer(Level::INFO);
        writeln!(writer, "c").unwrap();

        let file = file!();
        assert_eq!(
            sink.lines(),
            vec![
                format!("warn  a : k=1 (from {}:{})\n", file, attrs_line),
                format!("error b 2 (from {}:{})\n", file, format_line),
                format!("info  c (from {}:{})\n", file, writer_line),
            ]
        );
    }

    #[test]
    fn test_log_writer() {
        let sink = Arc::new(MemoryWriter::new());
        let logger = logger(&sink, Level::INFO);
        let mut writer = logger.with_group("stdlib").writer(Level::WARN);

        writeln!(writer, "legacy output").unwrap();
        writer.flush().unwrap();
        assert_eq!(
            sink.contents(),
            "03:04:05.6789 warn  stdlib: legacy output\n"
        );
    }

    #[test]
    fn test_sink_failures_are_counted() {
        struct Failing;
        impl crate::core::LevelWriter for Failing {
            fn write(&self, _level: Level, _line: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
        }

        let handler = TextHandler::builder()
            .level(Level::INFO)
            .level_output(Failing)
            .build()
            .unwrap();
        let logger = Logger::new(handler);
        logger.info("lost");
        logger.error("lost too");
        assert_eq!(logger.handler().metrics().write_failures(), 2);
    }

    #[cfg(feature = "log-bridge")]
    #[test]
    fn test_log_facade_records() {
        let sink = Arc::new(MemoryWriter::new());
        let logger = logger(&sink, Level::INFO);
        log::Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("from {}", "log"))
                .build(),
        );
        log::Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Debug)
                .args(format_args!("too verbose"))
                .build(),
        );

        assert!(log::Log::enabled(
            &logger,
            &log::Metadata::builder().level(log::Level::Error).build()
        ));
        assert_eq!(sink.contents(), "03:04:05.6789 warn  from log\n");
    }
}
