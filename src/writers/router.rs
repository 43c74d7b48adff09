//! Severity-based routing across several sinks

use crate::core::{Level, LevelWriter};
use std::io;

/// Sends each line to the sink registered for the most severe threshold the
/// line's level reaches, or to the fallback when it reaches none.
///
/// # Example
///
/// ```
/// use condensed_log::writers::{LevelRouter, MemoryWriter};
/// use condensed_log::{Level, LevelWriter};
/// use std::sync::Arc;
///
/// let errors = Arc::new(MemoryWriter::new());
/// let rest = Arc::new(MemoryWriter::new());
/// let router = LevelRouter::new()
///     .route(Level::ERROR, errors.clone())
///     .fallback(rest.clone());
///
/// router.write(Level::ERROR.offset(1), b"boom\n").unwrap();
/// router.write(Level::INFO, b"fine\n").unwrap();
/// assert_eq!(errors.lines(), vec!["boom\n"]);
/// assert_eq!(rest.lines(), vec!["fine\n"]);
/// ```
#[derive(Default)]
pub struct LevelRouter {
    /// Sorted by threshold, most severe first
    routes: Vec<(Level, Box<dyn LevelWriter>)>,
    fallback: Option<Box<dyn LevelWriter>>,
}

impl LevelRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Send lines at `min_level` or above to `sink`, unless a more severe route matches.
    #[must_use]
    pub fn route(mut self, min_level: Level, sink: impl LevelWriter + 'static) -> Self {
        let pos = self
            .routes
            .iter()
            .position(|(threshold, _)| *threshold < min_level)
            .unwrap_or(self.routes.len());
        self.routes.insert(pos, (min_level, Box::new(sink)));
        self
    }

    /// Sink for lines below every route. Without one such lines are discarded.
    #[must_use]
    pub fn fallback(mut self, sink: impl LevelWriter + 'static) -> Self {
        self.fallback = Some(Box::new(sink));
        self
    }

    fn sink_for(&self, level: Level) -> Option<&dyn LevelWriter> {
        self.routes
            .iter()
            .find(|(threshold, _)| level >= *threshold)
            .map(|(_, sink)| sink.as_ref())
            .or(self.fallback.as_deref())
    }
}

impl LevelWriter for LevelRouter {
    fn write(&self, level: Level, line: &[u8]) -> io::Result<usize> {
        match self.sink_for(level) {
            Some(sink) => sink.write(level, line),
            None => Ok(line.len()),
        }
    }

    fn flush(&self) -> io::Result<()> {
        for (_, sink) in &self.routes {
            sink.flush()?;
        }
        if let Some(fallback) = &self.fallback {
            fallback.flush()?;
        }
        Ok(())
    }
}
