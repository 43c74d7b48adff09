//! Standard stream writer

use crate::core::{Level, LevelWriter};
use std::io::{self, Write};

/// Writes error-and-above lines to stderr and everything else to stdout.
#[derive(Debug, Clone)]
pub struct ConsoleWriter {
    stderr_level: Level,
}

impl ConsoleWriter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            stderr_level: Level::ERROR,
        }
    }

    /// Move the stderr threshold, e.g. to `Level::WARN`
    #[must_use]
    pub fn with_stderr_level(mut self, level: Level) -> Self {
        self.stderr_level = level;
        self
    }

    pub fn stderr_level(&self) -> Level {
        self.stderr_level
    }
}

impl Default for ConsoleWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LevelWriter for ConsoleWriter {
    fn write(&self, level: Level, line: &[u8]) -> io::Result<usize> {
        // Route the most severe lines to stderr, others to stdout
        if level >= self.stderr_level {
            io::stderr().lock().write_all(line)?;
        } else {
            io::stdout().lock().write_all(line)?;
        }
        Ok(line.len())
    }

    fn flush(&self) -> io::Result<()> {
        // Flush both since we write to both
        io::stdout().flush()?;
        io::stderr().flush()
    }
}
