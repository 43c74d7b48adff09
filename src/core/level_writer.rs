//! Level-aware output sinks

use super::log_level::Level;
use std::io;
use std::sync::Arc;

/// A sink that receives each rendered line together with its record's level.
///
/// Each call to `write` carries exactly one complete line, newline included.
/// Implementations are shared between threads and must serialize access to
/// any underlying stream themselves.
pub trait LevelWriter: Send + Sync {
    fn write(&self, level: Level, line: &[u8]) -> io::Result<usize>;

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

impl<T: LevelWriter + ?Sized> LevelWriter for Arc<T> {
    fn write(&self, level: Level, line: &[u8]) -> io::Result<usize> {
        (**self).write(level, line)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}

impl<T: LevelWriter + ?Sized> LevelWriter for Box<T> {
    fn write(&self, level: Level, line: &[u8]) -> io::Result<usize> {
        (**self).write(level, line)
    }

    fn flush(&self) -> io::Result<()> {
        (**self).flush()
    }
}
