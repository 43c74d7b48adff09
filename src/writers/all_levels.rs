//! Single-sink writer

use crate::core::{Level, LevelWriter};
use parking_lot::Mutex;
use std::io::{self, Write};

/// Forwards every line to one `io::Write` sink, whatever its level.
///
/// The sink sits behind a mutex so lines from concurrent callers never interleave.
pub struct AllLevelsWriter<W> {
    inner: Mutex<W>,
}

impl<W: Write + Send> AllLevelsWriter<W> {
    pub fn new(inner: W) -> Self {
        Self {
            inner: Mutex::new(inner),
        }
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner()
    }
}

impl<W: Write + Send> LevelWriter for AllLevelsWriter<W> {
    fn write(&self, _level: Level, line: &[u8]) -> io::Result<usize> {
        self.inner.lock().write_all(line)?;
        Ok(line.len())
    }

    fn flush(&self) -> io::Result<()> {
        self.inner.lock().flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forwards_all_levels() {
        let writer = AllLevelsWriter::new(Vec::new());
        assert_eq!(writer.write(Level::TRACE, b"a\n").unwrap(), 2);
        assert_eq!(writer.write(Level::ERROR, b"b\n").unwrap(), 2);
        assert_eq!(writer.into_inner(), b"a\nb\n");
    }

    #[test]
    fn test_sink_error_propagates() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let writer = AllLevelsWriter::new(Broken);
        let err = writer.write(Level::INFO, b"x\n").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    }
}
