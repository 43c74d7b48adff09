//! File writer

use crate::core::{Level, LevelWriter, Result};
use parking_lot::Mutex;
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends lines to a file through a buffered writer.
///
/// Buffered lines reach the file on `flush` or when the writer is dropped.
pub struct FileWriter {
    path: PathBuf,
    writer: Mutex<BufWriter<File>>,
}

impl FileWriter {
    /// Open `path` for appending, creating it if needed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            writer: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl LevelWriter for FileWriter {
    fn write(&self, _level: Level, line: &[u8]) -> io::Result<usize> {
        self.writer.lock().write_all(line)?;
        Ok(line.len())
    }

    fn flush(&self) -> io::Result<()> {
        self.writer.lock().flush()
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.writer.get_mut().flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_appends_lines() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("app.log");

        {
            let writer = FileWriter::new(&path).unwrap();
            writer.write(Level::INFO, b"first\n").unwrap();
        }
        {
            let writer = FileWriter::new(&path).unwrap();
            writer.write(Level::WARN, b"second\n").unwrap();
            writer.flush().unwrap();
            assert_eq!(writer.path(), path.as_path());
        }

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "first\nsecond\n");
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = TempDir::new().unwrap();
        assert!(FileWriter::new(dir.path().join("missing").join("app.log")).is_err());
    }
}
