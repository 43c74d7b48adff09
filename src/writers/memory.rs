//! In-memory writer for tests and inspection

use crate::core::{Level, LevelWriter};
use parking_lot::Mutex;
use std::io;

/// Keeps every line it receives along with its level.
#[derive(Debug, Default)]
pub struct MemoryWriter {
    entries: Mutex<Vec<(Level, String)>>,
}

impl MemoryWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured `(level, line)` pairs in arrival order
    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().clone()
    }

    /// Captured lines without their levels
    pub fn lines(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// Everything captured, concatenated
    pub fn contents(&self) -> String {
        self.entries
            .lock()
            .iter()
            .map(|(_, line)| line.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl LevelWriter for MemoryWriter {
    fn write(&self, level: Level, line: &[u8]) -> io::Result<usize> {
        let text = String::from_utf8_lossy(line).into_owned();
        self.entries.lock().push((level, text));
        Ok(line.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_captures_level_and_line() {
        let writer = MemoryWriter::new();
        writer.write(Level::WARN, b"careful\n").unwrap();
        writer.write(Level::INFO, b"ok\n").unwrap();

        assert_eq!(writer.len(), 2);
        assert_eq!(writer.entries()[0], (Level::WARN, "careful\n".to_string()));
        assert_eq!(writer.contents(), "careful\nok\n");

        writer.clear();
        assert!(writer.is_empty());
    }
}
