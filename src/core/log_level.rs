//! Log level definitions
//!
//! Levels live on a signed integer scale rather than in a closed enum, so any
//! offset from a named level is a valid severity (`info+2`, `trace-1`). The
//! named levels are spaced four steps apart.

use super::buffer::Buffer;
use super::error::LoggerError;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Write as _};
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};

/// Width of a rendered level label, not counting the trailing separator.
const LABEL_WIDTH: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Level(i32);

impl Level {
    pub const TRACE: Level = Level(-8);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    #[must_use]
    pub const fn new(value: i32) -> Self {
        Level(value)
    }

    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Returns this level moved `delta` steps, saturating at the ends of the scale.
    #[must_use]
    pub const fn offset(self, delta: i32) -> Self {
        Level(self.0.saturating_add(delta))
    }

    /// The named level this level belongs to, with its lowercase name.
    ///
    /// Levels are partitioned into five bins by four thresholds spaced four apart;
    /// everything below `DEBUG` is a trace level.
    fn bin(self) -> (Level, &'static str) {
        match self {
            l if l < Level::DEBUG => (Level::TRACE, "trace"),
            l if l < Level::INFO => (Level::DEBUG, "debug"),
            l if l < Level::WARN => (Level::INFO, "info"),
            l if l < Level::ERROR => (Level::WARN, "warn"),
            _ => (Level::ERROR, "error"),
        }
    }

    /// Signed distance from the base of this level's bin.
    #[must_use]
    pub fn bin_offset(self) -> i32 {
        let (base, _) = self.bin();
        // Cannot overflow: a level is only compared against the base of its own bin.
        self.0 - base.0
    }

    /// Writes the fixed-width label used in rendered lines: `info  `, `warn+2 `.
    ///
    /// The label is padded to five columns and always followed by one space, so
    /// labels wider than five columns still stay separated from what follows.
    pub fn write_label(self, buf: &mut Buffer) {
        let (_, name) = self.bin();
        let start = buf.len();
        buf.push_str(name);
        let offset = self.bin_offset();
        if offset != 0 {
            let _ = write!(buf, "{:+}", offset);
        }
        for _ in (buf.len() - start)..LABEL_WIDTH {
            buf.push(' ');
        }
        buf.push(' ');
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (_, name) = self.bin();
        for c in name.chars() {
            f.write_char(c.to_ascii_uppercase())?;
        }
        match self.bin_offset() {
            0 => Ok(()),
            offset => write!(f, "{:+}", offset),
        }
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    /// Parses `trace`, `debug`, `info`, `warn` (or `warning`) and `error`, case-insensitive,
    /// optionally followed by a signed offset such as `+2` or `-1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, offset) = match s.find(['+', '-']) {
            Some(idx) => (&s[..idx], Some(&s[idx..])),
            None => (s, None),
        };
        let base = match name.to_ascii_lowercase().as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" | "warning" => Level::WARN,
            "error" => Level::ERROR,
            _ => return Err(LoggerError::invalid_level(s)),
        };
        match offset {
            None => Ok(base),
            Some(offset) => offset
                .parse::<i32>()
                .ok()
                .and_then(|delta| base.0.checked_add(delta))
                .map(Level)
                .ok_or_else(|| LoggerError::invalid_level(s)),
        }
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level(value)
    }
}

impl Serialize for Level {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct LevelVisitor;

        impl Visitor<'_> for LevelVisitor {
            type Value = Level;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a level name such as \"info+2\" or an integer level")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Level, E> {
                v.parse().map_err(E::custom)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Level, E> {
                i32::try_from(v).map(Level).map_err(E::custom)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Level, E> {
                i32::try_from(v).map(Level).map_err(E::custom)
            }
        }

        deserializer.deserialize_any(LevelVisitor)
    }
}

/// An atomically updatable level shared between a root handler and every handler
/// derived from it.
///
/// Readers never observe a torn value. A render that started before a change may
/// still use the previous level.
#[derive(Debug)]
pub struct LevelVar(AtomicI32);

impl LevelVar {
    pub const fn new(level: Level) -> Self {
        LevelVar(AtomicI32::new(level.0))
    }

    #[inline]
    pub fn get(&self) -> Level {
        Level(self.0.load(Ordering::Acquire))
    }

    /// Sets the level and reports whether the stored value changed.
    pub fn set(&self, level: Level) -> bool {
        self.0.swap(level.0, Ordering::AcqRel) != level.0
    }
}

impl Default for LevelVar {
    fn default() -> Self {
        LevelVar::new(Level::WARN)
    }
}
