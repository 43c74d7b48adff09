//! Timestamp rendering
//!
//! Record times are written with a strftime pattern (via chrono) or one of the
//! named presets below. Besides chrono's own fraction specifiers, patterns accept
//! `%.Nf` for any N from 1 to 9, e.g. `%H:%M:%S%.4f` renders `03:04:05.6789`.
//! The empty pattern means the time column is left out entirely.

use super::buffer::Buffer;
use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// How record times are rendered
///
/// # Examples
///
/// ```
/// use condensed_log::TimestampFormat;
///
/// let format = TimestampFormat::from_pattern("%H:%M:%S%.4f").unwrap();
/// assert!(!format.is_omitted());
/// assert!(TimestampFormat::from_pattern("").unwrap().is_omitted());
/// assert!(TimestampFormat::from_pattern("%Q").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// RFC 3339 with milliseconds and no zone: `2026-01-02T03:04:05.678`
    #[default]
    Rfc3339Millis,

    /// RFC 3339 with zone offset: `2026-01-02T03:04:05+00:00`
    Rfc3339,

    /// Date and time separated by a space: `2026-01-02 03:04:05`
    DateTime,

    /// Wall clock only: `03:04:05`
    TimeOnly,

    /// Syslog style with milliseconds: `Jan  2 03:04:05.678`
    StampMilli,

    /// Twelve hour clock: `3:04AM`
    Kitchen,

    /// Unix timestamp in seconds: `1767323045`
    Unix,

    /// Unix timestamp in milliseconds: `1767323045678`
    UnixMillis,

    /// Any strftime pattern, with `%.Nf` fractions allowed
    Custom(String),

    /// No time column
    Omit,
}

/// One piece of a custom pattern.
enum Segment<'a> {
    Strftime(&'a str),
    Fraction(u32),
}

/// Splits `pattern` around `%.Nf` specifiers, which chrono only supports for 3, 6 and 9.
fn segments(pattern: &str) -> Vec<Segment<'_>> {
    let bytes = pattern.as_bytes();
    let mut out = Vec::new();
    let mut start = 0;
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        match bytes.get(i + 1..i + 4) {
            Some([b'.', digit @ b'1'..=b'9', b'f']) => {
                if start < i {
                    out.push(Segment::Strftime(&pattern[start..i]));
                }
                out.push(Segment::Fraction(u32::from(digit - b'0')));
                i += 4;
                start = i;
            }
            // `%%` and any other two-byte specifier head are passed through whole.
            _ => i += 2,
        }
    }
    if start < pattern.len() {
        out.push(Segment::Strftime(&pattern[start..]));
    }
    out
}

impl TimestampFormat {
    /// Build a format from a strftime pattern. The empty pattern omits the time.
    ///
    /// # Errors
    ///
    /// Returns [`LoggerError::InvalidConfiguration`] when chrono cannot parse the pattern.
    pub fn from_pattern(pattern: &str) -> Result<Self> {
        if pattern.is_empty() {
            return Ok(TimestampFormat::Omit);
        }
        let format = TimestampFormat::Custom(pattern.to_string());
        format.validate()?;
        Ok(format)
    }

    /// Check that a custom pattern only uses specifiers chrono understands.
    pub fn validate(&self) -> Result<()> {
        let TimestampFormat::Custom(pattern) = self else {
            return Ok(());
        };
        for segment in segments(pattern) {
            if let Segment::Strftime(chunk) = segment {
                if StrftimeItems::new(chunk).any(|item| matches!(item, Item::Error)) {
                    return Err(LoggerError::config(
                        "time_format",
                        format!("unsupported strftime pattern '{}'", pattern),
                    ));
                }
            }
        }
        Ok(())
    }

    #[inline]
    pub fn is_omitted(&self) -> bool {
        matches!(self, TimestampFormat::Omit)
    }

    /// The strftime pattern behind this format, if it has one.
    pub fn pattern(&self) -> Option<&str> {
        match self {
            TimestampFormat::Rfc3339Millis => Some("%Y-%m-%dT%H:%M:%S%.3f"),
            TimestampFormat::Rfc3339 => Some("%Y-%m-%dT%H:%M:%S%:z"),
            TimestampFormat::DateTime => Some("%Y-%m-%d %H:%M:%S"),
            TimestampFormat::TimeOnly => Some("%H:%M:%S"),
            TimestampFormat::StampMilli => Some("%b %e %H:%M:%S%.3f"),
            TimestampFormat::Kitchen => Some("%-I:%M%p"),
            TimestampFormat::Custom(pattern) => Some(pattern),
            TimestampFormat::Unix | TimestampFormat::UnixMillis | TimestampFormat::Omit => None,
        }
    }

    /// Append the rendered time to `buf`. Writes nothing for [`TimestampFormat::Omit`].
    pub fn write_to(&self, datetime: &DateTime<Utc>, buf: &mut Buffer) {
        match self {
            TimestampFormat::Omit => {}
            TimestampFormat::Unix => {
                let _ = write!(buf, "{}", datetime.timestamp());
            }
            TimestampFormat::UnixMillis => {
                let _ = write!(buf, "{}", datetime.timestamp_millis());
            }
            TimestampFormat::Custom(pattern) => {
                for segment in segments(pattern) {
                    match segment {
                        Segment::Strftime(chunk) => {
                            let _ = write!(buf, "{}", datetime.format(chunk));
                        }
                        Segment::Fraction(digits) => {
                            // A leap second shows up as nanos >= 1e9
                            let nanos = datetime.nanosecond() % 1_000_000_000;
                            let value = nanos / 10u32.pow(9 - digits);
                            let _ = write!(buf, ".{:0width$}", value, width = digits as usize);
                        }
                    }
                }
            }
            preset => {
                if let Some(pattern) = preset.pattern() {
                    let _ = write!(buf, "{}", datetime.format(pattern));
                }
            }
        }
    }

    /// Format a `DateTime<Utc>` into a new string
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        let mut buf = Buffer::with_capacity(32);
        self.write_to(datetime, &mut buf);
        buf.into_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_datetime() -> DateTime<Utc> {
        // 2026-01-02 03:04:05.6789 UTC
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5)
            .single()
            .expect("valid datetime")
            + chrono::Duration::microseconds(678_900)
    }

    #[test]
    fn test_default_is_rfc3339_millis() {
        assert_eq!(TimestampFormat::default(), TimestampFormat::Rfc3339Millis);
        assert_eq!(
            TimestampFormat::default().format(&fixed_datetime()),
            "2026-01-02T03:04:05.678"
        );
    }

    #[test]
    fn test_presets() {
        let dt = fixed_datetime();
        assert_eq!(TimestampFormat::Rfc3339.format(&dt), "2026-01-02T03:04:05+00:00");
        assert_eq!(TimestampFormat::DateTime.format(&dt), "2026-01-02 03:04:05");
        assert_eq!(TimestampFormat::TimeOnly.format(&dt), "03:04:05");
        assert_eq!(TimestampFormat::StampMilli.format(&dt), "Jan  2 03:04:05.678");
        assert_eq!(TimestampFormat::Kitchen.format(&dt), "3:04AM");
        assert_eq!(TimestampFormat::Unix.format(&dt), "1767323045");
        assert_eq!(TimestampFormat::UnixMillis.format(&dt), "1767323045678");
    }

    #[test]
    fn test_arbitrary_fraction_digits() {
        let dt = fixed_datetime();
        let format = |p: &str| TimestampFormat::from_pattern(p).expect("valid pattern").format(&dt);
        assert_eq!(format("%H:%M:%S%.4f"), "03:04:05.6789");
        assert_eq!(format("%S%.1f"), "05.6");
        assert_eq!(format("%S%.3f"), "05.678");
        assert_eq!(format("%S%.9f"), "05.678900000");
        assert_eq!(format("%.2f|%.5f"), ".67|.67890");
    }

    #[test]
    fn test_escaped_percent_is_not_a_fraction() {
        let format = TimestampFormat::from_pattern("%%.4f %H").expect("valid pattern");
        assert_eq!(format.format(&fixed_datetime()), "%.4f 03");
    }

    #[test]
    fn test_empty_pattern_omits_time() {
        let format = TimestampFormat::from_pattern("").expect("empty is valid");
        assert!(format.is_omitted());
        assert_eq!(format.format(&fixed_datetime()), "");
        assert_eq!(format.pattern(), None);
    }

    #[test]
    fn test_invalid_pattern_rejected() {
        let err = TimestampFormat::from_pattern("%H:%Q").unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));
        assert!(TimestampFormat::from_pattern("%H %").is_err());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&TimestampFormat::TimeOnly).expect("serialize");
        assert_eq!(json, "\"TimeOnly\"");

        let format: TimestampFormat =
            serde_json::from_str(r#"{"Custom":"%H:%M"}"#).expect("deserialize Custom");
        assert_eq!(format, TimestampFormat::Custom("%H:%M".to_string()));
    }
}
