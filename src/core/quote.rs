//! Quoting of attribute values
//!
//! A value is written bare unless it contains a control character, `=`, `"`,
//! any Unicode whitespace, or a non-printable character. Such values are written
//! as a double-quoted string literal with `"`, backslash and non-printable
//! characters escaped (`\n`, `\x1b`, `\u00a0`, ...).

use super::buffer::Buffer;
use std::borrow::Cow;
use std::fmt::Write as _;
use unicode_general_category::{get_general_category, GeneralCategory};

/// Letters, marks, numbers, punctuation, symbols and the ASCII space.
///
/// Combining marks and variation selectors count as printable on their own,
/// so composed text stays readable.
fn is_printable(c: char) -> bool {
    c == ' '
        || !matches!(
            get_general_category(c),
            GeneralCategory::Control
                | GeneralCategory::Format
                | GeneralCategory::Surrogate
                | GeneralCategory::PrivateUse
                | GeneralCategory::Unassigned
                | GeneralCategory::SpaceSeparator
                | GeneralCategory::LineSeparator
                | GeneralCategory::ParagraphSeparator
        )
}

/// Scans left to right and stops at the first character that forces quoting.
pub fn needs_quoting(s: &str) -> bool {
    s.chars()
        .any(|c| c < ' ' || c == '=' || c == '"' || c.is_whitespace() || !is_printable(c))
}

/// Returns `s` unchanged when it can be written bare, or its quoted form.
pub fn quote_if_needed(s: &str) -> Cow<'_, str> {
    if needs_quoting(s) {
        Cow::Owned(quote(s))
    } else {
        Cow::Borrowed(s)
    }
}

/// Writes `s` into `buf`, quoting it only when needed.
pub fn write_value(s: &str, buf: &mut Buffer) {
    if needs_quoting(s) {
        write_quoted(s, buf);
    } else {
        buf.push_str(s);
    }
}

#[must_use]
pub fn quote(s: &str) -> String {
    let mut buf = Buffer::with_capacity(s.len() + 2);
    write_quoted(s, &mut buf);
    buf.into_string()
}

/// Writes `s` as a double-quoted literal.
pub fn write_quoted(s: &str, buf: &mut Buffer) {
    buf.push('"');
    for c in s.chars() {
        match c {
            '"' => buf.push_str("\\\""),
            '\\' => buf.push_str("\\\\"),
            '\x07' => buf.push_str("\\a"),
            '\x08' => buf.push_str("\\b"),
            '\x0c' => buf.push_str("\\f"),
            '\n' => buf.push_str("\\n"),
            '\r' => buf.push_str("\\r"),
            '\t' => buf.push_str("\\t"),
            '\x0b' => buf.push_str("\\v"),
            c if is_printable(c) => buf.push(c),
            c if (c as u32) < 0x80 => {
                let _ = write!(buf, "\\x{:02x}", c as u32);
            }
            c if (c as u32) <= 0xffff => {
                let _ = write!(buf, "\\u{:04x}", c as u32);
            }
            c => {
                let _ = write!(buf, "\\U{:08x}", c as u32);
            }
        }
    }
    buf.push('"');
}

/// Reverses [`quote`]. Returns `None` when `s` is not a well-formed quoted literal.
#[must_use]
pub fn unquote(s: &str) -> Option<String> {
    let inner = s.strip_prefix('"')?.strip_suffix('"')?;
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => return None,
            '\\' => {
                let decoded = match chars.next()? {
                    'a' => '\x07',
                    'b' => '\x08',
                    'f' => '\x0c',
                    'n' => '\n',
                    'r' => '\r',
                    't' => '\t',
                    'v' => '\x0b',
                    '\\' => '\\',
                    '"' => '"',
                    '\'' => '\'',
                    'x' => hex_escape(&mut chars, 2).filter(|c| c.is_ascii())?,
                    'u' => hex_escape(&mut chars, 4)?,
                    'U' => hex_escape(&mut chars, 8)?,
                    _ => return None,
                };
                out.push(decoded);
            }
            c => out.push(c),
        }
    }
    Some(out)
}

fn hex_escape(chars: &mut std::str::Chars<'_>, digits: usize) -> Option<char> {
    let mut value = 0u32;
    for _ in 0..digits {
        value = value * 16 + chars.next()?.to_digit(16)?;
    }
    char::from_u32(value)
}
