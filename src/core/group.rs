//! Group flattening
//!
//! Attributes render as space separated `key=value` pairs. A group renders in
//! one of three ways:
//!
//! - no children: nothing at all, the name is dropped
//! - a single child that is itself a group: the names chain with `/`
//!   (`outer/inner={...}`) instead of nesting braces
//! - anything else: `name={child child ...}`
//!
//! At the record level a group that is the *only* remaining attribute is not
//! rendered inline at all. Its name joins the logger's group path, which is
//! written once before the message as `a/b/c: `.

use super::attr::{Attr, Value};
use super::buffer::Buffer;
use super::quote;
use std::fmt::Write as _;

/// Writes one attribute.
pub fn write_attr(attr: &Attr, buf: &mut Buffer) {
    match &attr.value {
        Value::Group(attrs) => write_group(&attr.key, attrs, buf),
        Value::String(s) => {
            buf.push_str(&attr.key);
            buf.push('=');
            quote::write_value(s, buf);
        }
        scalar => {
            // Numbers, booleans and null never contain characters that need quoting.
            buf.push_str(&attr.key);
            buf.push('=');
            let _ = write!(buf, "{}", scalar);
        }
    }
}

/// Writes attributes separated by single spaces. Attributes that render to
/// nothing (empty groups) leave no stray separator behind.
pub fn write_attrs(attrs: &[Attr], buf: &mut Buffer) {
    let mut first = true;
    for attr in attrs {
        let mark = buf.len();
        if !first {
            buf.push(' ');
        }
        let start = buf.len();
        write_attr(attr, buf);
        if buf.len() == start {
            buf.truncate(mark);
        } else {
            first = false;
        }
    }
}

/// Writes a named group.
pub fn write_group(name: &str, attrs: &[Attr], buf: &mut Buffer) {
    match attrs {
        [] => {}
        [only] if only.is_group() => {
            let mark = buf.len();
            buf.push_str(name);
            buf.push('/');
            let start = buf.len();
            if let Value::Group(children) = &only.value {
                write_group(&only.key, children, buf);
            }
            if buf.len() == start {
                buf.truncate(mark);
            }
        }
        _ => {
            buf.push_str(name);
            buf.push_str("={");
            write_attrs(attrs, buf);
            buf.push('}');
        }
    }
}

/// Attributes left over after group path promotion.
///
/// Ambient attributes from the logger come first, followed by the record's own,
/// without copying either list.
#[derive(Debug, Clone, Copy)]
pub struct Remaining<'a> {
    head: &'a [Attr],
    tail: &'a [Attr],
}

impl<'a> Remaining<'a> {
    pub fn new(head: &'a [Attr], tail: &'a [Attr]) -> Self {
        Self { head, tail }
    }

    pub fn len(&self) -> usize {
        self.head.len() + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.head.is_empty() && self.tail.is_empty()
    }

    /// The single remaining attribute, when there is exactly one.
    fn single(&self) -> Option<&'a Attr> {
        match (self.head, self.tail) {
            ([only], []) | ([], [only]) => Some(only),
            _ => None,
        }
    }

    /// Writes the remaining attributes separated by single spaces.
    pub fn write(&self, buf: &mut Buffer) {
        match (self.head.is_empty(), self.tail.is_empty()) {
            (_, true) => write_attrs(self.head, buf),
            (true, false) => write_attrs(self.tail, buf),
            (false, false) => {
                let mark = buf.len();
                write_attrs(self.head, buf);
                let sep = buf.len();
                if sep > mark {
                    buf.push(' ');
                }
                let start = buf.len();
                write_attrs(self.tail, buf);
                if buf.len() == start {
                    buf.truncate(sep);
                }
            }
        }
    }
}

/// Writes the group path prefix and returns the attributes still to be rendered.
///
/// The path starts with `groups` (the logger's ambient groups). Then, as long as
/// the remaining attributes are exactly one group, that group's name is appended
/// and its children become the remaining attributes. A non-empty path is written
/// as the names joined by `/` followed by `: `.
pub fn write_group_path<'a>(
    groups: &[String],
    attrs: Remaining<'a>,
    buf: &mut Buffer,
) -> Remaining<'a> {
    let mut wrote = false;
    let mut push_name = |name: &str, buf: &mut Buffer| {
        if wrote {
            buf.push('/');
        }
        buf.push_str(name);
        wrote = true;
    };

    for group in groups {
        push_name(group, buf);
    }

    let mut remaining = attrs;
    while let Some(attr) = remaining.single() {
        let Value::Group(children) = &attr.value else {
            break;
        };
        push_name(&attr.key, buf);
        remaining = Remaining::new(children, &[]);
    }

    if wrote {
        buf.push_str(": ");
    }
    remaining
}
