//! Structured attributes attached to log records
//!
//! An [`Attr`] pairs a key with a [`Value`]. A value is either a scalar with a
//! string representation or a group: an ordered list of child attributes. Keys
//! inside a group need not be unique and their order is preserved.

use super::buffer::Buffer;
use super::group;
use super::printf;
use std::fmt;

/// Value of an attribute
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Null,
    Group(Vec<Attr>),
}

impl Value {
    #[inline]
    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    /// Child attributes when this value is a group
    pub fn as_group(&self) -> Option<&[Attr]> {
        match self {
            Value::Group(attrs) => Some(attrs),
            _ => None,
        }
    }
}

/// Scalars print their plain string form. A group prints its children the way
/// they appear inside a `{...}` block.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Uint(u) => write!(f, "{}", u),
            Value::Float(fl) => {
                let mut s = String::with_capacity(24);
                printf::write_float_default(*fl, &mut s);
                f.write_str(&s)
            }
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => f.write_str("null"),
            Value::Group(attrs) => {
                let mut buf = Buffer::with_capacity(64);
                group::write_attrs(attrs, &mut buf);
                f.write_str(buf.as_str())
            }
        }
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<&String> for Value {
    fn from(s: &String) -> Self {
        Value::String(s.clone())
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i64::from(i))
    }
}

impl From<u64> for Value {
    fn from(u: u64) -> Self {
        Value::Uint(u)
    }
}

impl From<u32> for Value {
    fn from(u: u32) -> Self {
        Value::Uint(u64::from(u))
    }
}

impl From<usize> for Value {
    fn from(u: usize) -> Self {
        Value::Uint(u as u64)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<f32> for Value {
    fn from(f: f32) -> Self {
        Value::Float(f64::from(f))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

/// A key/value pair attached to a record or logger
///
/// # Example
///
/// ```
/// use condensed_log::Attr;
///
/// let attr = Attr::group("hello", [Attr::new("that", "thing"), Attr::new("is", "cool value")]);
/// assert_eq!(attr.to_string(), r#"hello={that=thing is="cool value"}"#);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self {
            key: key.into(),
            value: Value::Group(attrs.into_iter().collect()),
        }
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        self.value.is_group()
    }
}

/// Renders the attribute exactly as it appears in a log line.
impl fmt::Display for Attr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = Buffer::with_capacity(64);
        group::write_attr(self, &mut buf);
        f.write_str(buf.as_str())
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Attr::new(key, value)
    }
}
