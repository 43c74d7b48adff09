//! Deferred printf-style message formatting
//!
//! A record logged with format arguments keeps its message as a format string;
//! the arguments are substituted only when the record is rendered, directly into
//! the render buffer. Format strings follow C printf conventions:
//!
//! ```text
//! %[flags][width][.precision]verb     flags: + - # space 0
//! ```
//!
//! | verb              | arguments                                      |
//! |-------------------|------------------------------------------------|
//! | `%v`              | any, default form                              |
//! | `%s` `%q`         | strings, attributes, `Display` values, chars   |
//! | `%d` `%x` `%X` `%o` `%b` `%c` `%U` | integers (and chars)          |
//! | `%f` `%F` `%e` `%E` `%g` `%G` | floats                             |
//! | `%t`              | booleans                                       |
//! | `%T`              | any, prints the argument's type                |
//! | `%%`              | a literal percent sign, consumes nothing       |
//!
//! Mistakes never abort rendering. They are marked inline instead:
//! `%!d(MISSING)` when arguments run out, `%!d(string=hi)` for a verb that does
//! not fit its argument, `%!(NOVERB)` for a trailing `%` and
//! `%!(EXTRA int=1, string=x)` for unused arguments.

use super::attr::Attr;
use super::buffer::Buffer;
use super::quote;
use std::fmt::{self, Write as _};

/// Widths and precisions above this are reported as bad instead of honored.
const MAX_WIDTH: usize = 1_000_000;

/// An argument for deferred formatting.
#[derive(Clone, Copy)]
pub enum FormatArg<'a> {
    Str(&'a str),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
    Char(char),
    /// Rendered the same way the attribute appears in a log line, e.g. `value=2.24`.
    Attr(&'a Attr),
    Display(&'a dyn fmt::Display),
}

impl<'a> FormatArg<'a> {
    /// Wrap any `Display` value.
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        FormatArg::Display(value)
    }

    fn type_name(&self) -> &'static str {
        match self {
            FormatArg::Str(_) => "string",
            FormatArg::Int(_) => "int",
            FormatArg::Uint(_) => "uint",
            FormatArg::Float(_) => "float64",
            FormatArg::Bool(_) => "bool",
            FormatArg::Char(_) => "char",
            FormatArg::Attr(_) => "Attr",
            FormatArg::Display(_) => "Display",
        }
    }
}

impl fmt::Debug for FormatArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut value = String::new();
        write_default(self, &Spec::default(), &mut value);
        write!(f, "{}({})", self.type_name(), value)
    }
}

impl<'a> From<&'a str> for FormatArg<'a> {
    fn from(s: &'a str) -> Self {
        FormatArg::Str(s)
    }
}

impl<'a> From<&'a String> for FormatArg<'a> {
    fn from(s: &'a String) -> Self {
        FormatArg::Str(s)
    }
}

impl<'a> From<&'a Attr> for FormatArg<'a> {
    fn from(attr: &'a Attr) -> Self {
        FormatArg::Attr(attr)
    }
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            fn from(v: $t) -> Self {
                FormatArg::Int(v as i64)
            }
        }
    )*};
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {$(
        impl From<$t> for FormatArg<'_> {
            fn from(v: $t) -> Self {
                FormatArg::Uint(v as u64)
            }
        }
    )*};
}

impl_from_signed!(i8, i16, i32, i64, isize);
impl_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f64> for FormatArg<'_> {
    fn from(v: f64) -> Self {
        FormatArg::Float(v)
    }
}

impl From<bool> for FormatArg<'_> {
    fn from(v: bool) -> Self {
        FormatArg::Bool(v)
    }
}

impl From<char> for FormatArg<'_> {
    fn from(v: char) -> Self {
        FormatArg::Char(v)
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Spec {
    plus: bool,
    minus: bool,
    sharp: bool,
    space: bool,
    zero: bool,
    width: Option<usize>,
    precision: Option<usize>,
}

/// Format `format` with `args` into a new string.
#[must_use]
pub fn sprintf(format: &str, args: &[FormatArg<'_>]) -> String {
    let mut buf = Buffer::with_capacity(format.len() + 16 * args.len());
    write_format(format, args, &mut buf);
    buf.into_string()
}

/// Substitutes `args` into `format`, writing the result into `buf`.
pub fn write_format(format: &str, args: &[FormatArg<'_>], buf: &mut Buffer) {
    let mut next_arg = 0;
    let mut rest = format;
    let mut body = String::new();

    while let Some(pos) = rest.find('%') {
        buf.push_str(&rest[..pos]);
        let mut chars = rest[pos + 1..].chars();
        let (spec, verb) = parse_directive(&mut chars, buf);
        rest = chars.as_str();

        let verb = match verb {
            Some(verb) => verb,
            None => {
                buf.push_str("%!(NOVERB)");
                continue;
            }
        };
        if verb == '%' {
            buf.push('%');
            continue;
        }
        let Some(arg) = args.get(next_arg) else {
            let _ = write!(buf, "%!{}(MISSING)", verb);
            continue;
        };
        next_arg += 1;

        body.clear();
        match write_verb(arg, verb, &spec, &mut body) {
            Some(numeric) => pad(&body, &spec, numeric, buf),
            None => bad_verb(arg, verb, buf),
        }
    }
    buf.push_str(rest);

    if next_arg < args.len() {
        buf.push_str("%!(EXTRA ");
        for (i, arg) in args[next_arg..].iter().enumerate() {
            if i > 0 {
                buf.push_str(", ");
            }
            buf.push_str(arg.type_name());
            buf.push('=');
            body.clear();
            write_default(arg, &Spec::default(), &mut body);
            buf.push_str(&body);
        }
        buf.push(')');
    }
}

fn parse_directive(chars: &mut std::str::Chars<'_>, buf: &mut Buffer) -> (Spec, Option<char>) {
    let mut spec = Spec::default();
    let mut c = chars.next();
    while let Some(flag) = c {
        match flag {
            '+' => spec.plus = true,
            '-' => spec.minus = true,
            '#' => spec.sharp = true,
            ' ' => spec.space = true,
            '0' => spec.zero = true,
            _ => break,
        }
        c = chars.next();
    }

    let (width, next) = parse_number(c, chars);
    c = next;
    spec.width = match width {
        Some(w) if w > MAX_WIDTH => {
            buf.push_str("%!(BADWIDTH)");
            None
        }
        w => w,
    };

    if c == Some('.') {
        let (precision, next) = parse_number(chars.next(), chars);
        c = next;
        spec.precision = match precision.unwrap_or(0) {
            p if p > MAX_WIDTH => {
                buf.push_str("%!(BADPREC)");
                None
            }
            p => Some(p),
        };
    }
    (spec, c)
}

fn parse_number(
    mut c: Option<char>,
    chars: &mut std::str::Chars<'_>,
) -> (Option<usize>, Option<char>) {
    let mut value: Option<usize> = None;
    while let Some(d) = c.and_then(|c| c.to_digit(10)) {
        value = Some(
            value
                .unwrap_or(0)
                .saturating_mul(10)
                .saturating_add(d as usize),
        );
        c = chars.next();
    }
    (value, c)
}

/// Formats one argument. Returns whether the result is numeric (eligible for
/// zero padding), or `None` when the verb does not apply to the argument.
fn write_verb(arg: &FormatArg<'_>, verb: char, spec: &Spec, out: &mut String) -> Option<bool> {
    match (verb, arg) {
        ('v', _) => {
            write_default(arg, spec, out);
            Some(matches!(
                arg,
                FormatArg::Int(_) | FormatArg::Uint(_) | FormatArg::Float(_)
            ))
        }
        ('T', _) => {
            out.push_str(arg.type_name());
            Some(false)
        }
        ('s', FormatArg::Int(_) | FormatArg::Uint(_) | FormatArg::Float(_) | FormatArg::Bool(_)) => {
            None
        }
        ('s', _) => {
            let start = out.len();
            write_default(arg, spec, out);
            if let Some(precision) = spec.precision {
                if let Some((idx, _)) = out[start..].char_indices().nth(precision) {
                    out.truncate(start + idx);
                }
            }
            Some(false)
        }
        ('q', FormatArg::Char(c)) => {
            let _ = write!(out, "{:?}", c);
            Some(false)
        }
        ('q', FormatArg::Str(_) | FormatArg::Attr(_) | FormatArg::Display(_)) => {
            let mut plain = String::new();
            write_default(arg, spec, &mut plain);
            out.push_str(&quote::quote(&plain));
            Some(false)
        }
        ('t', FormatArg::Bool(b)) => {
            let _ = write!(out, "{}", b);
            Some(false)
        }
        ('d' | 'x' | 'X' | 'o' | 'b', FormatArg::Int(i)) => {
            write_integer(*i < 0, i.unsigned_abs(), verb, spec, out);
            Some(true)
        }
        ('d' | 'x' | 'X' | 'o' | 'b', FormatArg::Uint(u)) => {
            write_integer(false, *u, verb, spec, out);
            Some(true)
        }
        ('d' | 'x' | 'X' | 'o' | 'b', FormatArg::Char(c)) => {
            write_integer(false, u64::from(u32::from(*c)), verb, spec, out);
            Some(true)
        }
        ('x' | 'X', FormatArg::Str(s)) => {
            if spec.sharp {
                out.push_str(if verb == 'x' { "0x" } else { "0X" });
            }
            for byte in s.bytes() {
                let _ = if verb == 'x' {
                    write!(out, "{:02x}", byte)
                } else {
                    write!(out, "{:02X}", byte)
                };
            }
            Some(false)
        }
        ('c', FormatArg::Int(_) | FormatArg::Uint(_) | FormatArg::Char(_)) => {
            out.push(code_point(arg).and_then(char::from_u32).unwrap_or('\u{fffd}'));
            Some(false)
        }
        ('U', FormatArg::Int(_) | FormatArg::Uint(_) | FormatArg::Char(_)) => {
            let cp = code_point(arg).unwrap_or(0xfffd);
            let _ = write!(out, "U+{:04X}", cp);
            Some(false)
        }
        ('e' | 'E' | 'f' | 'F' | 'g' | 'G', FormatArg::Float(v)) => {
            write_float(*v, verb, spec, out);
            Some(true)
        }
        _ => None,
    }
}

fn code_point(arg: &FormatArg<'_>) -> Option<u32> {
    match arg {
        FormatArg::Int(i) => u32::try_from(*i).ok(),
        FormatArg::Uint(u) => u32::try_from(*u).ok(),
        FormatArg::Char(c) => Some(u32::from(*c)),
        _ => None,
    }
}

/// The `%v` form of an argument.
fn write_default(arg: &FormatArg<'_>, spec: &Spec, out: &mut String) {
    match arg {
        FormatArg::Str(s) => out.push_str(s),
        FormatArg::Int(i) => write_integer(*i < 0, i.unsigned_abs(), 'd', spec, out),
        FormatArg::Uint(u) => write_integer(false, *u, 'd', spec, out),
        FormatArg::Float(v) => write_float(*v, 'v', spec, out),
        FormatArg::Bool(b) => {
            let _ = write!(out, "{}", b);
        }
        FormatArg::Char(c) => out.push(*c),
        FormatArg::Attr(attr) => {
            let _ = write!(out, "{}", attr);
        }
        FormatArg::Display(d) => {
            let _ = write!(out, "{}", d);
        }
    }
}

fn write_sign(negative: bool, spec: &Spec, out: &mut String) {
    if negative {
        out.push('-');
    } else if spec.plus {
        out.push('+');
    } else if spec.space {
        out.push(' ');
    }
}

fn write_integer(negative: bool, magnitude: u64, verb: char, spec: &Spec, out: &mut String) {
    write_sign(negative, spec, out);
    if spec.sharp {
        match verb {
            'x' => out.push_str("0x"),
            'X' => out.push_str("0X"),
            'o' => out.push('0'),
            'b' => out.push_str("0b"),
            _ => {}
        }
    }
    let digits = match verb {
        'x' => format!("{:x}", magnitude),
        'X' => format!("{:X}", magnitude),
        'o' => format!("{:o}", magnitude),
        'b' => format!("{:b}", magnitude),
        _ => magnitude.to_string(),
    };
    if let Some(precision) = spec.precision {
        for _ in digits.len()..precision {
            out.push('0');
        }
    }
    out.push_str(&digits);
}

fn write_float(v: f64, verb: char, spec: &Spec, out: &mut String) {
    if v.is_nan() {
        out.push_str(if spec.plus { "+NaN" } else { "NaN" });
        return;
    }
    if v.is_infinite() {
        out.push_str(if v < 0.0 { "-Inf" } else { "+Inf" });
        return;
    }
    write_sign(v.is_sign_negative() && v != 0.0, spec, out);
    let v = v.abs();
    let upper = matches!(verb, 'E' | 'G');
    match verb {
        'f' | 'F' => {
            let _ = write!(out, "{:.*}", spec.precision.unwrap_or(6), v);
        }
        'e' | 'E' => {
            let s = format!("{:.*e}", spec.precision.unwrap_or(6), v);
            push_exponent_form(&s, upper, out);
        }
        // %v switches to exponent form only for very large or small values.
        'v' => write_general(v, spec.precision, 21, false, out),
        _ => write_general(v, spec.precision, 6, upper, out),
    }
}

/// `v` as `%v` prints it: shortest form, exponent only outside `1e-4..1e21`.
pub(crate) fn write_float_default(v: f64, out: &mut String) {
    write_float(v, 'v', &Spec::default(), out);
}

/// `%g`: exponent form when the exponent is below -4 or at least the
/// precision, plain decimal otherwise, trailing zeros removed.
fn write_general(v: f64, precision: Option<usize>, shortest_limit: i32, upper: bool, out: &mut String) {
    let (sci, limit) = match precision {
        Some(p) => {
            let p = p.max(1);
            (format!("{:.*e}", p - 1, v), p as i32)
        }
        None => (format!("{:e}", v), shortest_limit),
    };
    let exp: i32 = sci
        .rsplit_once('e')
        .and_then(|(_, e)| e.parse().ok())
        .unwrap_or(0);

    if exp < -4 || exp >= limit {
        let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
        let trimmed = trim_fraction(mantissa);
        let mut s = String::with_capacity(trimmed.len() + 5);
        s.push_str(trimmed);
        s.push('e');
        s.push_str(exponent);
        push_exponent_form(&s, upper, out);
    } else {
        let fixed = match precision {
            Some(p) => {
                let decimals = (p.max(1) as i32 - 1 - exp).max(0) as usize;
                format!("{:.*}", decimals, v)
            }
            None => format!("{}", v),
        };
        out.push_str(trim_fraction(&fixed));
    }
}

fn trim_fraction(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Rewrites Rust's `1.5e3` exponent notation into the C form `1.5e+03`.
fn push_exponent_form(s: &str, upper: bool, out: &mut String) {
    let (mantissa, exponent) = s.split_once('e').unwrap_or((s, "0"));
    let exp: i32 = exponent.parse().unwrap_or(0);
    out.push_str(mantissa);
    out.push(if upper { 'E' } else { 'e' });
    out.push(if exp < 0 { '-' } else { '+' });
    let _ = write!(out, "{:02}", exp.unsigned_abs());
}

fn pad(body: &str, spec: &Spec, numeric: bool, buf: &mut Buffer) {
    let len = body.chars().count();
    let fill = spec.width.map_or(0, |w| w.saturating_sub(len));
    if fill == 0 {
        buf.push_str(body);
    } else if spec.minus {
        buf.push_str(body);
        (0..fill).for_each(|_| buf.push(' '));
    } else if spec.zero && numeric && spec.precision.is_none() {
        let sign_len = body
            .chars()
            .next()
            .filter(|c| matches!(c, '+' | '-' | ' '))
            .map_or(0, char::len_utf8);
        buf.push_str(&body[..sign_len]);
        (0..fill).for_each(|_| buf.push('0'));
        buf.push_str(&body[sign_len..]);
    } else {
        (0..fill).for_each(|_| buf.push(' '));
        buf.push_str(body);
    }
}

fn bad_verb(arg: &FormatArg<'_>, verb: char, buf: &mut Buffer) {
    let mut value = String::new();
    write_default(arg, &Spec::default(), &mut value);
    let _ = write!(buf, "%!{}({}={})", verb, arg.type_name(), value);
}
