//! Canonical text forms of values.
//!
//! `stringify` is the source language's `str()` and `repr` its `repr()`.
//! Both produce identical text on every target: floats use the shortest
//! representation that round-trips, containers render their elements with
//! `repr`, and maps render in key order.

use std::fmt::{self, Write as _};
use std::io::{self, Write};

use crate::bytes::ByteArray;
use crate::error::{RtResult, RuntimeError};
use crate::list::List;
use crate::map::Map;
use crate::value::Value;

/// `str(value)`.
pub fn stringify(value: &Value) -> String {
    match value {
        Value::Str(s) => s.to_string(),
        other => Renderer::default().render(other, false),
    }
}

/// `repr(value)`.
pub fn repr(value: &Value) -> String {
    Renderer::default().render(value, true)
}

/// Shortest round-trip text of a float.
///
/// Decimal exponents in `[-4, 16)` render positionally (`0.0001`,
/// `1000000000000000.0`); others use scientific notation with a signed,
/// at least two-digit exponent (`1e-05`, `1e+16`).
pub fn float_repr(f: f64) -> String {
    if f.is_nan() {
        return "nan".to_owned();
    }
    if f.is_infinite() {
        return if f > 0.0 { "inf" } else { "-inf" }.to_owned();
    }
    if f == 0.0 {
        return if f.is_sign_negative() { "-0.0" } else { "0.0" }.to_owned();
    }

    let mut buffer = ryu::Buffer::new();
    let (digits, exp) = decimal_digits(buffer.format_finite(f.abs()));

    let mut out = String::with_capacity(digits.len() + 8);
    if f < 0.0 {
        out.push('-');
    }
    if (-4..16).contains(&exp) {
        if exp >= 0 {
            let whole = exp as usize + 1;
            if digits.len() <= whole {
                out.push_str(&digits);
                out.extend(std::iter::repeat_n('0', whole - digits.len()));
                out.push_str(".0");
            } else {
                out.push_str(&digits[..whole]);
                out.push('.');
                out.push_str(&digits[whole..]);
            }
        } else {
            out.push_str("0.");
            out.extend(std::iter::repeat_n('0', (-exp - 1) as usize));
            out.push_str(&digits);
        }
    } else {
        out.push_str(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        let sign = if exp < 0 { '-' } else { '+' };
        let _ = write!(out, "e{sign}{:02}", exp.abs());
    }
    out
}

/// Splits ryu output into significant digits and the decimal exponent of
/// the first digit. The input must be nonzero.
fn decimal_digits(text: &str) -> (String, i32) {
    let (mantissa, exp) = match text.split_once(['e', 'E']) {
        Some((mantissa, exp)) => (mantissa, exp.parse::<i32>().unwrap_or(0)),
        None => (text, 0),
    };
    let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let all: String = whole.chars().chain(fraction.chars()).collect();
    let significant = all.trim_start_matches('0');
    let point = whole.len() as i32 - (all.len() - significant.len()) as i32;
    let digits = significant.trim_end_matches('0');
    (digits.to_owned(), point - 1 + exp)
}

/// Writes `values` separated by single spaces and a newline, then flushes.
pub fn print(values: &[Value]) -> RtResult<()> {
    print_to(&mut io::stdout().lock(), values)
}

pub fn print_to<W: Write + ?Sized>(writer: &mut W, values: &[Value]) -> RtResult<()> {
    let mut line = values.iter().map(stringify).collect::<Vec<_>>().join(" ");
    line.push('\n');
    writer
        .write_all(line.as_bytes())
        .and_then(|()| writer.flush())
        .map_err(|error| RuntimeError::io("print", error))
}

/// Tracks the containers being rendered so cycles print as `[...]`.
#[derive(Default)]
struct Renderer {
    out: String,
    active: Vec<usize>,
}

impl Renderer {
    fn render(mut self, value: &Value, quoted: bool) -> String {
        self.value(value, quoted);
        self.out
    }

    fn value(&mut self, value: &Value, quoted: bool) {
        match value {
            Value::Nil => self.out.push_str("None"),
            Value::Bool(true) => self.out.push_str("True"),
            Value::Bool(false) => self.out.push_str("False"),
            Value::Int(i) => {
                let _ = write!(self.out, "{i}");
            }
            Value::Float(f) => self.out.push_str(&float_repr(*f)),
            Value::Str(s) if quoted => quote_str(&mut self.out, s),
            Value::Str(s) => self.out.push_str(s),
            Value::List(list) => self.list(list),
            Value::Map(map) => self.map(map),
            Value::ByteArray(bytes) => {
                self.out.push_str("bytearray(");
                quote_bytes(&mut self.out, &bytes.borrow());
                self.out.push(')');
            }
            Value::Bytes(bytes) => quote_bytes(&mut self.out, bytes),
        }
    }

    fn list(&mut self, list: &List) {
        if self.active.contains(&list.addr()) {
            self.out.push_str("[...]");
            return;
        }
        self.active.push(list.addr());
        self.out.push('[');
        for (i, item) in list.snapshot().iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.value(item, true);
        }
        self.out.push(']');
        self.active.pop();
    }

    fn map(&mut self, map: &Map) {
        if self.active.contains(&map.addr()) {
            self.out.push_str("{...}");
            return;
        }
        self.active.push(map.addr());
        self.out.push('{');
        for (i, (key, item)) in map.items().iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.value(&key.to_value(), true);
            self.out.push_str(": ");
            self.value(item, true);
        }
        self.out.push('}');
        self.active.pop();
    }
}

fn pick_quote(has_single: bool, has_double: bool) -> char {
    if has_single && !has_double { '"' } else { '\'' }
}

fn quote_str(out: &mut String, s: &str) {
    let quote = pick_quote(s.contains('\''), s.contains('"'));
    out.push(quote);
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c if c.is_control() => {
                let code = u32::from(c);
                let _ = match code {
                    0..=0xFF => write!(out, "\\x{code:02x}"),
                    0x100..=0xFFFF => write!(out, "\\u{code:04x}"),
                    _ => write!(out, "\\U{code:08x}"),
                };
            }
            c => out.push(c),
        }
    }
    out.push(quote);
}

fn quote_bytes(out: &mut String, bytes: &[u8]) {
    let quote = pick_quote(bytes.contains(&b'\''), bytes.contains(&b'"'));
    out.push('b');
    out.push(quote);
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            b'\n' => out.push_str("\\n"),
            b'\r' => out.push_str("\\r"),
            b'\t' => out.push_str("\\t"),
            b if char::from(b) == quote => {
                out.push('\\');
                out.push(quote);
            }
            0x20..=0x7E => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "\\x{b:02x}");
            }
        }
    }
    out.push(quote);
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&stringify(self))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr(self))
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr(&Value::List(self.clone())))
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr(&Value::Map(self.clone())))
    }
}

impl fmt::Debug for ByteArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&repr(&Value::ByteArray(self.clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytes::Bytes;
    use crate::map::Key;
    use insta::assert_snapshot;

    #[test]
    fn float_forms() {
        let rendered = [
            1.0,
            0.1,
            -2.5,
            1e16,
            1e15,
            1e-5,
            0.0001,
            1.5e-7,
            123456789.125,
            1.2345678901234568e17,
            -0.0,
            f64::INFINITY,
            f64::NEG_INFINITY,
            f64::NAN,
            0.1 + 0.2,
            5e-324,
        ]
        .map(float_repr)
        .join(" ");
        assert_snapshot!(rendered, @"1.0 0.1 -2.5 1e+16 1000000000000000.0 1e-05 0.0001 1.5e-07 123456789.125 1.2345678901234568e+17 -0.0 inf -inf nan 0.30000000000000004 5e-324");
    }

    #[test]
    fn scalar_text() {
        assert_eq!(stringify(&Value::Nil), "None");
        assert_eq!(stringify(&Value::Bool(true)), "True");
        assert_eq!(stringify(&Value::Int(-42)), "-42");
        assert_eq!(stringify(&Value::from("it's")), "it's");
        assert_eq!(repr(&Value::from("it's")), "\"it's\"");
        assert_eq!(repr(&Value::from("a'b\"c")), r#"'a\'b"c'"#);
        assert_eq!(repr(&Value::from("tab\there\\")), r"'tab\there\\'");
        assert_eq!(repr(&Value::from("\u{7}é")), r"'\x07é'");
    }

    #[test]
    fn container_text() {
        let map = Map::new();
        map.insert(Key::from("b"), Value::Float(2.0));
        map.insert(Key::from(1), Value::from("one"));
        let nested = Value::list([
            Value::Int(1),
            Value::from("x"),
            Value::Nil,
            Value::Map(map),
            Value::Bytes(Bytes::from(b"a'\x00\xff".to_vec())),
            Value::ByteArray(ByteArray::from_vec(vec![104, 105])),
        ]);
        assert_snapshot!(stringify(&nested), @r#"[1, 'x', None, {1: 'one', 'b': 2.0}, b"a'\x00\xff", bytearray(b'hi')]"#);
        assert_eq!(repr(&nested), stringify(&nested));
    }

    #[test]
    fn cycles_render_with_ellipsis() {
        let list = List::new();
        list.push(Value::Int(1));
        list.push(Value::List(list.clone()));
        assert_eq!(repr(&Value::List(list)), "[1, [...]]");
    }

    #[test]
    fn print_joins_with_spaces() {
        let mut out = Vec::new();
        print_to(
            &mut out,
            &[Value::from("x"), Value::Int(1), Value::Bool(false), Value::Float(0.5)],
        )
        .unwrap();
        print_to(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "x 1 False 0.5\n\n");
    }

    #[test]
    fn print_surfaces_write_failures() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }
        let err = print_to(&mut Closed, &[Value::Int(1)]).unwrap_err();
        assert_eq!(err.name(), "Io");
        assert_eq!(err.to_string(), "OSError: print: closed");
    }
}
