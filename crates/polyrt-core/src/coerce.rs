//! Boolean context and scalar conversions.
//!
//! Conversions never fail: a string that does not parse converts to zero.

use tracing::trace;

use crate::format::stringify;
use crate::value::Value;

/// Truth value of `value` in a boolean context.
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Nil => false,
        Value::Bool(b) => *b,
        Value::Int(i) => *i != 0,
        // NaN != 0.0, so NaN is truthy
        Value::Float(f) => *f != 0.0,
        Value::Str(s) => !s.is_empty(),
        Value::List(list) => !list.is_empty(),
        Value::Map(map) => !map.is_empty(),
        Value::ByteArray(bytes) => !bytes.is_empty(),
        Value::Bytes(bytes) => !bytes.is_empty(),
    }
}

/// Integer conversion.
///
/// Floats truncate toward zero and saturate at the `i64` bounds; NaN
/// converts to 0. Strings must hold a whole integer literal.
pub fn to_int(value: &Value) -> i64 {
    match value {
        Value::Bool(b) => i64::from(*b),
        Value::Int(i) => *i,
        Value::Float(f) => *f as i64,
        Value::Str(s) => parse_int(s).unwrap_or_else(|| {
            trace!(input = %s, "to_int: unparsable string, using 0");
            0
        }),
        _ => 0,
    }
}

pub fn to_float(value: &Value) -> f64 {
    match value {
        Value::Bool(b) => f64::from(u8::from(*b)),
        Value::Int(i) => *i as f64,
        Value::Float(f) => *f,
        Value::Str(s) => parse_float(s).unwrap_or_else(|| {
            trace!(input = %s, "to_float: unparsable string, using 0.0");
            0.0
        }),
        _ => 0.0,
    }
}

/// Canonical text of `value`; `Nil` converts to the empty string.
pub fn to_str(value: &Value) -> String {
    match value {
        Value::Nil => String::new(),
        Value::Str(s) => s.to_string(),
        other => stringify(other),
    }
}

/// Parses a decimal integer literal: surrounding whitespace, an optional
/// sign, and digits optionally grouped with single underscores.
///
/// Returns `None` on malformed input or when the value does not fit `i64`.
pub fn parse_int(text: &str) -> Option<i64> {
    let text = text.trim();
    let digits = text.strip_prefix(['+', '-']).unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit() || b == b'_') {
        return None;
    }
    let cleaned = strip_separators(text)?;
    cleaned.parse().ok()
}

/// Parses a float literal: decimal or exponent notation, or an `inf`,
/// `infinity` or `nan` spelling in any case, each with an optional sign.
pub fn parse_float(text: &str) -> Option<f64> {
    let text = text.trim();
    let body = text.strip_prefix(['+', '-']).unwrap_or(text);
    let special = ["inf", "infinity", "nan"]
        .iter()
        .any(|name| body.eq_ignore_ascii_case(name));
    if !special
        && !body
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'_' | b'.' | b'e' | b'E' | b'+' | b'-'))
    {
        return None;
    }
    let cleaned = strip_separators(text)?;
    cleaned.parse().ok()
}

/// Removes `_` digit separators, rejecting any that are not between digits.
fn strip_separators(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b != b'_' {
            continue;
        }
        let before = i.checked_sub(1).map(|j| bytes[j]);
        let after = bytes.get(i + 1).copied();
        if !before.is_some_and(|c| c.is_ascii_digit()) || !after.is_some_and(|c| c.is_ascii_digit())
        {
            return None;
        }
    }
    Some(text.replace('_', ""))
}
