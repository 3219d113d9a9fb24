//! ASCII character classification.
//!
//! Every predicate is false for the empty string and only recognizes ASCII
//! characters, so the answer is the same on every target.

use crate::error::{RtResult, RuntimeError};
use crate::text::{char_at, char_len};
use crate::value::Value;

fn all_ascii(s: &str, pred: fn(&u8) -> bool) -> bool {
    !s.is_empty() && s.bytes().all(|b| pred(&b))
}

pub fn isdigit(s: &str) -> bool {
    all_ascii(s, u8::is_ascii_digit)
}

pub fn isalpha(s: &str) -> bool {
    all_ascii(s, u8::is_ascii_alphabetic)
}

pub fn isalnum(s: &str) -> bool {
    all_ascii(s, u8::is_ascii_alphanumeric)
}

/// Space, tab, newline, carriage return, vertical tab and form feed.
pub fn isspace(s: &str) -> bool {
    all_ascii(s, |&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0B | 0x0C))
}

/// Code point of a length-1 string.
pub fn ord(value: &Value) -> RtResult<i64> {
    let Value::Str(s) = value else {
        return Err(RuntimeError::type_error(
            "ord",
            format_args!("expected a string of length 1, but '{}' found", value.kind()),
        ));
    };
    match (char_len(s), char_at(s, 0)) {
        (1, Some(c)) => Ok(i64::from(u32::from(c))),
        (len, _) => Err(RuntimeError::type_error(
            "ord",
            format_args!("expected a character, but string of length {len} found"),
        )),
    }
}

/// The length-1 string for a Unicode scalar value.
pub fn chr(code: i64) -> RtResult<Value> {
    u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .map(Value::from)
        .ok_or_else(|| {
            RuntimeError::value_error("chr", "code point out of range", &Value::Int(code))
        })
}
