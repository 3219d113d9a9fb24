//! Subscripting with negative wraparound.
//!
//! The lenient functions never fail: an out-of-range read yields the neutral
//! default of the container, and an out-of-range or unsupported write is
//! dropped. The `checked_*` functions raise instead.

use tracing::trace;

use crate::bytes::{ByteArray, Bytes};
use crate::coerce::to_int;
use crate::config::IndexPolicy;
use crate::error::{RtResult, RuntimeError};
use crate::list::List;
use crate::map::Key;
use crate::text::{char_at, char_len, char_slice};
use crate::value::{Kind, Value};

/// Maps a negative index onto `index + len`. Never clamps.
pub fn normalize_index(index: i64, len: usize) -> i64 {
    if index < 0 {
        index.saturating_add(len_i64(len))
    } else {
        index
    }
}

fn len_i64(len: usize) -> i64 {
    i64::try_from(len).unwrap_or(i64::MAX)
}

/// Normalized position of `index` when it falls inside `[0, len)`.
fn position(index: i64, len: usize) -> Option<usize> {
    usize::try_from(normalize_index(index, len))
        .ok()
        .filter(|&i| i < len)
}

/// Clamped `[lo, hi)` bounds of a slice over `len` elements.
///
/// Omitted bounds default to the start and the end; `hi < lo` collapses to
/// an empty range at `lo`.
pub fn slice_bounds(lo: Option<i64>, hi: Option<i64>, len: usize) -> (usize, usize) {
    let clamp = |i: i64| usize::try_from(normalize_index(i, len).max(0)).map_or(len, |i| i.min(len));
    let lo = lo.map_or(0, clamp);
    let hi = hi.map_or(len, clamp).max(lo);
    (lo, hi)
}

/// The value an out-of-range read of `container` produces.
pub fn neutral_default(container: &Value) -> Value {
    match container.kind() {
        Kind::List | Kind::Bytes | Kind::ByteArray => Value::Int(0),
        Kind::Str => Value::string(""),
        _ => Value::Nil,
    }
}

fn sequence_len(container: &Value) -> Option<usize> {
    match container {
        Value::List(list) => Some(list.len()),
        Value::Str(s) => Some(char_len(s)),
        Value::ByteArray(bytes) => Some(bytes.len()),
        Value::Bytes(bytes) => Some(bytes.len()),
        _ => None,
    }
}

fn read_at(container: &Value, index: i64) -> Option<Value> {
    match container {
        Value::List(list) => position(index, list.len()).and_then(|i| list.get(i)),
        Value::Str(s) => position(index, char_len(s))
            .and_then(|i| char_at(s, i))
            .map(Value::from),
        Value::ByteArray(bytes) => position(index, bytes.len())
            .and_then(|i| bytes.get(i))
            .map(Value::from),
        Value::Bytes(bytes) => position(index, bytes.len()).map(|i| Value::from(bytes[i])),
        Value::Map(map) => map.get(&Key::Int(index)),
        _ => None,
    }
}

/// `container[index]`, or the neutral default when out of range.
pub fn get_index(container: &Value, index: i64) -> Value {
    read_at(container, index).unwrap_or_else(|| {
        trace!(kind = %container.kind(), index, "get_index: out of range, using default");
        neutral_default(container)
    })
}

/// `container[key]` for a dynamically typed subscript.
///
/// Maps look `key` up directly; sequences convert it with `to_int`.
pub fn get_item(container: &Value, key: &Value) -> Value {
    match container {
        Value::Map(map) => Key::from_value(key)
            .ok()
            .and_then(|key| map.get(&key))
            .unwrap_or_default(),
        _ => get_index(container, to_int(key)),
    }
}

/// `container[index] = value`. Writes outside the container are dropped.
pub fn set_index(container: &Value, index: i64, value: Value) {
    let written = match container {
        Value::List(list) => position(index, list.len()).is_some_and(|i| list.set(i, value)),
        Value::ByteArray(bytes) => {
            position(index, bytes.len()).is_some_and(|i| bytes.set(i, to_int(&value)))
        }
        Value::Map(map) => {
            map.insert(Key::Int(index), value);
            true
        }
        _ => false,
    };
    if !written {
        trace!(kind = %container.kind(), index, "set_index: write dropped");
    }
}

/// `container[key] = value` for a dynamically typed subscript.
pub fn set_item(container: &Value, key: &Value, value: Value) {
    match container {
        Value::Map(map) => match Key::from_value(key) {
            Ok(key) => {
                map.insert(key, value);
            }
            Err(_) => trace!(key = %key.kind(), "set_item: unhashable key dropped"),
        },
        _ => set_index(container, to_int(key), value),
    }
}

/// `container[lo:hi]` as a fresh value of the same kind.
///
/// Non-sequences slice to `Nil`.
pub fn slice(container: &Value, lo: impl Into<Option<i64>>, hi: impl Into<Option<i64>>) -> Value {
    let (lo, hi) = (lo.into(), hi.into());
    let Some(len) = sequence_len(container) else {
        trace!(kind = %container.kind(), "slice: not a sequence");
        return Value::Nil;
    };
    let (start, end) = slice_bounds(lo, hi, len);
    match container {
        Value::List(list) => Value::List(List::from_vec(list.borrow()[start..end].to_vec())),
        Value::Str(s) => Value::string(char_slice(s, start, end)),
        Value::ByteArray(bytes) => {
            Value::ByteArray(ByteArray::from_vec(bytes.borrow()[start..end].to_vec()))
        }
        Value::Bytes(bytes) => Value::Bytes(Bytes::from(&bytes[start..end])),
        _ => Value::Nil,
    }
}

fn not_subscriptable(op: &'static str, container: &Value) -> RuntimeError {
    RuntimeError::type_error(
        op,
        format_args!("'{}' object is not subscriptable", container.kind()),
    )
}

/// `container[index]`, raising `IndexError` when out of range.
pub fn checked_get_index(container: &Value, index: i64) -> RtResult<Value> {
    if let Value::Map(map) = container {
        return map
            .get(&Key::Int(index))
            .ok_or_else(|| RuntimeError::key_error("get_index", &Value::Int(index)));
    }
    let len = sequence_len(container).ok_or_else(|| not_subscriptable("get_index", container))?;
    read_at(container, index)
        .ok_or_else(|| RuntimeError::index_error("get_index", index, len, container.kind()))
}

/// `container[key]`, raising `KeyError` for a missing map key.
pub fn checked_get_item(container: &Value, key: &Value) -> RtResult<Value> {
    match container {
        Value::Map(map) => map
            .get(&Key::from_value(key)?)
            .ok_or_else(|| RuntimeError::key_error("get_item", key)),
        _ => match key {
            Value::Int(_) | Value::Bool(_) => checked_get_index(container, to_int(key)),
            _ => Err(RuntimeError::type_error(
                "get_item",
                format_args!("'{}' indices must be integers, not '{}'", container.kind(), key.kind()),
            )),
        },
    }
}

/// `container[index] = value`, raising on out-of-range writes, immutable
/// containers and values that do not fit a byte.
pub fn checked_set_index(container: &Value, index: i64, value: Value) -> RtResult<()> {
    match container {
        Value::List(list) => {
            let i = position(index, list.len()).ok_or_else(|| {
                RuntimeError::index_error("set_index", index, list.len(), Kind::List)
            })?;
            list.set(i, value);
            Ok(())
        }
        Value::ByteArray(bytes) => {
            let i = position(index, bytes.len()).ok_or_else(|| {
                RuntimeError::index_error("set_index", index, bytes.len(), Kind::ByteArray)
            })?;
            let byte = match value {
                Value::Int(b @ 0..=255) => b,
                Value::Bool(b) => i64::from(b),
                other => {
                    return Err(RuntimeError::value_error(
                        "set_index",
                        "byte must be in range(0, 256)",
                        &other,
                    ));
                }
            };
            bytes.set(i, byte);
            Ok(())
        }
        Value::Map(map) => {
            map.insert(Key::Int(index), value);
            Ok(())
        }
        other => Err(RuntimeError::type_error(
            "set_index",
            format_args!("'{}' object does not support item assignment", other.kind()),
        )),
    }
}

pub fn checked_set_item(container: &Value, key: &Value, value: Value) -> RtResult<()> {
    match container {
        Value::Map(map) => {
            map.insert(Key::from_value(key)?, value);
            Ok(())
        }
        _ => match key {
            Value::Int(_) | Value::Bool(_) => checked_set_index(container, to_int(key), value),
            _ => Err(RuntimeError::type_error(
                "set_item",
                format_args!("'{}' indices must be integers, not '{}'", container.kind(), key.kind()),
            )),
        },
    }
}

pub fn get_index_with(policy: IndexPolicy, container: &Value, index: i64) -> RtResult<Value> {
    match policy {
        IndexPolicy::Lenient => Ok(get_index(container, index)),
        IndexPolicy::Strict => checked_get_index(container, index),
    }
}

pub fn set_index_with(
    policy: IndexPolicy,
    container: &Value,
    index: i64,
    value: Value,
) -> RtResult<()> {
    match policy {
        IndexPolicy::Lenient => {
            set_index(container, index, value);
            Ok(())
        }
        IndexPolicy::Strict => checked_set_index(container, index, value),
    }
}

/// `len(value)`.
pub fn len(value: &Value) -> RtResult<i64> {
    match value {
        Value::Map(map) => Ok(len_i64(map.len())),
        _ => sequence_len(value).map(len_i64).ok_or_else(|| {
            RuntimeError::type_error(
                "len",
                format_args!("object of kind '{}' has no len()", value.kind()),
            )
        }),
    }
}

/// `item in container`.
pub fn contains(container: &Value, item: &Value) -> RtResult<bool> {
    match container {
        Value::Str(s) => match item {
            Value::Str(needle) => Ok(s.contains(&**needle)),
            _ => Err(RuntimeError::type_error(
                "contains",
                format_args!("'in <str>' requires str as left operand, not '{}'", item.kind()),
            )),
        },
        Value::List(list) => Ok(list.borrow().iter().any(|element| element.is_or_eq(item))),
        Value::Map(map) => Ok(map.contains_key(&Key::from_value(item)?)),
        Value::Bytes(_) | Value::ByteArray(_) => {
            let haystack = container.with_bytes(<[u8]>::to_vec).unwrap_or_default();
            match item {
                Value::Int(_) | Value::Bool(_) => {
                    let byte = to_int(item);
                    let byte = u8::try_from(byte).map_err(|_| {
                        RuntimeError::value_error("contains", "byte must be in range(0, 256)", item)
                    })?;
                    Ok(haystack.contains(&byte))
                }
                Value::Bytes(_) | Value::ByteArray(_) => {
                    let needle = item.with_bytes(<[u8]>::to_vec).unwrap_or_default();
                    Ok(needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle))
                }
                _ => Err(RuntimeError::type_error(
                    "contains",
                    format_args!("a bytes-like object is required, not '{}'", item.kind()),
                )),
            }
        }
        _ => Err(RuntimeError::type_error(
            "contains",
            format_args!("argument of kind '{}' is not iterable", container.kind()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::Map;

    fn ints(items: &[i64]) -> Value {
        Value::from(items.to_vec())
    }

    #[test]
    fn negative_indices_wrap_once() {
        assert_eq!(normalize_index(-1, 3), 2);
        assert_eq!(normalize_index(-4, 3), -1);
        assert_eq!(normalize_index(5, 3), 5);
        assert_eq!(normalize_index(i64::MIN, 3), i64::MIN + 3);
    }

    #[test]
    fn out_of_range_reads_use_neutral_default() {
        let list = ints(&[10, 20, 30]);
        assert_eq!(get_index(&list, -1), Value::Int(30));
        assert_eq!(get_index(&list, 5), Value::Int(0));
        assert_eq!(get_index(&list, -4), Value::Int(0));
        assert_eq!(get_index(&Value::from("héllo"), 1), Value::from("é"));
        assert_eq!(get_index(&Value::from("abc"), 3), Value::from(""));
        assert_eq!(get_index(&Value::Nil, 0), Value::Nil);
        assert_eq!(get_index(&Value::Int(5), 0), Value::Nil);
    }

    #[test]
    fn writes_outside_are_dropped() {
        let list = ints(&[1, 2]);
        set_index(&list, 2, Value::Int(9));
        set_index(&list, -3, Value::Int(9));
        set_index(&list, -1, Value::Int(7));
        assert_eq!(list, ints(&[1, 7]));

        let bytes = Value::ByteArray(ByteArray::from_vec(vec![0; 2]));
        set_index(&bytes, 0, Value::Int(300));
        set_index(&bytes, 1, Value::Int(-1));
        assert_eq!(bytes, Value::Bytes(Bytes::from(vec![44, 255])));

        // immutable kinds ignore writes
        let text = Value::from("abc");
        set_index(&text, 0, Value::from("z"));
        assert_eq!(text, Value::from("abc"));
    }

    #[test]
    fn dynamic_subscripts_dispatch_on_container() {
        let map = Value::Map(Map::new());
        set_item(&map, &Value::from("k"), Value::Int(1));
        set_item(&map, &ints(&[]), Value::Int(2));
        assert_eq!(get_item(&map, &Value::from("k")), Value::Int(1));
        assert_eq!(get_item(&map, &Value::from("missing")), Value::Nil);
        assert_eq!(get_item(&map, &ints(&[])), Value::Nil);
        assert_eq!(len(&map).unwrap(), 1);

        let list = ints(&[4, 5]);
        assert_eq!(get_item(&list, &Value::Float(1.7)), Value::Int(5));
        set_item(&list, &Value::Bool(false), Value::Int(0));
        assert_eq!(list, ints(&[0, 5]));
    }

    #[test]
    fn slices_clamp_and_copy() {
        let list = ints(&[1, 2, 3, 4, 5]);
        assert_eq!(slice(&list, 1, 3), ints(&[2, 3]));
        assert_eq!(slice(&list, -2, None), ints(&[4, 5]));
        assert_eq!(slice(&list, None, -3), ints(&[1, 2]));
        assert_eq!(slice(&list, 4, 1), ints(&[]));
        assert_eq!(slice(&list, -100, 100), list);
        assert!(!slice(&list, None, None).same_object(&list));
        assert_eq!(slice(&Value::from("héllo"), 1, -1), Value::from("éll"));
        assert_eq!(slice(&Value::Int(3), 0, 1), Value::Nil);

        let bytes = Value::ByteArray(ByteArray::from_vec(vec![1, 2, 3]));
        let part = slice(&bytes, 1, None);
        assert_eq!(part.kind(), Kind::ByteArray);
        assert_eq!(part, Value::Bytes(Bytes::from(vec![2, 3])));
    }

    #[test]
    fn strict_access_raises() {
        let list = ints(&[10, 20, 30]);
        let err = checked_get_index(&list, 5).unwrap_err();
        assert_eq!(err.name(), "IndexError");
        assert_eq!(checked_get_index(&list, -3).unwrap(), Value::Int(10));
        assert_eq!(
            checked_set_index(&list, 3, Value::Nil).unwrap_err().name(),
            "IndexError"
        );
        assert_eq!(
            checked_set_index(&Value::from("ab"), 0, Value::Nil).unwrap_err().name(),
            "TypeError"
        );
        let bytes = Value::ByteArray(ByteArray::from_vec(vec![0; 1]));
        assert_eq!(
            checked_set_index(&bytes, 0, Value::Int(256)).unwrap_err().name(),
            "ValueError"
        );
        assert!(checked_set_index(&bytes, 0, Value::Int(255)).is_ok());

        let map = Value::Map(Map::new());
        assert_eq!(
            checked_get_item(&map, &Value::from("k")).unwrap_err().name(),
            "KeyError"
        );
        assert_eq!(checked_get_item(&map, &ints(&[])).unwrap_err().name(), "TypeError");
        assert_eq!(
            checked_get_item(&list, &Value::from("0")).unwrap_err().name(),
            "TypeError"
        );
        assert_eq!(checked_get_index(&Value::Nil, 0).unwrap_err().name(), "TypeError");
    }

    #[test]
    fn policy_selects_behaviour() {
        let list = ints(&[1]);
        assert_eq!(
            get_index_with(IndexPolicy::Lenient, &list, 9).unwrap(),
            Value::Int(0)
        );
        assert!(get_index_with(IndexPolicy::Strict, &list, 9).is_err());
        assert!(set_index_with(IndexPolicy::Lenient, &list, 9, Value::Nil).is_ok());
        assert!(set_index_with(IndexPolicy::Strict, &list, 9, Value::Nil).is_err());
    }

    #[test]
    fn len_and_membership() {
        assert_eq!(len(&Value::from("héllo")).unwrap(), 5);
        assert_eq!(len(&ints(&[1, 2])).unwrap(), 2);
        assert_eq!(len(&Value::Int(3)).unwrap_err().name(), "TypeError");

        assert!(contains(&Value::from("hello"), &Value::from("ell")).unwrap());
        assert!(contains(&Value::from("hello"), &Value::from("")).unwrap());
        assert!(contains(&Value::from("a"), &Value::Int(1)).is_err());
        assert!(contains(&ints(&[1, 2]), &Value::Float(2.0)).unwrap());
        assert!(!contains(&ints(&[1, 2]), &Value::from("1")).unwrap());

        let bytes = Value::Bytes(Bytes::from(vec![1, 2, 3]));
        assert!(contains(&bytes, &Value::Int(2)).unwrap());
        assert!(contains(&bytes, &Value::Bytes(Bytes::from(vec![2, 3]))).unwrap());
        assert!(!contains(&bytes, &Value::Bytes(Bytes::from(vec![3, 2]))).unwrap());
        assert_eq!(contains(&bytes, &Value::Int(256)).unwrap_err().name(), "ValueError");
        assert_eq!(contains(&Value::Int(1), &Value::Int(1)).unwrap_err().name(), "TypeError");
    }
}
