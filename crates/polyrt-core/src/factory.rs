//! Constructors for containers and iteration snapshots.

use tracing::{debug, trace};

use crate::bytes::{ByteArray, Bytes, mask};
use crate::coerce::to_int;
use crate::error::{RtResult, RuntimeError};
use crate::list::List;
use crate::value::Value;

/// A zero-filled byte array of length `max(len, 0)`.
///
/// A length no allocation can hold raises `MemoryError`.
pub fn bytearray(len: i64) -> RtResult<ByteArray> {
    Ok(ByteArray::from_vec(zero_filled("bytearray", len)?))
}

fn zero_filled(op: &'static str, len: i64) -> RtResult<Vec<u8>> {
    let len = repeat_count(op, len)?;
    let mut out = vec_with_room(op, len)?;
    out.resize(len, 0);
    Ok(out)
}

/// A byte array built from `source`, masking every element to a byte.
///
/// Accepts lists (elements converted with `to_int`), byte strings, strings
/// (code points) and an int length.
pub fn bytearray_from(source: &Value) -> RtResult<ByteArray> {
    Ok(ByteArray::from_vec(masked_contents("bytearray", source)?))
}

/// An immutable snapshot of `source`, with the same inputs as
/// [`bytearray_from`]. Later mutation of `source` is never observed.
pub fn bytes(source: &Value) -> RtResult<Bytes> {
    Ok(Bytes::from(masked_contents("bytes", source)?))
}

fn masked_contents(op: &'static str, source: &Value) -> RtResult<Vec<u8>> {
    Ok(match source {
        Value::List(list) => list.borrow().iter().map(|item| mask(to_int(item))).collect(),
        Value::ByteArray(bytes) => bytes.snapshot(),
        Value::Bytes(bytes) => bytes.to_vec(),
        Value::Str(s) => s.chars().map(|c| mask(i64::from(u32::from(c)))).collect(),
        Value::Int(_) | Value::Bool(_) => zero_filled(op, to_int(source))?,
        other => {
            return Err(RuntimeError::type_error(
                op,
                format_args!("cannot build bytes from '{}'", other.kind()),
            ));
        }
    })
}

/// A copy of `value` that shares no mutable storage with it.
pub(crate) fn independent_copy(value: &Value) -> Value {
    if value.kind().is_composite() {
        value.deep_copy()
    } else {
        value.clone()
    }
}

/// A repetition count: non-positive counts repeat nothing.
pub(crate) fn repeat_count(op: &'static str, count: i64) -> RtResult<usize> {
    if count <= 0 {
        return Ok(0);
    }
    usize::try_from(count).map_err(|_| RuntimeError::memory(op, count.unsigned_abs().into()))
}

/// Length of `count` repetitions of `unit` elements.
pub(crate) fn repeated_len(op: &'static str, unit: usize, count: usize) -> RtResult<usize> {
    unit.checked_mul(count)
        .ok_or_else(|| RuntimeError::memory(op, unit as u128 * count as u128))
}

/// An empty vector with room for `len` elements, or `MemoryError` when the
/// allocation cannot be made.
pub(crate) fn vec_with_room<T>(op: &'static str, len: usize) -> RtResult<Vec<T>> {
    let mut out = Vec::new();
    out.try_reserve_exact(len)
        .map_err(|_| RuntimeError::memory(op, len as u128))?;
    Ok(out)
}

/// `items` concatenated `count` times.
pub(crate) fn repeat_slice<T: Clone>(
    op: &'static str,
    items: &[T],
    count: usize,
) -> RtResult<Vec<T>> {
    if items.is_empty() {
        return Ok(Vec::new());
    }
    let mut out = vec_with_room(op, repeated_len(op, items.len(), count)?)?;
    for _ in 0..count {
        out.extend_from_slice(items);
    }
    Ok(out)
}

/// `items` concatenated `count` times, composite elements copied per repetition.
pub(crate) fn repeat_items(op: &'static str, items: &[Value], count: usize) -> RtResult<List> {
    if items.is_empty() {
        return Ok(List::new());
    }
    let mut repeated = vec_with_room(op, repeated_len(op, items.len(), count)?)?;
    for _ in 0..count {
        repeated.extend(items.iter().map(independent_copy));
    }
    Ok(List::from_vec(repeated))
}

/// A list of `count` elements, each an independent copy of `value`.
///
/// Rows built with `list_repeat(list_repeat(0, w), h)` never alias.
pub fn list_repeat(value: &Value, count: i64) -> RtResult<List> {
    let count = repeat_count("list_repeat", count)?;
    debug!(kind = %value.kind(), count, "list_repeat");
    repeat_items("list_repeat", std::slice::from_ref(value), count)
}

/// Lazily stepped integer range.
#[derive(Debug, Clone)]
pub struct StepRange {
    next: i64,
    step: i64,
    remaining: u64,
}

impl StepRange {
    pub fn new(start: i64, stop: i64, step: i64) -> RtResult<Self> {
        if step == 0 {
            return Err(RuntimeError::value_error(
                "range",
                "arg 3 must not be zero",
                &Value::Int(step),
            ));
        }
        let (start, stop, step_wide) = (i128::from(start), i128::from(stop), i128::from(step));
        let span = if step > 0 { stop - start } else { start - stop };
        let remaining = if span <= 0 {
            0
        } else {
            let magnitude = step_wide.abs();
            (span + magnitude - 1) / magnitude
        };
        Ok(StepRange {
            next: start as i64,
            step,
            remaining: remaining as u64,
        })
    }
}

impl Iterator for StepRange {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.remaining == 0 {
            return None;
        }
        let current = self.next;
        self.remaining -= 1;
        self.next = current.wrapping_add(self.step);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = usize::try_from(self.remaining).unwrap_or(usize::MAX);
        (len, usize::try_from(self.remaining).ok())
    }
}

/// The integers from `start` toward `stop` (exclusive) by `step`.
///
/// Ascending for a positive step, descending for a negative one. A zero step
/// raises `ValueError`.
pub fn range(start: i64, stop: i64, step: i64) -> RtResult<Vec<i64>> {
    let steps = StepRange::new(start, stop, step)?;
    let len = usize::try_from(steps.remaining)
        .map_err(|_| RuntimeError::memory("range", steps.remaining.into()))?;
    let mut out = vec_with_room("range", len)?;
    out.extend(steps);
    Ok(out)
}

pub fn range_list(start: i64, stop: i64, step: i64) -> RtResult<Value> {
    Ok(Value::from(range(start, stop, step)?))
}

/// Elements produced by iterating `value`, captured at call time.
///
/// Strings yield length-1 strings, byte strings yield ints and maps yield
/// their keys in order. Non-iterable kinds yield nothing.
pub fn items(value: &Value) -> Vec<Value> {
    match value {
        Value::List(list) => list.snapshot(),
        Value::Str(s) => s.chars().map(Value::from).collect(),
        Value::ByteArray(_) | Value::Bytes(_) => value
            .with_bytes(|bytes| bytes.iter().copied().map(Value::from).collect::<Vec<_>>())
            .unwrap_or_default(),
        Value::Map(map) => map.keys().iter().map(|key| key.to_value()).collect(),
        other => {
            trace!(kind = %other.kind(), "items: not iterable, yielding nothing");
            Vec::new()
        }
    }
}

/// `(index, element)` pairs over a snapshot of `value`.
pub fn enumerate(value: &Value) -> Vec<(i64, Value)> {
    (0_i64..).zip(items(value)).collect()
}
