//! Arithmetic with floor-division semantics.
//!
//! Integer arithmetic wraps at 64 bits. Any `Float` operand promotes the
//! operation to `Float`. `Bool` operands count as `Int`. A zero divisor
//! raises `DivisionByZero` whatever the operand kinds.

use std::cmp::Ordering;

use crate::bytes::{ByteArray, Bytes};
use crate::error::{RtResult, RuntimeError};
use crate::factory::{repeat_count, repeat_items, repeat_slice};
use crate::list::List;
use crate::value::Value;

/// 2^63, the first float past `i64::MAX`.
pub(crate) const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;

#[derive(Debug, Clone, Copy)]
pub(crate) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub(crate) fn of(value: &Value) -> Option<Num> {
        match value {
            Value::Bool(b) => Some(Num::Int(i64::from(*b))),
            Value::Int(i) => Some(Num::Int(*i)),
            Value::Float(f) => Some(Num::Float(*f)),
            _ => None,
        }
    }

    fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    fn is_zero(self) -> bool {
        match self {
            Num::Int(i) => i == 0,
            Num::Float(f) => f == 0.0,
        }
    }

    pub(crate) fn num_eq(self, other: Num) -> bool {
        self.partial_cmp_num(other) == Some(Ordering::Equal)
    }

    /// Exact comparison; ints are never rounded through `f64`.
    pub(crate) fn partial_cmp_num(self, other: Num) -> Option<Ordering> {
        match (self, other) {
            (Num::Int(a), Num::Int(b)) => Some(a.cmp(&b)),
            (Num::Float(a), Num::Float(b)) => a.partial_cmp(&b),
            (Num::Int(a), Num::Float(b)) => cmp_int_float(a, b),
            (Num::Float(a), Num::Int(b)) => cmp_int_float(b, a).map(Ordering::reverse),
        }
    }
}

fn cmp_int_float(i: i64, f: f64) -> Option<Ordering> {
    if f.is_nan() {
        return None;
    }
    if f >= I64_BOUND {
        return Some(Ordering::Less);
    }
    if f < -I64_BOUND {
        return Some(Ordering::Greater);
    }
    let whole = f.trunc();
    Some(match i.cmp(&(whole as i64)) {
        Ordering::Equal => whole.partial_cmp(&f).unwrap_or(Ordering::Equal),
        unequal => unequal,
    })
}

fn operands(op: &'static str, a: &Value, b: &Value) -> RtResult<(Num, Num)> {
    match (Num::of(a), Num::of(b)) {
        (Some(x), Some(y)) => Ok((x, y)),
        _ => Err(RuntimeError::unsupported_operands(op, a, b)),
    }
}

fn floor_div_int(a: i64, b: i64) -> i64 {
    let q = a.wrapping_div(b);
    if a.wrapping_rem(b) != 0 && ((a < 0) != (b < 0)) {
        q.wrapping_sub(1)
    } else {
        q
    }
}

fn floor_mod_int(a: i64, b: i64) -> i64 {
    let r = a.wrapping_rem(b);
    if r != 0 && ((r < 0) != (b < 0)) {
        r.wrapping_add(b)
    } else {
        r
    }
}

/// Floored quotient and remainder of two floats with a nonzero divisor.
fn divmod_float(a: f64, b: f64) -> (f64, f64) {
    let mut rem = a % b;
    let mut div = (a - rem) / b;
    if rem != 0.0 {
        if (b < 0.0) != (rem < 0.0) {
            rem += b;
            div -= 1.0;
        }
    } else {
        rem = 0.0_f64.copysign(b);
    }
    let quotient = if div != 0.0 {
        let mut floored = div.floor();
        if div - floored > 0.5 {
            floored += 1.0;
        }
        floored
    } else {
        0.0_f64.copysign(a / b)
    };
    (quotient, rem)
}

/// `a // b`.
pub fn floordiv(a: &Value, b: &Value) -> RtResult<Value> {
    let (x, y) = operands("floordiv", a, b)?;
    if y.is_zero() {
        return Err(RuntimeError::division_by_zero("floordiv", a, b));
    }
    Ok(match (x, y) {
        (Num::Int(x), Num::Int(y)) => Value::Int(floor_div_int(x, y)),
        _ => Value::Float(divmod_float(x.as_f64(), y.as_f64()).0),
    })
}

/// `a % b`, floored: the result is zero or has the sign of `b`.
pub fn modulo(a: &Value, b: &Value) -> RtResult<Value> {
    let (x, y) = operands("mod", a, b)?;
    if y.is_zero() {
        return Err(RuntimeError::division_by_zero("mod", a, b));
    }
    Ok(match (x, y) {
        (Num::Int(x), Num::Int(y)) => Value::Int(floor_mod_int(x, y)),
        _ => Value::Float(divmod_float(x.as_f64(), y.as_f64()).1),
    })
}

pub fn floordiv_i64(a: i64, b: i64) -> RtResult<i64> {
    if b == 0 {
        return Err(RuntimeError::division_by_zero(
            "floordiv",
            &Value::Int(a),
            &Value::Int(b),
        ));
    }
    Ok(floor_div_int(a, b))
}

pub fn mod_i64(a: i64, b: i64) -> RtResult<i64> {
    if b == 0 {
        return Err(RuntimeError::division_by_zero(
            "mod",
            &Value::Int(a),
            &Value::Int(b),
        ));
    }
    Ok(floor_mod_int(a, b))
}

pub fn floordiv_f64(a: f64, b: f64) -> RtResult<f64> {
    if b == 0.0 {
        return Err(RuntimeError::division_by_zero(
            "floordiv",
            &Value::Float(a),
            &Value::Float(b),
        ));
    }
    Ok(divmod_float(a, b).0)
}

pub fn mod_f64(a: f64, b: f64) -> RtResult<f64> {
    if b == 0.0 {
        return Err(RuntimeError::division_by_zero(
            "mod",
            &Value::Float(a),
            &Value::Float(b),
        ));
    }
    Ok(divmod_float(a, b).1)
}

/// `a / b`, always producing a `Float`.
pub fn truediv(a: &Value, b: &Value) -> RtResult<Value> {
    let (x, y) = operands("truediv", a, b)?;
    if y.is_zero() {
        return Err(RuntimeError::division_by_zero("truediv", a, b));
    }
    Ok(Value::Float(x.as_f64() / y.as_f64()))
}

/// `a + b`. Besides numbers, concatenates strings, lists and byte strings
/// into a fresh value of the left operand's kind.
pub fn add(a: &Value, b: &Value) -> RtResult<Value> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(Value::string(format!("{x}{y}"))),
        (Value::List(x), Value::List(y)) => {
            let mut items = x.snapshot();
            items.extend(y.snapshot());
            Ok(Value::List(List::from_vec(items)))
        }
        (Value::Bytes(_) | Value::ByteArray(_), Value::Bytes(_) | Value::ByteArray(_)) => {
            let mut joined = byte_contents(a);
            joined.extend(byte_contents(b));
            Ok(match a {
                Value::ByteArray(_) => Value::ByteArray(ByteArray::from_vec(joined)),
                _ => Value::Bytes(Bytes::from(joined)),
            })
        }
        _ => Ok(match operands("add", a, b)? {
            (Num::Int(x), Num::Int(y)) => Value::Int(x.wrapping_add(y)),
            (x, y) => Value::Float(x.as_f64() + y.as_f64()),
        }),
    }
}

pub fn sub(a: &Value, b: &Value) -> RtResult<Value> {
    Ok(match operands("sub", a, b)? {
        (Num::Int(x), Num::Int(y)) => Value::Int(x.wrapping_sub(y)),
        (x, y) => Value::Float(x.as_f64() - y.as_f64()),
    })
}

/// `a * b`. A sequence times an int repeats the sequence; a non-positive
/// count gives an empty result. Repeated composite list elements are
/// copied, never aliased.
pub fn mul(a: &Value, b: &Value) -> RtResult<Value> {
    let (sequence, count) = match (a, b) {
        (Value::Str(_) | Value::List(_) | Value::Bytes(_) | Value::ByteArray(_), _) => (a, b),
        (_, Value::Str(_) | Value::List(_) | Value::Bytes(_) | Value::ByteArray(_)) => (b, a),
        _ => {
            return Ok(match operands("mul", a, b)? {
                (Num::Int(x), Num::Int(y)) => Value::Int(x.wrapping_mul(y)),
                (x, y) => Value::Float(x.as_f64() * y.as_f64()),
            });
        }
    };
    let count = match Num::of(count) {
        Some(Num::Int(n)) => repeat_count("mul", n)?,
        _ => return Err(RuntimeError::unsupported_operands("mul", a, b)),
    };
    Ok(match sequence {
        Value::Str(s) => {
            let repeated = repeat_slice("mul", s.as_bytes(), count)?;
            Value::string(String::from_utf8_lossy(&repeated))
        }
        Value::List(list) => Value::List(repeat_items("mul", &list.snapshot(), count)?),
        Value::Bytes(bytes) => Value::Bytes(Bytes::from(repeat_slice("mul", &bytes[..], count)?)),
        Value::ByteArray(bytes) => {
            let repeated = repeat_slice("mul", bytes.borrow().as_slice(), count)?;
            Value::ByteArray(ByteArray::from_vec(repeated))
        }
        _ => return Err(RuntimeError::unsupported_operands("mul", a, b)),
    })
}

pub fn neg(a: &Value) -> RtResult<Value> {
    match Num::of(a) {
        Some(Num::Int(i)) => Ok(Value::Int(i.wrapping_neg())),
        Some(Num::Float(f)) => Ok(Value::Float(-f)),
        None => Err(RuntimeError::type_error(
            "neg",
            format_args!("bad operand kind '{}'", a.kind()),
        )),
    }
}

/// Orders two values. Numbers compare across kinds, strings compare by
/// scalar values, byte strings and lists compare lexicographically.
///
/// Returns `Ok(None)` for unordered floats (NaN).
pub fn compare(a: &Value, b: &Value) -> RtResult<Option<Ordering>> {
    match (a, b) {
        (Value::Str(x), Value::Str(y)) => Ok(Some(x.cmp(y))),
        (Value::Bytes(_) | Value::ByteArray(_), Value::Bytes(_) | Value::ByteArray(_)) => {
            Ok(Some(byte_contents(a).cmp(&byte_contents(b))))
        }
        (Value::List(x), Value::List(y)) => {
            let (xs, ys) = (x.snapshot(), y.snapshot());
            for (l, r) in xs.iter().zip(ys.iter()) {
                if l != r {
                    return compare(l, r);
                }
            }
            Ok(Some(xs.len().cmp(&ys.len())))
        }
        _ => {
            let (x, y) = operands("compare", a, b)?;
            Ok(x.partial_cmp_num(y))
        }
    }
}

/// The smaller operand, preferring `a` on ties and unordered pairs.
pub fn min2(a: &Value, b: &Value) -> RtResult<Value> {
    Ok(match compare(b, a)? {
        Some(Ordering::Less) => b.clone(),
        _ => a.clone(),
    })
}

/// The larger operand, preferring `a` on ties and unordered pairs.
pub fn max2(a: &Value, b: &Value) -> RtResult<Value> {
    Ok(match compare(b, a)? {
        Some(Ordering::Greater) => b.clone(),
        _ => a.clone(),
    })
}

fn byte_contents(value: &Value) -> Vec<u8> {
    value.with_bytes(<[u8]>::to_vec).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;

    fn int(i: i64) -> Value {
        Value::Int(i)
    }

    fn float(f: f64) -> Value {
        Value::Float(f)
    }

    #[test]
    fn int_floor_division_rounds_down() {
        assert_eq!(floordiv(&int(7), &int(2)).unwrap(), int(3));
        assert_eq!(floordiv(&int(-7), &int(2)).unwrap(), int(-4));
        assert_eq!(floordiv(&int(7), &int(-2)).unwrap(), int(-4));
        assert_eq!(floordiv(&int(-7), &int(-2)).unwrap(), int(3));
        assert_eq!(modulo(&int(-7), &int(2)).unwrap(), int(1));
        assert_eq!(modulo(&int(7), &int(-2)).unwrap(), int(-1));
        assert_eq!(modulo(&int(-6), &int(3)).unwrap(), int(0));
    }

    #[test]
    fn min_over_minus_one_wraps() {
        assert_eq!(floordiv_i64(i64::MIN, -1).unwrap(), i64::MIN);
        assert_eq!(mod_i64(i64::MIN, -1).unwrap(), 0);
    }

    #[test]
    fn float_floor_division() {
        assert_eq!(floordiv(&float(7.5), &int(2)).unwrap(), float(3.0));
        assert_eq!(floordiv(&float(-7.5), &int(2)).unwrap(), float(-4.0));
        assert_eq!(modulo(&float(-7.5), &int(2)).unwrap(), float(0.5));
        assert_eq!(modulo(&float(7.5), &float(-2.0)).unwrap(), float(-0.5));
        assert_eq!(mod_f64(-0.0, 5.0).unwrap().to_bits(), 0.0_f64.to_bits());
        assert_eq!(floordiv_f64(1.0, 0.1).unwrap(), 9.0);
    }

    #[test]
    fn zero_divisor_raises_for_every_kind() {
        for (a, b) in [
            (int(1), int(0)),
            (float(1.0), int(0)),
            (int(1), float(0.0)),
            (float(1.0), float(-0.0)),
            (int(1), Value::Bool(false)),
        ] {
            assert_eq!(floordiv(&a, &b).unwrap_err().name(), "DivisionByZero");
            assert_eq!(modulo(&a, &b).unwrap_err().name(), "DivisionByZero");
            assert_eq!(truediv(&a, &b).unwrap_err().name(), "DivisionByZero");
        }
        assert!(floordiv_f64(1.0, 0.0).is_err());
        assert!(mod_i64(1, 0).is_err());
    }

    #[test]
    fn division_error_message() {
        let err = modulo(&float(2.5), &int(0)).unwrap_err();
        assert_snapshot!(err, @"ZeroDivisionError: mod: 2.5 (float) divided by 0 (int)");
    }

    #[test]
    fn non_numeric_operands_raise_type_error() {
        let err = floordiv(&Value::from("a"), &int(1)).unwrap_err();
        assert_eq!(err.name(), "TypeError");
        assert_snapshot!(err, @"TypeError: floordiv: unsupported operand kinds 'str' and 'int' ('a' and 1)");
        assert!(sub(&Value::Nil, &int(1)).is_err());
        assert!(neg(&Value::from("x")).is_err());
    }

    #[test]
    fn addition_promotes_and_concatenates() {
        assert_eq!(add(&int(1), &float(0.5)).unwrap(), float(1.5));
        assert_eq!(add(&int(i64::MAX), &int(1)).unwrap(), int(i64::MIN));
        assert_eq!(add(&Value::Bool(true), &int(1)).unwrap(), int(2));
        assert_eq!(
            add(&Value::from("ab"), &Value::from("c")).unwrap(),
            Value::from("abc")
        );
        let left = Value::list([int(1)]);
        let joined = add(&left, &Value::list([int(2)])).unwrap();
        assert_eq!(joined, Value::list([int(1), int(2)]));
        assert!(!joined.same_object(&left));

        let mixed = add(
            &Value::ByteArray(ByteArray::from_vec(vec![1])),
            &Value::Bytes(Bytes::from(vec![2])),
        )
        .unwrap();
        assert_eq!(mixed.kind(), crate::value::Kind::ByteArray);
        assert_eq!(mixed, Value::Bytes(Bytes::from(vec![1, 2])));
    }

    #[test]
    fn sequence_repetition() {
        assert_eq!(mul(&Value::from("ab"), &int(3)).unwrap(), Value::from("ababab"));
        assert_eq!(mul(&int(2), &Value::from("x")).unwrap(), Value::from("xx"));
        assert_eq!(mul(&Value::from("ab"), &int(-1)).unwrap(), Value::from(""));
        assert_eq!(
            mul(&Value::list([int(0)]), &int(3)).unwrap(),
            Value::from(vec![0_i64, 0, 0])
        );
        assert!(mul(&Value::from("ab"), &float(2.0)).is_err());
        assert_eq!(mul(&int(6), &int(7)).unwrap(), int(42));
    }

    #[test]
    fn huge_repetition_raises_memory_error() {
        let huge = int(i64::MAX);
        for sequence in [
            Value::from("ab"),
            Value::from(vec![1_i64]),
            Value::Bytes(Bytes::from(vec![1_u8])),
            Value::ByteArray(ByteArray::from_vec(vec![1])),
        ] {
            let err = mul(&sequence, &huge).unwrap_err();
            assert_eq!(err.name(), "MemoryError", "{sequence:?}");
        }
        // Nothing to repeat, so nothing to allocate.
        assert_eq!(mul(&Value::from(""), &huge).unwrap(), Value::from(""));
        assert_eq!(mul(&Value::list([]), &huge).unwrap(), Value::list([]));
    }

    #[test]
    fn repeated_rows_are_independent() {
        let rows = mul(&Value::list([Value::list([int(0)])]), &int(2)).unwrap();
        let items = rows.as_list().unwrap().snapshot();
        items[0].as_list().unwrap().set(0, int(1));
        assert_eq!(items[1].as_list().unwrap().get(0), Some(int(0)));
    }

    #[test]
    fn truediv_always_floats() {
        assert_eq!(truediv(&int(7), &int(2)).unwrap(), float(3.5));
        assert_eq!(truediv(&int(4), &int(2)).unwrap().kind(), crate::value::Kind::Float);
    }

    #[test]
    fn comparison_and_extrema() {
        assert_eq!(compare(&int(1), &float(1.5)).unwrap(), Some(Ordering::Less));
        assert_eq!(compare(&float(f64::NAN), &int(1)).unwrap(), None);
        assert_eq!(
            compare(&Value::from("b"), &Value::from("a")).unwrap(),
            Some(Ordering::Greater)
        );
        assert_eq!(
            compare(&Value::list([int(1), int(2)]), &Value::list([int(1)])).unwrap(),
            Some(Ordering::Greater)
        );
        assert!(compare(&Value::from("a"), &int(1)).is_err());

        assert_eq!(min2(&int(3), &float(2.5)).unwrap(), float(2.5));
        assert_eq!(max2(&int(3), &float(2.5)).unwrap(), int(3));
        // ties keep the first operand
        assert_eq!(min2(&int(1), &float(1.0)).unwrap().kind(), crate::value::Kind::Int);
        assert_eq!(max2(&float(1.0), &int(1)).unwrap().kind(), crate::value::Kind::Float);
    }

    #[test]
    fn exact_int_float_ordering() {
        let big = (1_i64 << 53) + 1;
        assert_eq!(cmp_int_float(big, (1_i64 << 53) as f64), Some(Ordering::Greater));
        assert_eq!(cmp_int_float(i64::MAX, I64_BOUND), Some(Ordering::Less));
        assert_eq!(cmp_int_float(-1, -0.5), Some(Ordering::Less));
        assert_eq!(cmp_int_float(0, -0.5), Some(Ordering::Greater));
        assert_eq!(cmp_int_float(0, 0.5), Some(Ordering::Less));
    }
}
