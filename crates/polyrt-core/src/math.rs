//! `abs` and the `math` module functions generated programs call.
//!
//! Arguments may be any numeric kind. Results outside a function's domain
//! raise `ValueError`; results too large to represent raise `OverflowError`.

use crate::coerce::to_float;
use crate::error::{RtResult, RuntimeError};
use crate::numeric::I64_BOUND;
use crate::value::Value;

fn real_arg(op: &'static str, value: &Value) -> RtResult<f64> {
    match value {
        Value::Bool(_) | Value::Int(_) | Value::Float(_) => Ok(to_float(value)),
        other => Err(RuntimeError::type_error(
            op,
            format_args!("must be real number, not '{}'", other.kind()),
        )),
    }
}

/// Applies `f`, raising `ValueError` when a non-NaN argument gives NaN and
/// `OverflowError` when a finite argument gives an infinity.
fn real_fn(op: &'static str, value: &Value, f: fn(f64) -> f64) -> RtResult<Value> {
    let x = real_arg(op, value)?;
    let y = f(x);
    if y.is_nan() && !x.is_nan() {
        return Err(RuntimeError::value_error(op, "math domain error", value));
    }
    if y.is_infinite() && x.is_finite() {
        return Err(RuntimeError::overflow(op, "math range error", value));
    }
    Ok(Value::Float(y))
}

/// `abs(value)`. Ints keep their kind and wrap at 64 bits, so
/// `abs(i64::MIN)` is `i64::MIN`.
pub fn abs(value: &Value) -> RtResult<Value> {
    match value {
        Value::Bool(b) => Ok(Value::Int(i64::from(*b))),
        Value::Int(i) => Ok(Value::Int(i.wrapping_abs())),
        Value::Float(f) => Ok(Value::Float(f.abs())),
        other => Err(RuntimeError::type_error(
            "abs",
            format_args!("bad operand kind for abs(): '{}'", other.kind()),
        )),
    }
}

pub fn sqrt(value: &Value) -> RtResult<Value> {
    real_fn("sqrt", value, f64::sqrt)
}

pub fn sin(value: &Value) -> RtResult<Value> {
    real_fn("sin", value, f64::sin)
}

pub fn cos(value: &Value) -> RtResult<Value> {
    real_fn("cos", value, f64::cos)
}

pub fn exp(value: &Value) -> RtResult<Value> {
    real_fn("exp", value, f64::exp)
}

/// `math.floor(value)` as an `Int`.
///
/// Infinities and floats beyond the 64-bit range raise `OverflowError`,
/// NaN raises `ValueError`.
pub fn floor(value: &Value) -> RtResult<Value> {
    let x = match value {
        Value::Int(i) => return Ok(Value::Int(*i)),
        other => real_arg("floor", other)?,
    };
    if x.is_nan() {
        return Err(RuntimeError::value_error(
            "floor",
            "cannot convert float NaN to integer",
            value,
        ));
    }
    let floored = x.floor();
    if !(-I64_BOUND..I64_BOUND).contains(&floored) {
        return Err(RuntimeError::overflow(
            "floor",
            "float does not fit a 64-bit integer",
            value,
        ));
    }
    Ok(Value::Int(floored as i64))
}
