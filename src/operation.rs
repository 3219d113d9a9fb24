//! Runtime primitives addressable from a conformance case.

use std::cmp::Ordering;
use std::ops::RangeInclusive;

use derive_more::Display;
use polyrt_core::factory::items;
use polyrt_core::math;
use polyrt_core::{
    IndexPolicy, RtResult, RuntimeError, Value, abs, add, bytearray, bytearray_from, bytes,
    checked_get_item, chr, compare, contains, enumerate, floordiv, get_index_with, get_item,
    isalnum, isalpha, isdigit, isspace, len, list_repeat, max2, min2, modulo, mul, neg, ord,
    print_to, range_list, repr, set_index_with, slice, stringify, sub, to_float, to_int, to_str,
    truediv, truthy,
};
use serde::Deserialize;

#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    #[display("truthy")]
    Truthy,
    #[display("to_int")]
    ToInt,
    #[display("to_float")]
    ToFloat,
    #[display("to_str")]
    ToStr,
    #[display("get_index")]
    GetIndex,
    #[display("get_item")]
    GetItem,
    #[display("set_index")]
    SetIndex,
    #[display("slice")]
    Slice,
    #[display("floordiv")]
    Floordiv,
    #[display("mod")]
    Mod,
    #[display("add")]
    Add,
    #[display("sub")]
    Sub,
    #[display("mul")]
    Mul,
    #[display("truediv")]
    Truediv,
    #[display("neg")]
    Neg,
    #[display("compare")]
    Compare,
    #[display("bytearray")]
    Bytearray,
    #[display("bytes")]
    Bytes,
    #[display("list_repeat")]
    ListRepeat,
    #[display("range")]
    Range,
    #[display("enumerate")]
    Enumerate,
    #[display("isdigit")]
    Isdigit,
    #[display("isalpha")]
    Isalpha,
    #[display("isspace")]
    Isspace,
    #[display("isalnum")]
    Isalnum,
    #[display("ord")]
    Ord,
    #[display("chr")]
    Chr,
    #[display("len")]
    Len,
    #[display("contains")]
    Contains,
    #[display("stringify")]
    Stringify,
    #[display("repr")]
    Repr,
    #[display("min")]
    Min,
    #[display("max")]
    Max,
    #[display("print")]
    Print,
    #[display("abs")]
    Abs,
    #[display("sqrt")]
    Sqrt,
    #[display("sin")]
    Sin,
    #[display("cos")]
    Cos,
    #[display("exp")]
    Exp,
    #[display("floor")]
    Floor,
}

impl Operation {
    /// Accepted argument counts.
    pub fn arity(self) -> RangeInclusive<usize> {
        use Operation::*;
        match self {
            Truthy | ToInt | ToFloat | ToStr | Neg | Bytearray | Bytes | Enumerate | Isdigit
            | Isalpha | Isspace | Isalnum | Ord | Chr | Len | Stringify | Repr | Abs | Sqrt
            | Sin | Cos | Exp | Floor => 1..=1,
            GetIndex | GetItem | Floordiv | Mod | Add | Sub | Mul | Truediv | Compare
            | ListRepeat | Contains => 2..=2,
            SetIndex => 3..=3,
            Slice | Range => 1..=3,
            Min | Max => 1..=usize::MAX,
            Print => 0..=usize::MAX,
        }
    }

    /// Calls the primitive. `args` must satisfy [`Operation::arity`].
    pub fn apply(self, args: &[Value], policy: IndexPolicy) -> RtResult<Value> {
        let arg = |i: usize| args.get(i).cloned().unwrap_or_default();
        let (a, b) = (arg(0), arg(1));
        Ok(match self {
            Operation::Truthy => Value::Bool(truthy(&a)),
            Operation::ToInt => Value::Int(to_int(&a)),
            Operation::ToFloat => Value::Float(to_float(&a)),
            Operation::ToStr => Value::from(to_str(&a)),
            Operation::GetIndex => get_index_with(policy, &a, to_int(&b))?,
            Operation::GetItem => match policy {
                IndexPolicy::Lenient => get_item(&a, &b),
                IndexPolicy::Strict => checked_get_item(&a, &b)?,
            },
            Operation::SetIndex => {
                set_index_with(policy, &a, to_int(&b), arg(2))?;
                a
            }
            Operation::Slice => {
                let bound = |v: Value| (!v.is_nil()).then(|| to_int(&v));
                slice(&a, bound(b), bound(arg(2)))
            }
            Operation::Floordiv => floordiv(&a, &b)?,
            Operation::Mod => modulo(&a, &b)?,
            Operation::Add => add(&a, &b)?,
            Operation::Sub => sub(&a, &b)?,
            Operation::Mul => mul(&a, &b)?,
            Operation::Truediv => truediv(&a, &b)?,
            Operation::Neg => neg(&a)?,
            Operation::Compare => match compare(&a, &b)? {
                Some(Ordering::Less) => Value::Int(-1),
                Some(Ordering::Equal) => Value::Int(0),
                Some(Ordering::Greater) => Value::Int(1),
                None => Value::Nil,
            },
            Operation::Bytearray => match a {
                Value::Int(n) => Value::ByteArray(bytearray(n)?),
                _ => Value::ByteArray(bytearray_from(&a)?),
            },
            Operation::Bytes => Value::Bytes(bytes(&a)?),
            Operation::ListRepeat => Value::List(list_repeat(&a, to_int(&b))?),
            Operation::Range => {
                let bounds: Vec<i64> = args.iter().map(to_int).collect();
                match bounds.as_slice() {
                    [stop] => range_list(0, *stop, 1)?,
                    [start, stop] => range_list(*start, *stop, 1)?,
                    [start, stop, step, ..] => range_list(*start, *stop, *step)?,
                    [] => Value::list([]),
                }
            }
            Operation::Enumerate => Value::list(
                enumerate(&a)
                    .into_iter()
                    .map(|(i, item)| Value::list([Value::Int(i), item])),
            ),
            Operation::Isdigit => Value::Bool(isdigit(expect_str("isdigit", &a)?)),
            Operation::Isalpha => Value::Bool(isalpha(expect_str("isalpha", &a)?)),
            Operation::Isspace => Value::Bool(isspace(expect_str("isspace", &a)?)),
            Operation::Isalnum => Value::Bool(isalnum(expect_str("isalnum", &a)?)),
            Operation::Ord => Value::Int(ord(&a)?),
            Operation::Chr => chr(to_int(&a))?,
            Operation::Len => Value::Int(len(&a)?),
            Operation::Contains => Value::Bool(contains(&a, &b)?),
            Operation::Stringify => Value::from(stringify(&a)),
            Operation::Repr => Value::from(repr(&a)),
            Operation::Min => extremum("min", args, min2)?,
            Operation::Max => extremum("max", args, max2)?,
            Operation::Print => {
                let mut out = Vec::new();
                print_to(&mut out, args)?;
                let text = String::from_utf8_lossy(&out);
                Value::from(text.trim_end_matches('\n'))
            }
            Operation::Abs => abs(&a)?,
            Operation::Sqrt => math::sqrt(&a)?,
            Operation::Sin => math::sin(&a)?,
            Operation::Cos => math::cos(&a)?,
            Operation::Exp => math::exp(&a)?,
            Operation::Floor => math::floor(&a)?,
        })
    }
}

fn expect_str<'a>(op: &'static str, value: &'a Value) -> RtResult<&'a str> {
    value.as_str().ok_or_else(|| {
        RuntimeError::type_error(
            op,
            format_args!("descriptor requires a 'str' object but received '{}'", value.kind()),
        )
    })
}

/// `min`/`max` over the arguments, or over the items of a single argument.
fn extremum(
    op: &'static str,
    args: &[Value],
    pick: fn(&Value, &Value) -> RtResult<Value>,
) -> RtResult<Value> {
    let candidates = match args {
        [single] => items(single),
        _ => args.to_vec(),
    };
    let mut candidates = candidates.into_iter();
    let first = candidates.next().ok_or_else(|| {
        RuntimeError::value_error(op, "arg is an empty sequence", &Value::list([]))
    })?;
    candidates.try_fold(first, |best, next| pick(&best, &next))
}
