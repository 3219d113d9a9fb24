//! Runtime value representation.
//!
//! `Value` is the closed set of kinds a generated program can observe.
//! Scalars (`Nil`, `Bool`, `Int`, `Float`, `Str`, `Bytes`) behave as plain
//! data: cloning never aliases. `List`, `Map` and `ByteArray` are shared
//! handles, so cloning a `Value` that holds one of them yields a second
//! reference to the same storage and mutations are visible through both.

use std::collections::HashMap;
use std::rc::Rc;

use derive_more::Display;

use crate::bytes::{ByteArray, Bytes};
use crate::list::List;
use crate::map::Map;
use crate::numeric::Num;

/// Discriminant of a [`Value`], displayed with the source-language type name.
#[derive(Display, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    #[display("NoneType")]
    Nil,
    #[display("bool")]
    Bool,
    #[display("int")]
    Int,
    #[display("float")]
    Float,
    #[display("str")]
    Str,
    #[display("list")]
    List,
    #[display("dict")]
    Map,
    #[display("bytearray")]
    ByteArray,
    #[display("bytes")]
    Bytes,
}

impl Kind {
    /// Mutable container kinds passed by shared reference.
    pub fn is_composite(self) -> bool {
        matches!(self, Kind::List | Kind::Map | Kind::ByteArray)
    }
}

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(Rc<str>),
    List(List),
    Map(Map),
    ByteArray(ByteArray),
    Bytes(Bytes),
}

impl Value {
    pub fn string(text: impl Into<Rc<str>>) -> Self {
        Value::Str(text.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Self {
        Value::List(items.into_iter().collect())
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Nil => Kind::Nil,
            Value::Bool(_) => Kind::Bool,
            Value::Int(_) => Kind::Int,
            Value::Float(_) => Kind::Float,
            Value::Str(_) => Kind::Str,
            Value::List(_) => Kind::List,
            Value::Map(_) => Kind::Map,
            Value::ByteArray(_) => Kind::ByteArray,
            Value::Bytes(_) => Kind::Bytes,
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(list) => Some(list),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Map> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_bytearray(&self) -> Option<&ByteArray> {
        match self {
            Value::ByteArray(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Value::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Runs `f` over the byte contents of a `Bytes` or `ByteArray`.
    pub fn with_bytes<R>(&self, f: impl FnOnce(&[u8]) -> R) -> Option<R> {
        match self {
            Value::ByteArray(bytes) => Some(f(&bytes.borrow())),
            Value::Bytes(bytes) => Some(f(bytes)),
            _ => None,
        }
    }

    /// Identity comparison (`is`).
    ///
    /// Composite values are identical only when they share storage; scalars
    /// are identical when they have the same kind and payload.
    pub fn same_object(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => a.ptr_eq(b),
            (Value::Map(a), Value::Map(b)) => a.ptr_eq(b),
            (Value::ByteArray(a), Value::ByteArray(b)) => a.ptr_eq(b),
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            _ => self.kind() == other.kind() && self == other,
        }
    }

    /// Element comparison used by containers: identity first, then `==`.
    ///
    /// A list holding NaN therefore still equals a copy of itself.
    pub fn is_or_eq(&self, other: &Value) -> bool {
        self.same_object(other) || self == other
    }

    /// Recursively copies every composite reachable from this value.
    ///
    /// Sharing and cycles inside the copied structure are preserved, but
    /// nothing in the result aliases the source value.
    pub fn deep_copy(&self) -> Value {
        self.deep_copy_with(&mut HashMap::new())
    }

    fn deep_copy_with(&self, memo: &mut HashMap<usize, Value>) -> Value {
        match self {
            Value::List(list) => {
                if let Some(copy) = memo.get(&list.addr()) {
                    return copy.clone();
                }
                let copy = List::new();
                memo.insert(list.addr(), Value::List(copy.clone()));
                let items: Vec<Value> = list
                    .snapshot()
                    .iter()
                    .map(|item| item.deep_copy_with(memo))
                    .collect();
                copy.extend(items);
                Value::List(copy)
            }
            Value::Map(map) => {
                if let Some(copy) = memo.get(&map.addr()) {
                    return copy.clone();
                }
                let copy = Map::new();
                memo.insert(map.addr(), Value::Map(copy.clone()));
                for (key, value) in map.items() {
                    copy.insert(key, value.deep_copy_with(memo));
                }
                Value::Map(copy)
            }
            Value::ByteArray(bytes) => Value::ByteArray(ByteArray::from_vec(bytes.snapshot())),
            scalar => scalar.clone(),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (
                Value::ByteArray(_) | Value::Bytes(_),
                Value::ByteArray(_) | Value::Bytes(_),
            ) => self
                .with_bytes(|a| other.with_bytes(|b| a == b))
                .flatten()
                .unwrap_or(false),
            _ => match (Num::of(self), Num::of(other)) {
                (Some(a), Some(b)) => a.num_eq(b),
                _ => false,
            },
        }
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i.into())
    }
}

impl From<u8> for Value {
    fn from(b: u8) -> Self {
        Value::Int(b.into())
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Str(c.to_string().into())
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s.into())
    }
}

impl From<Rc<str>> for Value {
    fn from(s: Rc<str>) -> Self {
        Value::Str(s)
    }
}

impl From<List> for Value {
    fn from(list: List) -> Self {
        Value::List(list)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Map(map)
    }
}

impl From<ByteArray> for Value {
    fn from(bytes: ByteArray) -> Self {
        Value::ByteArray(bytes)
    }
}

impl From<Bytes> for Value {
    fn from(bytes: Bytes) -> Self {
        Value::Bytes(bytes)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(List::from_vec(items))
    }
}

impl From<Vec<i64>> for Value {
    fn from(items: Vec<i64>) -> Self {
        Value::list(items.into_iter().map(Value::Int))
    }
}
