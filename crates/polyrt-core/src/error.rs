//! Errors raised by runtime operations.
//!
//! Only conditions that unwind to the generated caller are represented here.
//! Out-of-range reads and writes and unparsable numeric strings are handled
//! in place by their operations and never produce a `RuntimeError`.

use derive_more::{Display, From};

use crate::format::repr;
use crate::value::{Kind, Value};

/// Longest operand rendering kept in an error message.
const OPERAND_REPR_LIMIT: usize = 64;

pub type RtResult<T> = Result<T, RuntimeError>;

#[derive(Display, Debug, From)]
#[display("{kind}")]
pub struct RuntimeError {
    #[from]
    kind: Box<RuntimeErrorKind>,
}

impl<E> From<E> for RuntimeError
where
    RuntimeErrorKind: From<E>,
{
    fn from(error: E) -> Self {
        RuntimeError {
            kind: Box::new(RuntimeErrorKind::from(error)),
        }
    }
}

impl RuntimeError {
    pub fn kind(&self) -> &RuntimeErrorKind {
        &self.kind
    }

    /// Stable name of the error kind, as used by conformance suites.
    pub fn name(&self) -> &'static str {
        self.kind.name()
    }

    pub(crate) fn division_by_zero(op: &'static str, lhs: &Value, rhs: &Value) -> Self {
        RuntimeErrorKind::DivisionByZero {
            op,
            lhs: Operand::of(lhs),
            rhs: Operand::of(rhs),
        }
        .into()
    }

    pub fn type_error(op: &'static str, message: impl std::fmt::Display) -> Self {
        RuntimeErrorKind::TypeError {
            op,
            message: message.to_string(),
        }
        .into()
    }

    pub(crate) fn unsupported_operands(op: &'static str, lhs: &Value, rhs: &Value) -> Self {
        Self::type_error(
            op,
            format_args!(
                "unsupported operand kinds '{}' and '{}' ({} and {})",
                lhs.kind(),
                rhs.kind(),
                Operand::of(lhs).repr,
                Operand::of(rhs).repr,
            ),
        )
    }

    pub fn value_error(
        op: &'static str,
        message: impl std::fmt::Display,
        operand: &Value,
    ) -> Self {
        RuntimeErrorKind::ValueError {
            op,
            message: message.to_string(),
            operand: Operand::of(operand),
        }
        .into()
    }

    pub(crate) fn index_error(op: &'static str, index: i64, len: usize, kind: Kind) -> Self {
        RuntimeErrorKind::IndexError {
            op,
            index,
            len,
            kind,
        }
        .into()
    }

    pub(crate) fn key_error(op: &'static str, key: &Value) -> Self {
        RuntimeErrorKind::KeyError {
            op,
            key: Operand::of(key),
        }
        .into()
    }

    pub(crate) fn overflow(
        op: &'static str,
        message: impl std::fmt::Display,
        operand: &Value,
    ) -> Self {
        RuntimeErrorKind::OverflowError {
            op,
            message: message.to_string(),
            operand: Operand::of(operand),
        }
        .into()
    }

    /// A result of `requested` elements that cannot be allocated.
    pub(crate) fn memory(op: &'static str, requested: u128) -> Self {
        RuntimeErrorKind::MemoryError { op, requested }.into()
    }

    pub(crate) fn io(op: &'static str, error: std::io::Error) -> Self {
        RuntimeErrorKind::Io { op, error }.into()
    }
}

#[derive(Display, Debug)]
pub enum RuntimeErrorKind {
    #[display("ZeroDivisionError: {op}: {lhs} divided by {rhs}")]
    DivisionByZero {
        op: &'static str,
        lhs: Operand,
        rhs: Operand,
    },

    #[display("ValueError: {op}: {message}, got {operand}")]
    ValueError {
        op: &'static str,
        message: String,
        operand: Operand,
    },

    #[display("TypeError: {op}: {message}")]
    TypeError { op: &'static str, message: String },

    #[display("IndexError: {op}: index {index} out of range for '{kind}' of length {len}")]
    IndexError {
        op: &'static str,
        index: i64,
        len: usize,
        kind: Kind,
    },

    #[display("KeyError: {op}: {key}")]
    KeyError { op: &'static str, key: Operand },

    #[display("OverflowError: {op}: {message}, got {operand}")]
    OverflowError {
        op: &'static str,
        message: String,
        operand: Operand,
    },

    #[display("MemoryError: {op}: cannot allocate {requested} elements")]
    MemoryError { op: &'static str, requested: u128 },

    #[display("OSError: {op}: {error}")]
    Io {
        op: &'static str,
        error: std::io::Error,
    },
}

impl RuntimeErrorKind {
    pub fn name(&self) -> &'static str {
        match self {
            RuntimeErrorKind::DivisionByZero { .. } => "DivisionByZero",
            RuntimeErrorKind::ValueError { .. } => "ValueError",
            RuntimeErrorKind::TypeError { .. } => "TypeError",
            RuntimeErrorKind::IndexError { .. } => "IndexError",
            RuntimeErrorKind::KeyError { .. } => "KeyError",
            RuntimeErrorKind::OverflowError { .. } => "OverflowError",
            RuntimeErrorKind::MemoryError { .. } => "MemoryError",
            RuntimeErrorKind::Io { .. } => "Io",
        }
    }

    /// The operation that raised.
    pub fn op(&self) -> &'static str {
        match self {
            RuntimeErrorKind::DivisionByZero { op, .. }
            | RuntimeErrorKind::ValueError { op, .. }
            | RuntimeErrorKind::TypeError { op, .. }
            | RuntimeErrorKind::IndexError { op, .. }
            | RuntimeErrorKind::KeyError { op, .. }
            | RuntimeErrorKind::OverflowError { op, .. }
            | RuntimeErrorKind::MemoryError { op, .. }
            | RuntimeErrorKind::Io { op, .. } => op,
        }
    }
}

impl std::error::Error for RuntimeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &*self.kind {
            RuntimeErrorKind::Io { error, .. } => Some(error),
            _ => None,
        }
    }
}

/// An offending value as it appears in an error message.
#[derive(Display, Debug, Clone, PartialEq)]
#[display("{repr} ({kind})")]
pub struct Operand {
    pub repr: String,
    pub kind: Kind,
}

impl Operand {
    pub fn of(value: &Value) -> Self {
        let mut repr = repr(value);
        if repr.chars().count() > OPERAND_REPR_LIMIT {
            repr = repr.chars().take(OPERAND_REPR_LIMIT).collect();
            repr.push_str("...");
        }
        Operand {
            repr,
            kind: value.kind(),
        }
    }
}
