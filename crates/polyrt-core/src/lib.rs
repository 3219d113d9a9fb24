//! Runtime compatibility layer for polyrt-generated programs.
//!
//! Every code generation target links the same primitives so that a program
//! behaves identically wherever it runs: truthiness, conversions, subscripts
//! with negative wraparound, floor division, container factories and the
//! canonical text forms of values.
//!
//! Everything here is single threaded. Shared containers are `Rc<RefCell<_>>`
//! handles and are neither `Send` nor `Sync`.

pub mod bytes;
pub mod classify;
pub mod clock;
pub mod coerce;
pub mod config;
pub mod error;
pub mod factory;
pub mod format;
pub mod frame;
pub mod index;
pub mod list;
pub mod map;
pub mod math;
pub mod numeric;
mod text;
pub mod value;

pub use bytes::{ByteArray, Bytes};
pub use classify::{chr, isalnum, isalpha, isdigit, isspace, ord};
pub use clock::{Clock, MonotonicClock, perf_counter};
pub use coerce::{to_float, to_int, to_str, truthy};
pub use config::{IndexPolicy, RuntimeConfig};
pub use error::{RtResult, RuntimeError, RuntimeErrorKind};
pub use factory::{
    bytearray, bytearray_from, bytes, enumerate, list_repeat, range, range_list,
};
pub use format::{float_repr, print, print_to, repr, stringify};
pub use frame::{Channels, FrameShape, check_frame, check_palette, grayscale_palette};
pub use index::{
    checked_get_index, checked_get_item, checked_set_index, checked_set_item, contains,
    get_index, get_index_with, get_item, len, normalize_index, set_index, set_index_with,
    set_item, slice,
};
pub use list::List;
pub use map::{Key, Map};
pub use math::abs;
pub use numeric::{
    add, compare, floordiv, floordiv_f64, floordiv_i64, max2, min2, mod_f64, mod_i64, modulo,
    mul, neg, sub, truediv,
};
pub use value::{Kind, Value};
