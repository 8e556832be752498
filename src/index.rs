/// Index resolution for script-facing indexed access.
///
/// Negative indices count back from the end of a collection: `-1` is the last item. The offset
/// is applied once, before bounds checking, so bounds errors always report the resolved index.
use num_traits::ToPrimitive;

use crate::error::{err_bounds, err_cast, RuntimeError};
use crate::value::{ScriptValue, Value};

/// Anything that can be used as a raw, unresolved index
pub trait IntoIndex {
    fn into_index(self) -> Result<i64, RuntimeError>;
}

macro_rules! native_into_index {
    ($T:ty, $name:expr) => {
        impl IntoIndex for $T {
            fn into_index(self) -> Result<i64, RuntimeError> {
                self.to_i64().ok_or_else(|| err_cast(i64::KIND, $name))
            }
        }
    };
}

native_into_index!(i32, "i32");
native_into_index!(i64, "i64");
native_into_index!(isize, "isize");
native_into_index!(u32, "u32");
native_into_index!(u64, "u64");
native_into_index!(usize, "usize");

/// Only integer scalars index. A Double is numeric but still rejected, and the cast error
/// names it as such, distinct from non-numeric values.
impl<'a> IntoIndex for &'a Value {
    fn into_index(self) -> Result<i64, RuntimeError> {
        match self {
            Value::Int(n) => Ok(*n),
            other => Err(err_cast(i64::KIND, other.type_name())),
        }
    }
}

impl IntoIndex for Value {
    fn into_index(self) -> Result<i64, RuntimeError> {
        (&self).into_index()
    }
}

/// Translate a negative index by adding `count`, exactly once
pub fn resolve(raw: i64, count: usize) -> i64 {
    if raw < 0 {
        raw + count as i64
    } else {
        raw
    }
}

/// Resolve and bounds-check an index that must address an existing item
pub fn item_index(raw: i64, count: usize) -> Result<usize, RuntimeError> {
    let index = resolve(raw, count);
    if index < 0 || index >= count as i64 {
        Err(err_bounds(index, count))
    } else {
        Ok(index as usize)
    }
}

/// Resolve and bounds-check an insertion point, which may equal `count`
pub fn insertion_index(raw: i64, count: usize) -> Result<usize, RuntimeError> {
    let index = resolve(raw, count);
    if index < 0 || index > count as i64 {
        Err(err_bounds(index, count))
    } else {
        Ok(index as usize)
    }
}
