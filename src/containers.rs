/// Container traits
use crate::error::RuntimeError;
use crate::index::IntoIndex;
use crate::value::ScriptValue;

/// Base container-type trait. All container types are subtypes of `Container`.
///
/// All container operations follow interior mutability rules: a container is shared by
/// reference and every mutation goes through `&self`. Mutations are rejected, leaving the
/// contents untouched, if the container is read-only.
pub trait Container<T: ScriptValue>: Sized {
    /// Create a new, empty container instance.
    fn new() -> Self;

    /// Reset the size of the container to zero - empty
    fn clear(&self) -> Result<(), RuntimeError>;

    /// Count of items in the container
    fn count(&self) -> usize;
}

/// Generic indexed-access trait. Indices may be negative, counting back from the end.
pub trait IndexedContainer<T: ScriptValue>: Container<T> {
    /// Return a copy of the object at the given index. Bounds-checked.
    fn get<I: IntoIndex>(&self, index: I) -> Result<T, RuntimeError>;

    /// Move an object into the container at the given index. Bounds-checked.
    fn set<I: IntoIndex>(&self, index: I, item: T) -> Result<(), RuntimeError>;
}

/// Search by element equality
pub trait SearchableContainer<T: ScriptValue>: Container<T> {
    /// Position of the first item equal to `item`, or -1
    fn index_of(&self, item: &T) -> i64;

    /// Position of the last item equal to `item`, or -1
    fn last_index_of(&self, item: &T) -> i64;

    fn contains(&self, item: &T) -> bool {
        self.index_of(item) != -1
    }
}

/// A trait that is implemented for containers that can represent their contents as a slice.
pub trait SliceableContainer<T: ScriptValue>: Container<T> {
    /// Access the interior of the container as a slice for the duration of the closure call.
    ///
    /// The container may not be modified while the slice is held; attempts to do so fail with
    /// a `MutableBorrowError`.
    fn access_slice<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R;
}

/// Create a container holding copies of the values in the slice
pub trait ContainerFromSlice<T: ScriptValue>: Container<T> {
    fn from_slice(data: &[T]) -> Self;
}
