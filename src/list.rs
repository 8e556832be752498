/// The ordered collection value:
///
///  ListValue<T>  a list whose elements are all of one `ScriptValue` type
///  List = ListValue<Value>, the root list that can contain a mixed sequence of any value
///
/// A `ListValue` is a shared reference to its contents: cloning a `ListValue` yields the same
/// instance, `copy()` yields a new one.
use std::any::Any;
use std::cell::{Cell, RefCell, RefMut};
use std::fmt;
use std::ops::Add;
use std::rc::Rc;

use itertools::join;

use crate::containers::{
    Container, ContainerFromSlice, IndexedContainer, SearchableContainer, SliceableContainer,
};
use crate::dump::{Dump, Primitive};
use crate::error::{err_cast, err_read_only, ErrorKind, RuntimeError};
use crate::index::{insertion_index, item_index, IntoIndex};
use crate::listsuffix;
use crate::suffix::SuffixTable;
use crate::value::{ScriptValue, Value};

/// A List can contain a mixed sequence of any type of value
pub type List = ListValue<Value>;

struct ListInner<T: ScriptValue> {
    items: RefCell<Vec<T>>,
    read_only: Cell<bool>,
    suffixes: SuffixTable<ListValue<T>>,
}

pub struct ListValue<T: ScriptValue> {
    inner: Rc<ListInner<T>>,
}

/// Build a list of `T` from any sequence of `U`, converting each element in turn
pub fn convert_items<U, T, I, F>(source: I, mut convert: F) -> Result<ListValue<T>, RuntimeError>
where
    T: ScriptValue,
    I: IntoIterator<Item = U>,
    F: FnMut(U) -> Result<T, RuntimeError>,
{
    let mut items = Vec::new();
    for item in source {
        items.push(convert(item)?);
    }
    Ok(ListValue::with_vec(items))
}

impl<T: ScriptValue> ListValue<T> {
    fn with_vec(items: Vec<T>) -> ListValue<T> {
        let mut suffixes = SuffixTable::new();
        listsuffix::install(&mut suffixes);
        T::extend_list_suffixes(&mut suffixes);

        ListValue {
            inner: Rc::new(ListInner {
                items: RefCell::new(items),
                read_only: Cell::new(false),
                suffixes,
            }),
        }
    }

    pub fn from_items<I: IntoIterator<Item = T>>(items: I) -> ListValue<T> {
        ListValue::with_vec(items.into_iter().collect())
    }

    /// Fail with `ReadOnlyViolation` if the list is frozen. Every mutation passes through here
    /// before touching its arguments or the contents.
    pub fn check_writable(&self) -> Result<(), RuntimeError> {
        if self.inner.read_only.get() {
            tracing::debug!("rejected mutation of a read-only list");
            return Err(err_read_only());
        }
        Ok(())
    }

    /// Mutable access to the backing sequence, checked for read-only state and for
    /// outstanding slice borrows
    fn items_mut(&self) -> Result<RefMut<Vec<T>>, RuntimeError> {
        self.check_writable()?;

        self.inner
            .items
            .try_borrow_mut()
            .map_err(|_| RuntimeError::new(ErrorKind::MutableBorrowError))
    }

    pub fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.set(read_only);
    }

    /// Return true if both are the same list instance
    pub fn same_instance(&self, other: &ListValue<T>) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Snapshot of the current contents
    pub fn to_vec(&self) -> Vec<T> {
        self.inner.items.borrow().clone()
    }

    /// Append an item to the end of the list
    pub fn add(&self, item: T) -> Result<(), RuntimeError> {
        self.items_mut()?.push(item);
        Ok(())
    }

    /// Append every item in iteration order. The source is gathered before the list is
    /// touched, so the list may be extended from itself.
    pub fn add_range<I: IntoIterator<Item = T>>(&self, items: I) -> Result<(), RuntimeError> {
        self.check_writable()?;

        let items: Vec<T> = items.into_iter().collect();
        self.items_mut()?.extend(items);
        Ok(())
    }

    /// Remove the first item equal to `item`, returning whether one was found
    pub fn remove(&self, item: &T) -> Result<bool, RuntimeError> {
        let mut items = self.items_mut()?;
        match items.iter().position(|candidate| candidate == item) {
            Some(position) => {
                items.remove(position);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove and return the item at the resolved index
    pub fn remove_at<I: IntoIndex>(&self, index: I) -> Result<T, RuntimeError> {
        let raw = index.into_index()?;
        let mut items = self.items_mut()?;
        let index = item_index(raw, items.len())?;
        Ok(items.remove(index))
    }

    /// Insert before the resolved index. An index equal to the count appends.
    pub fn insert<I: IntoIndex>(&self, index: I, item: T) -> Result<(), RuntimeError> {
        let raw = index.into_index()?;
        let mut items = self.items_mut()?;
        let index = insertion_index(raw, items.len())?;
        items.insert(index, item);
        Ok(())
    }

    /// Down-cast a script value to `T` and store it at the resolved index
    pub fn set_value<I: IntoIndex>(&self, index: I, value: Value) -> Result<(), RuntimeError> {
        self.check_writable()?;
        self.set(index, T::from_value(value)?)
    }

    /// The canonical text of each item, separated by `separator`
    pub fn join(&self, separator: &str) -> String {
        self.access_slice(|items| join(items.iter(), separator))
    }

    /// A new list of up to `run_length` items starting at `start`. Out of range bounds give a
    /// shorter or empty list rather than an error.
    pub fn sub_list(&self, start: i64, run_length: i64) -> ListValue<T> {
        self.access_slice(|items| {
            if start < 0 || run_length <= 0 || start as usize >= items.len() {
                return ListValue::new();
            }

            let start = start as usize;
            let end = items.len().min(start.saturating_add(run_length as usize));
            ListValue::from_slice(&items[start..end])
        })
    }

    /// Shallow copy into a new, mutable list
    pub fn copy(&self) -> ListValue<T> {
        self.access_slice(ListValue::from_slice)
    }

    /// A new list holding this list's items followed by `other`'s
    pub fn concat(&self, other: &ListValue<T>) -> ListValue<T> {
        let mut items = self.to_vec();
        items.extend(other.to_vec());
        ListValue::with_vec(items)
    }

    /// Look up a suffix by name and call it with `args`
    pub fn call_suffix(&self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        self.inner.suffixes.call(self, name, args)
    }

    pub fn has_suffix(&self, name: &str) -> bool {
        self.inner.suffixes.lookup(name).is_some()
    }

    pub fn suffix_names(&self) -> Vec<&'static str> {
        self.inner.suffixes.names()
    }
}

impl<T: ScriptValue> Container<T> for ListValue<T> {
    fn new() -> ListValue<T> {
        ListValue::with_vec(Vec::new())
    }

    fn clear(&self) -> Result<(), RuntimeError> {
        self.items_mut()?.clear();
        Ok(())
    }

    fn count(&self) -> usize {
        self.inner.items.borrow().len()
    }
}

impl<T: ScriptValue> IndexedContainer<T> for ListValue<T> {
    fn get<I: IntoIndex>(&self, index: I) -> Result<T, RuntimeError> {
        let raw = index.into_index()?;
        let items = self.inner.items.borrow();
        let index = item_index(raw, items.len())?;
        Ok(items[index].clone())
    }

    fn set<I: IntoIndex>(&self, index: I, item: T) -> Result<(), RuntimeError> {
        let raw = index.into_index()?;
        let mut items = self.items_mut()?;
        let index = item_index(raw, items.len())?;
        items[index] = item;
        Ok(())
    }
}

impl<T: ScriptValue> SearchableContainer<T> for ListValue<T> {
    fn index_of(&self, item: &T) -> i64 {
        self.access_slice(|items| match items.iter().position(|candidate| candidate == item) {
            Some(position) => position as i64,
            None => -1,
        })
    }

    fn last_index_of(&self, item: &T) -> i64 {
        self.access_slice(|items| match items.iter().rposition(|candidate| candidate == item) {
            Some(position) => position as i64,
            None => -1,
        })
    }
}

impl<T: ScriptValue> SliceableContainer<T> for ListValue<T> {
    fn access_slice<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&[T]) -> R,
    {
        let items = self.inner.items.borrow();
        f(&items)
    }
}

impl<T: ScriptValue> ContainerFromSlice<T> for ListValue<T> {
    fn from_slice(data: &[T]) -> ListValue<T> {
        ListValue::with_vec(data.to_vec())
    }
}

impl<T: ScriptValue> Default for ListValue<T> {
    fn default() -> ListValue<T> {
        ListValue::new()
    }
}

/// Cloning shares the instance
impl<T: ScriptValue> Clone for ListValue<T> {
    fn clone(&self) -> ListValue<T> {
        ListValue {
            inner: Rc::clone(&self.inner),
        }
    }
}

/// Lists have reference identity
impl<T: ScriptValue> PartialEq for ListValue<T> {
    fn eq(&self, other: &ListValue<T>) -> bool {
        self.same_instance(other)
    }
}

impl<'a, T: ScriptValue> Add for &'a ListValue<T> {
    type Output = ListValue<T>;

    fn add(self, other: &'a ListValue<T>) -> ListValue<T> {
        self.concat(other)
    }
}

impl<T: ScriptValue> fmt::Display for ListValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.access_slice(|items| write!(f, "[{}]", join(items.iter(), ", ")))
    }
}

impl<T: ScriptValue> fmt::Debug for ListValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.access_slice(|items| {
            let flag = if self.inner.read_only.get() { " (read-only)" } else { "" };
            write!(f, "List{:?}{}", items, flag)
        })
    }
}

impl<T: ScriptValue> ScriptValue for ListValue<T> {
    const KIND: &'static str = "List";

    fn is_read_only(&self) -> bool {
        self.inner.read_only.get()
    }

    fn to_value(&self) -> Value {
        T::erase_list(self)
    }

    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        match value {
            Value::List(list) => T::recover_list(&list),
            Value::TypedList(list) => match list.downcast::<T>() {
                Some(list) => Ok(list),
                None => T::recover_list(&list.to_root()),
            },
            other => Err(err_cast(Self::KIND, other.type_name())),
        }
    }

    fn to_primitive(&self) -> Result<Primitive, RuntimeError> {
        Ok(Primitive::Dump(Box::new(self.dump()?)))
    }
}

/// The element-type independent view of a `ListValue<T>`
trait AnyList: fmt::Display + fmt::Debug {
    fn as_any(&self) -> &dyn Any;

    fn same_list(&self, other: &dyn Any) -> bool;

    fn frozen(&self) -> bool;

    fn to_root(&self) -> List;

    fn to_dump(&self) -> Result<Dump, RuntimeError>;

    fn dispatch(&self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError>;
}

impl<T: ScriptValue> AnyList for ListValue<T> {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn same_list(&self, other: &dyn Any) -> bool {
        match other.downcast_ref::<ListValue<T>>() {
            Some(other) => self.same_instance(other),
            None => false,
        }
    }

    fn frozen(&self) -> bool {
        self.inner.read_only.get()
    }

    fn to_root(&self) -> List {
        self.access_slice(|items| ListValue::from_items(items.iter().map(ScriptValue::to_value)))
    }

    fn to_dump(&self) -> Result<Dump, RuntimeError> {
        self.dump()
    }

    fn dispatch(&self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        self.call_suffix(name, args)
    }
}

/// A typed list held as a `Value`. It refers to the original instance, so identity, contents
/// and the read-only flag are shared with it.
#[derive(Clone)]
pub struct ErasedList {
    list: Rc<dyn AnyList>,
}

impl ErasedList {
    pub fn new<T: ScriptValue>(list: &ListValue<T>) -> ErasedList {
        ErasedList {
            list: Rc::new(list.clone()),
        }
    }

    /// The original list, if its element type is `T`
    pub fn downcast<T: ScriptValue>(&self) -> Option<ListValue<T>> {
        self.list.as_any().downcast_ref::<ListValue<T>>().cloned()
    }

    pub fn same_instance(&self, other: &ErasedList) -> bool {
        self.list.same_list(other.list.as_any())
    }

    pub fn is_read_only(&self) -> bool {
        self.list.frozen()
    }

    /// A new root list holding each item converted to a `Value`
    pub fn to_root(&self) -> List {
        self.list.to_root()
    }

    pub fn dump(&self) -> Result<Dump, RuntimeError> {
        self.list.to_dump()
    }

    pub fn call_suffix(&self, name: &str, args: Vec<Value>) -> Result<Value, RuntimeError> {
        self.list.dispatch(name, args)
    }
}

impl PartialEq for ErasedList {
    fn eq(&self, other: &ErasedList) -> bool {
        self.same_instance(other)
    }
}

impl fmt::Display for ErasedList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Display::fmt(&*self.list, f)
    }
}

impl fmt::Debug for ErasedList {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fmt::Debug::fmt(&*self.list, f)
    }
}
