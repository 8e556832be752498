/// Defines the `Value` type, the universal supertype of everything a script can hold, and the
/// `ScriptValue` contract that every list element type must satisfy.
///
/// A `ScriptValue` can be wrapped up into a `Value` and recovered from one by a checked cast,
/// can be written to and read from a Dump primitive, and reports its runtime type name.
use std::fmt;

use num_traits::ToPrimitive;

use crate::containers::SliceableContainer;
use crate::dump::{DumpContext, Primitive};
use crate::error::{err_cast, RuntimeError};
use crate::list::{convert_items, ErasedList, List, ListValue};
use crate::listsuffix;
use crate::suffix::SuffixTable;

/// The capability set shared by every runtime value
pub trait ScriptValue: Clone + PartialEq + fmt::Display + fmt::Debug + 'static {
    /// The type name reported as the expected type when a cast to `Self` fails
    const KIND: &'static str;

    /// Runtime type name of this instance
    fn type_name(&self) -> &'static str {
        Self::KIND
    }

    fn is_read_only(&self) -> bool {
        false
    }

    /// Wrap this value up as the universal supertype
    fn to_value(&self) -> Value;

    /// Recover `Self` from the universal supertype
    fn from_value(value: Value) -> Result<Self, RuntimeError>;

    /// Encode as a native primitive or nested Dump
    fn to_primitive(&self) -> Result<Primitive, RuntimeError> {
        self.to_value().to_primitive()
    }

    /// Decode from a native primitive or nested Dump
    fn from_primitive(context: &DumpContext, primitive: &Primitive) -> Result<Self, RuntimeError> {
        Self::from_value(Value::from_primitive(context, primitive)?)
    }

    /// Wrap a list of `Self` up as a `Value` that still refers to the same instance
    fn erase_list(list: &ListValue<Self>) -> Value {
        Value::TypedList(ErasedList::new(list))
    }

    /// Convert a root list into a new list of `Self`, casting each item
    fn recover_list(list: &List) -> Result<ListValue<Self>, RuntimeError> {
        list.access_slice(|items| convert_items(items.iter().cloned(), Self::from_value))
    }

    /// Add type specific entries on top of the generic list suffix table
    fn extend_list_suffixes(_table: &mut SuffixTable<ListValue<Self>>) {}
}

/// A dynamically typed script value
#[derive(Clone)]
pub enum Value {
    Nil,
    Boolean(bool),
    Int(i64),
    Double(f64),
    Text(String),
    List(List),
    TypedList(ErasedList),
}

impl Value {
    pub fn text(s: &str) -> Value {
        Value::Text(String::from(s))
    }

    pub fn is_nil(&self) -> bool {
        match self {
            Value::Nil => true,
            _ => false,
        }
    }
}

/// `Value` displays its canonical text form, the one used when joining
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{}", n),
            Value::Text(s) => write!(f, "{}", s),
            Value::List(l) => fmt::Display::fmt(l, f),
            Value::TypedList(l) => fmt::Display::fmt(l, f),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::Boolean(b) => write!(f, "{}", b),
            Value::Int(n) => write!(f, "{}", n),
            Value::Double(n) => write!(f, "{:?}", n),
            Value::Text(s) => write!(f, "{:?}", s),
            Value::List(l) => fmt::Debug::fmt(l, f),
            Value::TypedList(l) => fmt::Debug::fmt(l, f),
        }
    }
}

/// True only if the double holds exactly the integer's value
fn int_equals_double(int: i64, double: f64) -> bool {
    double.fract() == 0.0 && double.to_i64() == Some(int)
}

/// Scalars compare by value, lists by identity
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Boolean(a), Value::Boolean(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Double(a), Value::Double(b)) => a == b,
            (Value::Int(a), Value::Double(b)) | (Value::Double(b), Value::Int(a)) => {
                int_equals_double(*a, *b)
            }
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::TypedList(a), Value::TypedList(b)) => a == b,
            _ => false,
        }
    }
}

impl ScriptValue for Value {
    const KIND: &'static str = "Structure";

    fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Boolean(_) => bool::KIND,
            Value::Int(_) => i64::KIND,
            Value::Double(_) => f64::KIND,
            Value::Text(_) => String::KIND,
            Value::List(_) | Value::TypedList(_) => List::KIND,
        }
    }

    fn is_read_only(&self) -> bool {
        match self {
            Value::List(l) => l.is_read_only(),
            Value::TypedList(l) => l.is_read_only(),
            _ => false,
        }
    }

    fn to_value(&self) -> Value {
        self.clone()
    }

    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        Ok(value)
    }

    fn to_primitive(&self) -> Result<Primitive, RuntimeError> {
        Ok(match self {
            Value::Nil => Primitive::Nil,
            Value::Boolean(b) => Primitive::Boolean(*b),
            Value::Int(n) => Primitive::Int(*n),
            Value::Double(n) => Primitive::Double(*n),
            Value::Text(s) => Primitive::String(s.clone()),
            Value::List(l) => Primitive::Dump(Box::new(l.dump()?)),
            Value::TypedList(l) => Primitive::Dump(Box::new(l.dump()?)),
        })
    }

    fn from_primitive(context: &DumpContext, primitive: &Primitive) -> Result<Self, RuntimeError> {
        Ok(match primitive {
            Primitive::Nil => Value::Nil,
            Primitive::Boolean(b) => Value::Boolean(*b),
            Primitive::Int(n) => Value::Int(*n),
            Primitive::Double(n) => Value::Double(*n),
            Primitive::String(s) => Value::Text(s.clone()),
            Primitive::Sequence(items) => Value::List(convert_items(items.iter(), |item| {
                Value::from_primitive(context, item)
            })?),
            Primitive::Dump(dump) => context.restore(dump)?,
        })
    }

    fn erase_list(list: &List) -> Value {
        Value::List(list.clone())
    }

    fn recover_list(list: &List) -> Result<List, RuntimeError> {
        Ok(list.clone())
    }

    fn extend_list_suffixes(table: &mut SuffixTable<List>) {
        listsuffix::install_root(table);
    }
}

impl ScriptValue for i64 {
    const KIND: &'static str = "Int";

    fn to_value(&self) -> Value {
        Value::Int(*self)
    }

    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        match value {
            Value::Int(n) => Ok(n),
            other => Err(err_cast(Self::KIND, other.type_name())),
        }
    }
}

impl ScriptValue for f64 {
    const KIND: &'static str = "Double";

    fn to_value(&self) -> Value {
        Value::Double(*self)
    }

    /// Integers widen to doubles
    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        match value {
            Value::Double(n) => Ok(n),
            Value::Int(n) => Ok(n as f64),
            other => Err(err_cast(Self::KIND, other.type_name())),
        }
    }
}

impl ScriptValue for bool {
    const KIND: &'static str = "Boolean";

    fn to_value(&self) -> Value {
        Value::Boolean(*self)
    }

    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        match value {
            Value::Boolean(b) => Ok(b),
            other => Err(err_cast(Self::KIND, other.type_name())),
        }
    }
}

impl ScriptValue for String {
    const KIND: &'static str = "String";

    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }

    fn from_value(value: Value) -> Result<Self, RuntimeError> {
        match value {
            Value::Text(s) => Ok(s),
            other => Err(err_cast(Self::KIND, other.type_name())),
        }
    }
}
