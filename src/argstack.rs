/// The argument stack a call site pushes its arguments onto.
///
/// A caller pushes a marker, then each argument in call order. The callee pops back to the
/// marker, receiving the arguments in reverse, and restores call order.
use crate::error::{ErrorKind, RuntimeError};
use crate::list::{convert_items, ListValue};
use crate::value::{ScriptValue, Value};

pub enum StackEntry {
    Marker,
    Value(Value),
}

#[derive(Default)]
pub struct ArgStack {
    entries: Vec<StackEntry>,
}

impl ArgStack {
    pub fn new() -> ArgStack {
        ArgStack {
            entries: Vec::new(),
        }
    }

    /// Mark the start of an argument list
    pub fn push_marker(&mut self) {
        self.entries.push(StackEntry::Marker);
    }

    pub fn push(&mut self, value: Value) {
        self.entries.push(StackEntry::Value(value));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pop everything down to and including the nearest marker, returning the values in the
    /// order they were pushed
    pub fn pop_args(&mut self) -> Result<Vec<Value>, RuntimeError> {
        let mut args = Vec::new();

        loop {
            match self.entries.pop() {
                Some(StackEntry::Value(value)) => args.push(value),
                Some(StackEntry::Marker) => break,
                None => return Err(RuntimeError::new(ErrorKind::MissingArgMarker)),
            }
        }

        args.reverse();
        Ok(args)
    }
}

impl<T: ScriptValue> ListValue<T> {
    /// Build a list from the arguments of the innermost call on the stack
    pub fn from_arg_stack(stack: &mut ArgStack) -> Result<ListValue<T>, RuntimeError> {
        convert_items(stack.pop_args()?, T::from_value)
    }
}
