/// Name based dispatch of script-visible operations ("suffixes").
///
/// A `SuffixTable` maps case-insensitive names to operations taking 0, 1 or 2 arguments. The
/// receiver is passed to each operation explicitly, so a table can be built once per receiver
/// without the receiver and table referring to each other.
use fnv::FnvHashMap;

use crate::error::{err_arity, err_unknown_suffix, RuntimeError};
use crate::value::{ScriptValue, Value};

pub type SuffixResult = Result<Value, RuntimeError>;

/// An operation tagged with its argument count
pub enum SuffixFn<R> {
    Nullary(fn(&R) -> SuffixResult),
    Unary(fn(&R, Value) -> SuffixResult),
    Binary(fn(&R, Value, Value) -> SuffixResult),
}

impl<R> SuffixFn<R> {
    /// Number of arguments the operation must be called with
    pub fn arity(&self) -> usize {
        match self {
            SuffixFn::Nullary(_) => 0,
            SuffixFn::Unary(_) => 1,
            SuffixFn::Binary(_) => 2,
        }
    }
}

impl<R> Clone for SuffixFn<R> {
    fn clone(&self) -> SuffixFn<R> {
        *self
    }
}

impl<R> Copy for SuffixFn<R> {}

pub struct Suffix<R> {
    name: &'static str,
    op: SuffixFn<R>,
}

impl<R> Suffix<R> {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.op.arity()
    }
}

pub struct SuffixTable<R> {
    entries: FnvHashMap<String, Suffix<R>>,
}

impl<R: ScriptValue> SuffixTable<R> {
    pub fn new() -> SuffixTable<R> {
        SuffixTable {
            entries: FnvHashMap::default(),
        }
    }

    /// Bind `op` under each of `names`. An existing entry under the same name is replaced,
    /// which is how a specialised type overrides a generic operation.
    pub fn add(&mut self, names: &[&'static str], op: SuffixFn<R>) {
        for &name in names {
            self.entries.insert(name.to_uppercase(), Suffix { name, op });
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&Suffix<R>> {
        self.entries.get(&name.to_uppercase())
    }

    /// All bound names, aliases included, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.entries.values().map(Suffix::name).collect();
        names.sort_unstable();
        names
    }

    /// Look up `name` and call it on `receiver` after checking the argument count
    pub fn call(&self, receiver: &R, name: &str, args: Vec<Value>) -> SuffixResult {
        let suffix = self
            .lookup(name)
            .ok_or_else(|| err_unknown_suffix(name, receiver.type_name()))?;

        let arity = suffix.arity();
        let count = args.len();
        if count != arity {
            return Err(err_arity(name, arity, count));
        }

        tracing::trace!(
            suffix = suffix.name,
            receiver = receiver.type_name(),
            arity,
            "calling suffix"
        );

        let mut args = args.into_iter();
        match (suffix.op, args.next(), args.next()) {
            (SuffixFn::Nullary(op), None, None) => op(receiver),
            (SuffixFn::Unary(op), Some(a), None) => op(receiver, a),
            (SuffixFn::Binary(op), Some(a), Some(b)) => op(receiver, a, b),
            _ => Err(err_arity(name, arity, count)),
        }
    }
}

impl<R: ScriptValue> Default for SuffixTable<R> {
    fn default() -> SuffixTable<R> {
        SuffixTable::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ErrorKind;

    fn type_of(receiver: &Value) -> SuffixResult {
        Ok(Value::text(receiver.type_name()))
    }

    fn equals(receiver: &Value, other: Value) -> SuffixResult {
        Ok(Value::Boolean(*receiver == other))
    }

    fn table() -> SuffixTable<Value> {
        let mut table = SuffixTable::new();
        table.add(&["TYPENAME", "KIND"], SuffixFn::Nullary(type_of));
        table.add(&["EQUALS"], SuffixFn::Unary(equals));
        table
    }

    #[test]
    fn names_are_case_insensitive() {
        let table = table();
        let receiver = Value::Int(3);
        assert_eq!(table.call(&receiver, "typeName", vec![]), Ok(Value::text("Int")));
        assert_eq!(table.call(&receiver, "kind", vec![]), Ok(Value::text("Int")));
        assert_eq!(
            table.call(&receiver, "Equals", vec![Value::Double(3.0)]),
            Ok(Value::Boolean(true))
        );
        assert_eq!(table.names(), vec!["EQUALS", "KIND", "TYPENAME"]);
    }

    #[test]
    fn unknown_name_and_wrong_arity() {
        let table = table();
        let receiver = Value::Nil;
        assert_eq!(
            *table.call(&receiver, "BOGUS", vec![]).unwrap_err().error_kind(),
            ErrorKind::UnknownSuffix {
                name: String::from("BOGUS"),
                receiver: "Nil"
            }
        );
        assert_eq!(
            *table.call(&receiver, "equals", vec![]).unwrap_err().error_kind(),
            ErrorKind::ArityMismatch {
                name: String::from("equals"),
                expected: 1,
                actual: 0
            }
        );
    }

    #[test]
    fn later_binding_replaces_earlier() {
        let mut table = table();
        table.add(&["kind"], SuffixFn::Nullary(|_| Ok(Value::Nil)));
        assert_eq!(table.call(&Value::Int(1), "KIND", vec![]), Ok(Value::Nil));
        assert_eq!(table.lookup("kind").map(Suffix::arity), Some(0));
    }
}
