/// The suffixes every list exposes to scripts.
///
/// Lists passed in or handed back keep their element type: a typed list travels inside a
/// `Value` as the same instance. The root list overrides COPY to return its copy as a plain
/// `Value::List`.
///
/// Mutating suffixes check the read-only flag before casting their arguments.
use crate::containers::{Container, SearchableContainer, SliceableContainer};
use crate::list::{List, ListValue};
use crate::suffix::{SuffixFn, SuffixResult, SuffixTable};
use crate::value::{ScriptValue, Value};

/// Bind the generic list suffixes
pub fn install<T: ScriptValue>(table: &mut SuffixTable<ListValue<T>>) {
    table.add(&["COPY"], SuffixFn::Nullary(copy::<T>));
    table.add(&["ADD"], SuffixFn::Unary(add::<T>));
    table.add(&["ADDRANGE"], SuffixFn::Unary(add_range::<T>));
    table.add(&["INSERT"], SuffixFn::Binary(insert::<T>));
    table.add(&["REMOVE"], SuffixFn::Unary(remove::<T>));
    table.add(&["SUBLIST"], SuffixFn::Binary(sub_list::<T>));
    table.add(&["JOIN"], SuffixFn::Unary(join::<T>));
    table.add(&["INDEXOF", "FIND"], SuffixFn::Unary(index_of::<T>));
    table.add(&["LASTINDEXOF", "FINDLAST"], SuffixFn::Unary(last_index_of::<T>));
    table.add(&["LENGTH"], SuffixFn::Nullary(length::<T>));
    table.add(&["EMPTY"], SuffixFn::Nullary(empty::<T>));
    table.add(&["CONTAINS"], SuffixFn::Unary(contains::<T>));
    table.add(&["CLEAR"], SuffixFn::Nullary(clear::<T>));
}

/// Additional bindings for the root list
pub fn install_root(table: &mut SuffixTable<List>) {
    table.add(&["COPY"], SuffixFn::Nullary(copy_root));
}

fn copy<T: ScriptValue>(list: &ListValue<T>) -> SuffixResult {
    Ok(list.copy().to_value())
}

fn copy_root(list: &List) -> SuffixResult {
    Ok(Value::List(list.copy()))
}

fn add<T: ScriptValue>(list: &ListValue<T>, item: Value) -> SuffixResult {
    list.check_writable()?;
    list.add(T::from_value(item)?)?;
    Ok(Value::Nil)
}

fn add_range<T: ScriptValue>(list: &ListValue<T>, items: Value) -> SuffixResult {
    list.check_writable()?;
    let items = ListValue::<T>::from_value(items)?;
    list.add_range(items.to_vec())?;
    Ok(Value::Nil)
}

fn insert<T: ScriptValue>(list: &ListValue<T>, index: Value, item: Value) -> SuffixResult {
    list.check_writable()?;
    list.insert(index, T::from_value(item)?)?;
    Ok(Value::Nil)
}

/// Removes by index, not by value
fn remove<T: ScriptValue>(list: &ListValue<T>, index: Value) -> SuffixResult {
    list.remove_at(index)?;
    Ok(Value::Nil)
}

fn sub_list<T: ScriptValue>(list: &ListValue<T>, start: Value, run_length: Value) -> SuffixResult {
    let start = i64::from_value(start)?;
    let run_length = i64::from_value(run_length)?;
    Ok(list.sub_list(start, run_length).to_value())
}

fn join<T: ScriptValue>(list: &ListValue<T>, separator: Value) -> SuffixResult {
    let separator = String::from_value(separator)?;
    Ok(Value::Text(list.join(&separator)))
}

fn index_of<T: ScriptValue>(list: &ListValue<T>, item: Value) -> SuffixResult {
    Ok(Value::Int(list.index_of(&T::from_value(item)?)))
}

fn last_index_of<T: ScriptValue>(list: &ListValue<T>, item: Value) -> SuffixResult {
    Ok(Value::Int(list.last_index_of(&T::from_value(item)?)))
}

fn length<T: ScriptValue>(list: &ListValue<T>) -> SuffixResult {
    Ok(Value::Int(list.count() as i64))
}

fn empty<T: ScriptValue>(list: &ListValue<T>) -> SuffixResult {
    Ok(Value::Boolean(list.access_slice(|items| items.is_empty())))
}

/// An item that cannot be an element of this list cannot be contained in it
fn contains<T: ScriptValue>(list: &ListValue<T>, item: Value) -> SuffixResult {
    let found = match T::from_value(item) {
        Ok(item) => list.contains(&item),
        Err(_) => false,
    };
    Ok(Value::Boolean(found))
}

fn clear<T: ScriptValue>(list: &ListValue<T>) -> SuffixResult {
    list.clear()?;
    Ok(Value::Nil)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::containers::{ContainerFromSlice, IndexedContainer};
    use crate::error::ErrorKind;

    fn root(items: &[i64]) -> List {
        List::from_items(items.iter().map(|n| Value::Int(*n)))
    }

    fn kind(result: SuffixResult) -> ErrorKind {
        result.unwrap_err().into_kind()
    }

    #[test]
    fn exposes_the_suffix_surface() {
        let list = root(&[]);
        for name in &[
            "COPY",
            "ADD",
            "ADDRANGE",
            "INSERT",
            "REMOVE",
            "SUBLIST",
            "JOIN",
            "INDEXOF",
            "FIND",
            "LASTINDEXOF",
            "FINDLAST",
            "length",
            "Empty",
        ] {
            assert!(list.has_suffix(name), "missing suffix {}", name);
        }
    }

    #[test]
    fn mutate_through_suffixes() {
        let list = root(&[1]);
        list.call_suffix("add", vec![Value::Int(2)]).unwrap();
        list.call_suffix("ADDRANGE", vec![Value::List(root(&[3, 4]))])
            .unwrap();
        list.call_suffix("Insert", vec![Value::Int(0), Value::text("zero")])
            .unwrap();
        assert_eq!(list.join(","), "zero,1,2,3,4");

        list.call_suffix("REMOVE", vec![Value::Int(-1)]).unwrap();
        assert_eq!(
            list.call_suffix("JOIN", vec![Value::text("-")]),
            Ok(Value::text("zero-1-2-3"))
        );
        assert_eq!(list.call_suffix("LENGTH", vec![]), Ok(Value::Int(4)));

        list.call_suffix("CLEAR", vec![]).unwrap();
        assert_eq!(list.call_suffix("EMPTY", vec![]), Ok(Value::Boolean(true)));
    }

    #[test]
    fn find_aliases() {
        let list = root(&[1, 2, 1]);
        assert_eq!(list.call_suffix("find", vec![Value::Int(1)]), Ok(Value::Int(0)));
        assert_eq!(list.call_suffix("INDEXOF", vec![Value::Int(1)]), Ok(Value::Int(0)));
        assert_eq!(list.call_suffix("FINDLAST", vec![Value::Int(1)]), Ok(Value::Int(2)));
        assert_eq!(
            list.call_suffix("lastindexof", vec![Value::Int(1)]),
            Ok(Value::Int(2))
        );
        assert_eq!(list.call_suffix("FIND", vec![Value::Int(9)]), Ok(Value::Int(-1)));
        assert_eq!(
            list.call_suffix("CONTAINS", vec![Value::Double(2.0)]),
            Ok(Value::Boolean(true))
        );
    }

    #[test]
    fn sub_list_and_copy_return_new_lists() {
        let list = root(&[10, 20, 30, 40]);
        match list.call_suffix("SUBLIST", vec![Value::Int(1), Value::Int(2)]) {
            Ok(Value::List(sub)) => assert_eq!(sub.join(","), "20,30"),
            other => panic!("expected a list, got {:?}", other),
        }

        match list.call_suffix("COPY", vec![]) {
            Ok(Value::List(copy)) => {
                assert!(!copy.same_instance(&list));
                assert_eq!(copy.join(","), "10,20,30,40");
            }
            other => panic!("expected a list, got {:?}", other),
        }
    }

    #[test]
    fn typed_list_casts_arguments() {
        let list: ListValue<i64> = ListValue::from_slice(&[1, 2]);
        list.call_suffix("ADD", vec![Value::Int(3)]).unwrap();
        assert_eq!(list.to_vec(), vec![1, 2, 3]);

        assert_eq!(
            kind(list.call_suffix("ADD", vec![Value::text("x")])),
            ErrorKind::CastError {
                expected: "Int",
                actual: "String"
            }
        );
        assert_eq!(
            list.call_suffix("CONTAINS", vec![Value::text("x")]),
            Ok(Value::Boolean(false))
        );

        match list.call_suffix("copy", vec![]) {
            Ok(Value::TypedList(copy)) => {
                let copy = copy.downcast::<i64>().unwrap();
                assert!(!copy.same_instance(&list));
                assert_eq!(copy.to_vec(), vec![1, 2, 3]);
            }
            other => panic!("expected a typed list, got {:?}", other),
        }
    }

    #[test]
    fn search_finds_nested_typed_lists() {
        let inner: ListValue<i64> = ListValue::from_slice(&[1, 2]);
        let lookalike: ListValue<i64> = ListValue::from_slice(&[1, 2]);
        let outer: ListValue<ListValue<i64>> = ListValue::from_slice(&[inner.clone()]);

        assert_eq!(
            outer.call_suffix("INDEXOF", vec![inner.to_value()]),
            Ok(Value::Int(0))
        );
        assert_eq!(
            outer.call_suffix("CONTAINS", vec![inner.to_value()]),
            Ok(Value::Boolean(true))
        );
        assert_eq!(
            outer.call_suffix("FIND", vec![lookalike.to_value()]),
            Ok(Value::Int(-1))
        );

        outer.call_suffix("ADD", vec![inner.to_value()]).unwrap();
        assert_eq!(
            outer.call_suffix("FINDLAST", vec![inner.to_value()]),
            Ok(Value::Int(1))
        );
        assert!(outer.get(1).unwrap().same_instance(&inner));
    }

    #[test]
    fn dispatch_failures() {
        let list = root(&[1]);
        assert_eq!(
            kind(list.call_suffix("BOGUS", vec![])),
            ErrorKind::UnknownSuffix {
                name: String::from("BOGUS"),
                receiver: "List"
            }
        );
        assert_eq!(
            kind(list.call_suffix("ADD", vec![])),
            ErrorKind::ArityMismatch {
                name: String::from("ADD"),
                expected: 1,
                actual: 0
            }
        );
        assert_eq!(
            kind(list.call_suffix("REMOVE", vec![Value::Double(0.0)])),
            ErrorKind::CastError {
                expected: "Int",
                actual: "Double"
            }
        );
        assert_eq!(
            kind(list.call_suffix("REMOVE", vec![Value::Int(-2)])),
            ErrorKind::IndexOutOfRange { index: -1, count: 1 }
        );
        assert_eq!(
            kind(list.call_suffix("JOIN", vec![Value::Int(1)])),
            ErrorKind::CastError {
                expected: "String",
                actual: "Int"
            }
        );
    }

    #[test]
    fn read_only_through_suffixes() {
        let list = root(&[1, 2]);
        list.set_read_only(true);
        assert_eq!(
            kind(list.call_suffix("ADD", vec![Value::Int(3)])),
            ErrorKind::ReadOnlyViolation
        );
        assert_eq!(
            kind(list.call_suffix("CLEAR", vec![])),
            ErrorKind::ReadOnlyViolation
        );
        assert_eq!(list.call_suffix("JOIN", vec![Value::text("+")]), Ok(Value::text("1+2")));
    }

    #[test]
    fn read_only_is_checked_before_argument_casts() {
        let list: ListValue<i64> = ListValue::from_slice(&[1]);
        list.set_read_only(true);
        assert_eq!(
            kind(list.call_suffix("ADD", vec![Value::text("x")])),
            ErrorKind::ReadOnlyViolation
        );
        assert_eq!(
            kind(list.call_suffix("INSERT", vec![Value::Int(0), Value::text("x")])),
            ErrorKind::ReadOnlyViolation
        );
        assert_eq!(
            kind(list.call_suffix("ADDRANGE", vec![Value::Nil])),
            ErrorKind::ReadOnlyViolation
        );
    }
}
