/// Dumps: a language-agnostic key/value record a value can be saved to and restored from.
///
/// A list is dumped as `{"$type": "LIST", "Items": [...]}`, where each item is a native
/// primitive or, for nested values such as lists, a nested Dump. The type tag lets a
/// `DumpContext` pick the factory that rebuilds the value.
use fnv::FnvHashMap;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::containers::{Container, SliceableContainer};
use crate::error::{err_dump, RuntimeError};
use crate::list::{List, ListValue};
use crate::value::{ScriptValue, Value};

pub const TYPE_KEY: &str = "$type";
pub const ITEMS_KEY: &str = "Items";
pub const LIST_TAG: &str = "LIST";

/// A value in Dump form
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Primitive {
    Nil,
    Boolean(bool),
    Int(i64),
    Double(f64),
    String(String),
    Sequence(Vec<Primitive>),
    Dump(Box<Dump>),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dump {
    #[serde(rename = "$type")]
    type_tag: String,
    #[serde(flatten)]
    entries: IndexMap<String, Primitive>,
}

impl Dump {
    pub fn new(type_tag: &str) -> Dump {
        Dump {
            type_tag: String::from(type_tag),
            entries: IndexMap::new(),
        }
    }

    pub fn type_tag(&self) -> &str {
        &self.type_tag
    }

    pub fn get(&self, key: &str) -> Option<&Primitive> {
        self.entries.get(key)
    }

    pub fn insert(&mut self, key: &str, value: Primitive) {
        self.entries.insert(String::from(key), value);
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// JSON has no representation for infinities or NaN, so a Dump holding one is refused
    /// rather than written out as `null`
    pub fn to_json(&self) -> Result<String, RuntimeError> {
        self.check_finite()?;
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, RuntimeError> {
        self.check_finite()?;
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn check_finite(&self) -> Result<(), RuntimeError> {
        self.entries.values().try_for_each(Primitive::check_finite)
    }

    pub fn from_json(json: &str) -> Result<Dump, RuntimeError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Primitive {
    fn check_finite(&self) -> Result<(), RuntimeError> {
        match self {
            Primitive::Double(n) if !n.is_finite() => Err(err_dump(&format!(
                "non-finite number {} cannot be written as JSON",
                n
            ))),
            Primitive::Sequence(items) => items.iter().try_for_each(Primitive::check_finite),
            Primitive::Dump(dump) => dump.check_finite(),
            _ => Ok(()),
        }
    }
}

/// Rebuilds a value of one type from its Dump
pub type DumpFactory = fn(&DumpContext, &Dump) -> Result<Value, RuntimeError>;

/// Dispatches Dumps to the factory registered for their type tag
pub struct DumpContext {
    factories: FnvHashMap<String, DumpFactory>,
}

impl DumpContext {
    /// A context that knows how to restore lists
    pub fn new() -> DumpContext {
        let mut context = DumpContext {
            factories: FnvHashMap::default(),
        };
        context.register(LIST_TAG, restore_list);
        context
    }

    pub fn register(&mut self, type_tag: &str, factory: DumpFactory) {
        self.factories.insert(String::from(type_tag), factory);
    }

    pub fn restore(&self, dump: &Dump) -> Result<Value, RuntimeError> {
        match self.factories.get(dump.type_tag()) {
            Some(factory) => factory(self, dump),
            None => Err(err_dump(&format!(
                "no factory for type tag '{}'",
                dump.type_tag()
            ))),
        }
    }
}

impl Default for DumpContext {
    fn default() -> DumpContext {
        DumpContext::new()
    }
}

fn restore_list(context: &DumpContext, dump: &Dump) -> Result<Value, RuntimeError> {
    Ok(Value::List(List::create_from_dump(context, dump)?))
}

/// Encode a list, each item by its own primitive encoding
pub fn encode<T: ScriptValue>(list: &ListValue<T>) -> Result<Dump, RuntimeError> {
    let items = list.access_slice(|items| {
        items
            .iter()
            .map(ScriptValue::to_primitive)
            .collect::<Result<Vec<Primitive>, RuntimeError>>()
    })?;

    let mut dump = Dump::new(LIST_TAG);
    dump.insert(ITEMS_KEY, Primitive::Sequence(items));
    Ok(dump)
}

/// Replace the contents of `list` with the items of `dump`, converting each with `convert`.
/// On failure the list holds the items converted so far.
pub fn decode<T, F>(list: &ListValue<T>, dump: &Dump, mut convert: F) -> Result<(), RuntimeError>
where
    T: ScriptValue,
    F: FnMut(&Primitive) -> Result<T, RuntimeError>,
{
    if dump.type_tag() != LIST_TAG {
        return Err(err_dump(&format!(
            "expected type tag '{}', found '{}'",
            LIST_TAG,
            dump.type_tag()
        )));
    }

    let items = match dump.get(ITEMS_KEY) {
        Some(Primitive::Sequence(items)) => items,
        Some(_) => return Err(err_dump("'Items' is not a sequence")),
        None => return Err(err_dump("missing 'Items' key")),
    };

    tracing::debug!(items = items.len(), "restoring list from dump");

    list.clear()?;
    for item in items {
        list.add(convert(item)?)?;
    }

    Ok(())
}

impl<T: ScriptValue> ListValue<T> {
    pub fn dump(&self) -> Result<Dump, RuntimeError> {
        encode(self)
    }

    /// Replace this list's contents from a Dump
    pub fn load_dump(&self, context: &DumpContext, dump: &Dump) -> Result<(), RuntimeError> {
        decode(self, dump, |item| T::from_primitive(context, item))
    }

    /// Reconstruct a list from a Dump
    pub fn create_from_dump(
        context: &DumpContext,
        dump: &Dump,
    ) -> Result<ListValue<T>, RuntimeError> {
        let list = ListValue::new();
        list.load_dump(context, dump)?;
        Ok(list)
    }
}

#[cfg(test)]
mod test {
    use proptest::prelude::*;

    use super::*;
    use crate::containers::{ContainerFromSlice, IndexedContainer};
    use crate::error::ErrorKind;

    fn mixed() -> List {
        let inner = List::from_items(vec![Value::Int(1), Value::text("two")]);
        List::from_items(vec![
            Value::Nil,
            Value::Boolean(false),
            Value::Int(-3),
            Value::Double(2.5),
            Value::text("text"),
            Value::List(inner),
        ])
    }

    #[test]
    fn dump_shape() {
        let list: ListValue<i64> = ListValue::from_slice(&[1, 2]);
        let dump = list.dump().unwrap();
        assert_eq!(dump.type_tag(), LIST_TAG);
        assert_eq!(
            dump.get(ITEMS_KEY),
            Some(&Primitive::Sequence(vec![Primitive::Int(1), Primitive::Int(2)]))
        );
        assert_eq!(dump.to_json().unwrap(), r#"{"$type":"LIST","Items":[1,2]}"#);
    }

    #[test]
    fn round_trip_mixed_and_nested() {
        let context = DumpContext::new();
        let list = mixed();
        let dump = list.dump().unwrap();
        let restored = List::create_from_dump(&context, &dump).unwrap();

        assert_eq!(restored.count(), list.count());
        assert_eq!(format!("{:?}", restored), format!("{:?}", list));
        match restored.get(-1).unwrap() {
            Value::List(inner) => assert_eq!(inner.join(","), "1,two"),
            other => panic!("expected nested list, got {:?}", other),
        }
    }

    #[test]
    fn round_trip_through_json() {
        let context = DumpContext::new();
        let json = mixed().dump().unwrap().to_json().unwrap();
        let dump = Dump::from_json(&json).unwrap();
        let restored = List::create_from_dump(&context, &dump).unwrap();
        assert_eq!(format!("{:?}", restored), format!("{:?}", mixed()));
    }

    #[test]
    fn typed_decode_casts_items() {
        let context = DumpContext::new();
        let dump = Dump::from_json(r#"{"$type":"LIST","Items":[1,"x"]}"#).unwrap();
        assert_eq!(
            *ListValue::<i64>::create_from_dump(&context, &dump)
                .unwrap_err()
                .error_kind(),
            ErrorKind::CastError {
                expected: "Int",
                actual: "String"
            }
        );

        let strings = ListValue::<String>::create_from_dump(
            &context,
            &Dump::from_json(r#"{"$type":"LIST","Items":["a","b"]}"#).unwrap(),
        )
        .unwrap();
        assert_eq!(strings.join("+"), "a+b");
    }

    #[test]
    fn malformed_dumps() {
        let context = DumpContext::new();
        let malformed = |dump: Dump| match List::create_from_dump(&context, &dump) {
            Err(e) => match e.into_kind() {
                ErrorKind::MalformedDump(_) => (),
                other => panic!("unexpected error {:?}", other),
            },
            Ok(list) => panic!("decoded malformed dump into {:?}", list),
        };

        malformed(Dump::new(LIST_TAG));
        malformed(Dump::new("LEXICON"));

        let mut not_a_sequence = Dump::new(LIST_TAG);
        not_a_sequence.insert(ITEMS_KEY, Primitive::Int(1));
        malformed(not_a_sequence);

        assert!(Dump::from_json(r#"{"Items":[]}"#).is_err());
    }

    #[test]
    fn non_finite_doubles_are_not_written_as_json() {
        let doubles: ListValue<f64> = ListValue::from_slice(&[1.0, f64::INFINITY]);
        let dump = doubles.dump().unwrap();
        match dump.to_json().unwrap_err().into_kind() {
            ErrorKind::MalformedDump(_) => (),
            other => panic!("unexpected error {:?}", other),
        }

        let nested = List::from_items(vec![Value::List(List::from_items(vec![Value::Double(
            f64::NAN,
        )]))]);
        assert!(nested.dump().unwrap().to_json_pretty().is_err());
        assert!(ListValue::<f64>::from_slice(&[1.5]).dump().unwrap().to_json().is_ok());
    }

    #[test]
    fn unknown_nested_type_tag() {
        let context = DumpContext::new();
        let mut list_dump = Dump::new(LIST_TAG);
        list_dump.insert(
            ITEMS_KEY,
            Primitive::Sequence(vec![Primitive::Dump(Box::new(Dump::new("VECTOR")))]),
        );
        assert!(List::create_from_dump(&context, &list_dump).is_err());
    }

    #[test]
    fn load_dump_replaces_contents() {
        let context = DumpContext::new();
        let list: ListValue<i64> = ListValue::from_slice(&[9, 9, 9]);
        let dump = ListValue::<i64>::from_slice(&[1]).dump().unwrap();
        list.load_dump(&context, &dump).unwrap();
        assert_eq!(list.to_vec(), vec![1]);

        list.set_read_only(true);
        assert!(list.load_dump(&context, &dump).is_err());
    }

    proptest! {
        #[test]
        fn int_lists_round_trip(items in prop::collection::vec(any::<i64>(), 0..32)) {
            let context = DumpContext::new();
            let list = ListValue::from_slice(&items);
            let restored = ListValue::<i64>::create_from_dump(&context, &list.dump().unwrap()).unwrap();
            prop_assert_eq!(restored.to_vec(), items);
        }

        #[test]
        fn text_lists_round_trip_through_json(items in prop::collection::vec(".*", 0..16)) {
            let context = DumpContext::new();
            let list: ListValue<String> = ListValue::from_slice(&items);
            let dump = Dump::from_json(&list.dump().unwrap().to_json().unwrap()).unwrap();
            let restored = ListValue::<String>::create_from_dump(&context, &dump).unwrap();
            prop_assert_eq!(restored.to_vec(), items);
        }
    }
}
