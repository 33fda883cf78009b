use std::sync::Arc;

use beanpath::container::{classify, keys_of, value_at};
use beanpath::{map, Bean, ContainerKind, Indexed, Object, Record, Value};

// A list-like host object that also exposes its length as a property.
#[derive(Debug)]
struct Shelf {
    items: Vec<Value>,
    properties: beanpath::Map,
}

impl Shelf {
    fn new(items: Vec<Value>) -> Self {
        let properties = map! { "length" => items.len() as i64 };
        Self { items, properties }
    }
}

impl Indexed for Shelf {
    fn exists_at(&self, index: i64) -> bool {
        self.items.exists_at(index)
    }
    fn get_at(&self, index: i64) -> Option<Value> {
        self.items.get_at(index)
    }
}

impl Object for Shelf {
    fn class_name(&self) -> &str {
        "Shelf"
    }
    fn as_indexed(&self) -> Option<&dyn Indexed> {
        Some(self)
    }
    fn properties(&self) -> Option<&beanpath::Map> {
        Some(&self.properties)
    }
}

#[derive(Debug)]
struct Opaque;

impl Object for Opaque {
    fn class_name(&self) -> &str {
        "Opaque"
    }
}

fn object(o: impl Object + 'static) -> Value {
    let o: Arc<dyn Object> = Arc::new(o);
    Value::Object(o)
}

#[test]
fn every_value_has_exactly_one_kind() {
    let mut bean = Bean::new();
    bean.set_data("a", 1).unwrap();
    assert_eq!(classify(&Value::List(vec![])), ContainerKind::Indexed);
    assert_eq!(classify(&object(Shelf::new(vec![]))), ContainerKind::Indexed);
    assert_eq!(classify(&Value::from(bean)), ContainerKind::Keyed);
    assert_eq!(classify(&object(Record::default())), ContainerKind::PlainObject);
    assert_eq!(classify(&Value::Map(map! {})), ContainerKind::PlainMap);
    assert_eq!(classify(&object(Opaque)), ContainerKind::Scalar);
    assert_eq!(classify(&Value::from("foo")), ContainerKind::Scalar);
    assert_eq!(classify(&Value::Null), ContainerKind::Scalar);
}

#[test]
fn keys_come_in_natural_order() {
    let plain = Value::Map(map! { "b" => 1, "a" => 2 });
    assert_eq!(keys_of(&plain), vec!["b", "a"]);

    let record = object(Record::new(map! { "z" => 1, "y" => 2 }));
    assert_eq!(keys_of(&record), vec!["z", "y"]);

    let mut bean = Bean::new();
    bean.set_data("Second", 2).unwrap();
    bean.set_data("first", 1).unwrap();
    assert_eq!(keys_of(&Value::from(bean)), vec!["second", "first"]);

    assert!(keys_of(&Value::List(vec![Value::Int(1)])).is_empty(), "lists are not enumerable");
    assert!(keys_of(&Value::from(42)).is_empty());
}

#[test]
fn lookups_distinguish_null_from_absent() {
    let plain = Value::Map(map! { "present" => Value::Null, "one" => 1 });
    assert_eq!(value_at(&plain, "present"), Some(Value::Null));
    assert_eq!(value_at(&plain, "one"), Some(Value::Int(1)));
    assert_eq!(value_at(&plain, "absent"), None);

    let list = Value::List(vec![Value::from("a"), Value::from("b")]);
    assert_eq!(value_at(&list, "1"), Some(Value::from("b")));
    assert_eq!(value_at(&list, "2"), None);
    assert_eq!(value_at(&list, "-1"), None);
    assert_eq!(value_at(&list, "first"), None);

    assert_eq!(value_at(&Value::from("scalar"), "0"), None);
    assert_eq!(value_at(&object(Opaque), "anything"), None);
}

#[test]
fn indexed_objects_fall_back_to_properties_for_names() {
    let shelf = object(Shelf::new(vec![Value::from("book")]));
    assert_eq!(value_at(&shelf, "0"), Some(Value::from("book")));
    assert_eq!(value_at(&shelf, "1"), None);
    assert_eq!(value_at(&shelf, "length"), Some(Value::Int(1)));
}

#[test]
fn beans_are_read_through_their_data_names() {
    let mut bean = Bean::new();
    bean.set_data("Name", "Bak").unwrap();
    let nested = Value::from(bean);
    assert_eq!(value_at(&nested, "name"), Some(Value::from("Bak")));
    assert_eq!(value_at(&nested, "NAME"), Some(Value::from("Bak")));
    assert_eq!(value_at(&nested, "missing"), None);
}

#[test]
fn record_properties_are_borrowed() {
    let record = Record::new(map! { "a" => 1 });
    let first: *const beanpath::Map = record.properties().expect("properties");
    let second: *const beanpath::Map = record.properties().expect("properties");
    assert!(std::ptr::eq(first, second), "every lookup reads the same map");

    let value = object(record);
    assert_eq!(value_at(&value, "a"), Some(Value::Int(1)));
    assert_eq!(keys_of(&value), vec!["a"]);
}
