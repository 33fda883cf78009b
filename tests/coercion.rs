use std::sync::Arc;

use chrono::{TimeZone, Utc};

use beanpath::coerce::coerce;
use beanpath::{map, BeanError, Callable, Object, Record, Resource, TypeKind, Value};

fn ok(value: impl Into<Value>, kind: TypeKind) -> Value {
    coerce(value.into(), &kind).unwrap()
}

fn fails(value: impl Into<Value>, kind: TypeKind) -> BeanError {
    coerce(value.into(), &kind).unwrap_err()
}

#[derive(Debug)]
struct Greeter;

impl Object for Greeter {
    fn class_name(&self) -> &str {
        "Greeter"
    }
    fn to_text(&self) -> Option<String> {
        Some("hello".to_string())
    }
    fn has_method(&self, method: &str) -> bool {
        method == "greet"
    }
    fn call_method(&self, _method: &str, args: &[Value]) -> beanpath::Result<Value> {
        Ok(Value::from(format!("hello {}", args.len())))
    }
}

#[test]
fn bool_accepts_canonical_forms_only() {
    assert_eq!(ok(true, TypeKind::Bool), Value::Bool(true));
    assert_eq!(ok(1, TypeKind::Bool), Value::Bool(true));
    assert_eq!(ok(1.0, TypeKind::Bool), Value::Bool(true));
    assert_eq!(ok("1", TypeKind::Bool), Value::Bool(true));
    assert_eq!(ok("Yes", TypeKind::Bool), Value::Bool(true));
    assert_eq!(ok("ON", TypeKind::Bool), Value::Bool(true));
    assert_eq!(ok("true", TypeKind::Bool), Value::Bool(true));
    assert_eq!(ok(0, TypeKind::Bool), Value::Bool(false));
    assert_eq!(ok("0", TypeKind::Bool), Value::Bool(false));
    assert_eq!(ok("", TypeKind::Bool), Value::Bool(false));
    assert_eq!(ok(" ", TypeKind::Bool), Value::Bool(false));
    assert_eq!(ok("off", TypeKind::Bool), Value::Bool(false));
    assert_eq!(ok(Value::Null, TypeKind::Bool), Value::Bool(false));

    for value in [Value::from("foo"), Value::from("NULL"), Value::from(-1), Value::from(1.01), Value::List(vec![])] {
        let err = coerce(value, &TypeKind::Bool).unwrap_err();
        assert!(matches!(err, BeanError::InvalidValue { .. }));
    }
}

#[test]
fn int_truncates_numbers_and_numeric_strings() {
    assert_eq!(ok(10.5, TypeKind::Int), Value::Int(10));
    assert_eq!(ok(-10.5, TypeKind::Int), Value::Int(-10));
    assert_eq!(ok("10", TypeKind::Int), Value::Int(10));
    assert_eq!(ok(" -10 ", TypeKind::Int), Value::Int(-10));
    assert_eq!(ok("1e2", TypeKind::Int), Value::Int(100));
    assert_eq!(ok(".5", TypeKind::Int), Value::Int(0));
    assert_eq!(ok("10.99", TypeKind::Int), Value::Int(10));

    for value in [Value::from("10foo"), Value::from("1,000"), Value::from("foo"), Value::Null, Value::Bool(true)] {
        assert!(matches!(coerce(value, &TypeKind::Int).unwrap_err(), BeanError::InvalidValue { .. }));
    }
    assert!(matches!(fails(f64::NAN, TypeKind::Int), BeanError::InvalidValue { .. }));
}

#[test]
fn float_keeps_fractions_and_drops_thousands_separators() {
    assert_eq!(ok(10, TypeKind::Float), Value::Float(10.0));
    assert_eq!(ok("10.5", TypeKind::Float), Value::Float(10.5));
    assert_eq!(ok("1,000.5", TypeKind::Float), Value::Float(1000.5));
    assert_eq!(ok("1.000", TypeKind::Float), Value::Float(1.0));
    assert_eq!(ok("-.25", TypeKind::Float), Value::Float(-0.25));
    assert_eq!(ok("1e-2", TypeKind::Float), Value::Float(0.01));

    for value in [Value::from("foo"), Value::from("1.5x"), Value::Null, Value::Bool(false)] {
        assert!(matches!(coerce(value, &TypeKind::Float).unwrap_err(), BeanError::InvalidValue { .. }));
    }
}

#[test]
fn string_formats_scalars() {
    assert_eq!(ok(100.99, TypeKind::String), Value::from("100.99"));
    assert_eq!(ok(10.0, TypeKind::String), Value::from("10"));
    assert_eq!(ok(42, TypeKind::String), Value::from("42"));
    assert_eq!(ok(true, TypeKind::String), Value::from("1"));
    assert_eq!(ok(false, TypeKind::String), Value::from(""));
    assert_eq!(ok(Value::Null, TypeKind::String), Value::from(""));
    assert_eq!(ok(" foo ", TypeKind::String), Value::from(" foo "));

    let greeter: Arc<dyn Object> = Arc::new(Greeter);
    assert_eq!(ok(greeter, TypeKind::String), Value::from("hello"));

    assert!(matches!(fails(Value::List(vec![]), TypeKind::String), BeanError::InvalidValue { .. }));
    assert!(matches!(fails(map! { "a" => 1 }, TypeKind::String), BeanError::InvalidValue { .. }));
    let record: Arc<dyn Object> = Arc::new(Record::default());
    assert!(matches!(fails(record, TypeKind::String), BeanError::InvalidValue { .. }));
}

#[test]
fn array_parses_json_and_wraps_scalars() {
    assert_eq!(ok(' '.to_string() + r#"{"foo":"bar"}"# + " ", TypeKind::Array), Value::Map(map! { "foo" => "bar" }));
    assert_eq!(ok("[1, 2]", TypeKind::Array), Value::List(vec![Value::Int(1), Value::Int(2)]));
    assert_eq!(ok("foo", TypeKind::Array), Value::List(vec![Value::from("foo")]));
    assert_eq!(ok("{broken", TypeKind::Array), Value::List(vec![Value::from("{broken")]));
    assert_eq!(ok(Value::Null, TypeKind::Array), Value::List(vec![]));
    assert_eq!(ok(true, TypeKind::Array), Value::List(vec![Value::Bool(true)]));
    assert_eq!(ok(map! { "a" => 1 }, TypeKind::Array), Value::Map(map! { "a" => 1 }));

    let record: Arc<dyn Object> = Arc::new(Record::new(map! { "name" => "Bak" }));
    assert_eq!(ok(record, TypeKind::Array), Value::Map(map! { "name" => "Bak" }));
}

#[test]
fn iterable_rejects_scalars() {
    assert_eq!(ok(vec![Value::Int(1)], TypeKind::Iterable), Value::List(vec![Value::Int(1)]));
    let record: Arc<dyn Object> = Arc::new(Record::new(map! { "a" => 1 }));
    assert_eq!(ok(record, TypeKind::Iterable), Value::Map(map! { "a" => 1 }));
    for value in [Value::from("foo"), Value::Int(1), Value::Null] {
        assert!(matches!(coerce(value, &TypeKind::Iterable).unwrap_err(), BeanError::InvalidValue { .. }));
    }
}

#[test]
fn date_accepts_epochs_and_the_fixed_format() {
    let expected = Utc.with_ymd_and_hms(2020, 1, 2, 3, 4, 5).unwrap();
    assert_eq!(ok("2020-01-02 03:04:05", TypeKind::DateTime), Value::DateTime(expected));
    assert_eq!(ok(expected.timestamp(), TypeKind::DateTime), Value::DateTime(expected));
    assert_eq!(ok(expected.timestamp().to_string(), TypeKind::DateTime), Value::DateTime(expected));
    assert_eq!(ok(expected, TypeKind::DateTime), Value::DateTime(expected));

    for value in [Value::from("yesterday"), Value::from("2020-01-02"), Value::Null, Value::Bool(true)] {
        assert!(matches!(coerce(value, &TypeKind::DateTime).unwrap_err(), BeanError::InvalidValue { .. }));
    }
}

#[test]
fn object_turns_maps_into_records() {
    let value = ok(map! { "foo" => "bar" }, TypeKind::Object);
    let object = value.as_object().expect("object");
    assert_eq!(object.class_name(), "Record");
    assert_eq!(object.properties(), Some(&map! { "foo" => "bar" }));

    let listed = ok(vec![Value::from("a")], TypeKind::Object);
    assert_eq!(listed.as_object().and_then(|o| o.properties()), Some(&map! { "0" => "a" }));

    for value in [Value::Null, Value::Bool(true), Value::from("foo"), Value::Int(1)] {
        assert!(matches!(coerce(value, &TypeKind::Object).unwrap_err(), BeanError::InvalidValue { .. }));
    }
}

#[test]
fn class_constraints_check_instances() {
    let record: Arc<dyn Object> = Arc::new(Record::default());
    let value = Value::Object(record);
    assert_eq!(ok(value.clone(), TypeKind::parse("record")), value);

    let err = fails(value, TypeKind::parse("Greeter"));
    assert_eq!(err.to_string(), "Value is not an instance of 'Greeter'!");
    assert!(matches!(fails("foo", TypeKind::parse("Record")), BeanError::TypeMismatch { .. }));
}

#[test]
fn resource_opens_existing_files() {
    let path = "test_beanpath_resource.txt";
    std::fs::write(path, "content").expect("write temp file");
    let value = ok(path, TypeKind::Resource);
    assert!(matches!(value, Value::Resource(_)));
    let again = ok(value.clone(), TypeKind::Resource);
    assert_eq!(again, value);
    let _ = std::fs::remove_file(path);

    let handle = Resource::from_file(std::fs::File::open("Cargo.toml").expect("open manifest"));
    assert!(matches!(ok(handle, TypeKind::Resource), Value::Resource(_)));
    assert!(matches!(fails("foo", TypeKind::Resource), BeanError::InvalidValue { .. }));
    assert!(matches!(fails(Value::Null, TypeKind::Resource), BeanError::InvalidValue { .. }));
}

#[test]
fn callable_accepts_closures_and_receiver_pairs() {
    let callable = Callable::new(|args| Ok(Value::Int(args.len() as i64)));
    let value = ok(callable, TypeKind::Callable);
    let called = value.as_callable().expect("callable").call(&[Value::Null]).unwrap();
    assert_eq!(called, Value::Int(1));

    let greeter: Arc<dyn Object> = Arc::new(Greeter);
    let pair = vec![Value::Object(greeter.clone()), Value::from("greet")];
    let method = ok(pair, TypeKind::Callable);
    let called = method.as_callable().expect("callable").call(&[]).unwrap();
    assert_eq!(called, Value::from("hello 0"));

    let unknown = vec![Value::Object(greeter), Value::from("wave")];
    assert!(matches!(fails(unknown, TypeKind::Callable), BeanError::InvalidValue { .. }));
    assert!(matches!(fails("foo", TypeKind::Callable), BeanError::InvalidValue { .. }));
}
