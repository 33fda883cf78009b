//! The dynamic value model carried by beans.
//!
//! A [`Value`] is whatever a host hands to a bean: scalars, ordered maps,
//! lists, date/time values, host objects, open file handles and callables.
//! Host objects describe what they can do through the [`Object`] trait, whose
//! capability methods all default to "not supported".

// used for date/time values
use chrono::{DateTime, Utc};

// used for the resource data type
use std::fs::File;
use std::path::{Path, PathBuf};

// used to share objects, handles and callables between values
use std::sync::Arc;

// used to print out readable forms of a value
use std::fmt;

use serde::ser::{Error as _, Serialize, SerializeMap, SerializeSeq, Serializer};

use crate::container::{Indexed, Keyed};
use crate::datatype::DATETIME_FORMAT;
use crate::error::{BeanError, Result};
use crate::map::OrderedMap;

pub type Map = OrderedMap<Value>;

/// Builds a [`Map`] from `key => value` pairs, converting values with `Into<Value>`.
#[macro_export]
macro_rules! map {
    () => { $crate::value::Map::new() };
    ( $( $key:expr => $value:expr ),+ $(,)? ) => {{
        let mut map = $crate::value::Map::new();
        $( map.insert($key, $crate::value::Value::from($value)); )+
        map
    }};
}

#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Vec<Value>),
    Map(Map),
    DateTime(DateTime<Utc>),
    Object(Arc<dyn Object>),
    Resource(Resource),
    Callable(Callable),
}

impl Value {
    /// A short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::List(_) => "list",
            Value::Map(_) => "map",
            Value::DateTime(_) => "datetime",
            Value::Object(_) => "object",
            Value::Resource(_) => "resource",
            Value::Callable(_) => "callable",
        }
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }
    pub fn as_object(&self) -> Option<&Arc<dyn Object>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }
    pub fn as_callable(&self) -> Option<&Callable> {
        match self {
            Value::Callable(c) => Some(c),
            _ => None,
        }
    }
    /// Parses a JSON document into a value, keeping object key order.
    pub fn from_json_str(s: &str) -> Result<Value> {
        let json: serde_json::Value = serde_json::from_str(s)?;
        Ok(Value::from(json))
    }
    /// Renders the value as JSON. Fails for callables.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::DateTime(a), Value::DateTime(b)) => a == b,
            // host objects have identity semantics
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            (Value::Resource(a), Value::Resource(b)) => a == b,
            (Value::Callable(a), Value::Callable(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Null => write!(f, "Null"),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Int(i) => write!(f, "Int({})", i),
            Value::Float(x) => write!(f, "Float({})", x),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::List(l) => f.debug_list().entries(l.iter()).finish(),
            Value::Map(m) => write!(f, "{:?}", m),
            Value::DateTime(d) => write!(f, "DateTime({})", d.format(DATETIME_FORMAT)),
            Value::Object(o) => write!(f, "Object({:?})", o),
            Value::Resource(r) => write!(f, "{:?}", r),
            Value::Callable(c) => write!(f, "{:?}", c),
        }
    }
}

// ------------- Conversions -------------
impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Int(i as i64)
    }
}
impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}
impl From<u32> for Value {
    fn from(i: u32) -> Self {
        Value::Int(i as i64)
    }
}
impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
impl From<Vec<Value>> for Value {
    fn from(l: Vec<Value>) -> Self {
        Value::List(l)
    }
}
impl From<Map> for Value {
    fn from(m: Map) -> Self {
        Value::Map(m)
    }
}
impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::DateTime(d)
    }
}
impl From<Arc<dyn Object>> for Value {
    fn from(o: Arc<dyn Object>) -> Self {
        Value::Object(o)
    }
}
impl From<Resource> for Value {
    fn from(r: Resource) -> Self {
        Value::Resource(r)
    }
}
impl From<Callable> for Value {
    fn from(c: Callable) -> Self {
        Value::Callable(c)
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(o: Option<T>) -> Self {
        o.map_or(Value::Null, Into::into)
    }
}
impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(a) => Value::List(a.into_iter().map(Value::from).collect()),
            serde_json::Value::Object(o) => {
                Value::Map(o.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}

// ------------- Serialization -------------
// Callables, and therefore any custom coercion callback, can never be
// serialized. Everything else renders as plain JSON-compatible data.
impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(x) => serializer.serialize_f64(*x),
            Value::String(s) => serializer.serialize_str(s),
            Value::List(l) => {
                let mut seq = serializer.serialize_seq(Some(l.len()))?;
                for item in l {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Map(m) => m.serialize(serializer),
            Value::DateTime(d) => serializer.collect_str(&d.format(DATETIME_FORMAT)),
            Value::Object(o) => match o.to_array().or_else(|| o.properties().cloned().map(Value::Map)) {
                Some(value) => value.serialize(serializer),
                None => serializer.serialize_str(o.class_name()),
            },
            Value::Resource(r) => match r.path() {
                Some(path) => serializer.collect_str(&path.display()),
                None => serializer.serialize_unit(),
            },
            Value::Callable(_) => Err(S::Error::custom("serialization of a callable is not allowed")),
        }
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for (k, v) in self.iter() {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

// ------------- Object -------------
/// A host object. Every capability is optional; the container adapter and the
/// coercion engine probe them in a fixed order.
pub trait Object: fmt::Debug + Send + Sync {
    fn class_name(&self) -> &str;
    /// Instance check for class/interface constrained data types.
    fn is_instance_of(&self, class: &str) -> bool {
        self.class_name().eq_ignore_ascii_case(class)
    }
    /// Enumerable named properties (plain-object capability).
    fn properties(&self) -> Option<&Map> {
        None
    }
    /// Access by data name (bean capability).
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        None
    }
    /// Access by integer offset (bean-list capability).
    fn as_indexed(&self) -> Option<&dyn Indexed> {
        None
    }
    /// String conversion capability.
    fn to_text(&self) -> Option<String> {
        None
    }
    /// Explicit to-array capability.
    fn to_array(&self) -> Option<Value> {
        None
    }
    fn is_iterable(&self) -> bool {
        false
    }
    fn has_method(&self, _method: &str) -> bool {
        false
    }
    fn call_method(&self, method: &str, _args: &[Value]) -> Result<Value> {
        Err(BeanError::invalid_value(
            "callable",
            format!("'{}' has no method '{}'", self.class_name(), method),
        ))
    }
}

// ------------- Record -------------
// The generic property bag. Maps and lists coerced to "object" become records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    properties: Map,
}

impl Record {
    pub const CLASS_NAME: &'static str = "Record";

    pub fn new(properties: Map) -> Self {
        Self { properties }
    }
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }
}

impl Object for Record {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }
    fn properties(&self) -> Option<&Map> {
        Some(&self.properties)
    }
}

// ------------- Resource -------------
#[derive(Debug, Clone)]
pub struct Resource {
    path: Option<PathBuf>,
    handle: Arc<File>,
}

impl Resource {
    /// Opens the file at `path` read-only.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let handle = File::open(path)?;
        Ok(Self {
            path: Some(path.to_path_buf()),
            handle: Arc::new(handle),
        })
    }
    pub fn from_file(file: File) -> Self {
        Self {
            path: None,
            handle: Arc::new(file),
        }
    }
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
    pub fn handle(&self) -> &File {
        &self.handle
    }
}

impl PartialEq for Resource {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.handle, &other.handle)
    }
}

// ------------- Callable -------------
pub type Function = Arc<dyn Fn(&[Value]) -> Result<Value> + Send + Sync>;

#[derive(Clone)]
pub enum Callable {
    Function(Function),
    Method { receiver: Arc<dyn Object>, method: String },
}

impl Callable {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value> + Send + Sync + 'static,
    {
        Callable::Function(Arc::new(f))
    }
    pub fn call(&self, args: &[Value]) -> Result<Value> {
        match self {
            Callable::Function(f) => f(args),
            Callable::Method { receiver, method } => receiver.call_method(method, args),
        }
    }
}

impl PartialEq for Callable {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Callable::Function(a), Callable::Function(b)) => Arc::ptr_eq(a, b),
            (
                Callable::Method { receiver: ra, method: ma },
                Callable::Method { receiver: rb, method: mb },
            ) => Arc::ptr_eq(ra, rb) && ma == mb,
            _ => false,
        }
    }
}

impl fmt::Debug for Callable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Callable::Function(_) => write!(f, "Callable(<fn>)"),
            Callable::Method { receiver, method } => {
                write!(f, "Callable({}::{})", receiver.class_name(), method)
            }
        }
    }
}
