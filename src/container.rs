//! Uniform read access over everything the wildcard resolver can descend into.
//!
//! Values are sorted into one [`ContainerKind`] by explicit capability checks
//! before any access, so the traversal code never has to care whether it is
//! looking at a list, a bean, a host object or a plain map.

use tracing::trace;

use crate::error::Result;
use crate::map::OrderedMap;
use crate::value::{Map, Value};

/// The bean capability: access by data name.
pub trait Keyed {
    fn has_data(&self, name: &str) -> bool;
    /// Fails with `DataNotFound` when the name holds no data.
    fn get_data(&self, name: &str) -> Result<Value>;
    /// Names in storage order, used when a wildcard expands a bean.
    fn data_names(&self) -> Vec<String>;
}

/// The bean-list capability: access by integer offset.
pub trait Indexed {
    fn exists_at(&self, index: i64) -> bool;
    fn get_at(&self, index: i64) -> Option<Value>;
}

impl Indexed for Vec<Value> {
    fn exists_at(&self, index: i64) -> bool {
        usize::try_from(index).is_ok_and(|i| i < self.len())
    }
    fn get_at(&self, index: i64) -> Option<Value> {
        usize::try_from(index).ok().and_then(|i| self.get(i)).cloned()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    Indexed,
    Keyed,
    PlainObject,
    PlainMap,
    Scalar,
}

/// Classifies a value, checking capabilities in precedence order.
pub fn classify(value: &Value) -> ContainerKind {
    match value {
        Value::List(_) => ContainerKind::Indexed,
        Value::Map(_) => ContainerKind::PlainMap,
        Value::Object(object) => {
            if object.as_indexed().is_some() {
                ContainerKind::Indexed
            } else if object.as_keyed().is_some() {
                ContainerKind::Keyed
            } else if object.properties().is_some() {
                ContainerKind::PlainObject
            } else {
                ContainerKind::Scalar
            }
        }
        _ => ContainerKind::Scalar,
    }
}

/// Enumerable keys of a container in their natural order.
///
/// Indexed containers are not enumerable and scalars have no keys; both
/// give an empty list rather than an error.
pub fn keys_of(container: &Value) -> Vec<String> {
    match (classify(container), container) {
        (ContainerKind::PlainMap, Value::Map(map)) => map.keys().map(str::to_string).collect(),
        (ContainerKind::Keyed, Value::Object(object)) => {
            object.as_keyed().map(|keyed| keyed.data_names()).unwrap_or_default()
        }
        (ContainerKind::PlainObject, Value::Object(object)) => object
            .properties()
            .map(|properties| properties.keys().map(str::to_string).collect())
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

/// Looks up `key` in a container. `Some(Value::Null)` means the key exists
/// but holds no value, `None` means it is absent.
pub fn value_at(container: &Value, key: &str) -> Option<Value> {
    let found = match (classify(container), container) {
        (ContainerKind::Indexed, Value::List(list)) => match key.parse::<i64>() {
            Ok(index) => indexed_at(list, index),
            Err(_) => None,
        },
        (ContainerKind::Indexed, Value::Object(object)) => match (key.parse::<i64>(), object.as_indexed()) {
            (Ok(index), Some(indexed)) => indexed_at(indexed, index),
            // a non-numeric key falls back to property introspection
            _ => property_at(container, key),
        },
        (ContainerKind::Keyed, Value::Object(object)) => object.as_keyed().and_then(|keyed| keyed_at(keyed, key)),
        _ => property_at(container, key),
    };
    trace!(key, found = found.is_some(), "container lookup");
    found
}

pub(crate) fn indexed_at<I: Indexed + ?Sized>(indexed: &I, index: i64) -> Option<Value> {
    if indexed.exists_at(index) {
        Some(indexed.get_at(index).unwrap_or_default())
    } else {
        None
    }
}

pub(crate) fn keyed_at<K: Keyed + ?Sized>(keyed: &K, key: &str) -> Option<Value> {
    if keyed.has_data(key) {
        keyed.get_data(key).ok()
    } else {
        None
    }
}

fn property_at(container: &Value, key: &str) -> Option<Value> {
    match container {
        Value::Map(map) => map.get(key).cloned(),
        Value::Object(object) => object.properties().and_then(|properties| properties.get(key).cloned()),
        _ => None,
    }
}

// ------------- Traversable -------------
/// What the wildcard resolver walks: a value through the adapter above, or a
/// bean's own flat store.
pub trait Traversable {
    fn keys(&self) -> Vec<String>;
    fn value_at(&self, key: &str) -> Option<Value>;
}

impl Traversable for Value {
    fn keys(&self) -> Vec<String> {
        keys_of(self)
    }
    fn value_at(&self, key: &str) -> Option<Value> {
        value_at(self, key)
    }
}

impl Traversable for Map {
    fn keys(&self) -> Vec<String> {
        OrderedMap::keys(self).map(str::to_string).collect()
    }
    fn value_at(&self, key: &str) -> Option<Value> {
        self.get(key).cloned()
    }
}
