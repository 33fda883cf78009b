//! The bean: a flat store of normalized data names, typed per name.
//!
//! Every write goes through the same pipeline: the name is normalized, its
//! declared type (if any) is looked up and the value is coerced before it is
//! stored. Names may contain dots, but the store itself is flat, so `"a.b"`
//! is simply a sibling of `"a"`. Nesting only exists where a stored value is
//! itself something the wildcard resolver can descend into, including other
//! beans.

// used to stringify non-string names
use std::fmt;

// used to share beans as values and to box callbacks
use std::sync::Arc;

use serde::{Serialize, Serializer};
use tracing::{debug, trace};

use crate::coerce;
use crate::container::{keyed_at, Keyed, Traversable};
use crate::datatype::{Coercer, TypeKind};
use crate::error::{BeanError, Result};
use crate::name::{normalize_name, OriginalNames};
use crate::registry::TypeRegistry;
use crate::settings::Settings;
use crate::value::{Map, Object, Value};
use crate::wildcard;

#[derive(Debug, Clone, Default)]
pub struct Bean {
    data: Map,
    types: TypeRegistry,
    original_names: OriginalNames,
    settings: Settings,
}

impl Bean {
    pub const CLASS_NAME: &'static str = "Bean";

    pub fn new() -> Self {
        Self::with_settings(Settings::default())
    }
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            data: Map::new(),
            types: TypeRegistry::with_max_parent_depth(settings.max_parent_depth),
            original_names: OriginalNames::new(),
            settings,
        }
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn types(&self) -> &TypeRegistry {
        &self.types
    }

    // Remembers how a caller spelled a name, if that differs from its
    // normalized form.
    fn remember_original(&mut self, raw: &str, normalized: &str) {
        let raw = raw.trim();
        if raw != normalized {
            self.original_names.set(raw, normalized);
        }
    }

    // ------------- Data -------------
    pub fn set_data(&mut self, name: impl fmt::Display, value: impl Into<Value>) -> Result<()> {
        let raw = name.to_string();
        let name = normalize_name(&raw)?;
        let value = self.normalize_value(&name, value.into())?;
        trace!(name = name.as_str(), kind = value.type_name(), "set data");
        self.remember_original(&raw, &name);
        self.data.insert(name, value);
        Ok(())
    }

    /// Fails with `DataNotFound` when nothing is stored under the name.
    pub fn get_data(&self, name: impl fmt::Display) -> Result<&Value> {
        let name = normalize_name(name)?;
        self.data.get(&name).ok_or(BeanError::DataNotFound { name })
    }

    pub fn has_data(&self, name: impl fmt::Display) -> bool {
        normalize_name(name).is_ok_and(|name| self.data.contains_key(&name))
    }

    /// Removes the stored value together with the type declaration and the
    /// original spelling of the name.
    pub fn remove_data(&mut self, name: impl fmt::Display) -> Result<Value> {
        let name = normalize_name(name)?;
        let Some(value) = self.data.remove(&name) else {
            return Err(BeanError::DataNotFound { name });
        };
        self.types.remove(&name);
        self.original_names.unset(&name);
        debug!(name = name.as_str(), "removed data");
        Ok(value)
    }

    /// Clears every stored value. Type declarations are kept.
    pub fn reset_data(&mut self) {
        debug!(count = self.data.len(), "reset data");
        self.data.clear();
    }

    pub fn data_names(&self) -> Vec<String> {
        self.data.keys().map(str::to_string).collect()
    }
    pub fn len(&self) -> usize {
        self.data.len()
    }
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The stored value, else the default of the declared type, else `null`.
    pub fn data_or_default(&self, name: impl fmt::Display) -> Value {
        let Ok(name) = normalize_name(name) else {
            return Value::Null;
        };
        match self.data.get(&name) {
            Some(value) => value.clone(),
            None => self
                .types
                .kind_of(&name)
                .and_then(TypeKind::default_value)
                .unwrap_or_default(),
        }
    }

    // ------------- Types -------------
    pub fn set_data_type(
        &mut self,
        name: impl fmt::Display,
        kind: impl Into<TypeKind>,
        nullable: bool,
        callback: Option<Coercer>,
    ) -> Result<()> {
        let raw = name.to_string();
        let name = normalize_name(&raw)?;
        self.types.declare(&name, kind.into(), nullable, callback)?;
        self.remember_original(&raw, &name);
        Ok(())
    }

    pub fn set_data_type_nullable(&mut self, name: impl fmt::Display, kind: impl Into<TypeKind>) -> Result<()> {
        self.set_data_type(name, kind, true, None)
    }

    /// Declares a `callable` data type whose values are produced by `callback`.
    pub fn set_data_type_callable<F>(&mut self, name: impl fmt::Display, callback: F) -> Result<()>
    where
        F: Fn(Value, &str, &Bean) -> Result<Value> + Send + Sync + 'static,
    {
        self.set_data_type(name, TypeKind::Callable, false, Some(Arc::new(callback)))
    }

    /// Types the immediate parent of `name`, see [`TypeRegistry::set_type_to_parent`].
    pub fn set_data_type_to_parent(
        &mut self,
        name: impl fmt::Display,
        kind: impl Into<TypeKind>,
        overwrite: bool,
    ) -> Result<()> {
        let name = normalize_name(name)?;
        self.types.set_type_to_parent(&name, kind.into(), overwrite)
    }

    pub fn get_data_type(&self, name: impl fmt::Display) -> Option<&TypeKind> {
        let name = normalize_name(name).ok()?;
        self.types.kind_of(&name)
    }
    pub fn data_type_nullable(&self, name: impl fmt::Display) -> bool {
        normalize_name(name).is_ok_and(|name| self.types.nullable_of(&name))
    }
    pub fn data_type_callback(&self, name: impl fmt::Display) -> Option<&Coercer> {
        let name = normalize_name(name).ok()?;
        self.types.callback_of(&name)
    }
    pub fn remove_data_type(&mut self, name: impl fmt::Display) -> bool {
        match normalize_name(name) {
            Ok(name) => self.types.remove(&name).is_some(),
            Err(_) => false,
        }
    }
    pub fn register_class(&mut self, class: &str) -> Result<()> {
        self.types.register_class(class)
    }

    /// Brings `value` into the form declared for the (normalized) `name`.
    pub fn normalize_value(&self, name: &str, value: Value) -> Result<Value> {
        let Some(descriptor) = self.types.descriptor(name) else {
            return Ok(value);
        };
        if value.is_null() {
            return match descriptor.kind().default_value() {
                Some(default) => Ok(default),
                None if descriptor.nullable() => Ok(Value::Null),
                None => Err(BeanError::NotNullable { name: name.to_string() }),
            };
        }
        match descriptor.callback() {
            Some(callback) => callback(value, name, self),
            None => coerce::coerce(value, descriptor.kind()),
        }
    }

    /// Normalizes the stored values of every typed descendant of `name` again,
    /// filling missing ones with their type's default where there is one.
    /// Missing descendants without a default are skipped, even when they are
    /// not nullable, so this never fails with `NotNullable`.
    pub fn normalize_children(&mut self, name: impl fmt::Display) -> Result<()> {
        let name = normalize_name(name)?;
        let mut children = self.types.names_with_prefix(&name, false);
        children.sort();
        for child in children {
            let value = match self.data.get(&child) {
                Some(value) => value.clone(),
                None => match self.types.kind_of(&child).and_then(TypeKind::default_value) {
                    Some(default) => default,
                    None => continue,
                },
            };
            let value = self.normalize_value(&child, value)?;
            self.data.insert(child, value);
        }
        Ok(())
    }

    // ------------- Original names -------------
    /// The spelling `name` was first written with, or `name` itself.
    pub fn original_data_name<'a>(&'a self, name: &'a str) -> &'a str {
        self.original_names.get(name)
    }
    pub fn set_original_data_name(&mut self, raw: &str, normalized: &str) -> bool {
        self.original_names.set(raw, normalized)
    }
    pub fn unset_original_data_name(&mut self, normalized: &str) {
        self.original_names.unset(normalized);
    }

    // ------------- Bulk access -------------
    /// A flat copy of the store, keyed by normalized or original names.
    pub fn to_array(&self, use_original_names: bool) -> Map {
        self.data
            .iter()
            .map(|(name, value)| {
                let key = if use_original_names {
                    self.original_data_name(name)
                } else {
                    name
                };
                (key.to_string(), value.clone())
            })
            .collect()
    }

    /// Sets every entry of `data`, or only the entries `restrict_to` names.
    ///
    /// A restricting name is tried as a key of `data` first and otherwise
    /// resolved as a (wildcard) path into it; each match is set under its
    /// concrete path. Names that match nothing are skipped. Top-level keys of
    /// `data` match with surrounding whitespace trimmed.
    pub fn set_from_array(&mut self, data: &Map, restrict_to: Option<&[&str]>) -> Result<()> {
        let Some(names) = restrict_to else {
            for (name, value) in data {
                self.set_data(name, value.clone())?;
            }
            return Ok(());
        };
        let trimmed = trimmed_keys(data);
        let data = trimmed.as_ref().unwrap_or(data);
        for name in names {
            let name = name.trim();
            if name.is_empty() {
                continue;
            }
            if let Some(value) = data.get(name) {
                self.set_data(name, value.clone())?;
                continue;
            }
            for (path, value) in wildcard::resolve(data, name) {
                self.set_data(&path, value)?;
            }
        }
        Ok(())
    }

    /// Every stored path matching `pattern`, with its value.
    pub fn resolve_wildcards(&self, pattern: &str) -> Map {
        wildcard::resolve(self, pattern)
    }
}

// A copy of `data` keyed by trimmed keys, or `None` when no key needs
// trimming. The first entry wins when two keys trim to the same name.
fn trimmed_keys(data: &Map) -> Option<Map> {
    if data.keys().all(|key| key.trim() == key) {
        return None;
    }
    let mut trimmed = Map::new();
    for (key, value) in data {
        trimmed.insert_if_absent(key.trim(), value.clone());
    }
    Some(trimmed)
}

impl Keyed for Bean {
    fn has_data(&self, name: &str) -> bool {
        Bean::has_data(self, name)
    }
    fn get_data(&self, name: &str) -> Result<Value> {
        Bean::get_data(self, name).cloned()
    }
    fn data_names(&self) -> Vec<String> {
        Bean::data_names(self)
    }
}

impl Traversable for Bean {
    fn keys(&self) -> Vec<String> {
        Bean::data_names(self)
    }
    fn value_at(&self, key: &str) -> Option<Value> {
        keyed_at(self, key)
    }
}

impl Object for Bean {
    fn class_name(&self) -> &str {
        Self::CLASS_NAME
    }
    fn as_keyed(&self) -> Option<&dyn Keyed> {
        Some(self)
    }
    fn to_array(&self) -> Option<Value> {
        Some(Value::Map(Bean::to_array(self, self.settings.use_original_names)))
    }
    fn is_iterable(&self) -> bool {
        true
    }
}

impl From<Bean> for Value {
    fn from(bean: Bean) -> Self {
        let object: Arc<dyn Object> = Arc::new(bean);
        Value::Object(object)
    }
}

impl Serialize for Bean {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Bean::to_array(self, self.settings.use_original_names).serialize(serializer)
    }
}
