// used for the known class catalogue
use std::collections::HashSet;

// used to install implicit instance checks
use std::sync::Arc;

// used to validate registered class names
use lazy_static::lazy_static;
use regex::Regex;

use tracing::{debug, warn};

use crate::bean::Bean;
use crate::coerce;
use crate::datatype::{Coercer, TypeDescriptor, TypeKind};
use crate::error::{BeanError, Result};
use crate::map::{OrderedMap, OtherHasher};
use crate::name::parent_of;
use crate::value::{Record, Value};

lazy_static! {
    // identifier paths such as "User", "App\Model\User" or "app::model::User"
    static ref CLASS_NAME: Regex =
        Regex::new(r"^(\\|::)?[A-Za-z_][A-Za-z0-9_]*((\\|::)[A-Za-z_][A-Za-z0-9_]*)*$").unwrap();
}

pub const DEFAULT_MAX_PARENT_DEPTH: usize = 64;

// ------------- TypeRegistry -------------
/// Data type declarations keyed by normalized data name, in declaration order.
///
/// Every dotted name needs an `array` typed parent. Declaring a name whose
/// ancestors are untyped types them as `array`, from the topmost down, and a
/// declaration below an ancestor of any other kind is refused without
/// touching the registry.
#[derive(Clone, Debug)]
pub struct TypeRegistry {
    kept: OrderedMap<TypeDescriptor>,
    known_classes: HashSet<String, OtherHasher>,
    max_parent_depth: usize,
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::with_max_parent_depth(DEFAULT_MAX_PARENT_DEPTH)
    }
    pub fn with_max_parent_depth(max_parent_depth: usize) -> Self {
        let mut known_classes = HashSet::default();
        for class in [Bean::CLASS_NAME, Record::CLASS_NAME] {
            known_classes.insert(class.to_lowercase());
        }
        Self {
            kept: OrderedMap::new(),
            known_classes,
            max_parent_depth,
        }
    }
    pub fn max_parent_depth(&self) -> usize {
        self.max_parent_depth
    }

    /// Declares the data type of an already normalized name.
    pub fn declare(&mut self, name: &str, kind: TypeKind, nullable: bool, callback: Option<Coercer>) -> Result<()> {
        let callback = self.checked_callback(name, &kind, callback)?;
        let untyped = self.untyped_ancestors(name)?;
        for parent in untyped.iter().rev() {
            debug!(name, parent = parent.as_str(), "typing parent as array");
            self.kept
                .insert(parent.clone(), TypeDescriptor::new(TypeKind::Array, false, None));
        }
        debug!(name, kind = %kind, nullable, custom = callback.is_some(), "declared data type");
        self.kept.insert(name, TypeDescriptor::new(kind, nullable, callback));
        Ok(())
    }

    // Refuses callables without a callback and unknown classes. Known classes
    // get the instance check unless a callback was passed.
    fn checked_callback(&self, name: &str, kind: &TypeKind, callback: Option<Coercer>) -> Result<Option<Coercer>> {
        match kind {
            TypeKind::Callable if callback.is_none() => Err(BeanError::MissingCallable { name: name.to_string() }),
            kind if kind.is_built_in() => Ok(callback),
            TypeKind::Class(class) if self.is_known_class(class) => Ok(callback.or_else(|| Some(instance_check(class)))),
            _ => Err(BeanError::InvalidType {
                name: name.to_string(),
                kind: kind.to_string(),
            }),
        }
    }

    // Walks up the parent chain until an array typed ancestor is found,
    // collecting the untyped ones on the way (nearest first).
    fn untyped_ancestors(&self, name: &str) -> Result<Vec<String>> {
        let mut untyped = Vec::new();
        let mut current = name;
        let mut depth = 0;
        while let Some(parent) = parent_of(current) {
            if depth == self.max_parent_depth {
                warn!(name, depth, "parent chain too deep, remaining ancestors left untyped");
                break;
            }
            depth += 1;
            match self.kept.get(parent) {
                Some(descriptor) if *descriptor.kind() == TypeKind::Array => break,
                Some(descriptor) => {
                    return Err(BeanError::InvalidParentType {
                        name: name.to_string(),
                        parent: parent.to_string(),
                        parent_kind: descriptor.kind().to_string(),
                    });
                }
                None => untyped.push(parent.to_string()),
            }
            current = parent;
        }
        Ok(untyped)
    }

    /// Types the immediate parent of `name` with `kind`. Without `overwrite`
    /// an already typed parent is left alone. Either way `kind` is checked
    /// like any other declaration.
    pub fn set_type_to_parent(&mut self, name: &str, kind: TypeKind, overwrite: bool) -> Result<()> {
        let Some(parent) = parent_of(name) else {
            return Ok(());
        };
        let parent = parent.to_string();
        if overwrite {
            let callback = self.checked_callback(&parent, &kind, None)?;
            debug!(name, parent = parent.as_str(), kind = %kind, "overwriting parent type");
            self.kept.insert(parent, TypeDescriptor::new(kind, false, callback));
            Ok(())
        } else if self.kept.contains_key(&parent) {
            Ok(())
        } else {
            self.declare(&parent, kind, false, None)
        }
    }

    pub fn descriptor(&self, name: &str) -> Option<&TypeDescriptor> {
        self.kept.get(name)
    }
    pub fn kind_of(&self, name: &str) -> Option<&TypeKind> {
        self.kept.get(name).map(TypeDescriptor::kind)
    }
    pub fn nullable_of(&self, name: &str) -> bool {
        self.kept.get(name).is_some_and(TypeDescriptor::nullable)
    }
    pub fn callback_of(&self, name: &str) -> Option<&Coercer> {
        self.kept.get(name).and_then(TypeDescriptor::callback)
    }
    pub fn kind_of_parent(&self, name: &str) -> Option<&TypeKind> {
        parent_of(name).and_then(|parent| self.kind_of(parent))
    }
    pub fn contains(&self, name: &str) -> bool {
        self.kept.contains_key(name)
    }
    pub fn remove(&mut self, name: &str) -> Option<TypeDescriptor> {
        let removed = self.kept.remove(name);
        if removed.is_some() {
            debug!(name, "removed data type");
        }
        removed
    }

    /// The declared names below `prefix`, in declaration order. With
    /// `include_self` a declared `prefix` comes first.
    pub fn names_with_prefix(&self, prefix: &str, include_self: bool) -> Vec<String> {
        let below = format!("{}.", prefix);
        let mut names = Vec::new();
        if include_self && self.kept.contains_key(prefix) {
            names.push(prefix.to_string());
        }
        names.extend(
            self.kept
                .keys()
                .filter(|name| name.starts_with(&below))
                .map(str::to_string),
        );
        names
    }

    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = (&str, &TypeDescriptor)> {
        self.kept.iter()
    }

    /// Adds a class or interface name that data types may be constrained to.
    pub fn register_class(&mut self, class: &str) -> Result<()> {
        let class = class.trim();
        if !CLASS_NAME.is_match(class) {
            return Err(BeanError::InvalidType {
                name: class.to_string(),
                kind: class.to_string(),
            });
        }
        debug!(class, "registered class");
        self.known_classes.insert(class.to_lowercase());
        Ok(())
    }
    pub fn is_known_class(&self, class: &str) -> bool {
        self.known_classes.contains(&class.trim().to_lowercase())
    }
}

fn instance_check(class: &str) -> Coercer {
    let class = class.to_string();
    Arc::new(move |value: Value, _: &str, _: &Bean| coerce::instance_of(value, &class))
}
