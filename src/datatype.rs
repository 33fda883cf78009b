// used to share coercion callbacks between descriptors
use std::sync::Arc;

// used to print out readable forms of a data type
use std::fmt;

use crate::bean::Bean;
use crate::error::Result;
use crate::value::Value;

/// The one textual date/time format understood by the `date` data type.
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A custom coercion callback, receiving `(value, data name, owning bean)`.
///
/// Callbacks are opaque closures: they are never compared and can never be
/// serialized.
pub type Coercer = Arc<dyn Fn(Value, &str, &Bean) -> Result<Value> + Send + Sync>;

#[derive(Eq, PartialEq, Hash, Clone, Debug)]
pub enum TypeKind {
    Bool,
    Int,
    Float,
    String,
    Array,
    Iterable,
    DateTime,
    Object,
    Resource,
    Callable,
    // an object-of-type constraint, the name kept as given (trimmed)
    Class(String),
}

impl TypeKind {
    pub const BUILT_IN: [TypeKind; 10] = [
        TypeKind::Bool,
        TypeKind::Int,
        TypeKind::Float,
        TypeKind::String,
        TypeKind::Array,
        TypeKind::Iterable,
        TypeKind::DateTime,
        TypeKind::Object,
        TypeKind::Resource,
        TypeKind::Callable,
    ];

    /// Resolves a data type token. Names and their common aliases match
    /// case-insensitively; anything else is taken as a class or interface name.
    pub fn parse(token: &str) -> TypeKind {
        let token = token.trim();
        match token.to_lowercase().as_str() {
            "bool" | "boolean" => TypeKind::Bool,
            "int" | "integer" => TypeKind::Int,
            "float" | "double" => TypeKind::Float,
            "string" | "str" => TypeKind::String,
            "array" | "arr" => TypeKind::Array,
            "iterable" | "iter" => TypeKind::Iterable,
            "date" | "datetime" => TypeKind::DateTime,
            "object" | "obj" => TypeKind::Object,
            "resource" | "res" => TypeKind::Resource,
            "callable" | "callback" => TypeKind::Callable,
            _ => TypeKind::Class(token.to_string()),
        }
    }
    pub fn name(&self) -> &str {
        match self {
            TypeKind::Bool => "bool",
            TypeKind::Int => "int",
            TypeKind::Float => "float",
            TypeKind::String => "string",
            TypeKind::Array => "array",
            TypeKind::Iterable => "iterable",
            TypeKind::DateTime => "date",
            TypeKind::Object => "object",
            TypeKind::Resource => "resource",
            TypeKind::Callable => "callable",
            TypeKind::Class(name) => name,
        }
    }
    pub fn is_built_in(&self) -> bool {
        !matches!(self, TypeKind::Class(_))
    }
    /// The value a `null` write is replaced with, if the kind has one.
    pub fn default_value(&self) -> Option<Value> {
        match self {
            TypeKind::Array => Some(Value::List(Vec::new())),
            _ => None,
        }
    }
}

impl fmt::Display for TypeKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for TypeKind {
    fn from(token: &str) -> Self {
        TypeKind::parse(token)
    }
}

impl From<String> for TypeKind {
    fn from(token: String) -> Self {
        TypeKind::parse(&token)
    }
}

// ------------- TypeDescriptor -------------
#[derive(Clone)]
pub struct TypeDescriptor {
    kind: TypeKind,
    nullable: bool,
    callback: Option<Coercer>,
}

impl TypeDescriptor {
    pub fn new(kind: TypeKind, nullable: bool, callback: Option<Coercer>) -> Self {
        Self {
            kind,
            nullable,
            callback,
        }
    }
    pub fn kind(&self) -> &TypeKind {
        &self.kind
    }
    pub fn nullable(&self) -> bool {
        self.nullable
    }
    pub fn callback(&self) -> Option<&Coercer> {
        self.callback.as_ref()
    }
}

impl fmt::Debug for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("TypeDescriptor")
            .field("kind", &self.kind)
            .field("nullable", &self.nullable)
            .field("callback", &self.callback.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
