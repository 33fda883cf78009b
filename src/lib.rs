//! Beanpath – dynamically typed, dot-path addressable data beans.
//!
//! A *bean* is a flat key/value store whose keys are dot-separated data
//! names. Each name may carry a declared data type (kind, nullability and an
//! optional custom coercion callback) and every value written under a typed
//! name is normalized to that type first. Values that are themselves
//! containers (maps, lists, host objects, other beans) can be queried with
//! glob-style patterns such as `*.items.*.id`.
//!
//! ## Modules
//! * [`name`] – Data name normalization and the original-spelling map.
//! * [`value`] – The dynamic [`value::Value`] model, ordered maps and the
//!   [`value::Object`] capability trait for host objects.
//! * [`datatype`] – Data type kinds, aliases and descriptors.
//! * [`coerce`] – The per-kind coercion rules.
//! * [`registry`] – Type declarations with parent propagation.
//! * [`container`] – Uniform access to lists, beans, objects and maps.
//! * [`wildcard`] – Expansion of wildcard patterns into concrete paths.
//! * [`bean`] – The [`bean::Bean`] itself.
//! * [`settings`] – Layered configuration.
//!
//! ## Data Types
//! The built-in kinds are `bool`, `int`, `float`, `string`, `array`,
//! `iterable`, `date`, `object`, `resource` and `callable`. Kind tokens are
//! matched case-insensitively and accept common aliases (`Integer`, `Double`,
//! `Str`, ...). Any other token names a class the value must be an instance
//! of, which has to be known to the bean (`Bean`, `Record`, or registered with
//! [`bean::Bean::register_class`]).
//!
//! Declaring `a.b.c` types the untyped ancestors `a` and `a.b` as `array`,
//! and is refused when an ancestor already has another type.
//!
//! ## Quick Start
//! ```
//! use beanpath::{map, Bean, Value};
//! let mut bean = Bean::new();
//! bean.set_data_type("Count", "integer", false, None).unwrap();
//! bean.set_data("Count", "42").unwrap();
//! assert_eq!(bean.get_data("count").unwrap(), &Value::Int(42));
//!
//! bean.set_data("foo", map! { "items" => map! { "a" => map! { "id" => 1 }, "b" => map! { "id" => 2 } } }).unwrap();
//! let ids = bean.resolve_wildcards("foo.items.*.id");
//! assert_eq!(ids.keys().collect::<Vec<_>>(), vec!["foo.items.a.id", "foo.items.b.id"]);
//! ```
//!
//! ## Limitations
//! Beans are single-threaded containers: they are `Send + Sync` so they can
//! be moved and shared read-only, but mutation needs `&mut Bean`. Custom
//! coercion callbacks and callable values can never be serialized.

pub mod bean;
pub mod coerce;
pub mod container;
pub mod datatype;
pub mod error;
pub mod map;
pub mod name;
pub mod registry;
pub mod settings;
pub mod value;
pub mod wildcard;

pub use bean::Bean;
pub use container::{ContainerKind, Indexed, Keyed, Traversable};
pub use datatype::{Coercer, TypeDescriptor, TypeKind};
pub use error::{BeanError, Result};
pub use map::OrderedMap;
pub use name::{normalize_name, parent_of};
pub use settings::Settings;
pub use value::{Callable, Map, Object, Record, Resource, Value};
