//! The type coercion engine.
//!
//! Every built-in [`TypeKind`] has one normalization function here. They are
//! deterministic and locale independent: a value either converts to the
//! canonical representation of its kind or is rejected with `InvalidValue`.

use chrono::{DateTime, NaiveDateTime, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use std::sync::Arc;
use tracing::trace;

use crate::datatype::{TypeKind, DATETIME_FORMAT};
use crate::error::{BeanError, Result};
use crate::value::{Callable, Map, Object, Record, Resource, Value};

lazy_static! {
    // decimal numbers with optional sign, fraction and exponent (".5", "-10", "1e2")
    static ref NUMERIC: Regex = Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)([eE][+-]?\d+)?\s*$").unwrap();
    static ref INTEGER: Regex = Regex::new(r"^\s*[+-]?\d+\s*$").unwrap();
}

// i64::MAX + 1 is exactly representable, i64::MAX is not
const I64_UPPER: f64 = 9_223_372_036_854_775_808.0;

/// Coerces `value` to `kind` with the built-in rules.
pub fn coerce(value: Value, kind: &TypeKind) -> Result<Value> {
    trace!(kind = %kind, from = value.type_name(), "coercing value");
    match kind {
        TypeKind::Bool => to_bool(value),
        TypeKind::Int => to_int(value),
        TypeKind::Float => to_float(value),
        TypeKind::String => to_string(value),
        TypeKind::Array => to_array(value),
        TypeKind::Iterable => to_iterable(value),
        TypeKind::DateTime => to_datetime(value),
        TypeKind::Object => to_object(value),
        TypeKind::Resource => to_resource(value),
        TypeKind::Callable => to_callable(value),
        TypeKind::Class(class) => instance_of(value, class),
    }
}

fn rejected(kind: TypeKind, value: &Value) -> BeanError {
    let shown = match value {
        Value::String(s) => format!("'{}'", s),
        Value::Int(i) => i.to_string(),
        Value::Float(x) => x.to_string(),
        other => other.type_name().to_string(),
    };
    BeanError::invalid_value(kind, format!("unable to convert {}", shown))
}

pub fn to_bool(value: Value) -> Result<Value> {
    let converted = match &value {
        Value::Bool(b) => Some(*b),
        Value::Null => Some(false),
        Value::Int(1) => Some(true),
        Value::Int(0) => Some(false),
        Value::Float(x) if *x == 1.0 => Some(true),
        Value::Float(x) if *x == 0.0 => Some(false),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" | "on" | "yes" => Some(true),
            "0" | "false" | "off" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    };
    converted
        .map(Value::Bool)
        .ok_or_else(|| rejected(TypeKind::Bool, &value))
}

fn truncate(x: f64) -> Option<i64> {
    let t = x.trunc();
    if t.is_finite() && t >= -I64_UPPER && t < I64_UPPER {
        Some(t as i64)
    } else {
        None
    }
}

fn parse_number(s: &str) -> Option<f64> {
    if NUMERIC.is_match(s) {
        s.trim().parse::<f64>().ok()
    } else {
        None
    }
}

pub fn to_int(value: Value) -> Result<Value> {
    let converted = match &value {
        Value::Int(i) => Some(*i),
        Value::Float(x) => truncate(*x),
        Value::String(s) if INTEGER.is_match(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .or_else(|| parse_number(s).and_then(truncate)),
        Value::String(s) => parse_number(s).and_then(truncate),
        _ => None,
    };
    converted
        .map(Value::Int)
        .ok_or_else(|| rejected(TypeKind::Int, &value))
}

pub fn to_float(value: Value) -> Result<Value> {
    let converted = match &value {
        Value::Int(i) => Some(*i as f64),
        Value::Float(x) => Some(*x),
        // thousands separators are dropped before parsing
        Value::String(s) => parse_number(&s.replace(',', "")),
        _ => None,
    };
    converted
        .map(Value::Float)
        .ok_or_else(|| rejected(TypeKind::Float, &value))
}

pub fn to_string(value: Value) -> Result<Value> {
    let converted = match &value {
        Value::String(_) => return Ok(value),
        Value::Int(i) => Some(i.to_string()),
        Value::Float(x) => Some(x.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) | Value::Null => Some(String::new()),
        Value::Object(object) => object.to_text(),
        _ => None,
    };
    converted
        .map(Value::String)
        .ok_or_else(|| rejected(TypeKind::String, &value))
}

fn json_container(text: &str) -> Option<Value> {
    let trimmed = text.trim();
    if !(trimmed.starts_with('{') || trimmed.starts_with('[')) {
        return None;
    }
    match Value::from_json_str(trimmed) {
        Ok(parsed @ (Value::List(_) | Value::Map(_))) => Some(parsed),
        _ => None,
    }
}

pub fn to_array(value: Value) -> Result<Value> {
    let converted = match &value {
        Value::List(_) | Value::Map(_) => return Ok(value),
        Value::Null => Some(Value::List(Vec::new())),
        Value::Object(object) => object.to_array().or_else(|| object.properties().cloned().map(Value::Map)),
        Value::String(s) => json_container(s),
        _ => None,
    };
    // anything else is wrapped as a one-element list
    Ok(converted.unwrap_or_else(|| Value::List(vec![value])))
}

pub fn to_iterable(value: Value) -> Result<Value> {
    let iterable = match &value {
        Value::List(_) | Value::Map(_) => true,
        Value::Object(object) => object.is_iterable(),
        _ => false,
    };
    if iterable {
        return Ok(value);
    }
    match &value {
        Value::Object(object) => object
            .to_array()
            .or_else(|| object.properties().cloned().map(Value::Map))
            .ok_or_else(|| rejected(TypeKind::Iterable, &value)),
        _ => Err(rejected(TypeKind::Iterable, &value)),
    }
}

fn from_epoch(seconds: f64) -> Option<DateTime<Utc>> {
    let whole = seconds.floor();
    let nanos = ((seconds - whole) * 1e9).round() as u32;
    DateTime::from_timestamp(truncate(whole)?, nanos.min(999_999_999))
}

pub fn to_datetime(value: Value) -> Result<Value> {
    let converted = match &value {
        Value::DateTime(_) => return Ok(value),
        Value::Int(i) => DateTime::from_timestamp(*i, 0),
        Value::Float(x) => from_epoch(*x),
        Value::String(s) if INTEGER.is_match(s) => s
            .trim()
            .parse::<i64>()
            .ok()
            .and_then(|i| DateTime::from_timestamp(i, 0)),
        Value::String(s) => match parse_number(s) {
            Some(seconds) => from_epoch(seconds),
            None => NaiveDateTime::parse_from_str(s.trim(), DATETIME_FORMAT)
                .ok()
                .map(|naive| naive.and_utc()),
        },
        _ => None,
    };
    converted
        .map(Value::DateTime)
        .ok_or_else(|| rejected(TypeKind::DateTime, &value))
}

pub fn to_object(value: Value) -> Result<Value> {
    match value {
        Value::Object(_) | Value::DateTime(_) => Ok(value),
        Value::Map(map) => Ok(record(map)),
        Value::List(list) => Ok(record(
            list.into_iter()
                .enumerate()
                .map(|(i, item)| (i.to_string(), item))
                .collect(),
        )),
        other => Err(rejected(TypeKind::Object, &other)),
    }
}

fn record(properties: Map) -> Value {
    let object: Arc<dyn Object> = Arc::new(Record::new(properties));
    Value::Object(object)
}

/// The class/interface constraint check installed for class data types.
pub fn instance_of(value: Value, class: &str) -> Result<Value> {
    let matches = value
        .as_object()
        .is_some_and(|object| object.is_instance_of(class));
    if matches {
        Ok(value)
    } else {
        Err(BeanError::TypeMismatch {
            class: class.to_string(),
        })
    }
}

pub fn to_resource(value: Value) -> Result<Value> {
    match &value {
        Value::Resource(_) => Ok(value),
        Value::String(s) if Path::new(s).is_file() => Resource::open(s)
            .map(Value::Resource)
            .map_err(|e| BeanError::invalid_value(TypeKind::Resource, format!("unable to open '{}': {}", s, e))),
        _ => Err(rejected(TypeKind::Resource, &value)),
    }
}

pub fn to_callable(value: Value) -> Result<Value> {
    match &value {
        Value::Callable(_) => Ok(value),
        Value::List(pair) if pair.len() == 2 => match (&pair[0], &pair[1]) {
            (Value::Object(receiver), Value::String(method)) if receiver.has_method(method) => {
                Ok(Value::Callable(Callable::Method {
                    receiver: Arc::clone(receiver),
                    method: method.clone(),
                }))
            }
            _ => Err(rejected(TypeKind::Callable, &value)),
        },
        _ => Err(rejected(TypeKind::Callable, &value)),
    }
}
