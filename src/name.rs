//! Data name normalization.
//!
//! Normalized names are trimmed and lower-cased. The raw spelling a caller
//! used is kept in [`OriginalNames`] so flat exports can hand it back.

// used to keep the one-to-one mapping between normalized and original names
use bimap::BiMap;

// used to stringify non-string names
use std::fmt;

use crate::error::{BeanError, Result};

/// Trims and lower-cases a data name. Fails for names that are empty after
/// trimming.
pub fn normalize_name(raw: impl fmt::Display) -> Result<String> {
    let raw = raw.to_string();
    let normalized = raw.trim().to_lowercase();
    if normalized.is_empty() {
        return Err(BeanError::InvalidName { name: raw });
    }
    Ok(normalized)
}

/// The dotted parent of a name, if it has one.
///
/// Leading and trailing dots are ignored, so `".foo.bar."` has the parent
/// `"foo"` while `"foo."` and `".foo"` have none. Everything before the last
/// inner dot is kept verbatim: `"foo.bar..baz"` has the parent `"foo.bar."`.
pub fn parent_of(name: &str) -> Option<&str> {
    let inner = name.trim_matches('.');
    inner.rfind('.').map(|i| &inner[..i])
}

pub fn has_parent(name: &str) -> bool {
    parent_of(name).is_some()
}

// ------------- OriginalNames -------------
#[derive(Debug, Default, Clone)]
pub struct OriginalNames {
    // left: normalized name, right: the raw name it was first derived from
    kept: BiMap<String, String>,
}

impl OriginalNames {
    pub fn new() -> Self {
        Self { kept: BiMap::new() }
    }
    /// Records `raw` as the original of `normalized`, unless an original is
    /// already recorded. Returns whether the mapping was stored.
    pub fn set(&mut self, raw: &str, normalized: &str) -> bool {
        self.kept
            .insert_no_overwrite(normalized.to_string(), raw.to_string())
            .is_ok()
    }
    /// The recorded original of `name`, or `name` itself.
    pub fn get<'a>(&'a self, name: &'a str) -> &'a str {
        self.kept.get_by_left(name).map(String::as_str).unwrap_or(name)
    }
    /// The normalized name a raw name was recorded for.
    pub fn normalized_of(&self, raw: &str) -> Option<&str> {
        self.kept.get_by_right(raw).map(String::as_str)
    }
    pub fn unset(&mut self, normalized: &str) {
        self.kept.remove_by_left(normalized);
    }
    pub fn clear(&mut self) {
        self.kept.clear();
    }
    pub fn len(&self) -> usize {
        self.kept.len()
    }
    pub fn is_empty(&self) -> bool {
        self.kept.is_empty()
    }
}
