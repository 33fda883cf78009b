//! Wildcard path resolution.
//!
//! A pattern is a dot-separated list of segments where `*` matches every
//! enumerable key of a container and anything else is looked up literally.
//! Resolution keeps a frontier of `(concrete path, value)` pairs and narrows
//! it one segment at a time, so a pattern never matches deeper than it is
//! long.

use tracing::trace;

use crate::container::Traversable;
use crate::value::{Map, Value};

pub const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'p> {
    Wildcard,
    Literal(&'p str),
}

impl<'p> Segment<'p> {
    pub fn parse(segment: &'p str) -> Self {
        if segment == WILDCARD {
            Segment::Wildcard
        } else {
            Segment::Literal(segment)
        }
    }
}

pub fn segments(pattern: &str) -> Vec<Segment<'_>> {
    pattern.split('.').map(Segment::parse).collect()
}

pub fn has_wildcard(pattern: &str) -> bool {
    pattern.split('.').any(|segment| segment == WILDCARD)
}

/// Every concrete path matching `pattern` under `root`, with its value.
///
/// Misses are dropped silently and an empty pattern matches nothing. When two
/// expansions reach the same path, the first one wins.
pub fn resolve<C: Traversable + ?Sized>(root: &C, pattern: &str) -> Map {
    let mut matches = Map::new();
    if pattern.is_empty() {
        return matches;
    }
    let mut segments = segments(pattern).into_iter();
    let Some(first) = segments.next() else {
        return matches;
    };

    let mut frontier: Vec<(String, Value)> = match first {
        Segment::Literal(key) => root
            .value_at(key)
            .map(|value| vec![(key.to_string(), value)])
            .unwrap_or_default(),
        Segment::Wildcard => root
            .keys()
            .into_iter()
            .filter_map(|key| root.value_at(&key).map(|value| (key, value)))
            .collect(),
    };

    for segment in segments {
        if frontier.is_empty() {
            break;
        }
        frontier = expand(frontier, segment);
    }

    for (path, value) in frontier {
        matches.insert_if_absent(path, value);
    }
    trace!(pattern, matches = matches.len(), "resolved wildcard pattern");
    matches
}

fn expand(frontier: Vec<(String, Value)>, segment: Segment) -> Vec<(String, Value)> {
    let mut next = Vec::new();
    for (prefix, container) in frontier {
        match segment {
            Segment::Literal(key) => {
                if let Some(value) = container.value_at(key) {
                    next.push((format!("{}.{}", prefix, key), value));
                }
            }
            Segment::Wildcard => {
                for key in container.keys() {
                    if let Some(value) = container.value_at(&key) {
                        next.push((format!("{}.{}", prefix, key), value));
                    }
                }
            }
        }
    }
    next
}
