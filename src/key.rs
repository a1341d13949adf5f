//! Canonical keys for features and connectivity points.
//!
//! Keys are tuple-shaped strings, e.g. `(5,{A1B2})` for a feature and
//! `(5,{A1B2},1)` / `(9,{C3D4},0,0.5)` for a terminal and a via segment.
//! Embedded whitespace is always removed so that keys compare by value.
//!
//! Both types derive ordering and hashing so they can be used in sets/maps.

use crate::value::AttrValue;
use serde::Serialize;
use std::fmt;

const SEPARATOR: char = ',';

fn compose(parts: &[&AttrValue]) -> String {
    let mut out = String::from("(");
    for (i, part) in parts.iter().enumerate() {
        if i > 0 {
            out.push(SEPARATOR);
        }
        out.push_str(&part.to_string());
    }
    out.push(')');
    strip_whitespace(&out)
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Identity of one physical feature: `(networkSourceId, globalId)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct FeatureKey(String);

impl FeatureKey {
    pub fn new(source_id: &AttrValue, global_id: &AttrValue) -> Self {
        Self(compose(&[source_id, global_id]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A graph node: a feature terminal, a via segment, or any caller-supplied key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct NodeKey(String);

impl NodeKey {
    /// `(sourceId,globalId,terminalId)`
    pub fn terminal(source_id: &AttrValue, global_id: &AttrValue, terminal_id: &AttrValue) -> Self {
        Self(compose(&[source_id, global_id, terminal_id]))
    }

    /// `(sourceId,globalId,positionFrom,positionTo)`
    pub fn segment(
        source_id: &AttrValue,
        global_id: &AttrValue,
        position_from: &AttrValue,
        position_to: &AttrValue,
    ) -> Self {
        Self(compose(&[source_id, global_id, position_from, position_to]))
    }

    /// Wrap an arbitrary key string (whitespace is removed).
    pub fn from_raw(raw: impl AsRef<str>) -> Self {
        Self(strip_whitespace(raw.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Components between the outer parentheses.
    pub fn parts(&self) -> Vec<&str> {
        let inner = self.0.strip_prefix('(').unwrap_or(&self.0);
        let inner = inner.strip_suffix(')').unwrap_or(inner);
        inner.split(SEPARATOR).collect()
    }

    /// The `(sourceId,globalId)` prefix, regardless of terminal/position suffix.
    pub fn feature_key(&self) -> Option<FeatureKey> {
        match self.parts().as_slice() {
            [source, global, ..] => Some(FeatureKey(format!("({}{}{})", source, SEPARATOR, global))),
            _ => None,
        }
    }

    /// `(positionFrom, positionTo)` for via/segment keys.
    pub fn position_range(&self) -> Option<(f64, f64)> {
        match self.parts().as_slice() {
            [_, _, from, to] => Some((from.parse().ok()?, to.parse().ok()?)),
            _ => None,
        }
    }
}

impl From<&str> for NodeKey {
    fn from(raw: &str) -> Self {
        NodeKey::from_raw(raw)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
