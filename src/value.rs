//! Attribute values carried by exported feature records.
//!
//! The export is loosely typed: ids may be integers or strings, positions are
//! floats, attribute values are whatever the source field held. Everything is
//! folded into [`AttrValue`] at the serde boundary so the rest of the crate
//! works with a closed set of shapes.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(untagged)]
pub enum AttrValue {
    #[default]
    Absent,
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Integer view of the value. Whole floats and numeric text convert;
    /// anything else yields `None`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            AttrValue::Int(i) => Some(*i),
            AttrValue::Float(f) if f.fract() == 0.0 && f.is_finite() => Some(*f as i64),
            AttrValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttrValue::Int(i) => Some(*i as f64),
            AttrValue::Float(f) => Some(*f),
            AttrValue::Text(s) => s.trim().parse().ok(),
            _ => None,
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => AttrValue::Absent,
            Value::Bool(b) => AttrValue::Int(i64::from(b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => AttrValue::Int(i),
                None => n.as_f64().map(AttrValue::Float).unwrap_or_default(),
            },
            Value::String(s) => AttrValue::Text(s),
            Value::Array(items) => AttrValue::List(items.into_iter().map(AttrValue::from).collect()),
            // Nested objects have no attribute meaning; keep their JSON text.
            Value::Object(_) => AttrValue::Text(value.to_string()),
        }
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl<'de> Deserialize<'de> for AttrValue {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(AttrValue::from)
    }
}

/// Text rendering used when building keys: absent is empty, floats print
/// without a trailing `.0`, lists are bracketed.
impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Absent => Ok(()),
            AttrValue::Int(i) => write!(f, "{}", i),
            AttrValue::Float(x) => write!(f, "{}", x),
            AttrValue::Text(s) => f.write_str(s),
            AttrValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
        }
    }
}
