//! Export parsing: turns a subnetwork trace export into canonical maps.

pub mod associations;
pub mod connectivity;
pub mod features;
pub mod parse;
pub mod raw;

pub use associations::{Association, AssociationMap, AssociationMode};
pub use connectivity::ConnectivityMap;
pub use features::{FeatureMap, FeatureRecord, LineMap, LineSegment, PointMap};
pub use parse::{ParseOptions, parse_export};

use crate::key::NodeKey;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

/// Network source id -> source name.
pub type SourceMapping = IndexMap<i64, String>;

/// Summary count with thousands separators: `1234567` -> `1,234,567`.
pub(crate) fn grouped(count: usize) -> String {
    let digits = count.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(digit);
    }
    out
}

/// Everything produced by one parse pass.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedExport {
    pub features: FeatureMap,
    pub points: PointMap,
    pub lines: LineMap,
    pub connectivity: ConnectivityMap,
    pub associations: AssociationMap,

    pub connectivity_geometries: IndexMap<NodeKey, Value>,
    pub source_mapping: SourceMapping,

    /// Passed through uninterpreted.
    pub controllers: Vec<Value>,
    pub result_types: Vec<Value>,

    /// Multi-line, human readable counts for each pass.
    pub summary: String,
}
