//! Feature element processing.
//!
//! The export repeats a feature once per terminal and once per edge segment.
//! This pass folds those repeats into one [`FeatureRecord`] per
//! [`FeatureKey`], collecting terminals and geometry on the way.

use crate::export::{SourceMapping, grouped};
use crate::export::raw::RawFeature;
use crate::key::{FeatureKey, NodeKey};
use crate::value::AttrValue;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Write as _;
use tracing::debug;

/// Source name used when a record has none and the mapping has no entry.
pub const SYSTEM_JUNCTION: &str = "System Junction";

pub type FeatureMap = IndexMap<FeatureKey, FeatureRecord>;
pub type PointMap = IndexMap<FeatureKey, [f64; 3]>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureRecord {
    pub network_source_id: AttrValue,
    pub network_source_name: String,
    pub asset_group_code: AttrValue,
    pub asset_group_name: Option<String>,
    pub asset_type_code: AttrValue,
    pub asset_type_name: Option<String>,
    pub object_id: AttrValue,
    pub global_id: AttrValue,
    pub terminal_ids: Option<Vec<AttrValue>>,
    pub terminal_names: Option<Vec<AttrValue>>,

    /// Field values and network attributes; descriptions live under `<name>_Desc`.
    pub attributes: IndexMap<String, AttrValue>,
}

impl FeatureRecord {
    fn from_raw(raw: &RawFeature) -> Self {
        Self {
            network_source_id: raw.network_source_id.clone(),
            asset_group_code: raw.asset_group_code.clone(),
            asset_type_code: raw.asset_type_code.clone(),
            object_id: raw.object_id.clone(),
            global_id: raw.global_id.clone(),
            ..Self::default()
        }
    }

    pub fn key(&self) -> FeatureKey {
        FeatureKey::new(&self.network_source_id, &self.global_id)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn first_terminal_id(&self) -> Option<&AttrValue> {
        self.terminal_ids.as_ref().and_then(|ids| ids.first())
    }
}

/// One edge segment's geometry and where it starts along the edge.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineSegment {
    pub position_from: f64,
    pub geometry: Value,
}

/// Line geometries, either grouped per feature for later stitching or kept
/// as individual segments keyed by their full position range.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum LineMap {
    Stitched(IndexMap<FeatureKey, Vec<LineSegment>>),
    Segments(IndexMap<NodeKey, Value>),
}

impl Default for LineMap {
    fn default() -> Self {
        LineMap::Stitched(IndexMap::new())
    }
}

impl LineMap {
    pub fn len(&self) -> usize {
        match self {
            LineMap::Stitched(m) => m.len(),
            LineMap::Segments(m) => m.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureTables {
    pub features: FeatureMap,
    pub points: PointMap,
    pub lines: LineMap,
    pub summary: String,
}

pub fn process_features(
    records: &[RawFeature],
    source_mapping: &SourceMapping,
    stitch_geometries: bool,
) -> FeatureTables {
    let mut features = FeatureMap::new();
    let mut points = PointMap::new();
    let mut lines = if stitch_geometries {
        LineMap::Stitched(IndexMap::new())
    } else {
        LineMap::Segments(IndexMap::new())
    };

    let mut summary = String::new();
    let _ = writeln!(summary, "Feature elements #{}", grouped(records.len()));

    let terminal_records: Vec<&RawFeature> =
        records.iter().filter(|r| r.terminal_id.is_some()).collect();
    let unique_terminal_devices: HashSet<FeatureKey> = terminal_records
        .iter()
        .map(|r| FeatureKey::new(&r.network_source_id, &r.global_id))
        .collect();
    let _ = writeln!(
        summary,
        "Duplicate entries for terminal devices #{}",
        grouped(terminal_records.len() - unique_terminal_devices.len())
    );

    for raw in records {
        let key = FeatureKey::new(&raw.network_source_id, &raw.global_id);

        // 1) Decide which record this element contributes to.
        let mut record = if let Some(terminal_id) = &raw.terminal_id {
            if let Some(existing) = features.get_mut(&key) {
                // Repeat terminal: only the terminal lists grow.
                existing
                    .terminal_ids
                    .get_or_insert_with(Vec::new)
                    .push(terminal_id.clone());
                if let Some(name) = &raw.terminal_name {
                    existing
                        .terminal_names
                        .get_or_insert_with(Vec::new)
                        .push(name.clone());
                }
                continue;
            }
            let mut record = FeatureRecord::from_raw(raw);
            record.terminal_ids = Some(vec![terminal_id.clone()]);
            record.terminal_names = raw.terminal_name.clone().map(|name| vec![name]);
            record
        } else if let Some(existing) = features.get(&key) {
            if raw.position_from.is_none() {
                debug!(feature = %key, "skipping repeated feature element");
                continue;
            }
            // Another segment of a known edge: keep the captured attributes.
            existing.clone()
        } else {
            FeatureRecord::from_raw(raw)
        };

        // 2) Source names.
        if let Some(name) = &raw.network_source_name {
            record.network_source_name = name.clone();
            record.asset_group_name = raw.asset_group_name.clone();
            record.asset_type_name = raw.asset_type_name.clone();
        } else {
            record.network_source_name = raw
                .network_source_id
                .as_i64()
                .and_then(|id| source_mapping.get(&id))
                .cloned()
                .unwrap_or_else(|| SYSTEM_JUNCTION.to_string());
        }

        // 3) Geometry.
        if let Some(geometry) = &raw.geometry {
            if geometry.get("x").is_some() {
                match point_coordinates(geometry) {
                    Some(point) => {
                        points.insert(key.clone(), point);
                    }
                    None => debug!(feature = %key, "skipping point with non-numeric coordinates"),
                }
            } else if let Some(position_from) = &raw.position_from {
                match &mut lines {
                    LineMap::Stitched(by_feature) => match position_from.as_f64() {
                        Some(position_from) => {
                            by_feature.entry(key.clone()).or_default().push(LineSegment {
                                position_from,
                                geometry: geometry.clone(),
                            });
                        }
                        None => debug!(
                            feature = %key,
                            position = %position_from,
                            "skipping segment with non-numeric position"
                        ),
                    },
                    LineMap::Segments(by_segment) => {
                        let segment_key = NodeKey::segment(
                            &raw.network_source_id,
                            &raw.global_id,
                            position_from,
                            raw.position_to.as_ref().unwrap_or(&AttrValue::Absent),
                        );
                        by_segment.insert(segment_key, geometry.clone());
                    }
                }
            }
        }

        // 4) Attributes.
        for field in raw.field_values.iter().flatten() {
            record
                .attributes
                .insert(field.field_name.clone(), field.value.clone());
            if let Some(description) = &field.description {
                record
                    .attributes
                    .insert(format!("{}_Desc", field.field_name), description.clone());
            }
        }
        for attribute in raw.network_attribute_values.iter().flatten() {
            for (name, value) in attribute {
                record.attributes.insert(name.clone(), value.clone());
            }
        }
        for attribute in raw.network_attribute_descriptions.iter().flatten() {
            for (name, value) in attribute {
                record.attributes.insert(format!("{}_Desc", name), value.clone());
            }
        }

        features.insert(key, record);
    }

    let duplicate_percent = if records.is_empty() {
        0.0
    } else {
        (records.len() - features.len()) as f64 / records.len() as f64 * 100.0
    };
    let _ = writeln!(
        summary,
        "Unique feature elements #{} ({:.2}%duplicate)",
        grouped(features.len()),
        duplicate_percent
    );
    let _ = writeln!(summary, "Unique points #{}", grouped(points.len()));
    let _ = writeln!(summary, "Unique lines #{}", grouped(lines.len()));

    FeatureTables {
        features,
        points,
        lines,
        summary,
    }
}

/// `None` unless all of `x`, `y` and `z` are numbers.
fn point_coordinates(geometry: &Value) -> Option<[f64; 3]> {
    let coord = |axis: &str| geometry.get(axis).and_then(Value::as_f64);
    Some([coord("x")?, coord("y")?, coord("z")?])
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn records(value: Value) -> Vec<RawFeature> {
        serde_json::from_value(value).unwrap()
    }

    fn key(source: i64, global: &str) -> FeatureKey {
        FeatureKey::new(&source.into(), &global.into())
    }

    #[test]
    fn single_point_feature() {
        let input = records(json!([
            {"networkSourceId": 5, "globalId": "g1", "geometry": {"x": 1.0, "y": 2.0, "z": 0.0}}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), true);

        assert_eq!(tables.features.len(), 1);
        assert_eq!(tables.points.get(&key(5, "g1")), Some(&[1.0, 2.0, 0.0]));
        assert!(tables.summary.contains("Feature elements #1"));
        assert!(tables.summary.contains("Unique feature elements #1 (0.00%duplicate)"));
        assert!(tables.summary.contains("Unique points #1"));
    }

    #[test]
    fn repeated_terminals_append_without_recopying_attributes() {
        let input = records(json!([
            {"networkSourceId": 7, "globalId": "d1", "terminalId": 1, "terminalName": "High",
             "fieldValues": [{"fieldName": "Label", "value": "first"}]},
            {"networkSourceId": 7, "globalId": "d1", "terminalId": 2, "terminalName": "Low",
             "fieldValues": [{"fieldName": "Label", "value": "second"}]}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), true);

        let record = &tables.features[&key(7, "d1")];
        assert_eq!(record.terminal_ids, Some(vec![AttrValue::Int(1), AttrValue::Int(2)]));
        assert_eq!(
            record.terminal_names,
            Some(vec![AttrValue::from("High"), AttrValue::from("Low")])
        );
        assert_eq!(record.attribute("Label"), Some(&AttrValue::from("first")));
        assert!(tables.summary.contains("Duplicate entries for terminal devices #1"));
    }

    #[test]
    fn repeated_plain_record_is_skipped() {
        let input = records(json!([
            {"networkSourceId": 3, "globalId": "j1", "objectId": 10},
            {"networkSourceId": 3, "globalId": "j1", "objectId": 11}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), true);

        assert_eq!(tables.features.len(), 1);
        assert_eq!(tables.features[&key(3, "j1")].object_id, AttrValue::Int(10));
        assert!(tables.summary.contains("(50.00%duplicate)"));
    }

    #[test]
    fn stitched_segments_collect_under_feature_key() {
        let input = records(json!([
            {"networkSourceId": 9, "globalId": "e1", "positionFrom": 0.0, "positionTo": 0.5,
             "geometry": {"paths": [[[0, 0], [1, 1]]]}, "fieldValues": [{"fieldName": "Material", "value": "PVC"}]},
            {"networkSourceId": 9, "globalId": "e1", "positionFrom": 0.5, "positionTo": 1.0,
             "geometry": {"paths": [[[1, 1], [2, 2]]]}}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), true);

        assert_eq!(tables.features.len(), 1);
        assert_eq!(
            tables.features[&key(9, "e1")].attribute("Material"),
            Some(&AttrValue::from("PVC"))
        );
        let LineMap::Stitched(lines) = &tables.lines else {
            panic!("expected stitched lines");
        };
        let positions: Vec<f64> = lines[&key(9, "e1")].iter().map(|s| s.position_from).collect();
        assert_eq!(positions, vec![0.0, 0.5]);
    }

    #[test]
    fn later_segment_overwrites_attributes_but_keeps_identity() {
        let input = records(json!([
            {"networkSourceId": 9, "globalId": "e1", "objectId": 30, "positionFrom": 0.0,
             "positionTo": 0.5, "geometry": {"paths": []},
             "fieldValues": [{"fieldName": "Material", "value": "PVC"}]},
            {"networkSourceId": 9, "globalId": "e1", "objectId": 31, "positionFrom": 0.5,
             "positionTo": 1.0, "geometry": {"paths": []},
             "fieldValues": [{"fieldName": "Material", "value": "Steel"}]}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), true);

        let record = &tables.features[&key(9, "e1")];
        assert_eq!(record.attribute("Material"), Some(&AttrValue::from("Steel")));
        assert_eq!(record.object_id, AttrValue::Int(30));
    }

    #[test]
    fn point_with_missing_coordinate_is_not_stored() {
        let input = records(json!([
            {"networkSourceId": 5, "globalId": "g1", "geometry": {"x": 3}},
            {"networkSourceId": 5, "globalId": "g2", "geometry": {"x": 1, "y": "n/a", "z": 0}}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), true);

        assert_eq!(tables.features.len(), 2);
        assert!(tables.points.is_empty());
        assert!(tables.summary.contains("Unique points #0"));
    }

    #[test]
    fn stitched_segment_with_text_position_is_not_stored() {
        let input = records(json!([
            {"networkSourceId": 9, "globalId": "e1", "positionFrom": "start", "positionTo": 0.5,
             "geometry": {"paths": []}},
            {"networkSourceId": 9, "globalId": "e1", "positionFrom": "0.5", "positionTo": 1,
             "geometry": {"paths": []}}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), true);

        let LineMap::Stitched(lines) = &tables.lines else {
            panic!("expected stitched lines");
        };
        let positions: Vec<f64> = lines[&key(9, "e1")].iter().map(|s| s.position_from).collect();
        assert_eq!(positions, vec![0.5]);
    }

    #[test]
    fn unstitched_segments_keyed_by_position_range() {
        let input = records(json!([
            {"networkSourceId": 9, "globalId": "e1", "positionFrom": 0, "positionTo": 0.5,
             "geometry": {"paths": []}},
            {"networkSourceId": 9, "globalId": "e1", "positionFrom": 0.5, "positionTo": 1,
             "geometry": {"paths": []}}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), false);

        let LineMap::Segments(lines) = &tables.lines else {
            panic!("expected individual segments");
        };
        let keys: Vec<&str> = lines.keys().map(NodeKey::as_str).collect();
        assert_eq!(keys, vec!["(9,e1,0,0.5)", "(9,e1,0.5,1)"]);
        assert!(tables.summary.contains("Unique lines #2"));
    }

    #[test]
    fn source_name_falls_back_to_mapping_then_system_junction() {
        let mut mapping = SourceMapping::new();
        mapping.insert(4, "Water Device".to_string());
        let input = records(json!([
            {"networkSourceId": 4, "globalId": "a"},
            {"networkSourceId": 1, "globalId": "b"},
            {"networkSourceId": 4, "globalId": "c", "networkSourceName": "Explicit",
             "assetGroupName": "Valve", "assetTypeName": "Gate"}
        ]));
        let tables = process_features(&input, &mapping, true);

        assert_eq!(tables.features[&key(4, "a")].network_source_name, "Water Device");
        assert_eq!(tables.features[&key(1, "b")].network_source_name, SYSTEM_JUNCTION);
        let explicit = &tables.features[&key(4, "c")];
        assert_eq!(explicit.network_source_name, "Explicit");
        assert_eq!(explicit.asset_group_name.as_deref(), Some("Valve"));
    }

    #[test]
    fn attributes_and_descriptions_merge() {
        let input = records(json!([
            {"networkSourceId": 4, "globalId": "v1",
             "fieldValues": [{"fieldName": "Lifecycle", "value": 2, "description": "In Service"}],
             "networkAttributeValues": [{"Device Status": 0}, {"Is subnetwork controller": 0}],
             "networkAttributeDescriptions": [{"Device Status": "Closed"}]}
        ]));
        let tables = process_features(&input, &SourceMapping::new(), true);

        let attributes = &tables.features[&key(4, "v1")].attributes;
        assert_eq!(attributes.get("Lifecycle"), Some(&AttrValue::Int(2)));
        assert_eq!(attributes.get("Lifecycle_Desc"), Some(&AttrValue::from("In Service")));
        assert_eq!(attributes.get("Device Status"), Some(&AttrValue::Int(0)));
        assert_eq!(attributes.get("Device Status_Desc"), Some(&AttrValue::from("Closed")));
    }

    #[test]
    fn empty_input_reports_zero_duplicates() {
        let tables = process_features(&[], &SourceMapping::new(), true);
        assert!(tables.features.is_empty());
        assert!(tables.summary.contains("Unique feature elements #0 (0.00%duplicate)"));
    }
}
