//! Record shapes as they appear in the export's arrays.
//!
//! Every field is optional in practice, so all structs default. Ids and
//! positions stay as [`AttrValue`] because the export mixes integers,
//! floats and strings for them.

use crate::value::AttrValue;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFeature {
    pub network_source_id: AttrValue,
    pub network_source_name: Option<String>,
    pub asset_group_code: AttrValue,
    pub asset_group_name: Option<String>,
    pub asset_type_code: AttrValue,
    pub asset_type_name: Option<String>,
    pub object_id: AttrValue,
    pub global_id: AttrValue,
    pub terminal_id: Option<AttrValue>,
    pub terminal_name: Option<AttrValue>,

    /// `{x, y, z}` for junctions, a line segment for edges.
    pub geometry: Option<Value>,
    pub position_from: Option<AttrValue>,
    pub position_to: Option<AttrValue>,

    pub field_values: Option<Vec<RawFieldValue>>,

    /// Each entry is a single-property object: `{"Device Status": 0}`.
    pub network_attribute_values: Option<Vec<IndexMap<String, AttrValue>>>,
    pub network_attribute_descriptions: Option<Vec<IndexMap<String, AttrValue>>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFieldValue {
    pub field_name: String,
    pub value: AttrValue,
    pub description: Option<AttrValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawConnectivity {
    pub from_network_source_id: AttrValue,
    pub from_global_id: AttrValue,
    pub from_terminal_id: AttrValue,
    pub from_geometry: Option<Value>,

    pub to_network_source_id: AttrValue,
    pub to_global_id: AttrValue,
    pub to_terminal_id: AttrValue,
    pub to_geometry: Option<Value>,

    pub via_network_source_id: AttrValue,
    pub via_global_id: AttrValue,
    pub via_position_from: AttrValue,
    pub via_position_to: AttrValue,
    pub via_geometry: Option<Value>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAssociation {
    pub from_network_source_id: AttrValue,
    pub from_global_id: AttrValue,
    pub to_network_source_id: AttrValue,
    pub to_global_id: AttrValue,
    pub association_type: AttrValue,
}
