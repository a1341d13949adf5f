//! Connectivity processing: from/to terminals joined through a via element.

use crate::export::grouped;
use crate::export::raw::RawConnectivity;
use crate::key::NodeKey;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt::Write as _;

/// Endpoint key -> via keys reachable from it, in first-seen order.
pub type ConnectivityMap = IndexMap<NodeKey, Vec<NodeKey>>;

#[derive(Debug, Clone, Default)]
pub struct ConnectivityTables {
    pub adjacency: ConnectivityMap,
    pub geometries: IndexMap<NodeKey, Value>,
    pub summary: String,
}

pub fn process_connectivity(records: &[RawConnectivity]) -> ConnectivityTables {
    let mut adjacency = ConnectivityMap::new();
    let mut geometries: IndexMap<NodeKey, Value> = IndexMap::new();

    let mut summary = String::new();
    let _ = writeln!(summary, "Connectivity elements #{}", grouped(records.len()));

    for record in records {
        let from_key = NodeKey::terminal(
            &record.from_network_source_id,
            &record.from_global_id,
            &record.from_terminal_id,
        );
        let to_key = NodeKey::terminal(
            &record.to_network_source_id,
            &record.to_global_id,
            &record.to_terminal_id,
        );
        let via_key = NodeKey::segment(
            &record.via_network_source_id,
            &record.via_global_id,
            &record.via_position_from,
            &record.via_position_to,
        );

        // Both endpoints reach the via element.
        for endpoint in [&from_key, &to_key] {
            let vias = adjacency.entry(endpoint.clone()).or_default();
            if !vias.contains(&via_key) {
                vias.push(via_key.clone());
            }
        }

        let captured = [
            (from_key, &record.from_geometry),
            (to_key, &record.to_geometry),
            (via_key, &record.via_geometry),
        ];
        for (key, geometry) in captured {
            if let Some(geometry) = geometry {
                geometries.insert(key, geometry.clone());
            }
        }
    }

    let _ = writeln!(summary, "Unique connections #{}", grouped(adjacency.len()));
    let _ = writeln!(summary, "Connectivity geometries #{}", grouped(geometries.len()));

    ConnectivityTables {
        adjacency,
        geometries,
        summary,
    }
}
