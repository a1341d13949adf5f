//! Barrier and subnetwork-controller extraction over the feature map.

use crate::export::{FeatureMap, FeatureRecord};
use crate::key::{FeatureKey, NodeKey};

/// Asset group code of isolation devices (valves).
pub const ISOLATION_DEVICE_GROUP: i64 = 2;

/// Device status: 0 closed, 1 open. Exports carry it either as a field or as
/// a `P:` prefixed network attribute.
const DEVICE_STATUS_ATTRIBUTES: [&str; 2] = ["Device Status", "P:Device Status"];
const DEVICE_CLOSED: i64 = 0;

const SUBNETWORK_CONTROLLER_ATTRIBUTE: &str = "Is subnetwork controller";

fn has_terminals(record: &FeatureRecord) -> bool {
    record.terminal_ids.as_ref().is_some_and(|ids| !ids.is_empty())
}

fn device_status(record: &FeatureRecord) -> Option<i64> {
    DEVICE_STATUS_ATTRIBUTES
        .iter()
        .find_map(|name| record.attribute(name))
        .and_then(|value| value.as_i64())
}

/// Closed isolation devices that have at least one terminal, as feature keys.
pub fn extract_barriers(features: &FeatureMap) -> Vec<FeatureKey> {
    features
        .values()
        .filter(|record| record.asset_group_code.as_i64() == Some(ISOLATION_DEVICE_GROUP))
        .filter(|record| device_status(record) == Some(DEVICE_CLOSED))
        .filter(|record| has_terminals(record))
        .map(FeatureRecord::key)
        .collect()
}

/// Subnetwork controllers as `(sourceId,globalId,firstTerminalId)` node keys.
pub fn extract_controllers(features: &FeatureMap) -> Vec<NodeKey> {
    features
        .values()
        .filter(|record| {
            record
                .attribute(SUBNETWORK_CONTROLLER_ATTRIBUTE)
                .and_then(|value| value.as_i64())
                == Some(1)
        })
        .filter_map(|record| {
            let terminal = record.first_terminal_id()?;
            Some(NodeKey::terminal(
                &record.network_source_id,
                &record.global_id,
                terminal,
            ))
        })
        .collect()
}
