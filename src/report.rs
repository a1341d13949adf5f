//! Analysis report: one parse pass, both extractors and the graph engine,
//! gathered into a single serializable value.

use crate::export::ParsedExport;
use crate::extract::{extract_barriers, extract_controllers};
use crate::graph::Graph;
use crate::key::{FeatureKey, NodeKey};
use crate::trace::{ForwardStar, ForwardStarOptions, downstream_trace, forward_star};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub summary: String,
    pub directed: bool,
    pub node_count: usize,
    pub edge_count: usize,

    pub barriers: Vec<FeatureKey>,
    pub controllers: Vec<NodeKey>,

    /// Nodes the traces were started from.
    pub starts: Vec<NodeKey>,
    pub downstream: Vec<NodeKey>,
    pub forward_star: Vec<ForwardStar>,
}

impl AnalysisReport {
    /// Parse summary followed by the barrier and controller counts.
    pub fn analysis_text(&self) -> String {
        format!(
            "{} Barriers #{} \n SubnetworkControllers #{}",
            self.summary,
            self.barriers.len(),
            self.controllers.len()
        )
    }
}

/// Run both traces over `graph`. Without explicit `starts`, the subnetwork
/// controllers are used.
pub fn build_report<G: Graph + ?Sized>(
    export: &ParsedExport,
    graph: &G,
    starts: Option<&[NodeKey]>,
    options: ForwardStarOptions,
) -> AnalysisReport {
    // 1) Predicates over the feature map.
    let barriers = extract_barriers(&export.features);
    let controllers = extract_controllers(&export.features);

    // 2) Start set.
    let starts: Vec<NodeKey> = match starts {
        Some(starts) => starts.to_vec(),
        None => controllers.clone(),
    };
    for start in starts.iter().filter(|start| !graph.contains_node(start)) {
        tracing::debug!(%start, "start node is not in the graph");
    }

    // 3) Traversals.
    let downstream = downstream_trace(graph, &starts);
    let forward_star = forward_star(&starts, graph, &barriers, options);

    AnalysisReport {
        summary: export.summary.clone(),
        directed: graph.is_directed(),
        node_count: graph.node_count(),
        edge_count: graph.edge_count(),
        barriers,
        controllers,
        starts,
        downstream,
        forward_star,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::{ParseOptions, parse_export};
    use crate::graph::build_graph;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    // controller (1,sub,1) -> pipe -> closed valve (4,v,1) | (4,v,2) -> pipe2 -> (1,far,1)
    fn export() -> ParsedExport {
        let doc = json!({
            "featureElements": [
                {"networkSourceId": 1, "globalId": "sub", "assetGroupCode": 1, "terminalId": 1,
                 "networkAttributeValues": [{"Is subnetwork controller": 1}]},
                {"networkSourceId": 4, "globalId": "v", "assetGroupCode": 2, "terminalId": 1,
                 "networkAttributeValues": [{"Device Status": 0}]},
                {"networkSourceId": 4, "globalId": "v", "assetGroupCode": 2, "terminalId": 2,
                 "networkAttributeValues": [{"Device Status": 0}]}
            ],
            "connectivity": [
                {"fromNetworkSourceId": 1, "fromGlobalId": "sub", "fromTerminalId": 1,
                 "toNetworkSourceId": 4, "toGlobalId": "v", "toTerminalId": 1,
                 "viaNetworkSourceId": 9, "viaGlobalId": "pipe", "viaPositionFrom": 0, "viaPositionTo": 1},
                {"fromNetworkSourceId": 4, "fromGlobalId": "v", "fromTerminalId": 2,
                 "toNetworkSourceId": 1, "toGlobalId": "far", "toTerminalId": 1,
                 "viaNetworkSourceId": 9, "viaGlobalId": "pipe2", "viaPositionFrom": 0, "viaPositionTo": 1}
            ]
        });
        let bytes = serde_json::to_vec(&doc).unwrap();
        parse_export(bytes.as_slice(), &ParseOptions::default()).unwrap()
    }

    #[test]
    fn report_starts_from_controllers() {
        let export = export();
        let graph = build_graph(&export.connectivity, false);
        let report = build_report(&export, &graph, None, ForwardStarOptions::default());

        assert_eq!(report.barriers.len(), 1);
        assert_eq!(report.starts, vec![NodeKey::from("(1,sub,1)")]);
        assert_eq!(report.forward_star.len(), 1);

        let star = &report.forward_star[0];
        assert_eq!(star.result, vec![NodeKey::from("(9,pipe,0,1)")]);
        assert_eq!(star.barriers, vec![NodeKey::from("(4,v,1)")]);

        // Downstream ignores barriers.
        assert!(report.downstream.contains(&NodeKey::from("(4,v,1)")));
        assert!(!report.downstream.contains(&NodeKey::from("(1,far,1)")));
    }

    #[test]
    fn explicit_starts_override_controllers() {
        let export = export();
        let graph = build_graph(&export.connectivity, false);
        let starts = [NodeKey::from("(1,far,1)")];
        let report = build_report(&export, &graph, Some(&starts), ForwardStarOptions::default());

        assert_eq!(report.starts, starts.to_vec());
        assert_eq!(report.controllers.len(), 1);
        assert_eq!(report.forward_star[0].barriers, vec![NodeKey::from("(4,v,2)")]);
    }

    #[test]
    fn analysis_text_appends_counts() {
        let export = export();
        let graph = build_graph(&export.connectivity, true);
        let report = build_report(&export, &graph, None, ForwardStarOptions::default());

        assert!(report.directed);
        let text = report.analysis_text();
        assert!(text.starts_with("Feature elements #3"));
        assert!(text.ends_with("Barriers #1 \n SubnetworkControllers #1"));
    }
}
