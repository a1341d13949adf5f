use crate::export::ConnectivityMap;
use crate::graph::{Graph, NetworkGraph};
use tracing::debug;

/// Build a graph from the connectivity adjacency: every endpoint and via key
/// becomes a node, every `(endpoint, via)` pair an edge.
pub fn build_graph(adjacency: &ConnectivityMap, directed: bool) -> NetworkGraph {
    let mut graph = NetworkGraph::new(directed);

    for (origin, vias) in adjacency {
        graph.add_node(origin.clone());
        for via in vias {
            graph.add_edge(origin.clone(), via.clone());
        }
    }

    debug!(
        directed,
        nodes = graph.node_count(),
        edges = graph.edge_count(),
        "built network graph"
    );
    graph
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::NodeKey;
    use pretty_assertions::assert_eq;

    fn key(s: &str) -> NodeKey {
        NodeKey::from(s)
    }

    fn adjacency() -> ConnectivityMap {
        let mut map = ConnectivityMap::new();
        map.insert(key("(5,a,1)"), vec![key("(9,e,0,1)")]);
        map.insert(key("(5,b,1)"), vec![key("(9,e,0,1)"), key("(9,f,0,1)")]);
        map.insert(key("(5,lonely,1)"), vec![]);
        map
    }

    #[test]
    fn node_set_covers_origins_and_vias_once() {
        let graph = build_graph(&adjacency(), false);
        let nodes: Vec<&str> = graph.nodes().iter().map(NodeKey::as_str).collect();
        assert_eq!(
            nodes,
            vec!["(5,a,1)", "(9,e,0,1)", "(5,b,1)", "(9,f,0,1)", "(5,lonely,1)"]
        );
        assert_eq!(graph.edge_count(), 3);
    }

    #[test]
    fn undirected_build_links_vias_back() {
        let graph = build_graph(&adjacency(), false);
        assert!(!graph.is_directed());
        assert_eq!(
            graph.successors(&key("(9,e,0,1)")),
            &[key("(5,a,1)"), key("(5,b,1)")]
        );
    }

    #[test]
    fn directed_build_points_endpoints_at_vias() {
        let graph = build_graph(&adjacency(), true);
        assert!(graph.is_directed());
        assert!(graph.successors(&key("(9,e,0,1)")).is_empty());
        assert_eq!(
            graph.predecessors(&key("(9,e,0,1)")),
            &[key("(5,a,1)"), key("(5,b,1)")]
        );
    }
}
