use crate::graph::{Adjacency, Graph, link, neighbors_of};
use crate::key::NodeKey;
use indexmap::IndexSet;

/// One symmetric adjacency store: adding `(u, v)` links both ways.
#[derive(Debug, Clone, Default)]
pub struct UndirectedGraph {
    nodes: IndexSet<NodeKey>,
    adjacency: Adjacency,
    edges: usize,
}

impl UndirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` if the node was already present.
    pub fn add_node(&mut self, node: NodeKey) -> bool {
        if !self.nodes.insert(node.clone()) {
            return false;
        }
        self.adjacency.entry(node).or_default();
        true
    }

    /// Returns `false` if the edge (in either orientation) was already present.
    pub fn add_edge(&mut self, from: NodeKey, to: NodeKey) -> bool {
        self.add_node(from.clone());
        self.add_node(to.clone());

        let added = link(&mut self.adjacency, &from, &to);
        link(&mut self.adjacency, &to, &from);
        if added {
            self.edges += 1;
        }
        added
    }

    pub fn neighbors(&self, node: &NodeKey) -> &[NodeKey] {
        neighbors_of(&self.adjacency, node)
    }
}

impl Graph for UndirectedGraph {
    fn nodes(&self) -> &IndexSet<NodeKey> {
        &self.nodes
    }

    fn successors(&self, node: &NodeKey) -> &[NodeKey] {
        self.neighbors(node)
    }

    fn predecessors(&self, node: &NodeKey) -> &[NodeKey] {
        self.neighbors(node)
    }

    fn is_directed(&self) -> bool {
        false
    }

    fn edge_count(&self) -> usize {
        self.edges
    }
}
