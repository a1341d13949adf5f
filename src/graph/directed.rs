use crate::graph::{Adjacency, Graph, link, neighbors_of};
use crate::key::NodeKey;
use indexmap::IndexSet;

/// Forward and reverse adjacency stores: adding `(u, v)` records `v` as a
/// successor of `u` and `u` as a predecessor of `v`, nothing else.
#[derive(Debug, Clone, Default)]
pub struct DirectedGraph {
    nodes: IndexSet<NodeKey>,
    forward: Adjacency,
    reverse: Adjacency,
    edges: usize,
}

impl DirectedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_node(&mut self, node: NodeKey) -> bool {
        if !self.nodes.insert(node.clone()) {
            return false;
        }
        self.forward.entry(node.clone()).or_default();
        self.reverse.entry(node).or_default();
        true
    }

    pub fn add_edge(&mut self, from: NodeKey, to: NodeKey) -> bool {
        self.add_node(from.clone());
        self.add_node(to.clone());

        let added = link(&mut self.forward, &from, &to);
        if added {
            link(&mut self.reverse, &to, &from);
            self.edges += 1;
        }
        added
    }
}

impl Graph for DirectedGraph {
    fn nodes(&self) -> &IndexSet<NodeKey> {
        &self.nodes
    }

    fn successors(&self, node: &NodeKey) -> &[NodeKey] {
        neighbors_of(&self.forward, node)
    }

    fn predecessors(&self, node: &NodeKey) -> &[NodeKey] {
        neighbors_of(&self.reverse, node)
    }

    fn is_directed(&self) -> bool {
        true
    }

    fn edge_count(&self) -> usize {
        self.edges
    }
}
