//! Graph model over connectivity keys.
//!
//! Traversals only need three capabilities: the node set, forward neighbors
//! and reverse neighbors. [`Graph`] exposes exactly that; the two variants
//! differ in how an added edge is recorded.

pub mod build;
pub mod directed;
pub mod undirected;

pub use build::build_graph;
pub use directed::DirectedGraph;
pub use undirected::UndirectedGraph;

use crate::key::NodeKey;
use indexmap::{IndexMap, IndexSet};

pub trait Graph {
    /// All nodes, in insertion order.
    fn nodes(&self) -> &IndexSet<NodeKey>;

    fn successors(&self, node: &NodeKey) -> &[NodeKey];

    /// Same as [`Graph::successors`] for undirected graphs.
    fn predecessors(&self, node: &NodeKey) -> &[NodeKey];

    fn is_directed(&self) -> bool;

    fn edge_count(&self) -> usize;

    fn node_count(&self) -> usize {
        self.nodes().len()
    }

    fn contains_node(&self, node: &NodeKey) -> bool {
        self.nodes().contains(node)
    }
}

/// Adjacency lists keyed by node; each list keeps first-insertion order.
pub(crate) type Adjacency = IndexMap<NodeKey, Vec<NodeKey>>;

pub(crate) fn neighbors_of<'a>(adjacency: &'a Adjacency, node: &NodeKey) -> &'a [NodeKey] {
    adjacency.get(node).map(Vec::as_slice).unwrap_or(&[])
}

/// Appends `to` to `from`'s list unless already present.
pub(crate) fn link(adjacency: &mut Adjacency, from: &NodeKey, to: &NodeKey) -> bool {
    let list = adjacency.entry(from.clone()).or_default();
    if list.contains(to) {
        return false;
    }
    list.push(to.clone());
    true
}

/// A graph whose variant is chosen when it is constructed.
#[derive(Debug, Clone)]
pub enum NetworkGraph {
    Undirected(UndirectedGraph),
    Directed(DirectedGraph),
}

impl NetworkGraph {
    pub fn new(directed: bool) -> Self {
        if directed {
            NetworkGraph::Directed(DirectedGraph::new())
        } else {
            NetworkGraph::Undirected(UndirectedGraph::new())
        }
    }

    pub fn add_node(&mut self, node: NodeKey) -> bool {
        match self {
            NetworkGraph::Undirected(g) => g.add_node(node),
            NetworkGraph::Directed(g) => g.add_node(node),
        }
    }

    pub fn add_edge(&mut self, from: NodeKey, to: NodeKey) -> bool {
        match self {
            NetworkGraph::Undirected(g) => g.add_edge(from, to),
            NetworkGraph::Directed(g) => g.add_edge(from, to),
        }
    }
}

impl Graph for NetworkGraph {
    fn nodes(&self) -> &IndexSet<NodeKey> {
        match self {
            NetworkGraph::Undirected(g) => g.nodes(),
            NetworkGraph::Directed(g) => g.nodes(),
        }
    }

    fn successors(&self, node: &NodeKey) -> &[NodeKey] {
        match self {
            NetworkGraph::Undirected(g) => g.successors(node),
            NetworkGraph::Directed(g) => g.successors(node),
        }
    }

    fn predecessors(&self, node: &NodeKey) -> &[NodeKey] {
        match self {
            NetworkGraph::Undirected(g) => g.predecessors(node),
            NetworkGraph::Directed(g) => g.predecessors(node),
        }
    }

    fn is_directed(&self) -> bool {
        matches!(self, NetworkGraph::Directed(_))
    }

    fn edge_count(&self) -> usize {
        match self {
            NetworkGraph::Undirected(g) => g.edge_count(),
            NetworkGraph::Directed(g) => g.edge_count(),
        }
    }
}
