//! Traversals over a [`Graph`]: reachability, barrier-aware forward star and
//! shortest path. All of them use explicit work lists, never recursion.

use crate::error::TraceError;
use crate::graph::Graph;
use crate::key::{FeatureKey, NodeKey};
use indexmap::IndexSet;
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};

/// Every node of the graph, in insertion order.
pub fn all_nodes<G: Graph + ?Sized>(graph: &G) -> Vec<NodeKey> {
    graph.nodes().iter().cloned().collect()
}

/// Nodes reachable through successors from any start, starts included.
pub fn downstream_trace<G: Graph + ?Sized>(graph: &G, starts: &[NodeKey]) -> Vec<NodeKey> {
    reachable(starts, |node| graph.successors(node))
}

/// Nodes reachable through predecessors from any start, starts included.
pub fn upstream_trace<G: Graph + ?Sized>(graph: &G, starts: &[NodeKey]) -> Vec<NodeKey> {
    reachable(starts, |node| graph.predecessors(node))
}

// The visited mark goes on the node being expanded, not on the neighbor
// being pushed, so a neighbor may sit on the stack more than once. Results
// are unaffected; only the amount of re-expansion differs.
fn reachable<'g, F>(starts: &[NodeKey], neighbors: F) -> Vec<NodeKey>
where
    F: Fn(&NodeKey) -> &'g [NodeKey],
{
    let mut results: IndexSet<NodeKey> = starts.iter().cloned().collect();
    let mut visited: HashSet<NodeKey> = results.iter().cloned().collect();
    let mut pending: Vec<NodeKey> = results.iter().cloned().collect();

    while let Some(node) = pending.pop() {
        for next in neighbors(&node) {
            if !results.contains(next) {
                results.insert(next.clone());
            }
            if !visited.contains(next) {
                pending.push(next.clone());
                visited.insert(node.clone());
            }
        }
    }

    results.into_iter().collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ForwardStarOptions {
    /// When set, starts are explored independently: nodes reached by an
    /// earlier start neither skip later starts nor get shared visited state.
    pub with_replacement: bool,
}

/// Outcome of exploring from one start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForwardStar {
    pub start: NodeKey,
    /// Reached non-barrier nodes, without the start itself.
    pub result: Vec<NodeKey>,
    /// Barrier nodes hit; they stop the exploration and are not in `result`.
    pub barriers: Vec<NodeKey>,
}

/// Explore forward from each start without crossing barriers.
///
/// A node is a barrier when its `(sourceId,globalId)` prefix is listed in
/// `barriers`. Barriers are reported separately so callers can decide later
/// which of them (open/closed, proposed) to fold back into results.
pub fn forward_star<G: Graph + ?Sized>(
    starts: &[NodeKey],
    graph: &G,
    barriers: &[FeatureKey],
    options: ForwardStarOptions,
) -> Vec<ForwardStar> {
    let barrier_set: HashSet<&FeatureKey> = barriers.iter().collect();
    let is_barrier = |node: &NodeKey| {
        node.feature_key()
            .is_some_and(|feature| barrier_set.contains(&feature))
    };
    let share = !options.with_replacement;

    let mut global_visited: HashSet<NodeKey> = HashSet::new();
    let mut stars = Vec::new();

    for start in starts {
        if share && global_visited.contains(start) {
            continue;
        }

        let mut visited: HashSet<NodeKey> = HashSet::new();
        let mut result: Vec<NodeKey> = Vec::new();
        let mut hit: Vec<NodeKey> = Vec::new();

        visited.insert(start.clone());
        if share {
            global_visited.insert(start.clone());
        }
        let mut pending = vec![start.clone()];

        while let Some(node) = pending.pop() {
            if is_barrier(&node) {
                hit.push(node);
                continue;
            }

            for neighbor in graph.successors(&node) {
                if visited.contains(neighbor) {
                    continue;
                }
                // Marked on push so a node is never stacked twice.
                pending.push(neighbor.clone());
                visited.insert(neighbor.clone());
                if share {
                    global_visited.insert(neighbor.clone());
                }
            }
            result.push(node);
        }

        if let Some(position) = result.iter().position(|node| node == start) {
            result.remove(position);
        }

        stars.push(ForwardStar {
            start: start.clone(),
            result,
            barriers: hit,
        });
    }

    stars
}

/// Breadth-first shortest path over successors, `source` and `target` included.
pub fn shortest_path<G: Graph + ?Sized>(
    graph: &G,
    source: &NodeKey,
    target: &NodeKey,
) -> Result<Vec<NodeKey>, TraceError> {
    let mut predecessor: HashMap<&NodeKey, &NodeKey> = HashMap::new();
    let mut visited: HashSet<&NodeKey> = HashSet::new();
    let mut queue: VecDeque<&NodeKey> = VecDeque::new();

    visited.insert(source);
    queue.push_back(source);

    let mut found = false;
    while let Some(current) = queue.pop_front() {
        if current == target {
            found = true;
            break;
        }
        for neighbor in graph.successors(current) {
            if visited.insert(neighbor) {
                predecessor.insert(neighbor, current);
                queue.push_back(neighbor);
            }
        }
    }

    if !found {
        return Err(TraceError::UnreachableTarget {
            from: source.clone(),
            to: target.clone(),
        });
    }

    let mut path = vec![target.clone()];
    let mut current = target;
    while current != source {
        match predecessor.get(current) {
            Some(&previous) => {
                path.push(previous.clone());
                current = previous;
            }
            None => break,
        }
    }
    path.reverse();
    Ok(path)
}

/// The segment node of `feature` whose position range contains `percent_along`.
pub fn edge_element_at<'g, G: Graph + ?Sized>(
    graph: &'g G,
    feature: &FeatureKey,
    percent_along: f64,
) -> Option<&'g NodeKey> {
    graph.nodes().iter().find(|node| {
        node.feature_key().as_ref() == Some(feature)
            && node
                .position_range()
                .is_some_and(|(from, to)| percent_along >= from && percent_along <= to)
    })
}
