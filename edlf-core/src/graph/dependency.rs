//! Dependency Graph Storage
//!
//! Topology only: which node feeds which. Node state lives in the network's
//! arena, indexed by the same [`NodeId`]s.

use std::collections::VecDeque;

use indexmap::IndexSet;
use serde::Serialize;

use super::node::NodeId;

/// A directed edge: `to` depends on `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Edge {
    pub from: NodeId,
    pub to: NodeId,
}

impl Edge {
    pub fn new(from: NodeId, to: NodeId) -> Self {
        Self { from, to }
    }
}

/// Adjacency lists for every node, indexed by arena position.
///
/// Edges are sets: a node wired twice to the same predecessor has one edge.
#[derive(Debug, Default)]
pub struct DependencyGraph {
    /// Nodes that read from each node.
    successors: Vec<IndexSet<NodeId>>,

    /// Nodes each node reads from.
    predecessors: Vec<IndexSet<NodeId>>,
}

impl DependencyGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserve a slot for `node`. Slots are handed out densely in order.
    pub fn add_node(&mut self, node: NodeId) {
        debug_assert_eq!(node.index(), self.successors.len());
        self.successors.push(IndexSet::new());
        self.predecessors.push(IndexSet::new());
    }

    /// Add a dependency edge: `dependent` depends on `dependency`.
    ///
    /// Returns `false` if the edge already existed.
    pub fn add_edge(&mut self, dependency: NodeId, dependent: NodeId) -> bool {
        let inserted = match self.successors.get_mut(dependency.index()) {
            Some(succ) => succ.insert(dependent),
            None => return false,
        };
        if let Some(pred) = self.predecessors.get_mut(dependent.index()) {
            pred.insert(dependency);
        }
        inserted
    }

    /// Direct downstream neighbours of `node`, in insertion order.
    pub fn successors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.successors
            .get(node.index())
            .into_iter()
            .flat_map(|succ| succ.iter().copied())
    }

    /// Direct upstream neighbours of `node`, in insertion order.
    pub fn predecessors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.predecessors
            .get(node.index())
            .into_iter()
            .flat_map(|pred| pred.iter().copied())
    }

    /// Every edge reachable by breadth-first traversal forward from `origin`.
    pub fn reachable_edges(&self, origin: NodeId) -> IndexSet<Edge> {
        let mut edges = IndexSet::new();
        let mut visited = IndexSet::new();
        let mut queue = VecDeque::new();

        visited.insert(origin);
        queue.push_back(origin);

        while let Some(node) = queue.pop_front() {
            for child in self.successors(node) {
                edges.insert(Edge::new(node, child));
                if visited.insert(child) {
                    queue.push_back(child);
                }
            }
        }

        edges
    }

    /// Number of nodes in the graph.
    pub fn node_count(&self) -> usize {
        self.successors.len()
    }

    /// Number of distinct edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.successors.iter().map(IndexSet::len).sum()
    }
}
