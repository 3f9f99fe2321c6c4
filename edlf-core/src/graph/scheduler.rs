//! Propagation Scheduler
//!
//! The scheduler walks the part of the graph reachable from one changed
//! node and settles every node in it exactly once, never before all of its
//! reachable predecessors have resolved.
//!
//! # Algorithm
//!
//! 1. Collect the edges reachable from the origin and group their sources by
//!    destination. That is the pending set of each affected node.
//! 2. Seed a FIFO work-list with the origin.
//! 3. Pop a node and release each of its outgoing edges. When the last
//!    pending edge of a child is released, settle the child:
//!    - if its value changed, push it on the work-list;
//!    - otherwise release its own outgoing edges right away, so a node that
//!      did not change never blocks convergence further down.
//!
//! Pending sets are keyed by graph edges, not by input slots: a gate fed
//! twice by the same node waits on one edge.

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use tracing::{debug, debug_span, trace};

use super::dependency::DependencyGraph;
use super::node::NodeId;

/// Outcome of settling a node whose pending edges are all released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settled {
    /// Recomputed and produced a new value.
    Changed,

    /// Recomputed but the value stayed the same.
    Unchanged,

    /// No input differed from the recorded snapshot, so nothing ran.
    Untouched,
}

/// Counters for one propagation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PropagationStats {
    /// Edges reachable from the origin.
    pub scoped_edges: usize,

    /// Nodes whose pure function ran.
    pub recomputed: usize,

    /// Nodes whose value changed, origin excluded.
    pub changed: usize,

    /// Nodes settled without running their pure function.
    pub untouched: usize,

    /// Events pushed on the queue during the run.
    pub events: usize,
}

/// Transient state of one propagation run.
pub struct PropagationRun {
    /// Unresolved reachable predecessors of each affected node.
    pending: IndexMap<NodeId, IndexSet<NodeId>>,

    /// Nodes that changed and still have to release their edges.
    worklist: VecDeque<NodeId>,

    stats: PropagationStats,
}

impl PropagationRun {
    /// Scope a run to the edges reachable from `origin`.
    pub fn new(graph: &DependencyGraph, origin: NodeId) -> Self {
        let edges = graph.reachable_edges(origin);
        let mut pending: IndexMap<NodeId, IndexSet<NodeId>> = IndexMap::new();
        for edge in &edges {
            pending.entry(edge.to).or_default().insert(edge.from);
        }

        let mut worklist = VecDeque::new();
        worklist.push_back(origin);

        Self {
            pending,
            worklist,
            stats: PropagationStats {
                scoped_edges: edges.len(),
                ..PropagationStats::default()
            },
        }
    }

    /// Unresolved predecessors of `node`, if it is in scope.
    pub fn pending(&self, node: NodeId) -> Option<&IndexSet<NodeId>> {
        self.pending.get(&node)
    }

    /// Mark the edge `from -> to` resolved.
    ///
    /// Returns `true` when that was the last pending edge of `to`.
    fn release(&mut self, from: NodeId, to: NodeId) -> bool {
        match self.pending.get_mut(&to) {
            Some(preds) => preds.swap_remove(&from) && preds.is_empty(),
            None => false,
        }
    }

    /// Drain the work-list, calling `settle` once for every node whose
    /// pending edges are all released.
    pub fn drain<F>(mut self, graph: &DependencyGraph, mut settle: F) -> PropagationStats
    where
        F: FnMut(NodeId) -> Settled,
    {
        let span = debug_span!("propagate", origin = ?self.worklist.front());
        let _enter = span.enter();

        // Nodes whose outgoing edges are released before the next pop.
        let mut resolved = Vec::new();

        while let Some(node) = self.worklist.pop_front() {
            resolved.push(node);

            while let Some(parent) = resolved.pop() {
                for child in graph.successors(parent) {
                    if !self.release(parent, child) {
                        continue;
                    }

                    match settle(child) {
                        Settled::Changed => {
                            trace!(node = %child, "changed");
                            self.stats.recomputed += 1;
                            self.stats.changed += 1;
                            self.worklist.push_back(child);
                        }
                        Settled::Unchanged => {
                            trace!(node = %child, "unchanged");
                            self.stats.recomputed += 1;
                            resolved.push(child);
                        }
                        Settled::Untouched => {
                            trace!(node = %child, "untouched");
                            self.stats.untouched += 1;
                            resolved.push(child);
                        }
                    }
                }
            }
        }

        debug!(
            scoped_edges = self.stats.scoped_edges,
            recomputed = self.stats.recomputed,
            changed = self.stats.changed,
            untouched = self.stats.untouched,
            "propagation settled"
        );

        self.stats
    }
}
