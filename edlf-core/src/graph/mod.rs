//! Dependency Graph
//!
//! This module implements the static dependency graph of a logic network
//! and the scheduler that propagates one change through it.
//!
//! # Overview
//!
//! The dependency graph is a directed acyclic graph (DAG) where:
//!
//! - Nodes are sources, gates or observers
//! - Edges represent dependencies: if A reads B, there is an edge from B to A
//!
//! When a source changes, the scheduler scopes a propagation run to the
//! edges reachable from it and settles each affected node once, after all
//! of its affected predecessors.
//!
//! # Design Decisions
//!
//! 1. Nodes live in an arena addressed by [`NodeId`]; adjacency is stored as
//!    index sets, so there are no reference cycles between nodes.
//!
//! 2. Topology is kept apart from node state. The scheduler only borrows the
//!    topology and reaches node state through a settle callback.
//!
//! 3. Nodes can only read nodes created before them, so the graph is
//!    acyclic by construction.

mod dependency;
mod node;
mod scheduler;

pub use dependency::{DependencyGraph, Edge};
pub use node::{GateFn, NetworkId, NodeId, NodeKind};
pub use scheduler::{PropagationRun, PropagationStats, Settled};

pub(crate) use node::{InputValues, Node};
