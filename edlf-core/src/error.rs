//! Error types for network construction and propagation.

use thiserror::Error;

use crate::graph::{NetworkId, NodeId};

/// Errors raised by [`Network`](crate::Network) and its event queue.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LogicError {
    /// A node was asked to recompute although none of its inputs changed
    /// since the last recorded snapshot. Signals a caller or scheduler bug.
    #[error("invalid recompute of {node}: no input changed since the last snapshot")]
    InvalidRecompute { node: NodeId },

    /// Popped from an empty event queue.
    #[error("event queue is empty")]
    EmptyQueue,

    /// The id does not name any node of this network.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// The id was minted by another network.
    #[error("{node} belongs to network {network}, not to this one")]
    ForeignNode { node: NodeId, network: NetworkId },

    /// Nodes cannot be added once the first change has propagated.
    #[error("topology is frozen after the first accepted change")]
    TopologyFrozen,

    /// A catalogue gate was wired with the wrong number of inputs.
    #[error("gate `{gate}` expects {expected} input(s), got {found}")]
    ArityMismatch {
        gate: &'static str,
        expected: usize,
        found: usize,
    },

    /// A custom gate was declared without inputs.
    #[error("gate `{0}` needs at least one input")]
    EmptyGate(&'static str),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LogicError>;
