//! Graph Nodes
//!
//! This module defines the node identifiers and the per-node state that
//! lives in a network's arena.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::Serialize;
use smallvec::SmallVec;

/// Unique identifier for a network.
///
/// Every [`NodeId`] carries the id of the network that minted it so that
/// handles cannot silently address a node of another network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NetworkId(u64);

impl NetworkId {
    /// Generate a new unique network ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for NetworkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Stable address of a node: the owning network plus an arena index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId {
    network: NetworkId,
    index: usize,
}

impl NodeId {
    pub(crate) fn new(network: NetworkId, index: usize) -> Self {
        Self { network, index }
    }

    /// The network this node belongs to.
    pub fn network(&self) -> NetworkId {
        self.network
    }

    /// Position of the node in its network's arena.
    pub fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node {}", self.index)
    }
}

/// What role a node plays in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeKind {
    /// A zero-input node whose value is set externally.
    Source,

    /// A one-input passthrough that emits an event when its value changes.
    Observer,

    /// A pure combinator over one or more inputs, tagged with its name.
    Gate(&'static str),
}

/// Pure value function of a gate.
pub type GateFn<T> = Arc<dyn Fn(&[T]) -> T + Send + Sync>;

/// The pure function a node evaluates.
pub(crate) enum Function<T> {
    /// Sources hold whatever value was staged last.
    Staged,

    /// Observers forward their single input.
    Passthrough,

    /// Gates apply a user or catalogue function to their inputs.
    Gate(GateFn<T>),
}

/// Input values of a node, inline for the common unary/binary case.
pub(crate) type InputValues<T> = SmallVec<[T; 2]>;

/// A node in the arena.
pub(crate) struct Node<T> {
    kind: NodeKind,
    function: Function<T>,

    /// Current settled value.
    value: T,

    /// Input values as of the last successful recompute.
    last_inputs: InputValues<T>,

    /// Declared inputs in slot order. May repeat the same node.
    inputs: SmallVec<[NodeId; 2]>,

    /// Number of times the pure function ran (construction excluded).
    recomputes: usize,
}

impl<T> Node<T> {
    /// Create a source holding `initial`.
    pub(crate) fn source(initial: T) -> Self {
        Self {
            kind: NodeKind::Source,
            function: Function::Staged,
            value: initial,
            last_inputs: SmallVec::new(),
            inputs: SmallVec::new(),
            recomputes: 0,
        }
    }

    pub(crate) fn kind(&self) -> NodeKind {
        self.kind
    }

    pub(crate) fn value(&self) -> &T {
        &self.value
    }

    pub(crate) fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    #[cfg(test)]
    pub(crate) fn last_inputs(&self) -> &[T] {
        &self.last_inputs
    }

    pub(crate) fn recomputes(&self) -> usize {
        self.recomputes
    }
}

impl<T> Node<T>
where
    T: Clone + PartialEq,
{
    /// Create an observer of `input`, whose current value is `current`.
    pub(crate) fn observer(input: NodeId, current: T) -> Self {
        let mut last_inputs = SmallVec::new();
        last_inputs.push(current.clone());
        Self {
            kind: NodeKind::Observer,
            function: Function::Passthrough,
            value: current,
            last_inputs,
            inputs: smallvec::smallvec![input],
            recomputes: 0,
        }
    }

    /// Create a gate and compute its initial value from `current` inputs.
    pub(crate) fn gate(
        name: &'static str,
        function: GateFn<T>,
        inputs: SmallVec<[NodeId; 2]>,
        current: InputValues<T>,
    ) -> Self {
        let value = function(&current[..]);
        Self {
            kind: NodeKind::Gate(name),
            function: Function::Gate(function),
            value,
            last_inputs: current,
            inputs,
            recomputes: 0,
        }
    }

    /// Evaluate the node's pure function against `inputs`.
    fn evaluate(&self, inputs: &[T]) -> T {
        match &self.function {
            Function::Staged => self.value.clone(),
            Function::Passthrough => inputs
                .first()
                .cloned()
                .unwrap_or_else(|| self.value.clone()),
            Function::Gate(f) => f(inputs),
        }
    }

    /// Recompute against `current` input values.
    ///
    /// Returns `None` without evaluating when `current` equals the recorded
    /// snapshot; otherwise records the snapshot and returns whether the
    /// value changed.
    pub(crate) fn refresh(&mut self, current: InputValues<T>) -> Option<bool> {
        if current == self.last_inputs {
            return None;
        }
        let next = self.evaluate(&current[..]);
        self.last_inputs = current;
        self.recomputes += 1;
        let changed = next != self.value;
        self.value = next;
        Some(changed)
    }

    /// Store an externally supplied value. Sources only.
    pub(crate) fn stage(&mut self, value: T) -> bool {
        self.recomputes += 1;
        let changed = value != self.value;
        self.value = value;
        changed
    }

    /// Overwrite the value without touching the snapshot.
    pub(crate) fn overwrite(&mut self, value: T) {
        self.value = value;
    }
}

impl<T: fmt::Debug> fmt::Debug for Node<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("kind", &self.kind)
            .field("value", &self.value)
            .field("last_inputs", &self.last_inputs)
            .field("inputs", &self.inputs)
            .finish()
    }
}
