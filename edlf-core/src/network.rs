//! Logic Network
//!
//! A [`Network`] owns the node arena, the dependency graph and the event
//! queue of one logic schema. It is the only way to create nodes and the
//! only entry point for changes.
//!
//! # Lifecycle
//!
//! 1. Build the topology: [`Network::input`], gates, [`Network::output`].
//! 2. Drive it with [`Network::set`]. Each accepted change propagates to
//!    completion before `set` returns.
//! 3. Read [`Event`]s from [`Network::events_mut`].
//!
//! Once a change has propagated the topology is frozen, unless
//! [`NetworkOptions::freeze_topology`] is off.

use std::fmt::Debug;
use std::sync::Arc;

use indexmap::IndexSet;
use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{LogicError, Result};
use crate::events::{Event, EventQueue};
use crate::gate::LogicGate;
use crate::graph::{
    DependencyGraph, Edge, GateFn, InputValues, NetworkId, Node, NodeId, NodeKind,
    PropagationRun, PropagationStats, Settled,
};
use crate::options::NetworkOptions;

/// Handle to a source node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Input(NodeId);

impl Input {
    pub fn id(self) -> NodeId {
        self.0
    }

    /// Set the source's value on `network`. Same as [`Network::set`].
    pub fn set<T>(self, network: &mut Network<T>, value: T) -> Result<PropagationStats>
    where
        T: Clone + PartialEq + Debug,
    {
        network.set(self, value)
    }
}

impl From<Input> for NodeId {
    fn from(input: Input) -> Self {
        input.0
    }
}

/// Handle to an observer node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Output(NodeId);

impl Output {
    pub(crate) fn from_id(id: NodeId) -> Self {
        Self(id)
    }

    pub fn id(self) -> NodeId {
        self.0
    }
}

impl From<Output> for NodeId {
    fn from(output: Output) -> Self {
        output.0
    }
}

/// A static network of logic nodes.
#[derive(Debug)]
pub struct Network<T> {
    id: NetworkId,
    options: NetworkOptions,
    graph: DependencyGraph,
    nodes: Vec<Node<T>>,
    events: EventQueue<T>,

    /// Set once the first change has propagated.
    frozen: bool,

    /// Sources written through `overwrite_value` whose dependents have not
    /// seen the new value yet.
    overwritten: IndexSet<NodeId>,
}

impl<T> Network<T>
where
    T: Clone + PartialEq + Debug,
{
    /// Create an empty network with default options.
    pub fn new() -> Self {
        Self::with_options(NetworkOptions::default())
    }

    /// Create an empty network.
    pub fn with_options(options: NetworkOptions) -> Self {
        Self {
            id: NetworkId::new(),
            events: EventQueue::with_capacity(options.event_capacity),
            options,
            graph: DependencyGraph::new(),
            nodes: Vec::new(),
            frozen: false,
            overwritten: IndexSet::new(),
        }
    }

    pub fn id(&self) -> NetworkId {
        self.id
    }

    pub fn options(&self) -> &NetworkOptions {
        &self.options
    }

    /// Add a source node holding `initial`.
    pub fn input(&mut self, initial: T) -> Result<Input> {
        self.ensure_open()?;
        let id = self.attach(Node::source(initial));
        trace!(node = %id, "input attached");
        Ok(Input(id))
    }

    /// Add an observer wired to `node`.
    pub fn output(&mut self, node: impl Into<NodeId>) -> Result<Output> {
        self.ensure_open()?;
        let input = node.into();
        let index = self.check(input)?;
        let current = self.nodes[index].value().clone();
        let id = self.attach(Node::observer(input, current));
        trace!(node = %id, input = %input, "output attached");
        Ok(Output(id))
    }

    /// Add a gate computing `function` over `inputs`, in slot order.
    ///
    /// `function` must be pure: the same inputs always give the same value.
    pub fn gate<F>(
        &mut self,
        name: &'static str,
        inputs: &[NodeId],
        function: F,
    ) -> Result<NodeId>
    where
        F: Fn(&[T]) -> T + Send + Sync + 'static,
        T: 'static,
    {
        self.attach_gate(name, inputs, Arc::new(function))
    }

    fn attach_gate(
        &mut self,
        name: &'static str,
        inputs: &[NodeId],
        function: GateFn<T>,
    ) -> Result<NodeId> {
        self.ensure_open()?;
        if inputs.is_empty() {
            return Err(LogicError::EmptyGate(name));
        }
        for &input in inputs {
            self.check(input)?;
        }
        let current = current_inputs(&self.nodes, inputs);
        let node = Node::gate(name, function, inputs.iter().copied().collect(), current);
        let id = self.attach(node);
        trace!(node = %id, gate = name, "gate attached");
        Ok(id)
    }

    /// Insert `node` and its input edges.
    fn attach(&mut self, node: Node<T>) -> NodeId {
        let id = NodeId::new(self.id, self.nodes.len());
        self.graph.add_node(id);
        for &input in node.inputs() {
            self.graph.add_edge(input, id);
        }
        self.nodes.push(node);
        id
    }

    fn ensure_open(&self) -> Result<()> {
        if self.frozen && self.options.freeze_topology {
            return Err(LogicError::TopologyFrozen);
        }
        Ok(())
    }

    /// Resolve `node` to its arena index.
    fn check(&self, node: NodeId) -> Result<usize> {
        if node.network() != self.id {
            return Err(LogicError::ForeignNode {
                node,
                network: node.network(),
            });
        }
        if node.index() >= self.nodes.len() {
            return Err(LogicError::UnknownNode(node));
        }
        Ok(node.index())
    }

    /// Set a source's value and propagate the change.
    ///
    /// Setting the current value is a no-op: no traversal, no events.
    /// The exception is a source written by
    /// [`overwrite_value`](Self::overwrite_value) since its last run; its
    /// dependents are brought up to date even if `value` matches.
    pub fn set(&mut self, input: Input, value: T) -> Result<PropagationStats> {
        let origin = input.id();
        let index = self.check(origin)?;

        let source = &mut self.nodes[index];
        let changed = source.stage(value);
        let overwritten = self.overwritten.swap_remove(&origin);
        if !changed && !overwritten {
            trace!(node = %origin, "value unchanged, nothing to propagate");
            return Ok(PropagationStats::default());
        }
        debug!(node = %origin, value = ?source.value(), overwritten, "source changed");

        if !self.frozen {
            self.frozen = true;
            if self.options.freeze_topology {
                debug!(nodes = self.nodes.len(), "topology frozen");
            }
        }

        Ok(self.propagate(origin))
    }

    fn propagate(&mut self, origin: NodeId) -> PropagationStats {
        let before = self.events.len();
        let Network {
            graph,
            nodes,
            events,
            ..
        } = &mut *self;
        let graph = &*graph;

        let mut stats =
            PropagationRun::new(graph, origin).drain(graph, |id| settle(nodes, events, id));
        stats.events = self.events.len() - before;
        stats
    }

    /// Recompute one node against its current inputs, without propagating.
    ///
    /// Fails with [`LogicError::InvalidRecompute`] when no input changed
    /// since the last recompute. Sources have no inputs to check and always
    /// return `Ok(false)`; they change through [`set`](Self::set). An
    /// observer whose value changes still pushes its event.
    pub fn recompute(&mut self, node: impl Into<NodeId>) -> Result<bool> {
        let id = node.into();
        let index = self.check(id)?;
        if self.nodes[index].kind() == NodeKind::Source {
            return Ok(false);
        }
        match settle(&mut self.nodes, &mut self.events, id) {
            Settled::Changed => Ok(true),
            Settled::Unchanged => Ok(false),
            Settled::Untouched => Err(LogicError::InvalidRecompute { node: id }),
        }
    }

    /// Write a node's value directly. Nothing is recomputed or notified.
    ///
    /// Dependents keep their old values until they are recomputed. For a
    /// source, the next [`set`](Self::set) propagates even when it repeats
    /// the overwritten value.
    pub fn overwrite_value(&mut self, node: impl Into<NodeId>, value: T) -> Result<()> {
        let id = node.into();
        let index = self.check(id)?;
        let target = &mut self.nodes[index];
        target.overwrite(value);
        if target.kind() == NodeKind::Source {
            self.overwritten.insert(id);
        }
        Ok(())
    }

    /// Current settled value of `node`.
    pub fn value(&self, node: impl Into<NodeId>) -> Result<&T> {
        let index = self.check(node.into())?;
        Ok(self.nodes[index].value())
    }

    pub fn kind(&self, node: impl Into<NodeId>) -> Result<NodeKind> {
        let index = self.check(node.into())?;
        Ok(self.nodes[index].kind())
    }

    /// Declared inputs of `node`, in slot order.
    pub fn inputs(&self, node: impl Into<NodeId>) -> Result<&[NodeId]> {
        let index = self.check(node.into())?;
        Ok(self.nodes[index].inputs())
    }

    /// Direct downstream neighbours of `node`.
    pub fn successors(&self, node: impl Into<NodeId>) -> Result<Vec<NodeId>> {
        let id = node.into();
        self.check(id)?;
        Ok(self.graph.successors(id).collect())
    }

    /// Edges reachable forward from `node`, breadth-first.
    pub fn reachable_edges(&self, node: impl Into<NodeId>) -> Result<IndexSet<Edge>> {
        let id = node.into();
        self.check(id)?;
        Ok(self.graph.reachable_edges(id))
    }

    /// How many times `node` recomputed since construction.
    pub fn recompute_count(&self, node: impl Into<NodeId>) -> Result<usize> {
        let index = self.check(node.into())?;
        Ok(self.nodes[index].recomputes())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn graph(&self) -> &DependencyGraph {
        &self.graph
    }

    /// Whether a change has propagated yet.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn events(&self) -> &EventQueue<T> {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventQueue<T> {
        &mut self.events
    }
}

impl<T> Default for Network<T>
where
    T: Clone + PartialEq + Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl Network<bool> {
    /// Add a catalogue gate.
    pub fn logic(&mut self, gate: LogicGate, inputs: &[NodeId]) -> Result<NodeId> {
        if inputs.len() != gate.arity() {
            return Err(LogicError::ArityMismatch {
                gate: gate.name(),
                expected: gate.arity(),
                found: inputs.len(),
            });
        }
        self.attach_gate(gate.name(), inputs, gate.function())
    }

    /// Inversion of `a`.
    pub fn not(&mut self, a: impl Into<NodeId>) -> Result<NodeId> {
        self.logic(LogicGate::Not, &[a.into()])
    }

    pub fn buffer(&mut self, a: impl Into<NodeId>) -> Result<NodeId> {
        self.logic(LogicGate::Buffer, &[a.into()])
    }

    pub fn and(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Result<NodeId> {
        self.logic(LogicGate::And, &[a.into(), b.into()])
    }

    pub fn or(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Result<NodeId> {
        self.logic(LogicGate::Or, &[a.into(), b.into()])
    }

    /// Exclusive-or of `a` and `b`.
    pub fn xor(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Result<NodeId> {
        self.logic(LogicGate::Xor, &[a.into(), b.into()])
    }

    /// Not-and of `a` and `b`. `nand(x, x)` inverts `x`.
    pub fn nand(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Result<NodeId> {
        self.logic(LogicGate::Nand, &[a.into(), b.into()])
    }

    pub fn nor(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Result<NodeId> {
        self.logic(LogicGate::Nor, &[a.into(), b.into()])
    }

    pub fn xnor(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) -> Result<NodeId> {
        self.logic(LogicGate::Xnor, &[a.into(), b.into()])
    }
}

/// Values currently held by `inputs`.
fn current_inputs<T: Clone>(nodes: &[Node<T>], inputs: &[NodeId]) -> InputValues<T> {
    inputs
        .iter()
        .map(|input| nodes[input.index()].value().clone())
        .collect()
}

/// Recompute `id` if any input moved, emitting an event for observers.
fn settle<T>(nodes: &mut [Node<T>], events: &mut EventQueue<T>, id: NodeId) -> Settled
where
    T: Clone + PartialEq,
{
    let current = current_inputs(nodes, nodes[id.index()].inputs());
    let node = &mut nodes[id.index()];

    match node.refresh(current) {
        None => Settled::Untouched,
        Some(false) => Settled::Unchanged,
        Some(true) => {
            if node.kind() == NodeKind::Observer {
                events.push(Event {
                    output: Output::from_id(id),
                    value: node.value().clone(),
                });
            }
            Settled::Changed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_start_from_initial_inputs() {
        let mut net = Network::new();
        let a = net.input(true).unwrap();
        let not = net.not(a).unwrap();
        let out = net.output(not).unwrap();

        assert!(!*net.value(not).unwrap());
        assert!(!*net.value(out).unwrap());
        assert_eq!(net.kind(a).unwrap(), NodeKind::Source);
        assert_eq!(net.kind(not).unwrap(), NodeKind::Gate("not"));
        assert_eq!(net.kind(out).unwrap(), NodeKind::Observer);
        assert!(net.events().is_empty());
    }

    #[test]
    fn duplicate_inputs_share_one_edge() {
        let mut net = Network::new();
        let a = net.input(false).unwrap();
        let nand = net.nand(a, a).unwrap();

        assert_eq!(net.inputs(nand).unwrap(), &[a.id(), a.id()]);
        assert_eq!(net.successors(a).unwrap(), vec![nand]);
        assert_eq!(net.graph().edge_count(), 1);
    }

    #[test]
    fn foreign_nodes_are_rejected() {
        let mut first: Network<bool> = Network::new();
        let mut second: Network<bool> = Network::new();
        let a = first.input(false).unwrap();

        assert_eq!(
            second.not(a),
            Err(LogicError::ForeignNode {
                node: a.id(),
                network: first.id(),
            })
        );
        assert!(matches!(
            second.set(a, true),
            Err(LogicError::ForeignNode { .. })
        ));
    }

    #[test]
    fn arity_is_checked() {
        let mut net = Network::new();
        let a = net.input(false).unwrap();

        assert_eq!(
            net.logic(LogicGate::Xor, &[a.id()]),
            Err(LogicError::ArityMismatch {
                gate: "xor",
                expected: 2,
                found: 1,
            })
        );
        assert_eq!(
            net.gate("empty", &[], |_: &[bool]| false),
            Err(LogicError::EmptyGate("empty"))
        );
    }

    #[test]
    fn topology_freezes_after_first_change() {
        let mut net = Network::new();
        let a = net.input(false).unwrap();
        net.output(a).unwrap();

        // A no-op set does not count as a change.
        net.set(a, false).unwrap();
        assert!(!net.is_frozen());
        net.input(false).unwrap();

        net.set(a, true).unwrap();
        assert!(net.is_frozen());
        assert_eq!(net.input(false), Err(LogicError::TopologyFrozen));
        assert_eq!(net.output(a), Err(LogicError::TopologyFrozen));
    }

    #[test]
    fn topology_stays_open_when_configured() {
        let mut net = Network::with_options(NetworkOptions {
            freeze_topology: false,
            ..NetworkOptions::default()
        });
        let a = net.input(false).unwrap();
        net.set(a, true).unwrap();

        let out = net.output(a).unwrap();
        assert!(*net.value(out).unwrap());
        net.set(a, false).unwrap();
        assert!(!*net.value(out).unwrap());
    }

    #[test]
    fn source_recompute_reports_no_change() {
        let mut net: Network<bool> = Network::new();
        let a = net.input(false).unwrap();
        let out = net.output(a).unwrap();

        assert_eq!(net.recompute(a), Ok(false));
        net.set(a, true).unwrap();
        net.events_mut().pop().unwrap();
        assert_eq!(net.recompute(a), Ok(false));

        assert!(*net.value(a).unwrap());
        assert!(*net.value(out).unwrap());
        assert!(net.events().is_empty());
    }

    #[test]
    fn set_after_source_overwrite_resyncs_dependents() {
        let mut net = Network::new();
        let a = net.input(false).unwrap();
        let not = net.not(a).unwrap();
        let out = net.output(not).unwrap();

        net.overwrite_value(a, true).unwrap();
        assert!(*net.value(a).unwrap());
        assert!(*net.value(not).unwrap());
        assert!(net.events().is_empty());

        // Same value as the overwrite, but the dependents have not seen it.
        let stats = net.set(a, true).unwrap();
        assert_eq!(stats.changed, 2);
        assert!(!*net.value(not).unwrap());
        let event = net.events_mut().pop().unwrap();
        assert_eq!(event.output, out);
        assert!(!event.value);

        // Back in sync: repeating the value is idle again.
        assert_eq!(net.set(a, true).unwrap(), PropagationStats::default());
    }

    #[test]
    fn stats_describe_the_run() {
        let mut net = Network::new();
        let a = net.input(false).unwrap();
        let b = net.input(false).unwrap();
        let and = net.and(a, b).unwrap();
        let out = net.output(and).unwrap();

        let stats = net.set(a, true).unwrap();
        assert_eq!(stats.scoped_edges, 2);
        assert_eq!(stats.recomputed, 1);
        assert_eq!(stats.changed, 0);
        assert_eq!(stats.untouched, 1);
        assert_eq!(stats.events, 0);

        let stats = b.set(&mut net, true).unwrap();
        assert_eq!(stats.changed, 2);
        assert_eq!(stats.events, 1);
        assert_eq!(net.events_mut().pop().unwrap().output, out);
    }
}
