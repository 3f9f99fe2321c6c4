//! Output change events.

use std::collections::VecDeque;

use serde::Serialize;

use crate::error::{LogicError, Result};
use crate::network::Output;

/// One observed change: the observer and the value it took.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event<T> {
    pub output: Output,
    pub value: T,
}

/// FIFO queue of change events, in the order propagation confirmed them.
///
/// Unbounded; events leave only when the caller pops or drains them.
#[derive(Debug)]
pub struct EventQueue<T> {
    events: VecDeque<Event<T>>,
}

impl<T> EventQueue<T> {
    /// Create an empty queue with room for `capacity` events.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(capacity),
        }
    }

    pub(crate) fn push(&mut self, event: Event<T>) {
        self.events.push_back(event);
    }

    /// Remove and return the oldest event.
    pub fn pop(&mut self) -> Result<Event<T>> {
        self.events.pop_front().ok_or(LogicError::EmptyQueue)
    }

    /// Oldest event, if any, without removing it.
    pub fn peek(&self) -> Option<&Event<T>> {
        self.events.front()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Remove all events, oldest first.
    pub fn drain(&mut self) -> impl Iterator<Item = Event<T>> + '_ {
        self.events.drain(..)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event<T>> {
        self.events.iter()
    }
}

impl<T> Default for EventQueue<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NetworkId, NodeId};

    fn output(index: usize) -> Output {
        Output::from_id(NodeId::new(NetworkId::new(), index))
    }

    #[test]
    fn pop_empty_fails() {
        let mut queue: EventQueue<bool> = EventQueue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.pop(), Err(LogicError::EmptyQueue));
    }

    #[test]
    fn events_come_out_in_push_order() {
        let mut queue = EventQueue::with_capacity(4);
        let out = output(1);
        queue.push(Event { output: out, value: 1 });
        queue.push(Event { output: out, value: 2 });
        queue.push(Event { output: out, value: 3 });

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek().map(|e| e.value), Some(1));
        assert_eq!(queue.pop().unwrap().value, 1);

        let rest: Vec<_> = queue.drain().map(|e| e.value).collect();
        assert_eq!(rest, vec![2, 3]);
        assert!(queue.is_empty());
    }
}
