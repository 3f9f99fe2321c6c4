//! Shared Network Handle
//!
//! [`Network`] is single-threaded: the pending bookkeeping of a propagation
//! run and the event queue are plain mutable state. [`SharedNetwork`] puts
//! the whole network behind one mutex so several callers can drive it, with
//! every propagation run completing before the next one starts.

use std::fmt::Debug;
use std::sync::Arc;

use parking_lot::{Mutex, MutexGuard};

use crate::error::Result;
use crate::events::Event;
use crate::graph::{NodeId, PropagationStats};
use crate::network::{Input, Network};

/// A cloneable, thread-safe handle to one [`Network`].
pub struct SharedNetwork<T> {
    inner: Arc<Mutex<Network<T>>>,
}

impl<T> SharedNetwork<T>
where
    T: Clone + PartialEq + Debug,
{
    pub fn new(network: Network<T>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(network)),
        }
    }

    /// Lock the network for a sequence of operations.
    pub fn lock(&self) -> MutexGuard<'_, Network<T>> {
        self.inner.lock()
    }

    /// Set a source's value and propagate, holding the lock for the whole run.
    pub fn set(&self, input: Input, value: T) -> Result<PropagationStats> {
        self.inner.lock().set(input, value)
    }

    /// Current value of `node`.
    pub fn value(&self, node: impl Into<NodeId>) -> Result<T> {
        self.inner.lock().value(node).cloned()
    }

    /// Pop the oldest event.
    pub fn pop_event(&self) -> Result<Event<T>> {
        self.inner.lock().events_mut().pop()
    }

    /// Take every queued event, oldest first.
    pub fn drain_events(&self) -> Vec<Event<T>> {
        self.inner.lock().events_mut().drain().collect()
    }
}

impl<T> Clone for SharedNetwork<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> From<Network<T>> for SharedNetwork<T>
where
    T: Clone + PartialEq + Debug,
{
    fn from(network: Network<T>) -> Self {
        Self::new(network)
    }
}
