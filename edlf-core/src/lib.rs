//! EDLF Core
//!
//! This crate provides the propagation engine for static networks of logic
//! elements. It implements:
//!
//! - A node arena with source, gate and observer nodes
//! - A scheduler that propagates one external change through the DAG,
//!   recomputing each affected node at most once
//! - A FIFO queue of change events for observed outputs
//!
//! Values are generic: any `T: Clone + PartialEq + Debug` works with custom
//! gates, and `Network<bool>` comes with the usual boolean gates.
//!
//! # Architecture
//!
//! - `graph`: node identifiers, dependency graph and propagation scheduler
//! - `network`: the public schema API and typed handles
//! - `gate`: boolean gate catalogue
//! - `events`: change events and their queue
//! - `shared`: mutex-guarded handle for multi-threaded callers
//! - `options`: construction options
//!
//! # Example
//!
//! ```rust
//! use edlf_core::Network;
//!
//! let mut logic = Network::new();
//! let a = logic.input(false)?;
//! let b = logic.input(false)?;
//! let xor = logic.xor(a, b)?;
//! let out = logic.output(xor)?;
//!
//! logic.set(a, true)?;
//! let event = logic.events_mut().pop()?;
//! assert_eq!(event.output, out);
//! assert!(event.value);
//!
//! // b follows a: the xor goes back to false.
//! logic.set(b, true)?;
//! assert!(!logic.events_mut().pop()?.value);
//! assert!(logic.events().is_empty());
//! # Ok::<(), edlf_core::LogicError>(())
//! ```

pub mod error;
pub mod events;
pub mod gate;
pub mod graph;
pub mod network;
pub mod options;
pub mod shared;

pub use error::{LogicError, Result};
pub use events::{Event, EventQueue};
pub use gate::LogicGate;
pub use graph::{Edge, NodeId, NodeKind, PropagationStats};
pub use network::{Input, Network, Output};
pub use options::NetworkOptions;
pub use shared::SharedNetwork;
