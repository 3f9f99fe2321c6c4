//! Boolean gate catalogue.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::graph::GateFn;

/// A stateless boolean combinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LogicGate {
    /// Identity: A
    Buffer,
    /// Inversion: ¬A
    Not,
    /// Logical AND: A ∧ B
    And,
    /// Logical OR: A ∨ B
    Or,
    /// Logical XOR: A ⊕ B
    Xor,
    /// Logical NAND: ¬(A ∧ B)
    Nand,
    /// Logical NOR: ¬(A ∨ B)
    Nor,
    /// Logical XNOR: ¬(A ⊕ B)
    Xnor,
}

impl LogicGate {
    /// Name used for node kinds and log output.
    pub fn name(self) -> &'static str {
        match self {
            LogicGate::Buffer => "buffer",
            LogicGate::Not => "not",
            LogicGate::And => "and",
            LogicGate::Or => "or",
            LogicGate::Xor => "xor",
            LogicGate::Nand => "nand",
            LogicGate::Nor => "nor",
            LogicGate::Xnor => "xnor",
        }
    }

    /// Number of inputs the gate reads.
    pub fn arity(self) -> usize {
        match self {
            LogicGate::Buffer | LogicGate::Not => 1,
            _ => 2,
        }
    }

    /// Evaluate the gate over exactly [`arity`](Self::arity) inputs.
    ///
    /// # Panics
    ///
    /// Panics if `inputs` is shorter than the arity. Extra inputs are a
    /// debug assertion failure.
    #[inline]
    pub fn eval(self, inputs: &[bool]) -> bool {
        debug_assert_eq!(
            inputs.len(),
            self.arity(),
            "{} gate takes {} inputs",
            self.name(),
            self.arity()
        );
        let a = inputs[0];
        let b = self.arity() == 2 && inputs[1];
        match self {
            LogicGate::Buffer => a,
            LogicGate::Not => !a,
            LogicGate::And => a && b,
            LogicGate::Or => a || b,
            LogicGate::Xor => a ^ b,
            LogicGate::Nand => !(a && b),
            LogicGate::Nor => !(a || b),
            LogicGate::Xnor => !(a ^ b),
        }
    }

    pub(crate) fn function(self) -> GateFn<bool> {
        Arc::new(move |inputs: &[bool]| self.eval(inputs))
    }
}
