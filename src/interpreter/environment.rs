//! Register environment
//!
//! Maps each register to its current symbolic value. An [`Environment`] is
//! mutated in place along one path and cloned wholesale at a fork, so sibling
//! paths never observe each other's writes. Cloning copies four `Arc` handles,
//! never the expression trees themselves.

use crate::parser::ast::{Operand, Register};
use crate::symbolic::{Expr, ExprRef};
use rustc_hash::FxHashMap;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct Environment {
    registers: FxHashMap<Register, ExprRef>,
}

impl Environment {
    /// All registers start at literal zero
    pub fn new() -> Self {
        let registers = Register::ALL
            .iter()
            .map(|r| (*r, Expr::literal(0)))
            .collect();
        Environment { registers }
    }

    pub fn get(&self, register: Register) -> ExprRef {
        self.registers
            .get(&register)
            .map(Arc::clone)
            .unwrap_or_else(|| Expr::literal(0))
    }

    /// Value of a source operand; literals pass through unchanged
    pub fn operand(&self, operand: Operand) -> ExprRef {
        match operand {
            Operand::Register(r) => self.get(r),
            Operand::Literal(n) => Expr::literal(n),
        }
    }

    pub fn set(&mut self, register: Register, value: ExprRef) {
        self.registers.insert(register, value);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}
