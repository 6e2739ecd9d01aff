//! Symbolic values
//!
//! This module provides the abstractions the path-forking interpreter computes with:
//! - [`expr`]: Immutable expression trees with on-the-fly simplification
//! - [`limits`]: Interval bounds used to prove paths infeasible
//! - [`condition`]: Equalities and inequalities collected along a path
//!
//! # Digit Domain
//!
//! The only free symbols are input digits `d0, d1, ...`, each ranging over
//! `[1, 9]`. Registers never appear inside expressions: the interpreter always
//! substitutes their current value.

pub mod condition;
pub mod expr;
pub mod limits;

pub use condition::{Condition, ConditionKind, Pin};
pub use expr::{BinOp, Expr, ExprRef};
pub use limits::Limits;
