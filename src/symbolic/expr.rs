//! Symbolic expression representation
//!
//! An [`Expr`] is an immutable tree of literals, digit symbols and binary
//! operations. Children are held through [`Arc`] so that a value stored in one
//! register can be shared by any number of later expressions, and so that
//! duplicating an environment at a fork only bumps reference counts.
//!
//! A program like `add w w` repeated builds a graph whose tree expansion is
//! exponential. Each binary node therefore records its interval, digit set
//! and expanded size when it is built ([`NodeInfo`]), and concrete evaluation
//! of large graphs visits every shared node once.
//!
//! Equality and hashing are structural (derived), which is what the `x / x` and
//! `x % x` identities compare against.
//!
//! # Integer Semantics
//!
//! Division and remainder truncate toward zero and the remainder takes the sign
//! of the dividend, i.e. Rust's `/` and `%` on `i64`. Division by zero is a
//! [`AnalysisError::ContractViolation`] and overflow an
//! [`AnalysisError::ArithmeticOverflow`].

use crate::interpreter::constants::{DIGIT_MAX, DIGIT_MIN};
use crate::interpreter::errors::AnalysisError;
use crate::parser::ast::Opcode;
use crate::symbolic::limits::Limits;
use rustc_hash::FxHashMap;
use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Expressions up to this many tree nodes are evaluated by plain recursion
const TREE_EVAL_LIMIT: u64 = 1 << 12;

/// Subexpressions larger than this many tree nodes print as `...`
const DISPLAY_LIMIT: u64 = 1 << 10;

/// Shared handle to an expression node
pub type ExprRef = Arc<Expr>;

/// Binary operators of the expression tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
}

impl BinOp {
    /// Map an arithmetic or comparison opcode onto its operator
    pub fn from_opcode(opcode: Opcode) -> Option<BinOp> {
        match opcode {
            Opcode::Input => None,
            Opcode::Add => Some(BinOp::Add),
            Opcode::Sub => Some(BinOp::Sub),
            Opcode::Mul => Some(BinOp::Mul),
            Opcode::Div => Some(BinOp::Div),
            Opcode::Mod => Some(BinOp::Mod),
            Opcode::Eq => Some(BinOp::Eq),
            Opcode::Neq => Some(BinOp::Neq),
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Neq => "!=",
        }
    }

    /// Concrete integer semantics shared by folding and concrete evaluation
    pub fn apply(self, left: i64, right: i64) -> Result<i64, AnalysisError> {
        let overflow = || AnalysisError::ArithmeticOverflow {
            message: format!("{} {} {}", left, self.symbol(), right),
        };
        match self {
            BinOp::Add => left.checked_add(right).ok_or_else(overflow),
            BinOp::Sub => left.checked_sub(right).ok_or_else(overflow),
            BinOp::Mul => left.checked_mul(right).ok_or_else(overflow),
            BinOp::Div | BinOp::Mod if right == 0 => Err(AnalysisError::contract(format!(
                "{} {} 0",
                left,
                self.symbol()
            ))),
            BinOp::Div => left.checked_div(right).ok_or_else(overflow),
            BinOp::Mod => left.checked_rem(right).ok_or_else(overflow),
            BinOp::Eq => Ok((left == right) as i64),
            BinOp::Neq => Ok((left != right) as i64),
        }
    }
}

/// Symbolic value of a register
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Literal(i64),
    /// The input digit at this position, domain `[1, 9]`
    Digit(usize),
    Binary {
        op: BinOp,
        left: ExprRef,
        right: ExprRef,
        info: NodeInfo,
    },
}

/// Facts about a binary node, computed once from its operands.
///
/// Two nodes with equal operands always carry equal info, so it takes no
/// part in equality or hashing.
#[derive(Debug, Clone)]
pub struct NodeInfo {
    limits: Result<Limits, AnalysisError>,
    digits: BTreeSet<usize>,
    /// Node count of the tree expansion, saturating
    size: u64,
}

impl NodeInfo {
    fn new(op: BinOp, left: &Expr, right: &Expr) -> Self {
        let mut digits = BTreeSet::new();
        left.collect_digits(&mut digits);
        right.collect_digits(&mut digits);
        NodeInfo {
            limits: binary_limits(op, left, right),
            digits,
            size: left.tree_size().saturating_add(right.tree_size()).saturating_add(1),
        }
    }
}

impl PartialEq for NodeInfo {
    fn eq(&self, _: &Self) -> bool {
        true
    }
}

impl Eq for NodeInfo {}

impl Hash for NodeInfo {
    fn hash<H: Hasher>(&self, _: &mut H) {}
}

fn binary_limits(op: BinOp, left: &Expr, right: &Expr) -> Result<Limits, AnalysisError> {
    let l = left.limits()?;
    let r = right.limits()?;
    match op {
        BinOp::Add => Ok(l.add(&r)),
        BinOp::Sub => Ok(l.sub(&r)),
        BinOp::Mul | BinOp::Div | BinOp::Mod => {
            if !r.is_strictly_positive() {
                return Err(AnalysisError::contract(format!(
                    "right operand '{}' of '{}' has interval {}, expected strictly positive",
                    right,
                    op.symbol(),
                    r
                )));
            }
            Ok(match op {
                BinOp::Mul => l.mul_positive(&r),
                BinOp::Div => l.div_positive(&r),
                _ => l.rem_positive(&r),
            })
        }
        BinOp::Eq | BinOp::Neq => Ok(Limits::new(0, 1)),
    }
}

impl Expr {
    pub fn literal(value: i64) -> ExprRef {
        Arc::new(Expr::Literal(value))
    }

    pub fn digit(index: usize) -> ExprRef {
        Arc::new(Expr::Digit(index))
    }

    /// Build a binary node without simplification
    pub fn binary(op: BinOp, left: ExprRef, right: ExprRef) -> ExprRef {
        let info = NodeInfo::new(op, &left, &right);
        Arc::new(Expr::Binary {
            op,
            left,
            right,
            info,
        })
    }

    pub fn as_literal(&self) -> Option<i64> {
        match self {
            Expr::Literal(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_digit(&self) -> Option<usize> {
        match self {
            Expr::Digit(i) => Some(*i),
            _ => None,
        }
    }

    /// Combine two already-evaluated operands, folding literals and applying
    /// the algebraic identities. No deeper rewriting is attempted.
    pub fn evaluate(op: BinOp, left: ExprRef, right: ExprRef) -> Result<ExprRef, AnalysisError> {
        let (l, r) = (left.as_literal(), right.as_literal());
        if let (Some(a), Some(b)) = (l, r) {
            return op.apply(a, b).map(Expr::literal);
        }

        // At most one side is a literal from here on
        let (number, other) = match (l, r) {
            (Some(n), None) => (Some(n), &right),
            (None, Some(n)) => (Some(n), &left),
            _ => (None, &left),
        };

        let simplified = match op {
            BinOp::Mul if number == Some(0) => Some(Expr::literal(0)),
            BinOp::Mul if number == Some(1) => Some(Arc::clone(other)),
            BinOp::Add if number == Some(0) => Some(Arc::clone(other)),
            BinOp::Sub if r == Some(0) => Some(Arc::clone(&left)),
            BinOp::Div if left == right => Some(Expr::literal(1)),
            BinOp::Div if r == Some(1) => Some(Arc::clone(&left)),
            BinOp::Mod if left == right => Some(Expr::literal(0)),
            BinOp::Mod if r == Some(1) => Some(Expr::literal(0)),
            _ => None,
        };

        Ok(simplified.unwrap_or_else(|| Expr::binary(op, left, right)))
    }

    /// Conservative interval of this expression with every digit in `[1, 9]`.
    ///
    /// `*`, `/` and `%` require a strictly positive right-hand interval; anything
    /// else is a [`AnalysisError::ContractViolation`].
    pub fn limits(&self) -> Result<Limits, AnalysisError> {
        match self {
            Expr::Literal(n) => Ok(Limits::point(*n)),
            Expr::Digit(_) => Ok(Limits::new(DIGIT_MIN, DIGIT_MAX)),
            Expr::Binary { info, .. } => info.limits.clone(),
        }
    }

    /// Number of nodes in the fully expanded tree, saturating at `u64::MAX`
    pub fn tree_size(&self) -> u64 {
        match self {
            Expr::Literal(_) | Expr::Digit(_) => 1,
            Expr::Binary { info, .. } => info.size,
        }
    }

    /// Add every digit position referenced by this expression to `out`
    pub fn collect_digits(&self, out: &mut BTreeSet<usize>) {
        match self {
            Expr::Literal(_) => {}
            Expr::Digit(i) => {
                out.insert(*i);
            }
            Expr::Binary { info, .. } => out.extend(info.digits.iter().copied()),
        }
    }

    pub fn digits(&self) -> BTreeSet<usize> {
        let mut out = BTreeSet::new();
        self.collect_digits(&mut out);
        out
    }

    /// Evaluate with a concrete value for every digit position (`digits[i]` is `d<i>`)
    pub fn eval_concrete(&self, digits: &[i64]) -> Result<i64, AnalysisError> {
        if self.tree_size() <= TREE_EVAL_LIMIT {
            self.eval_tree(digits)
        } else {
            self.eval_shared(digits, &mut FxHashMap::default())
        }
    }

    fn eval_tree(&self, digits: &[i64]) -> Result<i64, AnalysisError> {
        match self {
            Expr::Literal(n) => Ok(*n),
            Expr::Digit(i) => digits.get(*i).copied().ok_or_else(|| {
                AnalysisError::contract(format!(
                    "digit d{} is outside the {}-digit assignment",
                    i,
                    digits.len()
                ))
            }),
            Expr::Binary {
                op, left, right, ..
            } => {
                let l = left.eval_tree(digits)?;
                let r = right.eval_tree(digits)?;
                op.apply(l, r)
            }
        }
    }

    /// Evaluation keyed by node address, so a shared node is computed once
    fn eval_shared(
        &self,
        digits: &[i64],
        memo: &mut FxHashMap<*const Expr, i64>,
    ) -> Result<i64, AnalysisError> {
        let Expr::Binary {
            op, left, right, ..
        } = self
        else {
            return self.eval_tree(digits);
        };

        let key = self as *const Expr;
        if let Some(&value) = memo.get(&key) {
            return Ok(value);
        }
        let l = left.eval_shared(digits, memo)?;
        let r = right.eval_shared(digits, memo)?;
        let value = op.apply(l, r)?;
        memo.insert(key, value);
        Ok(value)
    }

    fn fmt_nested(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        match self {
            Expr::Literal(n) => write!(f, "{}", n),
            Expr::Digit(i) => write!(f, "d{}", i),
            Expr::Binary { info, .. } if nested && info.size > DISPLAY_LIMIT => write!(f, "(...)"),
            Expr::Binary {
                op, left, right, ..
            } => {
                if nested {
                    write!(f, "(")?;
                }
                left.fmt_nested(f, true)?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_nested(f, true)?;
                if nested {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_nested(f, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add(l: ExprRef, r: ExprRef) -> ExprRef {
        Expr::binary(BinOp::Add, l, r)
    }

    #[test]
    fn test_literal_folding() {
        let fold = |op, a, b| Expr::evaluate(op, Expr::literal(a), Expr::literal(b)).unwrap();

        assert_eq!(*fold(BinOp::Add, 2, 3), Expr::Literal(5));
        assert_eq!(*fold(BinOp::Sub, 2, 3), Expr::Literal(-1));
        assert_eq!(*fold(BinOp::Mul, -4, 3), Expr::Literal(-12));
        assert_eq!(*fold(BinOp::Div, -7, 2), Expr::Literal(-3));
        assert_eq!(*fold(BinOp::Div, 7, -2), Expr::Literal(-3));
        assert_eq!(*fold(BinOp::Mod, -7, 2), Expr::Literal(-1));
        assert_eq!(*fold(BinOp::Mod, 7, -2), Expr::Literal(1));
        assert_eq!(*fold(BinOp::Eq, 4, 4), Expr::Literal(1));
        assert_eq!(*fold(BinOp::Neq, 4, 4), Expr::Literal(0));
    }

    #[test]
    fn test_division_by_zero_is_fatal() {
        let err = Expr::evaluate(BinOp::Div, Expr::literal(3), Expr::literal(0)).unwrap_err();
        assert!(matches!(err, AnalysisError::ContractViolation { .. }));
        assert!(Expr::evaluate(BinOp::Mod, Expr::literal(3), Expr::literal(0)).is_err());
        assert!(Expr::evaluate(BinOp::Div, Expr::literal(i64::MIN), Expr::literal(-1)).is_err());
    }

    #[test]
    fn test_identities() {
        let x = add(Expr::digit(0), Expr::literal(4));

        assert_eq!(*Expr::evaluate(BinOp::Mul, x.clone(), Expr::literal(0)).unwrap(), Expr::Literal(0));
        assert_eq!(*Expr::evaluate(BinOp::Mul, Expr::literal(0), x.clone()).unwrap(), Expr::Literal(0));
        assert_eq!(Expr::evaluate(BinOp::Mul, Expr::literal(1), x.clone()).unwrap(), x);
        assert_eq!(Expr::evaluate(BinOp::Add, x.clone(), Expr::literal(0)).unwrap(), x);
        assert_eq!(Expr::evaluate(BinOp::Add, Expr::literal(0), x.clone()).unwrap(), x);
        assert_eq!(Expr::evaluate(BinOp::Sub, x.clone(), Expr::literal(0)).unwrap(), x);
        assert_eq!(Expr::evaluate(BinOp::Div, x.clone(), Expr::literal(1)).unwrap(), x);
        assert_eq!(*Expr::evaluate(BinOp::Mod, x.clone(), Expr::literal(1)).unwrap(), Expr::Literal(0));
        assert_eq!(*Expr::evaluate(BinOp::Mod, x.clone(), x.clone()).unwrap(), Expr::Literal(0));

        // Structurally equal but separately built operands still cancel
        let twin = add(Expr::digit(0), Expr::literal(4));
        assert_eq!(*Expr::evaluate(BinOp::Div, x, twin).unwrap(), Expr::Literal(1));
        assert_eq!(
            *Expr::evaluate(BinOp::Div, Expr::digit(3), Expr::digit(3)).unwrap(),
            Expr::Literal(1)
        );
    }

    #[test]
    fn test_no_identity_for_left_zero_subtraction() {
        let e = Expr::evaluate(BinOp::Sub, Expr::literal(0), Expr::digit(1)).unwrap();
        assert_eq!(e.to_string(), "0 - d1");
    }

    #[test]
    fn test_unsimplified_node() {
        let e = Expr::evaluate(BinOp::Mul, Expr::digit(0), Expr::literal(26)).unwrap();
        assert!(matches!(*e, Expr::Binary { op: BinOp::Mul, .. }));
        assert_eq!(e.to_string(), "d0 * 26");
    }

    #[test]
    fn test_limits() {
        let doubled = Expr::binary(BinOp::Mul, Expr::digit(0), Expr::literal(2));
        assert_eq!(doubled.limits().unwrap(), Limits::new(2, 18));

        let shifted = Expr::binary(BinOp::Sub, Expr::digit(1), Expr::literal(6));
        assert_eq!(shifted.limits().unwrap(), Limits::new(-5, 3));

        let quotient = Expr::binary(BinOp::Div, add(Expr::digit(0), Expr::literal(20)), Expr::literal(26));
        assert_eq!(quotient.limits().unwrap(), Limits::new(0, 1));
    }

    #[test]
    fn test_limits_require_positive_divisor() {
        let bad = Expr::binary(BinOp::Div, Expr::digit(0), Expr::binary(BinOp::Sub, Expr::digit(1), Expr::literal(5)));
        assert!(matches!(bad.limits(), Err(AnalysisError::ContractViolation { .. })));

        let bad_mul = Expr::binary(BinOp::Mul, Expr::digit(0), Expr::literal(-1));
        assert!(bad_mul.limits().is_err());
    }

    #[test]
    fn test_collect_digits() {
        let e = add(
            Expr::binary(BinOp::Mul, Expr::digit(4), Expr::literal(26)),
            add(Expr::digit(1), Expr::digit(4)),
        );
        assert_eq!(e.digits().into_iter().collect::<Vec<_>>(), vec![1, 4]);
        assert!(Expr::literal(7).digits().is_empty());
    }

    #[test]
    fn test_eval_concrete() {
        let e = Expr::binary(
            BinOp::Mod,
            add(Expr::binary(BinOp::Mul, Expr::digit(0), Expr::literal(26)), Expr::digit(1)),
            Expr::literal(26),
        );
        assert_eq!(e.eval_concrete(&[3, 7]).unwrap(), 7);
        assert!(e.eval_concrete(&[3]).is_err());
    }

    /// `d0` doubled `n` times, every step sharing the previous node
    fn doubled(n: usize) -> ExprRef {
        let mut e = Expr::digit(0);
        for _ in 0..n {
            e = Expr::binary(BinOp::Add, e.clone(), e);
        }
        e
    }

    #[test]
    fn test_shared_graph_is_not_expanded() {
        let e = doubled(40);
        let diff = Expr::binary(BinOp::Sub, e.clone(), e.clone());

        assert_eq!(e.limits().unwrap(), Limits::new(1 << 40, 9 << 40));
        assert!(diff.limits().unwrap().contains(0));
        assert_eq!(diff.digits().into_iter().collect::<Vec<_>>(), vec![0]);
        assert_eq!(e.eval_concrete(&[3]).unwrap(), 3 << 40);
        assert_eq!(diff.eval_concrete(&[7]).unwrap(), 0);

        let deep = doubled(80);
        assert_eq!(deep.tree_size(), u64::MAX);
        assert!(matches!(
            deep.eval_concrete(&[1]),
            Err(AnalysisError::ArithmeticOverflow { .. })
        ));
    }

    #[test]
    fn test_tree_size() {
        assert_eq!(Expr::literal(4).tree_size(), 1);
        assert_eq!(add(Expr::digit(0), Expr::literal(4)).tree_size(), 3);
        assert_eq!(doubled(3).tree_size(), 15);
    }

    #[test]
    fn test_display_elides_large_subexpressions() {
        let text = Expr::binary(BinOp::Sub, doubled(40), Expr::literal(1)).to_string();
        assert_eq!(text, "(...) - 1");
        assert_eq!(doubled(2).to_string(), "(d0 + d0) + (d0 + d0)");
    }

    #[test]
    fn test_stored_limits_keep_divisor_error() {
        let bad = Expr::binary(BinOp::Mod, Expr::digit(0), Expr::literal(0));
        let outer = add(bad, Expr::literal(1));
        assert!(matches!(outer.limits(), Err(AnalysisError::ContractViolation { .. })));
    }

    #[test]
    fn test_display_parenthesizes_nested() {
        let e = Expr::binary(
            BinOp::Mod,
            add(Expr::digit(0), Expr::literal(4)),
            Expr::literal(26),
        );
        assert_eq!(e.to_string(), "(d0 + 4) % 26");
    }
}
