// Path conditions: equalities and inequalities that must hold for a path to be taken

use crate::interpreter::errors::AnalysisError;
use crate::symbolic::expr::{BinOp, ExprRef};
use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionKind {
    Eq,
    Neq,
}

impl ConditionKind {
    pub fn negate(self) -> ConditionKind {
        match self {
            ConditionKind::Eq => ConditionKind::Neq,
            ConditionKind::Neq => ConditionKind::Eq,
        }
    }

    pub fn bin_op(self) -> BinOp {
        match self {
            ConditionKind::Eq => BinOp::Eq,
            ConditionKind::Neq => BinOp::Neq,
        }
    }
}

/// A digit value forced by an equality condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pin {
    pub digit: usize,
    pub value: i64,
}

/// `left == right` or `left != right`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Condition {
    pub kind: ConditionKind,
    pub left: ExprRef,
    pub right: ExprRef,
}

impl Condition {
    pub fn new(kind: ConditionKind, left: ExprRef, right: ExprRef) -> Self {
        Condition { kind, left, right }
    }

    /// The complementary condition (taken on the other side of a fork)
    pub fn negated(&self) -> Condition {
        Condition {
            kind: self.kind.negate(),
            left: Arc::clone(&self.left),
            right: Arc::clone(&self.right),
        }
    }

    /// True when the operand intervals cannot overlap
    fn operands_disjoint(&self) -> Result<bool, AnalysisError> {
        let l = self.left.limits()?;
        let r = self.right.limits()?;
        Ok(!l.intersects(&r))
    }

    /// An equality whose sides can never meet
    pub fn eql_is_definitely_false(&self) -> Result<bool, AnalysisError> {
        debug_assert_eq!(self.kind, ConditionKind::Eq);
        self.operands_disjoint()
    }

    /// An inequality that holds for every digit assignment
    pub fn neq_is_definitely_true(&self) -> Result<bool, AnalysisError> {
        debug_assert_eq!(self.kind, ConditionKind::Neq);
        self.operands_disjoint()
    }

    pub fn collect_digits(&self, out: &mut BTreeSet<usize>) {
        self.left.collect_digits(out);
        self.right.collect_digits(out);
    }

    /// Concrete truth value under a full digit assignment
    pub fn holds(&self, digits: &[i64]) -> Result<bool, AnalysisError> {
        let l = self.left.eval_concrete(digits)?;
        let r = self.right.eval_concrete(digits)?;
        Ok(match self.kind {
            ConditionKind::Eq => l == r,
            ConditionKind::Neq => l != r,
        })
    }

    /// The side holding a bare digit, preferring the left, with the opposite side
    pub fn bare_digit_sides(&self) -> [Option<(usize, &ExprRef)>; 2] {
        [
            self.left.as_digit().map(|d| (d, &self.right)),
            self.right.as_digit().map(|d| (d, &self.left)),
        ]
    }

    /// Resolve `d<i> == expr` (either orientation) into the digit it pins.
    ///
    /// The left side wins when both sides are bare digits. Every digit `expr`
    /// mentions must already be set in `digits`.
    pub fn resolve_pin(&self, digits: &[i64]) -> Result<Pin, AnalysisError> {
        let unsupported = || AnalysisError::UnsupportedConditionShape {
            condition: self.to_string(),
        };
        if self.kind != ConditionKind::Eq {
            return Err(unsupported());
        }
        let (digit, source) = self
            .bare_digit_sides()
            .into_iter()
            .flatten()
            .next()
            .ok_or_else(unsupported)?;
        Ok(Pin {
            digit,
            value: source.eval_concrete(digits)?,
        })
    }

    /// Same condition with `digit` moved to the left side
    pub fn oriented_to(&self, digit: usize) -> Condition {
        if self.left.as_digit() == Some(digit) {
            self.clone()
        } else {
            Condition {
                kind: self.kind,
                left: Arc::clone(&self.right),
                right: Arc::clone(&self.left),
            }
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.left, self.kind.bin_op().symbol(), self.right)
    }
}
