//! Digit resolution
//!
//! Turns a surviving path's conditions into a [`ResolutionPlan`]: which digit
//! positions have to be enumerated, which are computed from equalities of the
//! form `d<i> == f(other digits)`, and which conditions are only checked.
//!
//! # Pin Selection
//!
//! Equalities are visited in path order, which is the order the program
//! established them. An equality pins its bare-digit side when that digit
//!
//! - is not pinned already,
//! - has not been used as an input of an earlier pin, and
//! - does not occur on the other side.
//!
//! This guarantees every pin only reads free digits or digits pinned before it.
//! An equality that cannot pin is kept as a check. An equality with no bare
//! digit on either side is an [`AnalysisError::UnsupportedConditionShape`].

use crate::interpreter::constants::{DIGIT_MAX, DIGIT_MIN};
use crate::interpreter::engine::PathResult;
use crate::interpreter::errors::AnalysisError;
use crate::symbolic::{Condition, ConditionKind, ExprRef, Pin};
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    /// Every digit position the path mentions, ascending
    pub in_use: Vec<usize>,

    /// Positions to enumerate, most significant first
    pub free: Vec<usize>,

    /// Equalities oriented as `d<i> == source`, in application order
    pub pins: Vec<Condition>,

    /// Conditions evaluated once all pins are applied
    pub checks: Vec<Condition>,

    /// Final symbolic value of the target register
    pub value: ExprRef,

    /// The value's interval is exactly `{0}`, so it never needs evaluating
    pub value_is_zero: bool,
}

impl ResolutionPlan {
    pub fn build(result: &PathResult) -> Result<Self, AnalysisError> {
        let mut in_use = BTreeSet::new();
        result.value.collect_digits(&mut in_use);
        for condition in &result.conditions {
            condition.collect_digits(&mut in_use);
        }

        let mut pinned = BTreeSet::new();
        let mut needed = BTreeSet::new();
        let mut pins = Vec::new();
        let mut checks = Vec::new();

        for condition in &result.conditions {
            if condition.kind == ConditionKind::Neq {
                checks.push(condition.clone());
                continue;
            }

            let sides = condition.bare_digit_sides();
            if sides.iter().all(Option::is_none) {
                return Err(AnalysisError::UnsupportedConditionShape {
                    condition: condition.to_string(),
                });
            }

            let choice = sides.into_iter().flatten().find(|(digit, source)| {
                !pinned.contains(digit) && !needed.contains(digit) && !source.digits().contains(digit)
            });

            match choice {
                Some((digit, source)) => {
                    needed.extend(source.digits());
                    pinned.insert(digit);
                    pins.push(condition.oriented_to(digit));
                }
                None => checks.push(condition.clone()),
            }
        }

        let free = in_use.difference(&pinned).copied().collect();

        Ok(ResolutionPlan {
            in_use: in_use.into_iter().collect(),
            free,
            pins,
            checks,
            value_is_zero: result.value.limits()?.is_exactly(0),
            value: result.value.clone(),
        })
    }

    /// Complete a candidate whose free positions are set: apply every pin,
    /// then every check, then the target value. Returns whether it is feasible.
    ///
    /// A candidate whose evaluation overflows is rejected, not reported.
    pub fn accepts(&self, digits: &mut [i64]) -> Result<bool, AnalysisError> {
        match self.complete(digits) {
            Err(AnalysisError::ArithmeticOverflow { .. }) => Ok(false),
            other => other,
        }
    }

    fn complete(&self, digits: &mut [i64]) -> Result<bool, AnalysisError> {
        for pin in &self.pins {
            let Pin { digit, value } = pin.resolve_pin(digits)?;
            if !(DIGIT_MIN..=DIGIT_MAX).contains(&value) {
                return Ok(false);
            }
            let width = digits.len();
            let slot = digits.get_mut(digit).ok_or_else(|| {
                AnalysisError::contract(format!(
                    "pinned digit d{} is outside the {}-digit assignment",
                    digit, width
                ))
            })?;
            *slot = value;
        }

        for check in &self.checks {
            if !check.holds(digits)? {
                return Ok(false);
            }
        }

        if !self.value_is_zero && self.value.eval_concrete(digits)? != 0 {
            return Ok(false);
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::{BinOp, Expr};

    fn plus(l: ExprRef, n: i64) -> ExprRef {
        Expr::binary(BinOp::Add, l, Expr::literal(n))
    }

    fn eq(left: ExprRef, right: ExprRef) -> Condition {
        Condition::new(ConditionKind::Eq, left, right)
    }

    #[test]
    fn test_partition() {
        // d1 == d0 + 3, d3 == d2 - 1, value d0 % 3
        let result = PathResult {
            conditions: vec![
                eq(Expr::digit(1), plus(Expr::digit(0), 3)),
                eq(plus(Expr::digit(2), -1), Expr::digit(3)),
            ],
            value: Expr::binary(BinOp::Mod, Expr::digit(0), Expr::literal(3)),
        };
        let plan = ResolutionPlan::build(&result).unwrap();

        assert_eq!(plan.in_use, vec![0, 1, 2, 3]);
        assert_eq!(plan.free, vec![0, 2]);
        assert_eq!(plan.pins.len(), 2);
        assert_eq!(plan.pins[1].left.as_digit(), Some(3));
        assert!(plan.checks.is_empty());
        assert!(!plan.value_is_zero);
    }

    #[test]
    fn test_accepts_applies_pins_and_value() {
        let result = PathResult {
            conditions: vec![eq(Expr::digit(1), plus(Expr::digit(0), 3))],
            value: Expr::binary(BinOp::Mod, Expr::digit(0), Expr::literal(3)),
        };
        let plan = ResolutionPlan::build(&result).unwrap();

        let mut digits = vec![3, 1];
        assert!(plan.accepts(&mut digits).unwrap());
        assert_eq!(digits, vec![3, 6]);

        // Pinned value out of range
        let mut digits = vec![7, 1];
        assert!(!plan.accepts(&mut digits).unwrap());

        // Target value nonzero
        let mut digits = vec![4, 1];
        assert!(!plan.accepts(&mut digits).unwrap());
    }

    #[test]
    fn test_chained_pins_resolve_in_order() {
        // d1 == d0 + 1, d2 == d1 + 1
        let result = PathResult {
            conditions: vec![
                eq(Expr::digit(1), plus(Expr::digit(0), 1)),
                eq(Expr::digit(2), plus(Expr::digit(1), 1)),
            ],
            value: Expr::literal(0),
        };
        let plan = ResolutionPlan::build(&result).unwrap();
        assert_eq!(plan.free, vec![0]);
        assert!(plan.value_is_zero);

        let mut digits = vec![5, 1, 1];
        assert!(plan.accepts(&mut digits).unwrap());
        assert_eq!(digits, vec![5, 6, 7]);
    }

    #[test]
    fn test_repinned_digit_becomes_check() {
        // Both conditions name d1 bare; the second one can only be checked
        let result = PathResult {
            conditions: vec![
                eq(Expr::digit(1), plus(Expr::digit(0), 1)),
                eq(Expr::digit(1), plus(Expr::digit(2), 2)),
            ],
            value: Expr::literal(0),
        };
        let plan = ResolutionPlan::build(&result).unwrap();
        assert_eq!(plan.pins.len(), 1);
        assert_eq!(plan.checks.len(), 1);
        assert_eq!(plan.free, vec![0, 2]);

        let mut digits = vec![4, 1, 3];
        assert!(plan.accepts(&mut digits).unwrap());
        let mut digits = vec![4, 1, 2];
        assert!(!plan.accepts(&mut digits).unwrap());
    }

    #[test]
    fn test_dependency_is_never_pinned_later() {
        // d1 is read by the first pin, so the second equality cannot pin it
        let result = PathResult {
            conditions: vec![
                eq(Expr::digit(0), plus(Expr::digit(1), 1)),
                eq(Expr::digit(1), plus(Expr::digit(2), 1)),
            ],
            value: Expr::literal(0),
        };
        let plan = ResolutionPlan::build(&result).unwrap();
        assert_eq!(plan.pins.len(), 1);
        assert_eq!(plan.checks.len(), 1);
        assert_eq!(plan.free, vec![1, 2]);
    }

    #[test]
    fn test_inequalities_are_checks() {
        let result = PathResult {
            conditions: vec![Condition::new(ConditionKind::Neq, Expr::digit(0), Expr::digit(1))],
            value: Expr::literal(0),
        };
        let plan = ResolutionPlan::build(&result).unwrap();
        assert_eq!(plan.free, vec![0, 1]);

        assert!(!plan.accepts(&mut [2, 2]).unwrap());
        assert!(plan.accepts(&mut [2, 3]).unwrap());
    }

    #[test]
    fn test_overflowing_candidate_is_rejected() {
        // d0 ^ 32 - 1 is zero for d0 = 1 and overflows from d0 = 4
        let mut power = Expr::digit(0);
        for _ in 0..5 {
            power = Expr::binary(BinOp::Mul, power.clone(), power);
        }
        let result = PathResult {
            conditions: Vec::new(),
            value: Expr::binary(BinOp::Sub, power, Expr::literal(1)),
        };
        let plan = ResolutionPlan::build(&result).unwrap();

        assert!(plan.accepts(&mut [1]).unwrap());
        assert!(!plan.accepts(&mut [2]).unwrap());
        assert!(!plan.accepts(&mut [4]).unwrap());
        assert!(!plan.accepts(&mut [9]).unwrap());
    }

    #[test]
    fn test_division_by_zero_stays_fatal() {
        // The divisor d1 % 2 is zero for every even d1
        let result = PathResult {
            conditions: vec![Condition::new(
                ConditionKind::Neq,
                Expr::binary(
                    BinOp::Div,
                    Expr::digit(0),
                    Expr::binary(BinOp::Mod, Expr::digit(1), Expr::literal(2)),
                ),
                Expr::literal(3),
            )],
            value: Expr::literal(0),
        };
        let plan = ResolutionPlan::build(&result).unwrap();

        assert!(matches!(
            plan.accepts(&mut [4, 2]),
            Err(AnalysisError::ContractViolation { .. })
        ));
    }

    #[test]
    fn test_no_bare_digit_is_unsupported() {
        let result = PathResult {
            conditions: vec![eq(plus(Expr::digit(0), 1), plus(Expr::digit(1), 2))],
            value: Expr::literal(0),
        };
        assert!(matches!(
            ResolutionPlan::build(&result),
            Err(AnalysisError::UnsupportedConditionShape { .. })
        ));
    }
}
