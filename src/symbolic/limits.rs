// Closed integer intervals used for feasibility pruning

use std::fmt;

/// The closed range `[min, max]` of values an expression can take while every
/// digit symbol it mentions ranges over `[1, 9]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub min: i64,
    pub max: i64,
}

impl Limits {
    pub fn new(min: i64, max: i64) -> Self {
        debug_assert!(min <= max, "empty interval [{}, {}]", min, max);
        Limits { min, max }
    }

    pub fn point(value: i64) -> Self {
        Limits::new(value, value)
    }

    /// Closed-interval overlap: `[a, b]` and `[c, d]` intersect iff `a <= d && c <= b`
    pub fn intersects(&self, other: &Limits) -> bool {
        self.min <= other.max && other.min <= self.max
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }

    /// True when the interval is exactly `{value}`
    pub fn is_exactly(&self, value: i64) -> bool {
        self.min == value && self.max == value
    }

    pub fn is_strictly_positive(&self) -> bool {
        self.min > 0
    }

    pub fn negate(&self) -> Limits {
        Limits::new(self.max.saturating_neg(), self.min.saturating_neg())
    }

    pub fn add(&self, other: &Limits) -> Limits {
        Limits::new(
            self.min.saturating_add(other.min),
            self.max.saturating_add(other.max),
        )
    }

    pub fn sub(&self, other: &Limits) -> Limits {
        self.add(&other.negate())
    }

    /// Product with a strictly positive interval.
    ///
    /// Reduces to `[min_l * min_r, max_l * max_r]` for a non-negative left side.
    pub fn mul_positive(&self, rhs: &Limits) -> Limits {
        debug_assert!(rhs.is_strictly_positive());
        let min = self.min.saturating_mul(rhs.min).min(self.min.saturating_mul(rhs.max));
        let max = self.max.saturating_mul(rhs.max).max(self.max.saturating_mul(rhs.min));
        Limits::new(min, max)
    }

    /// Truncating quotient by a strictly positive interval.
    ///
    /// Reduces to `[min_l / max_r, max_l / min_r]` for a non-negative left side.
    pub fn div_positive(&self, rhs: &Limits) -> Limits {
        debug_assert!(rhs.is_strictly_positive());
        let min = (self.min / rhs.min).min(self.min / rhs.max);
        let max = (self.max / rhs.min).max(self.max / rhs.max);
        Limits::new(min, max)
    }

    /// Remainder by a strictly positive interval (sign follows the dividend).
    ///
    /// For a point divisor `[m, m]` and a non-negative dividend this is
    /// `[0, min(max_l, m - 1)]`, never looser than `[0, m - 1]`.
    pub fn rem_positive(&self, rhs: &Limits) -> Limits {
        debug_assert!(rhs.is_strictly_positive());
        let bound = rhs.max - 1;
        let min = if self.min >= 0 {
            0
        } else {
            self.min.max(-bound)
        };
        let max = if self.max <= 0 {
            0
        } else {
            self.max.min(bound)
        };
        Limits::new(min, max)
    }
}

impl fmt::Display for Limits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
