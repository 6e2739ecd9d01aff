// Candidate generator for free digit positions

use crate::interpreter::constants::{DIGIT_MAX, DIGIT_MIN};

/// Mixed-radix counter over `[1, 9]^wheels`.
///
/// Tuples come out in lexicographic order: the last wheel turns fastest and
/// carries into the one before it. A zero-wheel odometer yields the empty
/// tuple exactly once. The generator is single pass.
#[derive(Debug, Clone)]
pub struct Odometer {
    values: Vec<i64>,
    started: bool,
    exhausted: bool,
}

impl Odometer {
    pub fn new(wheels: usize) -> Self {
        Odometer {
            values: vec![DIGIT_MIN; wheels],
            started: false,
            exhausted: false,
        }
    }

    pub fn wheels(&self) -> usize {
        self.values.len()
    }

    /// Number of tuples a fresh odometer produces
    pub fn total(&self) -> u64 {
        let radix = (DIGIT_MAX - DIGIT_MIN + 1) as u64;
        radix.saturating_pow(self.values.len() as u32)
    }

    /// Advance and return the next tuple, or `None` once every tuple has been produced
    pub fn next_tuple(&mut self) -> Option<&[i64]> {
        if self.exhausted {
            return None;
        }
        if !self.started {
            self.started = true;
            return Some(&self.values);
        }

        for idx in (0..self.values.len()).rev() {
            if self.values[idx] < DIGIT_MAX {
                self.values[idx] += 1;
                for wheel in &mut self.values[idx + 1..] {
                    *wheel = DIGIT_MIN;
                }
                return Some(&self.values);
            }
        }

        self.exhausted = true;
        None
    }
}
