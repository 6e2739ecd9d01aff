// Constants for the symbolic interpreter

use crate::parser::ast::Register;

/// Smallest value an input digit can take
pub const DIGIT_MIN: i64 = 1;

/// Largest value an input digit can take
pub const DIGIT_MAX: i64 = 9;

/// Number of `inp` instructions in a full model-number checker
pub const INPUT_DIGITS: usize = 14;

/// Register whose final value must be zero
pub const DEFAULT_TARGET: Register = Register::Z;
