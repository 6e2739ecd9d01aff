//! Analysis error types
//!
//! This module defines [`AnalysisError`], which represents every failure the
//! symbolic interpreter and the search can report (as opposed to parse errors,
//! which are reported by [`crate::parser::parse::ParseError`]).
//!
//! Analysis errors are fatal, with one exception: an
//! [`AnalysisError::ArithmeticOverflow`] raised while a search candidate is
//! evaluated only rejects that candidate, since a value outside `i64` is never
//! zero.

use crate::parser::ast::SourceLocation;

/// Errors that can occur during exploration or search
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnalysisError {
    /// A precondition of the interval or concrete arithmetic does not hold
    /// (non-positive divisor interval, division by zero, digit outside the
    /// assignment)
    #[error("contract violation: {message}")]
    ContractViolation { message: String },

    /// Concrete arithmetic left the `i64` range
    #[error("arithmetic overflow in {message}")]
    ArithmeticOverflow { message: String },

    /// A digit was to be pinned from a condition with no bare digit on either side
    #[error("unsupported condition shape: {condition}")]
    UnsupportedConditionShape { condition: String },

    /// The instruction stream still contains a rewrite the loader should have applied
    #[error("program is not normalized at line {}: {message}", .location.line)]
    NotNormalized {
        message: String,
        location: SourceLocation,
    },

    /// A non-input instruction without a source operand
    #[error("'{opcode}' is missing its source operand at line {}", .location.line)]
    MissingOperand {
        opcode: &'static str,
        location: SourceLocation,
    },

    /// Invalid solver configuration
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },
}

impl AnalysisError {
    pub fn contract(message: impl Into<String>) -> Self {
        AnalysisError::ContractViolation {
            message: message.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        AnalysisError::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            AnalysisError::NotNormalized { location, .. } => Some(location),
            AnalysisError::MissingOperand { location, .. } => Some(location),
            AnalysisError::ContractViolation { .. } => None,
            AnalysisError::ArithmeticOverflow { .. } => None,
            AnalysisError::UnsupportedConditionShape { .. } => None,
            AnalysisError::InvalidConfig { .. } => None,
        }
    }
}
