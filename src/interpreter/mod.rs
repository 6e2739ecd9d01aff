//! Symbolic ALU interpreter
//!
//! This module provides the path-forking execution logic:
//! - [`engine`]: the interpreter that forks at every comparison and prunes
//!   paths that cannot finish with the target register at zero
//! - [`environment`]: symbolic register file
//! - [`errors`]: analysis error types
//! - [`constants`]: digit range and default target
//!
//! # Execution Model
//!
//! Registers hold shared expression trees. An `inp` binds the next digit
//! symbol. A comparison splits the path: one branch assumes it holds and sets
//! the destination to 1, the other assumes the negation and sets it to 0.
//! Every path that reaches the end of the program is checked against interval
//! bounds before it is reported.

pub mod constants;
pub mod engine;
pub mod environment;
pub mod errors;
