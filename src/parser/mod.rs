//! ALU program loader
//!
//! This module transforms program text into a normalized instruction list:
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → [`ast::Program`])
//! - [`normalize`]: The rewrites the symbolic interpreter depends on
//! - [`ast`]: Instruction, opcode and register definitions
//!
//! # Instruction Set
//!
//! `inp a`, `add a b`, `mul a b`, `div a b`, `mod a b`, `eql a b`, where `a` is
//! one of the registers `w x y z` and `b` is a register or an integer literal.
//! `sub` and `neq` are accepted as well since normalization produces them.
//!
//! # Parser Implementation
//!
//! Hand-written line-oriented parser. No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod normalize;
pub mod parse;
