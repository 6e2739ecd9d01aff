//! # Introduction
//!
//! symalu finds the largest and smallest digit strings accepted by a program
//! for a four-register ALU. Digits are read one per `inp` instruction, each in
//! `1..=9`, and a number is accepted when the target register (`z` by
//! default) ends at zero.
//!
//! Instead of running the program on every input, the interpreter executes it
//! once over symbolic digits and forks at every comparison. Interval bounds
//! prune most paths before any digit is chosen.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Parser → Normalizer → Interpreter → Resolver → Search
//! ```
//!
//! 1. [`parser`]: tokenises the program text, builds the instruction list and
//!    rewrites it into the normalized form the interpreter expects.
//! 2. [`symbolic`]: shared expression trees with constant folding, interval
//!    bounds and path conditions.
//! 3. [`interpreter`]: the path-forking engine. Every path that can still end
//!    with the target at zero is reported with its conditions.
//! 4. [`search`]: pins digits that equalities determine, enumerates the rest
//!    and keeps the extremes, sequentially or on a rayon pool.
//!
//! ## Example
//!
//! ```
//! use symalu::{solve_source, SolverConfig};
//!
//! let program = "inp w\ninp x\nadd z w\nsub z x";
//! let solution = solve_source(program, &SolverConfig::default()).unwrap();
//! let extremes = solution.extremes.unwrap();
//! assert_eq!((extremes.max, extremes.min), (99, 11));
//! ```

pub mod config;
pub mod interpreter;
pub mod parser;
pub mod search;
pub mod solve;
pub mod symbolic;

pub use config::SolverConfig;
pub use search::Extremes;
pub use solve::{solve_program, solve_source, Solution, SolveError};
