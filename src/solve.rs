// End-to-end solve: program text to extremal model numbers

use crate::config::SolverConfig;
use crate::interpreter::engine::{ExplorationStats, Interpreter};
use crate::interpreter::errors::AnalysisError;
use crate::parser::ast::Program;
use crate::parser::normalize::normalize;
use crate::parser::parse::{parse_program, ParseError};
use crate::search::{search, Extremes};
use tracing::info;

/// Any failure between reading program text and producing the extremes
#[derive(Debug, thiserror::Error)]
pub enum SolveError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

/// Outcome of a full solve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// `None` when no digit assignment drives the target to zero
    pub extremes: Option<Extremes>,

    /// Digits per number, one per `inp`
    pub width: usize,

    pub stats: ExplorationStats,
}

/// Parse, normalize, explore and search `source`
#[tracing::instrument(skip_all, name = "solve", fields(target = %config.target))]
pub fn solve_source(source: &str, config: &SolverConfig) -> Result<Solution, SolveError> {
    let program = normalize(parse_program(source)?);
    info!(instructions = program.instructions.len(), "program loaded");
    Ok(solve_program(program, config)?)
}

/// Explore and search an already normalized program
pub fn solve_program(program: Program, config: &SolverConfig) -> Result<Solution, AnalysisError> {
    config.validate()?;
    let analysis = Interpreter::new(program, config.target)?.run()?;
    let extremes = search(&analysis, config)?;
    Ok(Solution {
        extremes,
        width: analysis.width,
        stats: analysis.stats,
    })
}
