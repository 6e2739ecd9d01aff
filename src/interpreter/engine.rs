// Path-forking symbolic execution engine

use crate::interpreter::environment::Environment;
use crate::interpreter::errors::AnalysisError;
use crate::parser::ast::{Instruction, Opcode, Program, Register};
use crate::parser::normalize::{is_foldable_pair, is_negative_add};
use crate::symbolic::{BinOp, Condition, ConditionKind, Expr, ExprRef};
use tracing::{debug, info, trace};

/// One surviving path: the conditions it relies on and the target's final value
#[derive(Debug, Clone, PartialEq)]
pub struct PathResult {
    pub conditions: Vec<Condition>,
    pub value: ExprRef,
}

/// Counters collected while exploring
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExplorationStats {
    /// Paths that reached the end of the program
    pub paths: u64,
    /// Paths whose target interval excludes zero
    pub pruned_by_target: u64,
    /// Paths carrying an equality that can never hold
    pub pruned_by_condition: u64,
    /// Inequalities dropped from survivors because they always hold
    pub dropped_conditions: u64,
    pub survivors: u64,
}

/// Everything the search needs from an exploration
#[derive(Debug, Clone)]
pub struct Analysis {
    pub results: Vec<PathResult>,
    /// Number of digit positions (`inp` instructions) in the program
    pub width: usize,
    pub stats: ExplorationStats,
}

/// Symbolic interpreter that explores both outcomes of every comparison
pub struct Interpreter {
    program: Program,

    /// Register that must end at zero
    target: Register,

    /// Survivors collected so far
    results: Vec<PathResult>,

    stats: ExplorationStats,
}

impl Interpreter {
    /// Create an interpreter over a normalized program
    pub fn new(program: Program, target: Register) -> Result<Self, AnalysisError> {
        verify_normalized(&program.instructions)?;
        Ok(Interpreter {
            program,
            target,
            results: Vec::new(),
            stats: ExplorationStats::default(),
        })
    }

    /// Explore every path and return the survivors
    #[tracing::instrument(skip_all, name = "explore")]
    pub fn run(mut self) -> Result<Analysis, AnalysisError> {
        info!(
            instructions = self.program.instructions.len(),
            target = %self.target,
            "exploring program paths"
        );

        self.explore(0, 0, Environment::new(), Vec::new())?;

        let stats = self.stats;
        info!(
            paths = stats.paths,
            survivors = stats.survivors,
            pruned_by_target = stats.pruned_by_target,
            pruned_by_condition = stats.pruned_by_condition,
            "exploration finished"
        );

        Ok(Analysis {
            width: self.program.input_count(),
            results: self.results,
            stats,
        })
    }

    /// Interpret from `start`, forking at each comparison.
    ///
    /// The taken branch recurses on copies of `env` and `conditions`; the
    /// not-taken branch continues in this call with the originals.
    fn explore(
        &mut self,
        start: usize,
        mut input_index: usize,
        mut env: Environment,
        mut conditions: Vec<Condition>,
    ) -> Result<(), AnalysisError> {
        for idx in start..self.program.instructions.len() {
            let instruction = self.program.instructions[idx];
            let dest = instruction.dest;

            match instruction.opcode {
                Opcode::Input => {
                    env.set(dest, Expr::digit(input_index));
                    input_index += 1;
                }

                Opcode::Eq | Opcode::Neq => {
                    let kind = match instruction.opcode {
                        Opcode::Eq => ConditionKind::Eq,
                        _ => ConditionKind::Neq,
                    };
                    let src = instruction.src.ok_or_else(|| missing_operand(&instruction))?;
                    let condition = Condition::new(kind, env.get(dest), env.operand(src));
                    trace!(line = instruction.location.line, %condition, "fork");

                    let mut taken_env = env.clone();
                    taken_env.set(dest, Expr::literal(1));
                    let mut taken_conditions = conditions.clone();
                    taken_conditions.push(condition.clone());
                    self.explore(idx + 1, input_index, taken_env, taken_conditions)?;

                    conditions.push(condition.negated());
                    env.set(dest, Expr::literal(0));
                }

                Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Mod => {
                    let op = BinOp::from_opcode(instruction.opcode).ok_or_else(|| {
                        AnalysisError::contract(format!("'{}' has no operator", instruction))
                    })?;
                    let src = instruction.src.ok_or_else(|| missing_operand(&instruction))?;
                    let value = Expr::evaluate(op, env.get(dest), env.operand(src))?;
                    env.set(dest, value);
                }
            }
        }

        self.finish_path(&env, conditions)
    }

    /// Prune or record a path that ran to the end of the program
    fn finish_path(
        &mut self,
        env: &Environment,
        conditions: Vec<Condition>,
    ) -> Result<(), AnalysisError> {
        self.stats.paths += 1;
        let value = env.get(self.target);

        let limits = value.limits()?;
        if !limits.contains(0) {
            self.stats.pruned_by_target += 1;
            trace!(%limits, "pruned: target cannot reach zero");
            return Ok(());
        }

        for condition in &conditions {
            if condition.kind == ConditionKind::Eq && condition.eql_is_definitely_false()? {
                self.stats.pruned_by_condition += 1;
                trace!(%condition, "pruned: equality can never hold");
                return Ok(());
            }
        }

        let mut retained = Vec::with_capacity(conditions.len());
        for condition in conditions {
            if condition.kind == ConditionKind::Neq && condition.neq_is_definitely_true()? {
                self.stats.dropped_conditions += 1;
                continue;
            }
            retained.push(condition);
        }

        self.stats.survivors += 1;
        debug!(
            conditions = retained.len(),
            %limits,
            value = %value,
            "path survives"
        );
        self.results.push(PathResult {
            conditions: retained,
            value,
        });
        Ok(())
    }
}

fn missing_operand(instruction: &Instruction) -> AnalysisError {
    AnalysisError::MissingOperand {
        opcode: instruction.opcode.mnemonic(),
        location: instruction.location,
    }
}

/// Reject a stream that still needs loader rewrites
pub fn verify_normalized(instructions: &[Instruction]) -> Result<(), AnalysisError> {
    for (idx, instruction) in instructions.iter().enumerate() {
        if instruction.opcode != Opcode::Input && instruction.src.is_none() {
            return Err(missing_operand(instruction));
        }

        if is_negative_add(instruction) {
            return Err(AnalysisError::NotNormalized {
                message: format!("'{}' adds a negative literal", instruction),
                location: instruction.location,
            });
        }

        if idx > 0 && is_foldable_pair(&instructions[idx - 1], instruction) {
            return Err(AnalysisError::NotNormalized {
                message: format!(
                    "'{}' re-tests the preceding comparison '{}'",
                    instruction,
                    instructions[idx - 1]
                ),
                location: instruction.location,
            });
        }
    }
    Ok(())
}
