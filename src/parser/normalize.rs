//! Instruction-stream normalization
//!
//! The symbolic interpreter expects two rewrites to have been applied:
//!
//! ```text
//! add r -n            →  sub r n
//! eql a b ; eql a 0   →  neq a b
//! eql a b ; eql a 1   →  eql a b
//! ```
//!
//! The second rewrite turns the "compare then invert" idiom into a single
//! condition so that every comparison the interpreter forks on is a real one.

use crate::parser::ast::{Instruction, Opcode, Operand, Program};

/// Returns true when `second` is the boolean re-test of `first`'s result
pub fn is_foldable_pair(first: &Instruction, second: &Instruction) -> bool {
    first.opcode.is_comparison()
        && second.opcode == Opcode::Eq
        && first.dest == second.dest
        && matches!(second.literal(), Some(0 | 1))
}

/// Returns true for an `add` of a negative literal
pub fn is_negative_add(instruction: &Instruction) -> bool {
    instruction.opcode == Opcode::Add && instruction.literal().is_some_and(|n| n < 0)
}

/// Apply both rewrites, producing the stream the interpreter accepts
pub fn normalize(program: Program) -> Program {
    let mut out: Vec<Instruction> = Vec::with_capacity(program.instructions.len());

    for mut instruction in program.instructions {
        if is_negative_add(&instruction) {
            // i64::MIN has no positive counterpart and stays an add
            if let Some(n) = instruction.literal().and_then(i64::checked_neg) {
                instruction.opcode = Opcode::Sub;
                instruction.src = Some(Operand::Literal(n));
            }
        }

        if let Some(prev) = out.last_mut() {
            if is_foldable_pair(prev, &instruction) {
                if instruction.literal() == Some(0) {
                    prev.opcode = match prev.opcode {
                        Opcode::Eq => Opcode::Neq,
                        _ => Opcode::Eq,
                    };
                }
                continue;
            }
        }

        out.push(instruction);
    }

    Program::from(out)
}
