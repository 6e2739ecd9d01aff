// Instruction definitions for ALU programs

use std::fmt;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// The four persistent registers of the ALU
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Register {
    W,
    X,
    Y,
    Z,
}

impl Register {
    pub const ALL: [Register; 4] = [Register::W, Register::X, Register::Y, Register::Z];

    pub fn from_name(name: &str) -> Option<Register> {
        match name {
            "w" => Some(Register::W),
            "x" => Some(Register::X),
            "y" => Some(Register::Y),
            "z" => Some(Register::Z),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Register::W => "w",
            Register::X => "x",
            Register::Y => "y",
            Register::Z => "z",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Opcodes understood by the interpreter.
///
/// `Sub` and `Neq` never appear in raw program text; they are produced by
/// [`crate::parser::normalize`] and accepted by the parser so that normalized
/// programs can be written out and read back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    Input,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Neq,
}

impl Opcode {
    /// Mnemonic → opcode table
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        match mnemonic {
            "inp" => Some(Opcode::Input),
            "add" => Some(Opcode::Add),
            "sub" => Some(Opcode::Sub),
            "mul" => Some(Opcode::Mul),
            "div" => Some(Opcode::Div),
            "mod" => Some(Opcode::Mod),
            "eql" => Some(Opcode::Eq),
            "neq" => Some(Opcode::Neq),
            _ => None,
        }
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Input => "inp",
            Opcode::Add => "add",
            Opcode::Sub => "sub",
            Opcode::Mul => "mul",
            Opcode::Div => "div",
            Opcode::Mod => "mod",
            Opcode::Eq => "eql",
            Opcode::Neq => "neq",
        }
    }

    /// Number of source operands following the destination register
    pub fn source_count(self) -> usize {
        match self {
            Opcode::Input => 0,
            _ => 1,
        }
    }

    pub fn is_comparison(self) -> bool {
        matches!(self, Opcode::Eq | Opcode::Neq)
    }
}

/// Source operand of a binary instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operand {
    Register(Register),
    Literal(i64),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Register(r) => write!(f, "{}", r),
            Operand::Literal(n) => write!(f, "{}", n),
        }
    }
}

/// One program line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: Opcode,
    pub dest: Register,
    pub src: Option<Operand>, // None only for Input
    pub location: SourceLocation,
}

impl Instruction {
    pub fn input(dest: Register) -> Self {
        Instruction {
            opcode: Opcode::Input,
            dest,
            src: None,
            location: SourceLocation::default(),
        }
    }

    pub fn binary(opcode: Opcode, dest: Register, src: Operand) -> Self {
        Instruction {
            opcode,
            dest,
            src: Some(src),
            location: SourceLocation::default(),
        }
    }

    pub fn at(mut self, location: SourceLocation) -> Self {
        self.location = location;
        self
    }

    /// Literal value of the source operand, if it is one
    pub fn literal(&self) -> Option<i64> {
        match self.src {
            Some(Operand::Literal(n)) => Some(n),
            _ => None,
        }
    }

    pub fn src_is_literal(&self) -> bool {
        self.literal().is_some()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.src {
            Some(src) => write!(f, "{} {} {}", self.opcode.mnemonic(), self.dest, src),
            None => write!(f, "{} {}", self.opcode.mnemonic(), self.dest),
        }
    }
}

/// A parsed program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    pub instructions: Vec<Instruction>,
}

impl Program {
    pub fn new() -> Self {
        Program {
            instructions: Vec::new(),
        }
    }

    /// Number of `inp` instructions, i.e. the number of digit positions
    pub fn input_count(&self) -> usize {
        self.instructions
            .iter()
            .filter(|i| i.opcode == Opcode::Input)
            .count()
    }
}

impl From<Vec<Instruction>> for Program {
    fn from(instructions: Vec<Instruction>) -> Self {
        Program { instructions }
    }
}
