//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct, the [`ParseError`] type and the
//! program entry point. Each non-empty line is one instruction of the form
//! `<mnemonic> <register> [<register-or-literal>]`.
//!
//! The parser does not normalize; see [`crate::parser::normalize`] for the
//! rewrites the interpreter requires.

use crate::parser::ast::*;
use crate::parser::lexer::{LexError, Lexer, Token};

/// Parser error type
#[derive(Debug, Clone, thiserror::Error)]
#[error("parse error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct ParseError {
    pub message: String,
    pub location: SourceLocation,
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError {
            message: err.message,
            location: err.location,
        }
    }
}

/// Line-oriented parser for ALU programs
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
}

impl Parser {
    pub fn new(source: &str) -> Result<Self, ParseError> {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.tokenize()?;
        Ok(Self {
            tokens,
            position: 0,
        })
    }

    /// Parse the entire program
    pub fn parse_program(&mut self) -> Result<Program, ParseError> {
        let mut program = Program::new();

        while !self.is_at_end() {
            let instruction = self.parse_instruction()?;
            program.instructions.push(instruction);
        }

        Ok(program)
    }

    fn parse_instruction(&mut self) -> Result<Instruction, ParseError> {
        let location = self.peek_token().location();
        let mnemonic = self.expect_ident("instruction mnemonic")?;
        let opcode = Opcode::from_mnemonic(&mnemonic).ok_or_else(|| ParseError {
            message: format!("Unknown instruction '{}'", mnemonic),
            location,
        })?;

        let dest = self.parse_register()?;

        let src = if opcode.source_count() == 0 {
            None
        } else {
            if matches!(self.peek_token(), Token::Newline(_) | Token::Eof(_)) {
                return Err(ParseError {
                    message: format!("'{}' expects 2 operands, got 1", mnemonic),
                    location,
                });
            }
            Some(self.parse_operand()?)
        };

        match self.advance() {
            Token::Newline(_) | Token::Eof(_) => {}
            extra => {
                return Err(ParseError {
                    message: format!(
                        "'{}' expects {} operand{}, found extra {}",
                        mnemonic,
                        opcode.source_count() + 1,
                        if opcode.source_count() == 0 { "" } else { "s" },
                        extra
                    ),
                    location: extra.location(),
                });
            }
        }

        Ok(Instruction {
            opcode,
            dest,
            src,
            location,
        })
    }

    fn parse_register(&mut self) -> Result<Register, ParseError> {
        let location = self.peek_token().location();
        let name = self.expect_ident("register")?;
        Register::from_name(&name).ok_or_else(|| ParseError {
            message: format!("Unknown register '{}'", name),
            location,
        })
    }

    fn parse_operand(&mut self) -> Result<Operand, ParseError> {
        if let Token::IntLiteral(n, _) = self.peek_token() {
            let n = *n;
            self.advance();
            return Ok(Operand::Literal(n));
        }
        self.parse_register().map(Operand::Register)
    }

    // ===== Helper methods =====

    fn expect_ident(&mut self, what: &str) -> Result<String, ParseError> {
        match self.advance() {
            Token::Ident(name, _) => Ok(name.clone()),
            other => Err(ParseError {
                message: format!("Expected {}, found {}", what, other),
                location: other.location(),
            }),
        }
    }

    pub(crate) fn advance(&mut self) -> &Token {
        if !self.is_at_end() {
            self.position += 1;
        }
        self.previous()
    }

    pub(crate) fn is_at_end(&self) -> bool {
        matches!(self.peek_token(), Token::Eof(_))
    }

    pub(crate) fn peek_token(&self) -> &Token {
        &self.tokens[self.position.min(self.tokens.len() - 1)]
    }

    pub(crate) fn previous(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }
}

/// Parse a complete program from source text
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    Parser::new(source)?.parse_program()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_program() {
        let source = "inp w\nadd z w\nmod z 26\ndiv x -3\n";
        let program = parse_program(source).unwrap();

        assert_eq!(program.instructions.len(), 4);
        assert_eq!(program.instructions[0], Instruction::input(Register::W).at(SourceLocation::new(1, 1)));
        assert_eq!(program.instructions[1].src, Some(Operand::Register(Register::W)));
        assert_eq!(program.instructions[2].literal(), Some(26));
        assert_eq!(program.instructions[3].opcode, Opcode::Div);
        assert_eq!(program.instructions[3].literal(), Some(-3));
        assert!(!program.instructions[1].src_is_literal());
        assert_eq!(program.input_count(), 1);
    }

    #[test]
    fn test_parse_normalized_mnemonics() {
        let program = parse_program("sub x 6\nneq x w").unwrap();

        assert_eq!(program.instructions[0].opcode, Opcode::Sub);
        assert_eq!(program.instructions[1].opcode, Opcode::Neq);
    }

    #[test]
    fn test_unknown_instruction() {
        let err = parse_program("inp w\nxor x 1\n").unwrap_err();

        assert_eq!(err.location.line, 2);
        assert!(err.message.contains("Unknown instruction 'xor'"));
    }

    #[test]
    fn test_unknown_register() {
        let err = parse_program("add q 1").unwrap_err();
        assert!(err.message.contains("Unknown register 'q'"));
    }

    #[test]
    fn test_wrong_operand_count() {
        assert!(parse_program("add x").is_err());
        assert!(parse_program("inp w 3").is_err());
        assert!(parse_program("mul x 2 3").is_err());
        assert!(parse_program("inp").is_err());
    }

    #[test]
    fn test_display_round_trip() {
        let source = "inp w\nadd x -4\neql x w";
        let program = parse_program(source).unwrap();
        let printed: Vec<String> = program.instructions.iter().map(|i| i.to_string()).collect();

        assert_eq!(printed.join("\n"), source);
    }
}
