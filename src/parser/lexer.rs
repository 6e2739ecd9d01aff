//! Lexer (tokenizer) for ALU program text
//!
//! Converts raw source text into a flat [`Token`] stream consumed by the parser.
//! The language is line-oriented, so line breaks are significant and become
//! [`Token::Newline`]. Lines starting with `#` are comments and are skipped.

use super::ast::SourceLocation;
use std::fmt;

/// All token variants produced by the lexer.
///
/// Every variant carries a [`SourceLocation`] so that parse errors can report
/// an accurate line and column.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Mnemonics and register names
    Ident(String, SourceLocation),

    /// Signed integer literal
    IntLiteral(i64, SourceLocation),

    /// End of an instruction line
    Newline(SourceLocation),

    Eof(SourceLocation),
}

impl Token {
    /// Returns the source location where this token appears.
    pub fn location(&self) -> SourceLocation {
        match self {
            Token::Ident(_, loc)
            | Token::IntLiteral(_, loc)
            | Token::Newline(loc)
            | Token::Eof(loc) => *loc,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Ident(s, _) => write!(f, "identifier '{}'", s),
            Token::IntLiteral(n, _) => write!(f, "int literal {}", n),
            Token::Newline(_) => write!(f, "end of line"),
            Token::Eof(_) => write!(f, "end of file"),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, thiserror::Error)]
#[error("lexer error at line {}, column {}: {message}", .location.line, .location.column)]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

/// Lexer for ALU programs
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input.
    ///
    /// Blank lines and comment lines produce no tokens at all, so every
    /// [`Token::Newline`] in the output terminates a non-empty line.
    pub fn tokenize(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();
        let mut line_has_tokens = false;

        loop {
            self.skip_blanks();

            let loc = self.current_location();
            let Some(ch) = self.peek() else {
                if line_has_tokens {
                    tokens.push(Token::Newline(loc));
                }
                tokens.push(Token::Eof(loc));
                break;
            };

            match ch {
                '\n' => {
                    self.advance();
                    if line_has_tokens {
                        tokens.push(Token::Newline(loc));
                        line_has_tokens = false;
                    }
                }
                '#' if !line_has_tokens => self.skip_comment(),
                _ => {
                    tokens.push(self.next_token()?);
                    line_has_tokens = true;
                }
            }
        }

        Ok(tokens)
    }

    /// Get next token
    fn next_token(&mut self) -> Result<Token, LexError> {
        let loc = self.current_location();
        let ch = self.advance().ok_or_else(|| LexError {
            message: "Unexpected end of file".to_string(),
            location: loc,
        })?;

        match ch {
            '0'..='9' => self.number_literal(String::from(ch), loc),
            '-' => match self.peek() {
                Some(d) if d.is_ascii_digit() => self.number_literal(String::from(ch), loc),
                _ => Err(LexError {
                    message: "Expected digit after '-'".to_string(),
                    location: loc,
                }),
            },
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier(ch, loc)),
            other => Err(LexError {
                message: format!("Unexpected character '{}'", other),
                location: loc,
            }),
        }
    }

    fn number_literal(&mut self, mut text: String, loc: SourceLocation) -> Result<Token, LexError> {
        while let Some(d) = self.peek().filter(char::is_ascii_digit) {
            text.push(d);
            self.advance();
        }

        text.parse::<i64>()
            .map(|n| Token::IntLiteral(n, loc))
            .map_err(|_| LexError {
                message: format!("Integer literal '{}' out of range", text),
                location: loc,
            })
    }

    fn identifier(&mut self, first: char, loc: SourceLocation) -> Token {
        let mut name = String::from(first);
        while let Some(c) = self
            .peek()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        {
            name.push(c);
            self.advance();
        }
        Token::Ident(name, loc)
    }

    /// Skip spaces, tabs and carriage returns (but not line breaks)
    fn skip_blanks(&mut self) {
        while matches!(self.peek(), Some(' ' | '\t' | '\r')) {
            self.advance();
        }
    }

    /// Skip a comment line up to (not including) its line break
    fn skip_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    /// Get current source location
    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_tokens() {
        let mut lexer = Lexer::new("inp w\nadd x -12\n");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[0], Token::Ident(ref s, _) if s == "inp"));
        assert!(matches!(tokens[1], Token::Ident(ref s, _) if s == "w"));
        assert!(matches!(tokens[2], Token::Newline(_)));
        assert!(matches!(tokens[3], Token::Ident(ref s, _) if s == "add"));
        assert!(matches!(tokens[4], Token::Ident(ref s, _) if s == "x"));
        assert!(matches!(tokens[5], Token::IntLiteral(-12, _)));
        assert!(matches!(tokens[6], Token::Newline(_)));
        assert!(matches!(tokens[7], Token::Eof(_)));
        assert_eq!(tokens.len(), 8);
    }

    #[test]
    fn test_missing_trailing_newline() {
        let mut lexer = Lexer::new("mul y 0");
        let tokens = lexer.tokenize().unwrap();

        assert!(matches!(tokens[2], Token::IntLiteral(0, _)));
        assert!(matches!(tokens[3], Token::Newline(_)));
        assert!(matches!(tokens[4], Token::Eof(_)));
    }

    #[test]
    fn test_blank_and_comment_lines() {
        let mut lexer = Lexer::new("# header\n\n   \ninp z\r\n# trailing");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens.len(), 4);
        assert!(matches!(tokens[0], Token::Ident(ref s, loc) if s == "inp" && loc.line == 4));
        assert!(matches!(tokens[2], Token::Newline(_)));
        assert!(matches!(tokens[3], Token::Eof(_)));
    }

    #[test]
    fn test_locations() {
        let mut lexer = Lexer::new("inp w\n  eql x 1");
        let tokens = lexer.tokenize().unwrap();

        assert_eq!(tokens[3].location(), SourceLocation::new(2, 3));
        assert_eq!(tokens[5].location(), SourceLocation::new(2, 9));
    }

    #[test]
    fn test_unexpected_character() {
        let mut lexer = Lexer::new("add x $3");
        let err = lexer.tokenize().unwrap_err();

        assert_eq!(err.location, SourceLocation::new(1, 7));
        assert!(err.to_string().contains("Unexpected character '$'"));
    }

    #[test]
    fn test_lone_minus() {
        let mut lexer = Lexer::new("add x -");
        assert!(lexer.tokenize().is_err());
    }
}
