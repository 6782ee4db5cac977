//! CFI Tokenizer
//!
//! Turns the CFI strings Apple Books stores into tokens and position vectors.
//!
//! Grammar (the subset the reader emits):
//! ```text
//! cfi       = "epubcfi(" path ["," path "," path] ")"
//! path      = step+ [offset]
//! step      = "/" number [label] | "!"
//! label     = "[" text "]"
//! offset    = ":" number
//! ```
//!
//! A range `epubcfi(P,S,E)` addresses the span from `P ++ S` to `P ++ E`.
//! Only the start `P ++ S` is used for ordering.

use super::types::{PositionVector, Token};
use thiserror::Error;

const PREFIX: &str = "epubcfi(";
const SUFFIX: &str = ")";

/// CFI parsing errors (all of them mean the location is malformed)
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CfiParseError {
    #[error("Empty CFI string")]
    Empty,

    #[error("CFI must start with 'epubcfi('")]
    MissingPrefix,

    #[error("CFI must end with ')'")]
    MissingSuffix,

    #[error("Unclosed bracket at position {0}")]
    UnclosedBracket(usize),

    #[error("Unexpected character '{0}' at position {1}")]
    UnexpectedChar(char, usize),

    #[error("Invalid number at position {0}")]
    InvalidNumber(usize),

    #[error("CFI contains no path steps")]
    NoPathSteps,
}

/// Cursor over the body of a CFI (between the prefix and suffix)
struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    fn at_digit(&self) -> bool {
        self.peek().is_some_and(|ch| ch.is_ascii_digit())
    }

    /// Parse a run of digits as u32
    fn parse_number(&mut self) -> Result<u32, CfiParseError> {
        let start = self.pos;
        while self.at_digit() {
            self.advance();
        }

        self.input[start..self.pos]
            .parse()
            .map_err(|_| CfiParseError::InvalidNumber(start))
    }

    /// Parse text inside brackets, handling `^` escapes.
    /// The opening bracket has already been consumed.
    fn parse_bracket_content(&mut self) -> Result<String, CfiParseError> {
        let start = self.pos;
        let mut result = String::new();
        let mut escaped = false;

        while let Some(ch) = self.advance() {
            if escaped {
                result.push(ch);
                escaped = false;
            } else if ch == '^' {
                escaped = true;
            } else if ch == ']' {
                return Ok(result);
            } else if ch == '[' {
                return Err(CfiParseError::UnexpectedChar('[', self.pos - 1));
            } else {
                result.push(ch);
            }
        }

        Err(CfiParseError::UnclosedBracket(start))
    }

    /// Skip the operand of a temporal (`~s`) or spatial (`@x:y`) offset
    fn skip_offset_operand(&mut self) {
        while self
            .peek()
            .is_some_and(|ch| ch.is_ascii_digit() || ch == '.' || ch == ':')
        {
            self.advance();
        }
    }

    fn tokenize(mut self) -> Result<Vec<Token>, CfiParseError> {
        let mut tokens = Vec::new();

        while let Some(ch) = self.advance() {
            match ch {
                '/' => {
                    tokens.push(Token::Separator('/'));
                    if self.at_digit() {
                        tokens.push(Token::PathStep(self.parse_number()?));
                    }
                }
                ':' => {
                    tokens.push(Token::Separator(':'));
                    if self.at_digit() {
                        tokens.push(Token::Offset(self.parse_number()?));
                    }
                }
                ',' => tokens.push(Token::Separator(',')),
                '[' => tokens.push(Token::Label(self.parse_bracket_content()?)),
                // Indirection: the content document continues the same path
                '!' => {}
                // Temporal/spatial offsets are not part of the subset we order by
                '~' | '@' => self.skip_offset_operand(),
                _ => {}
            }
        }

        Ok(tokens)
    }
}

/// Strip the `epubcfi(` ... `)` wrapper, returning the body
fn strip_wrapper(input: &str) -> Result<&str, CfiParseError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CfiParseError::Empty);
    }

    input
        .strip_prefix(PREFIX)
        .ok_or(CfiParseError::MissingPrefix)?
        .strip_suffix(SUFFIX)
        .ok_or(CfiParseError::MissingSuffix)
}

/// Tokenize a CFI string
///
/// The indirection marker `!` is dropped, so both sides of it read as one
/// continuous path.
pub fn tokenize(input: &str) -> Result<Vec<Token>, CfiParseError> {
    let body = strip_wrapper(input)?;
    Lexer::new(body).tokenize()
}

/// Build the position vector from an already tokenized CFI
///
/// Keeps the shared parent path and the range start, joined, and drops
/// everything after the second top-level comma.
pub fn position_from_tokens(tokens: &[Token]) -> Result<PositionVector, CfiParseError> {
    let mut segments = tokens.split(Token::is_range_separator);
    let parent = segments.next().unwrap_or(&[]);
    let start = segments.next().unwrap_or(&[]);

    let has_step = parent
        .iter()
        .chain(start)
        .any(|token| matches!(token, Token::PathStep(_)));
    if !has_step {
        return Err(CfiParseError::NoPathSteps);
    }

    let steps: Vec<u32> = parent.iter().chain(start).filter_map(Token::ordinal).collect();
    Ok(PositionVector::new(steps))
}

/// Parse a CFI string into its position vector
pub fn position_vector(input: &str) -> Result<PositionVector, CfiParseError> {
    let tokens = tokenize(input)?;
    position_from_tokens(&tokens)
}

/// Parse a CFI string, returning None on failure
pub fn try_position_vector(input: &str) -> Option<PositionVector> {
    position_vector(input).ok()
}
