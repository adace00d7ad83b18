//! Parser errors

use std::fmt;

/// Errors raised while lexing or parsing query text
///
/// Positions are byte offsets into the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    UnexpectedChar { ch: char, pos: usize },
    UnterminatedString { pos: usize },
    UnterminatedRegex { pos: usize },
    UnexpectedToken {
        found: String,
        pos: usize,
        expected: &'static str,
    },
    UnexpectedEnd { expected: &'static str },
    TrailingInput { fragment: String, pos: usize },
    /// `!` applied to a regex comparison; `=~` has no negated form
    NegatedMatch { pos: usize },
    /// `!` applied to an expression that is not a negatable comparison group
    CannotNegate { pos: usize },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::UnexpectedChar { ch, pos } => {
                write!(f, "Unexpected character '{}' at position {}", ch, pos)
            }
            ParseError::UnterminatedString { pos } => {
                write!(f, "Unterminated string starting at position {}", pos)
            }
            ParseError::UnterminatedRegex { pos } => {
                write!(f, "Unterminated regex starting at position {}", pos)
            }
            ParseError::UnexpectedToken { found, pos, expected } => {
                write!(f, "Expected {} at position {}, found {}", expected, pos, found)
            }
            ParseError::UnexpectedEnd { expected } => {
                write!(f, "Expected {} at end of input", expected)
            }
            ParseError::TrailingInput { fragment, pos } => {
                write!(f, "Unexpected trailing input '{}' at position {}", fragment, pos)
            }
            ParseError::NegatedMatch { pos } => {
                write!(f, "Regex comparison at position {} cannot be negated", pos)
            }
            ParseError::CannotNegate { pos } => {
                write!(f, "Expression at position {} cannot be negated", pos)
            }
        }
    }
}

impl std::error::Error for ParseError {}
