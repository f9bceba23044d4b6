use crate::parse::{LexError, ParseError};
use crate::roll::EvalError;
use thiserror::Error;

/// Any failure the interpreter can report. Each variant carries the
/// offending position where one exists, so hosts can point at the input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    /// Byte offset into the original input, for lex and parse errors.
    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Lex(e) => Some(e.position),
            Self::Parse(e) => Some(e.position),
            Self::Eval(_) => None,
        }
    }
}
