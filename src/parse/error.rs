use super::lexer::TokenKind;
use crate::common::{Int, Modifier, NonEmpty};
use std::fmt;
use thiserror::Error;

/// A character outside the grammar's alphabet.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("(at position {position}): unexpected character {character:?}")]
pub struct LexError {
    pub position: usize,
    pub character: char,
}

/// A grammar violation, positioned at the byte offset of the offending
/// token (or at the end of input).
#[derive(Error, Debug, Clone, PartialEq)]
#[error("(at position {position}): {kind}")]
pub struct ParseError {
    pub position: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: Option<TokenKind>,
        expected: NonEmpty<String>,
    },
    AdvancedOnly(TokenKind),
    CountOutOfRange(Int),
    SidesOutOfRange(Int),
    ConflictingModifiers {
        first: Modifier,
        second: Modifier,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, expected } => {
                match found {
                    Some(token) => write!(f, "unexpected token: found {}, expected ", token)?,
                    None => write!(f, "unexpected end of input, expected ")?,
                }
                f.write_str(&expected.fmt_expected())
            }
            Self::AdvancedOnly(token) => {
                write!(f, "{} requires advanced mode", token)
            }
            Self::CountOutOfRange(n) => {
                write!(f, "dice count {} is outside 1..={}", n, crate::common::MAX_COUNT)
            }
            Self::SidesOutOfRange(n) => {
                write!(f, "side count {} is outside 1..={}", n, crate::common::MAX_SIDES)
            }
            Self::ConflictingModifiers { first, second } => {
                write!(f, "modifier '{}' conflicts with earlier '{}'", second, first)
            }
        }
    }
}

trait FormatExpected {
    fn fmt_expected(&self) -> String;
}

impl FormatExpected for [String] {
    fn fmt_expected(&self) -> String {
        match self {
            [] => unreachable!("NonEmpty cannot be empty"),
            [a] => a.to_owned(),
            [a, b] => format!("{} or {}", a, b),
            s => format!("{}, or {}", s[..s.len() - 1].join(", "), &s[s.len() - 1]),
        }
    }
}
