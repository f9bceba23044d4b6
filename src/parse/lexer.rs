use super::error::LexError;
use crate::common::{BinaryOperator, CompareOp, Int};
use logos::Logos;
use std::fmt;
use std::ops::Range;

#[derive(Logos, Debug, Copy, Clone, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    Integer(Int),

    #[regex(r"[dD]")]
    Dice,
    #[token("%")]
    Percent,

    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,

    #[regex(r"[kK][hH]")]
    KeepHighest,
    #[regex(r"[kK][lL]")]
    KeepLowest,
    #[regex(r"[kK]")]
    Keep,
    #[regex(r"[dD][hH]")]
    DropHighest,
    #[regex(r"[dD][lL]")]
    DropLowest,
    #[regex(r"[hH]")]
    Highest,
    #[regex(r"[lL]")]
    Lowest,
    #[regex(r"[rR]")]
    Reroll,
    #[regex(r"[xX]")]
    Explode,

    #[token("<=")]
    LessEq,
    #[token("<")]
    Less,
    #[token("=")]
    Equal,
    #[token(">=")]
    GreaterEq,
    #[token(">")]
    Greater,

    #[regex(r"[ \t\r\n]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Integer(_) => "<integer>",
            Dice => "'d'",
            Percent => "'%'",
            LeftParen => "'('",
            RightParen => "')'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            KeepHighest => "'kh'",
            KeepLowest => "'kl'",
            Keep => "'k'",
            DropHighest => "'dh'",
            DropLowest => "'dl'",
            Highest => "'h'",
            Lowest => "'l'",
            Reroll => "'r'",
            Explode => "'x'",
            LessEq => "'<='",
            Less => "'<'",
            Equal => "'='",
            GreaterEq => "'>='",
            Greater => "'>'",
            Error => "<error>",
        }
    }

    /// Tokens that may open a dice-term modifier suffix; all of them are
    /// advanced-mode only.
    pub const MODIFIER_STARTS: &'static [Self] = &[
        Self::KeepHighest,
        Self::KeepLowest,
        Self::Keep,
        Self::DropHighest,
        Self::DropLowest,
        Self::Highest,
        Self::Lowest,
        Self::Reroll,
        Self::Explode,
        Self::LessEq,
        Self::Less,
        Self::Equal,
        Self::GreaterEq,
        Self::Greater,
    ];

    pub fn as_binary_op(&self) -> Option<BinaryOperator> {
        use BinaryOperator::*;
        Some(match self {
            Self::Plus => Add,
            Self::Minus => Sub,
            Self::Star => Mul,
            Self::Slash => Div,
            _ => return None,
        })
    }

    pub fn as_compare_op(&self) -> Option<CompareOp> {
        use CompareOp::*;
        Some(match self {
            Self::Less => Less,
            Self::LessEq => LessEq,
            Self::Equal => Equal,
            Self::GreaterEq => GreaterEq,
            Self::Greater => Greater,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

/// Splits `input` into its token sequence, or reports the first character
/// outside the grammar's alphabet.
pub fn tokenize(input: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = TokenKind::lexer(input);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let span = lexer.span();
        if kind == TokenKind::Error {
            return Err(LexError {
                position: span.start,
                // The slice of an error token is never empty.
                character: lexer.slice().chars().next().expect("non-empty error slice"),
            });
        }
        tokens.push(Token { kind, span });
    }

    Ok(tokens)
}
