pub mod ast;
mod error;
mod lexer;
mod parser;
pub mod visit;

pub use error::{LexError, ParseError, ParseErrorKind};
pub use lexer::{tokenize, Token, TokenKind};
pub use parser::Parser;

use crate::error::Error;

/// Parses a dice expression. `advanced` enables the modifier-suffix
/// grammar; without it only plain arithmetic over dice terms is accepted.
pub fn parse(input: &str, advanced: bool) -> Result<ast::Expr, Error> {
    let tokens = tokenize(input)?;
    Ok(Parser::new(input, tokens, advanced).parse()?)
}
