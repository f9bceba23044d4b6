mod ctx;
mod error;
mod outcome;
mod roller;
mod stringify;
mod tree;

use crate::parse::ast;

pub type RResult<T> = Result<T, EvalError>;

pub use ctx::{DefaultRoller, RollContext};
pub use error::EvalError;
pub use outcome::{Contribution, DieRoll, EvalOutcome, RollKind, RollResult};
pub use roller::Roller;
pub use stringify::{MarkdownStringifier, SimpleStringifier, Stringify};
pub use tree::{Binary, Eval, Grouping, Literal, Roll, RollNode, Unary};

#[cfg(test)]
pub(crate) use roller::StepRoller;

/// Evaluates a parsed expression with the given entropy source.
pub fn eval<R: Roller>(input: &str, expr: &ast::Expr, roller: R) -> RResult<Roll> {
    RollContext::new(roller).eval(input, expr)
}
