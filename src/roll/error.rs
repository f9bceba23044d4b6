use crate::common::{Condition, Int};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("cannot divide by zero")]
    DivisionByZero,
    #[error("arithmetic overflow")]
    Overflow,
    #[error("unbounded reroll: '{condition}' matches every face of d{sides}")]
    UnboundedReroll { condition: Condition, sides: Int },
}
