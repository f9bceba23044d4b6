use super::error::EvalError;
use super::outcome::{EvalOutcome, RollResult};
use super::RResult;
use crate::common::{BinaryOperator, Int, UnaryOperator};

/// Computes the numeric value a node contributes to the total.
#[enum_dispatch::enum_dispatch]
pub trait Eval {
    fn total(&self) -> RResult<Int>;
}

/// A fully evaluated expression: dice terms are resolved to their
/// [`RollResult`], everything else mirrors the parse tree.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch::enum_dispatch(Eval)]
pub enum RollNode {
    Literal(Literal),
    Dice(RollResult),
    Grouping(Grouping),
    Unary(Unary),
    Binary(Binary),
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Literal {
    pub value: Int,
}

impl Eval for Literal {
    fn total(&self) -> RResult<Int> {
        Ok(self.value)
    }
}

impl Eval for RollResult {
    fn total(&self) -> RResult<Int> {
        Ok(self.value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Grouping(pub Box<RollNode>);

impl Eval for Grouping {
    fn total(&self) -> RResult<Int> {
        self.0.total()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Unary {
    pub op: UnaryOperator,
    pub value: Box<RollNode>,
}

impl Eval for Unary {
    fn total(&self) -> RResult<Int> {
        let value = self.value.total()?;
        match self.op {
            UnaryOperator::Neg => value.checked_neg().ok_or(EvalError::Overflow),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub left: Box<RollNode>,
    pub op: BinaryOperator,
    pub right: Box<RollNode>,
}

impl Eval for Binary {
    fn total(&self) -> RResult<Int> {
        use BinaryOperator::*;

        let left = self.left.total()?;
        let right = self.right.total()?;
        match self.op {
            Add => left.checked_add(right).ok_or(EvalError::Overflow),
            Sub => left.checked_sub(right).ok_or(EvalError::Overflow),
            Mul => left.checked_mul(right).ok_or(EvalError::Overflow),
            Div => {
                if right == 0 {
                    Err(EvalError::DivisionByZero)
                } else {
                    // `i64` division truncates toward zero.
                    left.checked_div(right).ok_or(EvalError::Overflow)
                }
            }
        }
    }
}

/// An evaluated roll: the tree plus the input it came from. The total and
/// the structured outcome are derived on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Roll {
    input: String,
    tree: RollNode,
}

impl Roll {
    pub(crate) fn new(input: String, tree: RollNode) -> Self {
        Self { input, tree }
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn tree(&self) -> &RollNode {
        &self.tree
    }

    pub fn total(&self) -> RResult<Int> {
        self.tree.total()
    }

    pub fn outcome(&self) -> RResult<EvalOutcome> {
        EvalOutcome::from_roll(self)
    }
}
