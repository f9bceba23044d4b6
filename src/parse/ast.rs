use crate::common::{BinaryOperator, Condition, Int, Modifier, Sides, UnaryOperator};
use std::fmt;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// A parsed dice expression. Each node owns its children exclusively; the
/// root is owned by whoever called the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Int),
    Dice(DiceTerm),
    Grouping(Box<Expr>),
    Unary(UnaryOperator, Box<Expr>),
    Binary(Box<Expr>, BinaryOperator, Box<Expr>),
}

/// `NdS` plus its modifier suffixes, in source order.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct DiceTerm {
    pub count: u32,
    pub sides: Sides,
    pub modifiers: Vec<Modifier>,
}

impl DiceTerm {
    pub fn new(count: u32, sides: Sides, modifiers: Vec<Modifier>) -> Self {
        Self {
            count,
            sides,
            modifiers,
        }
    }

    pub fn keep_drop(&self) -> Option<&Modifier> {
        self.modifiers.iter().find(|m| m.is_keep_drop())
    }

    pub fn reroll(&self) -> Option<&Condition> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Reroll(c) => Some(c),
            _ => None,
        })
    }

    pub fn explode(&self) -> Option<&Condition> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::Explode(c) => Some(c),
            _ => None,
        })
    }

    pub fn success(&self) -> Option<&Condition> {
        self.modifiers.iter().find_map(|m| match m {
            Modifier::SuccessCount(c) => Some(c),
            _ => None,
        })
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        for modifier in &self.modifiers {
            write!(f, "{}", modifier)?;
        }
        Ok(())
    }
}
