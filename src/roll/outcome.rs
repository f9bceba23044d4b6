use super::tree::{Roll, RollNode};
use super::RResult;
use crate::common::{Int, NonEmpty};
use crate::parse::ast::DiceTerm;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// How a raw face came to be part of a term's roll sequence.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum RollKind {
    Initial,
    Reroll,
    Explosion,
}

/// One raw die face, in chronological roll order.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct DieRoll {
    pub value: Int,
    pub kind: RollKind,
    /// False once discarded by a reroll or dropped by keep/drop.
    pub kept: bool,
    /// True when this face triggered an extra exploded draw.
    pub exploded: bool,
}

impl DieRoll {
    pub(crate) fn new(value: Int, kind: RollKind) -> Self {
        Self {
            value,
            kind,
            kept: true,
            exploded: false,
        }
    }

    pub(crate) fn discard(&mut self) {
        self.kept = false;
    }
}

/// Evaluation output of a single dice term: every raw face, the retained
/// subset, and the derived value (sum of retained faces, or the success
/// count).
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct RollResult {
    pub term: DiceTerm,
    pub rolls: NonEmpty<DieRoll>,
    pub retained: Vec<Int>,
    pub value: Int,
}

/// A per-node contribution to the final total, in left-to-right
/// depth-first source order.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Contribution {
    Dice(RollResult),
    Literal(Int),
}

/// The structured result of evaluating one expression.
#[derive(Debug, Clone, Eq, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct EvalOutcome {
    pub input: String,
    pub total: Int,
    pub breakdown: Vec<Contribution>,
}

impl EvalOutcome {
    pub(crate) fn from_roll(roll: &Roll) -> RResult<Self> {
        let total = roll.total()?;
        let mut breakdown = Vec::new();
        collect(roll.tree(), &mut breakdown);
        Ok(Self {
            input: roll.input().to_string(),
            total,
            breakdown,
        })
    }
}

fn collect(node: &RollNode, out: &mut Vec<Contribution>) {
    match node {
        RollNode::Literal(literal) => out.push(Contribution::Literal(literal.value)),
        RollNode::Dice(result) => out.push(Contribution::Dice(result.clone())),
        RollNode::Grouping(grouping) => collect(&grouping.0, out),
        RollNode::Unary(unary) => collect(&unary.value, out),
        RollNode::Binary(binary) => {
            collect(&binary.left, out);
            collect(&binary.right, out);
        }
    }
}
