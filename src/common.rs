use std::fmt::{self, Write};
pub use vec1::vec1;

#[cfg(feature = "serde-support")]
use serde::{Deserialize, Serialize};

/// The integer type used for face values, thresholds, and totals.
pub type Int = i64;

pub type NonEmpty<T> = vec1::Vec1<T>;

/// Largest accepted dice count in a single term.
pub const MAX_COUNT: Int = 10_000;
/// Largest accepted side count.
pub const MAX_SIDES: Int = 10_000;
/// Extra draws an exploding term may add before exploding stops.
pub const MAX_EXPLOSIONS: usize = 100;

/// The number of faces of a dice term: `d6`, `d20`, ... or the percentile
/// die `d%`, which rolls as a plain 100-sided die.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Sides {
    Poly(u32),
    Percentile,
}

impl Sides {
    pub fn faces(self) -> Int {
        match self {
            Self::Poly(n) => n as Int,
            Self::Percentile => 100,
        }
    }
}

impl fmt::Display for Sides {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Poly(n) => fmt::Display::fmt(n, f),
            Self::Percentile => f.write_char('%'),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum UnaryOperator {
    Neg,
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Neg => f.write_char('-'),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        };
        f.write_char(c)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum CompareOp {
    Less,
    LessEq,
    Equal,
    GreaterEq,
    Greater,
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Less => "<",
            Self::LessEq => "<=",
            Self::Equal => "=",
            Self::GreaterEq => ">=",
            Self::Greater => ">",
        };
        f.write_str(s)
    }
}

/// A comparison against a fixed threshold, used by reroll, explode, and
/// success-count modifiers.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub struct Condition {
    pub op: CompareOp,
    pub threshold: Int,
}

impl Condition {
    pub fn new(op: CompareOp, threshold: Int) -> Self {
        Self { op, threshold }
    }

    pub fn equal(threshold: Int) -> Self {
        Self::new(CompareOp::Equal, threshold)
    }

    pub fn matches(&self, value: Int) -> bool {
        match self.op {
            CompareOp::Less => value < self.threshold,
            CompareOp::LessEq => value <= self.threshold,
            CompareOp::Equal => value == self.threshold,
            CompareOp::GreaterEq => value >= self.threshold,
            CompareOp::Greater => value > self.threshold,
        }
    }

    /// True when every face of a die with `faces` sides satisfies the
    /// condition. Rerolling on such a condition would never settle.
    pub fn covers_all_faces(&self, faces: Int) -> bool {
        match self.op {
            CompareOp::Less => self.threshold > faces,
            CompareOp::LessEq => self.threshold >= faces,
            CompareOp::Equal => faces == 1 && self.threshold == 1,
            CompareOp::GreaterEq => self.threshold <= 1,
            CompareOp::Greater => self.threshold < 1,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.op, self.threshold)
    }
}

/// A dice-term suffix altering which rolled faces count toward the result.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde-support", derive(Serialize, Deserialize))]
pub enum Modifier {
    KeepHighest(u32),
    KeepLowest(u32),
    DropHighest(u32),
    DropLowest(u32),
    Reroll(Condition),
    Explode(Condition),
    SuccessCount(Condition),
}

impl Modifier {
    pub const fn is_keep_drop(&self) -> bool {
        matches!(
            self,
            Self::KeepHighest(_) | Self::KeepLowest(_) | Self::DropHighest(_) | Self::DropLowest(_)
        )
    }

    /// Two modifiers conflict when the evaluator could apply only one of
    /// them: any two keep/drops, or two of the same family.
    pub fn conflicts_with(&self, other: &Self) -> bool {
        if self.is_keep_drop() && other.is_keep_drop() {
            return true;
        }
        matches!(
            (self, other),
            (Self::Reroll(_), Self::Reroll(_))
                | (Self::Explode(_), Self::Explode(_))
                | (Self::SuccessCount(_), Self::SuccessCount(_))
        )
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Equality conditions render as a bare threshold after a keyword
        // (`r1`, `x6`), matching the accepted input spelling.
        fn keyword_condition(f: &mut fmt::Formatter<'_>, kw: char, c: &Condition) -> fmt::Result {
            if c.op == CompareOp::Equal {
                write!(f, "{}{}", kw, c.threshold)
            } else {
                write!(f, "{}{}", kw, c)
            }
        }

        match self {
            Self::KeepHighest(n) => write!(f, "kh{}", n),
            Self::KeepLowest(n) => write!(f, "kl{}", n),
            Self::DropHighest(n) => write!(f, "dh{}", n),
            Self::DropLowest(n) => write!(f, "dl{}", n),
            Self::Reroll(c) => keyword_condition(f, 'r', c),
            Self::Explode(c) => keyword_condition(f, 'x', c),
            Self::SuccessCount(c) => fmt::Display::fmt(c, f),
        }
    }
}
