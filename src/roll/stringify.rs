use super::outcome::{DieRoll, RollResult};
use super::tree::{Binary, Grouping, Literal, Roll, RollNode, Unary};
use super::RResult;
use crate::common::Int;

/// Renders an evaluated roll tree. Every method has a default, so a
/// stringifier only overrides the pieces it wants to restyle.
pub trait Stringify {
    fn stringify(&mut self, node: &RollNode) -> String {
        match node {
            RollNode::Literal(literal) => self.str_literal(literal),
            RollNode::Dice(dice) => self.str_dice(dice),
            RollNode::Grouping(grouping) => self.str_grouping(grouping),
            RollNode::Unary(unary) => self.str_unary(unary),
            RollNode::Binary(binary) => self.str_binary(binary),
        }
    }

    /// The one-line summary: `<total> (<breakdown>)`.
    fn str_roll(&mut self, roll: &Roll) -> RResult<String> {
        let total = roll.total()?;
        let tree = self.stringify(roll.tree());
        Ok(format!("{} ({})", total, tree))
    }

    fn str_literal(&mut self, literal: &Literal) -> String {
        literal.value.to_string()
    }

    fn str_dice(&mut self, dice: &RollResult) -> String {
        let faces = dice.term.sides.faces();
        let rolls = dice
            .rolls
            .iter()
            .map(|die| self.str_die(die, faces))
            .collect::<Vec<_>>()
            .join(", ");
        format!("{} [{}]", dice.term, rolls)
    }

    /// Plain face rendering: discarded and dropped faces are
    /// parenthesized, exploding faces marked with `!`.
    fn str_die(&mut self, die: &DieRoll, _faces: Int) -> String {
        let mut ret = die.value.to_string();
        if die.exploded {
            ret.push('!');
        }
        if !die.kept {
            ret = format!("({})", ret);
        }
        ret
    }

    fn str_grouping(&mut self, grouping: &Grouping) -> String {
        format!("({})", self.stringify(&grouping.0))
    }

    fn str_unary(&mut self, unary: &Unary) -> String {
        format!("{}{}", unary.op, self.stringify(&unary.value))
    }

    fn str_binary(&mut self, binary: &Binary) -> String {
        let left = self.stringify(&binary.left);
        let right = self.stringify(&binary.right);
        format!("{} {} {}", left, binary.op, right)
    }
}

/// Plain-text rendering, suitable for terminals and logs.
#[derive(Default)]
pub struct SimpleStringifier;

impl SimpleStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for SimpleStringifier {}

/// Chat-flavored rendering: dropped faces struck through, minimum and
/// maximum faces bolded.
#[derive(Default)]
pub struct MarkdownStringifier;

impl MarkdownStringifier {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Stringify for MarkdownStringifier {
    fn str_die(&mut self, die: &DieRoll, faces: Int) -> String {
        let mut ret = die.value.to_string();
        if die.exploded {
            ret.push('!');
        }
        if die.value == 1 || die.value == faces {
            ret = format!("**{}**", ret);
        }
        if !die.kept {
            ret = format!("~~{}~~", ret);
        }
        ret
    }
}

impl Roll {
    /// Renders the one-line summary with the given stringifier.
    pub fn render<S: Stringify + Default>(&self) -> RResult<String> {
        S::default().str_roll(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roll::roller::StepRoller;
    use crate::roll::RollContext;

    macro_rules! check {
        ($cls:ident, $input:expr, $expected:expr) => {
            let expr = crate::parse::parse($input, true).unwrap();
            let roll = RollContext::new(StepRoller::new(10, 1))
                .eval($input, &expr)
                .unwrap();
            let actual = roll.render::<$cls>().unwrap();
            assert_eq!(&actual, $expected);
        };
    }

    #[test]
    fn test_simple_stringify() {
        check!(SimpleStringifier, "2 + 3", "5 (2 + 3)");
        check!(SimpleStringifier, "2d20", "21 (2d20 [10, 11])");
        check!(SimpleStringifier, "2d20kh1", "11 (2d20kh1 [(10), 11])");
        check!(SimpleStringifier, "2d6+3", "12 (2d6 [4, 5] + 3)");
        check!(SimpleStringifier, "-(2d4+1)", "-6 (-(2d4 [2, 3] + 1))");
        check!(SimpleStringifier, "3d6x", "16 (3d6x6 [4, 5, 6!, 1])");
    }

    #[test]
    fn test_markdown_stringify() {
        check!(MarkdownStringifier, "2 + 3", "5 (2 + 3)");
        check!(MarkdownStringifier, "2d20kh1", "11 (2d20kh1 [~~10~~, 11])");
        check!(
            MarkdownStringifier,
            "3d6x",
            "16 (3d6x6 [4, 5, **6!**, **1**])"
        );
    }

    #[test]
    fn test_markdown_reroll() {
        let expr = crate::parse::parse("1d6r<3", true).unwrap();
        let roll = RollContext::new(StepRoller::new(1, 1))
            .eval("1d6r<3", &expr)
            .unwrap();
        let actual = roll.render::<MarkdownStringifier>().unwrap();
        assert_eq!(actual, "2 (1d6r<3 [~~**1**~~, 2])");
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let expr = crate::parse::parse("4d6kh3 + 2", true).unwrap();
        let roll = RollContext::new(StepRoller::new(10, 1))
            .eval("4d6kh3 + 2", &expr)
            .unwrap();

        let first = roll.render::<SimpleStringifier>().unwrap();
        let second = roll.render::<SimpleStringifier>().unwrap();
        assert_eq!(first, second);
    }
}
