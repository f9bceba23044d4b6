use super::error::EvalError;
use super::outcome::{DieRoll, RollKind, RollResult};
use super::roller::Roller;
use super::tree::{Binary, Grouping, Literal, Roll, RollNode, Unary};
use super::RResult;
use crate::common::{BinaryOperator, Int, Modifier, NonEmpty, UnaryOperator, MAX_EXPLOSIONS};
use crate::parse::ast::{DiceTerm, Expr};
use crate::parse::visit::{Accept, AstVisitor};

#[cfg(feature = "logging")]
use log::debug;

pub type DefaultRoller = rand::rngs::ThreadRng;

/// Evaluates parsed expressions against an injected entropy source.
pub struct RollContext<R = DefaultRoller> {
    roller: R,
    max_explosions: usize,
}

impl<R: Roller> RollContext<R> {
    pub fn new(roller: R) -> Self {
        Self {
            roller,
            max_explosions: MAX_EXPLOSIONS,
        }
    }

    pub fn with_explosion_limit(roller: R, max_explosions: usize) -> Self {
        Self {
            roller,
            max_explosions,
        }
    }

    pub fn eval(&mut self, input: &str, expr: &Expr) -> RResult<Roll> {
        let tree = expr.accept(self)?;
        Ok(Roll::new(input.to_string(), tree))
    }

    fn draw(&mut self, faces: Int) -> Int {
        self.roller.roll(faces)
    }

    fn roll_term(&mut self, term: &DiceTerm) -> RResult<RollResult> {
        let faces = term.sides.faces();

        let mut rolls: Vec<DieRoll> = (0..term.count)
            .map(|_| DieRoll::new(self.draw(faces), RollKind::Initial))
            .collect();

        if let Some(&condition) = term.reroll() {
            if condition.covers_all_faces(faces) {
                return Err(EvalError::UnboundedReroll {
                    condition,
                    sides: faces,
                });
            }
            // One replacement per matching initial face; a replacement is
            // final even when it matches the condition again.
            let initial = rolls.len();
            for i in 0..initial {
                if condition.matches(rolls[i].value) {
                    rolls[i].discard();
                    let value = self.draw(faces);
                    rolls.push(DieRoll::new(value, RollKind::Reroll));
                }
            }
        }

        if let Some(&condition) = term.explode() {
            let mut extra = 0;
            let mut i = 0;
            while i < rolls.len() && extra < self.max_explosions {
                if rolls[i].kept && condition.matches(rolls[i].value) {
                    rolls[i].exploded = true;
                    let value = self.draw(faces);
                    rolls.push(DieRoll::new(value, RollKind::Explosion));
                    extra += 1;
                }
                i += 1;
            }
        }

        if let Some(keep_drop) = term.keep_drop() {
            apply_keep_drop(keep_drop, &mut rolls);
        }

        let value = match term.success() {
            Some(condition) => rolls
                .iter()
                .filter(|r| r.kept && condition.matches(r.value))
                .count() as Int,
            None => rolls.iter().filter(|r| r.kept).map(|r| r.value).sum(),
        };

        #[cfg(feature = "logging")]
        {
            debug!(
                "rolled {:?} for {}",
                rolls.iter().map(|r| r.value).collect::<Vec<_>>(),
                term
            );
        }

        let retained = rolls.iter().filter(|r| r.kept).map(|r| r.value).collect();
        let rolls = NonEmpty::try_from_vec(rolls).expect("a term rolls at least one die");
        Ok(RollResult {
            term: term.clone(),
            rolls,
            retained,
            value,
        })
    }
}

impl Default for RollContext {
    fn default() -> Self {
        Self::new(rand::thread_rng())
    }
}

impl<R: Roller> AstVisitor for RollContext<R> {
    type Output = RResult<RollNode>;

    fn visit_literal(&mut self, value: Int) -> Self::Output {
        Ok(RollNode::Literal(Literal { value }))
    }

    fn visit_dice(&mut self, term: &DiceTerm) -> Self::Output {
        Ok(RollNode::Dice(self.roll_term(term)?))
    }

    fn visit_grouping(&mut self, inner: &Expr) -> Self::Output {
        let inner = inner.accept(self)?;
        Ok(RollNode::Grouping(Grouping(Box::new(inner))))
    }

    fn visit_unary(&mut self, op: UnaryOperator, value: &Expr) -> Self::Output {
        let value = value.accept(self)?;
        Ok(RollNode::Unary(Unary {
            op,
            value: Box::new(value),
        }))
    }

    fn visit_binary(&mut self, left: &Expr, op: BinaryOperator, right: &Expr) -> Self::Output {
        let left = left.accept(self)?;
        let right = right.accept(self)?;
        Ok(RollNode::Binary(Binary {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }))
    }
}

/// Marks dropped faces among the still-kept ones. `n` is clamped to the
/// number of faces present.
fn apply_keep_drop(modifier: &Modifier, rolls: &mut [DieRoll]) {
    let mut order: Vec<usize> = (0..rolls.len()).filter(|&i| rolls[i].kept).collect();
    order.sort_by(|&a, &b| rolls[b].value.cmp(&rolls[a].value));

    let len = order.len();
    let dropped = match *modifier {
        Modifier::KeepHighest(n) => &order[(n as usize).min(len)..],
        Modifier::KeepLowest(n) => &order[..len - (n as usize).min(len)],
        Modifier::DropHighest(n) => &order[..(n as usize).min(len)],
        Modifier::DropLowest(n) => &order[len - (n as usize).min(len)..],
        _ => return,
    };
    for &i in dropped {
        rolls[i].kept = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MAX_EXPLOSIONS;
    use crate::roll::roller::StepRoller;
    use crate::roll::Contribution;

    fn eval(s: &str, roller: StepRoller) -> RResult<Roll> {
        let expr = crate::parse::parse(s, true).unwrap();
        RollContext::new(roller).eval(s, &expr)
    }

    fn check(s: &str, expected: Int) {
        let actual = eval(s, StepRoller::new(10, 1)).unwrap().total().unwrap();
        assert_eq!(actual, expected, "input: {:?}", s);
    }

    fn check_err(s: &str, expected: EvalError) {
        let err = match eval(s, StepRoller::new(10, 1)) {
            Err(err) => err,
            Ok(roll) => roll.total().unwrap_err(),
        };
        assert_eq!(err, expected, "input: {:?}", s);
    }

    fn dice_result(roll: &Roll, index: usize) -> RollResult {
        let outcome = roll.outcome().unwrap();
        match &outcome.breakdown[index] {
            Contribution::Dice(result) => result.clone(),
            other => panic!("expected a dice contribution, got {:?}", other),
        }
    }

    #[test]
    fn test_eval_arithmetic() {
        check("2", 2);
        check("-2", -2);
        check("2 + 3", 5);
        check("2 * (1 - 3)", -4);
    }

    #[test]
    fn test_division_truncates_toward_zero() {
        check("6/4", 1);
        check("7/2", 3);
        check("-7/2", -3);
    }

    #[test]
    fn test_eval_errors() {
        check_err("1/0", EvalError::DivisionByZero);
        check_err(
            "9223372036854775807 + 1",
            EvalError::Overflow,
        );
    }

    #[test]
    fn test_eval_dice() {
        // StepRoller(10, 1) yields 10, 11, 12, ... before face wrapping.
        check("1d20 + 4", 10 + 4);
        check("2d4", 2 + 3);
        check("8d6", 4 + 5 + 6 + 1 + 2 + 3 + 4 + 5);
        check("d%", 10);
    }

    #[test]
    fn test_eval_keep_drop() {
        check("2d20kh1", 11);
        check("4d6kh3", 5 + 6 + 4);
        check("4d6kl2", 4 + 1);
        check("4d6dh1", 4 + 1 + 5);
        check("4d6dl1", 4 + 5 + 6);
        // operands larger than the pool are clamped
        check("2d6kh5", 4 + 5);
    }

    #[test]
    fn test_keep_highest_equals_drop_lowest() {
        let kh = dice_result(&eval("6d10kh2", StepRoller::new(3, 7)).unwrap(), 0);
        let dl = dice_result(&eval("6d10dl4", StepRoller::new(3, 7)).unwrap(), 0);

        let mut kh_retained = kh.retained.clone();
        let mut dl_retained = dl.retained.clone();
        kh_retained.sort_unstable();
        dl_retained.sort_unstable();
        assert_eq!(kh_retained, dl_retained);
        assert_eq!(kh.value, dl.value);
    }

    #[test]
    fn test_reroll_is_applied_once() {
        // d6 via StepRoller(1, 1): the initial 1 is discarded, the
        // replacement 2 also matches `<3` but stays.
        let roll = eval("1d6r<3", StepRoller::new(1, 1)).unwrap();
        let result = dice_result(&roll, 0);

        assert_eq!(result.rolls.len(), 2);
        assert_eq!(result.rolls[0].value, 1);
        assert!(!result.rolls[0].kept);
        assert_eq!(result.rolls[1].kind, RollKind::Reroll);
        assert_eq!(result.retained, vec![2]);
        assert_eq!(result.value, 2);
    }

    #[test]
    fn test_unbounded_reroll_fails() {
        check_err(
            "1d6r>=1",
            EvalError::UnboundedReroll {
                condition: crate::common::Condition::new(crate::common::CompareOp::GreaterEq, 1),
                sides: 6,
            },
        );
    }

    #[test]
    fn test_explode_chains() {
        // 4, 5, 6 then the 6 explodes into a 1.
        let roll = eval("3d6x", StepRoller::new(10, 1)).unwrap();
        let result = dice_result(&roll, 0);

        assert_eq!(result.value, 4 + 5 + 6 + 1);
        assert_eq!(result.rolls.len(), 4);
        assert!(result.rolls[2].exploded);
        assert_eq!(result.rolls[3].kind, RollKind::Explosion);
    }

    #[test]
    fn test_explosion_cap_terminates() {
        // d1 explodes forever; the cap stops it without an error.
        let roll = eval("1d1x", StepRoller::new(1, 1)).unwrap();
        let result = dice_result(&roll, 0);

        assert_eq!(result.rolls.len(), 1 + MAX_EXPLOSIONS);
        assert_eq!(result.value, (1 + MAX_EXPLOSIONS) as Int);
    }

    #[test]
    fn test_success_count() {
        // StepRoller(6, 1) yields the d10 faces 6, 7, 8, 9, 10.
        let total = eval("5d10>=8", StepRoller::new(6, 1)).unwrap().total().unwrap();
        assert_eq!(total, 3);

        // keep/drop filters before counting: kh2 retains 9 and 10
        let total = eval("5d10kh2>=8", StepRoller::new(6, 1))
            .unwrap()
            .total()
            .unwrap();
        assert_eq!(total, 2);
    }

    #[test]
    fn test_breakdown_order_and_structure() {
        let roll = eval("2d6+3", StepRoller::new(10, 1)).unwrap();
        let outcome = roll.outcome().unwrap();

        assert_eq!(outcome.input, "2d6+3");
        assert_eq!(outcome.total, 4 + 5 + 3);
        assert_eq!(outcome.breakdown.len(), 2);

        let dice = dice_result(&roll, 0);
        assert_eq!(dice.rolls.len(), 2);
        assert_eq!(dice.retained, vec![4, 5]);
        assert_eq!(outcome.breakdown[1], Contribution::Literal(3));
    }

    #[test]
    fn test_breakdown_is_depth_first() {
        let roll = eval("1+(2d4*2)", StepRoller::new(10, 1)).unwrap();
        let outcome = roll.outcome().unwrap();

        assert_eq!(outcome.breakdown.len(), 3);
        assert_eq!(outcome.breakdown[0], Contribution::Literal(1));
        assert!(matches!(outcome.breakdown[1], Contribution::Dice(_)));
        assert_eq!(outcome.breakdown[2], Contribution::Literal(2));
    }
}
