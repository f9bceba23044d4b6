use super::ast::{DiceTerm, Expr};
use super::error::{ParseError, ParseErrorKind};
use super::lexer::{Token, TokenKind};
use crate::common::{
    Condition, Int, Modifier, NonEmpty, Sides, UnaryOperator, MAX_COUNT, MAX_SIDES,
};
use std::ops::Range;

type PResult<T = Expr> = Result<T, ParseError>;

pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    end: usize,
    advanced: bool,
}

impl Parser {
    const ADDITION_OPS: &'static [TokenKind] = &[TokenKind::Plus, TokenKind::Minus];

    const MULTIPLICATION_OPS: &'static [TokenKind] = &[TokenKind::Star, TokenKind::Slash];

    const COMPARISON_OPS: &'static [TokenKind] = &[
        TokenKind::Less,
        TokenKind::LessEq,
        TokenKind::Equal,
        TokenKind::GreaterEq,
        TokenKind::Greater,
    ];

    pub fn new(source: &str, tokens: Vec<Token>, advanced: bool) -> Self {
        Self {
            tokens,
            pos: 0,
            end: source.len(),
            advanced,
        }
    }

    pub fn parse(mut self) -> PResult<Expr> {
        let expr = self.parse_additive()?;
        if self.peek().is_some() {
            return self.unexpected_token(&["end of input"]);
        }
        Ok(expr)
    }

    fn peek(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    /// Byte offset of the current token, or of the end of input.
    fn position(&self) -> usize {
        self.tokens.get(self.pos).map_or(self.end, |t| t.span.start)
    }

    fn advance(&mut self) -> Option<TokenKind> {
        let kind = self.peek()?;
        self.pos += 1;
        Some(kind)
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek() == Some(kind)
    }

    fn matches_any(&self, options: &[TokenKind]) -> bool {
        self.peek().map_or(false, |kind| options.contains(&kind))
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.pos += 1;
            Ok(())
        } else {
            self.unexpected_token(&[expected.as_str()])
        }
    }

    fn take_integer(&mut self) -> Option<(Int, Range<usize>)> {
        match self.tokens.get(self.pos) {
            Some(Token {
                kind: TokenKind::Integer(value),
                span,
            }) => {
                let taken = (*value, span.clone());
                self.pos += 1;
                Some(taken)
            }
            _ => None,
        }
    }

    fn error_at<T>(&self, position: usize, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError { position, kind })
    }

    fn unexpected_token<T>(&self, expected: &[&str]) -> PResult<T> {
        let expected = NonEmpty::try_from_vec(expected.iter().map(|s| s.to_string()).collect())
            .expect("at least one expected token");
        self.error_at(
            self.position(),
            ParseErrorKind::UnexpectedToken {
                found: self.peek(),
                expected,
            },
        )
    }

    fn parse_additive(&mut self) -> PResult {
        let mut lhs = self.parse_multiplicative()?;

        while self.matches_any(Self::ADDITION_OPS) {
            let op = self
                .advance()
                .and_then(|k| k.as_binary_op())
                .expect("matched an addition operator");
            let rhs = self.parse_multiplicative()?;

            lhs = Expr::Binary(Box::new(lhs), op, Box::new(rhs));
        }

        Ok(lhs)
    }

    fn parse_multiplicative(&mut self) -> PResult {
        let mut lhs = self.parse_unary()?;

        while self.matches_any(Self::MULTIPLICATION_OPS) {
            let op = self
                .advance()
                .and_then(|k| k.as_binary_op())
                .expect("matched a multiplication operator");
            let rhs = self.parse_unary()?;

            lhs = Expr::Binary(Box::new(lhs), op, Box::new(rhs));
        }

        Ok(lhs)
    }

    fn parse_unary(&mut self) -> PResult {
        if self.matches(TokenKind::Minus) {
            self.advance();
            let rhs = self.parse_unary()?;
            Ok(Expr::Unary(UnaryOperator::Neg, Box::new(rhs)))
        } else {
            self.parse_atom()
        }
    }

    fn parse_atom(&mut self) -> PResult {
        match self.peek() {
            Some(TokenKind::LeftParen) => self.parse_grouping(),
            Some(TokenKind::Integer(_)) => {
                let count = self.take_integer().expect("peeked an integer");
                if self.matches(TokenKind::Dice) {
                    self.parse_dice_term(Some(count))
                } else {
                    Ok(Expr::Literal(count.0))
                }
            }
            Some(TokenKind::Dice) => self.parse_dice_term(None),
            _ => self.unexpected_token(&["<integer>", "'d'", "'('"]),
        }
    }

    fn parse_grouping(&mut self) -> PResult {
        self.consume(TokenKind::LeftParen)?;
        let inner = self.parse_additive()?;
        self.consume(TokenKind::RightParen)?;
        Ok(Expr::Grouping(Box::new(inner)))
    }

    fn parse_dice_term(&mut self, count: Option<(Int, Range<usize>)>) -> PResult {
        let (count, count_pos) = match count {
            Some((value, span)) => (value, span.start),
            None => (1, self.position()),
        };
        if !(1..=MAX_COUNT).contains(&count) {
            return self.error_at(count_pos, ParseErrorKind::CountOutOfRange(count));
        }

        self.consume(TokenKind::Dice)?;

        let sides = if self.matches(TokenKind::Percent) {
            self.advance();
            Sides::Percentile
        } else if let Some((value, span)) = self.take_integer() {
            if !(1..=MAX_SIDES).contains(&value) {
                return self.error_at(span.start, ParseErrorKind::SidesOutOfRange(value));
            }
            Sides::Poly(value as u32)
        } else {
            return self.unexpected_token(&["<integer>", "'%'"]);
        };

        let modifiers = self.parse_modifiers(sides)?;
        Ok(Expr::Dice(DiceTerm::new(count as u32, sides, modifiers)))
    }

    fn parse_modifiers(&mut self, sides: Sides) -> PResult<Vec<Modifier>> {
        let mut modifiers: Vec<Modifier> = Vec::new();

        while self.matches_any(TokenKind::MODIFIER_STARTS) {
            let position = self.position();
            if !self.advanced {
                let token = self.peek().expect("matched a modifier token");
                return self.error_at(position, ParseErrorKind::AdvancedOnly(token));
            }

            let modifier = self.parse_modifier(sides)?;
            if let Some(first) = modifiers.iter().find(|m| m.conflicts_with(&modifier)) {
                return self.error_at(
                    position,
                    ParseErrorKind::ConflictingModifiers {
                        first: *first,
                        second: modifier,
                    },
                );
            }
            modifiers.push(modifier);
        }

        Ok(modifiers)
    }

    fn parse_modifier(&mut self, sides: Sides) -> PResult<Modifier> {
        let token = self.advance().expect("matched a modifier token");

        Ok(match token {
            TokenKind::KeepHighest | TokenKind::Keep | TokenKind::Highest => {
                Modifier::KeepHighest(self.keep_drop_operand())
            }
            TokenKind::KeepLowest => Modifier::KeepLowest(self.keep_drop_operand()),
            TokenKind::DropHighest => Modifier::DropHighest(self.keep_drop_operand()),
            TokenKind::DropLowest | TokenKind::Lowest => {
                Modifier::DropLowest(self.keep_drop_operand())
            }
            TokenKind::Reroll => Modifier::Reroll(self.parse_condition()?),
            TokenKind::Explode => {
                if self.matches_any(Self::COMPARISON_OPS)
                    || matches!(self.peek(), Some(TokenKind::Integer(_)))
                {
                    Modifier::Explode(self.parse_condition()?)
                } else {
                    Modifier::Explode(Condition::equal(sides.faces()))
                }
            }
            comparison => {
                let op = comparison
                    .as_compare_op()
                    .expect("matched a comparison token");
                let (threshold, _) = match self.take_integer() {
                    Some(taken) => taken,
                    None => return self.unexpected_token(&["<integer>"]),
                };
                Modifier::SuccessCount(Condition::new(op, threshold))
            }
        })
    }

    /// Keep/drop operands default to 1 when omitted.
    fn keep_drop_operand(&mut self) -> u32 {
        match self.take_integer() {
            Some((value, _)) => value.try_into().unwrap_or(u32::MAX),
            None => 1,
        }
    }

    fn parse_condition(&mut self) -> PResult<Condition> {
        if self.matches_any(Self::COMPARISON_OPS) {
            let op = self
                .advance()
                .and_then(|k| k.as_compare_op())
                .expect("matched a comparison token");
            match self.take_integer() {
                Some((threshold, _)) => Ok(Condition::new(op, threshold)),
                None => self.unexpected_token(&["<integer>"]),
            }
        } else if let Some((threshold, _)) = self.take_integer() {
            Ok(Condition::equal(threshold))
        } else {
            self.unexpected_token(&["<integer>", "'<'", "'<='", "'='", "'>='", "'>'"])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{BinaryOperator::*, CompareOp};
    use crate::parse::lexer::tokenize;

    macro_rules! dice {
        ($count:literal, $sides:literal $(; $($modifier:expr),+)?) => {
            Expr::Dice(DiceTerm::new(
                $count,
                Sides::Poly($sides),
                vec![$($($modifier),+)?],
            ))
        };
    }

    fn parse(s: &str, advanced: bool) -> PResult<Expr> {
        let tokens = tokenize(s).unwrap();
        Parser::new(s, tokens, advanced).parse()
    }

    fn check(s: &str, expected: Expr) {
        assert_eq!(parse(s, true).unwrap(), expected, "input: {:?}", s);
    }

    fn check_err(s: &str, advanced: bool, position: usize) -> ParseErrorKind {
        let err = parse(s, advanced).unwrap_err();
        assert_eq!(err.position, position, "input: {:?} ({})", s, err);
        err.kind
    }

    #[test]
    fn test_parse_literal() {
        check("32", Expr::Literal(32));
    }

    #[test]
    fn test_parse_dice() {
        check("1d20", dice!(1, 20));
        check("d6", dice!(1, 6));
        check("3D8", dice!(3, 8));
        check(
            "2d%",
            Expr::Dice(DiceTerm::new(2, Sides::Percentile, vec![])),
        );
    }

    #[test]
    fn test_parse_precedence() {
        check(
            "2d6+3",
            Expr::Binary(Box::new(dice!(2, 6)), Add, Box::new(Expr::Literal(3))),
        );
        check(
            "1+2*3",
            Expr::Binary(
                Box::new(Expr::Literal(1)),
                Add,
                Box::new(Expr::Binary(
                    Box::new(Expr::Literal(2)),
                    Mul,
                    Box::new(Expr::Literal(3)),
                )),
            ),
        );
        check(
            "(2d6+1)*3",
            Expr::Binary(
                Box::new(Expr::Grouping(Box::new(Expr::Binary(
                    Box::new(dice!(2, 6)),
                    Add,
                    Box::new(Expr::Literal(1)),
                )))),
                Mul,
                Box::new(Expr::Literal(3)),
            ),
        );
    }

    #[test]
    fn test_left_associativity() {
        check(
            "1-2-3",
            Expr::Binary(
                Box::new(Expr::Binary(
                    Box::new(Expr::Literal(1)),
                    Sub,
                    Box::new(Expr::Literal(2)),
                )),
                Sub,
                Box::new(Expr::Literal(3)),
            ),
        );
    }

    #[test]
    fn test_parse_unary() {
        check(
            "-2d4",
            Expr::Unary(UnaryOperator::Neg, Box::new(dice!(2, 4))),
        );
        check(
            "--2",
            Expr::Unary(
                UnaryOperator::Neg,
                Box::new(Expr::Unary(UnaryOperator::Neg, Box::new(Expr::Literal(2)))),
            ),
        );
    }

    #[test]
    fn test_parse_keep_drop() {
        check("4d6kh3", dice!(4, 6; Modifier::KeepHighest(3)));
        check("4d6kl2", dice!(4, 6; Modifier::KeepLowest(2)));
        check("4d6dh1", dice!(4, 6; Modifier::DropHighest(1)));
        check("4d6dl1", dice!(4, 6; Modifier::DropLowest(1)));
        // shorthands and the default operand
        check("4d20k2", dice!(4, 20; Modifier::KeepHighest(2)));
        check("4d6h", dice!(4, 6; Modifier::KeepHighest(1)));
        check("4d6l", dice!(4, 6; Modifier::DropLowest(1)));
        check("2d20kh", dice!(2, 20; Modifier::KeepHighest(1)));
    }

    #[test]
    fn test_parse_reroll_explode() {
        check(
            "1d20r1x20",
            dice!(1, 20;
                Modifier::Reroll(Condition::equal(1)),
                Modifier::Explode(Condition::equal(20))),
        );
        check(
            "2d6r<3",
            dice!(2, 6; Modifier::Reroll(Condition::new(CompareOp::Less, 3))),
        );
        // explode defaults to the maximum face
        check("3d6x", dice!(3, 6; Modifier::Explode(Condition::equal(6))));
        check(
            "d%x",
            Expr::Dice(DiceTerm::new(
                1,
                Sides::Percentile,
                vec![Modifier::Explode(Condition::equal(100))],
            )),
        );
    }

    #[test]
    fn test_parse_success_count() {
        check(
            "5d10>=8",
            dice!(5, 10; Modifier::SuccessCount(Condition::new(CompareOp::GreaterEq, 8))),
        );
        check(
            "4d6kh3=6",
            dice!(4, 6;
                Modifier::KeepHighest(3),
                Modifier::SuccessCount(Condition::equal(6))),
        );
    }

    #[test]
    fn test_empty_input() {
        let kind = check_err("", false, 0);
        assert!(matches!(
            kind,
            ParseErrorKind::UnexpectedToken { found: None, .. }
        ));
    }

    #[test]
    fn test_missing_sides() {
        let kind = check_err("2d", false, 2);
        assert!(matches!(
            kind,
            ParseErrorKind::UnexpectedToken { found: None, .. }
        ));
        check_err("2d+3", false, 2);
    }

    #[test]
    fn test_trailing_operator() {
        let kind = check_err("2d6++", false, 4);
        assert!(matches!(
            kind,
            ParseErrorKind::UnexpectedToken {
                found: Some(TokenKind::Plus),
                ..
            }
        ));
    }

    #[test]
    fn test_advanced_only_in_basic_mode() {
        let kind = check_err("d6k2", false, 2);
        assert_eq!(kind, ParseErrorKind::AdvancedOnly(TokenKind::Keep));

        let kind = check_err("4d6kh3", false, 3);
        assert_eq!(kind, ParseErrorKind::AdvancedOnly(TokenKind::KeepHighest));

        let kind = check_err("5d10>=8", false, 4);
        assert_eq!(kind, ParseErrorKind::AdvancedOnly(TokenKind::GreaterEq));
    }

    #[test]
    fn test_unbalanced_parens() {
        let kind = check_err("(2d6", false, 4);
        assert!(matches!(
            kind,
            ParseErrorKind::UnexpectedToken { found: None, .. }
        ));

        let kind = check_err("2)", false, 1);
        assert!(matches!(
            kind,
            ParseErrorKind::UnexpectedToken {
                found: Some(TokenKind::RightParen),
                ..
            }
        ));
    }

    #[test]
    fn test_out_of_range() {
        assert_eq!(
            check_err("0d6", false, 0),
            ParseErrorKind::CountOutOfRange(0)
        );
        assert_eq!(
            check_err("10001d6", false, 0),
            ParseErrorKind::CountOutOfRange(10001)
        );
        assert_eq!(
            check_err("2d0", false, 2),
            ParseErrorKind::SidesOutOfRange(0)
        );
        assert_eq!(
            check_err("2d20000", false, 2),
            ParseErrorKind::SidesOutOfRange(20000)
        );
    }

    #[test]
    fn test_conflicting_modifiers() {
        let kind = check_err("2d20kh1kl1", true, 7);
        assert_eq!(
            kind,
            ParseErrorKind::ConflictingModifiers {
                first: Modifier::KeepHighest(1),
                second: Modifier::KeepLowest(1),
            }
        );

        let kind = check_err("2d6r1r2", true, 5);
        assert!(matches!(
            kind,
            ParseErrorKind::ConflictingModifiers { .. }
        ));
    }

    #[test]
    fn test_missing_reroll_condition() {
        let kind = check_err("2d6r", true, 4);
        assert!(matches!(
            kind,
            ParseErrorKind::UnexpectedToken { found: None, .. }
        ));
    }
}
