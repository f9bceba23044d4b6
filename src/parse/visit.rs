use super::ast::{DiceTerm, Expr};
use crate::common::{BinaryOperator, Int, UnaryOperator};

pub trait AstVisitor {
    type Output;

    fn visit<T: ?Sized>(&mut self, node: &T) -> Self::Output
    where
        T: Accept<Self>,
    {
        node.accept(self)
    }

    fn visit_literal(&mut self, value: Int) -> Self::Output;

    fn visit_dice(&mut self, term: &DiceTerm) -> Self::Output;

    fn visit_grouping(&mut self, inner: &Expr) -> Self::Output;

    fn visit_unary(&mut self, op: UnaryOperator, value: &Expr) -> Self::Output;

    fn visit_binary(&mut self, left: &Expr, op: BinaryOperator, right: &Expr) -> Self::Output;
}

pub trait Accept<V: AstVisitor + ?Sized> {
    fn accept(&self, v: &mut V) -> V::Output;
}

impl<V: AstVisitor + ?Sized> Accept<V> for Expr {
    fn accept(&self, v: &mut V) -> V::Output {
        match self {
            Self::Literal(x) => v.visit_literal(*x),
            Self::Dice(term) => v.visit_dice(term),
            Self::Grouping(inner) => v.visit_grouping(inner),
            Self::Unary(op, value) => v.visit_unary(*op, value),
            Self::Binary(left, op, right) => v.visit_binary(left, *op, right),
        }
    }
}
