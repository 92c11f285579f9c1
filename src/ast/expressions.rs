use crate::Position;

use super::ast::ExprId;

#[derive(Debug, Clone)]
pub enum Expr {
    Term(Term),
    Binary(BinaryExpr),
}

#[derive(Debug, Clone)]
pub enum Term {
    Ident(IdentTerm),
    IntLit(i64),
    Call(CallTerm),
}

#[derive(Debug, Clone)]
pub struct IdentTerm {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct CallTerm {
    pub name: String,
    pub arguments: Vec<ExprId>,
    pub position: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    Equals,
    Greater,
    GreaterEquals,
    Less,
    LessEquals,
    And,
    Or,
}

#[derive(Debug, Clone)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: ExprId,
    pub rhs: ExprId,
}
