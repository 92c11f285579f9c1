use crate::Position;

use super::ast::{ExprId, ScopeId, StmtId};

#[derive(Debug, Clone)]
pub enum Stmt {
    Exit(ExitStmt),
    Let(LetStmt),
    Ident(IdentStmt),
    If(IfStmt),
    Rep(RepStmt),
    Return(ReturnStmt),
    Scope(ScopeId),
}

#[derive(Debug, Clone)]
pub struct ExitStmt {
    pub expr: ExprId,
}

#[derive(Debug, Clone)]
pub struct LetStmt {
    pub identifier: String,
    pub expr: ExprId,
    pub position: Position,
}

/// What an identifier statement does to its variable.
///
/// `x += e` and `x -= e` are desugared by the parser into
/// `Assign(x + e)` and `Assign(x - e)`.
#[derive(Debug, Clone)]
pub enum IdentAction {
    Assign(ExprId),
    Increment,
    Decrement,
}

#[derive(Debug, Clone)]
pub struct IdentStmt {
    pub identifier: String,
    pub action: IdentAction,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct IfStmt {
    pub condition: ExprId,
    pub then_scope: ScopeId,
    pub else_scope: Option<ScopeId>,
}

#[derive(Debug, Clone)]
pub struct RepStmt {
    pub count: ExprId,
    pub body: ScopeId,
}

#[derive(Debug, Clone)]
pub struct ReturnStmt {
    pub expr: ExprId,
    pub position: Position,
}

#[derive(Debug, Clone, Default)]
pub struct Scope {
    pub stmts: Vec<StmtId>,
}

#[derive(Debug, Clone)]
pub struct FunctionDecl {
    pub name: String,
    pub parameters: Vec<String>,
    pub body: ScopeId,
    pub position: Position,
}
