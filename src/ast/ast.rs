use id_arena::{Arena, Id};

use super::{
    expressions::Expr,
    statements::{FunctionDecl, Scope, Stmt},
};

/// Handle to an expression node owned by an [`Ast`].
pub type ExprId = Id<Expr>;
/// Handle to a statement node owned by an [`Ast`].
pub type StmtId = Id<Stmt>;
/// Handle to a scope node owned by an [`Ast`].
pub type ScopeId = Id<Scope>;

/// Node arena
///
/// Owns every node produced by one parse. Nodes are allocated once, never
/// freed individually, and released together when the arena is dropped.
/// Parents refer to children through handles, so no node has two parents.
#[derive(Debug, Default)]
pub struct Ast {
    exprs: Arena<Expr>,
    stmts: Arena<Stmt>,
    scopes: Arena<Scope>,
}

impl Ast {
    pub fn new() -> Self {
        Ast::default()
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.stmts.alloc(stmt)
    }

    pub fn alloc_scope(&mut self, scope: Scope) -> ScopeId {
        self.scopes.alloc(scope)
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id]
    }

    pub fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id]
    }

    /// Total number of allocated nodes.
    pub fn len(&self) -> usize {
        self.exprs.len() + self.stmts.len() + self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// The parse result: top-level statements plus function declarations, each
/// in source order. Produced once by the parser and never mutated.
#[derive(Debug, Default)]
pub struct Program {
    pub stmts: Vec<StmtId>,
    pub functions: Vec<FunctionDecl>,
}
