//! Parser implementation for building the Abstract Syntax Tree.
//!
//! This module contains the main Parser struct and the `parse` entry point.
//! Expressions are parsed by precedence climbing and statements by a
//! leading-token dispatch table.
//!
//! It maintains lookup tables for:
//! - Statement handlers
//! - Binary operator precedences and the node each operator builds

use std::{collections::HashMap, rc::Rc};

use crate::{
    ast::{
        ast::{Ast, ExprId, Program, ScopeId, StmtId},
        expressions::{BinaryOp, Expr},
        statements::{Scope, Stmt},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::{Token, TokenKind},
    Position, MK_TOKEN, Span,
};

use super::{
    lookups::{create_token_lookups, OperatorLookup, Precedence, StmtHandler, StmtLookup},
    stmt::{parse_fn_decl_stmt, parse_stmt},
};

/// The main parser structure that maintains parsing state.
///
/// Holds the token stream, the node arena every parsed node is allocated
/// into, and the dispatch tables. Nodes live exactly as long as the parser
/// (or the [`Ast`] taken out of it with [`Parser::into_ast`]).
pub struct Parser {
    /// The list of tokens to parse, always terminated by `EOF`
    tokens: Vec<Token>,
    /// Current position in the token stream
    pos: usize,
    /// Arena owning every node of the tree
    ast: Ast,
    /// Lookup table for statement parsing handlers
    stmt_lookup: StmtLookup,
    /// Lookup table for binary operators
    operator_lookup: OperatorLookup,
    /// Open `(` not yet closed within the current statement
    paren_depth: i32,
}

impl Parser {
    /// Creates a new Parser instance.
    ///
    /// An `EOF` token is appended when the stream does not already end with
    /// one, so lookahead never runs off the end.
    pub fn new(mut tokens: Vec<Token>, file: Rc<String>) -> Self {
        if tokens.last().map(|t| t.kind) != Some(TokenKind::EOF) {
            let end = tokens
                .last()
                .map_or(0, |token| token.span.end.0);
            let position = Position(end, Rc::clone(&file));
            tokens.push(MK_TOKEN!(
                TokenKind::EOF,
                String::from("EOF"),
                Span {
                    start: position.clone(),
                    end: position
                }
            ));
        }

        Parser {
            tokens,
            pos: 0,
            ast: Ast::new(),
            stmt_lookup: HashMap::new(),
            operator_lookup: HashMap::new(),
            paren_depth: 0,
        }
    }

    /// Returns the current token without advancing.
    pub fn current_token(&self) -> &Token {
        self.peek(0)
    }

    /// Returns the kind of the current token.
    pub fn current_token_kind(&self) -> TokenKind {
        self.current_token().kind
    }

    /// Returns the token `offset` places ahead, or `EOF` past the end.
    pub fn peek(&self, offset: usize) -> &Token {
        let last = self.tokens.len() - 1;
        &self.tokens[(self.pos + offset).min(last)]
    }

    pub fn peek_kind(&self, offset: usize) -> TokenKind {
        self.peek(offset).kind
    }

    /// Advances to the next token and returns the previous token.
    /// The parser never moves past `EOF`.
    pub fn advance(&mut self) -> &Token {
        let current = self.pos;
        if self.tokens[current].kind != TokenKind::EOF {
            self.pos += 1;
        }
        &self.tokens[current]
    }

    /// Expects a token of the specified kind, with optional custom error.
    pub fn expect_error(
        &mut self,
        expected_kind: TokenKind,
        error: Option<Error>,
    ) -> Result<Token, Error> {
        let token = self.current_token();
        if token.kind != expected_kind {
            match error {
                Some(error) => Err(error),
                None => Err(Error::new(
                    ErrorImpl::UnexpectedToken {
                        token: token.value.clone(),
                    },
                    token.span.start.clone(),
                )),
            }
        } else {
            Ok(self.advance().clone())
        }
    }

    /// Expects a token of the specified kind with default error message.
    pub fn expect(&mut self, expected_kind: TokenKind) -> Result<Token, Error> {
        self.expect_error(expected_kind, None)
    }

    /// Checks if there are more tokens to parse.
    pub fn has_tokens(&self) -> bool {
        self.current_token_kind() != TokenKind::EOF
    }

    /// Builds an error positioned at the current token.
    pub fn error_here(&self, error_impl: ErrorImpl) -> Error {
        Error::new(error_impl, self.get_position())
    }

    /// Returns a reference to the statement lookup table.
    pub fn get_stmt_lookup(&self) -> &StmtLookup {
        &self.stmt_lookup
    }

    /// Returns a reference to the binary operator lookup table.
    pub fn get_operator_lookup(&self) -> &OperatorLookup {
        &self.operator_lookup
    }

    /// Registers a binary operator with its precedence.
    pub fn binary(&mut self, kind: TokenKind, precedence: Precedence, op: BinaryOp) {
        self.operator_lookup.insert(kind, (precedence, op));
    }

    /// Registers a statement handler for a leading token.
    pub fn stmt(&mut self, kind: TokenKind, stmt_fn: StmtHandler) {
        self.stmt_lookup.insert(kind, stmt_fn);
    }

    pub fn open_paren(&mut self) {
        self.paren_depth += 1;
    }

    pub fn close_paren(&mut self) {
        self.paren_depth -= 1;
    }

    pub fn paren_depth(&self) -> i32 {
        self.paren_depth
    }

    pub fn reset_paren_depth(&mut self) {
        self.paren_depth = 0;
    }

    pub fn alloc_expr(&mut self, expr: Expr) -> ExprId {
        self.ast.alloc_expr(expr)
    }

    pub fn alloc_stmt(&mut self, stmt: Stmt) -> StmtId {
        self.ast.alloc_stmt(stmt)
    }

    pub fn alloc_scope(&mut self, scope: Scope) -> ScopeId {
        self.ast.alloc_scope(scope)
    }

    /// The arena holding every node parsed so far.
    pub fn ast(&self) -> &Ast {
        &self.ast
    }

    /// Consumes the parser, keeping only the node arena.
    pub fn into_ast(self) -> Ast {
        self.ast
    }

    /// Returns the source position of the current token.
    pub fn get_position(&self) -> Position {
        self.current_token().span.start.clone()
    }
}

/// Parses a stream of tokens into a [`Program`].
///
/// Function declarations are only accepted at the top level; everything else
/// is a top-level statement. The first error stops parsing and no partial
/// program is returned.
///
/// # Returns
///
/// A tuple containing:
/// - The Parser instance, which owns the node arena
/// - Result containing either the Program or an Error
pub fn parse(tokens: Vec<Token>, file: Rc<String>) -> (Parser, Result<Program, Error>) {
    let mut parser = Parser::new(tokens, file);
    create_token_lookups(&mut parser);

    let program = parse_program(&mut parser);

    (parser, program)
}

fn parse_program(parser: &mut Parser) -> Result<Program, Error> {
    let mut program = Program::default();

    while parser.has_tokens() {
        if parser.current_token_kind() == TokenKind::Function {
            program.functions.push(parse_fn_decl_stmt(parser)?);
        } else {
            program.stmts.push(parse_stmt(parser)?);
        }
    }

    Ok(program)
}
