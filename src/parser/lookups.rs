use std::collections::HashMap;

use crate::{
    ast::{ast::StmtId, expressions::BinaryOp},
    errors::errors::Error,
    lexer::tokens::TokenKind,
};

use super::{parser::Parser, stmt::*};

/// Binary operator precedence, 0 being the loosest.
pub type Precedence = u8;

pub const ADDITIVE: Precedence = 0;
pub const MULTIPLICATIVE: Precedence = 1;
pub const POWER: Precedence = 2;
pub const REMAINDER: Precedence = 3;
pub const RELATIONAL: Precedence = 4;
pub const LOGICAL: Precedence = 5;

pub type StmtHandler = fn(&mut Parser) -> Result<StmtId, Error>;

pub fn create_token_lookups(parser: &mut Parser) {
    // Additive and multiplicative
    parser.binary(TokenKind::Plus, ADDITIVE, BinaryOp::Add);
    parser.binary(TokenKind::Dash, ADDITIVE, BinaryOp::Sub);
    parser.binary(TokenKind::Star, MULTIPLICATIVE, BinaryOp::Mul);
    parser.binary(TokenKind::Slash, MULTIPLICATIVE, BinaryOp::Div);
    parser.binary(TokenKind::Caret, POWER, BinaryOp::Pow);
    parser.binary(TokenKind::Percent, REMAINDER, BinaryOp::Rem);

    // Relational
    parser.binary(TokenKind::Equals, RELATIONAL, BinaryOp::Equals);
    parser.binary(TokenKind::Greater, RELATIONAL, BinaryOp::Greater);
    parser.binary(TokenKind::GreaterEquals, RELATIONAL, BinaryOp::GreaterEquals);
    parser.binary(TokenKind::Less, RELATIONAL, BinaryOp::Less);
    parser.binary(TokenKind::LessEquals, RELATIONAL, BinaryOp::LessEquals);

    // Logical
    parser.binary(TokenKind::And, LOGICAL, BinaryOp::And);
    parser.binary(TokenKind::Or, LOGICAL, BinaryOp::Or);

    // Statements
    parser.stmt(TokenKind::Exit, parse_exit_stmt);
    parser.stmt(TokenKind::Let, parse_let_stmt);
    parser.stmt(TokenKind::Identifier, parse_ident_stmt);
    parser.stmt(TokenKind::If, parse_if_stmt);
    parser.stmt(TokenKind::Rep, parse_rep_stmt);
    parser.stmt(TokenKind::Return, parse_return_stmt);
    parser.stmt(TokenKind::OpenCurly, parse_scope_stmt);
}

// Lookup tables inside parser struct, so it's easier
pub type StmtLookup = HashMap<TokenKind, StmtHandler>;
pub type OperatorLookup = HashMap<TokenKind, (Precedence, BinaryOp)>;
