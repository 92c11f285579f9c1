use crate::{
    ast::{
        ast::{ScopeId, StmtId},
        expressions::{BinaryExpr, BinaryOp, Expr, IdentTerm, Term},
        statements::{
            ExitStmt, FunctionDecl, IdentAction, IdentStmt, IfStmt, LetStmt, RepStmt, ReturnStmt,
            Scope, Stmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{expr::parse_expr, parser::Parser};

/// Parses one statement and its terminator.
///
/// Statements that end in a scope (`if`, `rep`, bare `{ }`) take an optional
/// `;`; every other statement requires one.
pub fn parse_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    parser.reset_paren_depth();

    let token_kind = parser.current_token_kind();
    let Some(handler) = parser.get_stmt_lookup().get(&token_kind).copied() else {
        let token = parser.current_token().value.clone();
        return Err(match token_kind {
            TokenKind::Function => parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
                token,
                message: String::from("functions can only be declared at the top level"),
            }),
            TokenKind::OpenParen | TokenKind::CloseParen => {
                parser.error_here(ErrorImpl::UnbalancedParenthesis)
            }
            _ => parser.error_here(ErrorImpl::UnexpectedToken { token }),
        });
    };

    let stmt = handler(parser)?;

    if parser.paren_depth() != 0 {
        return Err(parser.error_here(ErrorImpl::UnbalancedParenthesis));
    }

    let ends_in_scope = matches!(
        parser.ast().stmt(stmt),
        Stmt::If(_) | Stmt::Rep(_) | Stmt::Scope(_)
    );

    if ends_in_scope {
        if parser.current_token_kind() == TokenKind::Semicolon {
            parser.advance();
        }
    } else {
        expect_semicolon(parser)?;
    }

    Ok(stmt)
}

fn expect_semicolon(parser: &mut Parser) -> Result<(), Error> {
    match parser.current_token_kind() {
        TokenKind::Semicolon => {
            parser.advance();
            Ok(())
        }
        TokenKind::OpenParen | TokenKind::CloseParen => {
            Err(parser.error_here(ErrorImpl::UnbalancedParenthesis))
        }
        _ => Err(parser.error_here(ErrorImpl::MissingSemicolon {
            token: parser.current_token().value.clone(),
        })),
    }
}

/// A scope is either a brace-delimited statement sequence or one statement.
pub fn parse_scope(parser: &mut Parser) -> Result<ScopeId, Error> {
    let mut stmts = Vec::new();

    if parser.current_token_kind() == TokenKind::OpenCurly {
        parser.advance();

        while parser.current_token_kind() != TokenKind::CloseCurly {
            if !parser.has_tokens() {
                return Err(parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
                    token: parser.current_token().value.clone(),
                    message: String::from("expected `}` to close the scope"),
                }));
            }
            stmts.push(parse_stmt(parser)?);
        }

        parser.expect(TokenKind::CloseCurly)?;
    } else {
        stmts.push(parse_stmt(parser)?);
    }

    Ok(parser.alloc_scope(Scope { stmts }))
}

pub fn parse_exit_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    parser.advance();

    let expr = parse_expr(parser, 0)?;

    Ok(parser.alloc_stmt(Stmt::Exit(ExitStmt { expr })))
}

pub fn parse_let_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    parser.advance();

    let error = parser.error_here(ErrorImpl::UnexpectedTokenDetailed {
        token: parser.current_token().value.clone(),
        message: String::from("expected identifier during variable declaration"),
    });
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let error = parser.error_here(ErrorImpl::InvalidAssignment {
        variable: identifier.value.clone(),
    });
    parser.expect_error(TokenKind::Assignment, Some(error))?;

    let expr = parse_expr(parser, 0)?;

    Ok(parser.alloc_stmt(Stmt::Let(LetStmt {
        identifier: identifier.value,
        expr,
        position: identifier.span.start,
    })))
}

/// `x = e`, `x += e`, `x -= e`, `x ++` or `x --`.
///
/// The two-character operators are recognised as two consecutive tokens
/// directly after the identifier.
pub fn parse_ident_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let identifier = parser.advance().clone();

    let action = match (parser.current_token_kind(), parser.peek_kind(1)) {
        (TokenKind::Plus, TokenKind::Plus) => {
            parser.advance();
            parser.advance();
            IdentAction::Increment
        }
        (TokenKind::Dash, TokenKind::Dash) => {
            parser.advance();
            parser.advance();
            IdentAction::Decrement
        }
        (TokenKind::Plus, TokenKind::Assignment) | (TokenKind::Dash, TokenKind::Assignment) => {
            let op = if parser.current_token_kind() == TokenKind::Plus {
                BinaryOp::Add
            } else {
                BinaryOp::Sub
            };
            parser.advance();
            parser.advance();

            let rhs = parse_expr(parser, 0)?;
            let lhs = parser.alloc_expr(Expr::Term(Term::Ident(IdentTerm {
                name: identifier.value.clone(),
                position: identifier.span.start.clone(),
            })));

            IdentAction::Assign(parser.alloc_expr(Expr::Binary(BinaryExpr { op, lhs, rhs })))
        }
        (TokenKind::Assignment, _) => {
            parser.advance();
            IdentAction::Assign(parse_expr(parser, 0)?)
        }
        _ => {
            return Err(parser.error_here(ErrorImpl::InvalidAssignment {
                variable: identifier.value,
            }))
        }
    };

    Ok(parser.alloc_stmt(Stmt::Ident(IdentStmt {
        identifier: identifier.value,
        action,
        position: identifier.span.start,
    })))
}

pub fn parse_if_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    parser.advance();

    let condition = parse_expr(parser, 0)?;
    let then_scope = parse_scope(parser)?;

    let else_scope = if parser.current_token_kind() == TokenKind::Else {
        parser.advance();
        Some(parse_scope(parser)?)
    } else {
        None
    };

    Ok(parser.alloc_stmt(Stmt::If(IfStmt {
        condition,
        then_scope,
        else_scope,
    })))
}

pub fn parse_rep_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    parser.advance();

    let count = parse_expr(parser, 0)?;
    let body = parse_scope(parser)?;

    Ok(parser.alloc_stmt(Stmt::Rep(RepStmt { count, body })))
}

pub fn parse_return_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let start = parser.advance().span.start.clone();

    let expr = parse_expr(parser, 0)?;

    Ok(parser.alloc_stmt(Stmt::Return(ReturnStmt {
        expr,
        position: start,
    })))
}

pub fn parse_scope_stmt(parser: &mut Parser) -> Result<StmtId, Error> {
    let scope = parse_scope(parser)?;

    Ok(parser.alloc_stmt(Stmt::Scope(scope)))
}

/// `function <name> [a, b, ...] <scope>`, only valid at the top level.
pub fn parse_fn_decl_stmt(parser: &mut Parser) -> Result<FunctionDecl, Error> {
    parser.advance();

    let error = parser.error_here(ErrorImpl::MalformedParameters {
        token: parser.current_token().value.clone(),
    });
    let identifier = parser.expect_error(TokenKind::Identifier, Some(error))?;

    let parameters = parse_parameters(parser)?;
    let body = parse_scope(parser)?;

    if parser.current_token_kind() == TokenKind::Semicolon {
        parser.advance();
    }

    Ok(FunctionDecl {
        name: identifier.value,
        parameters,
        body,
        position: identifier.span.start,
    })
}

/// Parses a bracketed, comma-separated parameter list: `[a, b, ...]`.
fn parse_parameters(parser: &mut Parser) -> Result<Vec<String>, Error> {
    let malformed = |parser: &Parser| {
        parser.error_here(ErrorImpl::MalformedParameters {
            token: parser.current_token().value.clone(),
        })
    };

    if parser.current_token_kind() != TokenKind::OpenBracket {
        return Err(malformed(parser));
    }
    parser.advance();

    let mut parameters = vec![];
    if parser.current_token_kind() == TokenKind::CloseBracket {
        parser.advance();
        return Ok(parameters);
    }

    loop {
        if parser.current_token_kind() != TokenKind::Identifier {
            return Err(malformed(parser));
        }
        parameters.push(parser.advance().value.clone());

        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
            }
            TokenKind::CloseBracket => {
                parser.advance();
                return Ok(parameters);
            }
            _ => return Err(malformed(parser)),
        }
    }
}
