use crate::{
    ast::{
        ast::ExprId,
        expressions::{BinaryExpr, CallTerm, Expr, IdentTerm, Term},
    },
    errors::errors::{Error, ErrorImpl},
    lexer::tokens::TokenKind,
};

use super::{lookups::Precedence, parser::Parser};

/// Precedence climbing.
///
/// Parses one term, then folds in every following binary operator whose
/// precedence is at least `min_precedence`. The right operand is parsed
/// with `min_precedence + 1`, so an operator at the current level ends the
/// right operand and the chain folds to the left.
pub fn parse_expr(parser: &mut Parser, min_precedence: Precedence) -> Result<ExprId, Error> {
    let mut lhs = parse_term(parser)?;

    loop {
        let token_kind = parser.current_token_kind();

        if token_kind == TokenKind::CloseParen && parser.paren_depth() == 0 {
            return Err(parser.error_here(ErrorImpl::UnbalancedParenthesis));
        }

        let Some(&(precedence, op)) = parser.get_operator_lookup().get(&token_kind) else {
            break;
        };
        if precedence < min_precedence {
            break;
        }

        parser.advance();
        let rhs = parse_expr(parser, min_precedence + 1)?;

        lhs = parser.alloc_expr(Expr::Binary(BinaryExpr { op, lhs, rhs }));
    }

    Ok(lhs)
}

pub fn parse_term(parser: &mut Parser) -> Result<ExprId, Error> {
    match parser.current_token_kind() {
        TokenKind::Number => {
            let token = parser.current_token().clone();
            match token.value.parse::<i64>() {
                Ok(value) => {
                    parser.advance();
                    Ok(parser.alloc_expr(Expr::Term(Term::IntLit(value))))
                }
                Err(_) => Err(Error::new(
                    ErrorImpl::NumberParseError { token: token.value },
                    token.span.start,
                )),
            }
        }
        TokenKind::Identifier => {
            let token = parser.advance().clone();

            if parser.current_token_kind() == TokenKind::OpenBracket {
                let arguments = parse_arguments(parser)?;
                return Ok(parser.alloc_expr(Expr::Term(Term::Call(CallTerm {
                    name: token.value,
                    arguments,
                    position: token.span.start,
                }))));
            }

            Ok(parser.alloc_expr(Expr::Term(Term::Ident(IdentTerm {
                name: token.value,
                position: token.span.start,
            }))))
        }
        TokenKind::OpenParen => parse_grouping_expr(parser),
        _ => Err(parser.error_here(ErrorImpl::ExpectedExpression {
            token: parser.current_token().value.clone(),
        })),
    }
}

pub fn parse_grouping_expr(parser: &mut Parser) -> Result<ExprId, Error> {
    parser.advance();
    parser.open_paren();

    let expr = parse_expr(parser, 0)?;

    if parser.current_token_kind() != TokenKind::CloseParen {
        return Err(parser.error_here(ErrorImpl::UnbalancedParenthesis));
    }
    parser.advance();
    parser.close_paren();

    Ok(expr)
}

/// Parses a bracketed, comma-separated argument list: `[e1, e2, ...]`.
pub fn parse_arguments(parser: &mut Parser) -> Result<Vec<ExprId>, Error> {
    let malformed = |parser: &Parser| {
        parser.error_here(ErrorImpl::MalformedArguments {
            token: parser.current_token().value.clone(),
        })
    };

    if parser.current_token_kind() != TokenKind::OpenBracket {
        return Err(malformed(parser));
    }
    parser.advance();

    let mut arguments = vec![];
    if parser.current_token_kind() == TokenKind::CloseBracket {
        parser.advance();
        return Ok(arguments);
    }

    loop {
        arguments.push(parse_expr(parser, 0)?);

        match parser.current_token_kind() {
            TokenKind::Comma => {
                parser.advance();
            }
            TokenKind::CloseBracket => {
                parser.advance();
                return Ok(arguments);
            }
            _ => return Err(malformed(parser)),
        }
    }
}
