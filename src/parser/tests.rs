//! Unit tests for the parser module.
//!
//! This module contains tests for parsing various language constructs including:
//! - Variable declarations and identifier statements
//! - Function declarations and calls
//! - Expression precedence and grouping
//! - Control flow statements
//! - Syntax errors

use std::rc::Rc;

use crate::{
    ast::{
        ast::{Ast, ExprId, Program},
        expressions::{BinaryOp, Expr, Term},
        statements::{IdentAction, Stmt},
    },
    errors::errors::ErrorImpl,
    lexer::lexer::tokenize,
};

use super::parser::parse;

fn parse_source(source: &str) -> (Ast, Program) {
    let tokens = tokenize(source.to_string(), Some("test.zen".to_string())).unwrap();
    let (parser, result) = parse(tokens, Rc::new("test.zen".to_string()));
    let program = result.unwrap();

    (parser.into_ast(), program)
}

fn parse_error(source: &str) -> ErrorImpl {
    let tokens = tokenize(source.to_string(), Some("test.zen".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.zen".to_string()));

    result.unwrap_err().get_error_impl().clone()
}

/// Renders an expression fully parenthesised, e.g. `(1 + (2 * 3))`.
fn render(ast: &Ast, expr: ExprId) -> String {
    match ast.expr(expr) {
        Expr::Term(Term::IntLit(value)) => value.to_string(),
        Expr::Term(Term::Ident(ident)) => ident.name.clone(),
        Expr::Term(Term::Call(call)) => {
            let arguments: Vec<String> =
                call.arguments.iter().map(|arg| render(ast, *arg)).collect();
            format!("{}[{}]", call.name, arguments.join(", "))
        }
        Expr::Binary(binary) => {
            let op = match binary.op {
                BinaryOp::Add => "+",
                BinaryOp::Sub => "-",
                BinaryOp::Mul => "*",
                BinaryOp::Div => "/",
                BinaryOp::Rem => "%",
                BinaryOp::Pow => "^",
                BinaryOp::Equals => "==",
                BinaryOp::Greater => ">",
                BinaryOp::GreaterEquals => ">=",
                BinaryOp::Less => "<",
                BinaryOp::LessEquals => "<=",
                BinaryOp::And => "&&",
                BinaryOp::Or => "||",
            };
            format!(
                "({} {} {})",
                render(ast, binary.lhs),
                op,
                render(ast, binary.rhs)
            )
        }
    }
}

/// Parses `exit <expr>;` and renders the expression.
fn render_exit(expr: &str) -> String {
    let (ast, program) = parse_source(&format!("exit {};", expr));
    match ast.stmt(program.stmts[0]) {
        Stmt::Exit(exit) => render(&ast, exit.expr),
        other => panic!("expected exit, found {:?}", other),
    }
}

#[test]
fn test_parse_let_statement() {
    let (ast, program) = parse_source("let x = 42;");

    assert_eq!(program.stmts.len(), 1);
    match ast.stmt(program.stmts[0]) {
        Stmt::Let(let_stmt) => {
            assert_eq!(let_stmt.identifier, "x");
            assert_eq!(render(&ast, let_stmt.expr), "42");
        }
        other => panic!("expected let, found {:?}", other),
    }
}

#[test]
fn test_precedence() {
    assert_eq!(render_exit("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(render_exit("2 ^ 3 + 1"), "((2 ^ 3) + 1)");
    assert_eq!(render_exit("1 == 1 && 0 == 0"), "(1 == (1 && (0 == 0)))");
    assert_eq!(render_exit("a % b ^ c"), "(a % (b ^ c))");
}

#[test]
fn test_right_operand_threshold_follows_minimum() {
    // the right operand takes every operator above the current minimum
    assert_eq!(render_exit("2 ^ 3 * 2"), "(2 ^ (3 * 2))");
    assert_eq!(render_exit("2 % 5 ^ 2"), "(2 % (5 ^ 2))");
    assert_eq!(render_exit("8 / 2 / 2"), "(8 / (2 / 2))");
}

#[test]
fn test_left_associativity() {
    assert_eq!(render_exit("10 - 4 - 3"), "((10 - 4) - 3)");
    assert_eq!(render_exit("1 + 2 - 3 + 4"), "(((1 + 2) - 3) + 4)");
}

#[test]
fn test_grouping() {
    assert_eq!(render_exit("2 * (3 + 4)"), "(2 * (3 + 4))");
    assert_eq!(render_exit("((1))"), "1");
    assert_eq!(render_exit("(a > b) && (c < d)"), "((a > b) && (c < d))");
}

#[test]
fn test_parse_call() {
    assert_eq!(render_exit("add[1, 2 * x]"), "add[1, (2 * x)]");
    assert_eq!(render_exit("zero[]"), "zero[]");
    assert_eq!(render_exit("f[g[1]] + 1"), "(f[g[1]] + 1)");
}

#[test]
fn test_parse_function_declaration() {
    let (ast, program) = parse_source("function add [a, b] { return a + b; } exit add[2, 3];");

    assert_eq!(program.functions.len(), 1);
    assert_eq!(program.stmts.len(), 1);

    let function = &program.functions[0];
    assert_eq!(function.name, "add");
    assert_eq!(function.parameters, vec!["a".to_string(), "b".to_string()]);

    let body = ast.scope(function.body);
    assert_eq!(body.stmts.len(), 1);
    assert!(matches!(ast.stmt(body.stmts[0]), Stmt::Return(_)));
}

#[test]
fn test_parse_ident_statements() {
    let (ast, program) = parse_source("x = 1; x ++; x --; x += 2; x -= 3;");

    let actions: Vec<String> = program
        .stmts
        .iter()
        .map(|stmt| match ast.stmt(*stmt) {
            Stmt::Ident(ident) => match &ident.action {
                IdentAction::Assign(expr) => format!("= {}", render(&ast, *expr)),
                IdentAction::Increment => String::from("++"),
                IdentAction::Decrement => String::from("--"),
            },
            other => panic!("expected identifier statement, found {:?}", other),
        })
        .collect();

    assert_eq!(actions, vec!["= 1", "++", "--", "= (x + 2)", "= (x - 3)"]);
}

#[test]
fn test_parse_if_else() {
    let (ast, program) = parse_source("if x > 0 { exit 1; } else exit 2;");

    match ast.stmt(program.stmts[0]) {
        Stmt::If(if_stmt) => {
            assert_eq!(render(&ast, if_stmt.condition), "(x > 0)");
            assert_eq!(ast.scope(if_stmt.then_scope).stmts.len(), 1);
            let else_scope = if_stmt.else_scope.expect("else branch");
            assert_eq!(ast.scope(else_scope).stmts.len(), 1);
        }
        other => panic!("expected if, found {:?}", other),
    }
}

#[test]
fn test_parse_rep_and_bare_scope() {
    let (ast, program) = parse_source("rep 3 { x ++; }; { let y = 1; let z = 2; }");

    assert_eq!(program.stmts.len(), 2);
    assert!(matches!(ast.stmt(program.stmts[0]), Stmt::Rep(_)));
    match ast.stmt(program.stmts[1]) {
        Stmt::Scope(scope) => assert_eq!(ast.scope(*scope).stmts.len(), 2),
        other => panic!("expected scope, found {:?}", other),
    }
}

#[test]
fn test_comments_are_ignored() {
    let (_, program) = parse_source("// leading\nlet x = 1; // trailing\nexit x;");

    assert_eq!(program.stmts.len(), 2);
}

#[test]
fn test_missing_semicolon() {
    assert_eq!(
        parse_error("let x = 1 let y = 2;"),
        ErrorImpl::MissingSemicolon {
            token: "let".to_string()
        }
    );
}

#[test]
fn test_unbalanced_parenthesis() {
    assert_eq!(parse_error("exit (1 + 2;"), ErrorImpl::UnbalancedParenthesis);
    assert_eq!(parse_error("exit 1 + 2);"), ErrorImpl::UnbalancedParenthesis);
    assert_eq!(parse_error("(exit 1);"), ErrorImpl::UnbalancedParenthesis);
}

#[test]
fn test_missing_expression() {
    assert_eq!(
        parse_error("let x = ;"),
        ErrorImpl::ExpectedExpression {
            token: ";".to_string()
        }
    );
}

#[test]
fn test_invalid_assignment() {
    assert_eq!(
        parse_error("x 1;"),
        ErrorImpl::InvalidAssignment {
            variable: "x".to_string()
        }
    );
}

#[test]
fn test_malformed_parameters() {
    assert_eq!(
        parse_error("function f [a b] { return a; }"),
        ErrorImpl::MalformedParameters {
            token: "b".to_string()
        }
    );
    assert_eq!(
        parse_error("function f a { return a; }"),
        ErrorImpl::MalformedParameters {
            token: "a".to_string()
        }
    );
}

#[test]
fn test_malformed_arguments() {
    assert_eq!(
        parse_error("exit f[1 2];"),
        ErrorImpl::MalformedArguments {
            token: "2".to_string()
        }
    );
}

#[test]
fn test_nested_function_rejected() {
    assert!(matches!(
        parse_error("{ function f [] { return 1; } }"),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
}

#[test]
fn test_unclosed_scope() {
    assert!(matches!(
        parse_error("{ let x = 1;"),
        ErrorImpl::UnexpectedTokenDetailed { .. }
    ));
}

#[test]
fn test_number_out_of_range() {
    assert_eq!(
        parse_error("exit 99999999999999999999;"),
        ErrorImpl::NumberParseError {
            token: "99999999999999999999".to_string()
        }
    );
}

#[test]
fn test_error_position() {
    let source = "let x = 1;\nexit x\n";
    let tokens = tokenize(source.to_string(), Some("test.zen".to_string())).unwrap();
    let (_, result) = parse(tokens, Rc::new("test.zen".to_string()));
    let error = result.unwrap_err();

    assert!(matches!(error.get_error_impl(), ErrorImpl::MissingSemicolon { .. }));
    assert_eq!(crate::line_of(&error, source), 2);
}
