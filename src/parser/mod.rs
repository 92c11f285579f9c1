//! Parser module for building an Abstract Syntax Tree (AST).
//!
//! This module contains the parser that transforms a stream of tokens
//! into a [`Program`](crate::ast::ast::Program) whose nodes live in an
//! index-based arena. It handles:
//!
//! - Statement parsing (`exit`, `let`, assignments, `if`, `rep`, `return`,
//!   scopes and top-level function declarations)
//! - Expression parsing by precedence climbing, with parenthesised groups
//!   and bracketed call arguments
//! - Fail-fast error reporting with the offending token's position

pub mod expr;
pub mod lookups;
pub mod parser;
pub mod stmt;

#[cfg(test)]
mod tests;
