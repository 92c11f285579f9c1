//! Code generation module for the compiler.
//!
//! This module lowers the parsed program to NASM x86-64 assembly for a
//! stack machine. It handles:
//!
//! - The virtual operand stack and variable slot addressing
//! - Expression, comparison and power lowering
//! - Control flow (`if`, `rep`, scopes) and function linkage

pub mod compiler;
pub mod expr;
pub mod stmt;
