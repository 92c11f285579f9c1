/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: The node arena, node handles and the `Program` root
/// - expressions: Definitions for terms and binary expressions
/// - statements: Definitions for statements, scopes and function declarations
pub mod ast;
pub mod expressions;
pub mod statements;
