//! Main compiler module.
//!
//! This module contains the core Compiler structure: the generation context
//! every lowering function receives. It owns the assembly buffer, the virtual
//! operand stack height, the variable table of the function being generated,
//! the declared functions and the label-id counter. Nothing here is global,
//! so independent `generate` runs never interfere.

use std::collections::HashMap;

use tracing::debug;

use crate::{
    ast::ast::{Ast, Program},
    errors::errors::{Error, ErrorImpl},
    Position,
};

use super::stmt::{gen_function, gen_statement};

/// Size of one operand stack cell in bytes.
pub const CELL_SIZE: usize = 8;

/// A variable bound to the stack slot that was on top when it was declared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Var {
    pub stack_loc: usize,
}

/// Caller bookkeeping saved around a call site.
pub struct Frame {
    vars: HashMap<String, Var>,
    stack_size: usize,
}

/// The code generation context.
///
/// # Type Parameters
///
/// * `'a` - Lifetime of the node arena being read
pub struct Compiler<'a> {
    /// The node arena; only ever read
    ast: &'a Ast,
    /// The assembly emitted so far
    output: String,
    /// Number of 8-byte cells currently pushed
    stack_size: usize,
    /// Variables of the function (or entry block) being generated
    vars: HashMap<String, Var>,
    /// Declared functions and their arity
    functions: HashMap<String, usize>,
    /// Stack height right after a call landed in the current function
    function_floor: Option<usize>,
    /// Next unused label id
    label_id: usize,
}

impl<'a> Compiler<'a> {
    pub fn new(ast: &'a Ast) -> Self {
        Compiler {
            ast,
            output: String::new(),
            stack_size: 0,
            vars: HashMap::new(),
            functions: HashMap::new(),
            function_floor: None,
            label_id: 0,
        }
    }

    /// Lowers a whole program: the entry declaration, one block per function
    /// in declaration order, then `_start` with the top-level statements and
    /// a final `exit(0)`.
    pub fn compile(&mut self, program: &Program) -> Result<(), Error> {
        self.output.push_str("global _start\n");

        for function in program.functions.iter() {
            gen_function(self, function)?;
        }

        self.label("_start");

        for stmt in program.stmts.iter() {
            gen_statement(self, *stmt)?;
        }

        self.emit("mov rax, 60");
        self.emit("mov rdi, 0");
        self.emit("syscall");

        debug!(
            functions = self.functions.len(),
            labels = self.label_id,
            bytes = self.output.len(),
            "generated assembly"
        );

        Ok(())
    }

    pub fn ast(&self) -> &'a Ast {
        self.ast
    }

    pub fn into_output(self) -> String {
        self.output
    }

    pub fn stack_size(&self) -> usize {
        self.stack_size
    }

    /// Emits one indented instruction.
    pub fn emit(&mut self, instruction: &str) {
        self.output.push_str("    ");
        self.output.push_str(instruction);
        self.output.push('\n');
    }

    pub fn label(&mut self, name: &str) {
        self.output.push_str(name);
        self.output.push_str(":\n");
    }

    pub fn push(&mut self, operand: &str) {
        self.emit(&format!("push {}", operand));
        self.stack_size += 1;
    }

    pub fn pop(&mut self, register: &str) {
        self.emit(&format!("pop {}", register));
        self.stack_size -= 1;
    }

    /// Drops `cells` cells from the top of the stack.
    pub fn discard(&mut self, cells: usize) {
        if cells > 0 {
            self.emit(&format!("add rsp, {}", cells * CELL_SIZE));
            self.stack_size -= cells;
        }
    }

    /// Records that `cells` cells are already on the stack, pushed by code
    /// outside the current block (call arguments and the return address).
    pub fn assume_pushed(&mut self, cells: usize) {
        self.stack_size += cells;
    }

    /// Returns a fresh id for a family of labels.
    pub fn next_label_id(&mut self) -> usize {
        let id = self.label_id;
        self.label_id += 1;
        id
    }

    /// Memory operand of a live variable, relative to the current stack top.
    pub fn variable_location(&self, name: &str, position: &Position) -> Result<String, Error> {
        match self.vars.get(name) {
            Some(var) if var.stack_loc < self.stack_size => Ok(format!(
                "QWORD [rsp + {}]",
                (self.stack_size - 1 - var.stack_loc) * CELL_SIZE
            )),
            _ => Err(Error::new(
                ErrorImpl::VariableNotDeclared {
                    variable: name.to_string(),
                },
                position.clone(),
            )),
        }
    }

    /// Fails when `name` still names a live slot.
    pub fn check_not_declared(&self, name: &str, position: &Position) -> Result<(), Error> {
        match self.vars.get(name) {
            Some(var) if var.stack_loc < self.stack_size => Err(Error::new(
                ErrorImpl::VariableAlreadyDeclared {
                    variable: name.to_string(),
                },
                position.clone(),
            )),
            _ => Ok(()),
        }
    }

    pub fn bind_variable(&mut self, name: &str, stack_loc: usize) {
        self.vars.insert(name.to_string(), Var { stack_loc });
    }

    /// Forgets every variable living at or above `height`.
    pub fn drop_variables_from(&mut self, height: usize) {
        self.vars.retain(|_, var| var.stack_loc < height);
    }

    pub fn snapshot_frame(&self) -> Frame {
        Frame {
            vars: self.vars.clone(),
            stack_size: self.stack_size,
        }
    }

    pub fn restore_frame(&mut self, frame: Frame) {
        self.vars = frame.vars;
        self.stack_size = frame.stack_size;
    }

    /// Clears the variable table and height bookkeeping around a function
    /// body; only one function's table is live at a time.
    pub fn reset_frame(&mut self) {
        self.vars.clear();
        self.stack_size = 0;
        self.function_floor = None;
    }

    /// Marks the current height as the floor `return` unwinds to.
    pub fn set_function_floor(&mut self) {
        self.function_floor = Some(self.stack_size);
    }

    pub fn function_floor(&self) -> Option<usize> {
        self.function_floor
    }

    pub fn function_arity(&self, name: &str) -> Option<usize> {
        self.functions.get(name).copied()
    }

    /// Registers a function, failing on a duplicate name.
    pub fn declare_function(
        &mut self,
        name: &str,
        arity: usize,
        position: &Position,
    ) -> Result<(), Error> {
        if self.functions.contains_key(name) {
            return Err(Error::new(
                ErrorImpl::FunctionAlreadyDeclared {
                    function: name.to_string(),
                },
                position.clone(),
            ));
        }

        self.functions.insert(name.to_string(), arity);
        Ok(())
    }
}

/// Assembly label of a user function; the prefix keeps user names clear of
/// generated labels and instruction mnemonics.
pub fn function_label(name: &str) -> String {
    format!("fn_{}", name)
}

/// Generates NASM x86-64 assembly for `program`, whose nodes live in `ast`.
///
/// # Returns
///
/// The assembly text, or the first semantic error found (undeclared
/// identifier or function, arity mismatch, duplicate declaration).
pub fn generate(program: &Program, ast: &Ast) -> Result<String, Error> {
    let mut compiler = Compiler::new(ast);
    compiler.compile(program)?;

    Ok(compiler.into_output())
}
