use tracing::debug;

use crate::{
    ast::{
        ast::{ScopeId, StmtId},
        statements::{
            FunctionDecl, IdentAction, IdentStmt, IfStmt, LetStmt, RepStmt, ReturnStmt, Stmt,
        },
    },
    errors::errors::{Error, ErrorImpl},
};

use super::{
    compiler::{function_label, Compiler, CELL_SIZE},
    expr::gen_expression,
};

pub fn gen_statement(compiler: &mut Compiler<'_>, stmt: StmtId) -> Result<(), Error> {
    match compiler.ast().stmt(stmt) {
        Stmt::Exit(exit) => {
            gen_expression(compiler, exit.expr)?;
            compiler.emit("mov rax, 60");
            compiler.pop("rdi");
            compiler.emit("syscall");
        }
        Stmt::Let(let_stmt) => gen_let_stmt(compiler, let_stmt)?,
        Stmt::Ident(ident_stmt) => gen_ident_stmt(compiler, ident_stmt)?,
        Stmt::If(if_stmt) => gen_if_stmt(compiler, if_stmt)?,
        Stmt::Rep(rep_stmt) => gen_rep_stmt(compiler, rep_stmt)?,
        Stmt::Return(return_stmt) => gen_return_stmt(compiler, return_stmt)?,
        Stmt::Scope(scope) => gen_scope(compiler, *scope)?,
    }

    Ok(())
}

/// The initialiser's cell becomes the variable's slot.
fn gen_let_stmt(compiler: &mut Compiler<'_>, let_stmt: &LetStmt) -> Result<(), Error> {
    compiler.check_not_declared(&let_stmt.identifier, &let_stmt.position)?;

    gen_expression(compiler, let_stmt.expr)?;

    let slot = compiler.stack_size() - 1;
    compiler.bind_variable(&let_stmt.identifier, slot);

    Ok(())
}

fn gen_ident_stmt(compiler: &mut Compiler<'_>, ident_stmt: &IdentStmt) -> Result<(), Error> {
    match &ident_stmt.action {
        IdentAction::Assign(expr) => {
            gen_expression(compiler, *expr)?;
            compiler.pop("rax");
            let location =
                compiler.variable_location(&ident_stmt.identifier, &ident_stmt.position)?;
            compiler.emit(&format!("mov {}, rax", location));
        }
        IdentAction::Increment => {
            let location =
                compiler.variable_location(&ident_stmt.identifier, &ident_stmt.position)?;
            compiler.emit(&format!("inc {}", location));
        }
        IdentAction::Decrement => {
            let location =
                compiler.variable_location(&ident_stmt.identifier, &ident_stmt.position)?;
            compiler.emit(&format!("dec {}", location));
        }
    }

    Ok(())
}

fn gen_if_stmt(compiler: &mut Compiler<'_>, if_stmt: &IfStmt) -> Result<(), Error> {
    let id = compiler.next_label_id();

    gen_expression(compiler, if_stmt.condition)?;
    compiler.pop("rax");
    compiler.emit("cmp rax, 1");
    compiler.emit(&format!("jne else_{}", id));

    gen_scope(compiler, if_stmt.then_scope)?;
    compiler.emit(&format!("jmp end_{}", id));

    compiler.label(&format!("else_{}", id));
    if let Some(else_scope) = if_stmt.else_scope {
        gen_scope(compiler, else_scope)?;
    }
    compiler.label(&format!("end_{}", id));

    Ok(())
}

/// The remaining count lives on the operand stack while the body runs, so
/// nested loops and `^` may use `rcx` freely.
fn gen_rep_stmt(compiler: &mut Compiler<'_>, rep_stmt: &RepStmt) -> Result<(), Error> {
    let id = compiler.next_label_id();

    gen_expression(compiler, rep_stmt.count)?;
    compiler.pop("rcx");
    compiler.emit("test rcx, rcx");
    compiler.emit(&format!("jle rep_end_{}", id));

    compiler.label(&format!("rep_{}", id));
    compiler.push("rcx");
    gen_scope(compiler, rep_stmt.body)?;
    compiler.pop("rcx");
    compiler.emit("dec rcx");
    compiler.emit(&format!("jnz rep_{}", id));
    compiler.label(&format!("rep_end_{}", id));

    Ok(())
}

/// Unwinds to the function floor and returns. The modelled height is left
/// untouched since code after the `return` still sees the pre-return stack.
fn gen_return_stmt(compiler: &mut Compiler<'_>, return_stmt: &ReturnStmt) -> Result<(), Error> {
    let Some(floor) = compiler.function_floor() else {
        return Err(Error::new(
            ErrorImpl::ReturnOutsideFunction,
            return_stmt.position.clone(),
        ));
    };

    gen_expression(compiler, return_stmt.expr)?;
    compiler.pop("rax");

    let cells = compiler.stack_size() - floor;
    if cells > 0 {
        compiler.emit(&format!("add rsp, {}", cells * CELL_SIZE));
    }
    compiler.emit("ret");

    Ok(())
}

/// Runs the statements of `scope`, then reclaims every cell and binding
/// they introduced.
pub fn gen_scope(compiler: &mut Compiler<'_>, scope: ScopeId) -> Result<(), Error> {
    let entry_height = compiler.stack_size();

    for stmt in compiler.ast().scope(scope).stmts.iter() {
        gen_statement(compiler, *stmt)?;
    }

    compiler.discard(compiler.stack_size() - entry_height);
    compiler.drop_variables_from(entry_height);

    Ok(())
}

/// Emits `fn_<name>:` and its body.
///
/// On entry the caller has pushed the arguments in order, then `call` pushed
/// the return address; parameter `i` therefore lives in slot `i` and the
/// return address in slot `parameters.len()`.
pub fn gen_function(compiler: &mut Compiler<'_>, function: &FunctionDecl) -> Result<(), Error> {
    let arity = function.parameters.len();
    compiler.declare_function(&function.name, arity, &function.position)?;

    compiler.label(&function_label(&function.name));
    compiler.reset_frame();
    compiler.assume_pushed(arity + 1);

    for (slot, parameter) in function.parameters.iter().enumerate() {
        compiler.check_not_declared(parameter, &function.position)?;
        compiler.bind_variable(parameter, slot);
    }

    compiler.set_function_floor();
    gen_scope(compiler, function.body)?;

    compiler.emit("mov rax, 0");
    compiler.emit("ret");
    compiler.reset_frame();

    debug!(function = %function.name, arity, "generated function");

    Ok(())
}
