use crate::{
    ast::{
        ast::ExprId,
        expressions::{BinaryExpr, BinaryOp, CallTerm, Expr, Term},
    },
    errors::errors::{Error, ErrorImpl},
};

use super::compiler::{function_label, Compiler};

/// Generates code that leaves the value of `expression` in one new cell on
/// top of the stack.
pub fn gen_expression(compiler: &mut Compiler<'_>, expression: ExprId) -> Result<(), Error> {
    match compiler.ast().expr(expression) {
        Expr::Term(term) => gen_term(compiler, term),
        Expr::Binary(binary) => gen_binary_expr(compiler, binary),
    }
}

fn gen_term(compiler: &mut Compiler<'_>, term: &Term) -> Result<(), Error> {
    match term {
        Term::IntLit(value) => {
            compiler.emit(&format!("mov rax, {}", value));
            compiler.push("rax");
        }
        Term::Ident(ident) => {
            let location = compiler.variable_location(&ident.name, &ident.position)?;
            compiler.push(&location);
        }
        Term::Call(call) => gen_call(compiler, call)?,
    }

    Ok(())
}

/// Pushes the arguments left to right, calls, drops the arguments and pushes
/// the callee's `rax`.
fn gen_call(compiler: &mut Compiler<'_>, call: &CallTerm) -> Result<(), Error> {
    let Some(arity) = compiler.function_arity(&call.name) else {
        return Err(Error::new(
            ErrorImpl::FunctionNotDeclared {
                function: call.name.clone(),
            },
            call.position.clone(),
        ));
    };

    let received = call.arguments.len();
    if received > arity {
        return Err(Error::new(
            ErrorImpl::UnexpectedArguments {
                function: call.name.clone(),
                expected: arity,
                received,
            },
            call.position.clone(),
        ));
    } else if received < arity {
        return Err(Error::new(
            ErrorImpl::MissingArguments {
                function: call.name.clone(),
                expected: arity,
                received,
            },
            call.position.clone(),
        ));
    }

    let frame = compiler.snapshot_frame();

    for argument in call.arguments.iter() {
        gen_expression(compiler, *argument)?;
    }

    compiler.emit(&format!("call {}", function_label(&call.name)));
    compiler.discard(received);
    compiler.restore_frame(frame);

    compiler.push("rax");

    Ok(())
}

fn gen_binary_expr(compiler: &mut Compiler<'_>, binary: &BinaryExpr) -> Result<(), Error> {
    gen_expression(compiler, binary.lhs)?;
    gen_expression(compiler, binary.rhs)?;

    match binary.op {
        BinaryOp::Add => {
            compiler.pop("rax");
            compiler.pop("rbx");
            compiler.emit("add rax, rbx");
            compiler.push("rax");
        }
        BinaryOp::Mul => {
            compiler.pop("rax");
            compiler.pop("rbx");
            compiler.emit("imul rax, rbx");
            compiler.push("rax");
        }
        BinaryOp::Sub => {
            compiler.pop("rbx"); // subtrahend
            compiler.pop("rax");
            compiler.emit("sub rax, rbx");
            compiler.push("rax");
        }
        BinaryOp::Div | BinaryOp::Rem => {
            compiler.pop("rbx"); // divisor
            compiler.pop("rax");
            compiler.emit("cqo");
            compiler.emit("idiv rbx");
            compiler.push(if binary.op == BinaryOp::Div { "rax" } else { "rdx" });
        }
        BinaryOp::Pow => gen_power(compiler),
        BinaryOp::Equals => gen_comparison(compiler, "jne"),
        BinaryOp::Greater => gen_comparison(compiler, "jle"),
        BinaryOp::GreaterEquals => gen_comparison(compiler, "jl"),
        BinaryOp::Less => gen_comparison(compiler, "jge"),
        BinaryOp::LessEquals => gen_comparison(compiler, "jg"),
        BinaryOp::And => {
            let id = compiler.next_label_id();
            compiler.pop("rbx");
            compiler.pop("rax");
            compiler.emit("test rax, rax");
            compiler.emit(&format!("jz cmp_false_{}", id));
            compiler.emit("test rbx, rbx");
            compiler.emit(&format!("jz cmp_false_{}", id));
            gen_boolean(compiler, id);
        }
        BinaryOp::Or => {
            let id = compiler.next_label_id();
            compiler.pop("rbx");
            compiler.pop("rax");
            compiler.emit("or rax, rbx");
            compiler.emit(&format!("jz cmp_false_{}", id));
            gen_boolean(compiler, id);
        }
    }

    Ok(())
}

/// Base to the power of a non-negative exponent by repeated multiplication.
/// An exponent of zero or below yields 1.
fn gen_power(compiler: &mut Compiler<'_>) {
    let id = compiler.next_label_id();

    compiler.pop("rcx"); // exponent
    compiler.pop("rbx"); // base
    compiler.emit("mov rax, 1");
    compiler.emit("test rcx, rcx");
    compiler.emit(&format!("jle pow_end_{}", id));
    compiler.label(&format!("pow_loop_{}", id));
    compiler.emit("imul rax, rbx");
    compiler.emit("dec rcx");
    compiler.emit(&format!("jnz pow_loop_{}", id));
    compiler.label(&format!("pow_end_{}", id));
    compiler.push("rax");
}

/// `jump_if_false` is the conditional jump taken when `lhs <op> rhs` does
/// not hold after `cmp lhs, rhs`.
fn gen_comparison(compiler: &mut Compiler<'_>, jump_if_false: &str) {
    let id = compiler.next_label_id();

    compiler.pop("rbx"); // rhs
    compiler.pop("rax"); // lhs
    compiler.emit("cmp rax, rbx");
    compiler.emit(&format!("{} cmp_false_{}", jump_if_false, id));
    gen_boolean(compiler, id);
}

/// Materialises 1 on the fall-through path and 0 at `cmp_false_<id>`.
/// Only one of the two pushes runs, so the height grows by one cell.
fn gen_boolean(compiler: &mut Compiler<'_>, id: usize) {
    compiler.push("1");
    compiler.emit(&format!("jmp cmp_end_{}", id));
    compiler.label(&format!("cmp_false_{}", id));
    compiler.emit("push 0");
    compiler.label(&format!("cmp_end_{}", id));
}
