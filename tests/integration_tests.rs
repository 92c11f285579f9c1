//! Integration tests for end-to-end compilation.
//!
//! These tests verify that the complete compilation pipeline works correctly
//! from source code through tokenization, parsing and assembly generation.
//! Tests that execute the produced binary only run when `nasm` and `ld` are
//! available.

use std::{fs, path::PathBuf, process::Command, rc::Rc};

use zen::{
    compiler::compiler::{generate, Compiler},
    errors::errors::{Error, ErrorImpl},
    lexer::lexer::tokenize,
    line_of,
    parser::parser::parse,
    toolchain::{build, BuildConfig},
};

fn compile(source: &str) -> Result<String, Error> {
    let tokens = tokenize(source.to_string(), Some("test.zen".to_string()))?;
    let (parser, program) = parse(tokens, Rc::new("test.zen".to_string()));
    let program = program?;

    generate(&program, parser.ast())
}

/// Compiles, assembles, links and runs `source`, returning its exit status.
/// `None` when the toolchain is not installed.
fn run(name: &str, source: &str) -> Option<i32> {
    let config = BuildConfig::default();
    if !config.tools_available() {
        eprintln!("skipping {}: nasm or ld not found", name);
        return None;
    }

    let dir: PathBuf = std::env::temp_dir().join(format!("zen_{}_{}", name, std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    let config = config.in_dir(&dir);

    let assembly = compile(source).unwrap();
    build(&assembly, &config).unwrap();

    let status = Command::new(&config.exe_path).status().unwrap();
    fs::remove_dir_all(&dir).ok();

    status.code()
}

#[test]
fn test_compile_is_deterministic() {
    let source = "function fib [n] {
                      if n < 2 { return n; }
                      return fib[n - 1] + fib[n - 2];
                  }
                  let total = 0;
                  rep 5 { total += fib[total % 7]; }
                  exit total;";

    let first = compile(source).unwrap();
    let second = compile(source).unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_stack_balance_across_constructs() {
    let source = "function f [a, b] {
                      let c = a * b;
                      if c > 10 { let d = c - 10; return d; } else { c --; }
                      rep a { let e = 1; c += e; }
                      return c;
                  }
                  let x = f[2, 3];
                  { let y = x ^ 2; x = y % 5; }
                  rep x { let w = x; w --; }";

    let tokens = tokenize(source.to_string(), None).unwrap();
    let (parser, program) = parse(tokens, Rc::new("shell".to_string()));
    let program = program.unwrap();

    let mut compiler = Compiler::new(parser.ast());
    compiler.compile(&program).unwrap();

    // only the top-level `x` remains
    assert_eq!(compiler.stack_size(), 1);
}

#[test]
fn test_scoping_error_is_reported_with_line() {
    let source = "let x = 1;\nif x == 1 {\n    let y = 2;\n}\nexit y;\n";
    let error = compile(source).unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::VariableNotDeclared {
            variable: "y".to_string()
        }
    );
    assert_eq!(line_of(&error, source), 5);
}

#[test]
fn test_arity_errors_name_function_and_counts() {
    let declaration = "function add [a, b] { return a + b; }\n";

    let error = compile(&format!("{}exit add[1];", declaration)).unwrap_err();
    assert_eq!(
        error.to_string(),
        "invalid parameters passed to \"add\": required 2, found 1"
    );

    let error = compile(&format!("{}exit add[1, 2, 3];", declaration)).unwrap_err();
    assert_eq!(
        error.to_string(),
        "invalid parameters passed to \"add\": required 2, found 3"
    );
}

#[test]
fn test_lexical_error() {
    let error = compile("let x = 1 # 2;").unwrap_err();

    assert_eq!(
        error.get_error_impl(),
        &ErrorImpl::UnrecognisedToken {
            token: "#".to_string()
        }
    );
}

#[test]
fn test_function_call_exit_status() {
    let source = "function add [a, b] { return a + b; } exit add[2, 3];";

    if let Some(code) = run("call", source) {
        assert_eq!(code, 5);
    }
}

#[test]
fn test_function_isolation_exit_status() {
    let source = "function shadow [a] { let b = a * 10; return b; }
                  let a = 3;
                  let b = 4;
                  let c = shadow[b];
                  exit a + b + c;";

    if let Some(code) = run("isolation", source) {
        assert_eq!(code, 47);
    }
}

#[test]
fn test_boolean_materialisation_exit_status() {
    if let Some(code) = run("greater", "let x = 5 > 3; exit x;") {
        assert_eq!(code, 1);
    }
    if let Some(code) = run("less", "let x = 5 < 3; exit x;") {
        assert_eq!(code, 0);
    }
}

#[test]
fn test_rep_exit_status() {
    if let Some(code) = run("rep", "let x = 0; rep 3 { x ++; } exit x;") {
        assert_eq!(code, 3);
    }
}

#[test]
fn test_precedence_exit_status() {
    if let Some(code) = run("mul", "exit 1 + 2 * 3;") {
        assert_eq!(code, 7);
    }
    if let Some(code) = run("pow", "exit 2 ^ 3 + 1;") {
        assert_eq!(code, 9);
    }
    if let Some(code) = run("logical", "if 1 == 1 && 0 == 0 { exit 1; } exit 0;") {
        assert_eq!(code, 1);
    }
}

#[test]
fn test_power_of_zero_exit_status() {
    if let Some(code) = run("pow_zero", "exit 7 ^ 0;") {
        assert_eq!(code, 1);
    }
}

#[test]
fn test_signed_division_exit_status() {
    if let Some(code) = run("div", "let a = 0 - 7; exit (a / 2) + 10;") {
        assert_eq!(code, 7);
    }
}

#[test]
fn test_recursion_exit_status() {
    let source = "function fact [n] {
                      if n <= 1 { return 1; }
                      return n * fact[n - 1];
                  }
                  exit fact[5];";

    if let Some(code) = run("fact", source) {
        assert_eq!(code, 120);
    }
}

#[test]
fn test_nested_rep_exit_status() {
    let source = "let x = 0; rep 3 { rep 4 { x += 2 ^ 1; } } exit x;";

    if let Some(code) = run("nested_rep", source) {
        assert_eq!(code, 24);
    }
}
