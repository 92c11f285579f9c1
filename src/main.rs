use std::{env, fs::read_to_string, path::Path, process::ExitCode, rc::Rc, time::Instant};

use anyhow::{Context, Result};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use zen::{
    compiler::compiler::generate,
    display_error,
    errors::errors::Error,
    lexer::lexer::tokenize,
    parser::parser::parse,
    toolchain::{build, BuildConfig},
};

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Incorrect usage. Correct usage is...");
        eprintln!("zen <input.zen>");
        return ExitCode::FAILURE;
    }

    match run(Path::new(&args[1])) {
        Ok(code) => code,
        Err(err) => {
            error!("{:#}", err);
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

/// Source errors are rendered against the source text and end the run with
/// a failure status; everything else is reported by `main`.
fn run(file_path: &Path) -> Result<ExitCode> {
    let start = Instant::now();

    let source = read_to_string(file_path)
        .with_context(|| format!("failed to read `{}`", file_path.display()))?;
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file_path.display().to_string());

    let assembly = match compile_source(&source, &file_name) {
        Ok(assembly) => assembly,
        Err(err) => {
            display_error(&err, file_path, &source);
            return Ok(ExitCode::FAILURE);
        }
    };

    debug!("Generated assembly in {:?}", start.elapsed());

    let config = BuildConfig::from_env();
    build(&assembly, &config)?;

    info!(
        executable = %config.exe_path.display(),
        "Total time: {:?}",
        start.elapsed()
    );

    Ok(ExitCode::SUCCESS)
}

fn compile_source(source: &str, file_name: &str) -> Result<String, Error> {
    let lex_start = Instant::now();
    let tokens = tokenize(source.to_string(), Some(file_name.to_string()))?;
    debug!(tokens = tokens.len(), "Tokenized in {:?}", lex_start.elapsed());

    let parse_start = Instant::now();
    let (parser, program) = parse(tokens, Rc::new(file_name.to_string()));
    let program = program?;
    debug!(
        statements = program.stmts.len(),
        functions = program.functions.len(),
        nodes = parser.ast().len(),
        "Parsed in {:?}",
        parse_start.elapsed()
    );

    let generate_start = Instant::now();
    let assembly = generate(&program, parser.ast())?;
    debug!("Compiled in {:?}", generate_start.elapsed());

    Ok(assembly)
}
