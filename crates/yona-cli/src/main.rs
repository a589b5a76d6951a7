//! The `yona` command-line driver: a thin wrapper over `yona-syntax` /
//! `yona-typeck` / `yona-runtime` (spec §6.6). Grounded on `meshc`'s
//! subcommand/diagnostics-reporting shape and `mesh-repl`'s session-based
//! interactive loop, without the LLVM/JIT layer neither exists for here.

mod repl;
mod session;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use yona_common::{diagnostics, SourceContext};
use yona_runtime::{interp, Interpreter, Value};

#[derive(Parser)]
#[command(name = "yona", version, about = "The Yona language driver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, evaluate, and (if exported) call `main` in a module file
    Run {
        file: PathBuf,
        #[arg(long = "module-path", value_name = "DIR")]
        module_path: Vec<PathBuf>,
    },
    /// Parse and type-check a module file without evaluating it
    Check { file: PathBuf },
    /// Start an interactive read-eval-print loop
    Repl {
        #[arg(long = "module-path", value_name = "DIR")]
        module_path: Vec<PathBuf>,
    },
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();
    match cli.command {
        Commands::Run { file, module_path } => run(&file, module_path),
        Commands::Check { file } => check(&file),
        Commands::Repl { module_path } => repl::run(module_paths(module_path)),
    }
}

fn module_paths(extra: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut paths = yona_runtime::default_module_paths();
    paths.extend(extra);
    paths
}

fn run(file: &PathBuf, module_path: Vec<PathBuf>) -> ExitCode {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {e}", file.display());
            return ExitCode::FAILURE;
        }
    };
    let filename = file.to_string_lossy().to_string();

    let module_ast = match yona_syntax::parse_module(&source, &filename) {
        Ok(m) => m,
        Err(errors) => {
            report_parse_errors(&filename, &source, &errors);
            return ExitCode::FAILURE;
        }
    };

    let mut interp = Interpreter::new(module_paths(module_path));
    let module = match interp.eval_module(&module_ast) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let Some(Value::Function(main_fn)) = module.exports.get("main").cloned() else {
        log::debug!("module '{}' has no 0-arity `main` export; nothing to run", module_ast.fqn);
        return ExitCode::SUCCESS;
    };
    if main_fn.arity != 0 {
        eprintln!("error: `main` must take no arguments, found arity {}", main_fn.arity);
        return ExitCode::FAILURE;
    }

    match interp::apply(&mut interp, &main_fn, Vec::new(), &SourceContext::synthetic()) {
        Ok(value) => {
            if !matches!(value, Value::Unit) {
                println!("{value}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            if let Some(pending) = interp.exception.peek() {
                eprintln!("uncaught exception: {}", pending.value);
                interp.exception.clear();
            } else {
                eprintln!("error: {e}");
            }
            ExitCode::FAILURE
        }
    }
}

fn check(file: &PathBuf) -> ExitCode {
    let source = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("error: could not read '{}': {e}", file.display());
            return ExitCode::FAILURE;
        }
    };
    let filename = file.to_string_lossy().to_string();

    let module_ast = match yona_syntax::parse_module(&source, &filename) {
        Ok(m) => m,
        Err(errors) => {
            report_parse_errors(&filename, &source, &errors);
            return ExitCode::FAILURE;
        }
    };

    let mut inferencer = yona_typeck::TypeInferencer::new();
    for record in &module_ast.records {
        let fields = record.fields.iter().map(|f| (f.clone(), inferencer.fresh_var())).collect();
        inferencer.records.register(yona_typeck::RecordInfo { name: record.name.clone(), fields });
    }
    let root = yona_typeck::TypeFrame::root();
    for function in &module_ast.functions {
        let frame = yona_typeck::TypeFrame::push(&root);
        for pattern in &function.patterns {
            for name in pattern.bound_names() {
                let var = inferencer.fresh_var();
                yona_typeck::TypeFrame::bind(&frame, name, yona_types::Scheme::mono(var));
            }
        }
        for body in &function.bodies {
            match body {
                yona_ast::FunctionBody::WithoutGuard(expr) => {
                    inferencer.infer(expr, &frame);
                }
                yona_ast::FunctionBody::WithGuard { guard, body } => {
                    inferencer.infer(guard, &frame);
                    inferencer.infer(body, &frame);
                }
            }
        }
    }

    if inferencer.has_errors() {
        for error in &inferencer.errors {
            eprintln!("{}", diagnostics::render(&filename, &source, error.span, "error", &error.message));
        }
        return ExitCode::FAILURE;
    }

    println!("{}: no errors", module_ast.fqn);
    ExitCode::SUCCESS
}

fn report_parse_errors(filename: &str, source: &str, errors: &[yona_common::ParseError]) {
    for error in errors {
        eprintln!("{}", diagnostics::render(filename, source, error.span, "error", &error.message));
    }
}
