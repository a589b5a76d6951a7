//! Interactive read-eval-print loop. Grounded on `mesh-repl`'s line-editing
//! shape (`rustyline`, history, `Ctrl-D`/`Ctrl-C` handling) with the
//! JIT-compile-and-call step replaced by direct tree-walking evaluation,
//! since there is no codegen backend here.

use std::path::PathBuf;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use yona_runtime::{Frame, Interpreter};

use crate::session::{is_definition, ReplSession};

const PROMPT: &str = "yona> ";

pub fn run(module_paths: Vec<PathBuf>) -> std::process::ExitCode {
    println!("yona repl -- Ctrl-D to exit");
    let mut interp = Interpreter::new(module_paths);
    let mut session = ReplSession::new();
    let mut editor = match DefaultEditor::new() {
        Ok(e) => e,
        Err(e) => {
            eprintln!("error: could not start line editor: {e}");
            return std::process::ExitCode::FAILURE;
        }
    };

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = editor.add_history_entry(trimmed);
                if trimmed == ":reset" {
                    session.reset();
                    continue;
                }
                if is_definition(trimmed) {
                    session.add_definition(trimmed);
                    continue;
                }
                eval_line(&mut interp, &mut session, trimmed);
            }
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("error: {e}");
                break;
            }
        }
    }
    std::process::ExitCode::SUCCESS
}

fn eval_line(interp: &mut Interpreter, session: &mut ReplSession, input: &str) {
    let source = session.wrap_expression(input);
    let filename = format!("<repl:{}>", session.eval_counter());

    let expr = match yona_syntax::parse_expression(&source, &filename) {
        Ok(expr) => expr,
        Err(errors) => {
            for error in errors {
                eprintln!("{}", yona_common::diagnostics::render(&filename, &source, error.span, "error", &error.message));
            }
            return;
        }
    };

    let frame = Frame::root();
    match interp.eval(&expr, &frame) {
        Ok(value) => println!("{value}"),
        Err(e) => {
            if let Some(pending) = interp.exception.peek() {
                eprintln!("uncaught exception: {}", pending.value);
                interp.exception.clear();
            } else {
                eprintln!("error: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_and_evaluates_a_plain_expression() {
        let mut interp = Interpreter::new(Vec::new());
        let mut session = ReplSession::new();
        session.add_definition("let x = 5");
        let source = session.wrap_expression("x + 1");
        let expr = yona_syntax::parse_expression(&source, "<test>").expect("parses");
        let frame = Frame::root();
        let value = interp.eval(&expr, &frame).expect("evaluates");
        assert_eq!(value.to_string(), "6");
    }
}
