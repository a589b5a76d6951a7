//! Uniform rendering of parse errors, type errors, and runtime exceptions
//! into a human-readable snippet: source line, caret span, message.
//!
//! Grounded on the same shape as the teacher's `mesh-typeck::diagnostics`
//! module (source excerpt + labeled span + message), kept dependency-free
//! since the teacher's own renderer was hand-rolled text rather than a
//! pulled-in pretty-printing crate.

use crate::span::{LineIndex, Span};

/// Render one diagnostic against `source`/`filename`.
///
/// ```text
/// error: type mismatch: expected Int, found String
///   --> main.yona:3:9
///   |
/// 3 | let x = 1 + "a"
///   |         ^^^^^^^
/// ```
pub fn render(filename: &str, source: &str, span: Span, severity: &str, message: &str) -> String {
    let idx = LineIndex::new(source);
    let (line, col) = idx.line_col(span.start);
    let line_text = idx.line_text(source, span.start);
    let width = span.len().max(1) as usize;
    let caret_pad = " ".repeat(col.saturating_sub(1) as usize);
    let carets = "^".repeat(width.min(line_text.len().saturating_sub(col as usize - 1).max(1)));
    format!(
        "{severity}: {message}\n  --> {filename}:{line}:{col}\n  |\n{line} | {line_text}\n  | {caret_pad}{carets}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_single_line_snippet() {
        let src = "let x = 1 + \"a\"";
        let out = render("main.yona", src, Span::new(8, 15), "error", "type mismatch");
        assert!(out.contains("error: type mismatch"));
        assert!(out.contains("main.yona:1:9"));
        assert!(out.contains(src));
    }
}
