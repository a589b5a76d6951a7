//! REPL session state management.
//!
//! Tracks accumulated top-level `let` definitions across REPL interactions.
//! Each new line is either a definition (`let name = expr`, no `in`) that
//! gets remembered, or a plain expression that gets evaluated against every
//! definition seen so far by re-parsing the whole accumulated chain -- there
//! is no incremental compilation step to reuse, so each line is interpreted
//! fresh.

/// Persistent state for a REPL session.
pub struct ReplSession {
    /// Accumulated `let name = expr` definitions, oldest first.
    definitions: Vec<String>,
    eval_counter: u64,
}

impl ReplSession {
    pub fn new() -> Self {
        Self { definitions: Vec::new(), eval_counter: 0 }
    }

    /// Remembers a top-level definition for future inputs.
    pub fn add_definition(&mut self, source: &str) {
        self.definitions.push(source.trim().to_string());
    }

    /// Builds the full source for evaluating `expr` against every
    /// definition accumulated so far, and bumps the eval counter.
    pub fn wrap_expression(&mut self, expr: &str) -> String {
        self.eval_counter += 1;
        if self.definitions.is_empty() {
            return expr.to_string();
        }
        format!("{} in {}", self.definitions.join(" in "), expr)
    }

    pub fn eval_counter(&self) -> u64 {
        self.eval_counter
    }

    pub fn reset(&mut self) {
        self.definitions.clear();
        self.eval_counter = 0;
    }
}

impl Default for ReplSession {
    fn default() -> Self {
        Self::new()
    }
}

/// A line is a definition to remember rather than an expression to
/// evaluate immediately when it starts with `let` and has no top-level
/// `in` -- i.e. it would not parse as a standalone expression.
pub fn is_definition(trimmed: &str) -> bool {
    trimmed.starts_with("let ") && !trimmed.contains(" in ") && !trimmed.ends_with(" in")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_wraps_bare_expression_unchanged() {
        let mut session = ReplSession::new();
        assert_eq!(session.wrap_expression("1 + 2"), "1 + 2");
        assert_eq!(session.eval_counter(), 1);
    }

    #[test]
    fn accumulates_definitions_in_order() {
        let mut session = ReplSession::new();
        session.add_definition("let x = 5");
        session.add_definition("let y = 10");
        assert_eq!(session.wrap_expression("x + y"), "let x = 5 in let y = 10 in x + y");
    }

    #[test]
    fn reset_clears_everything() {
        let mut session = ReplSession::new();
        session.add_definition("let x = 1");
        let _ = session.wrap_expression("x");
        session.reset();
        assert_eq!(session.eval_counter(), 0);
        assert_eq!(session.wrap_expression("1"), "1");
    }

    #[test]
    fn recognizes_definitions_vs_expressions() {
        assert!(is_definition("let x = 5"));
        assert!(!is_definition("let x = 5 in x"));
        assert!(!is_definition("1 + 2"));
    }
}
