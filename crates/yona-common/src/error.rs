use std::fmt;

use serde::Serialize;

use crate::span::{SourceContext, Span};

/// A lexer error with location information.
///
/// Errors are collected during lexing rather than aborting immediately,
/// enabling error recovery and reporting multiple issues at once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        Self { kind, span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum LexErrorKind {
    UnexpectedCharacter(char),
    UnterminatedString,
    InvalidEscapeSequence(char),
    InvalidNumberLiteral(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedCharacter(c) => write!(f, "unexpected character: {c:?}"),
            Self::UnterminatedString => write!(f, "unterminated string literal"),
            Self::InvalidEscapeSequence(c) => write!(f, "invalid escape sequence: \\{c}"),
            Self::InvalidNumberLiteral(s) => write!(f, "invalid number literal: {s}"),
        }
    }
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl std::error::Error for LexError {}

/// A parse error, produced by the external parser (`yona-syntax`) and
/// treated as opaque by the core (spec §6.1): the core only reports it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub message: String,
    pub span: Span,
    pub expected: Option<String>,
    pub actual: Option<String>,
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self { kind, message: message.into(), span, expected: None, actual: None }
    }

    pub fn with_tokens(mut self, expected: impl Into<String>, actual: impl Into<String>) -> Self {
        self.expected = Some(expected.into());
        self.actual = Some(actual.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseErrorKind {
    UnexpectedToken,
    MissingToken,
    InvalidSyntax,
    InvalidPattern,
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::UnexpectedToken => "unexpected token",
            Self::MissingToken => "missing token",
            Self::InvalidSyntax => "invalid syntax",
            Self::InvalidPattern => "invalid pattern",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for ParseError {}

/// A single type error accumulated by the inferencer (spec §4.5, §7 tier 2).
/// Errors never abort inference; they accumulate in `TypeInferencer::errors`
/// and the driver decides whether to proceed by calling `has_errors()`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeError {
    pub kind: TypeErrorKind,
    pub message: String,
    pub span: Span,
}

impl TypeError {
    pub fn new(kind: TypeErrorKind, message: impl Into<String>, span: Span) -> Self {
        Self { kind, message: message.into(), span }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum TypeErrorKind {
    Undefined,
    Mismatch,
    Arity,
    MissingField,
    UnknownField,
    UnknownConstructor,
    Occurs,
}

impl fmt::Display for TypeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Undefined => "undefined",
            Self::Mismatch => "type mismatch",
            Self::Arity => "arity mismatch",
            Self::MissingField => "missing field",
            Self::UnknownField => "unknown field",
            Self::UnknownConstructor => "unknown constructor",
            Self::Occurs => "infinite type",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for TypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl std::error::Error for TypeError {}

/// The conventional exception symbols the interpreter raises at well-known
/// failure points (spec §6.5). Consumer code (e.g. a user `try`/`catch`)
/// pattern-matches on these by their string form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RuntimeErrorKind {
    NoMatch,
    TypeError,
    UndefinedVariable,
    FunctionNotFound,
    ModuleNotFound,
    FieldNotFound,
    GuardFailed,
    Runtime,
}

impl RuntimeErrorKind {
    /// The symbol name used as the first element of a raised exception tuple.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::NoMatch => "nomatch",
            Self::TypeError => "type_error",
            Self::UndefinedVariable => "undefined_variable",
            Self::FunctionNotFound => "function_not_found",
            Self::ModuleNotFound => "module_not_found",
            Self::FieldNotFound => "field_not_found",
            Self::GuardFailed => "guard_failed",
            Self::Runtime => "runtime",
        }
    }
}

impl fmt::Display for RuntimeErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.symbol())
    }
}

/// A fatal host error (spec §4.9): module file unreadable, unknown AST
/// variant reached, or another condition the interpreter cannot recover
/// from via the exception slot. These abort the current evaluation instead
/// of being caught by user `try`/`catch`.
#[derive(Debug, Clone, PartialEq)]
pub struct HostError {
    pub message: String,
    pub context: Option<SourceContext>,
}

impl HostError {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into(), context: None }
    }

    pub fn at(message: impl Into<String>, context: SourceContext) -> Self {
        Self { message: message.into(), context: Some(context) }
    }
}

impl fmt::Display for HostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.context {
            Some(ctx) => write!(f, "{} (at {}:{}..{})", self.message, ctx.filename, ctx.span.start, ctx.span.end),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for HostError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_display() {
        let err = LexError::new(LexErrorKind::UnexpectedCharacter('@'), Span::new(0, 1));
        assert_eq!(err.to_string(), "unexpected character: '@'");
    }

    #[test]
    fn parse_error_display() {
        let err = ParseError::new(ParseErrorKind::UnexpectedToken, "found `)`", Span::new(0, 1));
        assert_eq!(err.to_string(), "unexpected token: found `)`");
    }

    #[test]
    fn runtime_error_symbol() {
        assert_eq!(RuntimeErrorKind::NoMatch.symbol(), "nomatch");
        assert_eq!(RuntimeErrorKind::NoMatch.to_string(), ":nomatch");
    }

    #[test]
    fn type_error_kind_display_all_variants() {
        assert_eq!(TypeErrorKind::Undefined.to_string(), "undefined");
        assert_eq!(TypeErrorKind::Mismatch.to_string(), "type mismatch");
        assert_eq!(TypeErrorKind::Arity.to_string(), "arity mismatch");
        assert_eq!(TypeErrorKind::MissingField.to_string(), "missing field");
        assert_eq!(TypeErrorKind::Occurs.to_string(), "infinite type");
    }
}
