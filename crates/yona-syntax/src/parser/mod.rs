//! Recursive-descent parser driving the `yona_ast` builders. Grounded on
//! the teacher's `mesh-parser` control-flow idioms (peek/advance/expect,
//! one token of lookahead, explicit per-construct methods) but building
//! `yona_ast` nodes directly instead of a rowan CST.

mod expr;
mod module;
mod pattern;
mod type_expr;

use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use yona_common::{ParseError, ParseErrorKind, Span};

pub(crate) struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    filename: String,
    pub(crate) errors: Vec<ParseError>,
}

impl Parser {
    pub(crate) fn new(source: &str, filename: &str) -> Self {
        let (tokens, lex_errors) = Lexer::tokenize(source);
        let errors = lex_errors
            .into_iter()
            .map(|e| ParseError::new(ParseErrorKind::InvalidSyntax, e.to_string(), e.span))
            .collect();
        Self { tokens, pos: 0, filename: filename.to_string(), errors }
    }

    pub(crate) fn filename(&self) -> &str {
        &self.filename
    }

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    pub(crate) fn peek(&self) -> &TokenKind {
        &self.current().kind
    }

    pub(crate) fn span(&self) -> Span {
        self.current().span
    }

    /// Span of the token most recently consumed by `advance`; used to close
    /// off a construct's span right after its terminating token.
    pub(crate) fn prev_span(&self) -> Span {
        self.tokens[self.pos.saturating_sub(1)].span
    }

    pub(crate) fn at_eof(&self) -> bool {
        matches!(self.peek(), TokenKind::Eof)
    }

    pub(crate) fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        tok
    }

    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(kind)
    }

    pub(crate) fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<Token, ParseError> {
        if self.check(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(what))
        }
    }

    pub(crate) fn expect_ident(&mut self, what: &str) -> Result<(String, Span), ParseError> {
        match self.peek().clone() {
            TokenKind::Ident(name) => {
                let span = self.span();
                self.advance();
                Ok((name, span))
            }
            _ => Err(self.unexpected(what)),
        }
    }

    pub(crate) fn unexpected(&self, expected: &str) -> ParseError {
        ParseError::new(ParseErrorKind::UnexpectedToken, format!("expected {expected}"), self.span())
            .with_tokens(expected, format!("{:?}", self.peek()))
    }

    pub(crate) fn mark(&self) -> usize {
        self.pos
    }

    pub(crate) fn reset(&mut self, mark: usize) {
        self.pos = mark;
    }
}

/// Parses a full module file.
pub fn parse_module(source: &str, filename: &str) -> Result<yona_ast::ModuleAst, Vec<ParseError>> {
    let mut parser = Parser::new(source, filename);
    match module::parse_module(&mut parser) {
        Ok(m) if parser.errors.is_empty() => Ok(m),
        Ok(_) => Err(parser.errors),
        Err(e) => {
            parser.errors.push(e);
            Err(parser.errors)
        }
    }
}

/// Parses a single standalone expression (used by a REPL, spec §6.1).
pub fn parse_expression(source: &str, filename: &str) -> Result<yona_ast::Expr, Vec<ParseError>> {
    let mut parser = Parser::new(source, filename);
    let result = expr::parse_expr(&mut parser).and_then(|e| {
        parser.expect(TokenKind::Eof, "end of input")?;
        Ok(e)
    });
    match result {
        Ok(e) if parser.errors.is_empty() => Ok(e),
        Ok(_) => Err(parser.errors),
        Err(e) => {
            parser.errors.push(e);
            Err(parser.errors)
        }
    }
}
