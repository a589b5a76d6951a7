//! Pattern grammar (spec §3.1 "Patterns", §4.3).
//!
//! Sequence patterns use an explicit `...` marker on the tail sub-pattern so
//! head/tail position is never ambiguous: `[h1, h2 | ...tail]` is
//! `HeadTails`, `[...tail | h1, h2]` is `TailsHead`, and
//! `[h1 | ...tail | h2]` is `HeadTailsHead`.

use yona_ast::{Literal, Pattern, PatternKind, TailPattern};
use yona_common::{ParseError, Span};

use super::Parser;
use crate::token::TokenKind;

fn ctx(p: &Parser, span: Span) -> yona_common::SourceContext {
    yona_common::SourceContext::new(p.filename(), span)
}

/// Top-level pattern entry point: handles `|`-separated alternatives.
pub(crate) fn parse_pattern_top(p: &mut Parser) -> Result<Pattern, ParseError> {
    let start = p.span();
    let first = parse_pattern(p)?;
    if !p.check(&TokenKind::Pipe) {
        return Ok(first);
    }
    let mut alts = vec![first];
    while p.eat(&TokenKind::Pipe) {
        alts.push(parse_pattern(p)?);
    }
    let end = p.span();
    Ok(Pattern::new(PatternKind::Or(alts), ctx(p, start.merge(end))))
}

/// One pattern, possibly `@`-bound to a name.
pub(crate) fn parse_pattern(p: &mut Parser) -> Result<Pattern, ParseError> {
    let start = p.span();
    let atom = parse_pattern_atom(p)?;
    if p.eat(&TokenKind::At) {
        // `name @ pattern` binds the whole value to `name` while also
        // matching it against the finer-grained `pattern`.
        let inner = parse_pattern_atom(p)?;
        if let PatternKind::Identifier(name) = atom.kind {
            let end = p.span();
            return Ok(Pattern::new(PatternKind::As { name, inner: Box::new(inner) }, ctx(p, start.merge(end))));
        }
        return Err(p.unexpected("identifier before `@`"));
    }
    Ok(atom)
}

fn parse_pattern_atom(p: &mut Parser) -> Result<Pattern, ParseError> {
    let start = p.span();
    match p.peek().clone() {
        TokenKind::Ident(name) if name == "_" => {
            p.advance();
            Ok(Pattern::new(PatternKind::Underscore, ctx(p, start)))
        }
        TokenKind::Ident(name) => {
            p.advance();
            if name.chars().next().is_some_and(|c| c.is_uppercase()) && p.check(&TokenKind::LBrace) {
                parse_record_pattern(p, name, start)
            } else {
                Ok(Pattern::new(PatternKind::Identifier(name), ctx(p, start)))
            }
        }
        TokenKind::Int(n) => {
            p.advance();
            Ok(Pattern::new(PatternKind::Literal(Literal::Int(n)), ctx(p, start)))
        }
        TokenKind::Float(f) => {
            p.advance();
            Ok(Pattern::new(PatternKind::Literal(Literal::Float(f)), ctx(p, start)))
        }
        TokenKind::Byte(b) => {
            p.advance();
            Ok(Pattern::new(PatternKind::Literal(Literal::Byte(b)), ctx(p, start)))
        }
        TokenKind::CharLit(c) => {
            p.advance();
            Ok(Pattern::new(PatternKind::Literal(Literal::Char(c)), ctx(p, start)))
        }
        TokenKind::StringLit(s) => {
            p.advance();
            Ok(Pattern::new(PatternKind::Literal(Literal::String(s)), ctx(p, start)))
        }
        TokenKind::SymbolLit(s) => {
            p.advance();
            Ok(Pattern::new(PatternKind::Literal(Literal::Symbol(s)), ctx(p, start)))
        }
        TokenKind::True => {
            p.advance();
            Ok(Pattern::new(PatternKind::Literal(Literal::Bool(true)), ctx(p, start)))
        }
        TokenKind::False => {
            p.advance();
            Ok(Pattern::new(PatternKind::Literal(Literal::Bool(false)), ctx(p, start)))
        }
        TokenKind::LParen => {
            p.advance();
            if p.eat(&TokenKind::RParen) {
                return Ok(Pattern::new(PatternKind::Literal(Literal::Unit), ctx(p, start.merge(p.span()))));
            }
            let mut items = vec![parse_pattern_top(p)?];
            let mut is_tuple = false;
            while p.eat(&TokenKind::Comma) {
                is_tuple = true;
                items.push(parse_pattern_top(p)?);
            }
            p.expect(TokenKind::RParen, "`)`")?;
            let end = p.span();
            if is_tuple {
                Ok(Pattern::new(PatternKind::Tuple(items), ctx(p, start.merge(end))))
            } else {
                Ok(items.into_iter().next().unwrap())
            }
        }
        TokenKind::LBracket => parse_sequence_pattern(p, start),
        TokenKind::LBrace => parse_dict_pattern(p, start),
        _ => Err(p.unexpected("a pattern")),
    }
}

fn parse_tail_pattern(p: &mut Parser) -> Result<TailPattern, ParseError> {
    p.expect(TokenKind::Ellipsis, "`...`")?;
    match p.peek().clone() {
        TokenKind::Ident(name) if name == "_" => {
            p.advance();
            Ok(TailPattern::Underscore)
        }
        TokenKind::Ident(name) => {
            p.advance();
            Ok(TailPattern::Identifier(name))
        }
        TokenKind::StringLit(s) => {
            p.advance();
            Ok(TailPattern::Literal(Literal::String(s)))
        }
        _ => Err(p.unexpected("a tail binding after `...`")),
    }
}

fn is_tail_start(p: &Parser) -> bool {
    p.check(&TokenKind::Ellipsis)
}

fn parse_sequence_pattern(p: &mut Parser, start: Span) -> Result<Pattern, ParseError> {
    p.advance(); // `[`
    if p.eat(&TokenKind::RBracket) {
        return Ok(Pattern::new(PatternKind::Sequence(vec![]), ctx(p, start.merge(p.span()))));
    }

    if is_tail_start(p) {
        let tail = parse_tail_pattern(p)?;
        p.expect(TokenKind::Pipe, "`|`")?;
        let heads = parse_pattern_list_until_rbracket(p)?;
        p.expect(TokenKind::RBracket, "`]`")?;
        return Ok(Pattern::new(PatternKind::TailsHead { tail: Box::new(tail), heads }, ctx(p, start.merge(p.span()))));
    }

    let mut items = vec![parse_pattern_top(p)?];
    while p.eat(&TokenKind::Comma) {
        items.push(parse_pattern_top(p)?);
    }

    if p.eat(&TokenKind::Pipe) {
        if is_tail_start(p) {
            let tail = parse_tail_pattern(p)?;
            if p.eat(&TokenKind::Pipe) {
                let right = parse_pattern_list_until_rbracket(p)?;
                p.expect(TokenKind::RBracket, "`]`")?;
                return Ok(Pattern::new(
                    PatternKind::HeadTailsHead { left: items, tail: Box::new(tail), right },
                    ctx(p, start.merge(p.span())),
                ));
            }
            p.expect(TokenKind::RBracket, "`]`")?;
            return Ok(Pattern::new(PatternKind::HeadTails { heads: items, tail: Box::new(tail) }, ctx(p, start.merge(p.span()))));
        }
        return Err(p.unexpected("`...tail` after `|`"));
    }

    p.expect(TokenKind::RBracket, "`]`")?;
    Ok(Pattern::new(PatternKind::Sequence(items), ctx(p, start.merge(p.span()))))
}

fn parse_pattern_list_until_rbracket(p: &mut Parser) -> Result<Vec<Pattern>, ParseError> {
    let mut items = vec![parse_pattern_top(p)?];
    while p.eat(&TokenKind::Comma) {
        items.push(parse_pattern_top(p)?);
    }
    Ok(items)
}

fn parse_dict_pattern(p: &mut Parser, start: Span) -> Result<Pattern, ParseError> {
    p.advance(); // `{`
    let mut entries = Vec::new();
    if !p.check(&TokenKind::RBrace) {
        loop {
            let key = parse_pattern_top(p)?;
            p.expect(TokenKind::Colon, "`:`")?;
            let value = parse_pattern_top(p)?;
            entries.push((key, value));
            if !p.eat(&TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RBrace, "`}`")?;
    Ok(Pattern::new(PatternKind::Dict(entries), ctx(p, start.merge(p.span()))))
}

fn parse_record_pattern(p: &mut Parser, constructor: String, start: Span) -> Result<Pattern, ParseError> {
    p.advance(); // `{`
    let mut fields = Vec::new();
    if !p.check(&TokenKind::RBrace) {
        loop {
            let (name, _) = p.expect_ident("a field name")?;
            let pattern = if p.eat(&TokenKind::Eq) { parse_pattern_top(p)? } else { Pattern::new(PatternKind::Identifier(name.clone()), ctx(p, p.span())) };
            fields.push((name, pattern));
            if !p.eat(&TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RBrace, "`}`")?;
    Ok(Pattern::new(PatternKind::Record { constructor, fields }, ctx(p, start.merge(p.span()))))
}
