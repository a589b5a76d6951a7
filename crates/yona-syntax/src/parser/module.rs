//! Module-file grammar (spec §3.4): header, records, signatures, functions.

use yona_ast::{FqnExpr, ModuleAst, RecordDecl};
use yona_common::{ParseError, Span};

use super::expr::parse_function_tail;
use super::type_expr::parse_type_signature;
use super::Parser;
use crate::token::TokenKind;

fn ctx(p: &Parser, span: Span) -> yona_common::SourceContext {
    yona_common::SourceContext::new(p.filename(), span)
}

pub(crate) fn parse_module(p: &mut Parser) -> Result<ModuleAst, ParseError> {
    let start = p.span();
    p.expect(TokenKind::Module, "`module`")?;
    let fqn = parse_fqn(p)?;
    let mut exports = Vec::new();
    if p.eat(&TokenKind::Exports) {
        exports.push(p.expect_ident("an exported name")?.0);
        while p.eat(&TokenKind::Comma) {
            exports.push(p.expect_ident("an exported name")?.0);
        }
    }

    let mut module = ModuleAst::new(fqn, ctx(p, start));
    module.exports = exports;

    while !p.at_eof() {
        if p.eat(&TokenKind::Record) {
            module.records.push(parse_record_decl(p)?);
            continue;
        }
        let (name, name_span) = p.expect_ident("a record or function name")?;
        if p.eat(&TokenKind::Colon) {
            let signature = parse_type_signature(p)?;
            module.declarations.push(yona_ast::FunctionDecl { name, signature, context: ctx(p, name_span) });
            continue;
        }
        let function = parse_function_tail(p, Some(name), name_span)?;
        module.functions.push(function);
    }

    let end = p.prev_span();
    module.context = ctx(p, start.merge(end));
    Ok(module)
}

fn parse_fqn(p: &mut Parser) -> Result<FqnExpr, ParseError> {
    let (first, _) = p.expect_ident("a module path")?;
    let mut segments = vec![first];
    while p.eat(&TokenKind::Backslash) {
        segments.push(p.expect_ident("a path segment")?.0);
    }
    let module = segments.pop().unwrap();
    Ok(FqnExpr::new(segments, module))
}

fn parse_record_decl(p: &mut Parser) -> Result<RecordDecl, ParseError> {
    let start = p.prev_span();
    let (name, _) = p.expect_ident("a record name")?;
    p.expect(TokenKind::Eq, "`=`")?;
    p.expect(TokenKind::LBrace, "`{`")?;
    let mut fields = Vec::new();
    if !p.check(&TokenKind::RBrace) {
        fields.push(p.expect_ident("a field name")?.0);
        while p.eat(&TokenKind::Comma) {
            fields.push(p.expect_ident("a field name")?.0);
        }
    }
    p.expect(TokenKind::RBrace, "`}`")?;
    let span = start.merge(p.prev_span());
    Ok(RecordDecl { name, fields, context: ctx(p, span) })
}
