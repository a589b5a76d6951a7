//! Type-signature grammar (spec §3.1 "Functions"): `name : Int -> Bool`.
//! Purely advisory -- the interpreter never consults `FunctionDecl`.

use yona_ast::{BuiltinTypeKind, TypeExpr, TypeExprKind};
use yona_common::Span;

use super::Parser;
use crate::token::TokenKind;

fn ctx(p: &Parser, span: Span) -> yona_common::SourceContext {
    yona_common::SourceContext::new(p.filename(), span)
}

fn builtin_from_name(name: &str) -> Option<BuiltinTypeKind> {
    use BuiltinTypeKind::*;
    Some(match name {
        "Bool" => Bool,
        "Byte" => Byte,
        "Int16" => Int16,
        "Int32" => Int32,
        "Int" | "Int64" => Int64,
        "Int128" => Int128,
        "UInt16" => UInt16,
        "UInt32" => UInt32,
        "UInt64" => UInt64,
        "UInt128" => UInt128,
        "Float32" => Float32,
        "Float" | "Float64" => Float64,
        "Float128" => Float128,
        "Char" => Char,
        "String" => StringT,
        "Symbol" => Symbol,
        "Unit" => Unit,
        "Var" => Var,
        _ => return None,
    })
}

/// Parses a full `->`-chained signature.
pub(crate) fn parse_type_signature(p: &mut Parser) -> Result<TypeExpr, yona_common::ParseError> {
    let start = p.span();
    let mut parts = vec![parse_type_atom(p)?];
    while p.eat(&TokenKind::Arrow) {
        parts.push(parse_type_atom(p)?);
    }
    if parts.len() == 1 {
        return Ok(parts.into_iter().next().unwrap());
    }
    let result = parts.pop().unwrap();
    let end = p.span();
    Ok(TypeExpr::new(TypeExprKind::Function { params: parts, result: Box::new(result) }, ctx(p, start.merge(end))))
}

fn parse_type_atom(p: &mut Parser) -> Result<TypeExpr, yona_common::ParseError> {
    let start = p.span();
    if p.eat(&TokenKind::LParen) {
        let inner = parse_type_signature(p)?;
        p.expect(TokenKind::RParen, "`)`")?;
        return Ok(inner);
    }
    let (name, _) = p.expect_ident("a type name")?;
    if p.eat(&TokenKind::LParen) {
        let mut args = Vec::new();
        if !p.check(&TokenKind::RParen) {
            loop {
                args.push(parse_type_signature(p)?);
                if !p.eat(&TokenKind::Comma) {
                    break;
                }
            }
        }
        p.expect(TokenKind::RParen, "`)`")?;
        let end = p.span();
        return Ok(TypeExpr::new(TypeExprKind::Instance { name, args }, ctx(p, start.merge(end))));
    }
    let end = p.span();
    match builtin_from_name(&name) {
        Some(builtin) => Ok(TypeExpr::new(TypeExprKind::Builtin(builtin), ctx(p, start.merge(end)))),
        None => Ok(TypeExpr::new(TypeExprKind::User(name), ctx(p, start.merge(end)))),
    }
}
