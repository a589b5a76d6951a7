//! Expression grammar: precedence-climbing binary operators over a
//! juxtaposition-style application layer (`f x y`, Haskell/ML-style,
//! grounded in the fact that nothing in `examples/original_source/`
//! dictates call syntax -- spec.md explicitly puts surface syntax out of
//! the core's scope).

use yona_ast::{
    Alias, AliasKind, CaseClause, CatchClause, Expr, ExprKind, FqnExpr, FunctionBody as AstFunctionBody, FunctionExpr, ImportClause, Literal, UnOp,
};
use yona_common::{ParseError, Span};

use super::pattern::{parse_pattern, parse_pattern_top};
use super::Parser;
use crate::token::TokenKind;

fn ctx(p: &Parser, span: Span) -> yona_common::SourceContext {
    yona_common::SourceContext::new(p.filename(), span)
}

pub(crate) fn parse_expr(p: &mut Parser) -> Result<Expr, ParseError> {
    parse_expr_bp(p, 0, true)
}

fn parse_expr_no_in(p: &mut Parser) -> Result<Expr, ParseError> {
    parse_expr_bp(p, 0, false)
}

fn binop_info(kind: &TokenKind, allow_in: bool) -> Option<(yona_ast::BinOp, u8, u8)> {
    use yona_ast::BinOp::*;
    use TokenKind as T;
    Some(match kind {
        T::PipeLeft => (PipeLeft, 2, 3),
        T::PipeRight => (PipeRight, 2, 3),
        T::PipePipe => (Or, 4, 5),
        T::AmpAmp => (And, 6, 7),
        T::Pipe => (BitOr, 8, 9),
        T::Caret => (BitXor, 10, 11),
        T::Amp => (BitAnd, 12, 13),
        T::EqEq => (Eq, 14, 15),
        T::NotEq => (Neq, 14, 15),
        T::Lt => (Lt, 16, 17),
        T::Le => (Le, 16, 17),
        T::Gt => (Gt, 16, 17),
        T::Ge => (Ge, 16, 17),
        T::In if allow_in => (In, 16, 17),
        T::Shl => (Shl, 18, 19),
        T::Shr => (Shr, 18, 19),
        T::Zshr => (Zshr, 18, 19),
        T::ColonColon => (ConsLeft, 20, 20),
        T::ColonGt => (ConsRight, 20, 20),
        T::PlusPlus => (Join, 20, 20),
        T::Plus => (Add, 22, 23),
        T::Minus => (Sub, 22, 23),
        T::Star => (Mul, 24, 25),
        T::Slash => (Div, 24, 25),
        T::Percent => (Mod, 24, 25),
        T::StarStar => (Pow, 26, 26),
        _ => return None,
    })
}

fn parse_expr_bp(p: &mut Parser, min_bp: u8, allow_in: bool) -> Result<Expr, ParseError> {
    let mut lhs = parse_unary(p, allow_in)?;
    while let Some((op, lbp, rbp)) = binop_info(p.peek(), allow_in) {
        if lbp < min_bp {
            break;
        }
        p.advance();
        let rhs = parse_expr_bp(p, rbp, allow_in)?;
        let span = lhs.context.span.merge(rhs.context.span);
        lhs = Expr::new(ExprKind::BinaryOp { op, lhs: Box::new(lhs), rhs: Box::new(rhs) }, ctx(p, span));
    }
    Ok(lhs)
}

fn parse_unary(p: &mut Parser, allow_in: bool) -> Result<Expr, ParseError> {
    let start = p.span();
    let op = match p.peek() {
        TokenKind::Bang => Some(UnOp::Not),
        TokenKind::Tilde => Some(UnOp::BitNot),
        TokenKind::Minus => Some(UnOp::Neg),
        _ => None,
    };
    if let Some(op) = op {
        p.advance();
        let operand = parse_unary(p, allow_in)?;
        let span = start.merge(operand.context.span);
        return Ok(Expr::new(ExprKind::UnaryOp { op, expr: Box::new(operand) }, ctx(p, span)));
    }
    parse_application(p, allow_in)
}

fn can_start_atom(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Ident(_)
            | TokenKind::Int(_)
            | TokenKind::Float(_)
            | TokenKind::Byte(_)
            | TokenKind::CharLit(_)
            | TokenKind::StringLit(_)
            | TokenKind::SymbolLit(_)
            | TokenKind::True
            | TokenKind::False
            | TokenKind::LParen
            | TokenKind::LBracket
            | TokenKind::LBrace
            | TokenKind::Backslash
    )
}

fn parse_application(p: &mut Parser, allow_in: bool) -> Result<Expr, ParseError> {
    let start = p.span();
    let callee = parse_postfix_atom(p, allow_in)?;
    let mut positional = Vec::new();
    let mut named = Vec::new();
    let mut applied = false;
    loop {
        if p.check(&TokenKind::LParen) {
            let (pos, nm) = parse_arg_parens(p, allow_in)?;
            positional.extend(pos);
            named.extend(nm);
            applied = true;
        } else if can_start_atom(p.peek()) {
            positional.push(parse_postfix_atom(p, allow_in)?);
            applied = true;
        } else {
            break;
        }
    }
    if !applied {
        return Ok(callee);
    }
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::Apply { callee: Box::new(callee), positional, named }, ctx(p, span)))
}

fn parse_arg_parens(p: &mut Parser, allow_in: bool) -> Result<(Vec<Expr>, Vec<(String, Expr)>), ParseError> {
    p.expect(TokenKind::LParen, "`(`")?;
    let mut positional = Vec::new();
    let mut named = Vec::new();
    if !p.check(&TokenKind::RParen) {
        loop {
            let mark = p.mark();
            if let TokenKind::Ident(name) = p.peek().clone() {
                p.advance();
                if p.eat(&TokenKind::Eq) {
                    let value = parse_expr_bp(p, 0, allow_in)?;
                    named.push((name, value));
                    if !p.eat(&TokenKind::Comma) {
                        break;
                    }
                    continue;
                }
                p.reset(mark);
            }
            positional.push(parse_expr_bp(p, 0, allow_in)?);
            if !p.eat(&TokenKind::Comma) {
                break;
            }
        }
    }
    p.expect(TokenKind::RParen, "`)`")?;
    Ok((positional, named))
}

/// A primary expression plus postfix `.field` access and `{...}` record
/// construction / field update. Stops before juxtaposed application so the
/// caller controls argument-gathering.
fn parse_postfix_atom(p: &mut Parser, allow_in: bool) -> Result<Expr, ParseError> {
    let start = p.span();
    let mut expr = parse_primary(p, allow_in)?;
    loop {
        if p.eat(&TokenKind::Dot) {
            let (field, _) = p.expect_ident("a field name")?;
            let span = start.merge(p.prev_span());
            expr = Expr::new(ExprKind::FieldAccess { target: Box::new(expr), field }, ctx(p, span));
        } else if p.check(&TokenKind::LBrace) {
            let is_record = matches!(&expr.kind, ExprKind::Identifier(name) if name.chars().next().is_some_and(|c| c.is_uppercase()));
            if is_record {
                let ExprKind::Identifier(constructor) = expr.kind.clone() else { unreachable!() };
                p.advance();
                let fields = parse_field_list(p, allow_in)?;
                p.expect(TokenKind::RBrace, "`}`")?;
                let span = start.merge(p.prev_span());
                expr = Expr::new(ExprKind::RecordInstance { constructor, fields }, ctx(p, span));
            } else {
                p.advance();
                let updates = parse_field_list(p, allow_in)?;
                p.expect(TokenKind::RBrace, "`}`")?;
                let span = start.merge(p.prev_span());
                expr = Expr::new(ExprKind::FieldUpdate { target: Box::new(expr), updates }, ctx(p, span));
            }
        } else {
            break;
        }
    }
    Ok(expr)
}

fn parse_field_list(p: &mut Parser, allow_in: bool) -> Result<Vec<(String, Expr)>, ParseError> {
    let mut fields = Vec::new();
    if !p.check(&TokenKind::RBrace) {
        loop {
            let (name, _) = p.expect_ident("a field name")?;
            p.expect(TokenKind::Eq, "`=`")?;
            let value = parse_expr_bp(p, 0, allow_in)?;
            fields.push((name, value));
            if !p.eat(&TokenKind::Comma) {
                break;
            }
        }
    }
    Ok(fields)
}

fn parse_primary(p: &mut Parser, allow_in: bool) -> Result<Expr, ParseError> {
    let start = p.span();
    match p.peek().clone() {
        TokenKind::Int(n) => {
            p.advance();
            Ok(Expr::new(ExprKind::Literal(Literal::Int(n)), ctx(p, start)))
        }
        TokenKind::Float(f) => {
            p.advance();
            Ok(Expr::new(ExprKind::Literal(Literal::Float(f)), ctx(p, start)))
        }
        TokenKind::Byte(b) => {
            p.advance();
            Ok(Expr::new(ExprKind::Literal(Literal::Byte(b)), ctx(p, start)))
        }
        TokenKind::CharLit(c) => {
            p.advance();
            Ok(Expr::new(ExprKind::Literal(Literal::Char(c)), ctx(p, start)))
        }
        TokenKind::StringLit(s) => {
            p.advance();
            Ok(Expr::new(ExprKind::Literal(Literal::String(s)), ctx(p, start)))
        }
        TokenKind::SymbolLit(s) => {
            p.advance();
            Ok(Expr::new(ExprKind::Literal(Literal::Symbol(s)), ctx(p, start)))
        }
        TokenKind::True => {
            p.advance();
            Ok(Expr::new(ExprKind::Literal(Literal::Bool(true)), ctx(p, start)))
        }
        TokenKind::False => {
            p.advance();
            Ok(Expr::new(ExprKind::Literal(Literal::Bool(false)), ctx(p, start)))
        }
        TokenKind::Ident(name) => parse_ident_led(p, name, start),
        TokenKind::LParen => parse_paren(p),
        TokenKind::LBracket => parse_bracket(p),
        TokenKind::LBrace => parse_brace(p),
        TokenKind::Backslash => parse_lambda(p, start),
        TokenKind::If => parse_if(p, start),
        TokenKind::Let => parse_let(p, start),
        TokenKind::Do => parse_do(p, start),
        TokenKind::Case => parse_case(p, start),
        TokenKind::Try => parse_try(p, start),
        TokenKind::Raise => parse_raise(p, start),
        TokenKind::With => parse_with(p, start),
        TokenKind::Import => parse_import(p, start),
        _ => Err(p.unexpected("an expression")),
    }
}

/// An identifier-led primary: a bare name, an `Fqn\path`, a `Fqn::name`
/// reference, or an `alias\name` alias reference.
fn parse_ident_led(p: &mut Parser, first: String, start: Span) -> Result<Expr, ParseError> {
    p.advance();
    let starts_upper = first.chars().next().is_some_and(|c| c.is_uppercase());
    if starts_upper && p.check(&TokenKind::Backslash) {
        let mut segments = vec![first];
        while p.eat(&TokenKind::Backslash) {
            let (seg, _) = p.expect_ident("a path segment")?;
            segments.push(seg);
        }
        let module = segments.pop().unwrap();
        let fqn = FqnExpr::new(segments, module);
        if p.eat(&TokenKind::ColonColon) {
            let (name, _) = p.expect_ident("a name after `::`")?;
            let span = start.merge(p.prev_span());
            return Ok(Expr::new(ExprKind::ModuleRef { fqn, name }, ctx(p, span)));
        }
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(ExprKind::FqnRef(fqn), ctx(p, span)));
    }
    if p.check(&TokenKind::Backslash) {
        p.advance();
        let (name, _) = p.expect_ident("a name after `\\`")?;
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(ExprKind::AliasRef { alias: first, name }, ctx(p, span)));
    }
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::Identifier(first), ctx(p, span)))
}

fn parse_paren(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.span();
    p.advance(); // `(`
    if p.eat(&TokenKind::RParen) {
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(ExprKind::Literal(Literal::Unit), ctx(p, span)));
    }
    let mut items = vec![parse_expr(p)?];
    let mut is_tuple = false;
    while p.eat(&TokenKind::Comma) {
        is_tuple = true;
        items.push(parse_expr(p)?);
    }
    p.expect(TokenKind::RParen, "`)`")?;
    let span = start.merge(p.prev_span());
    if is_tuple {
        Ok(Expr::new(ExprKind::Tuple(items), ctx(p, span)))
    } else {
        Ok(items.into_iter().next().unwrap())
    }
}

/// `[...]`: sequence literal, range, or comprehension.
fn parse_bracket(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.span();
    p.advance(); // `[`
    if p.eat(&TokenKind::RBracket) {
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(ExprKind::SeqValues(vec![]), ctx(p, span)));
    }

    let first = parse_expr(p)?;

    if p.eat(&TokenKind::DotDot) {
        let end_expr = parse_expr(p)?;
        let step = if p.eat(&TokenKind::Colon) { Some(Box::new(parse_expr(p)?)) } else { None };
        p.expect(TokenKind::RBracket, "`]`")?;
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(ExprKind::SeqRange { start: Box::new(first), end: Box::new(end_expr), step }, ctx(p, span)));
    }

    if p.eat(&TokenKind::Pipe) {
        let var = parse_pattern_top(p)?;
        p.expect(TokenKind::Arrow, "`->` in comprehension source")?;
        let source = parse_expr(p)?;
        let condition = if p.eat(&TokenKind::When) { Some(Box::new(parse_expr(p)?)) } else { None };
        p.expect(TokenKind::RBracket, "`]`")?;
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(
            ExprKind::SeqComprehension { reducer: Box::new(first), var, source: Box::new(source), condition },
            ctx(p, span),
        ));
    }

    let mut items = vec![first];
    while p.eat(&TokenKind::Comma) {
        items.push(parse_expr(p)?);
    }
    p.expect(TokenKind::RBracket, "`]`")?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::SeqValues(items), ctx(p, span)))
}

/// `{...}`: dict literal, set literal, do-block (after `do` keyword,
/// handled separately), or a comprehension of either shape.
fn parse_brace(p: &mut Parser) -> Result<Expr, ParseError> {
    let start = p.span();
    p.advance(); // `{`
    if p.eat(&TokenKind::RBrace) {
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(ExprKind::Dict(vec![]), ctx(p, span)));
    }

    let first = parse_expr(p)?;

    if p.eat(&TokenKind::Colon) {
        let first_val = parse_expr(p)?;
        if p.eat(&TokenKind::Pipe) {
            let (key_var, val_var) = parse_comprehension_vars(p)?;
            p.expect(TokenKind::Arrow, "`->` in comprehension source")?;
            let source = parse_expr(p)?;
            let condition = if p.eat(&TokenKind::When) { Some(Box::new(parse_expr(p)?)) } else { None };
            p.expect(TokenKind::RBrace, "`}`")?;
            let span = start.merge(p.prev_span());
            return Ok(Expr::new(
                ExprKind::DictComprehension {
                    key_reducer: Box::new(first),
                    value_reducer: Box::new(first_val),
                    key_var,
                    val_var,
                    source: Box::new(source),
                    condition,
                },
                ctx(p, span),
            ));
        }
        let mut entries = vec![(first, first_val)];
        while p.eat(&TokenKind::Comma) {
            let k = parse_expr(p)?;
            p.expect(TokenKind::Colon, "`:`")?;
            let v = parse_expr(p)?;
            entries.push((k, v));
        }
        p.expect(TokenKind::RBrace, "`}`")?;
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(ExprKind::Dict(entries), ctx(p, span)));
    }

    if p.eat(&TokenKind::Pipe) {
        let var = parse_pattern_top(p)?;
        p.expect(TokenKind::Arrow, "`->` in comprehension source")?;
        let source = parse_expr(p)?;
        let condition = if p.eat(&TokenKind::When) { Some(Box::new(parse_expr(p)?)) } else { None };
        p.expect(TokenKind::RBrace, "`}`")?;
        let span = start.merge(p.prev_span());
        return Ok(Expr::new(
            ExprKind::SetComprehension { reducer: Box::new(first), var, source: Box::new(source), condition },
            ctx(p, span),
        ));
    }

    let mut items = vec![first];
    while p.eat(&TokenKind::Comma) {
        items.push(parse_expr(p)?);
    }
    p.expect(TokenKind::RBrace, "`}`")?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::Set(items), ctx(p, span)))
}

/// A dict comprehension's `key, val |` header, or a bare `val |` header
/// (key-less, meaning the source yields values directly).
fn parse_comprehension_vars(p: &mut Parser) -> Result<(Option<yona_ast::Pattern>, yona_ast::Pattern), ParseError> {
    let first = parse_pattern_top(p)?;
    if p.eat(&TokenKind::Comma) {
        let second = parse_pattern_top(p)?;
        Ok((Some(first), second))
    } else {
        Ok((None, first))
    }
}

fn parse_lambda(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    let function = parse_function_tail(p, None, start)?;
    let span = function.context.span;
    Ok(Expr::new(ExprKind::Function(function), ctx(p, span)))
}

/// Parses everything after a function's introducer (`\` for a lambda, or a
/// bare name at module top level) through its patterns and guarded bodies.
pub(crate) fn parse_function_tail(p: &mut Parser, name: Option<String>, start: Span) -> Result<FunctionExpr, ParseError> {
    if name.is_none() {
        p.expect(TokenKind::Backslash, "`\\`")?;
    }
    let mut patterns = Vec::new();
    while !p.check(&TokenKind::Arrow) && !p.check(&TokenKind::Pipe) {
        patterns.push(parse_pattern(p)?);
    }
    let bodies = parse_function_bodies(p)?;
    let span = start.merge(p.prev_span());
    Ok(FunctionExpr { name, patterns, bodies, context: ctx(p, span) })
}

fn parse_function_bodies(p: &mut Parser) -> Result<Vec<AstFunctionBody>, ParseError> {
    if p.eat(&TokenKind::Arrow) {
        let body = parse_expr(p)?;
        return Ok(vec![AstFunctionBody::WithoutGuard(body)]);
    }
    let mut bodies = Vec::new();
    while p.eat(&TokenKind::Pipe) {
        if p.eat(&TokenKind::Else) {
            p.expect(TokenKind::Arrow, "`->`")?;
            let body = parse_expr(p)?;
            bodies.push(AstFunctionBody::WithGuard { guard: Expr::new(ExprKind::Literal(Literal::Bool(true)), ctx(p, p.prev_span())), body });
            break;
        }
        let guard = parse_expr(p)?;
        p.expect(TokenKind::Arrow, "`->`")?;
        let body = parse_expr(p)?;
        bodies.push(AstFunctionBody::WithGuard { guard, body });
    }
    if bodies.is_empty() {
        return Err(p.unexpected("`->` or a guarded body"));
    }
    Ok(bodies)
}

fn parse_if(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    p.advance(); // `if`
    let cond = parse_expr(p)?;
    p.expect(TokenKind::Then, "`then`")?;
    let then_branch = parse_expr(p)?;
    p.expect(TokenKind::Else, "`else`")?;
    let else_branch = parse_expr(p)?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(
        ExprKind::If { cond: Box::new(cond), then_branch: Box::new(then_branch), else_branch: Box::new(else_branch) },
        ctx(p, span),
    ))
}

fn parse_let(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    p.advance(); // `let`
    let mut aliases = Vec::new();
    loop {
        aliases.push(parse_alias(p)?);
        if p.check(&TokenKind::In) {
            break;
        }
    }
    p.expect(TokenKind::In, "`in`")?;
    let body = parse_expr(p)?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::Let { aliases, body: Box::new(body) }, ctx(p, span)))
}

fn parse_alias(p: &mut Parser) -> Result<Alias, ParseError> {
    let start = p.span();
    if p.check(&TokenKind::Fn) {
        p.advance();
        let (name, _) = p.expect_ident("a name")?;
        p.expect(TokenKind::Eq, "`=`")?;
        let (target, _) = p.expect_ident("a target function name")?;
        let span = start.merge(p.prev_span());
        return Ok(Alias { kind: AliasKind::Function { name, target }, context: ctx(p, span) });
    }

    let mark = p.mark();
    if let TokenKind::Ident(name) = p.peek().clone() {
        p.advance();
        if p.eat(&TokenKind::Eq) {
            if p.check(&TokenKind::Backslash) {
                let lambda_start = p.span();
                let function = parse_function_tail(p, None, lambda_start)?;
                let span = start.merge(p.prev_span());
                return Ok(Alias { kind: AliasKind::Lambda { name, function }, context: ctx(p, span) });
            }
            if p.eat(&TokenKind::Module) {
                let fqn = parse_fqn_path(p)?;
                let mut exports = Vec::new();
                if p.eat(&TokenKind::Exports) {
                    exports.push(p.expect_ident("an exported name")?.0);
                    while p.eat(&TokenKind::Comma) {
                        exports.push(p.expect_ident("an exported name")?.0);
                    }
                }
                let span = start.merge(p.prev_span());
                return Ok(Alias { kind: AliasKind::Module { name, fqn, exports }, context: ctx(p, span) });
            }
            if p.eat(&TokenKind::Fqn) {
                let fqn = parse_fqn_path(p)?;
                let span = start.merge(p.prev_span());
                return Ok(Alias { kind: AliasKind::Fqn { name, fqn }, context: ctx(p, span) });
            }
            let value = parse_expr_no_in(p)?;
            let span = start.merge(p.prev_span());
            return Ok(Alias { kind: AliasKind::Value { name, expr: value }, context: ctx(p, span) });
        }
        p.reset(mark);
    }

    let pattern = parse_pattern_top(p)?;
    p.expect(TokenKind::Eq, "`=`")?;
    let value = parse_expr_no_in(p)?;
    let span = start.merge(p.prev_span());
    Ok(Alias { kind: AliasKind::Pattern { pattern, expr: value }, context: ctx(p, span) })
}

fn parse_fqn_path(p: &mut Parser) -> Result<FqnExpr, ParseError> {
    let (first, _) = p.expect_ident("a module path")?;
    let mut segments = vec![first];
    while p.eat(&TokenKind::Backslash) {
        segments.push(p.expect_ident("a path segment")?.0);
    }
    let module = segments.pop().unwrap();
    Ok(FqnExpr::new(segments, module))
}

fn parse_do(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    p.advance(); // `do`
    p.expect(TokenKind::LBrace, "`{`")?;
    let mut items = Vec::new();
    if !p.check(&TokenKind::RBrace) {
        items.push(parse_expr(p)?);
        while p.eat(&TokenKind::Semicolon) {
            items.push(parse_expr(p)?);
        }
    }
    p.expect(TokenKind::RBrace, "`}`")?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::Do(items), ctx(p, span)))
}

fn parse_case(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    p.advance(); // `case`
    let scrutinee = parse_expr(p)?;
    p.expect(TokenKind::Of, "`of`")?;
    let mut clauses = Vec::new();
    while !p.check(&TokenKind::End) {
        let pattern = parse_pattern_top(p)?;
        let guard = if p.eat(&TokenKind::When) { Some(parse_expr(p)?) } else { None };
        p.expect(TokenKind::Arrow, "`->`")?;
        let body = parse_expr(p)?;
        clauses.push(CaseClause { pattern, guard, body });
    }
    p.expect(TokenKind::End, "`end`")?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::Case { scrutinee: Box::new(scrutinee), clauses }, ctx(p, span)))
}

fn parse_try(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    p.advance(); // `try`
    let body = parse_expr(p)?;
    p.expect(TokenKind::Catch, "`catch`")?;
    let mut catches = Vec::new();
    while !p.check(&TokenKind::End) {
        let pattern = parse_pattern_top(p)?;
        p.expect(TokenKind::Arrow, "`->`")?;
        let clause_body = parse_expr(p)?;
        catches.push(CatchClause { pattern, body: clause_body });
    }
    p.expect(TokenKind::End, "`end`")?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::TryCatch { body: Box::new(body), catches }, ctx(p, span)))
}

fn parse_raise(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    p.advance(); // `raise`
    let symbol = match p.peek().clone() {
        TokenKind::SymbolLit(s) => {
            p.advance();
            s
        }
        _ => return Err(p.unexpected("a `:symbol`")),
    };
    let message = parse_postfix_atom(p, true)?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::Raise { symbol, message: Box::new(message) }, ctx(p, span)))
}

fn parse_with(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    p.advance(); // `with`
    let resource = parse_expr_no_in(p)?;
    let name = if p.eat(&TokenKind::As) { Some(p.expect_ident("a binding name")?.0) } else { None };
    p.expect(TokenKind::In, "`in`")?;
    let body = parse_expr(p)?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::With { resource: Box::new(resource), name, body: Box::new(body) }, ctx(p, span)))
}

fn parse_import(p: &mut Parser, start: Span) -> Result<Expr, ParseError> {
    p.advance(); // `import`
    let mut clauses = vec![parse_import_clause(p)?];
    while p.eat(&TokenKind::Comma) {
        clauses.push(parse_import_clause(p)?);
    }
    p.expect(TokenKind::In, "`in`")?;
    let body = parse_expr(p)?;
    let span = start.merge(p.prev_span());
    Ok(Expr::new(ExprKind::Import { clauses, body: Box::new(body) }, ctx(p, span)))
}

fn parse_import_clause(p: &mut Parser) -> Result<ImportClause, ParseError> {
    // `Name = Fqn\Path` -- aliased module import.
    let mark = p.mark();
    if let TokenKind::Ident(name) = p.peek().clone() {
        p.advance();
        if p.eat(&TokenKind::Eq) {
            let fqn = parse_fqn_path(p)?;
            return Ok(ImportClause::Module { fqn, alias: Some(name) });
        }
        p.reset(mark);
    }

    // Bare `Fqn\Path` -- unaliased module import. Module paths are always
    // uppercase-led; function names (the other clause shape) are not.
    if let TokenKind::Ident(name) = p.peek().clone() {
        if name.chars().next().is_some_and(|c| c.is_uppercase()) {
            let fqn = parse_fqn_path(p)?;
            return Ok(ImportClause::Module { fqn, alias: None });
        }
    }

    let mut items = vec![parse_import_item(p)?];
    while p.eat(&TokenKind::Comma) {
        items.push(parse_import_item(p)?);
    }
    p.expect(TokenKind::From, "`from`")?;
    let fqn = parse_fqn_path(p)?;
    Ok(ImportClause::Functions { fqn, items })
}

fn parse_import_item(p: &mut Parser) -> Result<(String, Option<String>), ParseError> {
    let (name, _) = p.expect_ident("a function name")?;
    let alias = if p.eat(&TokenKind::As) { Some(p.expect_ident("an alias")?.0) } else { None };
    Ok((name, alias))
}
