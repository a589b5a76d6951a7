//! The type inferencer (spec §4.5): walks the AST and synthesizes a type
//! for each expression, accumulating errors rather than throwing.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use yona_ast::{
    Alias, AliasKind, BinOp, CaseClause, Expr, ExprKind, FunctionBody, FunctionExpr, Literal, Pattern,
    PatternKind, TailPattern, UnOp,
};
use yona_common::{Span, TypeError, TypeErrorKind};
use yona_types::{generalize, instantiate, unify, Scheme, Ty, TyVar};

use crate::env::TypeFrame;
use crate::records::RecordRegistry;

pub type Annotations = FxHashMap<Span, Ty>;

/// Walks expressions, synthesizing types and accumulating errors. Type
/// inference is advisory (spec §4.5): the interpreter does not require it
/// to have succeeded, so every `infer_*` method returns its best-effort
/// type even after recording an error, rather than aborting.
pub struct TypeInferencer {
    next_var: u32,
    pub errors: Vec<TypeError>,
    pub records: RecordRegistry,
    pub annotations: Annotations,
}

impl TypeInferencer {
    pub fn new() -> Self {
        Self { next_var: 0, errors: Vec::new(), records: RecordRegistry::new(), annotations: FxHashMap::default() }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn fresh_var(&mut self) -> Ty {
        let v = TyVar(self.next_var);
        self.next_var += 1;
        Ty::Var(v)
    }

    fn fresh_tyvar(&mut self) -> TyVar {
        let v = TyVar(self.next_var);
        self.next_var += 1;
        v
    }

    fn record(&mut self, kind: TypeErrorKind, message: impl Into<String>, span: Span) {
        self.errors.push(TypeError::new(kind, message, span));
    }

    fn unify_or_record(&mut self, a: &Ty, b: &Ty, span: Span) -> Ty {
        match unify(a, b) {
            Ok(subst) => subst.apply(a),
            Err(err) => {
                self.record(TypeErrorKind::Mismatch, err.to_string(), span);
                a.clone()
            }
        }
    }

    fn annotate(&mut self, span: Span, ty: &Ty) {
        self.annotations.insert(span, ty.clone());
    }

    /// Entry point: infers the type of `expr` under `frame`.
    pub fn infer(&mut self, expr: &Expr, frame: &Rc<RefCell<TypeFrame>>) -> Ty {
        let ty = self.infer_kind(expr, frame);
        self.annotate(expr.context.span, &ty);
        ty
    }

    fn infer_kind(&mut self, expr: &Expr, frame: &Rc<RefCell<TypeFrame>>) -> Ty {
        let span = expr.context.span;
        match &expr.kind {
            ExprKind::Literal(lit) => literal_ty(lit),

            ExprKind::Identifier(name) | ExprKind::NameRef(name) => match TypeFrame::lookup(frame, name) {
                Some(scheme) => instantiate(&scheme, || self.fresh_tyvar()),
                None => {
                    self.record(TypeErrorKind::Undefined, format!("undefined variable `{name}`"), span);
                    self.fresh_var()
                }
            },

            ExprKind::AliasRef { name, .. } | ExprKind::ModuleRef { name, .. } => {
                // Qualified references resolve through the module system at
                // runtime; absent a loaded module here, a fresh variable is
                // the best advisory type available.
                let _ = name;
                self.fresh_var()
            }

            ExprKind::Tuple(items) => {
                let tys = items.iter().map(|e| self.infer(e, frame)).collect();
                Ty::Product(tys)
            }

            ExprKind::SeqValues(items) => self.infer_homogeneous_collection(items, frame, Ty::seq),
            ExprKind::Set(items) => self.infer_homogeneous_collection(items, frame, Ty::set),

            ExprKind::SeqRange { start, end, step } => {
                let start_ty = self.infer(start, frame);
                let end_ty = self.infer(end, frame);
                let unified = self.unify_or_record(&start_ty, &end_ty, span);
                if let Some(step) = step {
                    let step_ty = self.infer(step, frame);
                    self.unify_or_record(&unified, &step_ty, span);
                }
                Ty::seq(unified)
            }

            ExprKind::Dict(entries) => {
                let key_var = self.fresh_var();
                let val_var = self.fresh_var();
                let mut key_ty = key_var;
                let mut val_ty = val_var;
                for (k, v) in entries {
                    let kt = self.infer(k, frame);
                    let vt = self.infer(v, frame);
                    key_ty = self.unify_or_record(&key_ty, &kt, span);
                    val_ty = self.unify_or_record(&val_ty, &vt, span);
                }
                Ty::dict(key_ty, val_ty)
            }

            ExprKind::FqnRef(_) | ExprKind::PackageNameRef(_) => Ty::Named { name: "Fqn".into(), inner: None },

            ExprKind::RecordInstance { constructor, fields } => self.infer_record_instance(constructor, fields, frame, span),

            ExprKind::BinaryOp { op, lhs, rhs } => {
                let lhs_ty = self.infer(lhs, frame);
                let rhs_ty = self.infer(rhs, frame);
                self.infer_binop(*op, &lhs_ty, &rhs_ty, span)
            }

            ExprKind::UnaryOp { op, expr: inner } => {
                let inner_ty = self.infer(inner, frame);
                self.infer_unop(*op, &inner_ty, span)
            }

            ExprKind::If { cond, then_branch, else_branch } => {
                let cond_ty = self.infer(cond, frame);
                self.unify_or_record(&cond_ty, &Ty::bool(), span);
                let then_ty = self.infer(then_branch, frame);
                let else_ty = self.infer(else_branch, frame);
                self.unify_or_record(&then_ty, &else_ty, span)
            }

            ExprKind::Let { aliases, body } => {
                let let_frame = TypeFrame::push(frame);
                for alias in aliases {
                    self.infer_alias(alias, &let_frame);
                }
                self.infer(body, &let_frame)
            }

            ExprKind::Do(steps) => {
                let mut last = Ty::unit();
                for step in steps {
                    last = self.infer(step, frame);
                }
                last
            }

            ExprKind::Case { scrutinee, clauses } => self.infer_case(scrutinee, clauses, frame, span),

            ExprKind::TryCatch { body, catches } => {
                let body_ty = self.infer(body, frame);
                let mut result = body_ty;
                for catch in catches {
                    let catch_frame = TypeFrame::push(frame);
                    let exc_ty = Ty::Product(vec![Ty::symbol(), Ty::string()]);
                    self.infer_pattern(&catch.pattern, &exc_ty, &catch_frame);
                    let catch_ty = self.infer(&catch.body, &catch_frame);
                    result = self.unify_or_record(&result, &catch_ty, span);
                }
                result
            }

            ExprKind::Raise { message, .. } => {
                self.infer(message, frame);
                Ty::Var(self.fresh_tyvar())
            }

            ExprKind::With { resource, name, body } => {
                let resource_ty = self.infer(resource, frame);
                let with_frame = TypeFrame::push(frame);
                if let Some(name) = name {
                    TypeFrame::bind(&with_frame, name.clone(), Scheme::mono(resource_ty));
                }
                self.infer(body, &with_frame)
            }

            ExprKind::FieldAccess { target, field } => {
                let target_ty = self.infer(target, frame);
                match &target_ty {
                    Ty::Record { fields, .. } => fields
                        .iter()
                        .find(|(n, _)| n == field)
                        .map(|(_, t)| t.clone())
                        .unwrap_or_else(|| {
                            self.record(TypeErrorKind::UnknownField, format!("unknown field `{field}`"), span);
                            self.fresh_var()
                        }),
                    _ => self.fresh_var(),
                }
            }

            ExprKind::FieldUpdate { target, updates } => {
                let target_ty = self.infer(target, frame);
                for (_, value) in updates {
                    self.infer(value, frame);
                }
                target_ty
            }

            ExprKind::Function(func) => self.infer_function_expr(func, frame),

            ExprKind::Apply { callee, positional, named } => {
                let mut callee_ty = self.infer(callee, frame);
                for arg in positional {
                    let arg_ty = self.infer(arg, frame);
                    let result_var = self.fresh_var();
                    callee_ty = self.unify_or_record(&callee_ty, &Ty::function(arg_ty, result_var.clone()), span);
                    callee_ty = match &callee_ty {
                        Ty::Function { ret, .. } => (**ret).clone(),
                        _ => result_var,
                    };
                }
                for (_, value) in named {
                    self.infer(value, frame);
                }
                callee_ty
            }

            ExprKind::Import { clauses, body } => {
                let import_frame = TypeFrame::push(frame);
                for clause in clauses {
                    match clause {
                        yona_ast::ImportClause::Module { alias, .. } => {
                            if let Some(alias) = alias {
                                TypeFrame::bind(&import_frame, alias.clone(), Scheme::mono(self.fresh_var()));
                            }
                        }
                        yona_ast::ImportClause::Functions { items, .. } => {
                            for (name, alias) in items {
                                let bound_name = alias.clone().unwrap_or_else(|| name.clone());
                                TypeFrame::bind(&import_frame, bound_name, Scheme::mono(self.fresh_var()));
                            }
                        }
                    }
                }
                self.infer(body, &import_frame)
            }

            ExprKind::SeqComprehension { reducer, var, source, condition } => {
                self.infer_seq_comprehension(reducer, var, source, condition, frame)
            }
            ExprKind::SetComprehension { reducer, var, source, condition } => {
                Ty::set(self.infer_comprehension_element(reducer, var, source, condition, frame))
            }
            ExprKind::DictComprehension { key_reducer, value_reducer, key_var, val_var, source, condition } => {
                self.infer_dict_comprehension(key_reducer, value_reducer, key_var, val_var, source, condition, frame)
            }
        }
    }

    fn infer_homogeneous_collection(
        &mut self,
        items: &[Expr],
        frame: &Rc<RefCell<TypeFrame>>,
        wrap: impl FnOnce(Ty) -> Ty,
    ) -> Ty {
        let mut elem_ty = self.fresh_var();
        for item in items {
            let item_ty = self.infer(item, frame);
            elem_ty = self.unify_or_record(&elem_ty, &item_ty, item.context.span);
        }
        wrap(elem_ty)
    }

    fn infer_seq_comprehension(
        &mut self,
        reducer: &Expr,
        var: &Pattern,
        source: &Expr,
        condition: &Option<Box<Expr>>,
        frame: &Rc<RefCell<TypeFrame>>,
    ) -> Ty {
        Ty::seq(self.infer_comprehension_element(reducer, var, source, condition, frame))
    }

    fn infer_comprehension_element(
        &mut self,
        reducer: &Expr,
        var: &Pattern,
        source: &Expr,
        condition: &Option<Box<Expr>>,
        frame: &Rc<RefCell<TypeFrame>>,
    ) -> Ty {
        let source_ty = self.infer(source, frame);
        let elem_var = self.fresh_var();
        let source_ty = self.unify_or_record(&source_ty, &Ty::seq(elem_var.clone()), source.context.span);
        let elem_ty = match &source_ty {
            Ty::Collection { item, .. } => (**item).clone(),
            _ => elem_var,
        };
        let comp_frame = TypeFrame::push(frame);
        self.infer_pattern(var, &elem_ty, &comp_frame);
        if let Some(cond) = condition {
            let cond_ty = self.infer(cond, &comp_frame);
            self.unify_or_record(&cond_ty, &Ty::bool(), cond.context.span);
        }
        self.infer(reducer, &comp_frame)
    }

    #[allow(clippy::too_many_arguments)]
    fn infer_dict_comprehension(
        &mut self,
        key_reducer: &Expr,
        value_reducer: &Expr,
        key_var: &Option<Pattern>,
        val_var: &Pattern,
        source: &Expr,
        condition: &Option<Box<Expr>>,
        frame: &Rc<RefCell<TypeFrame>>,
    ) -> Ty {
        let source_ty = self.infer(source, frame);
        let key_ty_var = self.fresh_var();
        let val_ty_var = self.fresh_var();
        let expected = Ty::dict(key_ty_var.clone(), val_ty_var.clone());
        let unified = self.unify_or_record(&source_ty, &expected, source.context.span);
        let (key_ty, val_ty) = match &unified {
            Ty::Dict { key, value } => ((**key).clone(), (**value).clone()),
            _ => (key_ty_var, val_ty_var),
        };
        let comp_frame = TypeFrame::push(frame);
        if let Some(key_var) = key_var {
            self.infer_pattern(key_var, &key_ty, &comp_frame);
        }
        self.infer_pattern(val_var, &val_ty, &comp_frame);
        if let Some(cond) = condition {
            let cond_ty = self.infer(cond, &comp_frame);
            self.unify_or_record(&cond_ty, &Ty::bool(), cond.context.span);
        }
        let k = self.infer(key_reducer, &comp_frame);
        let v = self.infer(value_reducer, &comp_frame);
        Ty::dict(k, v)
    }

    fn infer_record_instance(
        &mut self,
        constructor: &str,
        fields: &[(String, Expr)],
        frame: &Rc<RefCell<TypeFrame>>,
        span: Span,
    ) -> Ty {
        let info = self.records.get(constructor).cloned();
        match info {
            Some(info) => {
                if info.fields.len() != fields.len() {
                    self.record(
                        TypeErrorKind::Arity,
                        format!(
                            "record `{constructor}` expects {} field(s), found {}",
                            info.fields.len(),
                            fields.len()
                        ),
                        span,
                    );
                }
                for (name, value) in fields {
                    let value_ty = self.infer(value, frame);
                    match info.field_type(name) {
                        Some(declared) => {
                            self.unify_or_record(&value_ty, declared, span);
                        }
                        None => {
                            self.record(TypeErrorKind::UnknownField, format!("unknown field `{name}`"), span);
                        }
                    }
                }
                Ty::Record { name: info.name.clone(), fields: info.fields.clone() }
            }
            None => {
                self.record(TypeErrorKind::UnknownConstructor, format!("unknown record `{constructor}`"), span);
                for (_, value) in fields {
                    self.infer(value, frame);
                }
                self.fresh_var()
            }
        }
    }

    fn infer_case(
        &mut self,
        scrutinee: &Expr,
        clauses: &[CaseClause],
        frame: &Rc<RefCell<TypeFrame>>,
        span: Span,
    ) -> Ty {
        let scrutinee_ty = self.infer(scrutinee, frame);
        let mut result = self.fresh_var();
        for clause in clauses {
            let clause_frame = TypeFrame::push(frame);
            self.infer_pattern(&clause.pattern, &scrutinee_ty, &clause_frame);
            if let Some(guard) = &clause.guard {
                let guard_ty = self.infer(guard, &clause_frame);
                self.unify_or_record(&guard_ty, &Ty::bool(), guard.context.span);
            }
            let body_ty = self.infer(&clause.body, &clause_frame);
            result = self.unify_or_record(&result, &body_ty, span);
        }
        result
    }

    fn infer_alias(&mut self, alias: &Alias, frame: &Rc<RefCell<TypeFrame>>) {
        match &alias.kind {
            AliasKind::Value { name, expr } => {
                let ty = self.infer(expr, frame);
                let env_vars = TypeFrame::free_vars(frame);
                let scheme = generalize(&ty, &env_vars);
                TypeFrame::bind(frame, name.clone(), scheme);
            }
            AliasKind::Lambda { name, function } => {
                // Bind a fresh scheme first so self-references within the
                // lambda's own clauses see a name, then refine from the body.
                let placeholder = self.fresh_var();
                TypeFrame::bind(frame, name.clone(), Scheme::mono(placeholder));
                let ty = self.infer_function_expr(function, frame);
                let env_vars = TypeFrame::free_vars(frame);
                let scheme = generalize(&ty, &env_vars);
                TypeFrame::bind(frame, name.clone(), scheme);
            }
            AliasKind::Pattern { pattern, expr } => {
                let ty = self.infer(expr, frame);
                self.infer_pattern(pattern, &ty, frame);
            }
            AliasKind::Module { name, .. } | AliasKind::Fqn { name, .. } => {
                TypeFrame::bind(frame, name.clone(), Scheme::mono(self.fresh_var()));
            }
            AliasKind::Function { name, target } => {
                if let Some(scheme) = TypeFrame::lookup(frame, target) {
                    TypeFrame::bind(frame, name.clone(), scheme);
                } else {
                    TypeFrame::bind(frame, name.clone(), Scheme::mono(self.fresh_var()));
                }
            }
        }
    }

    fn infer_function_expr(&mut self, func: &FunctionExpr, frame: &Rc<RefCell<TypeFrame>>) -> Ty {
        let param_vars: Vec<Ty> = func.patterns.iter().map(|_| self.fresh_var()).collect();
        let fn_frame = TypeFrame::push(frame);
        for (pattern, ty) in func.patterns.iter().zip(param_vars.iter()) {
            self.infer_pattern(pattern, ty, &fn_frame);
        }
        let mut result_ty = self.fresh_var();
        for body in &func.bodies {
            let body_expr = match body {
                FunctionBody::WithoutGuard(e) => e,
                FunctionBody::WithGuard { guard, body } => {
                    let guard_ty = self.infer(guard, &fn_frame);
                    self.unify_or_record(&guard_ty, &Ty::bool(), guard.context.span);
                    body
                }
            };
            let body_ty = self.infer(body_expr, &fn_frame);
            result_ty = self.unify_or_record(&result_ty, &body_ty, func.context.span);
        }
        Ty::curried(param_vars, result_ty)
    }

    fn infer_pattern(&mut self, pattern: &Pattern, expected: &Ty, frame: &Rc<RefCell<TypeFrame>>) {
        let span = pattern.context.span;
        match &pattern.kind {
            PatternKind::Underscore => {}
            PatternKind::Literal(lit) => {
                let lit_ty = literal_ty(lit);
                self.unify_or_record(&lit_ty, expected, span);
            }
            PatternKind::Identifier(name) => {
                TypeFrame::bind(frame, name.clone(), Scheme::mono(expected.clone()));
            }
            PatternKind::Tuple(items) => {
                let elem_vars: Vec<Ty> = items.iter().map(|_| self.fresh_var()).collect();
                let product = Ty::Product(elem_vars.clone());
                self.unify_or_record(&product, expected, span);
                for (item, ty) in items.iter().zip(elem_vars.iter()) {
                    self.infer_pattern(item, ty, frame);
                }
            }
            PatternKind::Sequence(items) => {
                let elem_var = self.fresh_var();
                self.unify_or_record(&Ty::seq(elem_var.clone()), expected, span);
                for item in items {
                    self.infer_pattern(item, &elem_var, frame);
                }
            }
            PatternKind::HeadTails { heads, tail } | PatternKind::TailsHead { tail, heads } => {
                let elem_var = self.fresh_var();
                let seq_ty = self.unify_or_record(&Ty::seq(elem_var.clone()), expected, span);
                for head in heads {
                    self.infer_pattern(head, &elem_var, frame);
                }
                self.bind_tail_pattern(tail, &seq_ty, frame);
            }
            PatternKind::HeadTailsHead { left, tail, right } => {
                let elem_var = self.fresh_var();
                let seq_ty = self.unify_or_record(&Ty::seq(elem_var.clone()), expected, span);
                for p in left.iter().chain(right.iter()) {
                    self.infer_pattern(p, &elem_var, frame);
                }
                self.bind_tail_pattern(tail, &seq_ty, frame);
            }
            PatternKind::Dict(entries) => {
                let key_var = self.fresh_var();
                let val_var = self.fresh_var();
                self.unify_or_record(&Ty::dict(key_var.clone(), val_var.clone()), expected, span);
                for (key_pat, val_pat) in entries {
                    self.infer_pattern(key_pat, &key_var, frame);
                    self.infer_pattern(val_pat, &val_var, frame);
                }
            }
            PatternKind::Record { constructor, fields } => {
                let info = self.records.get(constructor).cloned();
                match info {
                    Some(info) => {
                        let record_ty = Ty::Record { name: info.name.clone(), fields: info.fields.clone() };
                        self.unify_or_record(&record_ty, expected, span);
                        for (name, field_pat) in fields {
                            let field_ty = info.field_type(name).cloned().unwrap_or_else(|| self.fresh_var());
                            self.infer_pattern(field_pat, &field_ty, frame);
                        }
                    }
                    None => {
                        self.record(TypeErrorKind::UnknownConstructor, format!("unknown record `{constructor}`"), span);
                        for (_, field_pat) in fields {
                            let v = self.fresh_var();
                            self.infer_pattern(field_pat, &v, frame);
                        }
                    }
                }
            }
            PatternKind::As { name, inner } => {
                TypeFrame::bind(frame, name.clone(), Scheme::mono(expected.clone()));
                self.infer_pattern(inner, expected, frame);
            }
            PatternKind::Or(alts) => {
                for alt in alts {
                    self.infer_pattern(alt, expected, frame);
                }
            }
        }
    }

    fn bind_tail_pattern(&mut self, tail: &TailPattern, seq_ty: &Ty, frame: &Rc<RefCell<TypeFrame>>) {
        if let TailPattern::Identifier(name) = tail {
            TypeFrame::bind(frame, name.clone(), Scheme::mono(seq_ty.clone()));
        }
    }

    fn infer_binop(&mut self, op: BinOp, lhs: &Ty, rhs: &Ty, span: Span) -> Ty {
        match op {
            BinOp::Add => {
                if lhs.is_numeric() && rhs.is_numeric() {
                    Ty::promote_numeric(lhs, rhs).unwrap_or_else(|| self.fresh_var())
                } else if matches!(lhs, Ty::Builtin(yona_types::BuiltinTy::String))
                    && matches!(rhs, Ty::Builtin(yona_types::BuiltinTy::String))
                {
                    Ty::string()
                } else {
                    self.unify_or_record(lhs, rhs, span)
                }
            }
            BinOp::Sub | BinOp::Mul => {
                Ty::promote_numeric(lhs, rhs).unwrap_or_else(|| self.unify_or_record(lhs, rhs, span))
            }
            BinOp::Div | BinOp::Pow => Ty::float(),
            BinOp::Mod => Ty::promote_numeric(lhs, rhs).unwrap_or_else(|| self.unify_or_record(lhs, rhs, span)),
            BinOp::Eq | BinOp::Neq => {
                self.unify_or_record(lhs, rhs, span);
                Ty::bool()
            }
            BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
                self.unify_or_record(lhs, rhs, span);
                Ty::bool()
            }
            BinOp::And | BinOp::Or => {
                self.unify_or_record(lhs, &Ty::bool(), span);
                self.unify_or_record(rhs, &Ty::bool(), span);
                Ty::bool()
            }
            BinOp::BitAnd | BinOp::BitOr | BinOp::BitXor | BinOp::Shl | BinOp::Shr | BinOp::Zshr => {
                Ty::promote_numeric(lhs, rhs).unwrap_or_else(|| Ty::int())
            }
            BinOp::ConsLeft => Ty::seq(self.unify_or_record(lhs, &self.elem_of(rhs), span)),
            BinOp::ConsRight => Ty::seq(self.unify_or_record(&self.elem_of(lhs), rhs, span)),
            BinOp::Join => self.unify_or_record(lhs, rhs, span),
            BinOp::In => Ty::bool(),
            BinOp::PipeLeft | BinOp::PipeRight => match (lhs, rhs) {
                (Ty::Function { ret, .. }, _) => (**ret).clone(),
                (_, Ty::Function { ret, .. }) => (**ret).clone(),
                _ => self.fresh_var(),
            },
        }
    }

    fn elem_of(&self, ty: &Ty) -> Ty {
        match ty {
            Ty::Collection { item, .. } => (**item).clone(),
            other => other.clone(),
        }
    }

    fn infer_unop(&mut self, op: UnOp, inner: &Ty, span: Span) -> Ty {
        match op {
            UnOp::Not => self.unify_or_record(inner, &Ty::bool(), span),
            UnOp::BitNot => inner.clone(),
            UnOp::Neg => inner.clone(),
        }
    }
}

impl Default for TypeInferencer {
    fn default() -> Self {
        Self::new()
    }
}

fn literal_ty(lit: &Literal) -> Ty {
    match lit {
        Literal::Int(_) => Ty::int(),
        Literal::Float(_) => Ty::float(),
        Literal::Byte(_) => Ty::byte(),
        Literal::Char(_) => Ty::char(),
        Literal::String(_) => Ty::string(),
        Literal::Symbol(_) => Ty::symbol(),
        Literal::Unit => Ty::unit(),
        Literal::Bool(_) => Ty::bool(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yona_common::SourceContext;

    fn ctx() -> SourceContext {
        SourceContext::synthetic()
    }

    fn lit(l: Literal) -> Expr {
        Expr::new(ExprKind::Literal(l), ctx())
    }

    #[test]
    fn infers_int_literal() {
        let mut inf = TypeInferencer::new();
        let frame = TypeFrame::root();
        let ty = inf.infer(&lit(Literal::Int(1)), &frame);
        assert_eq!(ty, Ty::int());
        assert!(!inf.has_errors());
    }

    #[test]
    fn infers_if_unifies_branches() {
        let mut inf = TypeInferencer::new();
        let frame = TypeFrame::root();
        let expr = Expr::new(
            ExprKind::If {
                cond: Box::new(lit(Literal::Bool(true))),
                then_branch: Box::new(lit(Literal::Int(1))),
                else_branch: Box::new(lit(Literal::Int(2))),
            },
            ctx(),
        );
        let ty = inf.infer(&expr, &frame);
        assert_eq!(ty, Ty::int());
        assert!(!inf.has_errors());
    }

    #[test]
    fn undefined_identifier_records_error() {
        let mut inf = TypeInferencer::new();
        let frame = TypeFrame::root();
        let expr = Expr::new(ExprKind::Identifier("nope".into()), ctx());
        inf.infer(&expr, &frame);
        assert!(inf.has_errors());
        assert_eq!(inf.errors[0].kind, TypeErrorKind::Undefined);
    }

    #[test]
    fn let_generalizes_identity_function() {
        let mut inf = TypeInferencer::new();
        let frame = TypeFrame::root();
        let identity = FunctionExpr {
            name: None,
            patterns: vec![Pattern::new(PatternKind::Identifier("x".into()), ctx())],
            bodies: vec![FunctionBody::WithoutGuard(Expr::new(ExprKind::Identifier("x".into()), ctx()))],
            context: ctx(),
        };
        let body = Expr::new(ExprKind::Tuple(vec![]), ctx());
        let let_expr = Expr::new(
            ExprKind::Let {
                aliases: vec![Alias { kind: AliasKind::Lambda { name: "id".into(), function: identity }, context: ctx() }],
                body: Box::new(body),
            },
            ctx(),
        );
        inf.infer(&let_expr, &frame);
        assert!(!inf.has_errors());
    }

    #[test]
    fn binop_add_promotes_numeric() {
        let mut inf = TypeInferencer::new();
        let ty = inf.infer_binop(BinOp::Add, &Ty::byte(), &Ty::int(), Span::new(0, 0));
        assert_eq!(ty, Ty::int());
    }
}
