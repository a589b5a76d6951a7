//! Tree-walking evaluator (spec §4.6): dispatch over every [`ExprKind`]
//! variant, threading an explicit current [`Frame`] rather than keeping it
//! as interpreter-owned mutable state -- same lexical behavior, without
//! fighting the borrow checker over a self-referential "current frame"
//! field.

mod apply;
mod module_loader;
mod ops;

use std::path::PathBuf;
use std::rc::Rc;

use yona_ast::{Alias, AliasKind, BinOp, Expr, ExprKind, ImportClause, Pattern};
use yona_common::{HostError, RuntimeErrorKind, SourceContext};

use crate::exception::ExceptionSlot;
use crate::frame::Frame;
use crate::modules::{ModuleCache, RecordTypeRegistry};
use crate::pattern::match_pattern;
use crate::value::{FunctionBody, FunctionValue, Value};

pub use apply::apply;

/// All per-run interpreter state (spec §4.6): the module cache, the
/// record-type registry, the module search path, and the exception slot.
/// `frame` is not stored here -- it is threaded explicitly through `eval`
/// (see module doc comment).
pub struct Interpreter {
    pub module_cache: ModuleCache,
    pub module_paths: Vec<PathBuf>,
    pub record_types: RecordTypeRegistry,
    pub exception: ExceptionSlot,
    /// FQN keys of modules currently being evaluated, used only to
    /// attribute records/functions to the right module during nested
    /// module loads (spec §4.6 `module_stack`).
    module_stack: Vec<String>,
    /// Transient slots publishing the current comprehension element/key to
    /// its extractor (spec §4.6 `generator_current_element` /
    /// `generator_current_key`). The present extractor strategy binds the
    /// generator pattern directly into a per-element frame instead of
    /// consulting these, so they are write-only for now; kept for parity
    /// with the documented interpreter state.
    #[allow(dead_code)]
    generator_current_element: Option<Value>,
    #[allow(dead_code)]
    generator_current_key: Option<Value>,
}

impl Interpreter {
    pub fn new(module_paths: Vec<PathBuf>) -> Self {
        let mut module_cache = ModuleCache::new();
        crate::natives::install_all(&mut module_cache);
        Self {
            module_cache,
            module_paths,
            record_types: RecordTypeRegistry::new(),
            exception: ExceptionSlot::new(),
            module_stack: Vec::new(),
            generator_current_element: None,
            generator_current_key: None,
        }
    }

    /// Sets the exception slot to a 2-tuple `(symbol, message)` (spec §4.6
    /// "Raise").
    pub fn raise_runtime(&mut self, kind: RuntimeErrorKind, message: impl Into<String>, context: SourceContext) {
        let value = Value::tuple(vec![Value::symbol(kind.symbol()), Value::string(message.into())]);
        self.exception.raise(value, context);
    }

    /// Evaluates `expr` in `frame`. Checks the exception slot first and
    /// short-circuits to `Unit` without evaluating if one is pending (spec
    /// §4.6, §7 "check-then-short-circuit"), which is how `do`/sequencing
    /// constructs get "don't evaluate what follows a raise" for free.
    pub fn eval(&mut self, expr: &Expr, frame: &Frame) -> Result<Value, HostError> {
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        self.eval_kind(expr, frame)
    }

    fn eval_kind(&mut self, expr: &Expr, frame: &Frame) -> Result<Value, HostError> {
        let context = &expr.context;
        match &expr.kind {
            ExprKind::Literal(lit) => Ok(literal_value(lit)),

            ExprKind::Identifier(name) | ExprKind::NameRef(name) => match frame.lookup(name) {
                Ok(v) => Ok(v),
                Err(_) => {
                    self.raise_runtime(RuntimeErrorKind::UndefinedVariable, format!("undefined variable `{name}`"), context.clone());
                    Ok(Value::Unit)
                }
            },

            ExprKind::Tuple(items) => self.eval_seq(items, frame).map(Value::tuple),
            ExprKind::SeqValues(items) => self.eval_seq(items, frame).map(Value::seq),
            ExprKind::Set(items) => {
                let values = self.eval_seq(items, frame)?;
                let mut dedup: Vec<Value> = Vec::new();
                for v in values {
                    if !dedup.iter().any(|existing| existing.structural_eq(&v)) {
                        dedup.push(v);
                    }
                }
                Ok(Value::Set(Rc::new(dedup)))
            }

            ExprKind::SeqRange { start, end, step } => self.eval_range(start, end, step.as_deref(), frame, context),

            ExprKind::Dict(entries) => {
                let mut pairs: Vec<(Value, Value)> = Vec::new();
                for (k, v) in entries {
                    let key = self.eval(k, frame)?;
                    if self.exception.is_pending() {
                        return Ok(Value::Unit);
                    }
                    let value = self.eval(v, frame)?;
                    if self.exception.is_pending() {
                        return Ok(Value::Unit);
                    }
                    pairs.retain(|(existing_key, _)| !existing_key.structural_eq(&key));
                    pairs.push((key, value));
                }
                Ok(Value::Dict(Rc::new(pairs)))
            }

            ExprKind::FqnRef(fqn) => {
                let module = self.load_module(fqn, context)?;
                Ok(Value::Module(module))
            }
            ExprKind::PackageNameRef(parts) => Ok(Value::Fqn(Rc::new(parts.clone()))),

            ExprKind::RecordInstance { constructor, fields } => self.eval_record_instance(constructor, fields, frame, context),

            ExprKind::BinaryOp { op: BinOp::PipeRight, lhs, rhs } => self.eval_pipe(rhs, lhs, frame, context),
            ExprKind::BinaryOp { op: BinOp::PipeLeft, lhs, rhs } => self.eval_pipe(lhs, rhs, frame, context),
            ExprKind::BinaryOp { op, lhs, rhs } => {
                let lval = self.eval(lhs, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                let rval = self.eval(rhs, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                match ops::eval_binop(*op, lval, rval) {
                    Ok(v) => Ok(v),
                    Err(fault) => {
                        self.raise_runtime(fault.kind, fault.message, context.clone());
                        Ok(Value::Unit)
                    }
                }
            }
            ExprKind::UnaryOp { op, expr: inner } => {
                let val = self.eval(inner, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                match ops::eval_unop(*op, val) {
                    Ok(v) => Ok(v),
                    Err(fault) => {
                        self.raise_runtime(fault.kind, fault.message, context.clone());
                        Ok(Value::Unit)
                    }
                }
            }

            ExprKind::If { cond, then_branch, else_branch } => {
                let c = self.eval(cond, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                match c.is_truthy_bool() {
                    Some(true) => self.eval(then_branch, frame),
                    Some(false) => self.eval(else_branch, frame),
                    None => {
                        self.raise_runtime(RuntimeErrorKind::TypeError, "if condition must be Bool", context.clone());
                        Ok(Value::Unit)
                    }
                }
            }

            ExprKind::Let { aliases, body } => {
                let let_frame = frame.push();
                for alias in aliases {
                    self.eval_alias(alias, &let_frame)?;
                    if self.exception.is_pending() {
                        return Ok(Value::Unit);
                    }
                }
                self.eval(body, &let_frame)
            }

            ExprKind::Do(steps) => {
                let mut result = Value::Unit;
                for step in steps {
                    result = self.eval(step, frame)?;
                    if self.exception.is_pending() {
                        return Ok(Value::Unit);
                    }
                }
                Ok(result)
            }

            ExprKind::Case { scrutinee, clauses } => self.eval_case(scrutinee, clauses, frame, context),

            ExprKind::TryCatch { body, catches } => self.eval_try_catch(body, catches, frame),

            ExprKind::Raise { symbol, message } => {
                let msg = self.eval(message, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                let value = Value::tuple(vec![Value::symbol(symbol.as_str()), msg]);
                self.exception.raise(value, context.clone());
                Ok(Value::Unit)
            }

            ExprKind::With { resource, name, body } => {
                let res = self.eval(resource, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                let with_frame = frame.push();
                if let Some(name) = name {
                    with_frame.write(name.clone(), res);
                }
                self.eval(body, &with_frame)
            }

            ExprKind::FieldAccess { target, field } => {
                let val = self.eval(target, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                match val.as_record().and_then(|r| r.field(field)) {
                    Some(v) => Ok(v.clone()),
                    None => {
                        self.raise_runtime(RuntimeErrorKind::FieldNotFound, format!("field `{field}` not found"), context.clone());
                        Ok(Value::Unit)
                    }
                }
            }

            ExprKind::FieldUpdate { target, updates } => {
                let val = self.eval(target, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                let Some(record) = val.as_record() else {
                    self.raise_runtime(RuntimeErrorKind::TypeError, "field update target is not a record", context.clone());
                    return Ok(Value::Unit);
                };
                let mut new_values = record.values.clone();
                for (name, update_expr) in updates {
                    let new_value = self.eval(update_expr, frame)?;
                    if self.exception.is_pending() {
                        return Ok(Value::Unit);
                    }
                    match record.fields.iter().position(|f| f == name) {
                        Some(idx) => new_values[idx] = new_value,
                        None => {
                            self.raise_runtime(RuntimeErrorKind::FieldNotFound, format!("field `{name}` not found"), context.clone());
                            return Ok(Value::Unit);
                        }
                    }
                }
                Ok(Value::Record(Rc::new(crate::value::RecordValue {
                    constructor: record.constructor.clone(),
                    fields: record.fields.clone(),
                    values: new_values,
                })))
            }

            ExprKind::Function(function_expr) => Ok(Value::Function(Rc::new(FunctionValue {
                name: function_expr.name.clone(),
                arity: function_expr.patterns.len(),
                partial: Vec::new(),
                body: FunctionBody::User {
                    patterns: Rc::new(function_expr.patterns.clone()),
                    bodies: Rc::new(function_expr.bodies.clone()),
                    frame: frame.clone(),
                },
                constructor_fields: None,
            }))),

            ExprKind::AliasRef { alias, name } => self.eval_alias_ref(alias, name, frame, context),
            ExprKind::ModuleRef { fqn, name } => {
                let module = self.load_module(fqn, context)?;
                match module.exports.get(name) {
                    Some(v) => Ok(v.clone()),
                    None => {
                        self.raise_runtime(RuntimeErrorKind::FunctionNotFound, format!("{fqn} does not export `{name}`"), context.clone());
                        Ok(Value::Unit)
                    }
                }
            }

            ExprKind::Apply { callee, positional, named } => self.eval_apply(callee, positional, named, frame, context),

            ExprKind::Import { clauses, body } => {
                let import_frame = frame.push();
                for clause in clauses {
                    self.eval_import_clause(clause, &import_frame, context)?;
                    if self.exception.is_pending() {
                        return Ok(Value::Unit);
                    }
                }
                self.eval(body, &import_frame)
            }

            ExprKind::SeqComprehension { reducer, var, source, condition } => {
                self.eval_collection_comprehension(reducer, var, source, condition.as_deref(), frame, false)
            }
            ExprKind::SetComprehension { reducer, var, source, condition } => {
                self.eval_collection_comprehension(reducer, var, source, condition.as_deref(), frame, true)
            }
            ExprKind::DictComprehension { key_reducer, value_reducer, key_var, val_var, source, condition } => {
                self.eval_dict_comprehension(key_reducer, value_reducer, key_var.as_ref(), val_var, source, condition.as_deref(), frame)
            }
        }
    }

    fn eval_seq(&mut self, items: &[Expr], frame: &Frame) -> Result<Vec<Value>, HostError> {
        let mut out = Vec::with_capacity(items.len());
        for item in items {
            let v = self.eval(item, frame)?;
            if self.exception.is_pending() {
                return Ok(out);
            }
            out.push(v);
        }
        Ok(out)
    }

    fn eval_range(&mut self, start: &Expr, end: &Expr, step: Option<&Expr>, frame: &Frame, context: &SourceContext) -> Result<Value, HostError> {
        let start_v = self.eval(start, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        let end_v = self.eval(end, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        let step_v = match step {
            Some(s) => {
                let v = self.eval(s, frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                Some(v)
            }
            None => None,
        };

        let as_num = |v: &Value| -> Option<f64> {
            match v {
                Value::Int(i) => Some(*i as f64),
                Value::Float(f) => Some(*f),
                Value::Byte(b) => Some(*b as f64),
                _ => None,
            }
        };
        let (Some(start_n), Some(end_n)) = (as_num(&start_v), as_num(&end_v)) else {
            self.raise_runtime(RuntimeErrorKind::TypeError, "range bounds must be numeric", context.clone());
            return Ok(Value::Unit);
        };
        let is_float = matches!(start_v, Value::Float(_)) || matches!(end_v, Value::Float(_)) || step_v.as_ref().is_some_and(|v| matches!(v, Value::Float(_)));

        let step_n = match step_v.as_ref().map(as_num) {
            Some(Some(s)) => s,
            Some(None) => {
                self.raise_runtime(RuntimeErrorKind::TypeError, "range step must be numeric", context.clone());
                return Ok(Value::Unit);
            }
            None => if start_n <= end_n { 1.0 } else { -1.0 },
        };
        if step_n == 0.0 {
            self.raise_runtime(RuntimeErrorKind::Runtime, "range step must not be zero", context.clone());
            return Ok(Value::Unit);
        }

        const EPSILON: f64 = 1e-9;
        let mut values = Vec::new();
        let mut current = start_n;
        if step_n > 0.0 {
            while current <= end_n + EPSILON {
                values.push(make_numeric(current, is_float));
                current += step_n;
            }
        } else {
            while current >= end_n - EPSILON {
                values.push(make_numeric(current, is_float));
                current += step_n;
            }
        }
        Ok(Value::seq(values))
    }

    fn eval_record_instance(&mut self, constructor: &str, fields: &[(String, Expr)], frame: &Frame, context: &SourceContext) -> Result<Value, HostError> {
        let Some(info) = self.record_types.get(constructor).cloned() else {
            self.raise_runtime(RuntimeErrorKind::FieldNotFound, format!("unknown record constructor `{constructor}`"), context.clone());
            return Ok(Value::Unit);
        };
        let mut values = Vec::with_capacity(info.fields.len());
        for field_name in &info.fields {
            let Some((_, expr)) = fields.iter().find(|(n, _)| n == field_name) else {
                self.raise_runtime(RuntimeErrorKind::FieldNotFound, format!("missing field `{field_name}` in `{constructor}`"), context.clone());
                return Ok(Value::Unit);
            };
            let v = self.eval(expr, frame)?;
            if self.exception.is_pending() {
                return Ok(Value::Unit);
            }
            values.push(v);
        }
        Ok(Value::Record(Rc::new(crate::value::RecordValue {
            constructor: constructor.into(),
            fields: Rc::new(info.fields.clone()),
            values,
        })))
    }

    fn eval_pipe(&mut self, func_side: &Expr, arg_side: &Expr, frame: &Frame, context: &SourceContext) -> Result<Value, HostError> {
        let func_val = self.eval(func_side, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        let arg_val = self.eval(arg_side, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        let Some(f) = func_val.as_function().cloned() else {
            self.raise_runtime(RuntimeErrorKind::TypeError, "pipe target is not a function", context.clone());
            return Ok(Value::Unit);
        };
        apply::apply(self, &f, vec![arg_val], context)
    }

    fn eval_apply(&mut self, callee: &Expr, positional: &[Expr], named: &[(String, Expr)], frame: &Frame, context: &SourceContext) -> Result<Value, HostError> {
        let callee_val = self.eval(callee, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        let Some(func) = callee_val.as_function().cloned() else {
            self.raise_runtime(RuntimeErrorKind::TypeError, "apply target is not a function", context.clone());
            return Ok(Value::Unit);
        };
        let positional_vals = self.eval_seq(positional, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        let mut named_vals = Vec::with_capacity(named.len());
        for (name, e) in named {
            let v = self.eval(e, frame)?;
            if self.exception.is_pending() {
                return Ok(Value::Unit);
            }
            named_vals.push((name.clone(), v));
        }
        let args = match apply::combine_named_args(func.constructor_fields.as_ref(), positional_vals, named_vals) {
            Ok(args) => args,
            Err((kind, msg)) => {
                self.raise_runtime(kind, msg, context.clone());
                return Ok(Value::Unit);
            }
        };
        apply::apply(self, &func, args, context)
    }

    fn eval_case(&mut self, scrutinee: &Expr, clauses: &[yona_ast::CaseClause], frame: &Frame, context: &SourceContext) -> Result<Value, HostError> {
        let value = self.eval(scrutinee, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        for clause in clauses {
            let clause_frame = frame.push();
            if !crate::pattern::match_into(&clause.pattern, &value, &clause_frame) {
                continue;
            }
            if let Some(guard) = &clause.guard {
                let g = self.eval(guard, &clause_frame)?;
                if self.exception.is_pending() {
                    clause_frame.merge_to_parent(frame);
                    return Ok(Value::Unit);
                }
                match g.is_truthy_bool() {
                    Some(true) => {}
                    Some(false) => continue,
                    None => {
                        self.raise_runtime(RuntimeErrorKind::TypeError, "case guard must be Bool", context.clone());
                        return Ok(Value::Unit);
                    }
                }
            }
            let result = self.eval(&clause.body, &clause_frame)?;
            clause_frame.merge_to_parent(frame);
            return Ok(result);
        }
        self.raise_runtime(RuntimeErrorKind::NoMatch, "no case clause matched", context.clone());
        Ok(Value::Unit)
    }

    fn eval_try_catch(&mut self, body: &Expr, catches: &[yona_ast::CatchClause], frame: &Frame) -> Result<Value, HostError> {
        self.exception.clear();
        let result = self.eval(body, frame)?;
        let Some(pending) = self.exception.peek().cloned() else {
            return Ok(result);
        };
        for catch in catches {
            let catch_frame = frame.push();
            if crate::pattern::match_into(&catch.pattern, &pending.value, &catch_frame) {
                self.exception.clear();
                let handled = self.eval(&catch.body, &catch_frame)?;
                catch_frame.merge_to_parent(frame);
                return Ok(handled);
            }
        }
        Ok(Value::Unit)
    }

    fn eval_alias(&mut self, alias: &Alias, let_frame: &Frame) -> Result<(), HostError> {
        let context = &alias.context;
        match &alias.kind {
            AliasKind::Value { name, expr } => {
                let v = self.eval(expr, let_frame)?;
                if !self.exception.is_pending() {
                    let_frame.write(name.clone(), v);
                }
            }
            AliasKind::Lambda { name, function } => {
                let closure = Value::Function(Rc::new(FunctionValue {
                    name: Some(name.clone()),
                    arity: function.patterns.len(),
                    partial: Vec::new(),
                    body: FunctionBody::User {
                        patterns: Rc::new(function.patterns.clone()),
                        bodies: Rc::new(function.bodies.clone()),
                        frame: let_frame.clone(),
                    },
                    constructor_fields: None,
                }));
                let_frame.write(name.clone(), closure);
            }
            AliasKind::Pattern { pattern, expr } => {
                let v = self.eval(expr, let_frame)?;
                if self.exception.is_pending() {
                    return Ok(());
                }
                if !match_pattern(pattern, &v, let_frame) {
                    self.raise_runtime(RuntimeErrorKind::NoMatch, "let pattern did not match", context.clone());
                }
            }
            AliasKind::Module { name, fqn, .. } => {
                let module = self.load_module(fqn, context)?;
                let_frame.write(name.clone(), Value::Module(module));
            }
            AliasKind::Fqn { name, fqn } => {
                let_frame.write(name.clone(), Value::Fqn(Rc::new(fqn_parts(fqn))));
            }
            AliasKind::Function { name, target } => match let_frame.lookup(target) {
                Ok(v) => let_frame.write(name.clone(), v),
                Err(_) => self.raise_runtime(RuntimeErrorKind::UndefinedVariable, format!("undefined variable `{target}`"), context.clone()),
            },
        }
        Ok(())
    }

    fn eval_alias_ref(&mut self, alias: &str, name: &str, frame: &Frame, context: &SourceContext) -> Result<Value, HostError> {
        let Ok(bound) = frame.lookup(alias) else {
            self.raise_runtime(RuntimeErrorKind::UndefinedVariable, format!("undefined variable `{alias}`"), context.clone());
            return Ok(Value::Unit);
        };
        match bound {
            Value::Module(module) => match module.exports.get(name) {
                Some(v) => Ok(v.clone()),
                None => {
                    self.raise_runtime(RuntimeErrorKind::FunctionNotFound, format!("module does not export `{name}`"), context.clone());
                    Ok(Value::Unit)
                }
            },
            Value::Fqn(parts) => {
                let fqn = yona_ast::FqnExpr::new(parts[..parts.len().saturating_sub(1)].to_vec(), parts.last().cloned().unwrap_or_default());
                let module = self.load_module(&fqn, context)?;
                match module.exports.get(name) {
                    Some(v) => Ok(v.clone()),
                    None => {
                        self.raise_runtime(RuntimeErrorKind::FunctionNotFound, format!("module does not export `{name}`"), context.clone());
                        Ok(Value::Unit)
                    }
                }
            }
            _ => {
                self.raise_runtime(RuntimeErrorKind::TypeError, format!("`{alias}` is not a module alias"), context.clone());
                Ok(Value::Unit)
            }
        }
    }

    fn eval_import_clause(&mut self, clause: &ImportClause, import_frame: &Frame, context: &SourceContext) -> Result<(), HostError> {
        match clause {
            ImportClause::Module { fqn, alias } => {
                let module = self.load_module(fqn, context)?;
                match alias {
                    Some(alias) => import_frame.write(alias.clone(), Value::Module(module)),
                    None => {
                        for (name, value) in module.exports.iter() {
                            import_frame.write(name.clone(), value.clone());
                        }
                    }
                }
            }
            ImportClause::Functions { fqn, items } => {
                let module = self.load_module(fqn, context)?;
                for (name, alias) in items {
                    match module.exports.get(name) {
                        Some(v) => import_frame.write(alias.clone().unwrap_or_else(|| name.clone()), v.clone()),
                        None => {
                            self.raise_runtime(RuntimeErrorKind::FunctionNotFound, format!("{fqn} does not export `{name}`"), context.clone());
                            return Ok(());
                        }
                    }
                }
            }
        }
        Ok(())
    }

    fn eval_collection_comprehension(
        &mut self,
        reducer: &Expr,
        var: &Pattern,
        source: &Expr,
        condition: Option<&Expr>,
        frame: &Frame,
        as_set: bool,
    ) -> Result<Value, HostError> {
        let source_val = self.eval(source, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        let Some(items) = source_val.as_seq().map(|s| s.to_vec()).or_else(|| match &source_val {
            Value::Set(items) => Some(items.as_ref().clone()),
            _ => None,
        }) else {
            self.raise_runtime(RuntimeErrorKind::TypeError, "comprehension source must be a sequence or set", source.context.clone());
            return Ok(Value::Unit);
        };

        let mut out = Vec::new();
        for item in items {
            self.generator_current_element = Some(item.clone());
            let elem_frame = frame.push();
            if !crate::pattern::match_into(var, &item, &elem_frame) {
                continue;
            }
            if let Some(cond) = condition {
                let c = self.eval(cond, &elem_frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                if c.is_truthy_bool() != Some(true) {
                    continue;
                }
            }
            let v = self.eval(reducer, &elem_frame)?;
            if self.exception.is_pending() {
                return Ok(Value::Unit);
            }
            out.push(v);
        }
        self.generator_current_element = None;
        if as_set {
            let mut dedup: Vec<Value> = Vec::new();
            for v in out {
                if !dedup.iter().any(|existing| existing.structural_eq(&v)) {
                    dedup.push(v);
                }
            }
            Ok(Value::Set(Rc::new(dedup)))
        } else {
            Ok(Value::seq(out))
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn eval_dict_comprehension(
        &mut self,
        key_reducer: &Expr,
        value_reducer: &Expr,
        key_var: Option<&Pattern>,
        val_var: &Pattern,
        source: &Expr,
        condition: Option<&Expr>,
        frame: &Frame,
    ) -> Result<Value, HostError> {
        let source_val = self.eval(source, frame)?;
        if self.exception.is_pending() {
            return Ok(Value::Unit);
        }
        let Value::Dict(pairs) = source_val else {
            self.raise_runtime(RuntimeErrorKind::TypeError, "dict comprehension source must be a dict", source.context.clone());
            return Ok(Value::Unit);
        };

        let mut out = Vec::new();
        for (k, v) in pairs.iter() {
            self.generator_current_key = Some(k.clone());
            self.generator_current_element = Some(v.clone());
            let entry_frame = frame.push();
            if let Some(key_var) = key_var {
                if !crate::pattern::match_into(key_var, k, &entry_frame) {
                    continue;
                }
            }
            if !crate::pattern::match_into(val_var, v, &entry_frame) {
                continue;
            }
            if let Some(cond) = condition {
                let c = self.eval(cond, &entry_frame)?;
                if self.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                if c.is_truthy_bool() != Some(true) {
                    continue;
                }
            }
            let new_key = self.eval(key_reducer, &entry_frame)?;
            if self.exception.is_pending() {
                return Ok(Value::Unit);
            }
            let new_value = self.eval(value_reducer, &entry_frame)?;
            if self.exception.is_pending() {
                return Ok(Value::Unit);
            }
            out.retain(|(existing_key, _): &(Value, Value)| !existing_key.structural_eq(&new_key));
            out.push((new_key, new_value));
        }
        self.generator_current_key = None;
        self.generator_current_element = None;
        Ok(Value::Dict(Rc::new(out)))
    }
}

fn fqn_parts(fqn: &yona_ast::FqnExpr) -> Vec<String> {
    let mut parts = fqn.package.clone();
    parts.push(fqn.module.clone());
    parts
}

fn make_numeric(n: f64, is_float: bool) -> Value {
    if is_float {
        Value::Float(n)
    } else {
        Value::Int(n.round() as i64)
    }
}

fn literal_value(lit: &yona_ast::Literal) -> Value {
    match lit {
        yona_ast::Literal::Int(i) => Value::Int(*i),
        yona_ast::Literal::Float(f) => Value::Float(*f),
        yona_ast::Literal::Byte(b) => Value::Byte(*b),
        yona_ast::Literal::Char(c) => Value::Char(*c),
        yona_ast::Literal::String(s) => Value::string(s.as_str()),
        yona_ast::Literal::Symbol(s) => Value::symbol(s.as_str()),
        yona_ast::Literal::Unit => Value::Unit,
        yona_ast::Literal::Bool(b) => Value::Bool(*b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yona_ast::{ExprKind, Literal, PatternKind};

    fn ctx() -> SourceContext {
        SourceContext::synthetic()
    }

    fn lit(l: Literal) -> Expr {
        Expr::new(ExprKind::Literal(l), ctx())
    }

    #[test]
    fn evaluates_arithmetic_let_expression() {
        // let x = 2 in x + x * 3
        let mut interp = Interpreter::new(Vec::new());
        let frame = Frame::root();
        let body = Expr::new(
            ExprKind::BinaryOp {
                op: BinOp::Add,
                lhs: Box::new(Expr::new(ExprKind::Identifier("x".into()), ctx())),
                rhs: Box::new(Expr::new(
                    ExprKind::BinaryOp {
                        op: BinOp::Mul,
                        lhs: Box::new(Expr::new(ExprKind::Identifier("x".into()), ctx())),
                        rhs: Box::new(lit(Literal::Int(3))),
                    },
                    ctx(),
                )),
            },
            ctx(),
        );
        let expr = Expr::new(
            ExprKind::Let {
                aliases: vec![Alias { kind: AliasKind::Value { name: "x".into(), expr: lit(Literal::Int(2)) }, context: ctx() }],
                body: Box::new(body),
            },
            ctx(),
        );
        let result = interp.eval(&expr, &frame).unwrap();
        assert_eq!(result, Value::Int(8));
    }

    #[test]
    fn case_head_tail_binds_and_returns_head() {
        let mut interp = Interpreter::new(Vec::new());
        let frame = Frame::root();
        let scrutinee = Expr::new(ExprKind::SeqValues(vec![lit(Literal::Int(1)), lit(Literal::Int(2)), lit(Literal::Int(3))]), ctx());
        let clause = yona_ast::CaseClause {
            pattern: Pattern::new(
                PatternKind::HeadTails {
                    heads: vec![Pattern::new(PatternKind::Identifier("h".into()), ctx())],
                    tail: Box::new(yona_ast::TailPattern::Identifier("t".into())),
                },
                ctx(),
            ),
            guard: None,
            body: Expr::new(ExprKind::Identifier("h".into()), ctx()),
        };
        let expr = Expr::new(ExprKind::Case { scrutinee: Box::new(scrutinee), clauses: vec![clause] }, ctx());
        let result = interp.eval(&expr, &frame).unwrap();
        assert_eq!(result, Value::Int(1));
    }

    #[test]
    fn do_block_short_circuits_after_raise() {
        let mut interp = Interpreter::new(Vec::new());
        let frame = Frame::root();
        let raise = Expr::new(
            ExprKind::Raise { symbol: "X".into(), message: Box::new(lit(Literal::String("m".into()))) },
            ctx(),
        );
        let never = Expr::new(ExprKind::Identifier("never_evaluated".into()), ctx());
        let expr = Expr::new(ExprKind::Do(vec![raise, never]), ctx());
        let result = interp.eval(&expr, &frame).unwrap();
        assert_eq!(result, Value::Unit);
        assert!(interp.exception.is_pending());
    }

    #[test]
    fn try_catch_clears_exception_and_returns_handler_result() {
        let mut interp = Interpreter::new(Vec::new());
        let frame = Frame::root();
        let raise = Expr::new(
            ExprKind::Raise { symbol: "X".into(), message: Box::new(lit(Literal::String("m".into()))) },
            ctx(),
        );
        let catch = yona_ast::CatchClause {
            pattern: Pattern::new(
                PatternKind::Tuple(vec![
                    Pattern::new(PatternKind::Literal(Literal::Symbol("X".into())), ctx()),
                    Pattern::new(PatternKind::Identifier("_msg".into()), ctx()),
                ]),
                ctx(),
            ),
            body: lit(Literal::Int(1)),
        };
        let expr = Expr::new(ExprKind::TryCatch { body: Box::new(raise), catches: vec![catch] }, ctx());
        let result = interp.eval(&expr, &frame).unwrap();
        assert_eq!(result, Value::Int(1));
        assert!(!interp.exception.is_pending());
    }

    #[test]
    fn partial_application_matches_full_application() {
        // f = \x y -> x + y ; (f 1) 2 == f 1 2
        let mut interp = Interpreter::new(Vec::new());
        let frame = Frame::root();
        let add_body = Expr::new(
            ExprKind::BinaryOp {
                op: BinOp::Add,
                lhs: Box::new(Expr::new(ExprKind::Identifier("x".into()), ctx())),
                rhs: Box::new(Expr::new(ExprKind::Identifier("y".into()), ctx())),
            },
            ctx(),
        );
        let func = Value::Function(Rc::new(FunctionValue {
            name: None,
            arity: 2,
            partial: Vec::new(),
            body: FunctionBody::User {
                patterns: Rc::new(vec![
                    Pattern::new(PatternKind::Identifier("x".into()), ctx()),
                    Pattern::new(PatternKind::Identifier("y".into()), ctx()),
                ]),
                bodies: Rc::new(vec![yona_ast::FunctionBody::WithoutGuard(add_body)]),
                frame: frame.clone(),
            },
            constructor_fields: None,
        }));
        let f = func.as_function().unwrap().clone();
        let partial_result = apply::apply(&mut interp, &f, vec![Value::Int(1)], &ctx()).unwrap();
        let partial_fn = partial_result.as_function().unwrap().clone();
        let final_result = apply::apply(&mut interp, &partial_fn, vec![Value::Int(2)], &ctx()).unwrap();
        let direct_result = apply::apply(&mut interp, &f, vec![Value::Int(1), Value::Int(2)], &ctx()).unwrap();
        assert_eq!(final_result, Value::Int(3));
        assert_eq!(final_result, direct_result);
    }
}
