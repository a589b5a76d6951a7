//! Partial application and currying (spec §4.6 "Apply", §4.6.1 function-
//! value invariants).

use std::rc::Rc;

use yona_ast::FunctionBody as AstFunctionBody;
use yona_common::{HostError, RuntimeErrorKind, SourceContext};

use crate::frame::Frame;
use crate::pattern::match_pattern;
use crate::value::{FunctionBody, FunctionValue, Value};

use super::Interpreter;

/// Reorders evaluated named arguments to match a record constructor's
/// declared field order, appending them after `positional` (spec §4.6
/// "Apply" step 3).
pub fn combine_named_args(
    constructor_fields: Option<&Rc<Vec<String>>>,
    positional: Vec<Value>,
    named: Vec<(String, Value)>,
) -> Result<Vec<Value>, (RuntimeErrorKind, String)> {
    if named.is_empty() {
        return Ok(positional);
    }
    let Some(fields) = constructor_fields else {
        return Err((RuntimeErrorKind::Runtime, "named arguments are only allowed when calling a record constructor".into()));
    };
    let mut result = positional;
    if result.len() > fields.len() {
        return Err((RuntimeErrorKind::Runtime, "too many positional arguments for record constructor".into()));
    }
    for field_name in fields.iter().skip(result.len()) {
        match named.iter().find(|(n, _)| n == field_name) {
            Some((_, v)) => result.push(v.clone()),
            None => return Err((RuntimeErrorKind::FieldNotFound, format!("missing field `{field_name}`"))),
        }
    }
    let unused_extra = named.iter().any(|(n, _)| !fields.contains(n));
    if unused_extra || result.len() != fields.len() {
        return Err((RuntimeErrorKind::FieldNotFound, "unexpected field in record construction".into()));
    }
    Ok(result)
}

/// Applies `func` to `args` following the currying/partial-application
/// algorithm (spec §4.6 "Apply" steps 4-7, §4.6.1).
pub fn apply(interp: &mut Interpreter, func: &Rc<FunctionValue>, args: Vec<Value>, context: &SourceContext) -> Result<Value, HostError> {
    let mut combined = func.partial.clone();
    let original_arity = func.partial.len() + func.arity;

    if args.len() < func.arity {
        let remaining_arity = func.arity - args.len();
        combined.extend(args);
        let remaining = FunctionValue {
            name: func.name.clone(),
            arity: remaining_arity,
            partial: combined,
            body: func.body.clone(),
            constructor_fields: func.constructor_fields.clone(),
        };
        return Ok(Value::Function(Rc::new(remaining)));
    }

    if args.len() == func.arity {
        combined.extend(args);
        return invoke_body(interp, func, combined, context);
    }

    // args.len() > func.arity: invoke with exactly the needed prefix, then
    // raise -- the excess is never auto-applied to the result (spec §4.6
    // "Apply" step 7).
    let mut iter = args.into_iter();
    let needed: Vec<Value> = (&mut iter).take(func.arity).collect();
    combined.extend(needed);
    debug_assert_eq!(combined.len(), original_arity);
    let _ = invoke_body(interp, func, combined, context)?;
    interp.raise_runtime(RuntimeErrorKind::Runtime, "too many arguments applied to function", context.clone());
    Ok(Value::Unit)
}

fn invoke_body(interp: &mut Interpreter, func: &Rc<FunctionValue>, args: Vec<Value>, context: &SourceContext) -> Result<Value, HostError> {
    match &func.body {
        FunctionBody::Native(native) => native(&args).map_err(|e| {
            if e.context.is_some() {
                e
            } else {
                HostError::at(e.message.clone(), context.clone())
            }
        }),
        FunctionBody::User { patterns, bodies, frame } => invoke_user_body(interp, patterns, bodies, frame, args, context),
    }
}

fn invoke_user_body(
    interp: &mut Interpreter,
    patterns: &Rc<Vec<yona_ast::Pattern>>,
    bodies: &Rc<Vec<AstFunctionBody>>,
    closed_over: &Frame,
    args: Vec<Value>,
    context: &SourceContext,
) -> Result<Value, HostError> {
    let call_frame = closed_over.push();
    for (pattern, arg) in patterns.iter().zip(args.iter()) {
        if !match_pattern(pattern, arg, &call_frame) {
            interp.raise_runtime(RuntimeErrorKind::NoMatch, "function argument pattern did not match", context.clone());
            return Ok(Value::Unit);
        }
    }

    for body in bodies.iter() {
        match body {
            AstFunctionBody::WithoutGuard(expr) => return interp.eval(expr, &call_frame),
            AstFunctionBody::WithGuard { guard, body } => {
                let guard_val = interp.eval(guard, &call_frame)?;
                if interp.exception.is_pending() {
                    return Ok(Value::Unit);
                }
                match guard_val.is_truthy_bool() {
                    Some(true) => return interp.eval(body, &call_frame),
                    Some(false) => continue,
                    None => {
                        interp.raise_runtime(RuntimeErrorKind::TypeError, "guard expression must be Bool", context.clone());
                        return Ok(Value::Unit);
                    }
                }
            }
        }
    }

    interp.raise_runtime(RuntimeErrorKind::GuardFailed, "no function body's guard held", context.clone());
    Ok(Value::Unit)
}
