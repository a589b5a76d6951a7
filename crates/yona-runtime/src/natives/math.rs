//! `Std\Math` -- native module for floating-point math (grounded on the
//! original implementation's `math_module`).

use std::rc::Rc;

use yona_common::HostError;

use crate::modules::{build_native_module, NativeExport};
use crate::value::{ModuleValue, Value};

fn expect_f64(args: &[Value], idx: usize, fn_name: &str) -> Result<f64, HostError> {
    match args.get(idx) {
        Some(Value::Float(f)) => Ok(*f),
        Some(Value::Int(i)) => Ok(*i as f64),
        Some(Value::Byte(b)) => Ok(*b as f64),
        Some(other) => Err(HostError::new(format!("{fn_name}: expected a number, found {:?}", other.kind()))),
        None => Err(HostError::new(format!("{fn_name}: missing argument {idx}"))),
    }
}

macro_rules! unary {
    ($name:ident, $fn_name:literal, $op:expr) => {
        fn $name(args: &[Value]) -> Result<Value, HostError> {
            let x = expect_f64(args, 0, $fn_name)?;
            let op: fn(f64) -> f64 = $op;
            Ok(Value::Float(op(x)))
        }
    };
}

unary!(sin, "sin", f64::sin);
unary!(cos, "cos", f64::cos);
unary!(tan, "tan", f64::tan);
unary!(asin, "asin", f64::asin);
unary!(acos, "acos", f64::acos);
unary!(atan, "atan", f64::atan);
unary!(exp, "exp", f64::exp);
unary!(log, "log", f64::ln);
unary!(log10, "log10", f64::log10);
unary!(sqrt, "sqrt", f64::sqrt);
unary!(ceil, "ceil", f64::ceil);
unary!(floor, "floor", f64::floor);
unary!(round, "round", f64::round);
unary!(abs, "abs", f64::abs);

fn atan2(args: &[Value]) -> Result<Value, HostError> {
    let y = expect_f64(args, 0, "atan2")?;
    let x = expect_f64(args, 1, "atan2")?;
    Ok(Value::Float(y.atan2(x)))
}

fn pow(args: &[Value]) -> Result<Value, HostError> {
    let base = expect_f64(args, 0, "pow")?;
    let exponent = expect_f64(args, 1, "pow")?;
    Ok(Value::Float(base.powf(exponent)))
}

fn pi(_args: &[Value]) -> Result<Value, HostError> {
    Ok(Value::Float(std::f64::consts::PI))
}

fn e(_args: &[Value]) -> Result<Value, HostError> {
    Ok(Value::Float(std::f64::consts::E))
}

pub fn module() -> (String, Rc<ModuleValue>) {
    build_native_module(
        &["Std"],
        "Math",
        vec![
            NativeExport { name: "sin", arity: 1, func: Rc::new(sin) },
            NativeExport { name: "cos", arity: 1, func: Rc::new(cos) },
            NativeExport { name: "tan", arity: 1, func: Rc::new(tan) },
            NativeExport { name: "asin", arity: 1, func: Rc::new(asin) },
            NativeExport { name: "acos", arity: 1, func: Rc::new(acos) },
            NativeExport { name: "atan", arity: 1, func: Rc::new(atan) },
            NativeExport { name: "atan2", arity: 2, func: Rc::new(atan2) },
            NativeExport { name: "exp", arity: 1, func: Rc::new(exp) },
            NativeExport { name: "log", arity: 1, func: Rc::new(log) },
            NativeExport { name: "log10", arity: 1, func: Rc::new(log10) },
            NativeExport { name: "pow", arity: 2, func: Rc::new(pow) },
            NativeExport { name: "sqrt", arity: 1, func: Rc::new(sqrt) },
            NativeExport { name: "ceil", arity: 1, func: Rc::new(ceil) },
            NativeExport { name: "floor", arity: 1, func: Rc::new(floor) },
            NativeExport { name: "round", arity: 1, func: Rc::new(round) },
            NativeExport { name: "abs", arity: 1, func: Rc::new(abs) },
            NativeExport { name: "pi", arity: 0, func: Rc::new(pi) },
            NativeExport { name: "e", arity: 0, func: Rc::new(e) },
        ],
    )
}
