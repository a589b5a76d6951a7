//! Value-level arithmetic/comparison/logical operators (spec §4.6
//! "Arithmetic and comparison follow the same promotion table as the type
//! rules"). Pure functions: failures are returned for the caller to raise
//! through the exception slot with the right source context.

use std::rc::Rc;

use yona_ast::{BinOp, UnOp};
use yona_common::RuntimeErrorKind;

use crate::value::Value;

pub struct OpFault {
    pub kind: RuntimeErrorKind,
    pub message: String,
}

impl OpFault {
    fn runtime(message: impl Into<String>) -> Self {
        Self { kind: RuntimeErrorKind::Runtime, message: message.into() }
    }

    fn type_error(message: impl Into<String>) -> Self {
        Self { kind: RuntimeErrorKind::TypeError, message: message.into() }
    }
}

fn promote_numeric(a: &Value, b: &Value, op: &str) -> Result<(f64, f64, bool), OpFault> {
    let is_int = matches!(a, Value::Int(_) | Value::Byte(_)) && matches!(b, Value::Int(_) | Value::Byte(_));
    let (Some(x), Some(y)) = (as_f64(a), as_f64(b)) else {
        return Err(OpFault::type_error(format!(
            "`{op}` requires numeric operands, found {:?} and {:?}",
            a.kind(),
            b.kind()
        )));
    };
    Ok((x, y, is_int))
}

fn as_f64(v: &Value) -> Option<f64> {
    match v {
        Value::Byte(b) => Some(*b as f64),
        Value::Int(i) => Some(*i as f64),
        Value::Float(f) => Some(*f),
        _ => None,
    }
}

fn as_i64(v: &Value, op: &str) -> Result<i64, OpFault> {
    match v {
        Value::Byte(b) => Ok(*b as i64),
        Value::Int(i) => Ok(*i),
        other => Err(OpFault::type_error(format!("`{op}` requires an integer operand, found {:?}", other.kind()))),
    }
}

fn as_bool(v: &Value, op: &str) -> Result<bool, OpFault> {
    v.is_truthy_bool().ok_or_else(|| OpFault::type_error(format!("`{op}` requires a Bool operand, found {:?}", v.kind())))
}

fn as_seq(v: &Value) -> Option<Rc<Vec<Value>>> {
    match v {
        Value::Seq(items) => Some(items.clone()),
        Value::Set(items) => Some(items.clone()),
        _ => None,
    }
}

pub fn eval_binop(op: BinOp, lhs: Value, rhs: Value) -> Result<Value, OpFault> {
    use BinOp::*;
    match op {
        Add => match (&lhs, &rhs) {
            (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
            _ => {
                let (x, y, is_int) = promote_numeric(&lhs, &rhs, "+")?;
                Ok(if is_int { Value::Int(x as i64 + y as i64) } else { Value::Float(x + y) })
            }
        },
        Sub => {
            let (x, y, is_int) = promote_numeric(&lhs, &rhs, "-")?;
            Ok(if is_int { Value::Int(x as i64 - y as i64) } else { Value::Float(x - y) })
        }
        Mul => {
            let (x, y, is_int) = promote_numeric(&lhs, &rhs, "*")?;
            Ok(if is_int { Value::Int(x as i64 * y as i64) } else { Value::Float(x * y) })
        }
        Div => {
            let (x, y, _) = promote_numeric(&lhs, &rhs, "/")?;
            if y == 0.0 {
                return Err(OpFault::runtime("division by zero"));
            }
            Ok(Value::Float(x / y))
        }
        Mod => {
            let a = as_i64(&lhs, "%")?;
            let b = as_i64(&rhs, "%")?;
            if b == 0 {
                return Err(OpFault::runtime("modulo by zero"));
            }
            Ok(Value::Int(a % b))
        }
        Pow => {
            let (x, y, _) = promote_numeric(&lhs, &rhs, "**")?;
            Ok(Value::Float(x.powf(y)))
        }
        Lt => order(&lhs, &rhs, "<", |o| o.is_lt()),
        Le => order(&lhs, &rhs, "<=", |o| o.is_le()),
        Gt => order(&lhs, &rhs, ">", |o| o.is_gt()),
        Ge => order(&lhs, &rhs, ">=", |o| o.is_ge()),
        Eq => Ok(Value::Bool(lhs.structural_eq(&rhs))),
        Neq => Ok(Value::Bool(!lhs.structural_eq(&rhs))),
        And => Ok(Value::Bool(as_bool(&lhs, "&&")? && as_bool(&rhs, "&&")?)),
        Or => Ok(Value::Bool(as_bool(&lhs, "||")? || as_bool(&rhs, "||")?)),
        BitAnd => Ok(Value::Int(as_i64(&lhs, "&")? & as_i64(&rhs, "&")?)),
        BitOr => Ok(Value::Int(as_i64(&lhs, "|")? | as_i64(&rhs, "|")?)),
        BitXor => Ok(Value::Int(as_i64(&lhs, "^")? ^ as_i64(&rhs, "^")?)),
        Shl => Ok(Value::Int(as_i64(&lhs, "<<")? << as_i64(&rhs, "<<")?)),
        Shr => Ok(Value::Int(as_i64(&lhs, ">>")? >> as_i64(&rhs, ">>")?)),
        Zshr => Ok(Value::Int(((as_i64(&lhs, ">>>")? as u64) >> as_i64(&rhs, ">>>")?) as i64)),
        ConsLeft => match as_seq(&rhs) {
            Some(items) => {
                let mut out = Vec::with_capacity(items.len() + 1);
                out.push(lhs);
                out.extend(items.iter().cloned());
                Ok(Value::seq(out))
            }
            None => Err(OpFault::type_error("`::` requires a sequence on the right")),
        },
        ConsRight => match as_seq(&lhs) {
            Some(items) => {
                let mut out = items.as_ref().clone();
                out.push(rhs);
                Ok(Value::seq(out))
            }
            None => Err(OpFault::type_error("`:>` requires a sequence on the left")),
        },
        Join => match (&lhs, &rhs) {
            (Value::String(a), Value::String(b)) => Ok(Value::string(format!("{a}{b}"))),
            _ => match (as_seq(&lhs), as_seq(&rhs)) {
                (Some(a), Some(b)) => {
                    let mut out = a.as_ref().clone();
                    out.extend(b.iter().cloned());
                    Ok(Value::seq(out))
                }
                _ => Err(OpFault::type_error("`++` requires two sequences or two strings")),
            },
        },
        In => {
            let found = match &rhs {
                Value::Seq(items) | Value::Set(items) => items.iter().any(|v| v.structural_eq(&lhs)),
                Value::Dict(pairs) => pairs.iter().any(|(k, _)| k.structural_eq(&lhs)),
                _ => return Err(OpFault::type_error("`in` requires a collection on the right")),
            };
            Ok(Value::Bool(found))
        }
        PipeLeft | PipeRight => {
            unreachable!("pipe operators are desugared to Apply by the interpreter before reaching eval_binop")
        }
    }
}

fn order(lhs: &Value, rhs: &Value, op: &str, f: impl Fn(std::cmp::Ordering) -> bool) -> Result<Value, OpFault> {
    match lhs.compare(rhs) {
        Some(ord) => Ok(Value::Bool(f(ord))),
        None => Err(OpFault::type_error(format!("`{op}` requires numeric operands, found {:?} and {:?}", lhs.kind(), rhs.kind()))),
    }
}

pub fn eval_unop(op: UnOp, val: Value) -> Result<Value, OpFault> {
    match op {
        UnOp::Not => Ok(Value::Bool(!as_bool(&val, "!")?)),
        UnOp::BitNot => Ok(Value::Int(!as_i64(&val, "~")?)),
        UnOp::Neg => match val {
            Value::Int(i) => Ok(Value::Int(-i)),
            Value::Float(f) => Ok(Value::Float(-f)),
            Value::Byte(b) => Ok(Value::Int(-(b as i64))),
            other => Err(OpFault::type_error(format!("unary `-` requires a numeric operand, found {:?}", other.kind()))),
        },
    }
}
