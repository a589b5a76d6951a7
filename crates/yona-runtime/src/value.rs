//! Runtime values (spec §3.2, §4.1): a discriminated union with structural,
//! recursive equality and a numeric promotion order `Byte ⊂ Int ⊂ Float`.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use yona_ast::{FunctionBody as AstFunctionBody, Pattern};
use yona_common::HostError;

use crate::frame::Frame;

/// A native function body: arity is tracked separately on the owning
/// [`Function`]; this just computes a result from already-evaluated
/// arguments (spec §4.7.1).
pub type NativeFn = Rc<dyn Fn(&[Value]) -> Result<Value, HostError>>;

#[derive(Clone)]
pub enum FunctionBody {
    Native(NativeFn),
    User { patterns: Rc<Vec<Pattern>>, bodies: Rc<Vec<AstFunctionBody>>, frame: Frame },
}

impl fmt::Debug for FunctionBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FunctionBody::Native(_) => write!(f, "Native(..)"),
            FunctionBody::User { patterns, .. } => write!(f, "User(arity={})", patterns.len()),
        }
    }
}

/// A function value (spec §3.2, §4.6.1): FQN of origin (if any), *remaining*
/// arity after captured partial arguments, the partial-argument prefix, and
/// the body.
#[derive(Clone, Debug)]
pub struct FunctionValue {
    pub name: Option<String>,
    pub arity: usize,
    pub partial: Vec<Value>,
    pub body: FunctionBody,
    /// Present only for record constructor functions, naming the fields in
    /// declaration order; lets `apply` reorder named arguments (spec §4.6
    /// "Apply" step 3).
    pub constructor_fields: Option<Rc<Vec<String>>>,
}

#[derive(Clone, Debug)]
pub struct RecordValue {
    pub constructor: Rc<str>,
    pub fields: Rc<Vec<String>>,
    pub values: Vec<Value>,
}

impl RecordValue {
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.iter().position(|f| f == name).map(|i| &self.values[i])
    }
}

#[derive(Clone, Debug)]
pub struct RecordInfo {
    pub name: String,
    pub fields: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ModuleValue {
    pub fqn: Vec<String>,
    pub exports: rustc_hash::FxHashMap<String, Value>,
    pub records: rustc_hash::FxHashMap<String, RecordInfo>,
}

/// A runtime value (spec §3.2). Compound payloads are `Rc`-shared so that
/// cloning a `Value` is cheap and values have no in-place mutation (spec
/// §5 "Shared-resource policy").
#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Float(f64),
    Byte(u8),
    Char(char),
    String(Rc<str>),
    Symbol(Rc<str>),
    Bool(bool),
    Unit,
    Tuple(Rc<Vec<Value>>),
    Seq(Rc<Vec<Value>>),
    Set(Rc<Vec<Value>>),
    Dict(Rc<Vec<(Value, Value)>>),
    Record(Rc<RecordValue>),
    Fqn(Rc<Vec<String>>),
    Module(Rc<ModuleValue>),
    Function(Rc<FunctionValue>),
}

/// The "kind" tag used in *type-kind error* messages (spec §4.1
/// "destructuring access that fails with a type-kind error").
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    Int,
    Float,
    Byte,
    Char,
    String,
    Symbol,
    Bool,
    Unit,
    Tuple,
    Seq,
    Set,
    Dict,
    Record,
    Fqn,
    Module,
    Function,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl Value {
    pub fn string(s: impl Into<Rc<str>>) -> Value {
        Value::String(s.into())
    }

    pub fn symbol(s: impl Into<Rc<str>>) -> Value {
        Value::Symbol(s.into())
    }

    pub fn seq(values: Vec<Value>) -> Value {
        Value::Seq(Rc::new(values))
    }

    pub fn tuple(values: Vec<Value>) -> Value {
        Value::Tuple(Rc::new(values))
    }

    pub fn kind(&self) -> ValueKind {
        match self {
            Value::Int(_) => ValueKind::Int,
            Value::Float(_) => ValueKind::Float,
            Value::Byte(_) => ValueKind::Byte,
            Value::Char(_) => ValueKind::Char,
            Value::String(_) => ValueKind::String,
            Value::Symbol(_) => ValueKind::Symbol,
            Value::Bool(_) => ValueKind::Bool,
            Value::Unit => ValueKind::Unit,
            Value::Tuple(_) => ValueKind::Tuple,
            Value::Seq(_) => ValueKind::Seq,
            Value::Set(_) => ValueKind::Set,
            Value::Dict(_) => ValueKind::Dict,
            Value::Record(_) => ValueKind::Record,
            Value::Fqn(_) => ValueKind::Fqn,
            Value::Module(_) => ValueKind::Module,
            Value::Function(_) => ValueKind::Function,
        }
    }

    pub fn as_seq(&self) -> Option<&[Value]> {
        match self {
            Value::Seq(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<FunctionValue>> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Rc<RecordValue>> {
        match self {
            Value::Record(r) => Some(r),
            _ => None,
        }
    }

    /// Numeric promotion rank, or `None` for non-numeric kinds (spec §4.1
    /// "Byte ⊂ Int ⊂ Float").
    fn numeric_rank(&self) -> Option<u8> {
        match self {
            Value::Byte(_) => Some(0),
            Value::Int(_) => Some(1),
            Value::Float(_) => Some(2),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Byte(b) => Some(*b as f64),
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn is_truthy_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Structural, recursive equality (spec §4.1). Sets compare as
    /// multisets, dicts as unordered sets of pairs, records by name and
    /// field equality, functions by identity of the captured body.
    pub fn structural_eq(&self, other: &Value) -> bool {
        if self.numeric_rank().is_some() && other.numeric_rank().is_some() {
            return self.as_f64() == other.as_f64();
        }
        match (self, other) {
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Unit, Value::Unit) => true,
            (Value::Tuple(a), Value::Tuple(b)) | (Value::Seq(a), Value::Seq(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x.structural_eq(y))
            }
            (Value::Set(a), Value::Set(b)) => {
                a.len() == b.len() && a.iter().all(|x| b.iter().any(|y| x.structural_eq(y)))
            }
            (Value::Dict(a), Value::Dict(b)) => {
                a.len() == b.len()
                    && a.iter().all(|(k, v)| {
                        b.iter().any(|(k2, v2)| k.structural_eq(k2) && v.structural_eq(v2))
                    })
            }
            (Value::Record(a), Value::Record(b)) => {
                a.constructor == b.constructor
                    && a.fields == b.fields
                    && a.values.iter().zip(b.values.iter()).all(|(x, y)| x.structural_eq(y))
            }
            (Value::Fqn(a), Value::Fqn(b)) => a == b,
            (Value::Module(a), Value::Module(b)) => Rc::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Ordering is defined only on numeric kinds (spec §4.1).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self.numeric_rank(), other.numeric_rank()) {
            (Some(_), Some(_)) => self.as_f64().partial_cmp(&other.as_f64()),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.structural_eq(other)
    }
}

/// User-facing rendering (used by `Io.println`/`print` and the CLI/REPL to
/// show a result) -- not the same as the debug repr, and not part of any
/// equality or hashing contract.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Byte(b) => write!(f, "{b}b"),
            Value::Char(c) => write!(f, "{c}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Symbol(s) => write!(f, ":{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Unit => write!(f, "()"),
            Value::Tuple(items) => {
                write!(f, "(")?;
                write_joined(f, items.iter())?;
                write!(f, ")")
            }
            Value::Seq(items) => {
                write!(f, "[")?;
                write_joined(f, items.iter())?;
                write!(f, "]")
            }
            Value::Set(items) => {
                write!(f, "{{")?;
                write_joined(f, items.iter())?;
                write!(f, "}}")
            }
            Value::Dict(entries) => {
                write!(f, "{{")?;
                for (i, (k, v)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: {v}")?;
                }
                write!(f, "}}")
            }
            Value::Record(r) => {
                write!(f, "{}{{", r.constructor)?;
                for (i, field) in r.fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", field, r.values[i])?;
                }
                write!(f, "}}")
            }
            Value::Fqn(parts) => write!(f, "{}", parts.join("\\")),
            Value::Module(m) => write!(f, "<module {}>", m.fqn.join("\\")),
            Value::Function(func) => match &func.name {
                Some(name) => write!(f, "<function {name}>"),
                None => write!(f, "<function>"),
            },
        }
    }
}

fn write_joined<'a>(f: &mut fmt::Formatter<'_>, items: impl Iterator<Item = &'a Value>) -> fmt::Result {
    for (i, item) in items.enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_int_float_cross_promote_equal() {
        assert!(Value::Byte(2).structural_eq(&Value::Int(2)));
        assert!(Value::Int(2).structural_eq(&Value::Float(2.0)));
    }

    #[test]
    fn sets_compare_as_multisets() {
        let a = Value::Set(Rc::new(vec![Value::Int(1), Value::Int(2)]));
        let b = Value::Set(Rc::new(vec![Value::Int(2), Value::Int(1)]));
        assert!(a.structural_eq(&b));
    }

    #[test]
    fn records_compare_by_name_and_fields() {
        let r1 = Value::Record(Rc::new(RecordValue {
            constructor: "Point".into(),
            fields: Rc::new(vec!["x".into(), "y".into()]),
            values: vec![Value::Int(1), Value::Int(2)],
        }));
        let r2 = Value::Record(Rc::new(RecordValue {
            constructor: "Point".into(),
            fields: Rc::new(vec!["x".into(), "y".into()]),
            values: vec![Value::Int(1), Value::Int(2)],
        }));
        assert!(r1.structural_eq(&r2));
    }

    #[test]
    fn non_numeric_kinds_do_not_order() {
        assert_eq!(Value::string("a").compare(&Value::string("b")), None);
    }

    #[test]
    fn display_renders_seq_and_symbol() {
        let v = Value::seq(vec![Value::Int(1), Value::symbol("ok")]);
        assert_eq!(v.to_string(), "[1, :ok]");
    }
}
