//! Type representation for the Yona type system (spec §3.4).
//!
//! Defines `Ty`, the tree of builtin/named/function/sum/product/collection/
//! dict/record type shapes, plus `TyVar` and `Scheme`. The source material
//! represents type variables as named types whose name starts with a
//! lowercase letter or digit; here they get their own variant, since a
//! dedicated tag is strictly easier to pattern-match on than sniffing a
//! name's first character.

use std::fmt;

/// A type variable, identified by a monotonically increasing index.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TyVar(pub u32);

/// The two single-item collection kinds that share unification rules
/// (spec §4.4 rule 4).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Seq,
    Set,
}

/// Builtin scalar type tags.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BuiltinTy {
    Bool,
    Byte,
    Int,
    Float,
    Char,
    String,
    Symbol,
    Unit,
}

impl fmt::Display for BuiltinTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BuiltinTy::Bool => "Bool",
            BuiltinTy::Byte => "Byte",
            BuiltinTy::Int => "Int",
            BuiltinTy::Float => "Float",
            BuiltinTy::Char => "Char",
            BuiltinTy::String => "String",
            BuiltinTy::Symbol => "Symbol",
            BuiltinTy::Unit => "Unit",
        };
        write!(f, "{s}")
    }
}

/// A Yona type (spec §3.4).
#[derive(Clone, Debug, PartialEq)]
pub enum Ty {
    Var(TyVar),
    Builtin(BuiltinTy),
    /// A user-defined named type, optionally parameterized by one inner
    /// type, e.g. `Option<Int>` is `Named { name: "Option", inner: Some(Int) }`.
    Named { name: String, inner: Option<Box<Ty>> },
    Function { arg: Box<Ty>, ret: Box<Ty> },
    /// Unordered set of alternatives making up a sum type.
    Sum(Vec<Ty>),
    /// Ordered list of element types making up a tuple.
    Product(Vec<Ty>),
    Collection { kind: CollectionKind, item: Box<Ty> },
    Dict { key: Box<Ty>, value: Box<Ty> },
    Record { name: String, fields: Vec<(String, Ty)> },
}

impl Ty {
    pub fn bool() -> Ty {
        Ty::Builtin(BuiltinTy::Bool)
    }

    pub fn int() -> Ty {
        Ty::Builtin(BuiltinTy::Int)
    }

    pub fn float() -> Ty {
        Ty::Builtin(BuiltinTy::Float)
    }

    pub fn byte() -> Ty {
        Ty::Builtin(BuiltinTy::Byte)
    }

    pub fn string() -> Ty {
        Ty::Builtin(BuiltinTy::String)
    }

    pub fn char() -> Ty {
        Ty::Builtin(BuiltinTy::Char)
    }

    pub fn symbol() -> Ty {
        Ty::Builtin(BuiltinTy::Symbol)
    }

    pub fn unit() -> Ty {
        Ty::Builtin(BuiltinTy::Unit)
    }

    pub fn function(arg: Ty, ret: Ty) -> Ty {
        Ty::Function { arg: Box::new(arg), ret: Box::new(ret) }
    }

    /// Builds `a1 -> a2 -> ... -> r`, right-associated (spec §4.5 function
    /// inference rule).
    pub fn curried(params: Vec<Ty>, result: Ty) -> Ty {
        params.into_iter().rev().fold(result, |acc, p| Ty::function(p, acc))
    }

    pub fn seq(item: Ty) -> Ty {
        Ty::Collection { kind: CollectionKind::Seq, item: Box::new(item) }
    }

    pub fn set(item: Ty) -> Ty {
        Ty::Collection { kind: CollectionKind::Set, item: Box::new(item) }
    }

    pub fn dict(key: Ty, value: Ty) -> Ty {
        Ty::Dict { key: Box::new(key), value: Box::new(value) }
    }

    /// Numeric promotion rank: Byte < Int < Float (spec §4.1, §4.5).
    pub fn numeric_rank(&self) -> Option<u8> {
        match self {
            Ty::Builtin(BuiltinTy::Byte) => Some(0),
            Ty::Builtin(BuiltinTy::Int) => Some(1),
            Ty::Builtin(BuiltinTy::Float) => Some(2),
            _ => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.numeric_rank().is_some()
    }

    /// The promoted type of two numeric operands, picking the higher rank.
    pub fn promote_numeric(a: &Ty, b: &Ty) -> Option<Ty> {
        match (a.numeric_rank(), b.numeric_rank()) {
            (Some(ra), Some(rb)) => Some(if ra >= rb { a.clone() } else { b.clone() }),
            _ => None,
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Var(v) => write!(f, "t{}", v.0),
            Ty::Builtin(b) => write!(f, "{b}"),
            Ty::Named { name, inner: None } => write!(f, "{name}"),
            Ty::Named { name, inner: Some(inner) } => write!(f, "{name}<{inner}>"),
            Ty::Function { arg, ret } => write!(f, "({arg} -> {ret})"),
            Ty::Sum(alts) => {
                let parts: Vec<String> = alts.iter().map(|t| t.to_string()).collect();
                write!(f, "{}", parts.join(" | "))
            }
            Ty::Product(elems) => {
                write!(f, "(")?;
                for (i, e) in elems.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{e}")?;
                }
                write!(f, ")")
            }
            Ty::Collection { kind, item } => {
                let tag = match kind {
                    CollectionKind::Seq => "Seq",
                    CollectionKind::Set => "Set",
                };
                write!(f, "{tag}<{item}>")
            }
            Ty::Dict { key, value } => write!(f, "Dict<{key}, {value}>"),
            Ty::Record { name, .. } => write!(f, "{name}"),
        }
    }
}

/// A polymorphic type scheme: `forall vars. ty` (spec §4.5 generalization).
#[derive(Clone, Debug, PartialEq)]
pub struct Scheme {
    pub vars: Vec<TyVar>,
    pub ty: Ty,
}

impl Scheme {
    pub fn mono(ty: Ty) -> Self {
        Scheme { vars: Vec::new(), ty }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curried_builds_right_associated_function() {
        let ty = Ty::curried(vec![Ty::int(), Ty::int()], Ty::int());
        assert_eq!(ty.to_string(), "(Int -> (Int -> Int))");
    }

    #[test]
    fn numeric_promotion_prefers_higher_rank() {
        assert_eq!(Ty::promote_numeric(&Ty::byte(), &Ty::int()), Some(Ty::int()));
        assert_eq!(Ty::promote_numeric(&Ty::int(), &Ty::float()), Some(Ty::float()));
        assert_eq!(Ty::promote_numeric(&Ty::string(), &Ty::int()), None);
    }
}
