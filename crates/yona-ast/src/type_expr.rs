use yona_common::SourceContext;

/// Builtin type tags as written in a type signature (spec §3.1 "Types").
/// `Var` is a syntactic placeholder for an inferred type variable, not a
/// concrete builtin -- the original grammar folds it into the same
/// production as the named builtins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinTypeKind {
    Bool,
    Byte,
    Int16,
    Int32,
    Int64,
    Int128,
    UInt16,
    UInt32,
    UInt64,
    UInt128,
    Float32,
    Float64,
    Float128,
    Char,
    StringT,
    Symbol,
    Unit,
    Var,
}

/// A type-annotation node, attached to function declarations and type
/// definitions. This is purely syntactic -- the inferencer (§4.5) builds
/// `yona_types::Ty` values out of it; it never appears at runtime.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeExpr {
    pub kind: TypeExprKind,
    pub context: SourceContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TypeExprKind {
    Builtin(BuiltinTypeKind),
    /// Reference to a user-defined type by name.
    User(String),
    /// `name<params...>` declaration header, e.g. for a sum type's LHS.
    Declaration { name: String, params: Vec<String> },
    /// `name = alt1 | alt2 | ...` sum-type definition.
    Definition { name: String, alternatives: Vec<TypeExpr> },
    /// A constructor application, e.g. `Some(Int)`.
    Instance { name: String, args: Vec<TypeExpr> },
    /// `a1 -> a2 -> ... -> r` function type signature.
    Function { params: Vec<TypeExpr>, result: Box<TypeExpr> },
}

impl TypeExpr {
    pub fn new(kind: TypeExprKind, context: SourceContext) -> Self {
        Self { kind, context }
    }
}
