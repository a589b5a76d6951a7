use yona_common::SourceContext;

use crate::op::{BinOp, UnOp};
use crate::literal::Literal;
use crate::pattern::Pattern;

/// A fully qualified name: package segments plus a trailing module name
/// (spec GLOSSARY "FQN"), e.g. `Std\List` has package `["Std"]` and
/// module `"List"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FqnExpr {
    pub package: Vec<String>,
    pub module: String,
}

impl FqnExpr {
    pub fn new(package: Vec<String>, module: impl Into<String>) -> Self {
        Self { package, module: module.into() }
    }

    /// Slash-joined cache key, matching `yona_runtime::modules`' lookup key.
    pub fn key(&self) -> String {
        let mut parts = self.package.clone();
        parts.push(self.module.clone());
        parts.join("/")
    }
}

impl std::fmt::Display for FqnExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for part in &self.package {
            write!(f, "{part}\\")?;
        }
        write!(f, "{}", self.module)
    }
}

/// One function body: unconditional, or guarded by a boolean expression
/// (spec §3.1 "Control flow" / §4.6 function-expression semantics).
#[derive(Debug, Clone, PartialEq)]
pub enum FunctionBody {
    WithoutGuard(Expr),
    WithGuard { guard: Expr, body: Expr },
}

/// A named or anonymous function: one or more argument patterns, one or
/// more bodies tried guard-first. Closes over its defining frame when
/// evaluated (spec §4.6.1).
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionExpr {
    pub name: Option<String>,
    pub patterns: Vec<Pattern>,
    pub bodies: Vec<FunctionBody>,
    pub context: SourceContext,
}

/// An alias bound inside a `let` or a `do` block (spec §3.1 "Aliases").
#[derive(Debug, Clone, PartialEq)]
pub struct Alias {
    pub kind: AliasKind,
    pub context: SourceContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AliasKind {
    Value { name: String, expr: Expr },
    Lambda { name: String, function: FunctionExpr },
    Pattern { pattern: Pattern, expr: Expr },
    Module { name: String, fqn: FqnExpr, exports: Vec<String> },
    Fqn { name: String, fqn: FqnExpr },
    Function { name: String, target: String },
}

/// One clause of a `case` expression: pattern, optional guard, body.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseClause {
    pub pattern: Pattern,
    pub guard: Option<Expr>,
    pub body: Expr,
}

/// One clause of a `try`/`catch`: the raised value is matched against
/// `pattern` (typically a 2-tuple of symbol and message).
#[derive(Debug, Clone, PartialEq)]
pub struct CatchClause {
    pub pattern: Pattern,
    pub body: Expr,
}

/// An import clause inside an `import ... in ...` expression.
#[derive(Debug, Clone, PartialEq)]
pub enum ImportClause {
    Module { fqn: FqnExpr, alias: Option<String> },
    Functions { fqn: FqnExpr, items: Vec<(String, Option<String>)> },
}

/// The AST for a single expression tree (spec §3.1). Every node carries a
/// [`SourceContext`]; explicit parent back-links from the spec's lifecycle
/// invariants are intentionally not materialized as a separate field here
/// (see DESIGN.md "parent back-links") since the owned recursive structure
/// already gives every consumer top-down traversal, which is all the spec
/// says they're used for.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub context: SourceContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    // ── Literals ──────────────────────────────────────────────────────
    Literal(Literal),

    // ── Values ────────────────────────────────────────────────────────
    Identifier(String),
    Tuple(Vec<Expr>),
    SeqValues(Vec<Expr>),
    SeqRange { start: Box<Expr>, end: Box<Expr>, step: Option<Box<Expr>> },
    Set(Vec<Expr>),
    Dict(Vec<(Expr, Expr)>),
    FqnRef(FqnExpr),
    PackageNameRef(Vec<String>),
    RecordInstance { constructor: String, fields: Vec<(String, Expr)> },

    // ── Operators ─────────────────────────────────────────────────────
    BinaryOp { op: BinOp, lhs: Box<Expr>, rhs: Box<Expr> },
    UnaryOp { op: UnOp, expr: Box<Expr> },

    // ── Control flow ──────────────────────────────────────────────────
    If { cond: Box<Expr>, then_branch: Box<Expr>, else_branch: Box<Expr> },
    Let { aliases: Vec<Alias>, body: Box<Expr> },
    Do(Vec<Expr>),
    Case { scrutinee: Box<Expr>, clauses: Vec<CaseClause> },
    TryCatch { body: Box<Expr>, catches: Vec<CatchClause> },
    Raise { symbol: String, message: Box<Expr> },
    With { resource: Box<Expr>, name: Option<String>, body: Box<Expr> },
    FieldAccess { target: Box<Expr>, field: String },
    FieldUpdate { target: Box<Expr>, updates: Vec<(String, Expr)> },

    // ── Functions / calls ────────────────────────────────────────────
    Function(FunctionExpr),
    /// Reference to a module-local function by bare name; a "name call"
    /// callee before application.
    NameRef(String),
    /// `alias\name` -- reference through a module alias bound by `let`.
    AliasRef { alias: String, name: String },
    /// `Fqn::name` -- reference through a fully qualified module path.
    ModuleRef { fqn: FqnExpr, name: String },
    Apply { callee: Box<Expr>, positional: Vec<Expr>, named: Vec<(String, Expr)> },

    // ── Imports ───────────────────────────────────────────────────────
    Import { clauses: Vec<ImportClause>, body: Box<Expr> },

    // ── Comprehensions ────────────────────────────────────────────────
    SeqComprehension { reducer: Box<Expr>, var: Pattern, source: Box<Expr>, condition: Option<Box<Expr>> },
    SetComprehension { reducer: Box<Expr>, var: Pattern, source: Box<Expr>, condition: Option<Box<Expr>> },
    DictComprehension {
        key_reducer: Box<Expr>,
        value_reducer: Box<Expr>,
        key_var: Option<Pattern>,
        val_var: Pattern,
        source: Box<Expr>,
        condition: Option<Box<Expr>>,
    },
}

impl Expr {
    pub fn new(kind: ExprKind, context: SourceContext) -> Self {
        Self { kind, context }
    }
}
