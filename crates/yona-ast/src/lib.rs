//! AST data model for the Yona language core: expressions, patterns, type
//! annotations, and module-level declarations. Pure data, no behavior --
//! construction lives in `yona-syntax`, evaluation in `yona-runtime`,
//! checking in `yona-typeck`.

pub mod expr;
pub mod literal;
pub mod module;
pub mod op;
pub mod pattern;
pub mod type_expr;

pub use expr::{
    Alias, AliasKind, CaseClause, CatchClause, Expr, ExprKind, FqnExpr, FunctionBody, FunctionExpr,
    ImportClause,
};
pub use literal::Literal;
pub use module::{FunctionDecl, ModuleAst, RecordDecl};
pub use op::{BinOp, UnOp};
pub use pattern::{Pattern, PatternKind, TailPattern};
pub use type_expr::{BuiltinTypeKind, TypeExpr, TypeExprKind};
