//! Type representation, substitution, and unification for the Yona type
//! system. Separated from `yona-typeck` (which walks the AST) the same
//! way the interpreter's value model is separated from its evaluator.

pub mod scheme;
pub mod subst;
pub mod ty;
pub mod unify;

pub use scheme::{generalize, instantiate};
pub use subst::Substitution;
pub use ty::{BuiltinTy, CollectionKind, Scheme, Ty, TyVar};
pub use unify::{unify, UnifyError};
