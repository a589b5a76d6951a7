//! Hindley-Milner type inference over the Yona AST (spec §4.5). Advisory:
//! the interpreter in `yona-runtime` never requires this to have run.

pub mod env;
pub mod infer;
pub mod records;

pub use env::TypeFrame;
pub use infer::{Annotations, TypeInferencer};
pub use records::{RecordInfo, RecordRegistry};
