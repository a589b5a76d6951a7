//! The tree-walking evaluator, pattern matcher, and module loader for
//! Yona (spec §3.2-§3.5, §4.1-§4.9): everything downstream of a parsed
//! [`yona_ast::ModuleAst`].

pub mod exception;
pub mod frame;
pub mod interp;
pub mod modules;
mod natives;
pub mod pattern;
pub mod value;

pub use exception::{ExceptionSlot, Pending};
pub use frame::Frame;
pub use interp::Interpreter;
pub use modules::{ModuleCache, RecordTypeRegistry, default_module_paths};
pub use value::{FunctionBody, FunctionValue, ModuleValue, RecordInfo, RecordValue, Value, ValueKind};
