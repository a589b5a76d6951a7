//! Shared types for the Yona core.
//!
//! - [`span`]: byte-offset spans, source contexts, line-index for diagnostics
//! - [`error`]: the error taxonomy shared across lexer, parser, type checker,
//!   and interpreter (spec §6.5, §7)
//! - [`diagnostics`]: uniform source-snippet rendering for any of the above

pub mod diagnostics;
pub mod error;
pub mod span;

pub use error::{HostError, LexError, LexErrorKind, ParseError, ParseErrorKind, RuntimeErrorKind, TypeError, TypeErrorKind};
pub use span::{LineIndex, SourceContext, Span};
