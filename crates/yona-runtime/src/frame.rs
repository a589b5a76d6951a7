//! Frames (spec §3.3, §4.2): a lexical scope chain. `push`/`pop` manage
//! nesting; `merge_to_parent` commits a scratch frame's bindings into its
//! parent so that partial pattern-match bindings never leak on failure.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use yona_common::RuntimeErrorKind;

use crate::value::Value;

struct FrameData {
    locals: FxHashMap<String, Value>,
    parent: Option<Frame>,
}

/// A shared, reference-counted frame (spec §5: "Frames are owned by the
/// call stack"; closures capture a frame by shared reference, spec §4.6.1).
#[derive(Clone)]
pub struct Frame(Rc<RefCell<FrameData>>);

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame(..)")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UndefinedVariable(pub String);

impl fmt::Display for UndefinedVariable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: undefined variable `{}`", RuntimeErrorKind::UndefinedVariable, self.0)
    }
}

impl std::error::Error for UndefinedVariable {}

impl Frame {
    pub fn root() -> Frame {
        Frame(Rc::new(RefCell::new(FrameData { locals: FxHashMap::default(), parent: None })))
    }

    /// Creates a child frame (spec §4.2 `push`).
    pub fn push(&self) -> Frame {
        Frame(Rc::new(RefCell::new(FrameData { locals: FxHashMap::default(), parent: Some(self.clone()) })))
    }

    pub fn write(&self, name: impl Into<String>, value: Value) {
        self.0.borrow_mut().locals.insert(name.into(), value);
    }

    /// Searches from this frame upwards (spec §4.2 `lookup`).
    pub fn lookup(&self, name: &str) -> Result<Value, UndefinedVariable> {
        if let Some(v) = self.0.borrow().locals.get(name) {
            return Ok(v.clone());
        }
        let parent = self.0.borrow().parent.clone();
        match parent {
            Some(p) => p.lookup(name),
            None => Err(UndefinedVariable(name.to_string())),
        }
    }

    pub fn parent(&self) -> Option<Frame> {
        self.0.borrow().parent.clone()
    }

    /// Copies every local of `self` into `parent`, then drops `self` (spec
    /// §4.2 `merge_to_parent`). Used to commit a scratch frame's pattern
    /// bindings once a match succeeds.
    pub fn merge_to_parent(&self, parent: &Frame) {
        let locals = self.0.borrow().locals.clone();
        let mut parent_data = parent.0.borrow_mut();
        for (name, value) in locals {
            parent_data.locals.insert(name, value);
        }
    }

    pub fn same_scope(&self, other: &Frame) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for Frame {
    fn eq(&self, other: &Self) -> bool {
        self.same_scope(other)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_walks_up_the_chain() {
        let root = Frame::root();
        root.write("x", Value::Int(1));
        let child = root.push();
        assert_eq!(child.lookup("x"), Ok(Value::Int(1)));
    }

    #[test]
    fn lookup_missing_fails() {
        let root = Frame::root();
        assert!(root.lookup("nope").is_err());
    }

    #[test]
    fn merge_to_parent_commits_bindings() {
        let root = Frame::root();
        let scratch = root.push();
        scratch.write("y", Value::Int(2));
        scratch.merge_to_parent(&root);
        assert_eq!(root.lookup("y"), Ok(Value::Int(2)));
    }
}
