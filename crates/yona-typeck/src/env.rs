//! Type environment: a frame chain structurally identical to the
//! interpreter's runtime `Frame` (spec §4.5 "Environment is a stack of
//! name -> type frames").

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use yona_types::{Scheme, TyVar};

#[derive(Debug, Default)]
pub struct TypeFrame {
    bindings: FxHashMap<String, Scheme>,
    parent: Option<Rc<RefCell<TypeFrame>>>,
}

impl TypeFrame {
    pub fn root() -> Rc<RefCell<TypeFrame>> {
        Rc::new(RefCell::new(TypeFrame::default()))
    }

    pub fn push(parent: &Rc<RefCell<TypeFrame>>) -> Rc<RefCell<TypeFrame>> {
        Rc::new(RefCell::new(TypeFrame { bindings: FxHashMap::default(), parent: Some(Rc::clone(parent)) }))
    }

    pub fn bind(frame: &Rc<RefCell<TypeFrame>>, name: impl Into<String>, scheme: Scheme) {
        frame.borrow_mut().bindings.insert(name.into(), scheme);
    }

    pub fn lookup(frame: &Rc<RefCell<TypeFrame>>, name: &str) -> Option<Scheme> {
        let this = frame.borrow();
        if let Some(scheme) = this.bindings.get(name) {
            return Some(scheme.clone());
        }
        this.parent.as_ref().and_then(|p| TypeFrame::lookup(p, name))
    }

    /// Every type variable free in this frame chain -- used so `let`
    /// generalizes only over variables not already bound in an enclosing
    /// scope (spec §4.5).
    pub fn free_vars(frame: &Rc<RefCell<TypeFrame>>) -> Vec<TyVar> {
        let mut out = Vec::new();
        let mut cur = Some(Rc::clone(frame));
        while let Some(f) = cur {
            let borrowed = f.borrow();
            for scheme in borrowed.bindings.values() {
                let mut free = Vec::new();
                yona_types::Substitution::free_vars(&scheme.ty, &mut free);
                for v in free {
                    if !scheme.vars.contains(&v) && !out.contains(&v) {
                        out.push(v);
                    }
                }
            }
            cur = borrowed.parent.clone();
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use yona_types::Ty;

    #[test]
    fn lookup_finds_binding_in_parent() {
        let root = TypeFrame::root();
        TypeFrame::bind(&root, "x", Scheme::mono(Ty::int()));
        let child = TypeFrame::push(&root);
        assert_eq!(TypeFrame::lookup(&child, "x"), Some(Scheme::mono(Ty::int())));
    }

    #[test]
    fn lookup_missing_name_returns_none() {
        let root = TypeFrame::root();
        assert_eq!(TypeFrame::lookup(&root, "missing"), None);
    }
}
