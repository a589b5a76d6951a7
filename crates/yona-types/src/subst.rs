//! Classical substitution maps, per the algebraic contract in spec §4.4:
//! `(s1.compose(s2)).apply(t) == s1.apply(s2.apply(t))`.
//!
//! This deliberately does not use union-find (`ena`, as the teacher's
//! typechecker does) -- the spec's unifier is defined directly in terms of
//! `Substitution::apply`/`compose`, so that's what gets implemented.

use rustc_hash::FxHashMap;

use crate::ty::{Scheme, Ty, TyVar};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Substitution {
    map: FxHashMap<TyVar, Ty>,
}

impl Substitution {
    pub fn empty() -> Self {
        Substitution { map: FxHashMap::default() }
    }

    pub fn singleton(var: TyVar, ty: Ty) -> Self {
        let mut map = FxHashMap::default();
        map.insert(var, ty);
        Substitution { map }
    }

    pub fn get(&self, var: TyVar) -> Option<&Ty> {
        self.map.get(&var)
    }

    /// Applies this substitution to a type, recursively.
    pub fn apply(&self, ty: &Ty) -> Ty {
        if self.map.is_empty() {
            return ty.clone();
        }
        match ty {
            Ty::Var(v) => match self.map.get(v) {
                Some(replacement) => self.apply(replacement),
                None => ty.clone(),
            },
            Ty::Builtin(_) => ty.clone(),
            Ty::Named { name, inner } => Ty::Named {
                name: name.clone(),
                inner: inner.as_ref().map(|t| Box::new(self.apply(t))),
            },
            Ty::Function { arg, ret } => {
                Ty::Function { arg: Box::new(self.apply(arg)), ret: Box::new(self.apply(ret)) }
            }
            Ty::Sum(alts) => Ty::Sum(alts.iter().map(|t| self.apply(t)).collect()),
            Ty::Product(elems) => Ty::Product(elems.iter().map(|t| self.apply(t)).collect()),
            Ty::Collection { kind, item } => {
                Ty::Collection { kind: *kind, item: Box::new(self.apply(item)) }
            }
            Ty::Dict { key, value } => {
                Ty::Dict { key: Box::new(self.apply(key)), value: Box::new(self.apply(value)) }
            }
            Ty::Record { name, fields } => Ty::Record {
                name: name.clone(),
                fields: fields.iter().map(|(n, t)| (n.clone(), self.apply(t))).collect(),
            },
        }
    }

    pub fn apply_scheme(&self, scheme: &Scheme) -> Scheme {
        // Quantified vars are bound by the scheme, not free -- restrict the
        // substitution to avoid capturing them.
        let restricted = Substitution {
            map: self.map.iter().filter(|(v, _)| !scheme.vars.contains(v)).map(|(v, t)| (*v, t.clone())).collect(),
        };
        Scheme { vars: scheme.vars.clone(), ty: restricted.apply(&scheme.ty) }
    }

    /// `self.compose(other)` such that applying the result equals applying
    /// `other` first, then `self` -- i.e. `self` is the left side of `∘`.
    pub fn compose(&self, other: &Substitution) -> Substitution {
        let mut map: FxHashMap<TyVar, Ty> = other.map.iter().map(|(v, t)| (*v, self.apply(t))).collect();
        for (v, t) in &self.map {
            map.entry(*v).or_insert_with(|| t.clone());
        }
        Substitution { map }
    }

    pub fn free_vars(ty: &Ty, out: &mut Vec<TyVar>) {
        match ty {
            Ty::Var(v) => {
                if !out.contains(v) {
                    out.push(*v);
                }
            }
            Ty::Builtin(_) => {}
            Ty::Named { inner, .. } => {
                if let Some(t) = inner {
                    Substitution::free_vars(t, out);
                }
            }
            Ty::Function { arg, ret } => {
                Substitution::free_vars(arg, out);
                Substitution::free_vars(ret, out);
            }
            Ty::Sum(alts) => alts.iter().for_each(|t| Substitution::free_vars(t, out)),
            Ty::Product(elems) => elems.iter().for_each(|t| Substitution::free_vars(t, out)),
            Ty::Collection { item, .. } => Substitution::free_vars(item, out),
            Ty::Dict { key, value } => {
                Substitution::free_vars(key, out);
                Substitution::free_vars(value, out);
            }
            Ty::Record { fields, .. } => fields.iter().for_each(|(_, t)| Substitution::free_vars(t, out)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compose_matches_apply_apply_law() {
        let a = TyVar(0);
        let b = TyVar(1);
        let s1 = Substitution::singleton(a, Ty::Var(b));
        let s2 = Substitution::singleton(b, Ty::int());

        let composed = s1.compose(&s2);
        let direct = s1.apply(&s2.apply(&Ty::Var(a)));
        assert_eq!(composed.apply(&Ty::Var(a)), direct);
    }

    #[test]
    fn apply_is_idempotent_on_fully_resolved_type() {
        let s = Substitution::singleton(TyVar(0), Ty::int());
        assert_eq!(s.apply(&Ty::int()), Ty::int());
    }
}
