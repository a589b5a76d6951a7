//! Generalization and instantiation (spec §4.5, GLOSSARY).

use crate::subst::Substitution;
use crate::ty::{Scheme, Ty, TyVar};

/// Generalizes `ty` into a scheme by quantifying over every free variable
/// in `ty` that is not also free in `env_vars` (the enclosing environment).
pub fn generalize(ty: &Ty, env_vars: &[TyVar]) -> Scheme {
    let mut free = Vec::new();
    Substitution::free_vars(ty, &mut free);
    free.retain(|v| !env_vars.contains(v));
    Scheme { vars: free, ty: ty.clone() }
}

/// Instantiates a scheme by replacing its quantified variables with fresh
/// ones drawn from `fresh`.
pub fn instantiate(scheme: &Scheme, mut fresh: impl FnMut() -> TyVar) -> Ty {
    if scheme.vars.is_empty() {
        return scheme.ty.clone();
    }
    let mut subst = Substitution::empty();
    for v in &scheme.vars {
        subst = Substitution::singleton(*v, Ty::Var(fresh())).compose(&subst);
    }
    subst.apply(&scheme.ty)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generalize_excludes_env_free_vars() {
        let ty = Ty::function(Ty::Var(TyVar(0)), Ty::Var(TyVar(1)));
        let scheme = generalize(&ty, &[TyVar(1)]);
        assert_eq!(scheme.vars, vec![TyVar(0)]);
    }

    #[test]
    fn instantiate_produces_fresh_vars() {
        let scheme = Scheme { vars: vec![TyVar(0)], ty: Ty::function(Ty::Var(TyVar(0)), Ty::Var(TyVar(0))) };
        let mut next = 100;
        let ty = instantiate(&scheme, || {
            next += 1;
            TyVar(next)
        });
        match ty {
            Ty::Function { arg, ret } => assert_eq!(*arg, *ret),
            _ => panic!("expected function type"),
        }
    }
}
