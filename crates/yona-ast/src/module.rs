use yona_common::SourceContext;

use crate::expr::{FqnExpr, FunctionExpr};
use crate::type_expr::TypeExpr;

/// A sum-type constructor's record shape, e.g. `record Point = { x, y }`
/// (spec §3.1 "Types", §4.1 record values).
#[derive(Debug, Clone, PartialEq)]
pub struct RecordDecl {
    pub name: String,
    pub fields: Vec<String>,
    pub context: SourceContext,
}

/// A function's type signature declared ahead of its definition, e.g.
/// `sum : Int -> Int -> Int` (spec §3.1 "Functions").
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub name: String,
    pub signature: TypeExpr,
    pub context: SourceContext,
}

/// A parsed module: the unit the loader caches and the inferencer checks
/// (spec §3.4, §4.7).
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleAst {
    pub fqn: FqnExpr,
    pub exports: Vec<String>,
    pub records: Vec<RecordDecl>,
    pub declarations: Vec<FunctionDecl>,
    pub functions: Vec<FunctionExpr>,
    pub context: SourceContext,
}

impl ModuleAst {
    pub fn new(fqn: FqnExpr, context: SourceContext) -> Self {
        Self {
            fqn,
            exports: Vec::new(),
            records: Vec::new(),
            declarations: Vec::new(),
            functions: Vec::new(),
            context,
        }
    }

    /// Names exported but with no matching top-level function (spec §4.7
    /// "module validity" edge case).
    pub fn dangling_exports(&self) -> Vec<&str> {
        self.exports
            .iter()
            .filter(|name| !self.functions.iter().any(|f| f.name.as_deref() == Some(name.as_str())))
            .map(|s| s.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dangling_exports_reports_missing_function() {
        let fqn = FqnExpr::new(vec!["Std".into()], "Demo");
        let mut module = ModuleAst::new(fqn, SourceContext::synthetic());
        module.exports.push("missing".into());
        assert_eq!(module.dangling_exports(), vec!["missing"]);
    }
}
