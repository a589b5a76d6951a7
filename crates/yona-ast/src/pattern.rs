use yona_common::SourceContext;

use crate::literal::Literal;

/// The tail sub-pattern of a `HeadTails` / `TailsHead` / `HeadTailsHead`
/// sequence pattern (spec §4.3): either a binding, a wildcard, or a literal
/// sequence/string value matched structurally against the remaining suffix.
#[derive(Debug, Clone, PartialEq)]
pub enum TailPattern {
    Identifier(String),
    Underscore,
    Literal(Literal),
}

/// A pattern: tested against a runtime value by `PatternMatcher::match_`,
/// producing variable bindings on success (spec §3.1 "Patterns").
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub context: SourceContext,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PatternKind {
    Underscore,
    Literal(Literal),
    Identifier(String),
    Tuple(Vec<Pattern>),
    Sequence(Vec<Pattern>),
    HeadTails { heads: Vec<Pattern>, tail: Box<TailPattern> },
    TailsHead { tail: Box<TailPattern>, heads: Vec<Pattern> },
    HeadTailsHead { left: Vec<Pattern>, tail: Box<TailPattern>, right: Vec<Pattern> },
    Dict(Vec<(Pattern, Pattern)>),
    Record { constructor: String, fields: Vec<(String, Pattern)> },
    As { name: String, inner: Box<Pattern> },
    Or(Vec<Pattern>),
}

impl Pattern {
    pub fn new(kind: PatternKind, context: SourceContext) -> Self {
        Self { kind, context }
    }

    /// The set of names this pattern binds, in the order they'd be bound.
    /// Used by the inferencer (§4.5) to extract variable-to-type bindings
    /// and by tests asserting pattern-binding atomicity (§8).
    pub fn bound_names(&self) -> Vec<String> {
        let mut out = Vec::new();
        self.collect_names(&mut out);
        out
    }

    fn collect_names(&self, out: &mut Vec<String>) {
        match &self.kind {
            PatternKind::Underscore | PatternKind::Literal(_) => {}
            PatternKind::Identifier(name) => out.push(name.clone()),
            PatternKind::Tuple(items) | PatternKind::Sequence(items) => {
                for p in items {
                    p.collect_names(out);
                }
            }
            PatternKind::HeadTails { heads, tail } => {
                for p in heads {
                    p.collect_names(out);
                }
                collect_tail_names(tail, out);
            }
            PatternKind::TailsHead { tail, heads } => {
                collect_tail_names(tail, out);
                for p in heads {
                    p.collect_names(out);
                }
            }
            PatternKind::HeadTailsHead { left, tail, right } => {
                for p in left {
                    p.collect_names(out);
                }
                collect_tail_names(tail, out);
                for p in right {
                    p.collect_names(out);
                }
            }
            PatternKind::Dict(entries) => {
                for (_, v) in entries {
                    v.collect_names(out);
                }
            }
            PatternKind::Record { fields, .. } => {
                for (_, p) in fields {
                    p.collect_names(out);
                }
            }
            PatternKind::As { name, inner } => {
                out.push(name.clone());
                inner.collect_names(out);
            }
            PatternKind::Or(alts) => {
                // All alternatives of an or-pattern bind the same names;
                // take the first alternative's names as representative.
                if let Some(first) = alts.first() {
                    first.collect_names(out);
                }
            }
        }
    }
}

fn collect_tail_names(tail: &TailPattern, out: &mut Vec<String>) {
    if let TailPattern::Identifier(name) = tail {
        out.push(name.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> SourceContext {
        SourceContext::synthetic()
    }

    #[test]
    fn bound_names_head_tails() {
        let pat = Pattern::new(
            PatternKind::HeadTails {
                heads: vec![Pattern::new(PatternKind::Identifier("h".into()), ctx())],
                tail: Box::new(TailPattern::Identifier("t".into())),
            },
            ctx(),
        );
        assert_eq!(pat.bound_names(), vec!["h".to_string(), "t".to_string()]);
    }

    #[test]
    fn bound_names_as_pattern() {
        let inner = Pattern::new(PatternKind::Identifier("x".into()), ctx());
        let pat = Pattern::new(PatternKind::As { name: "whole".into(), inner: Box::new(inner) }, ctx());
        assert_eq!(pat.bound_names(), vec!["whole".to_string(), "x".to_string()]);
    }
}
