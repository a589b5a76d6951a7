//! PatternMatcher (spec §4.3): matches a pattern against a value, staging
//! bindings in a scratch frame that is merged up on success and discarded
//! on failure -- including for each alternative of an or-pattern.

use yona_ast::{Literal, Pattern, PatternKind, TailPattern};

use crate::frame::Frame;
use crate::value::Value;

/// Attempts to match `pattern` against `value`, staging bindings in a
/// fresh child of `frame`. On success the child is merged into `frame` and
/// `true` is returned; on failure the child is simply dropped.
pub fn match_pattern(pattern: &Pattern, value: &Value, frame: &Frame) -> bool {
    let scratch = frame.push();
    if match_into(pattern, value, &scratch) {
        scratch.merge_to_parent(frame);
        true
    } else {
        false
    }
}

/// Matches straight into `frame` with no scratch/merge wrapping, for
/// callers (e.g. `case`) that already manage their own clause frame and
/// need bindings placed directly rather than staged-then-merged.
pub(crate) fn match_into(pattern: &Pattern, value: &Value, frame: &Frame) -> bool {
    match &pattern.kind {
        PatternKind::Underscore => true,
        PatternKind::Literal(lit) => literal_eq(lit, value),
        PatternKind::Identifier(name) => {
            frame.write(name.clone(), value.clone());
            true
        }
        PatternKind::Tuple(items) => match value {
            Value::Tuple(vals) if vals.len() == items.len() => {
                items.iter().zip(vals.iter()).all(|(p, v)| match_into(p, v, frame))
            }
            _ => false,
        },
        PatternKind::Sequence(items) => match value.as_seq() {
            Some(vals) if vals.len() == items.len() => {
                items.iter().zip(vals.iter()).all(|(p, v)| match_into(p, v, frame))
            }
            _ => false,
        },
        PatternKind::HeadTails { heads, tail } => match value.as_seq() {
            Some(vals) if vals.len() >= heads.len() => {
                let (head_vals, rest) = vals.split_at(heads.len());
                heads.iter().zip(head_vals.iter()).all(|(p, v)| match_into(p, v, frame))
                    && match_tail(tail, rest, frame)
            }
            _ => false,
        },
        PatternKind::TailsHead { tail, heads } => match value.as_seq() {
            Some(vals) if vals.len() >= heads.len() => {
                let split_at = vals.len() - heads.len();
                let (rest, head_vals) = vals.split_at(split_at);
                heads.iter().zip(head_vals.iter()).all(|(p, v)| match_into(p, v, frame))
                    && match_tail(tail, rest, frame)
            }
            _ => false,
        },
        PatternKind::HeadTailsHead { left, tail, right } => match value.as_seq() {
            Some(vals) if vals.len() >= left.len() + right.len() => {
                let (left_vals, rem) = vals.split_at(left.len());
                let split_at = rem.len() - right.len();
                let (mid, right_vals) = rem.split_at(split_at);
                left.iter().zip(left_vals.iter()).all(|(p, v)| match_into(p, v, frame))
                    && right.iter().zip(right_vals.iter()).all(|(p, v)| match_into(p, v, frame))
                    && match_tail(tail, mid, frame)
            }
            _ => false,
        },
        PatternKind::Dict(entries) => match value {
            Value::Dict(pairs) => entries.iter().all(|(key_pat, val_pat)| {
                let key_val = eval_key_pattern(key_pat);
                pairs.iter().any(|(k, v)| match &key_val {
                    Some(kv) => k.structural_eq(kv) && match_into(val_pat, v, frame),
                    None => match_into(key_pat, k, frame) && match_into(val_pat, v, frame),
                })
            }),
            _ => false,
        },
        PatternKind::Record { constructor, fields } => match value.as_record() {
            Some(record) if record.constructor.as_ref() == constructor.as_str() => fields
                .iter()
                .all(|(name, p)| record.field(name).is_some_and(|v| match_into(p, v, frame))),
            _ => false,
        },
        PatternKind::As { name, inner } => {
            frame.write(name.clone(), value.clone());
            match_into(inner, value, frame)
        }
        PatternKind::Or(alts) => alts.iter().any(|alt| {
            let scratch = frame.push();
            if match_into(alt, value, &scratch) {
                scratch.merge_to_parent(frame);
                true
            } else {
                false
            }
        }),
    }
}

/// A dict pattern's key position is a concrete literal/identifier-as-value
/// in source, not itself a binder; only literal keys are evaluated ahead of
/// the scan, matching the spec's "evaluated key-pattern" wording.
fn eval_key_pattern(pattern: &Pattern) -> Option<Value> {
    match &pattern.kind {
        PatternKind::Literal(lit) => Some(literal_value(lit)),
        _ => None,
    }
}

fn match_tail(tail: &TailPattern, rest: &[Value], frame: &Frame) -> bool {
    match tail {
        TailPattern::Identifier(name) => {
            frame.write(name.clone(), Value::seq(rest.to_vec()));
            true
        }
        TailPattern::Underscore => true,
        TailPattern::Literal(lit) => match lit {
            Literal::String(s) if rest.len() == s.chars().count() => {
                rest.iter().zip(s.chars()).all(|(v, c)| matches!(v, Value::Char(vc) if *vc == c))
            }
            _ => rest.len() == 1 && literal_eq(lit, &rest[0]),
        },
    }
}

fn literal_value(lit: &Literal) -> Value {
    match lit {
        Literal::Int(i) => Value::Int(*i),
        Literal::Float(f) => Value::Float(*f),
        Literal::Byte(b) => Value::Byte(*b),
        Literal::Char(c) => Value::Char(*c),
        Literal::String(s) => Value::string(s.as_str()),
        Literal::Symbol(s) => Value::symbol(s.as_str()),
        Literal::Unit => Value::Unit,
        Literal::Bool(b) => Value::Bool(*b),
    }
}

fn literal_eq(lit: &Literal, value: &Value) -> bool {
    literal_value(lit).structural_eq(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yona_common::SourceContext;

    fn ctx() -> SourceContext {
        SourceContext::synthetic()
    }

    #[test]
    fn head_tails_binds_head_and_rest() {
        let pattern = Pattern::new(
            PatternKind::HeadTails {
                heads: vec![Pattern::new(PatternKind::Identifier("h".into()), ctx())],
                tail: Box::new(TailPattern::Identifier("t".into())),
            },
            ctx(),
        );
        let value = Value::seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
        let frame = Frame::root();
        assert!(match_pattern(&pattern, &value, &frame));
        assert_eq!(frame.lookup("h").unwrap(), Value::Int(1));
        assert_eq!(frame.lookup("t").unwrap(), Value::seq(vec![Value::Int(2), Value::Int(3)]));
    }

    #[test]
    fn failed_match_does_not_leak_bindings() {
        let pattern = Pattern::new(
            PatternKind::Tuple(vec![
                Pattern::new(PatternKind::Identifier("a".into()), ctx()),
                Pattern::new(PatternKind::Literal(Literal::Int(9)), ctx()),
            ]),
            ctx(),
        );
        let value = Value::tuple(vec![Value::Int(1), Value::Int(2)]);
        let frame = Frame::root();
        assert!(!match_pattern(&pattern, &value, &frame));
        assert!(frame.lookup("a").is_err());
    }

    #[test]
    fn or_pattern_tries_alternatives_in_order() {
        let pattern = Pattern::new(
            PatternKind::Or(vec![
                Pattern::new(PatternKind::Literal(Literal::Int(1)), ctx()),
                Pattern::new(PatternKind::Identifier("x".into()), ctx()),
            ]),
            ctx(),
        );
        let frame = Frame::root();
        assert!(match_pattern(&pattern, &Value::Int(2), &frame));
        assert_eq!(frame.lookup("x").unwrap(), Value::Int(2));
    }
}
