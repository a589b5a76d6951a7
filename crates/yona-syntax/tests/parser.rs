//! Parser-level tests through the public `parse_module` / `parse_expression`
//! entry points, covering one representative construct per grammar corner
//! that the lexer-only unit tests don't reach.

use yona_ast::{AliasKind, ExprKind, PatternKind, TailPattern};
use yona_syntax::{parse_expression, parse_module};

fn expr(src: &str) -> yona_ast::Expr {
    parse_expression(src, "<test>").unwrap_or_else(|e| panic!("failed to parse {src:?}: {e:?}"))
}

#[test]
fn parses_let_and_arithmetic() {
    let e = expr("let x = 2 in x + x * 3");
    assert!(matches!(e.kind, ExprKind::Let { .. }));
}

#[test]
fn parses_lambda_with_two_patterns() {
    let e = expr("\\x y -> x + y");
    let ExprKind::Function(f) = e.kind else { panic!("expected a lambda") };
    assert_eq!(f.patterns.len(), 2);
    assert!(f.name.is_none());
}

#[test]
fn parses_case_with_head_tails_tail_pattern() {
    let e = expr("case [1, 2, 3] of [h | ...t] -> h end");
    let ExprKind::Case { clauses, .. } = e.kind else { panic!("expected a case") };
    assert_eq!(clauses.len(), 1);
    let PatternKind::HeadTails { heads, tail } = &clauses[0].pattern.kind else { panic!("expected head|...tail") };
    assert_eq!(heads.len(), 1);
    assert!(matches!(tail.as_ref(), TailPattern::Identifier(name) if name == "t"));
}

#[test]
fn parses_case_with_tails_head_and_head_tails_head_patterns() {
    let e = expr("case [1, 2, 3] of [...init | last] -> last end");
    let ExprKind::Case { clauses, .. } = e.kind else { panic!("expected a case") };
    assert!(matches!(clauses[0].pattern.kind, PatternKind::TailsHead { .. }));

    let e = expr("case [1, 2, 3] of [first | ...mid | last] -> mid end");
    let ExprKind::Case { clauses, .. } = e.kind else { panic!("expected a case") };
    assert!(matches!(clauses[0].pattern.kind, PatternKind::HeadTailsHead { .. }));
}

#[test]
fn parses_guarded_case_clause() {
    let e = expr("case (1, 2) of (a, b) when a < b -> (:ok, b) end");
    let ExprKind::Case { clauses, .. } = e.kind else { panic!("expected a case") };
    assert!(clauses[0].guard.is_some());
}

#[test]
fn parses_import_of_functions_and_modules() {
    let e = expr("import add from Test\\Test in add(1, 2)");
    let ExprKind::Import { clauses, .. } = e.kind else { panic!("expected an import") };
    assert!(matches!(&clauses[0], yona_ast::ImportClause::Functions { fqn, items } if fqn.module == "Test" && items[0].0 == "add"));

    let e = expr("import T = Test\\Test in T");
    let ExprKind::Import { clauses, .. } = e.kind else { panic!("expected an import") };
    assert!(matches!(&clauses[0], yona_ast::ImportClause::Module { alias: Some(name), .. } if name == "T"));
}

#[test]
fn parses_ascending_descending_and_stepped_ranges() {
    assert!(matches!(expr("[1..3]").kind, ExprKind::SeqRange { step: None, .. }));
    assert!(matches!(expr("[3..1]").kind, ExprKind::SeqRange { step: None, .. }));
    assert!(matches!(expr("[1..10:2]").kind, ExprKind::SeqRange { step: Some(_), .. }));
}

#[test]
fn parses_try_catch() {
    let e = expr("try raise :bang \"boom\" catch (:bang, m) -> m end");
    let ExprKind::TryCatch { catches, .. } = e.kind else { panic!("expected try/catch") };
    assert_eq!(catches.len(), 1);
}

#[test]
fn parses_with_resource_binding() {
    let e = expr("with openFile(\"f\") as f in f");
    let ExprKind::With { name, .. } = e.kind else { panic!("expected with") };
    assert_eq!(name.as_deref(), Some("f"));
}

#[test]
fn distinguishes_record_instance_from_field_update() {
    // Uppercase-led identifier before `{` is a record constructor call.
    let e = expr("Point{x = 1, y = 2}");
    assert!(matches!(e.kind, ExprKind::RecordInstance { .. }));

    // Any other expression before `{` is a field-update on that value.
    let e = expr("p{x = 1}");
    assert!(matches!(e.kind, ExprKind::FieldUpdate { .. }));
}

#[test]
fn parses_dict_set_and_comprehensions() {
    assert!(matches!(expr("{1: \"a\", 2: \"b\"}").kind, ExprKind::Dict(entries) if entries.len() == 2));
    assert!(matches!(expr("{1, 2, 3}").kind, ExprKind::Set(items) if items.len() == 3));
    assert!(matches!(expr("[x * 2 | x -> [1, 2, 3]]").kind, ExprKind::SeqComprehension { .. }));
    assert!(matches!(expr("{x | x -> [1, 2, 3] when x > 1}").kind, ExprKind::SetComprehension { condition: Some(_), .. }));
    assert!(matches!(expr("{k: v | k, v -> [(1, 2)]}").kind, ExprKind::DictComprehension { key_var: Some(_), .. }));
}

#[test]
fn parses_fqn_ref_module_ref_and_alias_ref() {
    assert!(matches!(expr("Std\\IO").kind, ExprKind::FqnRef(_)));
    assert!(matches!(expr("Std\\IO::println").kind, ExprKind::ModuleRef { .. }));
    let e = expr("import io = Std\\IO in io\\println");
    let ExprKind::Import { body, .. } = e.kind else { panic!("expected import") };
    assert!(matches!(body.kind, ExprKind::AliasRef { ref alias, ref name } if alias == "io" && name == "println"));
}

#[test]
fn parses_partial_application_call_chain() {
    let e = expr("let f = \\x y -> x + y in f(10)(20)");
    let ExprKind::Let { body, .. } = e.kind else { panic!("expected let") };
    let ExprKind::Apply { positional, .. } = body.kind else { panic!("expected apply") };
    assert_eq!(positional.len(), 2);
}

#[test]
fn parses_named_constructor_arguments() {
    let e = expr("Point(x = 1, y = 2)");
    let ExprKind::Apply { named, positional, .. } = e.kind else { panic!("expected apply") };
    assert!(positional.is_empty());
    assert_eq!(named.len(), 2);
}

#[test]
fn parses_module_with_record_and_exported_function() {
    let source = "module Test\\Test exports add\n\nrecord Pair = {first, second}\n\nadd x y -> x + y\n";
    let module = parse_module(source, "<test>").expect("parses");
    assert_eq!(module.fqn.module, "Test");
    assert_eq!(module.exports, vec!["add".to_string()]);
    assert_eq!(module.records.len(), 1);
    assert_eq!(module.records[0].fields, vec!["first".to_string(), "second".to_string()]);
    assert_eq!(module.functions.len(), 1);
}

#[test]
fn parses_guarded_function_bodies_with_else() {
    let source = "module Test\\Abs\n\nabs x | x < 0 -> 0 - x\n    | else -> x\n";
    let module = parse_module(source, "<test>").expect("parses");
    assert_eq!(module.functions[0].bodies.len(), 2);
}

#[test]
fn let_aliases_support_lambda_module_and_fqn_shorthand() {
    let e = expr("let square = \\x -> x * x in square(4)");
    let ExprKind::Let { aliases, .. } = e.kind else { panic!("expected let") };
    assert!(matches!(aliases[0].kind, AliasKind::Lambda { .. }));
}

#[test]
fn collects_parse_errors_instead_of_panicking() {
    let errors = parse_expression("let x = in x", "<test>").expect_err("should fail to parse");
    assert!(!errors.is_empty());
}

#[test]
fn record_pattern_and_as_pattern_parse() {
    let e = expr("case Point{x = 1, y = 2} of Point{x, y} -> x end");
    let ExprKind::Case { clauses, .. } = e.kind else { panic!("expected case") };
    assert!(matches!(clauses[0].pattern.kind, PatternKind::Record { .. }));

    let e = expr("case 5 of n @ _ -> n end");
    let ExprKind::Case { clauses, .. } = e.kind else { panic!("expected case") };
    assert!(matches!(clauses[0].pattern.kind, PatternKind::As { .. }));
}
