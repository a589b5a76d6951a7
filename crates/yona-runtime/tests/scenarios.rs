//! End-to-end scenarios (spec §8): source text through `yona-syntax` and
//! `yona-runtime` to a final value, exercising the pieces unit tests don't
//! reach in combination.

use yona_common::SourceContext;
use yona_runtime::{interp, Frame, Interpreter, Value};

fn eval(source: &str) -> (Interpreter, Result<Value, yona_common::HostError>) {
    let expr = yona_syntax::parse_expression(source, "<scenario>").expect("parses");
    let mut interp = Interpreter::new(Vec::new());
    let frame = Frame::root();
    let result = interp.eval(&expr, &frame);
    (interp, result)
}

#[test]
fn scenario_1_arithmetic_let_binding() {
    let (_interp, result) = eval("let x = 2 in x + x * 3");
    assert_eq!(result.unwrap(), Value::Int(8));
}

#[test]
fn scenario_2_head_tail_pattern() {
    let (_interp, result) = eval("case [1, 2, 3] of [h | ...t] -> h end");
    assert_eq!(result.unwrap(), Value::Int(1));
}

#[test]
fn scenario_3_guarded_tuple_pattern() {
    let (_interp, result) = eval("case (1, 2) of (a, b) when a < b -> (:ok, b) end");
    let value = result.unwrap();
    assert_eq!(value, Value::tuple(vec![Value::symbol("ok"), Value::Int(2)]));
}

#[test]
fn scenario_4_module_import() {
    let module_root = tempfile::tempdir().expect("tempdir");
    let test_dir = module_root.path().join("Test");
    std::fs::create_dir(&test_dir).expect("mkdir");
    std::fs::write(test_dir.join("Test.yona"), "module Test\\Test exports add\n\nadd x y -> x + y\n").expect("write module");

    let expr = yona_syntax::parse_expression("import add from Test\\Test in add(1, 2)", "<scenario>").expect("parses");
    let mut interp = Interpreter::new(vec![module_root.path().to_path_buf()]);
    let frame = Frame::root();
    let result = interp.eval(&expr, &frame).unwrap();
    assert_eq!(result, Value::Int(3));
}

#[test]
fn scenario_5_partial_application() {
    let (_interp, result) = eval("let f = \\x y -> x + y in f(10)(20)");
    assert_eq!(result.unwrap(), Value::Int(30));
}

#[test]
fn scenario_6_ascending_range() {
    let (_interp, result) = eval("[1..3]");
    assert_eq!(result.unwrap(), Value::seq(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
}

#[test]
fn scenario_6_descending_range() {
    let (_interp, result) = eval("[3..1]");
    assert_eq!(result.unwrap(), Value::seq(vec![Value::Int(3), Value::Int(2), Value::Int(1)]));
}

#[test]
fn scenario_6_zero_step_raises_runtime_exception() {
    let (mut interp, result) = eval("[1..3:0]");
    // The step-must-not-be-zero check goes through the exception slot, not
    // a host `Err`, so `eval` still returns `Ok(Unit)` here.
    assert!(result.is_ok());
    let pending = interp.exception.peek().expect("exception pending");
    assert_eq!(pending.value, Value::tuple(vec![Value::symbol("runtime"), Value::string("range step must not be zero")]));
    interp.exception.clear();
}

#[test]
fn do_raise_short_circuits_and_try_catch_recovers() {
    let (mut interp, result) = eval("do { 1; raise :bang \"boom\"; 3 }");
    assert!(result.is_ok());
    assert!(interp.exception.is_pending());
    interp.exception.clear();

    let (_interp, result) = eval("try raise :bang \"boom\" catch (:bang, _msg) -> 1 end");
    assert_eq!(result.unwrap(), Value::Int(1));
}

#[test]
fn generalized_identity_applies_to_different_kinds() {
    let (_interp, result) = eval("let id = \\x -> x in (id(1), id(\"a\"))");
    assert_eq!(result.unwrap(), Value::tuple(vec![Value::Int(1), Value::string("a")]));
}

#[test]
fn interp_apply_exposes_partial_application_law_end_to_end() {
    let expr = yona_syntax::parse_expression("\\x y z -> x + y + z", "<scenario>").expect("parses");
    let mut interp = Interpreter::new(Vec::new());
    let frame = Frame::root();
    let Value::Function(f) = interp.eval(&expr, &frame).unwrap() else { panic!("expected function") };

    let full = interp::apply(&mut interp, &f, vec![Value::Int(1), Value::Int(2), Value::Int(3)], &SourceContext::synthetic()).unwrap();

    let split = interp::apply(&mut interp, &f, vec![Value::Int(1)], &SourceContext::synthetic()).unwrap();
    let Value::Function(partial) = split else { panic!("expected partially applied function") };
    let split = interp::apply(&mut interp, &partial, vec![Value::Int(2), Value::Int(3)], &SourceContext::synthetic()).unwrap();

    assert_eq!(full, split);
    assert_eq!(full, Value::Int(6));
}
