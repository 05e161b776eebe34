use crate::test_utils::check_probe;

fn err(spec: &[(&str, &str)]) -> String {
    check_probe(spec).unwrap_err()
}

#[test]
fn accumulating_and_idempotent_fields_may_repeat() {
    assert_eq!(check_probe(&[("texts", "{ @Ident }")]), Ok(()));
    assert_eq!(check_probe(&[("flag", "{ @'x' | Ident }")]), Ok(()));
    assert_eq!(check_probe(&[("children", "'(' @@* ')'")]), Ok(()));
}

#[test]
fn scalar_outside_repetition_is_fine() {
    assert_eq!(check_probe(&[("text", "@Ident | @Int")]), Ok(()));
    assert_eq!(check_probe(&[("int", "[ @Int ]")]), Ok(()));
}

#[test]
fn scalar_inside_repetition() {
    insta::assert_snapshot!(err(&[("text", "{ @Ident }")]), @"error in `Probe.text` at 2..3: single-value field captured inside a repetition: field `text` holds one text value but may match many times (hint: use a `Vec` field to keep every match, or move the capture out of the repetition)");
}

#[test]
fn postfix_repetition_counts_too() {
    insta::assert_snapshot!(err(&[("int", "@Int+")]), @"error in `Probe.int` at 0..1: single-value field captured inside a repetition: field `int` holds one integer value but may match many times (hint: use a `Vec` field to keep every match, or move the capture out of the repetition)");
}

#[test]
fn single_nested_inside_repetition() {
    insta::assert_snapshot!(err(&[("child", "@@*")]), @"error in `Probe.child` at 0..2: single-value field captured inside a repetition: field `child` holds one nested `Probe` value but may match many times (hint: use a `Vec` field to keep every match, or move the capture out of the repetition)");
}

#[test]
fn value_capture_into_nested_field() {
    insta::assert_snapshot!(err(&[("child", "@Ident")]), @"error in `Probe.child` at 0..1: `@` captures token text, but field `child` holds a nested `Probe` (hint: use `@@` to parse the nested type)");
}

#[test]
fn value_capture_without_slot() {
    insta::assert_snapshot!(err(&[("other", "'x' @Ident")]), @"error in `Probe.other` at 4..5: field `other` has no slot to capture into (hint: register the field with a slot, e.g. `g.value(..)`)");
}

#[test]
fn every_problem_is_reported() {
    let errors = err(&[("other", "@Ident"), ("text", "{ @Int }")]);
    assert_eq!(errors.lines().count(), 2);
}
