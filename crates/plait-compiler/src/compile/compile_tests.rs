use std::sync::Arc;

use indoc::indoc;

use super::{compile_type, schema_of};
use crate::CompileError;
use crate::schema::{Describe, Grammar};
use crate::test_utils::{Paren, Sum};

#[derive(Debug, Default)]
struct RepeatScalar {
    name: String,
}

impl Grammar for RepeatScalar {
    fn describe(g: &mut Describe<Self>) {
        g.value("name", "{ @Ident }", |r| &mut r.name);
    }
}

#[derive(Debug, Default)]
struct Unclosed {
    expr: String,
}

impl Grammar for Unclosed {
    fn describe(g: &mut Describe<Self>) {
        g.value("expr", "( @Ident", |u| &mut u.expr);
    }
}

#[derive(Debug, Default)]
struct Renamed {
    word: String,
}

impl Grammar for Renamed {
    fn describe(g: &mut Describe<Self>) {
        g.name("Word").value("word", "@Ident", |r| &mut r.word);
    }
}

#[derive(Debug, Default)]
struct Unit;

impl Grammar for Unit {
    fn describe(_g: &mut Describe<Self>) {}
}

#[test]
fn compiles_fields_in_order() {
    let schema = compile_type::<Paren>().unwrap();
    assert_eq!(schema.name(), "Paren");
    let names: Vec<_> = schema.fields().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["open", "inner", "close"]);
    assert_eq!(schema.refs().len(), 1);
    assert_eq!(schema.refs()[0].name(), "Paren");
    assert!(schema.kinds().is_empty());
}

#[test]
fn kinds_are_recorded_once() {
    let schema = compile_type::<Sum>().unwrap();
    let kinds: Vec<_> = schema.kinds().iter().map(|k| k.name.as_str()).collect();
    assert_eq!(kinds, ["Int"]);
}

#[test]
fn name_override() {
    let schema = compile_type::<Renamed>().unwrap();
    assert_eq!(schema.name(), "Word");
}

#[test]
fn cache_returns_the_same_schema() {
    let first = schema_of::<Sum>().unwrap();
    let second = schema_of::<Sum>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn cache_is_shared_across_threads() {
    let handles: Vec<_> = (0..4)
        .map(|_| std::thread::spawn(|| schema_of::<Paren>().unwrap()))
        .collect();
    let schemas: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(schemas.iter().all(|s| Arc::ptr_eq(s, &schemas[0])));
}

#[test]
fn errors_are_not_cached() {
    assert!(schema_of::<RepeatScalar>().is_err());
    assert!(schema_of::<RepeatScalar>().is_err());
}

#[test]
fn unclosed_group_names_the_field() {
    let err = compile_type::<Unclosed>().unwrap_err();
    let CompileError::InvalidGrammar { type_name, .. } = &err else {
        panic!("expected InvalidGrammar, got {err:?}");
    };
    assert_eq!(type_name, "Unclosed");
    insta::assert_snapshot!(err.diagnostics().render(), @r"
    error: missing closing `)`; the annotations end here
     --> Unclosed.expr:1:1
      |
    1 | ( @Ident
      | ^ missing closing `)`; the annotations end here
    ");
}

#[test]
fn error_display_summarizes() {
    let err = compile_type::<RepeatScalar>().unwrap_err();
    insta::assert_snapshot!(err, @"grammar for `RepeatScalar` is invalid: single-value field captured inside a repetition: field `name` holds one text value but may match many times");
}

#[test]
fn empty_type() {
    let err = compile_type::<Unit>().unwrap_err();
    assert_eq!(
        err.diagnostics().render(),
        indoc! {"
            error: `Unit` has no annotated fields (in `Unit`)
              = help: annotate at least one field"}
    );
}
