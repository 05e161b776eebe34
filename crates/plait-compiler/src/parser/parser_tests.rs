use crate::test_utils::parse_probe;

fn ok(spec: &[(&str, &str)]) -> String {
    match parse_probe(spec) {
        Ok(tree) => tree,
        Err(errors) => panic!("expected a valid grammar, got:\n{errors}"),
    }
}

fn err(spec: &[(&str, &str)]) -> String {
    match parse_probe(spec) {
        Ok(tree) => panic!("expected errors, got {tree}"),
        Err(errors) => errors,
    }
}

#[test]
fn fields_form_one_sequence() {
    insta::assert_snapshot!(ok(&[("text", "@Ident"), ("rule", "'=' Int")]), @r#"seq(@text(Ident) "=" Int)"#);
}

#[test]
fn single_term_is_not_wrapped() {
    insta::assert_snapshot!(ok(&[("text", "@Ident")]), @"@text(Ident)");
}

#[test]
fn alternation_and_repetition() {
    insta::assert_snapshot!(
        ok(&[("texts", "@Ident ( ',' @Ident )* | '(' ')'")]),
        @r#"alt(seq(@texts(Ident) rep0(group(seq("," @texts(Ident))))) seq("(" ")"))"#
    );
}

#[test]
fn nested_capture_references_field_type() {
    insta::assert_snapshot!(ok(&[("child", "'(' @@ ')'")]), @r#"seq("(" @@child(ref(Probe)) ")")"#);
}

#[test]
fn postfix_applies_to_capture() {
    insta::assert_snapshot!(
        ok(&[("flag", "@'pub'? ['x'] {Ident}+")]),
        @r#"seq(opt(@flag("pub")) opt("x") rep1(rep0(Ident)))"#
    );
}

#[test]
fn negation_and_kinded_literal() {
    insta::assert_snapshot!(ok(&[("rule", r#"!';' "if":Keyword"#)]), @r#"seq(not(";") "if":Keyword)"#);
}

#[test]
fn group_spans_fields() {
    insta::assert_snapshot!(
        ok(&[("rule", "("), ("text", "@Ident"), ("rule2", ")")]),
        @"group(@text(Ident))"
    );
}

#[test]
fn unclosed_group() {
    insta::assert_snapshot!(err(&[("rule", "( Ident")]), @"error in `Probe.rule` at 0..1: missing closing `)`; the annotations end here");
}

#[test]
fn unclosed_repetition_reports_what_was_found() {
    insta::assert_snapshot!(err(&[("rule", "{ Ident )")]), @"error in `Probe.rule` at 0..1: missing closing `}`; found `)`");
}

#[test]
fn unmatched_close() {
    insta::assert_snapshot!(err(&[("rule", "Ident )")]), @"error in `Probe.rule` at 6..7: unmatched `)`");
}

#[test]
fn postfix_without_operand() {
    insta::assert_snapshot!(err(&[("rule", "* Ident")]), @"error in `Probe.rule` at 0..1: expected an expression: `*` has nothing to repeat");
}

#[test]
fn capture_without_target() {
    insta::assert_snapshot!(err(&[("text", "@ | Ident")]), @"error in `Probe.text` at 0..1: `@` has nothing to capture: found `|`");
}

#[test]
fn missing_kind_after_colon() {
    insta::assert_snapshot!(err(&[("rule", "'x': |")]), @"error in `Probe.rule` at 3..4: expected a token kind after `:`: found `|`");
}

#[test]
fn invalid_escape() {
    insta::assert_snapshot!(err(&[("rule", r"'\q'")]), @r"error in `Probe.rule` at 0..4: invalid escape in string literal: unknown escape `\q`");
}

#[test]
fn stray_character() {
    insta::assert_snapshot!(err(&[("rule", "Ident ;")]), @"error in `Probe.rule` at 6..7: unexpected `;`");
}

#[test]
fn unterminated_literal() {
    assert!(err(&[("rule", "Ident 'abc")]).contains("unterminated string literal"));
}

#[test]
fn missing_expression_points_past_last_field() {
    insta::assert_snapshot!(err(&[("rule", "Ident"), ("rule2", "|")]), @"error in `Probe.rule2` at 1..1: expected an expression");
}

#[test]
fn no_annotations() {
    insta::assert_snapshot!(err(&[("rule", "  ")]), @"error in `Probe`: `Probe` has no annotated fields (hint: annotate at least one field)");
}

#[test]
fn node_capture_into_text_field() {
    insta::assert_snapshot!(err(&[("text", "@@")]), @"error in `Probe.text` at 0..2: `@@` parses a nested grammar type, but field `text` holds a text value (hint: use `@` to capture token text)");
}

#[test]
fn node_capture_into_unbound_field() {
    insta::assert_snapshot!(err(&[("other", "@@")]), @"error in `Probe.other` at 0..2: field `other` has no slot to capture into (hint: register the field with a slot, e.g. `g.value(..)`)");
}
