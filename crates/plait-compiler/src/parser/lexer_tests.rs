use super::lexer::{SyntaxKind, lex, token_text};
use crate::ir::FieldId;

fn snapshot(source: &str) -> String {
    lex(FieldId::new(0), source)
        .iter()
        .map(|token| {
            format!(
                "{:?} {:?} {}",
                token.kind,
                token.range,
                token_text(source, token)
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn punctuation_and_operands() {
    insta::assert_snapshot!(snapshot(r#"@@ | "x":Kind ( Ident )*"#), @r#"
    AtAt 0..2 @@
    Pipe 3..4 |
    StringLiteral 5..8 "x"
    Colon 8..9 :
    Id 9..13 Kind
    ParenOpen 14..15 (
    Id 16..21 Ident
    ParenClose 22..23 )
    Star 23..24 *
    "#);
}

#[test]
fn brackets_braces_and_prefixes() {
    insta::assert_snapshot!(snapshot("[ @x ] {!y}+ z?"), @r"
    BracketOpen 0..1 [
    At 2..3 @
    Id 3..4 x
    BracketClose 5..6 ]
    BraceOpen 7..8 {
    Negation 8..9 !
    Id 9..10 y
    BraceClose 10..11 }
    Plus 11..12 +
    Id 13..14 z
    Question 14..15 ?
    ");
}

#[test]
fn single_quoted_literal_with_escape() {
    insta::assert_snapshot!(snapshot(r"'\'' '\\'"), @r"
    StringLiteral 0..4 '\''
    StringLiteral 5..9 '\\'
    ");
}

#[test]
fn garbage_coalesces_until_whitespace() {
    insta::assert_snapshot!(snapshot("Ident $$% ;"), @r"
    Id 0..5 Ident
    Garbage 6..9 $$%
    Garbage 10..11 ;
    ");
}

#[test]
fn unterminated_quote_is_garbage() {
    let tokens = lex(FieldId::new(0), "'abc");
    assert_eq!(tokens[0].kind, SyntaxKind::Garbage);
    assert_eq!(u32::from(tokens[0].range.start()), 0);
}

#[test]
fn tokens_remember_their_field() {
    let tokens = lex(FieldId::new(3), "a b");
    assert!(tokens.iter().all(|t| t.field == FieldId::new(3)));
    assert_eq!(tokens.len(), 2);
}

#[test]
fn whitespace_only_is_empty() {
    assert!(lex(FieldId::new(0), " \t\n ").is_empty());
}
