use indoc::indoc;

use super::{LexError, LexerDefinition, TextLexer, TokenStream};
use crate::{Position, Token};

fn collect(lexer: &TextLexer, source: &str) -> Result<Vec<Token>, LexError> {
    let mut stream = lexer.lex(source);
    let mut tokens = Vec::new();
    loop {
        let token = stream.next_token()?;
        let done = token.is_eof();
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

fn render(lexer: &TextLexer, source: &str) -> String {
    collect(lexer, source)
        .unwrap()
        .iter()
        .map(|t| {
            let kind = lexer.symbols().name(t.kind).unwrap();
            format!("{kind} {:?} @{}", t.text, t.pos)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn kinds_and_positions() {
    let lexer = TextLexer::new();
    insta::assert_snapshot!(render(&lexer, "let x = 4.5 + 0x1F;"), @r#"
    Ident "let" @1:1
    Ident "x" @1:5
    Punct "=" @1:7
    Float "4.5" @1:9
    Punct "+" @1:13
    Int "0x1F" @1:15
    Punct ";" @1:19
    EOF "" @1:20
    "#);
}

#[test]
fn quoted_literals_keep_quotes() {
    let lexer = TextLexer::new();
    insta::assert_snapshot!(render(&lexer, r#""a \"b\"" 'c' `raw\n`"#), @r#"
    String "\"a \\\"b\\\"\"" @1:1
    Char "'c'" @1:11
    RawString "`raw\\n`" @1:15
    EOF "" @1:22
    "#);
}

#[test]
fn lines_and_comments() {
    let source = indoc! {"
        a // trailing
        /* block */ b
    "};
    let lexer = TextLexer::new();
    insta::assert_snapshot!(render(&lexer, source), @r#"
    Ident "a" @1:1
    Ident "b" @2:13
    EOF "" @3:1
    "#);
}

#[test]
fn comments_can_be_kept() {
    let lexer = TextLexer::new().keep_comments();
    insta::assert_snapshot!(render(&lexer, "a // note"), @r#"
    Ident "a" @1:1
    Comment "// note" @1:3
    EOF "" @1:10
    "#);
}

#[test]
fn columns_count_characters() {
    let lexer = TextLexer::new();
    let tokens = collect(&lexer, "\"héllo\" x").unwrap();
    assert_eq!(
        tokens[1].pos,
        Position {
            offset: 9,
            line: 1,
            column: 9
        }
    );
}

#[test]
fn unterminated_string_is_an_error() {
    let lexer = TextLexer::new();
    let err = collect(&lexer, "a \"open").unwrap_err();
    insta::assert_snapshot!(err, @"1:3: unterminated string literal");
}

#[test]
fn empty_input_is_only_eof() {
    let lexer = TextLexer::new();
    let tokens = collect(&lexer, "   \n").unwrap();
    assert_eq!(tokens.len(), 1);
    assert!(tokens[0].is_eof());
    assert_eq!(tokens[0].pos.line, 2);
}
