use super::{LexError, LexerBuildError, LexerDefinition, RegexLexer, TokenStream};

fn arithmetic() -> RegexLexer {
    RegexLexer::new([
        ("Number", r"[0-9]+(\.[0-9]+)?"),
        ("Ident", r"[A-Za-z_]\w*"),
        ("Op", r"[-+*/()]"),
        ("whitespace", r"\s+"),
    ])
    .unwrap()
}

fn texts(lexer: &RegexLexer, source: &str) -> Result<Vec<String>, LexError> {
    let mut stream = lexer.lex(source);
    let mut out = Vec::new();
    loop {
        let token = stream.next_token()?;
        if token.is_eof() {
            return Ok(out);
        }
        let kind = lexer.symbols().name(token.kind).unwrap();
        out.push(format!("{kind}:{}", token.text));
    }
}

#[test]
fn first_matching_rule_wins() {
    let lexer = arithmetic();
    assert_eq!(
        texts(&lexer, "x1 + 2.5*(y)").unwrap(),
        ["Ident:x1", "Op:+", "Number:2.5", "Op:*", "Op:(", "Ident:y", "Op:)"]
    );
}

#[test]
fn lowercase_rules_are_dropped() {
    let lexer = arithmetic();
    assert!(lexer.symbols().get("whitespace").is_some());
    assert_eq!(texts(&lexer, "  a  ").unwrap(), ["Ident:a"]);
}

#[test]
fn no_rule_matches() {
    let lexer = arithmetic();
    let err = texts(&lexer, "a\n  $").unwrap_err();
    insta::assert_snapshot!(err, @"2:3: unexpected character '$'");
}

#[test]
fn empty_matches_are_ignored() {
    let lexer = RegexLexer::new([("Maybe", r"a*"), ("B", r"b")]).unwrap();
    assert_eq!(texts(&lexer, "aab").unwrap(), ["Maybe:aa", "B:b"]);
}

#[test]
fn build_errors() {
    assert_eq!(
        RegexLexer::new([("EOF", "x")]).unwrap_err(),
        LexerBuildError::ReservedName
    );
    assert_eq!(
        RegexLexer::new([("A", "x"), ("A", "y")]).unwrap_err(),
        LexerBuildError::DuplicateRule("A".to_owned())
    );
    assert!(matches!(
        RegexLexer::new([("Bad", "(")]).unwrap_err(),
        LexerBuildError::InvalidPattern { name, .. } if name == "Bad"
    ));
}
