use crate::{BindError, Capture, Describe, Grammar, Parser, Position};

#[derive(Debug, Default, PartialEq, Grammar)]
struct Number {
    #[grammar("@Float")]
    float: Option<f64>,
    #[grammar("| @Int")]
    int: Option<i64>,
}

#[derive(Debug, Default, Grammar)]
#[grammar(name = "Pair")]
struct DerivedPair {
    #[grammar(pos)]
    pos: Position,
    #[grammar("@Ident ':'")]
    key: String,
    #[grammar("@@")]
    value: Box<Number>,
    #[grammar("[ @',' ]")]
    trailing_comma: bool,
    unparsed: u32,
}

#[derive(Debug, Default)]
struct ManualPair {
    pos: Position,
    key: String,
    value: Box<Number>,
    trailing_comma: bool,
}

impl Grammar for ManualPair {
    fn describe(g: &mut Describe<Self>) {
        g.name("Pair");
        g.pos(|p| &mut p.pos);
        g.value("key", "@Ident ':'", |p| &mut p.key);
        g.node("value", "@@", |p| &mut p.value);
        g.value("trailing_comma", "[ @',' ]", |p| &mut p.trailing_comma);
    }
}

#[derive(Debug, Default)]
struct Joined(String);

impl Capture for Joined {
    fn capture(&mut self, values: &[String]) -> Result<(), BindError> {
        if !self.0.is_empty() {
            self.0.push(' ');
        }
        self.0.push_str(&values.concat());
        Ok(())
    }
}

#[derive(Debug, Default, Grammar)]
struct Sentence {
    #[grammar("@Ident+", custom)]
    words: Joined,
    // Grammar only; nothing is stored.
    #[allow(dead_code)]
    #[grammar("'('")]
    open: (),
    #[grammar("@@ ')'", embed)]
    number: Number,
    #[grammar(end_pos)]
    end: Position,
    #[grammar(tokens)]
    tokens: Vec<crate::Token>,
}

#[derive(Debug, Default, Grammar)]
struct Keyword {
    #[grammar("'type' @Ident")]
    r#type: String,
}

#[test]
fn matches_hand_written_impl() {
    let derived = Parser::<DerivedPair>::build().unwrap();
    let manual = Parser::<ManualPair>::build().unwrap();
    assert_eq!(derived.ebnf(), manual.ebnf());
    insta::assert_snapshot!(derived.ebnf(), @r#"
    Pair = Ident ":" Number [ "," ] .
    Number = Float | Int .
    "#);
}

#[test]
fn derived_fields() {
    let parser = Parser::<DerivedPair>::build().unwrap();
    let pair = parser.parse_str("answer: 42,").unwrap();
    assert_eq!(pair.pos, Position::START);
    assert_eq!(pair.key, "answer");
    assert_eq!(*pair.value, Number { float: None, int: Some(42) });
    assert!(pair.trailing_comma);
    assert_eq!(pair.unparsed, 0);

    let manual = Parser::<ManualPair>::build().unwrap();
    let pair = manual.parse_str("half: 0.5").unwrap();
    assert_eq!(pair.key, "half");
    assert_eq!(pair.value.float, Some(0.5));
    assert!(!pair.trailing_comma);
}

#[test]
fn custom_embed_and_spans() {
    let parser = Parser::<Sentence>::build().unwrap();
    let sentence = parser.parse_str("one two (3)").unwrap();
    assert_eq!(sentence.words.0, "one two");
    assert_eq!(sentence.number.int, Some(3));
    assert_eq!(sentence.end.offset, 11);
    assert_eq!(sentence.tokens.len(), 5);
}

#[test]
fn raw_identifier_fields() {
    let parser = Parser::<Keyword>::build().unwrap();
    assert_eq!(parser.parse_str("type Foo").unwrap().r#type, "Foo");
    let program = parser.program();
    let schema = program.rule(program.root()).schema();
    assert_eq!(schema.fields()[0].name(), "type");
}
