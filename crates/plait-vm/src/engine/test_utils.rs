//! Grammars and drivers shared by the engine tests.

use plait_compiler::{Describe, Grammar, Program, TypeRef, link};
use plait_core::{LexerDefinition, Position, TextLexer, Token};

use super::{Consumption, FuelLimits, Materializer, ParseError, PrintTracer, TokenBuffer, VM, Verbosity};

pub fn program<T: Grammar>() -> Program {
    link(&TypeRef::of::<T>(), TextLexer::new().symbols()).unwrap()
}

/// Lexes, runs and materializes `source` as a `T`.
pub fn parse<T: Grammar>(source: &str) -> Result<T, ParseError> {
    parse_with(source, FuelLimits::default())
}

pub fn parse_with<T: Grammar>(source: &str, limits: FuelLimits) -> Result<T, ParseError> {
    let lexer = TextLexer::new();
    let program = program::<T>();
    let buffer = TokenBuffer::new(lexer.lex(source));
    let outcome = VM::builder(&program, buffer)
        .limits(limits)
        .build()
        .execute(Consumption::Full)?;
    let mut value = T::default();
    Materializer::new(&program, &outcome.tokens).materialize(
        outcome.effects.as_slice(),
        &mut value,
        outcome.end,
    )?;
    Ok(value)
}

/// Trace lines of a full parse of `source`, whether or not it succeeds.
pub fn trace<T: Grammar>(source: &str, verbosity: Verbosity) -> String {
    let lexer = TextLexer::new();
    let program = program::<T>();
    let buffer = TokenBuffer::new(lexer.lex(source));
    let mut tracer = PrintTracer::new(verbosity);
    let _ = VM::builder(&program, buffer)
        .build()
        .execute_with(Consumption::Full, &mut tracer);
    tracer.into_lines().join("\n")
}

/// `Int { "+" Int }`
#[derive(Debug, Default)]
pub struct Sum {
    pub terms: Vec<i64>,
}

impl Grammar for Sum {
    fn describe(g: &mut Describe<Self>) {
        g.value("terms", "@Int { '+' @Int }", |s| &mut s.terms);
    }
}

/// `"(" [ Paren ] ")"`
#[derive(Debug, Default)]
pub struct Paren {
    pub inner: Option<Box<Paren>>,
}

impl Paren {
    pub fn depth(&self) -> usize {
        1 + self.inner.as_ref().map_or(0, |inner| inner.depth())
    }
}

impl Grammar for Paren {
    fn describe(g: &mut Describe<Self>) {
        g.rule("open", "'('");
        g.node("inner", "@@?", |p| &mut p.inner);
        g.rule("close", "')'");
    }
}

/// Both alternatives capture the same words; only the winner's survive.
#[derive(Debug, Default)]
pub struct Sentence {
    pub words: Vec<String>,
}

impl Grammar for Sentence {
    fn describe(g: &mut Describe<Self>) {
        g.value("words", "@Ident+ '.' | @Ident+ '!'", |s| &mut s.words);
    }
}

#[derive(Debug, Default)]
pub struct Decl {
    pub public: bool,
    pub name: String,
    pub value: Option<i64>,
}

impl Grammar for Decl {
    fn describe(g: &mut Describe<Self>) {
        g.value("public", "@'pub'?", |d| &mut d.public);
        g.value("name", "'let' @Ident", |d| &mut d.name);
        g.value("value", "[ '=' @Int ] ';'", |d| &mut d.value);
    }
}

/// Everything up to the first `;`.
#[derive(Debug, Default)]
pub struct Until {
    pub body: Vec<String>,
}

impl Grammar for Until {
    fn describe(g: &mut Describe<Self>) {
        g.value("body", "{ @!';' } ';'", |u| &mut u.body);
    }
}

/// `{ Ident } EOF`
#[derive(Debug, Default)]
pub struct Words {
    pub words: Vec<String>,
}

impl Grammar for Words {
    fn describe(g: &mut Describe<Self>) {
        g.value("words", "{ @Ident }", |w| &mut w.words);
        g.rule("end", "EOF");
    }
}

#[derive(Debug, Default)]
pub struct Byte {
    pub value: u8,
}

impl Grammar for Byte {
    fn describe(g: &mut Describe<Self>) {
        g.value("value", "@Int", |b| &mut b.value);
    }
}

/// `"[" { Item } "]"`
#[derive(Debug, Default)]
pub struct List {
    pub pos: Position,
    pub end: Position,
    pub items: Vec<Item>,
}

impl Grammar for List {
    fn describe(g: &mut Describe<Self>) {
        g.pos(|l| &mut l.pos);
        g.end_pos(|l| &mut l.end);
        g.rule("open", "'['");
        g.node("items", "{ @@ }", |l| &mut l.items);
        g.rule("close", "']'");
    }
}

/// `Ident [ ":" Ident ]`
#[derive(Debug, Default)]
pub struct Item {
    pub pos: Position,
    pub end: Position,
    pub tokens: Vec<Token>,
    pub name: String,
    pub ty: String,
}

impl Grammar for Item {
    fn describe(g: &mut Describe<Self>) {
        g.pos(|i| &mut i.pos);
        g.end_pos(|i| &mut i.end);
        g.tokens(|i| &mut i.tokens);
        g.value("name", "@Ident", |i| &mut i.name);
        g.value("ty", "[ ':' @Ident ]", |i| &mut i.ty);
    }
}

/// `{ Slot }` where `Slot` may match nothing.
#[derive(Debug, Default)]
pub struct Slots {
    pub slots: Vec<Slot>,
}

impl Grammar for Slots {
    fn describe(g: &mut Describe<Self>) {
        g.node("slots", "{ @@ }", |s| &mut s.slots);
    }
}

/// `Slot+`: one empty slot is still a match.
#[derive(Debug, Default)]
pub struct SomeSlots {
    pub slots: Vec<Slot>,
}

impl Grammar for SomeSlots {
    fn describe(g: &mut Describe<Self>) {
        g.node("slots", "@@+", |s| &mut s.slots);
    }
}

#[derive(Debug, Default, PartialEq)]
pub struct Slot {
    pub name: Option<String>,
}

impl Grammar for Slot {
    fn describe(g: &mut Describe<Self>) {
        g.value("name", "@Ident?", |s| &mut s.name);
    }
}
