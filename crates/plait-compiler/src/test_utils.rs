//! Grammar fixtures shared by the compiler's unit tests.

use plait_core::{LexerDefinition, Symbols, TextLexer};

use crate::analyze::check_captures;
use crate::diagnostics::Diagnostics;
use crate::ir::{CaptureMode, Node};
use crate::parser::{self, Parsed};
use crate::schema::{Binding, Describe, FieldDescriptor, Grammar};

/// Kind table of the default text lexer.
pub fn text_symbols() -> Symbols {
    TextLexer::new().symbols().clone()
}

fn render(diagnostics: &Diagnostics) -> String {
    diagnostics
        .iter()
        .map(|d| d.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Catch-all output type: one field per capture strategy.
#[derive(Debug, Default, PartialEq)]
pub struct Probe {
    pub text: String,
    pub texts: Vec<String>,
    pub flag: bool,
    pub int: i64,
    pub child: Option<Box<Probe>>,
    pub children: Vec<Probe>,
}

impl Grammar for Probe {
    fn describe(g: &mut Describe<Self>) {
        g.value("text", "@Ident", |p| &mut p.text);
    }
}

/// Field descriptors for [`Probe`] with arbitrary annotations.
///
/// Field names select the binding; any other name is an unbound rule.
pub fn probe_fields(spec: &[(&str, &str)]) -> Vec<FieldDescriptor> {
    spec.iter()
        .map(|&(name, annotation)| {
            let binding = match name {
                "text" => Some(Binding::value::<Probe, _, _>(|p: &mut Probe| &mut p.text)),
                "texts" => Some(Binding::value::<Probe, _, _>(|p: &mut Probe| &mut p.texts)),
                "flag" => Some(Binding::value::<Probe, _, _>(|p: &mut Probe| &mut p.flag)),
                "int" => Some(Binding::value::<Probe, _, _>(|p: &mut Probe| &mut p.int)),
                "child" => Some(Binding::node::<Probe, Probe, _, _>(|p: &mut Probe| &mut p.child)),
                "children" => Some(Binding::node::<Probe, Probe, _, _>(|p: &mut Probe| {
                    &mut p.children
                })),
                _ => None,
            };
            FieldDescriptor::new(name, annotation, binding)
        })
        .collect()
}

/// Parses `spec` as a [`Probe`] grammar: the tree dump, or the rendered
/// diagnostics on failure.
pub fn parse_probe(spec: &[(&str, &str)]) -> Result<String, String> {
    let fields = probe_fields(spec);
    let mut diagnostics = Diagnostics::new();
    match parser::parse("Probe", &fields, &mut diagnostics) {
        Some(parsed) => Ok(dump(&parsed, &fields)),
        None => Err(render(&diagnostics)),
    }
}

/// Parses and capture-checks `spec` as a [`Probe`] grammar.
pub fn check_probe(spec: &[(&str, &str)]) -> Result<(), String> {
    let fields = probe_fields(spec);
    let mut diagnostics = Diagnostics::new();
    let Some(parsed) = parser::parse("Probe", &fields, &mut diagnostics) else {
        return Err(render(&diagnostics));
    };
    check_captures("Probe", &fields, &parsed.root, &mut diagnostics);
    if diagnostics.is_empty() {
        Ok(())
    } else {
        Err(render(&diagnostics))
    }
}

/// Compact one-line rendering of a parsed tree.
pub fn dump(parsed: &Parsed, fields: &[FieldDescriptor]) -> String {
    let mut out = String::new();
    dump_node(&parsed.root, parsed, fields, &mut out);
    out
}

fn dump_node(node: &Node, parsed: &Parsed, fields: &[FieldDescriptor], out: &mut String) {
    let list = |children: &[Node], name: &str, out: &mut String| {
        out.push_str(name);
        out.push('(');
        for (i, child) in children.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            dump_node(child, parsed, fields, out);
        }
        out.push(')');
    };
    match node {
        Node::Literal { text, kind, .. } => {
            out.push_str(&format!("{text:?}"));
            if let Some(kind) = kind {
                out.push(':');
                out.push_str(&parsed.kinds[kind.index()].name);
            }
        }
        Node::Token { kind, .. } => out.push_str(&parsed.kinds[kind.index()].name),
        Node::Seq(children) => list(children, "seq", out),
        Node::Alt(children) => list(children, "alt", out),
        Node::Optional(child) => list(std::slice::from_ref(child), "opt", out),
        Node::Group(child) => list(std::slice::from_ref(child), "group", out),
        Node::Repeat { child, min } => list(std::slice::from_ref(child), &format!("rep{min}"), out),
        Node::Not { child, .. } => list(std::slice::from_ref(child), "not", out),
        Node::Capture {
            field, mode, child, ..
        } => {
            let sigil = match mode {
                CaptureMode::Value => "@",
                CaptureMode::Node => "@@",
            };
            let name = format!("{sigil}{}", fields[field.index()].name());
            list(std::slice::from_ref(child), &name, out);
        }
        Node::Ref { target, .. } => out.push_str(&format!("ref({})", parsed.refs[target.index()].name())),
    }
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

impl Grammar for Paren {
    fn describe(g: &mut Describe<Self>) {
        g.rule("open", "'('");
        g.node("inner", "@@?", |p| &mut p.inner);
        g.rule("close", "')'");
    }
}

/// Exercises every EBNF construct.
#[derive(Debug, Default)]
pub struct Stmt {
    pub public: bool,
    pub name: String,
    pub values: Vec<i64>,
    pub body: Vec<Paren>,
}

impl Grammar for Stmt {
    fn describe(g: &mut Describe<Self>) {
        g.value("public", "@'pub'?", |s| &mut s.public);
        g.value("name", "@Ident", |s| &mut s.name);
        g.rule("sep", "( ':' | '=':Punct )");
        g.value("values", "@Int+ !';'", |s| &mut s.values);
        g.node("body", "{ @@ }", |s| &mut s.body);
    }
}

/// `[ LeftRec "+" ] Int`, recursing before consuming anything.
#[derive(Debug, Default)]
pub struct LeftRec {
    pub lhs: Option<Box<LeftRec>>,
    pub rhs: i64,
}

impl Grammar for LeftRec {
    fn describe(g: &mut Describe<Self>) {
        g.node("lhs", "( @@ '+' )?", |l| &mut l.lhs);
        g.value("rhs", "@Int", |l| &mut l.rhs);
    }
}

/// `Pong | "ping"`
#[derive(Debug, Default)]
pub struct Ping {
    pub pong: Option<Box<Pong>>,
}

impl Grammar for Ping {
    fn describe(g: &mut Describe<Self>) {
        g.node("pong", "@@ | 'ping'", |p| &mut p.pong);
    }
}

/// `Ping "pong"`
#[derive(Debug, Default)]
pub struct Pong {
    pub ping: Box<Ping>,
}

impl Grammar for Pong {
    fn describe(g: &mut Describe<Self>) {
        g.node("ping", "@@ 'pong'", |p| &mut p.ping);
    }
}

/// References a kind the text lexer does not have.
#[derive(Debug, Default)]
pub struct Typo {
    pub name: String,
}

impl Grammar for Typo {
    fn describe(g: &mut Describe<Self>) {
        g.value("name", "@Idents", |t| &mut t.name);
    }
}

/// `{ [ Ident ] } EOF`: nullable, with a repetition that can match nothing.
#[derive(Debug, Default)]
pub struct Blanks {
    pub words: Vec<String>,
}

impl Grammar for Blanks {
    fn describe(g: &mut Describe<Self>) {
        g.value("words", "{ [ @Ident ] }", |b| &mut b.words);
        g.rule("end", "EOF");
    }
}
