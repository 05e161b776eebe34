use rowan::TextRange;

use super::{FieldId, KindRef, RefId};

/// Annotation span: which field's annotation, and where in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Loc {
    pub field: FieldId,
    pub range: TextRange,
}

impl Loc {
    pub fn new(field: FieldId, range: TextRange) -> Self {
        Self { field, range }
    }
}

/// `@` binds the matched token texts, `@@` a nested instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureMode {
    Value,
    Node,
}

/// Compiled grammar expression. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// One token with this exact text, optionally also of a given kind.
    Literal {
        text: String,
        kind: Option<KindRef>,
        loc: Loc,
    },
    /// One token of a kind. `EOF` matches the end without consuming it.
    Token { kind: KindRef, loc: Loc },
    Seq(Vec<Node>),
    /// Ordered choice: the first alternative that matches wins.
    Alt(Vec<Node>),
    Optional(Box<Node>),
    /// Greedy repetition; `min` is 0 for `{ }`/`*` and 1 for `+`.
    Repeat { child: Box<Node>, min: u32 },
    Group(Box<Node>),
    Capture {
        field: FieldId,
        mode: CaptureMode,
        child: Box<Node>,
        loc: Loc,
    },
    /// Nested type parsed into a fresh instance.
    Ref { target: RefId, loc: Loc },
    /// Any single token at which `child` does not match.
    Not { child: Box<Node>, loc: Loc },
}

impl Node {
    /// Pre-order walk.
    pub fn walk(&self, f: &mut impl FnMut(&Node)) {
        f(self);
        match self {
            Node::Literal { .. } | Node::Token { .. } | Node::Ref { .. } => {}
            Node::Seq(children) | Node::Alt(children) => {
                for child in children {
                    child.walk(f);
                }
            }
            Node::Optional(child) | Node::Group(child) => child.walk(f),
            Node::Repeat { child, .. } | Node::Capture { child, .. } | Node::Not { child, .. } => {
                child.walk(f)
            }
        }
    }

    /// Wraps `children` in a sequence unless there is exactly one.
    pub(crate) fn seq(mut children: Vec<Node>) -> Node {
        if children.len() == 1 {
            return children.pop().unwrap_or(Node::Seq(Vec::new()));
        }
        Node::Seq(children)
    }

    pub(crate) fn alt(mut children: Vec<Node>) -> Node {
        if children.len() == 1 {
            return children.pop().unwrap_or(Node::Alt(Vec::new()));
        }
        Node::Alt(children)
    }
}
