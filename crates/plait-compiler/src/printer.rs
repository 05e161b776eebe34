//! EBNF rendering of a linked program.
//!
//! One production per rule, root first: `Name = expression .`. Captures are
//! transparent; literals with a kind constraint print as `"text":Kind`.

use std::fmt;

use crate::ir::Node;
use crate::link::{Program, Rule};

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rule in self.rules() {
            writeln!(f, "{} = {} .", rule.name(), format_node(self, rule, rule.root()))?;
        }
        Ok(())
    }
}

/// Formats one expression of `rule`.
pub fn format_node(program: &Program, rule: &Rule, node: &Node) -> String {
    match node {
        Node::Literal { text, kind, .. } => match kind {
            Some(kind) => format!("{text:?}:{}", program.kind_name(rule.kind(*kind))),
            None => format!("{text:?}"),
        },
        Node::Token { kind, .. } => program.kind_name(rule.kind(*kind)).to_owned(),
        Node::Seq(children) => children
            .iter()
            .map(|child| {
                let formatted = format_node(program, rule, child);
                if matches!(child, Node::Alt(_)) {
                    format!("( {formatted} )")
                } else {
                    formatted
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
        Node::Alt(children) => children
            .iter()
            .map(|child| format_node(program, rule, child))
            .collect::<Vec<_>>()
            .join(" | "),
        Node::Optional(child) => format!("[ {} ]", format_node(program, rule, child)),
        Node::Repeat { child, min: 0 } => format!("{{ {} }}", format_node(program, rule, child)),
        Node::Repeat { child, .. } => format!("{}+", atomic(program, rule, child)),
        Node::Group(child) => format!("( {} )", format_node(program, rule, child)),
        Node::Capture { child, .. } => format_node(program, rule, child),
        Node::Ref { target, .. } => program.rule(rule.target(*target)).name().to_owned(),
        Node::Not { child, .. } => format!("!{}", atomic(program, rule, child)),
    }
}

/// Formats `node` so a postfix or prefix operator binds to all of it.
fn atomic(program: &Program, rule: &Rule, node: &Node) -> String {
    let formatted = format_node(program, rule, node);
    if is_atomic(node) {
        formatted
    } else {
        format!("( {formatted} )")
    }
}

fn is_atomic(node: &Node) -> bool {
    match node {
        Node::Literal { .. }
        | Node::Token { .. }
        | Node::Ref { .. }
        | Node::Group(_)
        | Node::Optional(_)
        | Node::Repeat { min: 0, .. } => true,
        Node::Capture { child, .. } => is_atomic(child),
        _ => false,
    }
}
