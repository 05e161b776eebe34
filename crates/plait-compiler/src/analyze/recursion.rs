//! Nullability and left-recursion analysis over a linked program.
//!
//! A node is nullable when it can succeed without consuming a token. Rule
//! nullability is a fixpoint because rules reference each other. A reference
//! reachable from the start of a rule without consuming input is a
//! left edge; a cycle of left edges would recurse forever at parse time.

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::{Loc, Node, RuleId};
use crate::link::Rule;
use plait_core::TokenKind;

/// Nullability of every rule, indexed by `RuleId`.
pub fn nullable_rules(rules: &[Rule]) -> Vec<bool> {
    let mut nullable = vec![false; rules.len()];
    loop {
        let mut changed = false;
        for (i, rule) in rules.iter().enumerate() {
            if !nullable[i] && is_nullable(rule, rule.root(), &nullable) {
                nullable[i] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

pub fn is_nullable(rule: &Rule, node: &Node, nullable: &[bool]) -> bool {
    match node {
        Node::Literal { .. } | Node::Not { .. } => false,
        // EOF matches without consuming.
        Node::Token { kind, .. } => rule.kind(*kind) == TokenKind::EOF,
        Node::Seq(children) => children.iter().all(|c| is_nullable(rule, c, nullable)),
        Node::Alt(children) => children.iter().any(|c| is_nullable(rule, c, nullable)),
        Node::Optional(_) => true,
        Node::Repeat { child, min } => *min == 0 || is_nullable(rule, child, nullable),
        Node::Group(child) | Node::Capture { child, .. } => is_nullable(rule, child, nullable),
        Node::Ref { target, .. } => nullable[rule.target(*target).index()],
    }
}

/// Reports left recursion (error) and nullable repetitions (warning).
pub fn check_recursion(rules: &[Rule], diag: &mut Diagnostics) {
    let nullable = nullable_rules(rules);

    for rule in rules {
        warn_nullable_repetitions(rule, &nullable, diag);
    }

    let edges: Vec<Vec<(RuleId, Loc)>> = rules
        .iter()
        .map(|rule| {
            let mut out = Vec::new();
            left_edges(rule, rule.root(), &nullable, &mut out);
            out
        })
        .collect();

    let mut search = CycleSearch {
        rules,
        edges: &edges,
        state: vec![Visit::New; rules.len()],
        path: Vec::new(),
        diag,
    };
    for start in 0..rules.len() {
        if search.state[start] == Visit::New {
            search.visit(RuleId::new(start));
        }
    }
}

/// References reachable from the start of `node` without consuming input.
fn left_edges(rule: &Rule, node: &Node, nullable: &[bool], out: &mut Vec<(RuleId, Loc)>) {
    match node {
        Node::Literal { .. } | Node::Token { .. } => {}
        Node::Seq(children) => {
            for child in children {
                left_edges(rule, child, nullable, out);
                if !is_nullable(rule, child, nullable) {
                    break;
                }
            }
        }
        Node::Alt(children) => {
            for child in children {
                left_edges(rule, child, nullable, out);
            }
        }
        Node::Optional(child) | Node::Group(child) => left_edges(rule, child, nullable, out),
        Node::Repeat { child, .. } | Node::Capture { child, .. } | Node::Not { child, .. } => {
            left_edges(rule, child, nullable, out)
        }
        Node::Ref { target, loc } => out.push((rule.target(*target), *loc)),
    }
}

fn warn_nullable_repetitions(rule: &Rule, nullable: &[bool], diag: &mut Diagnostics) {
    rule.root().walk(&mut |node| {
        let Node::Repeat { child, .. } = node else {
            return;
        };
        if !is_nullable(rule, child, nullable) {
            return;
        }
        let mut report = diag.report(DiagnosticKind::NullableRepetition, rule.name());
        if let Some(loc) = first_loc(child) {
            report = report.at(rule.schema().field(loc.field).site(loc.range));
        }
        report.emit();
    });
}

fn first_loc(node: &Node) -> Option<Loc> {
    let mut found = None;
    node.walk(&mut |n| {
        if found.is_some() {
            return;
        }
        found = match n {
            Node::Literal { loc, .. }
            | Node::Token { loc, .. }
            | Node::Capture { loc, .. }
            | Node::Ref { loc, .. }
            | Node::Not { loc, .. } => Some(*loc),
            _ => None,
        };
    });
    found
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

struct CycleSearch<'r, 'd> {
    rules: &'r [Rule],
    edges: &'r [Vec<(RuleId, Loc)>],
    state: Vec<Visit>,
    path: Vec<RuleId>,
    diag: &'d mut Diagnostics,
}

impl CycleSearch<'_, '_> {
    fn visit(&mut self, id: RuleId) {
        self.state[id.index()] = Visit::Active;
        self.path.push(id);

        let edges = self.edges;
        for &(target, loc) in &edges[id.index()] {
            match self.state[target.index()] {
                Visit::New => self.visit(target),
                Visit::Active => self.report_cycle(id, target, loc),
                Visit::Done => {}
            }
        }

        self.path.pop();
        self.state[id.index()] = Visit::Done;
    }

    /// `from -> target` closes a cycle through the rules on the current path.
    fn report_cycle(&mut self, from: RuleId, target: RuleId, loc: Loc) {
        let start = self
            .path
            .iter()
            .position(|&id| id == target)
            .unwrap_or(0);
        let mut names: Vec<&str> = self.path[start..]
            .iter()
            .map(|id| self.rules[id.index()].name())
            .collect();
        names.push(self.rules[target.index()].name());

        let rule = &self.rules[from.index()];
        let site = rule.schema().field(loc.field).site(loc.range);
        self.diag
            .report(DiagnosticKind::LeftRecursion, rule.name())
            .at(site)
            .message(names.join(" -> "))
            .emit();
    }
}
