//! Linker: binds compiled schemas to one lexer.
//!
//! Starting from the root type, every type reachable through `@@` is pulled
//! from the schema cache into an arena keyed by `TypeId`. A type is entered
//! in the arena before its own references are followed, so self and mutual
//! recursion terminate. Token-kind names are resolved against the lexer's
//! [`Symbols`], then the whole program is checked for left recursion.


use std::any::TypeId;
use std::sync::Arc;

use indexmap::IndexMap;
use plait_core::utils::{find_similar, suggestion_distance};
use plait_core::{Symbols, TokenKind};

use crate::CompileError;
use crate::analyze::recursion::check_recursion;
use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::{KindRef, Node, RefId, RuleId};
use crate::schema::{KindUse, Schema, TypeRef};

/// One linked type: its schema plus resolved kinds and references.
#[derive(Debug, Clone)]
pub struct Rule {
    schema: Arc<Schema>,
    kinds: Vec<TokenKind>,
    targets: Vec<RuleId>,
}

impl Rule {
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    pub fn name(&self) -> &str {
        self.schema.name()
    }

    pub fn root(&self) -> &Node {
        self.schema.root()
    }

    pub fn kind(&self, kind: KindRef) -> TokenKind {
        self.kinds[kind.index()]
    }

    pub fn target(&self, target: RefId) -> RuleId {
        self.targets[target.index()]
    }
}

/// Immutable grammar for one root type and one lexer. Rule 0 is the root.
#[derive(Debug, Clone)]
pub struct Program {
    rules: Vec<Rule>,
    symbols: Symbols,
    warnings: Diagnostics,
}

impl Program {
    pub fn root(&self) -> RuleId {
        RuleId::new(0)
    }

    pub fn rule(&self, id: RuleId) -> &Rule {
        &self.rules[id.index()]
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    /// Kind name for messages; ids foreign to the lexer render as `?`.
    pub fn kind_name(&self, kind: TokenKind) -> &str {
        self.symbols.name(kind).unwrap_or("?")
    }

    /// Non-fatal findings, e.g. repetitions that can match nothing.
    pub fn warnings(&self) -> &Diagnostics {
        &self.warnings
    }

    /// Resolves kind names supplied outside the annotations (elision,
    /// token mappers).
    pub fn resolve_kinds<'n>(
        &self,
        names: impl IntoIterator<Item = &'n str>,
    ) -> Result<Vec<TokenKind>, CompileError> {
        let root = self.rule(self.root()).name().to_owned();
        let mut diagnostics = Diagnostics::new();
        let mut kinds = Vec::new();
        for name in names {
            match self.symbols.get(name) {
                Some(kind) => kinds.push(kind),
                None => {
                    let mut report = diagnostics
                        .report(DiagnosticKind::UnknownTokenKind, &root)
                        .message(name);
                    if let Some(similar) = similar_kind(name, &self.symbols) {
                        report = report.hint(format!("did you mean `{similar}`?"));
                    }
                    report.emit();
                }
            }
        }
        if diagnostics.has_errors() {
            return Err(CompileError::LinkFailed { root, diagnostics });
        }
        Ok(kinds)
    }
}

/// Links `root` and every type it references against `symbols`.
pub fn link(root: &TypeRef, symbols: &Symbols) -> Result<Program, CompileError> {
    let mut arena: IndexMap<TypeId, Arc<Schema>> = IndexMap::new();
    arena.insert(root.type_id(), root.schema()?);

    let mut targets: Vec<Vec<RuleId>> = Vec::new();
    while targets.len() < arena.len() {
        let schema = Arc::clone(&arena[targets.len()]);
        let mut rule_targets = Vec::with_capacity(schema.refs().len());
        for target in schema.refs() {
            let index = match arena.get_index_of(&target.type_id()) {
                Some(index) => index,
                None => arena.insert_full(target.type_id(), target.schema()?).0,
            };
            rule_targets.push(RuleId::new(index));
        }
        targets.push(rule_targets);
    }

    let mut diagnostics = Diagnostics::new();
    let rules: Vec<Rule> = arena
        .into_values()
        .zip(targets)
        .map(|(schema, targets)| {
            let kinds = schema
                .kinds()
                .iter()
                .map(|used| resolve_kind(&schema, used, symbols, &mut diagnostics))
                .collect();
            Rule {
                schema,
                kinds,
                targets,
            }
        })
        .collect();

    let root_name = rules[0].name().to_owned();
    if diagnostics.has_errors() {
        return Err(CompileError::LinkFailed {
            root: root_name,
            diagnostics,
        });
    }

    check_recursion(&rules, &mut diagnostics);
    let warnings = diagnostics.take_warnings();
    if diagnostics.has_errors() {
        return Err(CompileError::LinkFailed {
            root: root_name,
            diagnostics,
        });
    }

    Ok(Program {
        rules,
        symbols: symbols.clone(),
        warnings,
    })
}

fn resolve_kind(
    schema: &Schema,
    used: &KindUse,
    symbols: &Symbols,
    diagnostics: &mut Diagnostics,
) -> TokenKind {
    if let Some(kind) = symbols.get(&used.name) {
        return kind;
    }
    let site = schema.field(used.loc.field).site(used.loc.range);
    let mut report = diagnostics
        .report(DiagnosticKind::UnknownTokenKind, schema.name())
        .at(site)
        .message(&used.name);
    if let Some(similar) = similar_kind(&used.name, symbols) {
        report = report.hint(format!("did you mean `{similar}`?"));
    }
    report.emit();
    TokenKind::EOF
}

fn similar_kind<'s>(name: &str, symbols: &'s Symbols) -> Option<&'s str> {
    find_similar(name, symbols.names(), suggestion_distance(name))
}
