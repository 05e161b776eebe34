//! Annotation parser.
//!
//! Grammar (all fields' annotations read as one token stream):
//!
//! ```text
//! expression := sequence ( "|" sequence )*
//! sequence   := term+
//! term       := primary ( "*" | "+" | "?" )?
//! primary    := "@@" | "@" primary | "!" primary | atom
//! atom       := STRING ( ":" IDENT )? | IDENT
//!             | "(" expression ")" | "[" expression "]" | "{" expression "}"
//! ```
//!
//! Syntax errors stop the parse at the first problem; everything after an
//! unbalanced delimiter would only add noise.

mod core;
mod grammar;
pub mod lexer;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod parser_tests;

use indexmap::IndexMap;

use std::any::TypeId;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::ir::{FieldId, Loc, Node};
use crate::schema::{FieldDescriptor, KindUse, TypeRef};

pub(crate) use self::core::Parser;

/// Result of parsing one type's annotations.
#[derive(Debug)]
pub struct Parsed {
    pub root: Node,
    pub kinds: Vec<KindUse>,
    pub refs: Vec<TypeRef>,
}

/// Parses the annotations of `fields`. Returns `None` when errors were
/// reported.
pub fn parse(
    type_name: &str,
    fields: &[FieldDescriptor],
    diagnostics: &mut Diagnostics,
) -> Option<Parsed> {
    let tokens: Vec<_> = fields
        .iter()
        .enumerate()
        .flat_map(|(i, field)| lexer::lex(FieldId::new(i), field.annotation()))
        .collect();
    if tokens.is_empty() {
        diagnostics
            .report(DiagnosticKind::EmptyGrammar, type_name)
            .message(format!("`{type_name}` has no annotated fields"))
            .emit();
        return None;
    }

    let errors_before = diagnostics.error_count();
    let mut parser = Parser::new(type_name, fields, tokens, diagnostics);
    let root = parser.parse_root().ok()?;
    let (kinds, refs) = parser.finish();
    if diagnostics.error_count() > errors_before {
        return None;
    }

    Some(Parsed {
        root,
        kinds: kinds
            .into_iter()
            .map(|(name, loc)| KindUse { name, loc })
            .collect(),
        refs: refs.into_values().collect(),
    })
}

pub(crate) type KindTable = IndexMap<String, Loc>;
pub(crate) type RefTable = IndexMap<TypeId, TypeRef>;
