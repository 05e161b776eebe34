//! Plait compiler: from annotated output types to linked grammars.
//!
//! The pipeline for one output type:
//! - `schema` - `Grammar`/`Describe` registration and the capture binder
//! - `parser` - lexer and parser for the annotation mini-language
//! - `analyze` - capture checks and left-recursion detection
//! - `compile` - per-type compilation and the process-wide schema cache
//! - `link` - resolves token kinds against a lexer into a `Program`
//! - `printer` - EBNF rendering of a linked program
//! - `diagnostics` - error reporting

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod analyze;
pub mod compile;
pub mod diagnostics;
pub mod ir;
pub mod link;
pub mod parser;
pub mod printer;
pub mod schema;

#[cfg(test)]
pub mod test_utils;

pub use compile::{compile_type, schema_of};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use link::{Program, Rule, link};
pub use schema::{
    BindError, Binding, Capture, Captured, Describe, FieldDescriptor, Grammar, NodeSlot, Scalar,
    Schema, Strategy, TypeRef, ValueSlot,
};

/// Errors raised while turning output types into a program.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CompileError {
    /// The annotations of one type are malformed or do not fit its fields.
    #[error("grammar for `{type_name}` is invalid: {diagnostics}")]
    InvalidGrammar {
        type_name: String,
        diagnostics: Diagnostics,
    },

    /// The types compiled, but do not fit the lexer or recurse on the left.
    #[error("linking `{root}` failed: {diagnostics}")]
    LinkFailed { root: String, diagnostics: Diagnostics },
}

impl CompileError {
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            CompileError::InvalidGrammar { diagnostics, .. }
            | CompileError::LinkFailed { diagnostics, .. } => diagnostics,
        }
    }
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, CompileError>;
