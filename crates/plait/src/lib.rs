//! Plait: parsers built from grammar annotations on Rust types.
//!
//! Each field of an output type carries a fragment of a PEG grammar; `@`
//! captures token text into the field and `@@` parses a nested type into it.
//!
//! # Example
//!
//! ```
//! use plait::{Grammar, Parser};
//!
//! #[derive(Debug, Default, Grammar)]
//! struct Assignment {
//!     #[grammar("@Ident '='")]
//!     name: String,
//!     #[grammar("@Int ';'")]
//!     value: i64,
//! }
//!
//! let parser = Parser::<Assignment>::build().unwrap();
//! let parsed = parser.parse_str("answer = 42;").unwrap();
//! assert_eq!(parsed.name, "answer");
//! assert_eq!(parsed.value, 42);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Lets `#[derive(Grammar)]` output, which names `::plait`, expand inside this crate.
extern crate self as plait;

mod error;
mod parser;

#[cfg(all(test, feature = "derive"))]
mod derive_tests;

pub use error::{Error, Result};
pub use parser::{Parser, ParserBuilder, Prefix};

pub use plait_compiler::{
    BindError, Capture, CompileError, Describe, DiagnosticKind, Diagnostics, Grammar, NodeSlot,
    Program, Scalar, Severity, Strategy, ValueSlot,
};
pub use plait_core::{
    LexError, LexerBuildError, LexerDefinition, Position, RegexLexer, Symbols, TextLexer, Token,
    TokenKind, TokenStream, VecStream, unquote,
};
pub use plait_vm::{Expected, FuelLimits, ParseError, Verbosity};

#[cfg(feature = "derive")]
pub use plait_macros::Grammar;

/// Parses `source` as a `T` with the default lexer.
///
/// Builds a fresh [`Parser`] per call; keep one around to parse repeatedly.
pub fn parse_str<T: Grammar>(source: &str) -> Result<T> {
    Ok(Parser::<T>::build()?.parse_str(source)?)
}
