#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Token-level building blocks shared by the plait compiler and VM.
//!
//! - [`Token`], [`TokenKind`] and [`Position`]: what a lexer produces
//! - [`Symbols`]: the name → kind table a lexer exposes to grammars
//! - [`TokenStream`] / [`LexerDefinition`]: the pluggable tokenizer seam
//! - [`TextLexer`], [`RegexLexer`]: bundled lexers for string input
//! - [`TokenFilter`]: elision and token mapping applied between lexer and parser

pub mod lexer;
mod position;
mod symbols;
mod token;
pub mod utils;

#[cfg(test)]
mod symbols_tests;

pub use lexer::{
    LexError, LexerBuildError, LexerDefinition, RegexLexer, TextLexer, TokenFilter, TokenMapper,
    TokenStream, VecStream, unquote,
};
pub use position::{LineTracker, Position};
pub use symbols::Symbols;
pub use token::{Token, TokenKind};
