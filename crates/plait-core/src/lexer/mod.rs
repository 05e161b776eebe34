//! Tokenizer seam and the bundled lexers.
//!
//! The parsing engine only ever sees a [`TokenStream`]. A [`LexerDefinition`]
//! is the reusable, shareable half: it publishes the kind names grammars may
//! reference and opens a stream per input.

mod filter;
mod regex;
mod text;

#[cfg(test)]
mod regex_tests;
#[cfg(test)]
mod text_tests;

pub use filter::{TokenFilter, TokenMapper, unquote};
pub use regex::RegexLexer;
pub use text::TextLexer;

use crate::{Position, Symbols, Token};

/// Pull-based source of tokens.
///
/// After the last real token a stream yields one token of kind
/// [`TokenKind::EOF`](crate::TokenKind::EOF); callers stop pulling there.
pub trait TokenStream {
    fn next_token(&mut self) -> Result<Token, LexError>;
}

impl<S: TokenStream + ?Sized> TokenStream for Box<S> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        (**self).next_token()
    }
}

/// A lexer that can tokenize any number of inputs.
pub trait LexerDefinition: Send + Sync {
    fn symbols(&self) -> &Symbols;

    fn lex<'s>(&'s self, source: &'s str) -> Box<dyn TokenStream + 's>;
}

/// A stream over an already tokenized input.
///
/// The final token must be `EOF`; one is appended if missing.
#[derive(Debug, Clone)]
pub struct VecStream {
    tokens: std::vec::IntoIter<Token>,
    last: Position,
}

impl VecStream {
    pub fn new(mut tokens: Vec<Token>) -> Self {
        if !tokens.last().is_some_and(Token::is_eof) {
            let pos = tokens.last().map_or(Position::START, |t| t.pos);
            tokens.push(Token::eof(pos));
        }
        Self {
            last: Position::START,
            tokens: tokens.into_iter(),
        }
    }
}

impl TokenStream for VecStream {
    fn next_token(&mut self) -> Result<Token, LexError> {
        match self.tokens.next() {
            Some(token) => {
                self.last = token.pos;
                Ok(token)
            }
            None => Ok(Token::eof(self.last)),
        }
    }
}

/// Failure reported while producing tokens.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("{pos}: unexpected character {ch:?}")]
    UnexpectedChar { ch: char, pos: Position },

    #[error("{pos}: unterminated {what}")]
    Unterminated { what: &'static str, pos: Position },

    #[error("input is not valid UTF-8 (at byte {offset})")]
    InvalidUtf8 { offset: usize },

    #[error("failed to read input: {0}")]
    Io(String),

    #[error("{pos}: cannot map token {text:?}: {message}")]
    Mapping {
        text: String,
        pos: Position,
        message: String,
    },
}

impl From<std::io::Error> for LexError {
    fn from(err: std::io::Error) -> Self {
        LexError::Io(err.to_string())
    }
}

impl From<std::str::Utf8Error> for LexError {
    fn from(err: std::str::Utf8Error) -> Self {
        LexError::InvalidUtf8 {
            offset: err.valid_up_to(),
        }
    }
}

/// Failure constructing a lexer from rules.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexerBuildError {
    #[error("rule `{name}` has an invalid pattern: {message}")]
    InvalidPattern { name: String, message: String },

    #[error("rule `{0}` is defined twice")]
    DuplicateRule(String),

    #[error("rule name `EOF` is reserved")]
    ReservedName,
}
