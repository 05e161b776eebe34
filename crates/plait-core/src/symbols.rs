use indexmap::IndexMap;
use serde::Serialize;

use crate::TokenKind;

/// Name → [`TokenKind`] table published by a lexer.
///
/// Ids are dense and assigned in definition order; `EOF` always owns id 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbols {
    names: IndexMap<String, TokenKind>,
}

impl Symbols {
    pub const EOF_NAME: &'static str = "EOF";

    pub fn new() -> Self {
        let mut names = IndexMap::new();
        names.insert(Self::EOF_NAME.to_owned(), TokenKind::EOF);
        Self { names }
    }

    /// Returns the kind registered under `name`, registering it if needed.
    pub fn define(&mut self, name: &str) -> TokenKind {
        if let Some(&kind) = self.names.get(name) {
            return kind;
        }
        let id = u16::try_from(self.names.len()).unwrap_or_else(|_| {
            panic!("Symbols: more than {} token kinds", u16::MAX)
        });
        let kind = TokenKind::new(id);
        self.names.insert(name.to_owned(), kind);
        kind
    }

    pub fn get(&self, name: &str) -> Option<TokenKind> {
        self.names.get(name).copied()
    }

    /// Name of `kind`, or `None` for ids this table never issued.
    pub fn name(&self, kind: TokenKind) -> Option<&str> {
        self.names
            .get_index(kind.index())
            .map(|(name, _)| name.as_str())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl Default for Symbols {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FromIterator<&'a str> for Symbols {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut symbols = Symbols::new();
        for name in iter {
            symbols.define(name);
        }
        symbols
    }
}
