use std::fmt;

use serde::Serialize;

use crate::Position;

/// Kind identifier assigned by a lexer's [`Symbols`](crate::Symbols) table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TokenKind(u16);

impl TokenKind {
    /// Every symbol table reserves id 0 for the end of the stream.
    pub const EOF: TokenKind = TokenKind(0);

    pub const fn new(id: u16) -> Self {
        Self(id)
    }

    pub const fn id(self) -> u16 {
        self.0
    }

    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, pos: Position) -> Self {
        Self {
            kind,
            text: text.into(),
            pos,
        }
    }

    pub fn eof(pos: Position) -> Self {
        Self::new(TokenKind::EOF, "", pos)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EOF
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_eof() {
            f.write_str("end of input")
        } else {
            write!(f, "{:?}", self.text)
        }
    }
}
