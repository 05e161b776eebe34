//! General-purpose lexer for C-like text.

use logos::Logos;

use super::{LexError, LexerDefinition, TokenStream};
use crate::{LineTracker, Symbols, Token, TokenKind};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum Lexeme {
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"0[xX][0-9a-fA-F_]+")]
    #[regex(r"0[oO][0-7_]+")]
    #[regex(r"0[bB][01_]+")]
    Int,

    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    Float,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    String,

    #[regex(r"'(?:[^'\\]|\\.)'")]
    Char,

    #[regex(r"`[^`]*`")]
    RawString,

    #[regex(r"//[^\n]*", allow_greedy = true)]
    #[regex(r"/\*(?:[^*]|\*[^/])*\*/")]
    Comment,

    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[regex(r#"[^\sA-Za-z0-9_"'`]"#)]
    Punct,
}

const KIND_NAMES: [&str; 8] = [
    "Ident",
    "Int",
    "Float",
    "String",
    "Char",
    "RawString",
    "Punct",
    "Comment",
];

/// Lexer for identifiers, numbers, quoted strings and single-character
/// punctuation.
///
/// Kinds: `EOF`, `Ident`, `Int`, `Float`, `String`, `Char`, `RawString`,
/// `Punct` and `Comment`. Whitespace is always dropped; comments are dropped
/// unless [`TextLexer::keep_comments`] is set. Quoted tokens keep their
/// quotes, see [`unquote`](super::unquote).
#[derive(Debug, Clone)]
pub struct TextLexer {
    symbols: Symbols,
    keep_comments: bool,
}

impl TextLexer {
    pub fn new() -> Self {
        Self {
            symbols: KIND_NAMES.into_iter().collect(),
            keep_comments: false,
        }
    }

    pub fn keep_comments(mut self) -> Self {
        self.keep_comments = true;
        self
    }

    fn kind(&self, lexeme: Lexeme) -> Option<TokenKind> {
        let name = match lexeme {
            Lexeme::Ident => "Ident",
            Lexeme::Int => "Int",
            Lexeme::Float => "Float",
            Lexeme::String => "String",
            Lexeme::Char => "Char",
            Lexeme::RawString => "RawString",
            Lexeme::Punct => "Punct",
            Lexeme::Comment if self.keep_comments => "Comment",
            Lexeme::Comment | Lexeme::Whitespace => return None,
        };
        self.symbols.get(name)
    }
}

impl Default for TextLexer {
    fn default() -> Self {
        Self::new()
    }
}

impl LexerDefinition for TextLexer {
    fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    fn lex<'s>(&'s self, source: &'s str) -> Box<dyn TokenStream + 's> {
        Box::new(TextStream {
            def: self,
            lexer: Lexeme::lexer(source),
            lines: LineTracker::new(source),
            source,
        })
    }
}

struct TextStream<'s> {
    def: &'s TextLexer,
    lexer: logos::Lexer<'s, Lexeme>,
    lines: LineTracker<'s>,
    source: &'s str,
}

impl TokenStream for TextStream<'_> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        loop {
            match self.lexer.next() {
                Some(Ok(lexeme)) => {
                    let span = self.lexer.span();
                    let Some(kind) = self.def.kind(lexeme) else {
                        continue;
                    };
                    let pos = self.lines.advance_to(span.start);
                    return Ok(Token::new(kind, self.lexer.slice(), pos));
                }
                Some(Err(())) => {
                    let span = self.lexer.span();
                    let pos = self.lines.advance_to(span.start);
                    let slice = self.lexer.slice();
                    return Err(match slice.chars().next() {
                        Some(quote @ ('"' | '\'' | '`')) => LexError::Unterminated {
                            what: quote_name(quote),
                            pos,
                        },
                        Some(ch) => LexError::UnexpectedChar { ch, pos },
                        None => LexError::UnexpectedChar { ch: '\0', pos },
                    });
                }
                None => {
                    let pos = self.lines.advance_to(self.source.len());
                    return Ok(Token::eof(pos));
                }
            }
        }
    }
}

fn quote_name(quote: char) -> &'static str {
    match quote {
        '"' => "string literal",
        '\'' => "character literal",
        _ => "raw string literal",
    }
}
