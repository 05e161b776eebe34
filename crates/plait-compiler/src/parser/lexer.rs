//! Lexer for the annotation mini-language.
//!
//! Each field's annotation is lexed on its own; tokens remember their field
//! so that one expression can span several fields. Consecutive unrecognized
//! bytes coalesce into a single `Garbage` token.

use logos::Logos;
use rowan::{TextRange, TextSize};

use crate::ir::FieldId;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("@@")]
    AtAt,

    #[token("@")]
    At,

    #[token("|")]
    Pipe,

    #[token("(")]
    ParenOpen,

    #[token(")")]
    ParenClose,

    #[token("[")]
    BracketOpen,

    #[token("]")]
    BracketClose,

    #[token("{")]
    BraceOpen,

    #[token("}")]
    BraceClose,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    #[token("!")]
    Negation,

    #[token(":")]
    Colon,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[regex(r"'(?:[^'\\]|\\.)*'")]
    StringLiteral,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Id,

    #[regex(r"[ \t\r\n]+")]
    Whitespace,

    /// Unrecognized bytes, including an unterminated quote.
    Garbage,
}

impl SyntaxKind {
    pub fn describe(self) -> &'static str {
        match self {
            SyntaxKind::AtAt => "`@@`",
            SyntaxKind::At => "`@`",
            SyntaxKind::Pipe => "`|`",
            SyntaxKind::ParenOpen => "`(`",
            SyntaxKind::ParenClose => "`)`",
            SyntaxKind::BracketOpen => "`[`",
            SyntaxKind::BracketClose => "`]`",
            SyntaxKind::BraceOpen => "`{`",
            SyntaxKind::BraceClose => "`}`",
            SyntaxKind::Star => "`*`",
            SyntaxKind::Plus => "`+`",
            SyntaxKind::Question => "`?`",
            SyntaxKind::Negation => "`!`",
            SyntaxKind::Colon => "`:`",
            SyntaxKind::StringLiteral => "string literal",
            SyntaxKind::Id => "identifier",
            SyntaxKind::Whitespace => "whitespace",
            SyntaxKind::Garbage => "unrecognized input",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub field: FieldId,
    pub range: TextRange,
}

/// Lexes one annotation. Whitespace is dropped.
pub fn lex(field: FieldId, source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = SyntaxKind::lexer(source);
    let mut garbage: Option<TextRange> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                flush_garbage(&mut tokens, &mut garbage, field);
                if kind != SyntaxKind::Whitespace {
                    tokens.push(Token {
                        kind,
                        field,
                        range: range_of(lexer.span()),
                    });
                }
            }
            Some(Err(())) => {
                let range = range_of(lexer.span());
                garbage = Some(match garbage {
                    Some(open) => open.cover(range),
                    None => range,
                });
            }
            None => {
                flush_garbage(&mut tokens, &mut garbage, field);
                return tokens;
            }
        }
    }
}

fn flush_garbage(tokens: &mut Vec<Token>, garbage: &mut Option<TextRange>, field: FieldId) {
    if let Some(range) = garbage.take() {
        tokens.push(Token {
            kind: SyntaxKind::Garbage,
            field,
            range,
        });
    }
}

fn range_of(span: std::ops::Range<usize>) -> TextRange {
    TextRange::new(
        TextSize::from(span.start as u32),
        TextSize::from(span.end as u32),
    )
}

pub fn token_text<'s>(source: &'s str, token: &Token) -> &'s str {
    &source[token.range]
}
