//! Token post-processing between a lexer and the parser.

use std::fmt;
use std::sync::Arc;

use super::LexError;
use crate::{Token, TokenKind};

type MapFn = dyn Fn(Token) -> Result<Token, String> + Send + Sync;

/// Rewrites tokens of selected kinds (all kinds when the set is empty).
#[derive(Clone)]
pub struct TokenMapper {
    kinds: Vec<TokenKind>,
    map: Arc<MapFn>,
}

impl TokenMapper {
    pub fn new(
        kinds: Vec<TokenKind>,
        map: impl Fn(Token) -> Result<Token, String> + Send + Sync + 'static,
    ) -> Self {
        Self {
            kinds,
            map: Arc::new(map),
        }
    }

    /// Strips quotes and resolves escapes of string-like tokens.
    pub fn unquote(kinds: Vec<TokenKind>) -> Self {
        Self::new(kinds, |mut token| {
            token.text = unquote(&token.text)?;
            Ok(token)
        })
    }

    fn applies_to(&self, kind: TokenKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }
}

impl fmt::Debug for TokenMapper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenMapper")
            .field("kinds", &self.kinds)
            .finish_non_exhaustive()
    }
}

/// Elides kinds and runs mappers, in registration order.
#[derive(Debug, Clone, Default)]
pub struct TokenFilter {
    elide: Vec<TokenKind>,
    mappers: Vec<TokenMapper>,
}

impl TokenFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elide(mut self, kind: TokenKind) -> Self {
        if !self.elide.contains(&kind) {
            self.elide.push(kind);
        }
        self
    }

    pub fn map(mut self, mapper: TokenMapper) -> Self {
        self.mappers.push(mapper);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.elide.is_empty() && self.mappers.is_empty()
    }

    /// `Ok(None)` when the token is elided. `EOF` is never elided or mapped.
    pub fn apply(&self, token: Token) -> Result<Option<Token>, LexError> {
        if token.is_eof() {
            return Ok(Some(token));
        }
        if self.elide.contains(&token.kind) {
            return Ok(None);
        }
        let mut token = token;
        for mapper in &self.mappers {
            if !mapper.applies_to(token.kind) {
                continue;
            }
            let text = token.text.clone();
            let pos = token.pos;
            token = (mapper.map)(token).map_err(|message| LexError::Mapping {
                text,
                pos,
                message,
            })?;
        }
        Ok(Some(token))
    }
}

/// Removes the surrounding quotes of `"..."`, `'...'` or `` `...` `` text and
/// resolves escapes (raw strings are taken verbatim).
pub fn unquote(text: &str) -> Result<String, String> {
    let mut chars = text.chars();
    let (Some(open), Some(close)) = (chars.next(), chars.next_back()) else {
        return Err("expected a quoted literal".to_owned());
    };
    if open != close || !matches!(open, '"' | '\'' | '`') {
        return Err("expected a quoted literal".to_owned());
    }
    let body = chars.as_str();
    if open == '`' {
        return Ok(body.to_owned());
    }

    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('r') => '\r',
            Some('t') => '\t',
            Some('0') => '\0',
            Some(c @ ('\\' | '"' | '\'')) => c,
            Some('u') => unicode_escape(&mut chars)?,
            Some(other) => return Err(format!("unknown escape `\\{other}`")),
            None => return Err("dangling `\\` at end of literal".to_owned()),
        };
        out.push(escaped);
    }
    Ok(out)
}

/// Parses the `{XXXX}` part of a `\u{XXXX}` escape.
fn unicode_escape(chars: &mut std::str::Chars<'_>) -> Result<char, String> {
    if chars.next() != Some('{') {
        return Err("expected `{` after `\\u`".to_owned());
    }
    let mut digits = String::new();
    for c in chars.by_ref() {
        if c == '}' {
            let code = u32::from_str_radix(&digits, 16)
                .map_err(|_| format!("invalid unicode escape `\\u{{{digits}}}`"))?;
            return char::from_u32(code)
                .ok_or_else(|| format!("`\\u{{{digits}}}` is not a valid character"));
        }
        digits.push(c);
    }
    Err("unterminated unicode escape".to_owned())
}
