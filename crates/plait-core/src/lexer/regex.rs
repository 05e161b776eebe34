//! Rule-based lexer over `regex-automata`.

use regex_automata::meta::Regex;
use regex_automata::{Anchored, Input};

use super::{LexError, LexerBuildError, LexerDefinition, TokenStream};
use crate::{LineTracker, Symbols, Token, TokenKind};

#[derive(Debug, Clone)]
struct Rule {
    kind: TokenKind,
    regex: Regex,
    emit: bool,
}

/// Lexer defined by an ordered list of `(name, pattern)` rules.
///
/// At each offset the rules are tried in order and the first one matching a
/// non-empty prefix wins. Rules named with a leading lowercase letter (e.g.
/// `whitespace`) are matched and dropped.
///
/// ```
/// use plait_core::{LexerDefinition, RegexLexer};
///
/// let lexer = RegexLexer::new([
///     ("Ident", r"[a-z]+"),
///     ("Number", r"[0-9]+"),
///     ("Punct", r"[-+*/()=]"),
///     ("whitespace", r"\s+"),
/// ])
/// .unwrap();
/// assert!(lexer.symbols().get("Number").is_some());
/// ```
#[derive(Debug, Clone)]
pub struct RegexLexer {
    symbols: Symbols,
    rules: Vec<Rule>,
}

impl RegexLexer {
    pub fn new<'a>(
        rules: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self, LexerBuildError> {
        let mut symbols = Symbols::new();
        let mut compiled = Vec::new();

        for (name, pattern) in rules {
            if name == Symbols::EOF_NAME {
                return Err(LexerBuildError::ReservedName);
            }
            if symbols.get(name).is_some() {
                return Err(LexerBuildError::DuplicateRule(name.to_owned()));
            }
            let regex = Regex::new(pattern).map_err(|err| LexerBuildError::InvalidPattern {
                name: name.to_owned(),
                message: err.to_string(),
            })?;
            compiled.push(Rule {
                kind: symbols.define(name),
                regex,
                emit: !name.starts_with(|c: char| c.is_ascii_lowercase()),
            });
        }

        Ok(Self {
            symbols,
            rules: compiled,
        })
    }

    fn first_rule_at(&self, source: &str, offset: usize) -> Option<(&Rule, usize)> {
        self.rules.iter().find_map(|rule| {
            let input = Input::new(source)
                .range(offset..)
                .anchored(Anchored::Yes);
            rule.regex
                .find(input)
                .filter(|m| m.end() > offset)
                .map(|m| (rule, m.end()))
        })
    }
}

impl LexerDefinition for RegexLexer {
    fn symbols(&self) -> &Symbols {
        &self.symbols
    }

    fn lex<'s>(&'s self, source: &'s str) -> Box<dyn TokenStream + 's> {
        Box::new(RegexStream {
            def: self,
            source,
            offset: 0,
            lines: LineTracker::new(source),
        })
    }
}

struct RegexStream<'s> {
    def: &'s RegexLexer,
    source: &'s str,
    offset: usize,
    lines: LineTracker<'s>,
}

impl TokenStream for RegexStream<'_> {
    fn next_token(&mut self) -> Result<Token, LexError> {
        while self.offset < self.source.len() {
            let start = self.offset;
            let pos = self.lines.advance_to(start);
            let Some((rule, end)) = self.def.first_rule_at(self.source, start) else {
                let ch = self.source[start..].chars().next().unwrap_or('\0');
                return Err(LexError::UnexpectedChar { ch, pos });
            };
            self.offset = end;
            if rule.emit {
                return Ok(Token::new(rule.kind, &self.source[start..end], pos));
            }
        }
        Ok(Token::eof(self.lines.advance_to(self.source.len())))
    }
}
